//! Console session tests against the in-memory emulator console
//!
//! Cover authentication retries, precondition checks before any bytes hit
//! the wire, command rejection and timeouts, and disconnect idempotence.

mod common;

use common::{fast_console, MockConsole, VALID_TOKEN};
use mockstep::console::ACCELERATION_SENSOR;
use mockstep::{ConsoleError, ConsoleSession, ErrorKind, Vector3};
use tokio::io::duplex;

fn walking() -> Vector3 {
    Vector3::new(0.0, 11.8, 0.0)
}

/// A wrong token can be retried on the same session
#[tokio::test]
async fn test_wrong_token_then_retry() {
    let (client, server) = duplex(4096);
    let console = MockConsole::new().spawn(server);
    let mut session = ConsoleSession::new(client, fast_console());

    let err = session.authenticate("WRONG").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert!(session.is_open());
    assert!(!session.is_authenticated());

    session.authenticate(VALID_TOKEN).await.unwrap();
    assert!(session.is_authenticated());

    session.disconnect().await;
    let received = console.await.unwrap();
    assert_eq!(received, vec!["auth WRONG", "auth VALIDTOKEN", "quit"]);
}

/// Once the console hangs up, further attempts report a connection failure
#[tokio::test]
async fn test_retry_after_console_closed() {
    let (client, server) = duplex(4096);
    let console = MockConsole {
        close_on_reject: true,
        ..MockConsole::new()
    }
    .spawn(server);
    let mut session = ConsoleSession::new(client, fast_console());

    let err = session.authenticate("WRONG").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);

    let err = session.authenticate(VALID_TOKEN).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connection);
    assert!(!session.is_authenticated());

    // Still closed on the next try
    let err = session.authenticate(VALID_TOKEN).await.unwrap_err();
    assert!(matches!(err, ConsoleError::ConnectionClosed));

    session.disconnect().await;
    drop(session);
    console.await.unwrap();
}

/// Sensor commands before authentication never reach the console
#[tokio::test]
async fn test_set_sensor_requires_auth() {
    let (client, server) = duplex(4096);
    let console = MockConsole::new().spawn(server);
    let mut session = ConsoleSession::new(client, fast_console());

    let err = session
        .set_sensor(ACCELERATION_SENSOR, walking())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Precondition);

    session.disconnect().await;
    let received = console.await.unwrap();
    assert_eq!(received, vec!["quit"]);
}

/// Acknowledged sensor commands use the two-decimal colon format
#[tokio::test]
async fn test_set_sensor_wire_format() {
    let (client, server) = duplex(4096);
    let console = MockConsole::new().spawn(server);
    let mut session = ConsoleSession::new(client, fast_console());

    session.authenticate(VALID_TOKEN).await.unwrap();
    session
        .set_sensor(ACCELERATION_SENSOR, Vector3::new(0.0, 11.8, -0.256))
        .await
        .unwrap();
    session.disconnect().await;

    let received = console.await.unwrap();
    assert_eq!(received[1], "sensor set acceleration 0.00:11.80:-0.26");
}

/// A `KO` reply to a sensor command is a protocol error
#[tokio::test]
async fn test_rejected_command() {
    let (client, server) = duplex(4096);
    let console = MockConsole::new().spawn(server);
    let mut session = ConsoleSession::new(client, fast_console());

    session.authenticate(VALID_TOKEN).await.unwrap();
    let err = session.set_sensor("gyroscope", walking()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(
        err.to_string().contains("bad sensor name"),
        "message should carry the console's reason: {}",
        err
    );

    // The session stays usable after a rejected command
    session
        .set_sensor(ACCELERATION_SENSOR, walking())
        .await
        .unwrap();

    session.disconnect().await;
    console.await.unwrap();
}

/// Unanswered sensor commands time out as protocol errors
#[tokio::test]
async fn test_command_timeout() {
    let (client, server) = duplex(4096);
    let console = MockConsole {
        mute_sensors: true,
        ..MockConsole::new()
    }
    .spawn(server);
    let mut session = ConsoleSession::new(client, fast_console());

    session.authenticate(VALID_TOKEN).await.unwrap();
    let err = session
        .set_sensor(ACCELERATION_SENSOR, walking())
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::ReplyTimeout { .. }));
    assert_eq!(err.kind(), ErrorKind::Protocol);

    session.disconnect().await;
    console.await.unwrap();
}

/// Disconnect sends a single `quit` however many times it is called
#[tokio::test]
async fn test_disconnect_idempotent() {
    let (client, server) = duplex(4096);
    let console = MockConsole::new().spawn(server);
    let mut session = ConsoleSession::new(client, fast_console());

    session.authenticate(VALID_TOKEN).await.unwrap();
    session.disconnect().await;
    session.disconnect().await;
    assert!(!session.is_open());

    let err = session
        .set_sensor(ACCELERATION_SENSOR, walking())
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::Disconnected));

    let received = console.await.unwrap();
    assert_eq!(received, vec!["auth VALIDTOKEN", "quit"]);
}

/// A real TCP console on localhost
#[tokio::test]
async fn test_tcp_connect_and_authenticate() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        MockConsole::new().spawn(stream).await.unwrap()
    });

    let mut session = ConsoleSession::connect("127.0.0.1", port, fast_console())
        .await
        .unwrap();
    session.authenticate(VALID_TOKEN).await.unwrap();
    session
        .set_sensor(ACCELERATION_SENSOR, walking())
        .await
        .unwrap();
    session.disconnect().await;

    let received = server.await.unwrap();
    assert_eq!(
        received,
        vec![
            "auth VALIDTOKEN",
            "sensor set acceleration 0.00:11.80:0.00",
            "quit"
        ]
    );
}
