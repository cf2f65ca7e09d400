//! Emulator console auth token lookup
//!
//! The emulator writes its console token to `~/.emulator_console_auth_token`.
//! An explicit token always wins over the file.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the token in the user's home directory
pub const TOKEN_FILE_NAME: &str = ".emulator_console_auth_token";

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("auth token file not found at {0} and --token was not provided")]
    NotFound(PathBuf),

    #[error("failed to read auth token file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("auth token file {0} is empty")]
    Empty(PathBuf),

    #[error("no home directory to look for .emulator_console_auth_token in; pass --token")]
    NoHomeDir,
}

/// `~/.emulator_console_auth_token`, if a home directory is known
pub fn default_token_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(TOKEN_FILE_NAME))
}

/// Read a token file, trimming surrounding whitespace
pub fn read_token_file(path: &Path) -> Result<String, TokenError> {
    let contents = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            TokenError::NotFound(path.to_path_buf())
        } else {
            TokenError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let token = contents.trim();
    if token.is_empty() {
        return Err(TokenError::Empty(path.to_path_buf()));
    }
    tracing::info!(path = %path.display(), "Read auth token from file");
    Ok(token.to_string())
}

/// Pick the explicit token, else read `file`, else the default location
pub fn resolve_token(explicit: Option<&str>, file: Option<&Path>) -> Result<String, TokenError> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }
    match file {
        Some(path) => read_token_file(path),
        None => {
            let path = default_token_path().ok_or(TokenError::NoHomeDir)?;
            read_token_file(&path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_token_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TOKEN_FILE_NAME);
        std::fs::write(&path, "from-file").unwrap();

        let token = resolve_token(Some("from-cli"), Some(&path)).unwrap();
        assert_eq!(token, "from-cli");
    }

    #[test]
    fn test_file_token_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TOKEN_FILE_NAME);
        std::fs::write(&path, "  abcDEF123\n").unwrap();

        assert_eq!(resolve_token(None, Some(&path)).unwrap(), "abcDEF123");
    }

    #[test]
    fn test_blank_explicit_token_falls_back_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TOKEN_FILE_NAME);
        std::fs::write(&path, "filetoken").unwrap();

        assert_eq!(resolve_token(Some("  "), Some(&path)).unwrap(), "filetoken");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TOKEN_FILE_NAME);

        let err = resolve_token(None, Some(&path)).unwrap_err();
        assert!(matches!(err, TokenError::NotFound(p) if p == path));
    }

    #[test]
    fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TOKEN_FILE_NAME);
        std::fs::write(&path, "\n\n").unwrap();

        assert!(matches!(
            read_token_file(&path),
            Err(TokenError::Empty(_))
        ));
    }

    #[test]
    fn test_default_path_file_name() {
        if let Some(path) = default_token_path() {
            assert!(path.ends_with(TOKEN_FILE_NAME));
        }
    }
}
