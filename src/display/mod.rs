//! Live terminal view of the simulation
//!
//! Redraws in place each tick: acceleration bar, walking phase, a landing
//! banner on step ticks, and the recent sine wave.
//!
//! ```text
//! Accel: 11.80 | ##################################################
//! 👟 Step: [▬▬▬] ↘ Landing!
//! 🦶 STEP LANDED! 🦶
//!
//!  1.00|                                ●  ← Current: +1.00
//!  ...
//! ```

pub mod graph;

use graph::{BarGraph, SineTrail};
use mockstep_core::SensorSample;
use std::io::Write;

/// Terminal dimensions of the graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySize {
    pub bar_width: usize,
    pub sine_width: usize,
    pub sine_height: usize,
}

/// Walking phase derived from the sine position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShoePhase {
    /// Foot flat, between steps
    Ready,
    Lifting,
    Striding,
    /// Peak reached on a step tick
    Landing,
}

impl ShoePhase {
    pub fn from_sample(sine: f64, step: bool) -> Self {
        if step && sine >= 0.5 {
            ShoePhase::Landing
        } else if sine >= 0.3 {
            ShoePhase::Striding
        } else if sine >= -0.3 {
            ShoePhase::Lifting
        } else {
            ShoePhase::Ready
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShoePhase::Ready => "👟 Step: [▬▬▬] Ready",
            ShoePhase::Lifting => "👟 Step: [▬▬▬] Lifting...",
            ShoePhase::Striding => "👟 Step: [▬▬▬] ↗ Striding",
            ShoePhase::Landing => "👟 Step: [▬▬▬] ↘ Landing!",
        }
    }
}

const LANDING_BANNER: &str = "🦶 STEP LANDED! 🦶";
const CLEAR_LINE: &str = "\x1b[2K";

/// Bar graph, shoe phase and sine trail redrawn in place
pub struct DualGraph<W: Write> {
    out: W,
    bar: BarGraph,
    trail: SineTrail,
    first_render: bool,
}

impl<W: Write> DualGraph<W> {
    /// `accel_range` bounds the bar; the sine plot always spans [-1, 1]
    pub fn new(out: W, size: DisplaySize, accel_range: (f64, f64)) -> Self {
        Self {
            out,
            bar: BarGraph::new(size.bar_width, accel_range, "Accel"),
            trail: SineTrail::new(size.sine_width, size.sine_height, (-1.0, 1.0)),
            first_render: true,
        }
    }

    /// Lines drawn per frame
    pub fn total_lines(&self) -> usize {
        4 + self.trail.height()
    }

    /// Push a sample and return the frame without terminal control codes
    pub fn frame(&mut self, accel: f64, sine: f64, step: bool) -> Vec<String> {
        self.trail.push(sine);

        let mut lines = Vec::with_capacity(self.total_lines());
        lines.push(self.bar.render(accel));
        lines.push(ShoePhase::from_sample(sine, step).label().to_string());
        lines.push(if step { LANDING_BANNER } else { "" }.to_string());
        lines.push(String::new());
        lines.extend(self.trail.render());
        lines
    }

    /// Draw a frame over the previous one
    pub fn plot(&mut self, sample: &SensorSample) -> std::io::Result<()> {
        let lines = self.frame(sample.acceleration.y, sample.sine, sample.step.is_some());

        if !self.first_render {
            write!(self.out, "\x1b[{}A", lines.len())?;
        }
        for line in &lines {
            writeln!(self.out, "{}{}", CLEAR_LINE, line)?;
        }
        self.out.flush()?;
        self.first_render = false;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
