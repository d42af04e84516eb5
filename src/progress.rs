//! Progress reporting
//!
//! Generation reports progress at fixed checkpoints. Reports are fire-and-forget:
//! a sink cannot cancel or alter the run.

use log::info;

/// Receives progress checkpoints
pub trait ProgressSink {
    /// `progress` is in `0.0..=1.0`
    fn report(&mut self, message: &str, progress: f32);
}

/// Discards every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _message: &str, _progress: f32) {}
}

/// Forwards reports to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&mut self, message: &str, progress: f32) {
        info!("[{:>3.0}%] {}", progress * 100.0, message);
    }
}

impl<F> ProgressSink for F
where
    F: FnMut(&str, f32),
{
    fn report(&mut self, message: &str, progress: f32) {
        self(message, progress)
    }
}
