//! Terminal status line for the `sr_automator` binary.

use crate::runner::{RunHandle, RunOutcome};
use std::{
    future::Future,
    io::Write,
    time::{Duration, Instant},
};
use tokio::time::MissedTickBehavior;

/// Formats a duration as `H:MM:SS`. Hours are not capped.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

pub fn status_line(percent: u8, elapsed: Duration) -> String {
    format!(
        "Progress: {percent}% | Time Elapsed: {}",
        format_elapsed(elapsed)
    )
}

/// Tracks the latest percentage and redraws a single line in place.
#[derive(Debug)]
pub struct StatusLine {
    started: Instant,
    percent: u8,
    width: usize,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            percent: 0,
            width: 0,
        }
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn set_percent(&mut self, percent: u8) {
        self.percent = percent.min(100);
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn render(&self) -> String {
        status_line(self.percent, self.elapsed())
    }

    /// Overwrites the previous line with carriage return and padding.
    pub fn draw<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        let line = self.render();
        let pad = self.width.saturating_sub(line.len());
        write!(out, "\r{line}{}", " ".repeat(pad))?;
        self.width = line.len();
        out.flush()
    }

    /// Ends the status line so later output starts on a fresh line.
    pub fn finish<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        self.draw(out)?;
        writeln!(out)
    }
}

/// Renders progress for `handle` until the run ends, redrawing on every
/// progress event and once per second.
///
/// `shutdown` is polled for the whole run; when it resolves the run is
/// cancelled once and the loop keeps draining until the outcome arrives.
pub async fn drive_run<W, S>(
    mut handle: RunHandle,
    out: &mut W,
    shutdown: S,
) -> std::io::Result<RunOutcome>
where
    W: Write,
    S: Future<Output = ()>,
{
    let mut status = StatusLine::new();
    status.draw(out)?;

    let mut tick = tokio::time::interval(Duration::from_secs(1));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);
    let mut cancelling = false;
    loop {
        tokio::select! {
            progress = handle.next_progress() => match progress {
                Some(percent) => {
                    status.set_percent(percent);
                    status.draw(out)?;
                }
                None => break,
            },
            _ = tick.tick() => status.draw(out)?,
            _ = &mut shutdown, if !cancelling => {
                cancelling = true;
                crate::info!("cancellation requested");
                handle.cancel();
            }
        }
    }
    status.finish(out)?;
    Ok(handle.outcome().await)
}
