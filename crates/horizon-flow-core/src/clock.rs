//! Frame pacing for the render loop.

use std::time::{Duration, Instant};

use crate::error::{FlowError, Result};

/// Caps the loop to a fixed number of frames per second.
///
/// Each call to [`FrameClock::tick_at`] ends a frame and reports how long the
/// caller must sleep so that frames start at most once per budget.
#[derive(Debug, Clone)]
pub struct FrameClock {
    budget: Duration,
    frame_start: Instant,
    start: Instant,
    frame_count: u64,
}

impl FrameClock {
    /// Create a clock for `update_rate` seconds per frame.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidArgument`] if `update_rate` is not a
    /// positive, finite number.
    pub fn new(update_rate: f64) -> Result<Self> {
        Self::new_at(update_rate, Instant::now())
    }

    /// Create a clock whose first frame starts at `now`.
    pub fn new_at(update_rate: f64, now: Instant) -> Result<Self> {
        let budget = Duration::try_from_secs_f64(update_rate)
            .ok()
            .filter(|budget| !budget.is_zero())
            .ok_or_else(|| {
                FlowError::invalid_argument(
                    "update_rate",
                    format!("must be a positive number of seconds, got {update_rate}"),
                )
            })?;
        Ok(Self {
            budget,
            frame_start: now,
            start: now,
            frame_count: 0,
        })
    }

    /// Time allotted to one frame.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Target frames per second.
    pub fn target_fps(&self) -> f64 {
        1.0 / self.budget.as_secs_f64()
    }

    /// Frames completed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Time since the clock was created.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.start)
    }

    /// End the current frame at `now`.
    ///
    /// Returns the sleep needed to fill the budget, or `None` if the frame
    /// already overran it. The next frame is taken to start once that sleep
    /// is over.
    pub fn tick_at(&mut self, now: Instant) -> Option<Duration> {
        self.frame_count += 1;
        let spent = now.saturating_duration_since(self.frame_start);
        let remaining = self.budget.checked_sub(spent).filter(|d| !d.is_zero());
        self.frame_start = now + remaining.unwrap_or_default();
        remaining
    }

    /// End the current frame now.
    pub fn tick(&mut self) -> Option<Duration> {
        self.tick_at(Instant::now())
    }
}
