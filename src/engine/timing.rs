//=========================================================================
// Frame Timing
//
// Frame pacing state: the preferred per-frame period derived from a
// frames-per-second preference, and the monotonically increasing frame
// counter.
//
// Invariants:
// - preferred_nanos_per_frame > 0
// - total_frames increases by exactly 1 per executed tick, never while
//   the engine is paused
//
//=========================================================================

use std::time::Duration;

use crate::engine::error::EngineError;

//=== Constants ===========================================================

pub const NANOSECONDS_PER_SECOND: i64 = 1_000_000_000;

/// Default per-frame period: 60 FPS.
pub const NANOSECONDS_60FPS: i64 = 16_666_667;

//=== FrameTiming =========================================================

/// Frame pacing and frame counting state.
#[derive(Debug, Clone, Copy)]
pub struct FrameTiming {
    preferred_nanos_per_frame: i64,
    total_frames: u64,
}

impl FrameTiming {
    /// Creates timing state at the default 60 FPS pacing, zero frames.
    pub fn new() -> Self {
        Self {
            preferred_nanos_per_frame: NANOSECONDS_60FPS,
            total_frames: 0,
        }
    }

    //--- Pacing -------------------------------------------------------------

    /// Sets the preferred frame rate.
    ///
    /// Recomputes the per-frame period as `1e9 / fps`, rounded to the
    /// nearest nanosecond. Takes effect on the next tick.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidArgument`] for `fps <= 0`; the
    /// previous pacing value is left unchanged.
    pub fn set_preferred_frames_per_second(&mut self, fps: i32) -> Result<(), EngineError> {
        if fps <= 0 {
            return Err(EngineError::InvalidArgument("frame rate must be positive"));
        }
        let fps = i64::from(fps);
        // Integer rounding: (1e9 + fps/2) / fps
        self.preferred_nanos_per_frame = (NANOSECONDS_PER_SECOND + fps / 2) / fps;
        Ok(())
    }

    /// Preferred per-frame period in nanoseconds.
    pub fn preferred_nanos_per_frame(&self) -> i64 {
        self.preferred_nanos_per_frame
    }

    /// Preferred per-frame period as a `Duration`, for pacing sleeps.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_nanos(self.preferred_nanos_per_frame as u64)
    }

    //--- Frame Counting -------------------------------------------------------

    /// Records one executed tick.
    pub fn advance_frame(&mut self) {
        self.total_frames += 1;
    }

    /// Total executed (non-paused) ticks since the last reset.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Resets the frame counter, keeping the current pacing.
    pub fn reset_frames(&mut self) {
        self.total_frames = 0;
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
