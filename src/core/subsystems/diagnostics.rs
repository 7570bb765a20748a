//=========================================================================
// Diagnostics Subsystems
//
// Debug overlay renderer and frame profiler. Both are owned by the
// engine and exposed as non-owning handles; their rendering/sampling
// internals are out of scope, only their lifecycle surface is modeled.
//
//=========================================================================

use log::debug;

//=== DebugRenderer =======================================================

/// Debug text overlay.
pub struct DebugRenderer {
    active: bool,
    lines: Vec<String>,
}

impl DebugRenderer {
    pub fn new() -> Self {
        debug!(target: "subsystems", "DebugRenderer created (inactive)");
        Self {
            active: false,
            lines: Vec::new(),
        }
    }

    /// Enables the overlay and clears any stale text.
    pub fn activate(&mut self) {
        self.active = true;
        self.lines.clear();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Queues a line of overlay text; ignored while inactive.
    pub fn add_text(&mut self, line: impl Into<String>) {
        if self.active {
            self.lines.push(line.into());
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn queued_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn shutdown(&mut self) {
        debug!(target: "subsystems", "DebugRenderer shut down");
        self.active = false;
        self.lines.clear();
    }
}

impl Default for DebugRenderer {
    fn default() -> Self {
        Self::new()
    }
}

//=== Profiler ============================================================

/// Frame-boundary profiler markers.
///
/// The engine brackets each executed tick with `begin_frame`/`end_frame`;
/// sample collection between the markers is out of scope.
pub struct Profiler {
    frames_sampled: u64,
    in_frame: bool,
}

impl Profiler {
    pub fn new() -> Self {
        debug!(target: "subsystems", "Profiler created");
        Self {
            frames_sampled: 0,
            in_frame: false,
        }
    }

    /// Marks the start of a frame. Unbalanced begins are coalesced.
    pub fn begin_frame(&mut self) {
        self.in_frame = true;
    }

    /// Marks the end of a frame, completing one sample.
    pub fn end_frame(&mut self) {
        if self.in_frame {
            self.in_frame = false;
            self.frames_sampled += 1;
        }
    }

    pub fn frames_sampled(&self) -> u64 {
        self.frames_sampled
    }

    pub fn shutdown(&mut self) {
        debug!(target: "subsystems", "Profiler shut down ({} frames sampled)", self.frames_sampled);
        self.in_frame = false;
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
