//=========================================================================
// Engine Lifecycle
//
// The lifecycle flag set and the lifecycle contract trait.
//
// State machine:
// ```text
//   Uninitialized ──init()──> Running <──pause/resume──> Paused
//        ▲                      │  │
//        └───────restart()──────┘  └──close()──> Closed (terminal)
// ```
//
// `LifecycleState` is the composite flag set the orchestrator mutates;
// `EngineLifecycle` is the contract an alternative platform driver can
// target without depending on the concrete `Engine`.
//
//=========================================================================

use crate::core::scheduler::SchedulerHandle;
use crate::engine::error::EngineError;

//=== LifecycleState ======================================================

/// Composite lifecycle flags.
///
/// Invariants:
/// - `closing` implies no further ticks are dispatched
/// - `pending_restart` is honored only at tick boundaries, never mid-tick
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleState {
    /// Subsystems constructed and the engine is live.
    pub inited: bool,
    /// `close()` was requested; terminal once teardown ran.
    pub closing: bool,
    /// Ticks skip scheduler advance and frame counting.
    pub paused: bool,
    /// A resume arrived mid-tick; applied at the tick boundary.
    pub pending_resume: bool,
    /// A restart was requested; executed after the in-flight tick ends.
    pub pending_restart: bool,
}

impl LifecycleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every flag back to the uninitialized state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

//=== EngineLifecycle Trait ================================================

/// Lifecycle contract of an engine orchestrator.
///
/// [`crate::Engine`] is the concrete implementation; platform drivers
/// program against this trait so the driving strategy (blocking loop vs.
/// externally-ticked) can vary without changing the contract.
pub trait EngineLifecycle {
    /// Constructs all subsystems and transitions to Running.
    fn init(&mut self) -> Result<(), EngineError>;

    /// Drives the blocking, self-timed main loop until close.
    fn run(&mut self) -> Result<(), EngineError>;

    /// Suspends simulation; idempotent.
    fn pause(&mut self);

    /// Resumes simulation if paused; idempotent.
    fn resume(&mut self);

    /// Tears down and reconstructs all subsystems. Returns the status of
    /// the inner `init()`.
    fn restart(&mut self) -> Result<(), EngineError>;

    /// Tears down subsystems and enters the terminal Closed state;
    /// idempotent.
    fn close(&mut self);

    /// Sets the preferred frame rate; the pacing period updates on the
    /// next tick.
    fn set_preferred_frames_per_second(&mut self, fps: i32) -> Result<(), EngineError>;

    /// Total executed ticks. Read-only snapshot.
    fn total_frames(&self) -> u64;

    /// Whether `init()` has completed and the engine is live.
    fn is_inited(&self) -> bool;

    /// Shared handle to the task scheduler; fails before `init()`.
    fn scheduler(&self) -> Result<SchedulerHandle, EngineError>;
}

//=========================================================================
// Unit Tests
//=========================================================================
