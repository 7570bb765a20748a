//=========================================================================
// Engine Errors
//
// Error taxonomy for lifecycle operations.
//
// Three failure classes cover everything the control core can report:
// - InitializationFailure: a subsystem failed to construct during init()
// - InvalidState: an operation was attempted outside its lifecycle window
// - InvalidArgument: a caller-supplied value was rejected
//
// Event dispatch never produces errors; an event that nothing consumes
// simply reports "not consumed" (false) to the caller.
//
//=========================================================================

//=== EngineError =========================================================

/// Errors reported by engine lifecycle operations.
///
/// Lifecycle methods (`init`, `run`, `restart`, …) return these to the
/// caller, who decides whether to abort or retry. Teardown failures are
/// logged and never surface here — `close()` is best-effort by contract.
#[derive(Debug)]
pub enum EngineError {
    /// A subsystem constructor failed during `init()`.
    ///
    /// Subsystems constructed earlier in the same `init()` have already
    /// been torn down when this is returned; no partial state leaks.
    InitializationFailure {
        /// Name of the subsystem that failed to construct.
        subsystem: &'static str,
        /// Constructor-reported reason.
        reason: String,
    },

    /// Operation attempted outside its valid lifecycle state
    /// (e.g. `tick()` before `init()`, accessor after `close()`).
    InvalidState(&'static str),

    /// Caller-supplied value rejected (e.g. non-positive frame rate).
    InvalidArgument(&'static str),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InitializationFailure { subsystem, reason } => {
                write!(f, "Subsystem '{}' failed to initialize: {}", subsystem, reason)
            }
            Self::InvalidState(msg) => write!(f, "Invalid engine state: {}", msg),
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_implements_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn initialization_failure_display_names_subsystem() {
        let err = EngineError::InitializationFailure {
            subsystem: "graphics device",
            reason: "no suitable backend".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("graphics device"), "message should name the subsystem: {}", msg);
        assert!(msg.contains("no suitable backend"), "message should carry the reason: {}", msg);
    }

    #[test]
    fn invalid_state_display() {
        let err = EngineError::InvalidState("engine not initialized");
        assert!(err.to_string().contains("engine not initialized"));
    }

    #[test]
    fn invalid_argument_display() {
        let err = EngineError::InvalidArgument("frame rate must be positive");
        assert!(err.to_string().contains("frame rate must be positive"));
    }
}
