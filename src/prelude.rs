//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use ardent_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, EngineConfig, EngineProxy, EngineSignal};

// Lifecycle contract and errors
pub use crate::engine::error::EngineError;
pub use crate::engine::lifecycle::{EngineLifecycle, LifecycleState};

// Events
pub use crate::engine::event::{
    CustomOsEvent, DeviceOsEvent, KeyCode, KeyboardOsEvent, MouseButton, MouseOsEvent,
    Orientation, OsEvent, OsEventKind, TouchOsEvent, TouchPhase, ViewLogicalSize, WindowOsEvent,
};

// Scheduler
pub use crate::core::scheduler::{Scheduler, SchedulerHandle, TaskId};

// Subsystems
pub use crate::core::subsystems::{
    BuiltinResourceManager, DebugRenderer, DefaultSubsystemFactory, FileSystem, GraphicsBackend,
    GraphicsDevice, ProgramDef, ProgramLibrary, Profiler, ResourceKind, ScriptEngine,
    SubsystemBundle, SubsystemFactory,
};

// Platform driver
pub use crate::platform::{PlatformDriver, PlatformError};
