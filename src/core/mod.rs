//=========================================================================
// Core Collaborators
//
// Engine-owned collaborators that live between init() and teardown:
// the subsystem bundle and the task scheduler. The orchestrator in
// `crate::engine` sequences their lifecycles; their internals stay
// behind the interfaces exposed here.
//
//=========================================================================

pub mod scheduler;
pub mod subsystems;

pub use scheduler::{Scheduler, SchedulerHandle, TaskId};
pub use subsystems::{
    BuiltinResourceManager, DebugRenderer, DefaultSubsystemFactory, FileSystem, GraphicsBackend,
    GraphicsDevice, ProgramDef, ProgramLibrary, Profiler, ResourceKind, ScriptEngine,
    SubsystemBundle, SubsystemFactory,
};
