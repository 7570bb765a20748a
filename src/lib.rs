//=========================================================================
// Ardent Engine — Library Root
//
// This crate defines the public API surface of the Ardent Engine: the
// lifecycle and main-loop control core of a real-time application
// runtime.
//
// Responsibilities:
// - Expose the engine orchestrator (`Engine`, `EngineBuilder`) and its
//   lifecycle contract (`EngineLifecycle`)
// - Expose the collaborators applications interact with (scheduler,
//   subsystem handles, event types and callbacks)
// - Provide the Winit platform driver for externally-ticked embeddings
//
// Typical usage (self-timed):
// ```no_run
// use ardent_engine::EngineBuilder;
//
// let mut engine = EngineBuilder::new().build();
// engine.init().expect("engine init failed");
// engine.run().expect("main loop failed");
// ```
//
// Typical usage (platform-driven):
// ```no_run
// use ardent_engine::{EngineBuilder, PlatformDriver};
//
// let engine = EngineBuilder::new().with_title("My App").build();
// PlatformDriver::new(engine).run().expect("platform driver failed");
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `engine` is the orchestrator: lifecycle control, tick loop, event
// routing. `core` holds the engine-owned collaborators (scheduler and
// subsystem bundle) consumed through their interfaces.
//
pub mod core;
pub mod engine;

//--- Internal Modules ----------------------------------------------------
//
// `platform` integrates Winit; only the driver and its error type are
// part of the public surface.
//
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::callbacks::EventCallbackRegistry;
pub use engine::error::EngineError;
pub use engine::event::{OsEvent, OsEventKind};
pub use engine::lifecycle::EngineLifecycle;
pub use engine::{Engine, EngineBuilder, EngineConfig, EngineProxy};
pub use platform::{PlatformDriver, PlatformError};

pub mod prelude;
