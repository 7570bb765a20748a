//=========================================================================
// Subsystem Bundle
//
// Ordered owning set of the engine-global subsystems.
//
// Construction order:
//   filesystem → graphics device → script engine → debug renderer
//   → profiler → builtin resources → program library
// Destruction is the exact reverse.
//
// Invariants:
// - No subsystem is constructed twice without an intervening destroy()
// - destroy() nulls every slot before any reconstruction (restart case)
// - A failed construct() tears down everything built so far before
//   returning (no partial leaks)
// - A failure while tearing down one subsystem never prevents tearing
//   down the rest; such failures are logged, not propagated
//
// The `SubsystemFactory` trait is the construction seam: platform
// drivers and tests substitute constructors without touching the
// ordering logic.
//
//=========================================================================

//=== Submodules ==========================================================

mod diagnostics;
mod filesystem;
mod graphics;
mod resources;
mod script;

pub use diagnostics::{DebugRenderer, Profiler};
pub use filesystem::FileSystem;
pub use graphics::{GraphicsBackend, GraphicsDevice};
pub use resources::{BuiltinResourceManager, ProgramDef, ProgramLibrary, ResourceKind};
pub use script::ScriptEngine;

//=== External Crates =====================================================

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::engine::error::EngineError;
use crate::engine::EngineConfig;

//=== SubsystemFactory ====================================================

/// Construction seam for the subsystem bundle.
///
/// Default methods build the stock subsystems from the engine config;
/// override individual methods to substitute a constructor (or to make
/// one fail, which exercises init rollback).
pub trait SubsystemFactory {
    fn create_filesystem(&self, config: &EngineConfig) -> Result<FileSystem, EngineError> {
        Ok(FileSystem::new(config.filesystem_root.clone()))
    }

    fn create_graphics_device(&self, config: &EngineConfig) -> Result<GraphicsDevice, EngineError> {
        GraphicsDevice::new(config.graphics_backend, config.window_width, config.window_height)
            .map_err(|reason| EngineError::InitializationFailure {
                subsystem: "graphics device",
                reason,
            })
    }

    fn create_script_engine(&self, _config: &EngineConfig) -> Result<ScriptEngine, EngineError> {
        Ok(ScriptEngine::new())
    }

    fn create_debug_renderer(&self, _config: &EngineConfig) -> Result<DebugRenderer, EngineError> {
        Ok(DebugRenderer::new())
    }

    fn create_profiler(&self, _config: &EngineConfig) -> Result<Profiler, EngineError> {
        Ok(Profiler::new())
    }

    fn create_resource_manager(
        &self,
        _config: &EngineConfig,
    ) -> Result<BuiltinResourceManager, EngineError> {
        Ok(BuiltinResourceManager::new())
    }

    fn create_program_library(&self, _config: &EngineConfig) -> Result<ProgramLibrary, EngineError> {
        Ok(ProgramLibrary::new())
    }
}

/// Stock factory building every subsystem with its default constructor.
#[derive(Debug, Default)]
pub struct DefaultSubsystemFactory;

impl SubsystemFactory for DefaultSubsystemFactory {}

//=== SubsystemBundle =====================================================

/// Owning set of engine-global subsystems with ordered lifecycle.
#[derive(Default)]
pub struct SubsystemBundle {
    filesystem: Option<FileSystem>,
    graphics: Option<GraphicsDevice>,
    script: Option<ScriptEngine>,
    debug_renderer: Option<DebugRenderer>,
    profiler: Option<Profiler>,
    resources: Option<BuiltinResourceManager>,
    programs: Option<ProgramLibrary>,
    generation: u32,
}

impl SubsystemBundle {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Construction -----------------------------------------------------

    /// Constructs every subsystem in the defined order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidState`] if any subsystem is still
    /// live from a previous generation, or the constructor's
    /// [`EngineError::InitializationFailure`] if one fails — in which
    /// case everything built earlier in this call has already been torn
    /// down.
    pub fn construct(
        &mut self,
        factory: &dyn SubsystemFactory,
        config: &EngineConfig,
    ) -> Result<(), EngineError> {
        if self.is_constructed() {
            return Err(EngineError::InvalidState(
                "subsystems already constructed; destroy() must run first",
            ));
        }

        macro_rules! build {
            ($slot:ident, $create:ident) => {
                match factory.$create(config) {
                    Ok(subsystem) => self.$slot = Some(subsystem),
                    Err(err) => {
                        warn!(
                            target: "subsystems",
                            "Construction aborted, rolling back earlier subsystems: {}",
                            err
                        );
                        self.destroy();
                        return Err(err);
                    }
                }
            };
        }

        build!(filesystem, create_filesystem);
        build!(graphics, create_graphics_device);
        build!(script, create_script_engine);
        build!(debug_renderer, create_debug_renderer);
        build!(profiler, create_profiler);
        build!(resources, create_resource_manager);
        build!(programs, create_program_library);

        self.generation += 1;
        info!(target: "subsystems", "Subsystem bundle constructed (generation {})", self.generation);
        Ok(())
    }

    //--- Teardown --------------------------------------------------------------

    /// Tears down every live subsystem in reverse construction order.
    ///
    /// Best-effort: a subsystem that reports a shutdown failure is
    /// logged and teardown continues. Every slot is nulled afterwards.
    pub fn destroy(&mut self) {
        if let Some(mut programs) = self.programs.take() {
            programs.shutdown();
        }
        if let Some(mut resources) = self.resources.take() {
            resources.shutdown();
        }
        if let Some(mut profiler) = self.profiler.take() {
            profiler.shutdown();
        }
        if let Some(mut overlay) = self.debug_renderer.take() {
            overlay.shutdown();
        }
        if let Some(mut script) = self.script.take() {
            if let Err(reason) = script.shutdown() {
                warn!(target: "subsystems", "Script engine teardown failed: {}", reason);
            }
        }
        if let Some(mut graphics) = self.graphics.take() {
            if let Err(reason) = graphics.shutdown() {
                warn!(target: "subsystems", "Graphics device teardown failed: {}", reason);
            }
        }
        if let Some(mut filesystem) = self.filesystem.take() {
            filesystem.shutdown();
        }
        debug!(target: "subsystems", "Subsystem bundle destroyed");
    }

    //--- Queries --------------------------------------------------------------

    /// Whether any subsystem of the current generation is live.
    pub fn is_constructed(&self) -> bool {
        self.filesystem.is_some()
            || self.graphics.is_some()
            || self.script.is_some()
            || self.debug_renderer.is_some()
            || self.profiler.is_some()
            || self.resources.is_some()
            || self.programs.is_some()
    }

    /// Number of completed construction generations.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    //--- Accessors ---------------------------------------------------------
    //
    // Non-owning handles, valid only between construct() and destroy().
    //

    pub fn filesystem(&self) -> Option<&FileSystem> {
        self.filesystem.as_ref()
    }

    pub fn filesystem_mut(&mut self) -> Option<&mut FileSystem> {
        self.filesystem.as_mut()
    }

    pub fn graphics_device(&self) -> Option<&GraphicsDevice> {
        self.graphics.as_ref()
    }

    pub fn graphics_device_mut(&mut self) -> Option<&mut GraphicsDevice> {
        self.graphics.as_mut()
    }

    pub fn script_engine(&self) -> Option<&ScriptEngine> {
        self.script.as_ref()
    }

    pub fn script_engine_mut(&mut self) -> Option<&mut ScriptEngine> {
        self.script.as_mut()
    }

    pub fn debug_renderer(&self) -> Option<&DebugRenderer> {
        self.debug_renderer.as_ref()
    }

    pub fn debug_renderer_mut(&mut self) -> Option<&mut DebugRenderer> {
        self.debug_renderer.as_mut()
    }

    pub fn profiler(&self) -> Option<&Profiler> {
        self.profiler.as_ref()
    }

    pub fn profiler_mut(&mut self) -> Option<&mut Profiler> {
        self.profiler.as_mut()
    }

    pub fn resource_manager(&self) -> Option<&BuiltinResourceManager> {
        self.resources.as_ref()
    }

    pub fn resource_manager_mut(&mut self) -> Option<&mut BuiltinResourceManager> {
        self.resources.as_mut()
    }

    pub fn program_library(&self) -> Option<&ProgramLibrary> {
        self.programs.as_ref()
    }

    pub fn program_library_mut(&mut self) -> Option<&mut ProgramLibrary> {
        self.programs.as_mut()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
