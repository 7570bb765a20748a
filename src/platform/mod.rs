//=========================================================================
// Platform Driver
//
// Winit-backed driver for externally-ticked engines.
//
// Architecture:
// ```text
//  Winit Event Loop (main thread)
//    ├─ window events ──event_mapper──> OsEvent ──> Engine::handle_event
//    ├─ suspended()/resumed() ────────> Engine::pause / resume
//    ├─ memory_warning() ─────────────> device MemoryWarning event
//    └─ RedrawRequested ──────────────> Engine::tick  (one per frame)
// ```
//
// This is the "external driver" mode of the engine: the platform owns
// the cadence (one tick per redraw) and `Engine::run` is never called.
// Winit requires the event loop to live on the main thread on
// macOS/iOS, so the driver is not Send and stays where it was created.
//
//=========================================================================

//=== Submodules ==========================================================

mod event_mapper;

//=== External Crates =====================================================

use log::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes};

//=== Internal Dependencies ===============================================

use crate::engine::error::EngineError;
use crate::engine::event::{DeviceOsEvent, OsEvent, WindowOsEvent};
use crate::engine::Engine;

//=== PlatformError =======================================================

/// Platform driver initialization and runtime errors.
#[derive(Debug)]
pub enum PlatformError {
    /// The engine failed to initialize before the loop started.
    Engine(EngineError),

    /// Failed to create the event loop (OS-level issue).
    EventLoopCreation(winit::error::EventLoopError),

    /// Event loop execution error.
    EventLoopExecution(winit::error::EventLoopError),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Engine(e) => write!(f, "Engine initialization failed: {}", e),
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {}

impl From<EngineError> for PlatformError {
    fn from(err: EngineError) -> Self {
        Self::Engine(err)
    }
}

//=== PlatformDriver ======================================================

/// Drives an [`Engine`] from the Winit event loop.
///
/// # Lifecycle
///
/// 1. `PlatformDriver::new(engine)` — takes ownership of the engine
/// 2. `driver.run()` — initializes the engine if needed, then blocks in
///    the event loop
/// 3. OS events flow into `Engine::handle_event`; each `RedrawRequested`
///    executes one `Engine::tick`
/// 4. Engine close (from a close-requested event or a proxy signal)
///    exits the loop
pub struct PlatformDriver {
    engine: Engine,
    /// OS window handle; created lazily in `resumed()` (mobile
    /// compatibility).
    window: Option<Window>,
}

impl PlatformDriver {
    /// Wraps an engine for event-loop driving. The engine may be
    /// initialized before or by [`PlatformDriver::run`].
    pub fn new(engine: Engine) -> Self {
        Self { engine, window: None }
    }

    /// Initializes the engine (if not already) and blocks in the Winit
    /// event loop until the engine closes.
    ///
    /// # Errors
    ///
    /// Engine initialization failures and event loop creation/execution
    /// errors. Once the loop runs, per-tick errors are logged and end
    /// the loop gracefully.
    pub fn run(mut self) -> Result<(), PlatformError> {
        if !self.engine.is_inited() {
            self.engine.init()?;
        }

        debug!(target: "platform", "Starting event loop");
        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    fn scale_factor(&self) -> f64 {
        self.window.as_ref().map(|window| window.scale_factor()).unwrap_or(1.0)
    }

    #[cfg(test)]
    pub(crate) fn engine(&self) -> &Engine {
        &self.engine
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for PlatformDriver {
    /// App became active: create the window on first activation, resume
    /// the engine on later ones (mobile suspend/resume cycle).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            self.engine.resume();
            return;
        }

        let config = self.engine.config();
        let attrs = WindowAttributes::default()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(config.window_width, config.window_height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.engine.close();
                event_loop.exit();
            }
        }
    }

    /// OS suspension pauses simulation; queued events still dispatch.
    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        info!(target: "platform", "OS suspend, pausing engine");
        self.engine.pause();
    }

    /// OS memory pressure is routed as a device event so the engine
    /// purges caches before application callbacks observe it.
    fn memory_warning(&mut self, _event_loop: &ActiveEventLoop) {
        self.engine
            .handle_event(&OsEvent::Device(DeviceOsEvent::MemoryWarning));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.engine
                    .handle_event(&OsEvent::Window(WindowOsEvent::CloseRequested));
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => {
                // One engine tick per platform frame.
                if let Err(err) = self.engine.tick() {
                    error!(target: "platform", "Tick failed, exiting: {}", err);
                    event_loop.exit();
                    return;
                }
                if !self.engine.is_inited() {
                    // The engine closed itself (proxy signal or event).
                    event_loop.exit();
                    return;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            other => {
                let scale_factor = self.scale_factor();
                if let Some(os_event) = event_mapper::map_window_event(other, scale_factor) {
                    self.engine.handle_event(&os_event);
                }
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::subsystems::GraphicsBackend;
    use crate::engine::EngineBuilder;

    #[test]
    fn driver_creation_defers_window() {
        let engine = EngineBuilder::new()
            .with_graphics_backend(GraphicsBackend::Headless)
            .build();
        let driver = PlatformDriver::new(engine);
        assert!(driver.window.is_none(), "window is created lazily in resumed()");
        assert!(!driver.engine().is_inited(), "run() initializes the engine");
    }

    #[test]
    fn scale_factor_defaults_to_one_without_a_window() {
        let engine = EngineBuilder::new()
            .with_graphics_backend(GraphicsBackend::Headless)
            .build();
        let driver = PlatformDriver::new(engine);
        assert_eq!(driver.scale_factor(), 1.0);
    }

    #[test]
    fn platform_error_wraps_engine_errors() {
        let err: PlatformError = EngineError::InvalidState("engine not initialized").into();
        assert!(matches!(err, PlatformError::Engine(_)));
        assert!(err.to_string().contains("engine not initialized"));
    }
}
