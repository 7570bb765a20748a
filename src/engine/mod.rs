//=========================================================================
// Ardent Engine
//
// Engine orchestrator: lifecycle control, the tick loop, and platform
// event routing.
//
// Architecture:
// ```text
//     EngineBuilder ──build()──> Engine ──init()──> Running
//         │                        │
//         ├─ with_preferred_fps()  ├─ run()  : self-timed blocking loop
//         └─ with_window_size()    └─ tick() : one frame, externally driven
//
//     platform/driver ──OsEvent──> handle_event() ──> internal dispatchers
//     any thread ──EngineProxy──> signal queue ──drained at tick boundaries
// ```
//
// Lifecycle state machine:
//   Uninitialized → init() → Running ⇄ pause/resume ⇄ Paused
//   Running/Paused → close() → Closed (no ticks until a fresh init())
//   Running/Paused → restart() → destroy + init (one atomic sequence)
//
//=========================================================================

//=== Submodules ==========================================================

pub mod callbacks;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod timing;

//=== Standard Library Imports ============================================

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::thread;
use std::time::Instant;

//=== External Crates =====================================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::scheduler::{Scheduler, SchedulerHandle};
use crate::core::subsystems::{
    BuiltinResourceManager, DebugRenderer, DefaultSubsystemFactory, FileSystem, GraphicsBackend,
    GraphicsDevice, ProgramLibrary, Profiler, ScriptEngine, SubsystemBundle, SubsystemFactory,
};
use callbacks::EventCallbackRegistry;
use error::EngineError;
use event::{DeviceOsEvent, OsEvent, OsEventKind, ViewLogicalSize, WindowOsEvent};
use lifecycle::{EngineLifecycle, LifecycleState};
use timing::FrameTiming;

//=== EngineConfig ========================================================

/// Static engine configuration, fixed at build time and re-applied on
/// every `init()` (including restarts).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub window_title: String,
    /// Logical window size; also the initial viewport size.
    pub window_width: f32,
    pub window_height: f32,
    pub preferred_fps: i32,
    pub filesystem_root: PathBuf,
    pub graphics_backend: GraphicsBackend,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_title: "Ardent Engine".into(),
            window_width: 800.0,
            window_height: 600.0,
            preferred_fps: 60,
            filesystem_root: PathBuf::from("."),
            graphics_backend: GraphicsBackend::Auto,
        }
    }
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Window**: "Ardent Engine", 800×600 logical
/// - **Preferred FPS**: 60 (period 16,666,667 ns)
/// - **Filesystem root**: `.`
/// - **Graphics backend**: platform default
///
/// # Examples
///
/// ```no_run
/// use ardent_engine::EngineBuilder;
///
/// let mut engine = EngineBuilder::new()
///     .with_title("My App")
///     .with_preferred_fps(120)
///     .build();
///
/// engine.init().expect("engine init failed");
/// engine.run().expect("main loop failed");
/// ```
pub struct EngineBuilder {
    config: EngineConfig,
    factory: Box<dyn SubsystemFactory>,
}

impl EngineBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            factory: Box::new(DefaultSubsystemFactory),
        }
    }

    /// Sets the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.window_title = title.into();
        self
    }

    /// Sets the logical window size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive.
    pub fn with_window_size(mut self, width: f32, height: f32) -> Self {
        assert!(width > 0.0 && height > 0.0, "Window size must be positive, got {}x{}", width, height);
        self.config.window_width = width;
        self.config.window_height = height;
        self
    }

    /// Sets the preferred frame rate for the main loop.
    ///
    /// # Panics
    ///
    /// Panics if `fps <= 0`. (At runtime, use
    /// [`Engine::set_preferred_frames_per_second`], which reports
    /// `InvalidArgument` instead.)
    pub fn with_preferred_fps(mut self, fps: i32) -> Self {
        assert!(fps > 0, "Preferred FPS must be positive, got {}", fps);
        self.config.preferred_fps = fps;
        self
    }

    /// Sets the filesystem root search path.
    pub fn with_filesystem_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.filesystem_root = root.into();
        self
    }

    /// Requests a specific graphics backend.
    pub fn with_graphics_backend(mut self, backend: GraphicsBackend) -> Self {
        self.config.graphics_backend = backend;
        self
    }

    /// Substitutes the subsystem construction seam.
    pub fn with_subsystem_factory(mut self, factory: Box<dyn SubsystemFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Builds the engine in the Uninitialized state.
    ///
    /// Call [`Engine::init`] before running or ticking.
    pub fn build(self) -> Engine {
        info!(
            target: "engine",
            "Building engine (fps: {}, backend: {:?})",
            self.config.preferred_fps,
            self.config.graphics_backend
        );
        Engine::from_parts(self.config, self.factory)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== EngineSignal / EngineProxy ==========================================

/// Control and event messages drained by the engine at tick boundaries.
#[derive(Debug, Clone)]
pub enum EngineSignal {
    /// A platform event to route through `handle_event`.
    Event(OsEvent),
    Pause,
    Resume,
    /// Teardown + re-init after the in-flight tick completes.
    Restart,
    Close,
}

/// Cloneable, thread-safe handle for posting signals to a live engine.
///
/// Event callbacks and scheduler tasks cannot borrow the engine
/// re-entrantly; this proxy is how they affect it. Signals are drained
/// at tick boundaries on the engine's control thread.
#[derive(Clone)]
pub struct EngineProxy {
    sender: Sender<EngineSignal>,
}

impl EngineProxy {
    /// Queues a platform event for dispatch on the next tick.
    /// Returns whether the engine side of the channel is still alive.
    pub fn post_event(&self, event: OsEvent) -> bool {
        self.sender.send(EngineSignal::Event(event)).is_ok()
    }

    pub fn request_pause(&self) -> bool {
        self.sender.send(EngineSignal::Pause).is_ok()
    }

    pub fn request_resume(&self) -> bool {
        self.sender.send(EngineSignal::Resume).is_ok()
    }

    pub fn request_restart(&self) -> bool {
        self.sender.send(EngineSignal::Restart).is_ok()
    }

    pub fn request_close(&self) -> bool {
        self.sender.send(EngineSignal::Close).is_ok()
    }
}

//=== Engine ==============================================================

/// The engine orchestrator.
///
/// Owns the subsystem bundle and the scheduler, drives the tick loop,
/// and routes platform events to internal dispatchers or registered
/// application callbacks.
///
/// # Threading
///
/// A single logical control thread drives lifecycle transitions,
/// `tick()` and event dispatch; none of it is internally locked. Other
/// threads interact exclusively through [`EngineProxy`].
///
/// # Event dispatch ordering
///
/// Internal reactions run BEFORE the application callback for the same
/// event: when a window-resize callback fires, the logical viewport and
/// the graphics device surface are already updated. The one exception
/// is `CloseRequested`, whose callback fires before teardown so the
/// application gets a last look at the live engine.
pub struct Engine {
    config: EngineConfig,
    factory: Box<dyn SubsystemFactory>,

    lifecycle: LifecycleState,
    timing: FrameTiming,
    view_size: ViewLogicalSize,

    callbacks: EventCallbackRegistry,
    subsystems: SubsystemBundle,
    scheduler: Option<SchedulerHandle>,

    signal_tx: Sender<EngineSignal>,
    signal_rx: Receiver<EngineSignal>,

    last_tick: Option<Instant>,
    in_tick: bool,
}

impl Engine {
    /// Creates an engine with default configuration, uninitialized.
    pub fn new() -> Self {
        EngineBuilder::new().build()
    }

    fn from_parts(config: EngineConfig, factory: Box<dyn SubsystemFactory>) -> Self {
        let (signal_tx, signal_rx) = unbounded();
        Self {
            config,
            factory,
            lifecycle: LifecycleState::new(),
            timing: FrameTiming::new(),
            view_size: ViewLogicalSize::default(),
            callbacks: EventCallbackRegistry::new(),
            subsystems: SubsystemBundle::new(),
            scheduler: None,
            signal_tx,
            signal_rx,
            last_tick: None,
            in_tick: false,
        }
    }

    //--- Lifecycle ----------------------------------------------------------

    /// Constructs the subsystem bundle, creates the scheduler, resets
    /// frame timing and transitions to Running.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidState`] if already initialized (guards
    ///   against double-construction of subsystems)
    /// - [`EngineError::InitializationFailure`] if a subsystem
    ///   constructor failed; everything constructed earlier has been
    ///   torn down already
    pub fn init(&mut self) -> Result<(), EngineError> {
        if self.lifecycle.inited {
            return Err(EngineError::InvalidState("engine already initialized"));
        }

        info!(target: "engine", "Initializing engine");
        self.subsystems.construct(self.factory.as_ref(), &self.config)?;

        self.scheduler = Some(Rc::new(RefCell::new(Scheduler::new())));

        self.timing = FrameTiming::new();
        self.timing.set_preferred_frames_per_second(self.config.preferred_fps)?;
        self.view_size = ViewLogicalSize::new(self.config.window_width, self.config.window_height);
        self.last_tick = None;

        self.lifecycle.reset();
        self.lifecycle.inited = true;

        info!(target: "engine", "Engine initialized");
        Ok(())
    }

    /// Drives the blocking, self-timed main loop: one `tick()` per
    /// preferred frame period until the engine closes.
    ///
    /// Externally-driven embeddings (e.g. the winit platform driver)
    /// skip `run()` and call [`Engine::tick`] once per platform frame
    /// instead.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidState`] if called before `init()`.
    pub fn run(&mut self) -> Result<(), EngineError> {
        if !self.lifecycle.inited {
            return Err(EngineError::InvalidState("engine not initialized"));
        }

        info!(target: "engine", "Entering main loop");
        while !self.lifecycle.closing {
            let frame_start = Instant::now();

            self.tick()?;
            if self.lifecycle.closing {
                break;
            }

            // Pacing: sleep away the remainder of the frame budget.
            let budget = self.timing.frame_duration();
            let elapsed = frame_start.elapsed();
            if elapsed < budget {
                thread::sleep(budget - elapsed);
            }
        }
        info!(target: "engine", "Main loop exited");
        Ok(())
    }

    /// Executes one tick.
    ///
    /// Queued proxy signals are drained first (even while paused).
    /// Unless paused, the scheduler advances by the wall-clock delta
    /// since the previous tick and the frame counter increments by
    /// exactly one. A restart requested during the tick is deferred to
    /// the tick boundary; a close requested during the tick suppresses
    /// the simulation step.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidState`] if called before `init()`. A tick
    /// on a closed engine is a no-op. A deferred restart propagates its
    /// inner `init()` failure.
    pub fn tick(&mut self) -> Result<(), EngineError> {
        if self.lifecycle.closing {
            // Closed engines dispatch nothing; close() is terminal
            // until a fresh init().
            return Ok(());
        }
        if !self.lifecycle.inited {
            return Err(EngineError::InvalidState("engine not initialized"));
        }

        self.in_tick = true;
        self.drain_signals();

        if self.lifecycle.closing {
            self.in_tick = false;
            return Ok(());
        }

        // Pause is sampled once, at tick start; a mid-tick resume takes
        // effect at the boundary below.
        if self.lifecycle.paused {
            self.last_tick = None;
        } else {
            let now = Instant::now();
            let dt = self
                .last_tick
                .map(|previous| now.duration_since(previous))
                .unwrap_or_else(|| self.timing.frame_duration());

            if let Some(profiler) = self.subsystems.profiler_mut() {
                profiler.begin_frame();
            }
            if let Some(scheduler) = &self.scheduler {
                scheduler.borrow_mut().advance(dt);
            }
            self.timing.advance_frame();
            if let Some(profiler) = self.subsystems.profiler_mut() {
                profiler.end_frame();
            }
            self.last_tick = Some(now);
        }

        // Signals posted during the simulation step (by scheduler tasks
        // or event callbacks) are honored at this boundary.
        self.drain_signals();
        self.in_tick = false;

        if self.lifecycle.pending_resume {
            self.lifecycle.pending_resume = false;
            self.lifecycle.paused = false;
            self.last_tick = None;
        }

        if self.lifecycle.pending_restart && !self.lifecycle.closing {
            self.lifecycle.pending_restart = false;
            self.do_restart()?;
        }

        Ok(())
    }

    /// Suspends simulation. Idempotent; queued events are still
    /// dispatched by paused ticks.
    pub fn pause(&mut self) {
        if !self.lifecycle.paused {
            info!(target: "engine", "Engine paused");
            self.lifecycle.paused = true;
            self.lifecycle.pending_resume = false;
        }
    }

    /// Resumes simulation if paused. Idempotent. A resume arriving
    /// mid-tick takes effect at the tick boundary, so a tick that began
    /// paused stays paused throughout.
    pub fn resume(&mut self) {
        if !self.lifecycle.paused {
            return;
        }
        if self.in_tick {
            self.lifecycle.pending_resume = true;
        } else {
            info!(target: "engine", "Engine resumed");
            self.lifecycle.paused = false;
            self.last_tick = None;
        }
    }

    /// Tears down and reconstructs every subsystem, equivalent to
    /// `close()` immediately followed by `init()`. Returns the inner
    /// `init()` status.
    ///
    /// When requested through the proxy during a tick, the restart is
    /// deferred until that tick completes; a tick's effects on
    /// subsystem state are atomic.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidState`] before `init()`; otherwise the
    /// inner `init()` result.
    pub fn restart(&mut self) -> Result<(), EngineError> {
        if !self.lifecycle.inited {
            return Err(EngineError::InvalidState("engine not initialized"));
        }
        // No tick can be in flight on the control thread here, so the
        // request is honored immediately. Mid-tick restarts arrive via
        // the proxy and are deferred by tick() instead.
        self.do_restart()
    }

    /// Closes the engine: releases subsystems in reverse construction
    /// order, clears the callback registry and releases the scheduler.
    /// Idempotent; no further ticks are dispatched until a fresh
    /// `init()`.
    pub fn close(&mut self) {
        if self.lifecycle.closing && !self.lifecycle.inited {
            return;
        }
        info!(target: "engine", "Closing engine");
        self.lifecycle.closing = true;
        self.destroy();
    }

    /// Best-effort teardown: every subsystem slot is nulled even when
    /// one reports a shutdown failure.
    fn destroy(&mut self) {
        self.subsystems.destroy();
        self.callbacks.clear();
        self.scheduler = None;
        self.last_tick = None;
        self.lifecycle.inited = false;
        debug!(target: "engine", "Engine destroyed");
    }

    fn do_restart(&mut self) -> Result<(), EngineError> {
        info!(target: "engine", "Restarting engine");
        self.close();
        self.init()
    }

    //--- Frame Pacing ---------------------------------------------------------

    /// Sets the preferred frame rate; takes effect on the next tick.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidArgument`] for `fps <= 0`; previous pacing
    /// is left unchanged.
    pub fn set_preferred_frames_per_second(&mut self, fps: i32) -> Result<(), EngineError> {
        self.timing.set_preferred_frames_per_second(fps)?;
        debug!(
            target: "engine",
            "Preferred frame rate set to {} fps ({} ns/frame)",
            fps,
            self.timing.preferred_nanos_per_frame()
        );
        Ok(())
    }

    /// Total executed (non-paused) ticks. Read-only snapshot.
    pub fn total_frames(&self) -> u64 {
        self.timing.total_frames()
    }

    /// Preferred per-frame period in nanoseconds.
    pub fn preferred_nanos_per_frame(&self) -> i64 {
        self.timing.preferred_nanos_per_frame()
    }

    //--- Event Dispatch ---------------------------------------------------

    /// Registers `callback` for events of `kind`, replacing any
    /// previous registration (last writer wins).
    pub fn add_event_callback<F>(&mut self, kind: OsEventKind, callback: F)
    where
        F: FnMut(&OsEvent) + 'static,
    {
        self.callbacks.add(kind, Box::new(callback));
    }

    /// Clears the callback slot for `kind`.
    pub fn remove_event_callback(&mut self, kind: OsEventKind) {
        self.callbacks.remove(kind);
    }

    /// Classifies and routes a platform event.
    ///
    /// Window and device events run their internal reactions first,
    /// then the application callback for that kind (see the type-level
    /// ordering note). Touch events go straight to the touch callback.
    /// Keyboard, mouse and custom events go to their callbacks only.
    ///
    /// Returns whether some handler — internal or registered — consumed
    /// the event. Events arriving before `init()` or after `close()`
    /// are dropped.
    pub fn handle_event(&mut self, event: &OsEvent) -> bool {
        if !self.lifecycle.inited {
            trace!(target: "engine::events", "Dropping {:?} event: engine not live", event.kind());
            return false;
        }
        match event {
            OsEvent::Window(window_event) => self.dispatch_window_event(window_event, event),
            OsEvent::Device(device_event) => self.dispatch_device_event(device_event, event),
            OsEvent::Touch(_) => self.handle_touch_event(event),
            OsEvent::Keyboard(_) | OsEvent::Mouse(_) | OsEvent::Custom(_) => {
                self.dispatch_event_to_app(event.kind(), event)
            }
        }
    }

    /// Routes a touch event directly to the touch callback, bypassing
    /// the window/device dispatchers. Returns whether it was consumed.
    pub fn handle_touch_event(&mut self, event: &OsEvent) -> bool {
        self.dispatch_event_to_app(OsEventKind::Touch, event)
    }

    /// Window events: internal reaction, then the application callback.
    fn dispatch_window_event(&mut self, window_event: &WindowOsEvent, event: &OsEvent) -> bool {
        match window_event {
            WindowOsEvent::Resized { width, height } => {
                self.view_size = ViewLogicalSize::new(*width, *height);
                if let Some(device) = self.subsystems.graphics_device_mut() {
                    device.on_surface_resized(*width, *height);
                }
            }
            WindowOsEvent::Minimized | WindowOsEvent::Hidden => self.pause(),
            WindowOsEvent::Restored | WindowOsEvent::Shown => self.resume(),
            WindowOsEvent::CloseRequested => {
                // Callback first: the application observes the engine
                // one last time before teardown clears the registry.
                self.dispatch_event_to_app(OsEventKind::Window, event);
                self.close();
                return true;
            }
        }
        self.dispatch_event_to_app(OsEventKind::Window, event);
        true
    }

    /// Device events: internal reaction, then the application callback.
    fn dispatch_device_event(&mut self, device_event: &DeviceOsEvent, event: &OsEvent) -> bool {
        match device_event {
            DeviceOsEvent::MemoryWarning => {
                warn!(target: "engine::events", "Memory warning: purging caches");
                if let Some(resources) = self.subsystems.resource_manager_mut() {
                    resources.purge();
                }
                if let Some(script) = self.subsystems.script_engine_mut() {
                    script.collect_garbage();
                }
            }
            DeviceOsEvent::OrientationChanged(orientation) => {
                if let Some(device) = self.subsystems.graphics_device_mut() {
                    device.on_orientation_changed(*orientation);
                }
            }
        }
        self.dispatch_event_to_app(OsEventKind::Device, event);
        true
    }

    /// Invokes the registered application callback for `kind`, if any.
    fn dispatch_event_to_app(&mut self, kind: OsEventKind, event: &OsEvent) -> bool {
        self.callbacks.invoke(kind, event)
    }

    //--- Signal Queue ---------------------------------------------------------

    /// Handle for posting events and control requests from callbacks,
    /// scheduler tasks or other threads.
    pub fn proxy(&self) -> EngineProxy {
        EngineProxy { sender: self.signal_tx.clone() }
    }

    fn drain_signals(&mut self) {
        while let Ok(signal) = self.signal_rx.try_recv() {
            match signal {
                EngineSignal::Event(event) => {
                    self.handle_event(&event);
                }
                EngineSignal::Pause => self.pause(),
                EngineSignal::Resume => self.resume(),
                EngineSignal::Restart => {
                    if self.lifecycle.inited {
                        self.lifecycle.pending_restart = true;
                    }
                }
                EngineSignal::Close => self.close(),
            }
        }
    }

    //--- Accessors ---------------------------------------------------------
    //
    // Non-owning subsystem handles, valid only between init() and the
    // matching teardown. Mutation rights stay with the engine; the
    // mutable accessors exist for application-level configuration
    // (mounting paths, registering resources) on the control thread.
    //

    /// Shared handle to the task scheduler.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidState`] before `init()`.
    pub fn scheduler(&self) -> Result<SchedulerHandle, EngineError> {
        self.scheduler
            .as_ref()
            .cloned()
            .ok_or(EngineError::InvalidState("engine not initialized"))
    }

    pub fn is_inited(&self) -> bool {
        self.lifecycle.inited
    }

    pub fn is_paused(&self) -> bool {
        self.lifecycle.paused
    }

    /// Logical (DPI-independent) viewport size.
    pub fn view_logical_size(&self) -> ViewLogicalSize {
        self.view_size
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn filesystem(&self) -> Option<&FileSystem> {
        self.subsystems.filesystem()
    }

    pub fn filesystem_mut(&mut self) -> Option<&mut FileSystem> {
        self.subsystems.filesystem_mut()
    }

    pub fn graphics_device(&self) -> Option<&GraphicsDevice> {
        self.subsystems.graphics_device()
    }

    pub fn script_engine(&self) -> Option<&ScriptEngine> {
        self.subsystems.script_engine()
    }

    pub fn script_engine_mut(&mut self) -> Option<&mut ScriptEngine> {
        self.subsystems.script_engine_mut()
    }

    pub fn debug_renderer(&self) -> Option<&DebugRenderer> {
        self.subsystems.debug_renderer()
    }

    pub fn debug_renderer_mut(&mut self) -> Option<&mut DebugRenderer> {
        self.subsystems.debug_renderer_mut()
    }

    pub fn profiler(&self) -> Option<&Profiler> {
        self.subsystems.profiler()
    }

    pub fn resource_manager(&self) -> Option<&BuiltinResourceManager> {
        self.subsystems.resource_manager()
    }

    pub fn resource_manager_mut(&mut self) -> Option<&mut BuiltinResourceManager> {
        self.subsystems.resource_manager_mut()
    }

    pub fn program_library(&self) -> Option<&ProgramLibrary> {
        self.subsystems.program_library()
    }

    pub fn program_library_mut(&mut self) -> Option<&mut ProgramLibrary> {
        self.subsystems.program_library_mut()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

//=== Lifecycle Contract ==================================================

impl EngineLifecycle for Engine {
    fn init(&mut self) -> Result<(), EngineError> {
        Engine::init(self)
    }

    fn run(&mut self) -> Result<(), EngineError> {
        Engine::run(self)
    }

    fn pause(&mut self) {
        Engine::pause(self)
    }

    fn resume(&mut self) {
        Engine::resume(self)
    }

    fn restart(&mut self) -> Result<(), EngineError> {
        Engine::restart(self)
    }

    fn close(&mut self) {
        Engine::close(self)
    }

    fn set_preferred_frames_per_second(&mut self, fps: i32) -> Result<(), EngineError> {
        Engine::set_preferred_frames_per_second(self, fps)
    }

    fn total_frames(&self) -> u64 {
        Engine::total_frames(self)
    }

    fn is_inited(&self) -> bool {
        Engine::is_inited(self)
    }

    fn scheduler(&self) -> Result<SchedulerHandle, EngineError> {
        Engine::scheduler(self)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::subsystems::ResourceKind;
    use crate::engine::event::{
        CustomOsEvent, KeyCode, KeyboardOsEvent, Orientation, TouchOsEvent, TouchPhase,
    };
    use std::cell::Cell;
    use std::time::Duration;

    //--- Helpers -----------------------------------------------------------

    fn headless_builder() -> EngineBuilder {
        EngineBuilder::new().with_graphics_backend(GraphicsBackend::Headless)
    }

    fn live_engine() -> Engine {
        let mut engine = headless_builder().build();
        engine.init().expect("test engine must initialize");
        engine
    }

    fn custom_event(name: &str) -> OsEvent {
        OsEvent::Custom(CustomOsEvent { name: name.into() })
    }

    fn counter() -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let cell = Rc::new(Cell::new(0u32));
        (Rc::clone(&cell), cell)
    }

    /// Factory that counts how many times the filesystem (the first
    /// subsystem) gets constructed.
    struct CountingFactory {
        constructions: Rc<Cell<u32>>,
    }

    impl SubsystemFactory for CountingFactory {
        fn create_filesystem(&self, config: &EngineConfig) -> Result<FileSystem, EngineError> {
            self.constructions.set(self.constructions.get() + 1);
            Ok(FileSystem::new(config.filesystem_root.clone()))
        }
    }

    /// Factory whose graphics-device constructor always fails.
    struct BrokenGraphicsFactory;

    impl SubsystemFactory for BrokenGraphicsFactory {
        fn create_graphics_device(
            &self,
            _config: &EngineConfig,
        ) -> Result<GraphicsDevice, EngineError> {
            Err(EngineError::InitializationFailure {
                subsystem: "graphics device",
                reason: "no suitable backend".into(),
            })
        }
    }

    /// Factory that succeeds once, then fails every later generation.
    struct FlakySecondGenerationFactory {
        generations: Rc<Cell<u32>>,
    }

    impl SubsystemFactory for FlakySecondGenerationFactory {
        fn create_graphics_device(
            &self,
            config: &EngineConfig,
        ) -> Result<GraphicsDevice, EngineError> {
            self.generations.set(self.generations.get() + 1);
            if self.generations.get() > 1 {
                return Err(EngineError::InitializationFailure {
                    subsystem: "graphics device",
                    reason: "device lost".into(),
                });
            }
            GraphicsDevice::new(GraphicsBackend::Headless, config.window_width, config.window_height)
                .map_err(|reason| EngineError::InitializationFailure {
                    subsystem: "graphics device",
                    reason,
                })
        }
    }

    //=====================================================================
    // Lifecycle Tests
    //=====================================================================

    #[test]
    fn init_transitions_to_running() {
        let engine = live_engine();
        assert!(engine.is_inited());
        assert!(!engine.is_paused());
        assert_eq!(engine.total_frames(), 0);
        assert!(engine.filesystem().is_some());
        assert!(engine.scheduler().is_ok());
    }

    #[test]
    fn double_init_is_rejected_without_reconstruction() {
        let (constructions, handle) = counter();
        let mut engine = headless_builder()
            .with_subsystem_factory(Box::new(CountingFactory { constructions }))
            .build();

        engine.init().unwrap();
        let err = engine.init();

        assert!(matches!(err, Err(EngineError::InvalidState(_))));
        assert_eq!(handle.get(), 1, "subsystems must not be constructed twice");
    }

    #[test]
    fn tick_before_init_fails() {
        let mut engine = headless_builder().build();
        assert!(matches!(engine.tick(), Err(EngineError::InvalidState(_))));
    }

    #[test]
    fn run_before_init_fails() {
        let mut engine = headless_builder().build();
        assert!(matches!(engine.run(), Err(EngineError::InvalidState(_))));
    }

    #[test]
    fn scheduler_before_init_fails() {
        let engine = headless_builder().build();
        assert!(matches!(engine.scheduler(), Err(EngineError::InvalidState(_))));
    }

    #[test]
    fn failed_graphics_init_rolls_back_and_stays_uninitialized() {
        let mut engine = headless_builder()
            .with_subsystem_factory(Box::new(BrokenGraphicsFactory))
            .build();

        let err = engine.init();

        assert!(matches!(
            err,
            Err(EngineError::InitializationFailure { subsystem: "graphics device", .. })
        ));
        assert!(!engine.is_inited(), "initialized must remain false");
        assert!(engine.filesystem().is_none(), "earlier subsystem must be torn down");
        assert!(engine.scheduler().is_err());
    }

    #[test]
    fn init_close_init_constructs_each_generation_once() {
        let (constructions, handle) = counter();
        let mut engine = headless_builder()
            .with_subsystem_factory(Box::new(CountingFactory { constructions }))
            .build();

        engine.init().unwrap();
        engine.close();
        engine.init().unwrap();

        assert_eq!(handle.get(), 2, "exactly one construction per generation");
        assert!(engine.is_inited());
        assert!(engine.filesystem().is_some(), "second generation must be live");
    }

    #[test]
    fn close_is_idempotent_and_stops_ticking() {
        let mut engine = live_engine();
        engine.tick().unwrap();
        let frames = engine.total_frames();

        engine.close();
        engine.close();

        assert!(!engine.is_inited());
        assert!(engine.filesystem().is_none());
        engine.tick().unwrap();
        assert_eq!(engine.total_frames(), frames, "closed engine must not tick");
    }

    #[test]
    fn tick_after_close_is_a_noop() {
        let mut engine = live_engine();
        engine.close();
        // Closed is observed, not an error: the tick dispatches nothing.
        assert!(engine.tick().is_ok());
        assert_eq!(engine.total_frames(), 0);
    }

    //=====================================================================
    // Pause / Resume Tests
    //=====================================================================

    #[test]
    fn frames_count_only_unpaused_ticks() {
        let mut engine = live_engine();
        engine.tick().unwrap();
        engine.tick().unwrap();
        assert_eq!(engine.total_frames(), 2);

        engine.pause();
        engine.tick().unwrap();
        engine.tick().unwrap();
        engine.tick().unwrap();
        assert_eq!(engine.total_frames(), 2, "paused ticks must not count frames");

        engine.resume();
        engine.tick().unwrap();
        assert_eq!(engine.total_frames(), 3);
    }

    #[test]
    fn pause_and_resume_are_idempotent() {
        let mut engine = live_engine();
        engine.pause();
        engine.pause();
        assert!(engine.is_paused());

        engine.resume();
        engine.resume();
        assert!(!engine.is_paused());

        // Resuming a running engine changes nothing.
        engine.tick().unwrap();
        engine.resume();
        assert_eq!(engine.total_frames(), 1);
    }

    #[test]
    fn paused_ticks_still_dispatch_queued_events() {
        let mut engine = live_engine();
        let (hits, handle) = counter();
        engine.add_event_callback(OsEventKind::Custom, move |_| hits.set(hits.get() + 1));

        engine.pause();
        let proxy = engine.proxy();
        assert!(proxy.post_event(custom_event("ping")));

        engine.tick().unwrap();

        assert_eq!(handle.get(), 1, "queued event must be dispatched while paused");
        assert_eq!(engine.total_frames(), 0, "paused tick must not count a frame");
    }

    #[test]
    fn proxy_pause_and_resume_take_effect_at_tick_boundaries() {
        let mut engine = live_engine();
        let proxy = engine.proxy();

        proxy.request_pause();
        engine.tick().unwrap();
        assert!(engine.is_paused());
        assert_eq!(engine.total_frames(), 0, "pause drained at tick start freezes that tick");

        proxy.request_resume();
        engine.tick().unwrap();
        assert_eq!(engine.total_frames(), 0, "tick that began paused stays paused throughout");
        assert!(!engine.is_paused(), "resume applies at the tick boundary");

        engine.tick().unwrap();
        assert_eq!(engine.total_frames(), 1);
    }

    //=====================================================================
    // Event Dispatch Tests
    //=====================================================================

    #[test]
    fn handle_event_before_init_returns_false() {
        let mut engine = headless_builder().build();
        assert!(!engine.handle_event(&custom_event("ping")));
    }

    #[test]
    fn callback_overwrite_dispatches_latest_only() {
        let mut engine = live_engine();
        let (first, first_handle) = counter();
        let (second, second_handle) = counter();

        engine.add_event_callback(OsEventKind::Custom, move |_| first.set(first.get() + 1));
        engine.add_event_callback(OsEventKind::Custom, move |_| second.set(second.get() + 1));

        assert!(engine.handle_event(&custom_event("ping")));

        assert_eq!(first_handle.get(), 0, "overwritten callback must never fire");
        assert_eq!(second_handle.get(), 1);
    }

    #[test]
    fn removed_callback_is_not_consumed() {
        let mut engine = live_engine();
        let (hits, handle) = counter();
        engine.add_event_callback(OsEventKind::Custom, move |_| hits.set(hits.get() + 1));
        engine.remove_event_callback(OsEventKind::Custom);

        assert!(!engine.handle_event(&custom_event("ping")));
        assert_eq!(handle.get(), 0);
    }

    #[test]
    fn unconsumed_event_causes_no_state_mutation() {
        let mut engine = live_engine();
        let view_before = engine.view_logical_size();

        assert!(!engine.handle_event(&custom_event("nobody-listens")));

        assert_eq!(engine.total_frames(), 0);
        assert_eq!(engine.view_logical_size(), view_before);
        assert!(engine.is_inited());
        assert!(!engine.is_paused());
    }

    #[test]
    fn touch_events_route_to_the_touch_callback() {
        let mut engine = live_engine();
        let (hits, handle) = counter();
        engine.add_event_callback(OsEventKind::Touch, move |_| hits.set(hits.get() + 1));

        let touch = OsEvent::Touch(TouchOsEvent {
            phase: TouchPhase::Began,
            id: 7,
            x: 10.0,
            y: 20.0,
        });

        assert!(engine.handle_event(&touch));
        assert!(engine.handle_touch_event(&touch));
        assert_eq!(handle.get(), 2);
    }

    #[test]
    fn touch_event_without_callback_is_not_consumed() {
        let mut engine = live_engine();
        let touch = OsEvent::Touch(TouchOsEvent {
            phase: TouchPhase::Ended,
            id: 0,
            x: 0.0,
            y: 0.0,
        });
        assert!(!engine.handle_event(&touch));
    }

    #[test]
    fn keyboard_events_route_to_the_keyboard_callback() {
        let mut engine = live_engine();
        let (hits, handle) = counter();
        engine.add_event_callback(OsEventKind::Keyboard, move |_| hits.set(hits.get() + 1));

        let key = OsEvent::Keyboard(KeyboardOsEvent { key: KeyCode::Space, pressed: true });
        assert!(engine.handle_event(&key));
        assert_eq!(handle.get(), 1);
    }

    #[test]
    fn resize_updates_viewport_and_graphics_surface() {
        let mut engine = live_engine();
        let (hits, handle) = counter();
        engine.add_event_callback(OsEventKind::Window, move |_| hits.set(hits.get() + 1));

        let consumed = engine.handle_event(&OsEvent::Window(WindowOsEvent::Resized {
            width: 1024.0,
            height: 768.0,
        }));

        assert!(consumed);
        assert_eq!(engine.view_logical_size(), ViewLogicalSize::new(1024.0, 768.0));
        assert_eq!(engine.graphics_device().unwrap().surface_size(), (1024.0, 768.0));
        assert_eq!(handle.get(), 1, "app callback fires after internal reactions");
    }

    #[test]
    fn resize_is_consumed_even_without_a_callback() {
        let mut engine = live_engine();
        let consumed = engine.handle_event(&OsEvent::Window(WindowOsEvent::Resized {
            width: 640.0,
            height: 480.0,
        }));
        assert!(consumed, "internal reaction alone consumes a window event");
    }

    #[test]
    fn minimize_pauses_and_restore_resumes() {
        let mut engine = live_engine();

        engine.handle_event(&OsEvent::Window(WindowOsEvent::Minimized));
        assert!(engine.is_paused());

        engine.handle_event(&OsEvent::Window(WindowOsEvent::Restored));
        assert!(!engine.is_paused());
    }

    #[test]
    fn close_requested_invokes_callback_then_closes() {
        let mut engine = live_engine();
        let (hits, handle) = counter();
        engine.add_event_callback(OsEventKind::Window, move |_| hits.set(hits.get() + 1));

        let consumed = engine.handle_event(&OsEvent::Window(WindowOsEvent::CloseRequested));

        assert!(consumed);
        assert_eq!(handle.get(), 1, "app observes the close before teardown");
        assert!(!engine.is_inited());
    }

    #[test]
    fn orientation_change_reaches_the_graphics_device() {
        let mut engine = live_engine();
        engine.handle_event(&OsEvent::Device(DeviceOsEvent::OrientationChanged(
            Orientation::LandscapeLeft,
        )));
        assert_eq!(
            engine.graphics_device().unwrap().orientation(),
            Orientation::LandscapeLeft
        );
    }

    #[test]
    fn memory_warning_purges_caches_before_the_app_callback() {
        let mut engine = live_engine();
        engine
            .resource_manager_mut()
            .unwrap()
            .register("level-atlas", ResourceKind::Texture);

        let (hits, handle) = counter();
        engine.add_event_callback(OsEventKind::Device, move |_| hits.set(hits.get() + 1));

        assert!(engine.handle_event(&OsEvent::Device(DeviceOsEvent::MemoryWarning)));

        let resources = engine.resource_manager().unwrap();
        assert!(!resources.contains("level-atlas"), "cache must be purged");
        assert!(resources.contains("white-texture"), "builtins survive the purge");
        assert_eq!(engine.script_engine().unwrap().gc_cycles(), 1);
        assert_eq!(handle.get(), 1);
    }

    //=====================================================================
    // Frame Pacing Tests
    //=====================================================================

    #[test]
    fn thirty_fps_preference_yields_expected_period() {
        let mut engine = live_engine();
        engine.set_preferred_frames_per_second(30).unwrap();
        assert!((engine.preferred_nanos_per_frame() - 33_333_333).abs() <= 1);
    }

    #[test]
    fn invalid_fps_is_rejected_and_pacing_unchanged() {
        let mut engine = live_engine();
        engine.set_preferred_frames_per_second(30).unwrap();
        let before = engine.preferred_nanos_per_frame();

        assert!(matches!(
            engine.set_preferred_frames_per_second(0),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            engine.set_preferred_frames_per_second(-60),
            Err(EngineError::InvalidArgument(_))
        ));
        assert_eq!(engine.preferred_nanos_per_frame(), before);
    }

    //=====================================================================
    // Restart Tests
    //=====================================================================

    #[test]
    fn restart_before_init_fails() {
        let mut engine = headless_builder().build();
        assert!(matches!(engine.restart(), Err(EngineError::InvalidState(_))));
    }

    #[test]
    fn restart_matches_close_then_init() {
        let mut restarted = live_engine();
        restarted.set_preferred_frames_per_second(30).unwrap();
        restarted.add_event_callback(OsEventKind::Custom, |_| {});
        restarted.tick().unwrap();
        restarted.restart().unwrap();

        let mut reopened = live_engine();
        reopened.set_preferred_frames_per_second(30).unwrap();
        reopened.add_event_callback(OsEventKind::Custom, |_| {});
        reopened.tick().unwrap();
        reopened.close();
        reopened.init().unwrap();

        for engine in [&mut restarted, &mut reopened] {
            assert!(engine.is_inited());
            assert_eq!(engine.total_frames(), 0, "frame counter resets");
            assert_eq!(
                engine.preferred_nanos_per_frame(),
                timing::NANOSECONDS_60FPS,
                "pacing resets to the configured preference"
            );
            assert!(
                !engine.handle_event(&custom_event("ping")),
                "callback registry is cleared"
            );
            assert!(engine.scheduler().unwrap().borrow().is_empty());
        }
    }

    #[test]
    fn restart_returns_the_inner_init_status() {
        let generations = Rc::new(Cell::new(0u32));
        let mut engine = headless_builder()
            .with_subsystem_factory(Box::new(FlakySecondGenerationFactory {
                generations: Rc::clone(&generations),
            }))
            .build();

        engine.init().unwrap();
        let err = engine.restart();

        assert!(matches!(err, Err(EngineError::InitializationFailure { .. })));
        assert!(!engine.is_inited(), "failed restart leaves the engine uninitialized");
    }

    #[test]
    fn restart_requested_mid_tick_defers_to_the_tick_boundary() {
        let mut engine = live_engine();
        let proxy = engine.proxy();
        let (ran, ran_handle) = counter();

        engine
            .scheduler()
            .unwrap()
            .borrow_mut()
            .schedule_once(Duration::ZERO, move |_| {
                ran.set(ran.get() + 1);
                proxy.request_restart();
            });

        engine.tick().unwrap();

        assert_eq!(ran_handle.get(), 1, "the tick body ran to completion");
        assert!(engine.is_inited(), "restart executed after the tick");
        assert_eq!(engine.total_frames(), 0, "fresh generation resets the counter");
        assert!(
            engine.scheduler().unwrap().borrow().is_empty(),
            "restart rebuilt the scheduler"
        );
    }

    //=====================================================================
    // Run Loop Tests
    //=====================================================================

    #[test]
    fn run_loops_until_a_close_signal() {
        let mut engine = headless_builder().with_preferred_fps(1000).build();
        engine.init().unwrap();

        let proxy = engine.proxy();
        engine
            .scheduler()
            .unwrap()
            .borrow_mut()
            .schedule_once(Duration::from_millis(1), move |_| {
                proxy.request_close();
            });

        engine.run().unwrap();

        assert!(!engine.is_inited(), "run returns once the engine closed");
        assert!(engine.total_frames() >= 1, "at least one tick executed");
    }

    //=====================================================================
    // Contract Tests
    //=====================================================================

    #[test]
    fn lifecycle_contract_is_object_safe() {
        let mut engine: Box<dyn EngineLifecycle> = Box::new(headless_builder().build());
        engine.init().unwrap();
        assert!(engine.is_inited());
        assert_eq!(engine.total_frames(), 0);
        engine.close();
        assert!(!engine.is_inited());
    }
}
