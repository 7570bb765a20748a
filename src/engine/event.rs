//=========================================================================
// OS Event Types
//
// Abstract platform events consumed by the engine's dispatch layer.
// The platform driver (or any embedder) translates OS-native events into
// these types; the engine only defines routing, not wire format.
//
// Every event carries a discriminant (`OsEventKind`) used for routing:
// - Window  → internal window dispatcher (resize, visibility, close)
// - Device  → internal device dispatcher (memory pressure, orientation)
// - Touch   → touch-specific application callback, bypassing the rest
// - Keyboard / Mouse / Custom → application callback only
//
//=========================================================================

//=== OsEventKind =========================================================

/// Routing discriminant for platform events.
///
/// Application callbacks are registered per kind — at most one callback
/// per kind at a time (last registration wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsEventKind {
    Window,
    Device,
    Touch,
    Keyboard,
    Mouse,
    Custom,
}

//=== Payload Types =======================================================

/// Window-level events with engine-internal reactions.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowOsEvent {
    /// Logical (DPI-independent) size change.
    Resized { width: f32, height: f32 },
    Minimized,
    Restored,
    Shown,
    Hidden,
    CloseRequested,
}

/// Device-level events with engine-internal reactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOsEvent {
    /// OS reports memory pressure; the engine purges caches before the
    /// application callback observes the event.
    MemoryWarning,
    OrientationChanged(Orientation),
}

/// Physical device orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

/// Touch lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// A single touch point event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchOsEvent {
    pub phase: TouchPhase,
    /// Stable identifier for the finger across its Began..Ended arc.
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

/// Physical keyboard key, simplified and cross-platform.
///
/// The engine does not interpret keys; they are routed straight to the
/// application callback. Only keys the control core itself could ever
/// care about are named, everything else maps to `Unidentified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Space,
    Enter,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Unidentified,
}

/// Keyboard key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardOsEvent {
    pub key: KeyCode,
    pub pressed: bool,
}

/// Physical mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

/// Mouse events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseOsEvent {
    ButtonDown(MouseButton),
    ButtonUp(MouseButton),
    Moved { x: f32, y: f32 },
    Wheel { dx: f32, dy: f32 },
}

/// Application-defined event, routed purely by registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomOsEvent {
    pub name: String,
}

//=== OsEvent =============================================================

/// An abstract platform event.
///
/// The tagged union is the dispatch table key: `kind()` yields the
/// discriminant the engine routes on.
#[derive(Debug, Clone, PartialEq)]
pub enum OsEvent {
    Window(WindowOsEvent),
    Device(DeviceOsEvent),
    Touch(TouchOsEvent),
    Keyboard(KeyboardOsEvent),
    Mouse(MouseOsEvent),
    Custom(CustomOsEvent),
}

impl OsEvent {
    /// Routing discriminant for this event.
    pub fn kind(&self) -> OsEventKind {
        match self {
            Self::Window(_) => OsEventKind::Window,
            Self::Device(_) => OsEventKind::Device,
            Self::Touch(_) => OsEventKind::Touch,
            Self::Keyboard(_) => OsEventKind::Keyboard,
            Self::Mouse(_) => OsEventKind::Mouse,
            Self::Custom(_) => OsEventKind::Custom,
        }
    }
}

//=== ViewLogicalSize =====================================================

/// Logical (DPI-independent) viewport size.
///
/// Updated only in response to window-resize events; layout-dependent
/// subsystems read it through the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewLogicalSize {
    pub width: f32,
    pub height: f32,
}

impl ViewLogicalSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
