//=========================================================================
// Platform Event Mapper
//
// Converts Winit window events into the engine's abstract `OsEvent`
// representation. Keeps the engine independent of the windowing
// library: routing sees only the engine's own event taxonomy.
//
// Responsibilities:
// - Translate window lifecycle events (resize, occlusion, close)
// - Translate touch, keyboard and mouse input
// - Convert physical coordinates to logical (DPI-independent) units
// - Drop Winit events the engine has no routing for
//
//=========================================================================

use winit::event::{
    ElementState, KeyEvent, MouseButton as WinitMouseButton, MouseScrollDelta,
    TouchPhase as WinitTouchPhase, WindowEvent,
};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

use crate::engine::event::{
    KeyCode, KeyboardOsEvent, MouseButton, MouseOsEvent, OsEvent, TouchOsEvent, TouchPhase,
    WindowOsEvent,
};

//=== Button / Phase Conversion ===========================================

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

impl From<WinitTouchPhase> for TouchPhase {
    fn from(phase: WinitTouchPhase) -> Self {
        match phase {
            WinitTouchPhase::Started => TouchPhase::Began,
            WinitTouchPhase::Moved => TouchPhase::Moved,
            WinitTouchPhase::Ended => TouchPhase::Ended,
            WinitTouchPhase::Cancelled => TouchPhase::Cancelled,
        }
    }
}

//=== Key Conversion ======================================================
//
// Only the keys the engine names get a mapping; everything else falls
// back to `Unidentified` and is still routed to the keyboard callback.
//

pub(crate) fn map_key(physical_key: PhysicalKey) -> KeyCode {
    let PhysicalKey::Code(code) = physical_key else {
        return KeyCode::Unidentified;
    };
    match code {
        WinitKeyCode::Escape => KeyCode::Escape,
        WinitKeyCode::Space => KeyCode::Space,
        WinitKeyCode::Enter => KeyCode::Enter,
        WinitKeyCode::ArrowUp => KeyCode::ArrowUp,
        WinitKeyCode::ArrowDown => KeyCode::ArrowDown,
        WinitKeyCode::ArrowLeft => KeyCode::ArrowLeft,
        WinitKeyCode::ArrowRight => KeyCode::ArrowRight,
        _ => KeyCode::Unidentified,
    }
}

//=== Window Event Conversion =============================================

/// Translates a Winit window event into an engine event.
///
/// `scale_factor` converts physical pixels to logical units. Returns
/// `None` for Winit events the engine does not route.
pub(crate) fn map_window_event(event: &WindowEvent, scale_factor: f64) -> Option<OsEvent> {
    match event {
        //--- Window lifecycle ---------------------------------------------
        WindowEvent::Resized(size) => {
            let logical = size.to_logical::<f32>(scale_factor);
            Some(OsEvent::Window(WindowOsEvent::Resized {
                width: logical.width,
                height: logical.height,
            }))
        }
        WindowEvent::CloseRequested => Some(OsEvent::Window(WindowOsEvent::CloseRequested)),
        WindowEvent::Occluded(true) => Some(OsEvent::Window(WindowOsEvent::Hidden)),
        WindowEvent::Occluded(false) => Some(OsEvent::Window(WindowOsEvent::Shown)),

        //--- Touch ----------------------------------------------------------
        WindowEvent::Touch(touch) => {
            let location = touch.location.to_logical::<f32>(scale_factor);
            Some(OsEvent::Touch(TouchOsEvent {
                phase: touch.phase.into(),
                id: touch.id,
                x: location.x,
                y: location.y,
            }))
        }

        //--- Keyboard ---------------------------------------------------------
        WindowEvent::KeyboardInput {
            event: KeyEvent { physical_key, state, .. },
            ..
        } => Some(OsEvent::Keyboard(KeyboardOsEvent {
            key: map_key(*physical_key),
            pressed: *state == ElementState::Pressed,
        })),

        //--- Mouse ------------------------------------------------------------
        WindowEvent::MouseInput { state, button, .. } => {
            let button = MouseButton::from(*button);
            Some(OsEvent::Mouse(match state {
                ElementState::Pressed => MouseOsEvent::ButtonDown(button),
                ElementState::Released => MouseOsEvent::ButtonUp(button),
            }))
        }
        WindowEvent::CursorMoved { position, .. } => {
            let logical = position.to_logical::<f32>(scale_factor);
            Some(OsEvent::Mouse(MouseOsEvent::Moved { x: logical.x, y: logical.y }))
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let (dx, dy) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                MouseScrollDelta::PixelDelta(pos) => (pos.x as f32, pos.y as f32),
            };
            Some(OsEvent::Mouse(MouseOsEvent::Wheel { dx, dy }))
        }

        //--- Unrouted ------------------------------------------------------
        _ => None,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
