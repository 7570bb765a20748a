//=========================================================================
// Graphics Device Subsystem
//
// Lifecycle-visible surface of the graphics device: backend selection,
// surface size tracking, and reactions to window/device events. The
// rendering pipeline itself lives behind this facade and is out of
// scope for the control core.
//
//=========================================================================

use log::{debug, info};

use crate::engine::event::Orientation;

//=== GraphicsBackend =====================================================

/// Requested graphics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphicsBackend {
    /// Pick the platform's preferred backend.
    #[default]
    Auto,
    Vulkan,
    Metal,
    OpenGl,
    /// No presentation surface; used by tools and tests.
    Headless,
}

//=== GraphicsDevice ======================================================

/// Engine-owned graphics device handle.
pub struct GraphicsDevice {
    backend: GraphicsBackend,
    surface_width: f32,
    surface_height: f32,
    orientation: Orientation,
    live: bool,
}

impl GraphicsDevice {
    /// Probes and opens the requested backend.
    ///
    /// `Auto` resolves to the platform's preferred backend. The probe
    /// reports failure as a string so the caller can wrap it into its
    /// own error type.
    pub fn new(backend: GraphicsBackend, width: f32, height: f32) -> Result<Self, String> {
        let backend = match backend {
            GraphicsBackend::Auto => Self::platform_default_backend(),
            other => other,
        };
        info!(target: "subsystems", "GraphicsDevice opened ({:?}, {}x{})", backend, width, height);
        Ok(Self {
            backend,
            surface_width: width,
            surface_height: height,
            orientation: Orientation::Portrait,
            live: true,
        })
    }

    fn platform_default_backend() -> GraphicsBackend {
        if cfg!(target_os = "macos") || cfg!(target_os = "ios") {
            GraphicsBackend::Metal
        } else {
            GraphicsBackend::Vulkan
        }
    }

    //--- Event Reactions -----------------------------------------------------

    /// Resizes the presentation surface (logical units).
    pub fn on_surface_resized(&mut self, width: f32, height: f32) {
        debug!(target: "subsystems", "Surface resized to {}x{}", width, height);
        self.surface_width = width;
        self.surface_height = height;
    }

    /// Records a device orientation change.
    pub fn on_orientation_changed(&mut self, orientation: Orientation) {
        debug!(target: "subsystems", "Orientation changed to {:?}", orientation);
        self.orientation = orientation;
    }

    //--- Queries --------------------------------------------------------------

    pub fn backend(&self) -> GraphicsBackend {
        self.backend
    }

    pub fn surface_size(&self) -> (f32, f32) {
        (self.surface_width, self.surface_height)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    //--- Teardown --------------------------------------------------------------

    /// Releases the device. Fails if it was already released.
    pub fn shutdown(&mut self) -> Result<(), String> {
        if !self.live {
            return Err("graphics device already released".into());
        }
        debug!(target: "subsystems", "GraphicsDevice released");
        self.live = false;
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_backend_resolves_to_concrete_backend() {
        let device = GraphicsDevice::new(GraphicsBackend::Auto, 800.0, 600.0).unwrap();
        assert_ne!(device.backend(), GraphicsBackend::Auto);
    }

    #[test]
    fn explicit_backend_is_kept() {
        let device = GraphicsDevice::new(GraphicsBackend::Headless, 1.0, 1.0).unwrap();
        assert_eq!(device.backend(), GraphicsBackend::Headless);
    }

    #[test]
    fn resize_updates_surface() {
        let mut device = GraphicsDevice::new(GraphicsBackend::Headless, 800.0, 600.0).unwrap();
        device.on_surface_resized(1024.0, 768.0);
        assert_eq!(device.surface_size(), (1024.0, 768.0));
    }

    #[test]
    fn orientation_change_is_recorded() {
        let mut device = GraphicsDevice::new(GraphicsBackend::Headless, 800.0, 600.0).unwrap();
        device.on_orientation_changed(Orientation::LandscapeLeft);
        assert_eq!(device.orientation(), Orientation::LandscapeLeft);
    }

    #[test]
    fn double_shutdown_is_an_error() {
        let mut device = GraphicsDevice::new(GraphicsBackend::Headless, 1.0, 1.0).unwrap();
        assert!(device.shutdown().is_ok());
        assert!(device.shutdown().is_err());
    }
}
