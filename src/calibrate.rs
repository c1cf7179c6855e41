//! Surface calibration
//!
//! Derives the backing pixel resolution of the drawing surface from
//! its logical (compositor-reported) size and the host scale factor,
//! behind a small capability trait so the core never touches a
//! Wayland type.

use crate::session::Point;
use log::info;

/// What the calibrator needs from a host surface.
pub trait HostSurface {
    /// Current displayed size in logical units.
    fn logical_size(&self) -> (u32, u32);

    /// Host pixel-density factor, if the host reports one.
    fn scale_factor(&self) -> Option<f64>;

    /// Resize the backing pixel store. Wipes any previously drawn
    /// pixels.
    fn set_backing_size(&mut self, width: u32, height: u32);
}

/// A snapshot of the surface geometry, rebuilt wholesale on every
/// recalibration.
#[derive(Debug, Clone, Copy)]
pub struct Calibration {
    logical_width: u32,
    logical_height: u32,
    scale: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new(0, 0, 1.0)
    }
}

impl Calibration {
    pub fn new(logical_width: u32, logical_height: u32, scale: f64) -> Self {
        Self {
            logical_width,
            logical_height,
            scale,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Backing pixel dimensions: logical size times scale factor.
    pub fn pixel_size(&self) -> (u32, u32) {
        let width = (self.logical_width as f64 * self.scale).round() as u32;
        let height = (self.logical_height as f64 * self.scale).round() as u32;
        (width, height)
    }

    /// Map a surface-local logical position onto backing pixels.
    pub fn to_surface(&self, position: (f64, f64)) -> Point {
        Point {
            x: (position.0 * self.scale).round() as i32,
            y: (position.1 * self.scale).round() as i32,
        }
    }
}

/// Read the surface geometry and resize its backing store to match.
/// A missing scale factor degrades to 1.0; nothing here can fail.
pub fn calibrate(surface: &mut impl HostSurface) -> Calibration {
    let (logical_width, logical_height) = surface.logical_size();
    let scale = surface.scale_factor().unwrap_or(1.0);
    let calibration = Calibration::new(logical_width, logical_height, scale);
    let (width, height) = calibration.pixel_size();
    surface.set_backing_size(width, height);
    info!(
        "calibrated surface: {}x{} logical at scale {} -> {}x{} px",
        logical_width, logical_height, scale, width, height
    );
    calibration
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Backing {
        logical: (u32, u32),
        scale: Option<f64>,
        resized_to: Option<(u32, u32)>,
    }

    impl HostSurface for Backing {
        fn logical_size(&self) -> (u32, u32) {
            self.logical
        }

        fn scale_factor(&self) -> Option<f64> {
            self.scale
        }

        fn set_backing_size(&mut self, width: u32, height: u32) {
            self.resized_to = Some((width, height));
        }
    }

    #[test]
    fn backing_size_is_logical_times_scale() {
        let mut surface = Backing {
            logical: (640, 480),
            scale: Some(2.0),
            resized_to: None,
        };
        let calibration = calibrate(&mut surface);
        assert_eq!(surface.resized_to, Some((1280, 960)));
        assert_eq!(calibration.pixel_size(), (1280, 960));
    }

    #[test]
    fn missing_scale_factor_defaults_to_one() {
        let mut surface = Backing {
            logical: (800, 600),
            scale: None,
            resized_to: None,
        };
        let calibration = calibrate(&mut surface);
        assert_eq!(calibration.scale(), 1.0);
        assert_eq!(surface.resized_to, Some((800, 600)));
    }

    #[test]
    fn positions_round_to_nearest_pixel() {
        let calibration = Calibration::new(100, 100, 2.0);
        assert_eq!(calibration.to_surface((5.0, 5.0)), Point::new(10, 10));
        assert_eq!(calibration.to_surface((5.3, 5.8)), Point::new(11, 12));
    }
}
