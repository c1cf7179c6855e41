pub mod calibrate;
pub mod config;
pub mod draw;
pub mod render;
pub mod session;

pub use crate::calibrate::{calibrate, Calibration, HostSurface};
pub use crate::config::SketchConfig;
pub use crate::draw::{Canvas, Palette};
pub use crate::render::{DrawSurface, Renderer};
pub use crate::session::{Point, PointerInput, PointerKind, Session};
