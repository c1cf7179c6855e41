//! Incremental stroke rendering
//!
//! Walks the segment store once per tick and strokes exactly the line
//! pieces that have not been committed to the canvas yet. Skipping
//! already-drawn points keeps a tick at O(new points) instead of
//! O(total points), no matter how long the session runs.

use crate::session::{Point, SegmentStore};

/// Drawing primitives the renderer needs from a raster target.
/// Style (colors, pen width) belongs to the implementation.
pub trait DrawSurface {
    /// Backing store dimensions in pixels.
    fn pixel_size(&self) -> (u32, u32);

    /// Stroke a straight line between two surface points.
    fn stroke_line(&mut self, from: Point, to: Point);

    /// Stamp a filled circle.
    fn fill_circle(&mut self, center: Point, radius: u32);
}

/// Renders undrawn stroke geometry plus one fixed center marker per
/// pass. The marker is a static overlay, not stroke data.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub marker_radius: u32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self { marker_radius: 10 }
    }
}

impl Renderer {
    pub fn new(marker_radius: u32) -> Self {
        Self { marker_radius }
    }

    /// One render pass. Flips `drawn` on every point it visits; a
    /// segment's first point only moves the pen, so a one-point
    /// segment (a tap) leaves no stroke.
    pub fn render(&self, store: &mut SegmentStore, surface: &mut impl DrawSurface) {
        for segment in store.segments_mut() {
            let mut last_point: Option<Point> = None;
            for (index, captured) in segment.points_mut().iter_mut().enumerate() {
                if captured.drawn {
                    last_point = Some(captured.point);
                    continue;
                }
                if index == 0 {
                    captured.drawn = true;
                    last_point = Some(captured.point);
                    continue;
                }
                if let Some(from) = last_point {
                    // A degenerate zero-length piece (tap gestures)
                    // leaves no visible mark; skip the stroke call.
                    if from != captured.point {
                        surface.stroke_line(from, captured.point);
                    }
                }
                captured.drawn = true;
                last_point = Some(captured.point);
            }
        }

        let (width, height) = surface.pixel_size();
        let center = Point::new(width as i32 / 2, height as i32 / 2);
        surface.fill_circle(center, self.marker_radius);
    }
}
