//! Software raster canvas
//!
//! Owns the persistent backing pixel store the strokes accumulate in.
//! The shm buffer handed to the compositor each frame is a copy of
//! this canvas, so incremental rendering only ever touches new
//! geometry here. Pixels are ARGB8888 little-endian, i.e. b,g,r,a
//! byte order; the palette converts from the RGBA colors in the
//! config.

use crate::render::DrawSurface;
use crate::session::Point;

/// Fixed drawing style for the session, resolved from the config.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: [u8; 4],
    pub stroke: [u8; 4],
    pub stroke_width: u32,
    pub marker: [u8; 4],
}

/// Convert an RGBA config color to canvas byte order.
pub fn rgba_to_pixel(color: [u8; 4]) -> [u8; 4] {
    [color[2], color[1], color[0], color[3]]
}

pub struct Canvas {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    palette: Palette,
}

impl Canvas {
    pub fn new(palette: Palette) -> Self {
        Self {
            pixels: Vec::new(),
            width: 0,
            height: 0,
            palette,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.pixels
    }

    /// Reallocate the backing store. Everything previously drawn is
    /// gone afterwards.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; (width * height * 4) as usize];
        self.clear();
    }

    pub fn clear(&mut self) {
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&self.palette.background);
        }
    }

    fn put_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = ((y as u32 * self.width + x as u32) * 4) as usize;
        self.pixels[idx..idx + 4].copy_from_slice(&color);
    }

    /// Stamp a square pen of the configured width centered on (x, y).
    fn put_pen(&mut self, x: i32, y: i32, color: [u8; 4]) {
        let half = (self.palette.stroke_width as i32 - 1) / 2;
        let rest = self.palette.stroke_width as i32 - 1 - half;
        for dy in -half..=rest {
            for dx in -half..=rest {
                self.put_pixel(x + dx, y + dy, color);
            }
        }
    }

    /// Bresenham line walk, stamping the pen at every step.
    fn draw_line(&mut self, from: Point, to: Point, color: [u8; 4]) {
        let (mut x0, mut y0) = (from.x, from.y);
        let (x1, y1) = (to.x, to.y);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put_pen(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn draw_circle(&mut self, center: Point, radius: u32, color: [u8; 4]) {
        let r = radius as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.put_pixel(center.x + dx, center.y + dy, color);
                }
            }
        }
    }

    #[cfg(test)]
    fn pixel_at(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

impl DrawSurface for Canvas {
    fn pixel_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn stroke_line(&mut self, from: Point, to: Point) {
        let color = self.palette.stroke;
        self.draw_line(from, to, color);
    }

    fn fill_circle(&mut self, center: Point, radius: u32) {
        let color = self.palette.marker;
        self.draw_circle(center, radius, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: [u8; 4] = [10, 10, 10, 255];
    const STROKE: [u8; 4] = [1, 2, 3, 255];
    const MARKER: [u8; 4] = [9, 9, 9, 255];

    fn canvas(width: u32, height: u32) -> Canvas {
        let mut canvas = Canvas::new(Palette {
            background: BG,
            stroke: STROKE,
            stroke_width: 1,
            marker: MARKER,
        });
        canvas.resize(width, height);
        canvas
    }

    #[test]
    fn resize_clears_to_background() {
        let mut canvas = canvas(4, 3);
        canvas.stroke_line(Point::new(0, 0), Point::new(3, 0));
        canvas.resize(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(canvas.pixel_at(x, y), BG);
            }
        }
    }

    #[test]
    fn line_paints_both_endpoints() {
        let mut canvas = canvas(16, 16);
        canvas.stroke_line(Point::new(2, 3), Point::new(10, 9));
        assert_eq!(canvas.pixel_at(2, 3), STROKE);
        assert_eq!(canvas.pixel_at(10, 9), STROKE);
    }

    #[test]
    fn out_of_bounds_geometry_is_ignored() {
        let mut canvas = canvas(8, 8);
        canvas.stroke_line(Point::new(-5, -5), Point::new(-1, -1));
        canvas.fill_circle(Point::new(100, 100), 3);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(canvas.pixel_at(x, y), BG);
            }
        }
    }

    #[test]
    fn circle_fills_center_and_respects_radius() {
        let mut canvas = canvas(16, 16);
        canvas.fill_circle(Point::new(8, 8), 2);
        assert_eq!(canvas.pixel_at(8, 8), MARKER);
        assert_eq!(canvas.pixel_at(8, 6), MARKER);
        assert_eq!(canvas.pixel_at(8, 5), BG);
    }

    #[test]
    fn wide_pen_covers_neighboring_pixels() {
        let mut canvas = Canvas::new(Palette {
            background: BG,
            stroke: STROKE,
            stroke_width: 3,
            marker: MARKER,
        });
        canvas.resize(16, 16);
        canvas.stroke_line(Point::new(8, 8), Point::new(8, 8));
        assert_eq!(canvas.pixel_at(7, 7), STROKE);
        assert_eq!(canvas.pixel_at(9, 9), STROKE);
        assert_eq!(canvas.pixel_at(5, 8), BG);
    }

    #[test]
    fn rgba_colors_convert_to_argb_bytes() {
        assert_eq!(rgba_to_pixel([1, 2, 3, 4]), [3, 2, 1, 4]);
    }
}
