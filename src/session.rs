//! Freehand capture state for one sketch session
//!
//! A session owns the segment store (one segment per
//! pointer-down..pointer-up gesture), the active-pointer state and the
//! pending-recalibration flag. Input handlers and the frame tick both
//! run on the event loop thread, so there is no locking anywhere here.

use crate::calibrate::{self, Calibration, HostSurface};
use crate::render::{DrawSurface, Renderer};
use log::debug;

/// A coordinate in surface space, after scale conversion.
///
/// Not clamped to the canvas; out-of-bounds points are recorded and
/// simply rasterize as no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A captured point plus whether the renderer has committed it to the
/// canvas. `drawn` is flipped by the renderer only.
#[derive(Debug, Clone)]
pub struct CapturedPoint {
    pub point: Point,
    pub drawn: bool,
}

impl CapturedPoint {
    fn new(point: Point) -> Self {
        Self {
            point,
            drawn: false,
        }
    }
}

/// One continuous gesture as an append-only, chronological point list.
#[derive(Debug, Clone, Default)]
pub struct Segment {
    points: Vec<CapturedPoint>,
}

impl Segment {
    pub fn points(&self) -> &[CapturedPoint] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [CapturedPoint] {
        &mut self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Ordered collection of segments, insertion order = creation order.
/// Never evicts; history lives for the whole session.
#[derive(Debug, Default)]
pub struct SegmentStore {
    segments: Vec<Segment>,
}

impl SegmentStore {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn begin_segment(&mut self, point: Point) {
        self.segments.push(Segment {
            points: vec![CapturedPoint::new(point)],
        });
    }

    fn append_point(&mut self, point: Point) {
        match self.segments.last_mut() {
            Some(segment) => segment.points.push(CapturedPoint::new(point)),
            // Keeps the operation total: with no segment yet, the
            // point opens one instead of being lost.
            None => self.begin_segment(point),
        }
    }

    fn mark_all_undrawn(&mut self) {
        for segment in &mut self.segments {
            for captured in &mut segment.points {
                captured.drawn = false;
            }
        }
    }
}

/// What a pointer event did, independent of any host event API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Motion,
    Release,
}

/// Minimal pointer event contract fed to the session by the host.
/// Positions are surface-local logical coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PointerInput {
    pub position: (f64, f64),
    pub kind: PointerKind,
}

/// Capture and scheduling state for one sketch session.
pub struct Session {
    store: SegmentStore,
    calibration: Calibration,
    pointer_down: bool,
    start_new_segment: bool,
    needs_recalibration: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            store: SegmentStore::default(),
            calibration: Calibration::default(),
            pointer_down: false,
            start_new_segment: true,
            // First tick always calibrates.
            needs_recalibration: true,
        }
    }

    pub fn store(&self) -> &SegmentStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut SegmentStore {
        &mut self.store
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    /// Coalescing trigger: any number of requests between ticks result
    /// in exactly one calibration on the next tick.
    pub fn request_recalibration(&mut self) {
        self.needs_recalibration = true;
    }

    pub fn needs_recalibration(&self) -> bool {
        self.needs_recalibration
    }

    /// Feed one pointer event. Motion is dropped unless a press is
    /// active; a press always opens a new segment.
    pub fn handle_pointer(&mut self, input: PointerInput) {
        match input.kind {
            PointerKind::Press => {
                self.pointer_down = true;
                self.start_new_segment = true;
                let point = self.calibration.to_surface(input.position);
                self.register_point(point);
                debug!("gesture started at {:?}", point);
            }
            PointerKind::Motion => {
                if self.pointer_down {
                    let point = self.calibration.to_surface(input.position);
                    self.register_point(point);
                }
            }
            PointerKind::Release => {
                let point = self.calibration.to_surface(input.position);
                self.register_point(point);
                self.pointer_down = false;
                debug!(
                    "gesture ended, {} segments captured",
                    self.store.len()
                );
            }
        }
    }

    fn register_point(&mut self, point: Point) {
        if self.start_new_segment {
            self.store.begin_segment(point);
            self.start_new_segment = false;
        } else {
            self.store.append_point(point);
        }
    }

    /// One frame tick: at most one calibration, then one render pass.
    ///
    /// Calibration reallocates the backing store, wiping its pixels,
    /// so every `drawn` flag is reset to force a full redraw of the
    /// fresh canvas. Re-registering for the next tick is the host's
    /// job after this returns.
    pub fn tick<S>(&mut self, surface: &mut S, renderer: &Renderer)
    where
        S: HostSurface + DrawSurface,
    {
        if self.needs_recalibration {
            self.calibration = calibrate::calibrate(surface);
            self.store.mark_all_undrawn();
            self.needs_recalibration = false;
            debug!("recalibrated: {:?}", self.calibration);
        }
        renderer.render(&mut self.store, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Renderer;

    fn session_at_scale(scale: f64) -> Session {
        let mut session = Session::new();
        session.calibration = Calibration::new(100, 100, scale);
        session.needs_recalibration = false;
        session
    }

    fn press(x: f64, y: f64) -> PointerInput {
        PointerInput {
            position: (x, y),
            kind: PointerKind::Press,
        }
    }

    fn motion(x: f64, y: f64) -> PointerInput {
        PointerInput {
            position: (x, y),
            kind: PointerKind::Motion,
        }
    }

    fn release(x: f64, y: f64) -> PointerInput {
        PointerInput {
            position: (x, y),
            kind: PointerKind::Release,
        }
    }

    /// Fake host surface that counts calibrations and records draws.
    #[derive(Default)]
    struct FakeSurface {
        logical: (u32, u32),
        scale: Option<f64>,
        backing: (u32, u32),
        calibrations: usize,
        strokes: Vec<(Point, Point)>,
        markers: usize,
    }

    impl HostSurface for FakeSurface {
        fn logical_size(&self) -> (u32, u32) {
            self.logical
        }

        fn scale_factor(&self) -> Option<f64> {
            self.scale
        }

        fn set_backing_size(&mut self, width: u32, height: u32) {
            self.backing = (width, height);
            self.calibrations += 1;
        }
    }

    impl DrawSurface for FakeSurface {
        fn pixel_size(&self) -> (u32, u32) {
            self.backing
        }

        fn stroke_line(&mut self, from: Point, to: Point) {
            self.strokes.push((from, to));
        }

        fn fill_circle(&mut self, _center: Point, _radius: u32) {
            self.markers += 1;
        }
    }

    #[test]
    fn gesture_yields_one_segment_with_all_points() {
        let mut session = session_at_scale(1.0);

        session.handle_pointer(press(0.0, 0.0));
        for i in 1..=5 {
            session.handle_pointer(motion(i as f64, 0.0));
        }
        session.handle_pointer(release(6.0, 0.0));

        assert_eq!(session.store().len(), 1);
        let points = session.store().segments()[0].points();
        assert_eq!(points.len(), 7);
        for (i, captured) in points.iter().enumerate() {
            assert_eq!(captured.point, Point::new(i as i32, 0));
            assert!(!captured.drawn);
        }
    }

    #[test]
    fn motion_without_press_captures_nothing() {
        let mut session = session_at_scale(1.0);
        session.handle_pointer(motion(3.0, 4.0));
        assert!(session.store().is_empty());
    }

    #[test]
    fn motion_after_release_captures_nothing() {
        let mut session = session_at_scale(1.0);
        session.handle_pointer(press(0.0, 0.0));
        session.handle_pointer(release(1.0, 0.0));
        session.handle_pointer(motion(2.0, 0.0));
        assert_eq!(session.store().segments()[0].len(), 2);
    }

    #[test]
    fn two_taps_make_two_segments() {
        let mut session = session_at_scale(1.0);
        session.handle_pointer(press(1.0, 1.0));
        session.handle_pointer(release(1.0, 1.0));
        session.handle_pointer(press(5.0, 5.0));
        session.handle_pointer(release(5.0, 5.0));

        assert_eq!(session.store().len(), 2);
        // The release lands in the segment opened by its press.
        assert_eq!(session.store().segments()[0].len(), 2);
        assert_eq!(session.store().segments()[1].len(), 2);
    }

    #[test]
    fn positions_are_scaled_to_surface_pixels() {
        let mut session = session_at_scale(2.0);
        session.handle_pointer(press(5.0, 5.0));
        let points = session.store().segments()[0].points();
        assert_eq!(points[0].point, Point::new(10, 10));
    }

    #[test]
    fn stray_release_opens_a_segment() {
        let mut session = session_at_scale(1.0);
        session.handle_pointer(release(2.0, 3.0));
        assert_eq!(session.store().len(), 1);
        assert_eq!(session.store().segments()[0].len(), 1);
    }

    #[test]
    fn tick_calibrates_once_despite_many_requests() {
        let mut session = Session::new();
        let mut surface = FakeSurface {
            logical: (40, 30),
            scale: Some(2.0),
            ..Default::default()
        };
        session.request_recalibration();
        session.request_recalibration();
        session.request_recalibration();

        session.tick(&mut surface, &Renderer::default());
        assert_eq!(surface.calibrations, 1);
        assert_eq!(surface.backing, (80, 60));

        // Steady state: no further calibration.
        session.tick(&mut surface, &Renderer::default());
        assert_eq!(surface.calibrations, 1);
    }

    #[test]
    fn recalibration_redraws_committed_strokes() {
        let mut session = Session::new();
        let mut surface = FakeSurface {
            logical: (100, 100),
            scale: Some(1.0),
            ..Default::default()
        };
        let renderer = Renderer::default();

        session.tick(&mut surface, &renderer);
        session.handle_pointer(press(0.0, 0.0));
        session.handle_pointer(release(10.0, 0.0));
        session.tick(&mut surface, &renderer);
        assert_eq!(surface.strokes.len(), 1);

        // Nothing new: the stroke is not repeated.
        session.tick(&mut surface, &renderer);
        assert_eq!(surface.strokes.len(), 1);

        // A resize clears the backing store; the stroke comes back.
        session.request_recalibration();
        session.tick(&mut surface, &renderer);
        assert_eq!(surface.calibrations, 2);
        assert_eq!(surface.strokes.len(), 2);
        assert_eq!(
            surface.strokes[1],
            (Point::new(0, 0), Point::new(10, 0))
        );
    }
}
