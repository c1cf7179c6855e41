//! Main application state for sketch-overlay
//!
//! `AppData` is the session/context object owned by the event loop:
//! Wayland protocol state, the persistent pixel canvas and the capture
//! session all live here, and the per-frame tick is orchestrated from
//! here.

use log::{debug, info, warn};
use sketch_overlay::calibrate::HostSurface;
use sketch_overlay::draw::Canvas;
use sketch_overlay::render::{DrawSurface, Renderer};
use sketch_overlay::session::{Point, Session};
use sketch_overlay::SketchConfig;
use smithay_client_toolkit::{
    output::OutputState,
    registry::RegistryState,
    seat::SeatState,
    shell::{
        wlr_layer::{Anchor, KeyboardInteractivity, LayerSurface},
        WaylandSurface,
    },
    shm::{slot::SlotPool, Shm},
};
use wayland_client::protocol::{wl_keyboard, wl_pointer, wl_shm};
use wayland_client::QueueHandle;

pub struct AppData {
    registry_state: RegistryState,
    output_state: OutputState,
    seat_state: SeatState,
    shm_state: Shm,
    layer_surface: Option<LayerSurface>,
    pool: SlotPool,
    width: u32,
    height: u32,
    scale: i32,
    configured: bool,
    ticking: bool,
    pointer: Option<wl_pointer::WlPointer>,
    keyboard: Option<wl_keyboard::WlKeyboard>,
    canvas: Canvas,
    session: Session,
    renderer: Renderer,
    exit: bool,
}

/// View of the layer surface that satisfies the core's calibration and
/// drawing contracts: logical geometry from the compositor, pixels
/// from the persistent canvas.
struct SurfaceBacking<'a> {
    canvas: &'a mut Canvas,
    logical: (u32, u32),
    scale: i32,
}

impl HostSurface for SurfaceBacking<'_> {
    fn logical_size(&self) -> (u32, u32) {
        self.logical
    }

    fn scale_factor(&self) -> Option<f64> {
        Some(self.scale as f64)
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.canvas.resize(width, height);
    }
}

impl DrawSurface for SurfaceBacking<'_> {
    fn pixel_size(&self) -> (u32, u32) {
        self.canvas.pixel_size()
    }

    fn stroke_line(&mut self, from: Point, to: Point) {
        self.canvas.stroke_line(from, to);
    }

    fn fill_circle(&mut self, center: Point, radius: u32) {
        self.canvas.fill_circle(center, radius);
    }
}

impl AppData {
    pub fn new(
        registry_state: RegistryState,
        output_state: OutputState,
        seat_state: SeatState,
        shm_state: Shm,
        layer_surface: LayerSurface,
        pool: SlotPool,
        config: SketchConfig,
    ) -> Self {
        info!("Configuring layer surface");
        layer_surface.set_anchor(Anchor::TOP | Anchor::BOTTOM | Anchor::LEFT | Anchor::RIGHT);
        layer_surface.set_keyboard_interactivity(KeyboardInteractivity::OnDemand);
        layer_surface.set_size(0, 0);
        layer_surface.set_exclusive_zone(-1);
        layer_surface.wl_surface().commit();

        Self {
            registry_state,
            output_state,
            seat_state,
            shm_state,
            layer_surface: Some(layer_surface),
            pool,
            width: 0,
            height: 0,
            scale: 1,
            configured: false,
            ticking: false,
            pointer: None,
            keyboard: None,
            canvas: Canvas::new(config.palette()),
            session: Session::new(),
            renderer: Renderer::new(config.marker_radius),
            exit: false,
        }
    }

    /// One frame callback: run the session tick against the canvas,
    /// then hand the result to the compositor and re-register for the
    /// next refresh.
    pub fn tick(&mut self, qh: &QueueHandle<Self>) {
        if !self.configured {
            debug!("tick before surface is configured, skipping");
            return;
        }

        let mut backing = SurfaceBacking {
            canvas: &mut self.canvas,
            logical: (self.width, self.height),
            scale: self.scale,
        };
        self.session.tick(&mut backing, &self.renderer);

        if let Err(err) = self.present(qh) {
            warn!("Failed to present frame: {err}");
        }
    }

    /// Copy the canvas into a fresh shm buffer, attach it and commit,
    /// requesting the next frame callback in the same commit.
    fn present(&mut self, qh: &QueueHandle<Self>) -> Result<(), Box<dyn std::error::Error>> {
        let (width, height) = self.canvas.size();
        if width == 0 || height == 0 {
            return Ok(());
        }

        if let Some(layer_surface) = &self.layer_surface {
            let stride = width as i32 * 4;
            let (buffer, shm_canvas) = self.pool.create_buffer(
                width as i32,
                height as i32,
                stride,
                wl_shm::Format::Argb8888,
            )?;

            let data = self.canvas.data();
            shm_canvas[..data.len()].copy_from_slice(data);

            let surface = layer_surface.wl_surface();
            surface.set_buffer_scale(self.scale);
            buffer.attach_to(surface)?;
            surface.damage_buffer(0, 0, width as i32, height as i32);
            surface.frame(qh, surface.clone());
            surface.commit();
        }

        Ok(())
    }

    /// Compositor-reported size change. Recalibration is deferred to
    /// the next tick, so a burst of configures costs one calibration.
    pub fn handle_resize(&mut self, width: u32, height: u32, qh: &QueueHandle<Self>) {
        // A zero dimension means the compositor left the size to us;
        // keep whatever we had.
        if width != 0 {
            self.width = width;
        }
        if height != 0 {
            self.height = height;
        }
        self.configured = true;
        self.session.request_recalibration();
        info!("Surface configured with size: {}x{}", width, height);

        if !self.ticking {
            self.ticking = true;
            self.tick(qh);
        }
    }

    pub fn set_scale(&mut self, scale: i32) {
        if self.scale == scale {
            return;
        }
        self.scale = scale;
        self.session.request_recalibration();
        info!("Scale factor changed to {}", scale);
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn request_exit(&mut self) {
        self.exit = true;
    }

    pub fn should_exit(&self) -> bool {
        self.exit || self.layer_surface.is_none()
    }

    pub fn registry_state(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }

    pub fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    pub fn seat_state(&mut self) -> &mut SeatState {
        &mut self.seat_state
    }

    pub fn shm_state(&mut self) -> &mut Shm {
        &mut self.shm_state
    }

    pub fn set_pointer(&mut self, pointer: Option<wl_pointer::WlPointer>) {
        self.pointer = pointer;
        info!("Pointer set: {:?}", self.pointer.is_some());
    }

    pub fn set_keyboard(&mut self, keyboard: Option<wl_keyboard::WlKeyboard>) {
        self.keyboard = keyboard;
        info!("Keyboard set: {:?}", self.keyboard.is_some());
    }

    pub fn close_layer_surface(&mut self) {
        self.layer_surface = None;
        info!("Layer surface closed");
    }
}
