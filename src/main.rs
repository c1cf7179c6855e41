mod app;
mod pointer;
mod wayland;

use app::AppData;
use log::info;
use sketch_overlay::SketchConfig;
use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    registry::RegistryState,
    seat::SeatState,
    shell::wlr_layer::{Layer, LayerShell},
    shm::{slot::SlotPool, Shm},
};
use wayland_client::{globals::registry_queue_init, Connection};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting sketch-overlay");

    let config = SketchConfig::load_from_file().unwrap_or_default();
    info!("Configuration loaded");

    let conn = Connection::connect_to_env()?;
    let (globals, mut event_queue) = registry_queue_init(&conn)?;
    let qh = event_queue.handle();

    let compositor = CompositorState::bind(&globals, &qh)?;
    let layer_shell = LayerShell::bind(&globals, &qh)?;
    let shm = Shm::bind(&globals, &qh)?;
    let seat_state = SeatState::new(&globals, &qh);

    // The pool grows on demand once the surface size is known.
    let pool = SlotPool::new(4096, &shm)?;

    let surface = compositor.create_surface(&qh);
    let layer_surface =
        layer_shell.create_layer_surface(&qh, surface, Layer::Overlay, Some("sketch-overlay"), None);

    let mut app_data = AppData::new(
        RegistryState::new(&globals),
        OutputState::new(&globals, &qh),
        seat_state,
        shm,
        layer_surface,
        pool,
        config,
    );

    info!("Entering event loop");
    loop {
        event_queue.blocking_dispatch(&mut app_data)?;
        if app_data.should_exit() {
            info!("Shutting down");
            break;
        }
    }

    Ok(())
}
