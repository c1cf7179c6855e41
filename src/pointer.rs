//! Pointer (mouse) event handling for sketch-overlay
//!
//! Translates smithay's pointer frames into the core's own event
//! contract so the capture session never sees a Wayland type. Only
//! the left button draws; a single pointer stream is assumed.

use crate::app::AppData;
use log::debug;
use sketch_overlay::session::{PointerInput, PointerKind};
use smithay_client_toolkit::seat::pointer::{PointerEvent, PointerEventKind, BTN_LEFT};

pub fn handle_pointer_events(events: &[PointerEvent], app: &mut AppData) {
    for event in events {
        let kind = match event.kind {
            PointerEventKind::Press { button, .. } if button == BTN_LEFT => PointerKind::Press,
            PointerEventKind::Release { button, .. } if button == BTN_LEFT => PointerKind::Release,
            PointerEventKind::Motion { .. } => PointerKind::Motion,
            PointerEventKind::Enter { .. } => {
                debug!(
                    "Pointer entered surface at ({:.2}, {:.2})",
                    event.position.0, event.position.1
                );
                continue;
            }
            PointerEventKind::Leave { .. } => {
                debug!("Pointer left surface");
                continue;
            }
            _ => continue,
        };

        app.session_mut().handle_pointer(PointerInput {
            position: event.position,
            kind,
        });
    }
}
