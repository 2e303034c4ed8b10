//! Info panel, help window and planet labels

use celestial::{Camera, Projection, SimClock, System};
use common::{draw_body_labels, draw_help_window, draw_info_panel, InfoLine};

use crate::Toggles;

const KEY_BINDINGS: &[(&str, &str)] = &[
    ("Mouse drag", "Rotate view"),
    ("Wheel", "Zoom"),
    ("Left / Right", "Yaw"),
    ("Up / Down", "Move forward / back"),
    ("Ctrl + Up / Down", "Pitch"),
    ("Q / E", "Roll"),
    ("Space", "Pause / resume"),
    ("+ / -", "Speed up / slow down"),
    ("I", "Info panel"),
    ("O", "Orbit lines"),
    ("N", "Planet names"),
    ("H", "This help"),
    ("R", "Reset view"),
    ("Esc", "Quit"),
];

/// Read-only view of the app state for one frame of UI
pub struct Frame<'a> {
    pub system: &'a System,
    pub clock: &'a SimClock,
    pub camera: &'a Camera,
    pub projection: &'a Projection,
    pub toggles: &'a Toggles,
}

pub fn draw(ctx: &egui::Context, frame: &Frame<'_>) {
    if frame.toggles.names {
        draw_body_labels(ctx, frame.system.bodies(), frame.camera, frame.projection);
    }

    if frame.toggles.info {
        let rotation = frame.camera.rotation;
        let lines = [
            InfoLine::new("Timestep", format!("{:.3}", frame.clock.dt())),
            InfoLine::new("Elapsed", format!("{:.1}", frame.system.elapsed())),
            InfoLine::new("Planets", frame.system.planets().len().to_string()),
            InfoLine::new("Zoom", format!("{:.1}x", frame.camera.zoom_level())),
            InfoLine::new(
                "Rotation",
                format!("{:.0}° {:.0}° {:.0}°", rotation.x, rotation.y, rotation.z),
            ),
        ];
        draw_info_panel(ctx, "Solar System", frame.clock.is_paused(), &lines);
    }

    if frame.toggles.help {
        draw_help_window(ctx, KEY_BINDINGS);
    }
}
