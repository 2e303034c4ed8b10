//! Info panel, force-model sidebar, help window and body labels

use celestial::{Camera, Projection, SimClock, System};
use common::{draw_body_labels, draw_help_window, draw_info_panel, InfoLine};
use egui::{Color32, Context, RichText};

use crate::Toggles;

/// An equation with its name and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

pub const FORCE_MODEL: &[Equation] = &[
    Equation {
        name: "Schwarzschild Radius",
        formula: "r_s = 2GM / c²",
        description: "Horizon radius of the central mass",
    },
    Equation {
        name: "Corrected Gravity",
        formula: "F = G·M·m / r² · (1 + 3·r_s / r)",
        description: "First-order strong-field boost, not a geodesic solve",
    },
    Equation {
        name: "Perihelion Drift",
        formula: "Δφ += 0.01·Δt / r  (r < 1.5·R)",
        description: "Accumulated near the hole, photons excluded",
    },
    Equation {
        name: "Semi-implicit Euler",
        formula: "v += F/m·Δt;  x += v·Δt",
        description: "Position uses the freshly updated velocity",
    },
    Equation {
        name: "Capture",
        formula: "|x - x_bh| < R  ⇒  M += m",
        description: "Bodies inside the horizon are absorbed",
    },
];

pub const FORCE_VARIABLES: &[(&str, &str)] = &[
    ("G", "Gravitational constant (scaled, 1)"),
    ("c", "Speed of light (scaled, 20)"),
    ("M", "Black hole mass"),
    ("R", "Black hole display radius"),
    ("r", "Distance to the black hole"),
    ("Δt", "Simulation timestep"),
];

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
    ("G", "Spacetime grid"),
    ("W", "Warp spacetime"),
    ("R", "Fire new photons"),
    ("H", "This help"),
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

pub fn draw(ctx: &Context, frame: &Frame<'_>) {
    draw_body_labels(ctx, frame.system.planets().iter(), frame.camera, frame.projection);

    if frame.toggles.info {
        draw_info_panel(ctx, "Black Hole", frame.clock.is_paused(), &info_lines(frame));
        draw_equations_sidebar(ctx, "Force Model", FORCE_MODEL, FORCE_VARIABLES);
    }

    if frame.toggles.help {
        draw_help_window(ctx, KEY_BINDINGS);
    }
}

fn info_lines(frame: &Frame<'_>) -> Vec<InfoLine> {
    let system = frame.system;
    let center = system.center();
    let rs = system.physics().schwarzschild_radius(center.mass);

    let mut lines = vec![
        InfoLine::new("Timestep", format!("{:.3}", frame.clock.dt())),
        InfoLine::new("Elapsed", format!("{:.1}", system.elapsed())),
        InfoLine::new("Mass", format!("{:.3e}", center.mass)),
        InfoLine::new("r_s", format!("{rs:.3}")),
        InfoLine::new("Planets", system.planets().len().to_string()),
        InfoLine::new("Photons", system.photons().len().to_string()),
        InfoLine::new("Escaped", system.escaped().to_string()),
        InfoLine::new("Photons captured", system.photons_captured().to_string()),
        InfoLine::new("Planets captured", system.captured().len().to_string()),
    ];
    lines.extend(system.planets().iter().map(|p| {
        InfoLine::new("Precession", format!("{}: {:.5}", p.name, p.perihelion_shift))
    }));
    lines
}

/// Draw the equations sidebar
pub fn draw_equations_sidebar(
    ctx: &Context,
    title: &str,
    equations: &[Equation],
    variables: &[(&str, &str)],
) {
    egui::SidePanel::right("equations_panel")
        .resizable(true)
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new(title).color(Color32::LIGHT_BLUE));
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.collapsing(RichText::new("Equations").strong(), |ui| {
                    for eq in equations {
                        ui.group(|ui| {
                            ui.label(RichText::new(eq.name).strong().color(Color32::YELLOW));
                            ui.label(RichText::new(eq.formula).monospace().color(Color32::WHITE));
                            ui.label(RichText::new(eq.description).small().italics());
                        });
                        ui.add_space(4.0);
                    }
                });

                ui.add_space(8.0);

                ui.collapsing(RichText::new("Variables").strong(), |ui| {
                    egui::Grid::new("variables_grid")
                        .num_columns(2)
                        .spacing([10.0, 4.0])
                        .show(ui, |ui| {
                            for (symbol, meaning) in variables {
                                ui.label(
                                    RichText::new(*symbol)
                                        .monospace()
                                        .color(Color32::LIGHT_GREEN),
                                );
                                ui.label(*meaning);
                                ui.end_row();
                            }
                        });
                });
            });
        });
}
