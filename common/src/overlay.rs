//! egui overlay: info panel, help window and body name labels

use celestial::{Body, Camera, Projection};
use egui::{Color32, RichText};
use winit::event::WindowEvent;

use crate::graphics::GraphicsContext;

/// Pixels between a body's projected center and its label baseline
const LABEL_LIFT: f32 = 18.0;

pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Overlay {
    pub fn new(gfx: &GraphicsContext) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            &gfx.window,
            Some(gfx.window.scale_factor() as f32),
            None,
        );
        let renderer = egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);
        Self {
            ctx,
            state,
            renderer,
        }
    }

    /// Returns true when egui consumed the event
    pub fn on_window_event(&mut self, gfx: &GraphicsContext, event: &WindowEvent) -> bool {
        self.state.on_window_event(&gfx.window, event).consumed
    }

    /// Run `build_ui` and paint the result over `view`
    pub fn paint(
        &mut self,
        gfx: &GraphicsContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        build_ui: impl FnMut(&egui::Context),
    ) {
        let raw_input = self.state.take_egui_input(&gfx.window);
        let full_output = self.ctx.run(raw_input, build_ui);

        self.state
            .handle_platform_output(&gfx.window, full_output.platform_output);
        let tris = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(&gfx.device, &gfx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gfx.size.width, gfx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        self.renderer.update_buffers(
            &gfx.device,
            &gfx.queue,
            encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

/// Draw each body's name just above its projected position.
///
/// Bodies behind the camera or off screen get no label.
pub fn draw_body_labels<'a>(
    ctx: &egui::Context,
    bodies: impl Iterator<Item = &'a Body>,
    camera: &Camera,
    projection: &Projection,
) {
    let view = camera.view_matrix();
    let pixels_per_point = ctx.pixels_per_point();
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Background,
        egui::Id::new("body_labels"),
    ));

    for body in bodies {
        let Some(point) = projection.project(body.position.as_vec3(), &view) else {
            continue;
        };
        if !point.is_visible(projection.width, projection.height) {
            continue;
        }
        let pos = point.label_position(projection.height, LABEL_LIFT) / pixels_per_point;
        painter.text(
            egui::pos2(pos.x, pos.y),
            egui::Align2::CENTER_BOTTOM,
            &body.name,
            egui::FontId::proportional(14.0),
            Color32::WHITE,
        );
    }
}

/// One row of the info panel
pub struct InfoLine {
    pub label: &'static str,
    pub value: String,
}

impl InfoLine {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

pub fn draw_info_panel(ctx: &egui::Context, title: &str, paused: bool, lines: &[InfoLine]) {
    egui::Window::new(title)
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            if paused {
                ui.label(RichText::new("PAUSED").color(Color32::YELLOW));
            } else {
                ui.label(RichText::new("RUNNING").color(Color32::GREEN));
            }
            ui.separator();
            egui::Grid::new("info_grid")
                .num_columns(2)
                .spacing([10.0, 4.0])
                .show(ui, |ui| {
                    for line in lines {
                        ui.label(RichText::new(line.label).color(Color32::LIGHT_BLUE));
                        ui.label(RichText::new(&line.value).monospace());
                        ui.end_row();
                    }
                });
        });
}

/// Key bindings as `(key, action)` pairs
pub fn draw_help_window(ctx: &egui::Context, bindings: &[(&str, &str)]) {
    egui::Window::new("Controls")
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            egui::Grid::new("help_grid")
                .num_columns(2)
                .spacing([16.0, 4.0])
                .show(ui, |ui| {
                    for (key, action) in bindings {
                        ui.label(RichText::new(*key).monospace().color(Color32::LIGHT_GREEN));
                        ui.label(*action);
                        ui.end_row();
                    }
                });
        });
}
