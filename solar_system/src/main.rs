//! Keplerian solar system viewer
//!
//! Six planets on inclined circular orbits around the Sun, with fading
//! trails, optional orbit loops and name labels.
//!
//! Controls:
//! - Left mouse drag: Rotate view
//! - Scroll: Zoom in/out
//! - Left/Right: Yaw
//! - Up/Down: Move forward/back (with Ctrl: pitch)
//! - Q/E: Roll
//! - Space: Pause/resume
//! - +/-: Speed up/slow down
//! - I: Toggle info panel
//! - O: Toggle orbit lines
//! - N: Toggle planet names
//! - H: Toggle help
//! - R: Reset view
//! - Esc: Quit

mod ui;

use celestial::{scenario, scenery, Camera, HeldKeys, Projection, SimClock, SimConfig, System};
use common::{scroll_notches, track_held_key, GraphicsContext, Overlay, Scene, SceneRenderer};
use glam::{DVec3, Vec2};
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

const ORBIT_SEGMENTS: usize = 128;
const STAR_COUNT: usize = 800;
const STAR_RADIUS: f64 = 1500.0;
const ORBIT_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 0.35];
const TRAIL_OPACITY: f32 = 0.6;

/// What the user toggled on or off
pub struct Toggles {
    pub info: bool,
    pub orbits: bool,
    pub names: bool,
    pub help: bool,
}

struct App {
    gfx: GraphicsContext,
    renderer: SceneRenderer,
    overlay: Overlay,
    system: System,
    clock: SimClock,
    camera: Camera,
    projection: Projection,
    keys: HeldKeys,
    cursor: Vec2,
    scene: Scene,
    orbit_loops: Vec<Vec<DVec3>>,
    toggles: Toggles,
}

impl App {
    fn new(gfx: GraphicsContext, config: &SimConfig) -> Self {
        let mut renderer = SceneRenderer::new(&gfx);
        let overlay = Overlay::new(&gfx);

        let system = scenario::solar_system(config);
        let orbit_loops = system
            .planets()
            .iter()
            .filter_map(|p| scenery::orbit_loop(p, ORBIT_SEGMENTS))
            .collect();

        let stars = scenery::star_field(STAR_COUNT, STAR_RADIUS, &mut rand::thread_rng());
        renderer.set_stars(&gfx.device, &stars);

        let projection = Projection::new(&config.projection, gfx.size.width, gfx.size.height);

        // Back off far enough to frame the outermost orbit
        let mut camera_settings = config.camera;
        camera_settings.position.z = -(scenario::recommended_camera_distance(&system) as f32);

        Self {
            renderer,
            overlay,
            system,
            clock: SimClock::new(&config.clock),
            camera: Camera::new(camera_settings),
            projection,
            keys: HeldKeys::default(),
            cursor: Vec2::ZERO,
            scene: Scene::default(),
            orbit_loops,
            toggles: Toggles {
                info: true,
                orbits: true,
                names: true,
                help: false,
            },
            gfx,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gfx.resize(new_size);
        self.projection.resize(new_size.width, new_size.height);
        self.renderer
            .resize(&self.gfx.device, new_size.width, new_size.height);
    }

    fn update(&mut self) {
        let input = self.keys.to_input(self.camera.settings());
        self.camera.apply_input(&input);
        self.system.tick(self.clock.dt(), self.clock.is_paused());
    }

    fn build_scene(&mut self) {
        self.scene.clear();
        if self.toggles.orbits {
            for orbit in &self.orbit_loops {
                self.scene.push_polyline(orbit, ORBIT_COLOR);
            }
        }
        for planet in self.system.planets() {
            self.scene.push_trail(planet, TRAIL_OPACITY);
        }
        for body in self.system.bodies() {
            self.scene.push_body(body);
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.gfx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.build_scene();
        self.renderer
            .update_camera(&self.gfx.queue, &self.camera, &self.projection);
        self.renderer
            .prepare(&self.gfx.device, &self.gfx.queue, &self.scene);

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view);

        self.overlay.paint(&self.gfx, &mut encoder, &view, |ctx| {
            ui::draw(
                ctx,
                &ui::Frame {
                    system: &self.system,
                    clock: &self.clock,
                    camera: &self.camera,
                    projection: &self.projection,
                    toggles: &self.toggles,
                },
            );
        });

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Returns false when the viewer should quit
    fn handle_key(&mut self, event: &KeyEvent) -> bool {
        let PhysicalKey::Code(key) = event.physical_key else {
            return true;
        };
        let pressed = event.state == ElementState::Pressed;
        if track_held_key(&mut self.keys, key, pressed) || !pressed || event.repeat {
            return true;
        }

        match key {
            KeyCode::Escape => return false,
            KeyCode::Space => {
                self.clock.toggle_pause();
            }
            KeyCode::Equal | KeyCode::NumpadAdd => self.clock.faster(),
            KeyCode::Minus | KeyCode::NumpadSubtract => self.clock.slower(),
            KeyCode::KeyI => self.toggles.info = !self.toggles.info,
            KeyCode::KeyO => self.toggles.orbits = !self.toggles.orbits,
            KeyCode::KeyN => self.toggles.names = !self.toggles.names,
            KeyCode::KeyH => self.toggles.help = !self.toggles.help,
            KeyCode::KeyR => {
                self.camera.reset();
                log::info!("view reset");
            }
            _ => {}
        }
        true
    }

    fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => self.camera.start_drag(self.cursor),
            ElementState::Released => self.camera.end_drag(),
        }
    }

    fn handle_mouse_move(&mut self, x: f64, y: f64) {
        self.cursor = Vec2::new(x as f32, y as f32);
        self.camera.drag_to(self.cursor);
    }
}

fn main() {
    let (gfx, event_loop) = match pollster::block_on(GraphicsContext::new(
        "Solar System - Rust/wgpu",
        1200,
        800,
    )) {
        Ok(pair) => pair,
        Err(err) => {
            log::error!("failed to start viewer: {err}");
            std::process::exit(1);
        }
    };

    let config = SimConfig::solar_system();
    if let Err(err) = config.validate() {
        log::error!("invalid configuration: {err}");
        std::process::exit(1);
    }

    let mut app = App::new(gfx, &config);

    let result = event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.overlay.on_window_event(&app.gfx, event);

                if !consumed {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(size) => app.resize(*size),
                        WindowEvent::MouseInput { state, button, .. } => {
                            app.handle_mouse_button(*button, *state);
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            app.handle_mouse_move(position.x, position.y);
                        }
                        WindowEvent::KeyboardInput { event, .. } => {
                            if !app.handle_key(event) {
                                elwt.exit();
                            }
                        }
                        WindowEvent::MouseWheel { delta, .. } => {
                            app.camera.scroll(scroll_notches(delta));
                        }
                        WindowEvent::RedrawRequested => {
                            app.update();
                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => app.resize(app.gfx.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                                Err(e) => log::warn!("render error: {e:?}"),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                app.gfx.window.request_redraw();
            }
            _ => {}
        }
    });

    if let Err(err) = result {
        log::error!("event loop error: {err}");
    }
}
