//! Orbit-style viewer camera and screen projection
//!
//! The camera keeps an offset, a pitch/yaw/roll triple in degrees and a zoom
//! factor. Pointer drags, wheel notches and held keys all end up as the same
//! kind of per-frame [`CameraInput`].

use std::ops::AddAssign;

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::config::{CameraSettings, ProjectionConfig};

/// Accumulated camera change for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraInput {
    /// Pitch, yaw, roll deltas in degrees
    pub rotation: Vec3,
    pub translation: Vec3,
    pub zoom: f32,
}

impl AddAssign for CameraInput {
    fn add_assign(&mut self, rhs: Self) {
        self.rotation += rhs.rotation;
        self.translation += rhs.translation;
        self.zoom += rhs.zoom;
    }
}

/// Snapshot of the keys that drive continuous camera motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub ctrl: bool,
    pub roll_left: bool,
    pub roll_right: bool,
}

impl HeldKeys {
    /// Left/Right yaw, Ctrl+Up/Down pitch, plain Up/Down move along z,
    /// roll keys roll.
    pub fn to_input(&self, settings: &CameraSettings) -> CameraInput {
        let step = settings.key_rotate_step;
        let mv = settings.key_move_step;
        let mut input = CameraInput::default();

        if self.left {
            input.rotation.y -= step;
        }
        if self.right {
            input.rotation.y += step;
        }
        if self.up {
            if self.ctrl {
                input.rotation.x -= step;
            } else {
                input.translation.z += mv;
            }
        }
        if self.down {
            if self.ctrl {
                input.rotation.x += step;
            } else {
                input.translation.z -= mv;
            }
        }
        if self.roll_left {
            input.rotation.z += step;
        }
        if self.roll_right {
            input.rotation.z -= step;
        }

        input
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Pitch, yaw, roll in degrees
    pub rotation: Vec3,
    zoom_level: f32,
    dragging: bool,
    last_pointer: Vec2,
    settings: CameraSettings,
}

impl Camera {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            position: settings.position,
            rotation: settings.rotation,
            zoom_level: settings.zoom.clamp(settings.zoom_min, settings.zoom_max),
            dragging: false,
            last_pointer: Vec2::ZERO,
            settings,
        }
    }

    /// Restore the scenario defaults
    pub fn reset(&mut self) {
        *self = Self::new(self.settings);
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn zoom_level(&self) -> f32 {
        self.zoom_level
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn rotate(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.rotation += Vec3::new(pitch, yaw, roll);
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Change the zoom level, clamped to the configured range. Non-finite
    /// amounts are ignored.
    pub fn zoom(&mut self, amount: f32) {
        if !amount.is_finite() {
            log::debug!("ignoring zoom by {amount}");
            return;
        }
        self.zoom_level =
            (self.zoom_level + amount).clamp(self.settings.zoom_min, self.settings.zoom_max);
    }

    /// Mouse wheel: positive notches zoom in
    pub fn scroll(&mut self, notches: f32) {
        self.zoom(notches * self.settings.zoom_step);
    }

    pub fn start_drag(&mut self, pointer: Vec2) {
        self.dragging = true;
        self.last_pointer = pointer;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Pointer moved; rotates only while dragging
    pub fn drag_to(&mut self, pointer: Vec2) {
        if !self.dragging {
            return;
        }
        let delta = (pointer - self.last_pointer) * self.settings.drag_sensitivity;
        self.rotate(delta.y, delta.x, 0.0);
        self.last_pointer = pointer;
    }

    pub fn apply_input(&mut self, input: &CameraInput) {
        self.rotate(input.rotation.x, input.rotation.y, input.rotation.z);
        self.translate(input.translation);
        if input.zoom != 0.0 {
            self.zoom(input.zoom);
        }
    }

    /// Composed view transform: translate by the offset, translate by the
    /// zoom-dependent depth, then rotate pitch (X), yaw (Y), roll (Z) in that
    /// order.
    pub fn view_matrix(&self) -> Mat4 {
        let zoom_depth = self.settings.zoom_offset * (1.0 - self.zoom_level);
        Mat4::from_translation(self.position)
            * Mat4::from_translation(Vec3::new(0.0, 0.0, zoom_depth))
            * Mat4::from_rotation_x(self.rotation.x.to_radians())
            * Mat4::from_rotation_y(self.rotation.y.to_radians())
            * Mat4::from_rotation_z(self.rotation.z.to_radians())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

/// Window coordinates of a projected point, y growing upward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// 0 at the near plane, 1 at the far plane
    pub depth: f32,
}

impl ScreenPoint {
    pub fn is_visible(&self, width: f32, height: f32) -> bool {
        (0.0..=1.0).contains(&self.depth)
            && (0.0..=width).contains(&self.x)
            && (0.0..=height).contains(&self.y)
    }

    /// Top-left-origin coordinates for UI text, lifted by `offset` pixels
    pub fn label_position(&self, height: f32, offset: f32) -> Vec2 {
        Vec2::new(self.x, height - self.y - offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub width: f32,
    pub height: f32,
}

impl Projection {
    pub fn new(config: &ProjectionConfig, width: u32, height: u32) -> Self {
        Self {
            fov_y_degrees: config.fov_y_degrees,
            near: config.near,
            far: config.far,
            width: width.max(1) as f32,
            height: height.max(1) as f32,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1) as f32;
        self.height = height.max(1) as f32;
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    /// Right-handed perspective with depth in [0, 1]
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect_ratio(),
            self.near,
            self.far,
        )
    }

    /// Map a world position to window coordinates.
    ///
    /// Returns `None` only when the point sits exactly on the eye plane.
    pub fn project(&self, world: Vec3, view: &Mat4) -> Option<ScreenPoint> {
        let clip = self.matrix() * *view * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w == 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(ScreenPoint {
            x: (ndc.x * 0.5 + 0.5) * self.width,
            y: (ndc.y * 0.5 + 0.5) * self.height,
            depth: ndc.z,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zoom_stays_clamped() {
        let mut camera = Camera::default();
        for delta in [0.5, 2.0, -0.3, -10.0, 0.05, 7.0, -1.2] {
            camera.zoom(delta);
            assert!((0.1..=3.0).contains(&camera.zoom_level()));
        }
        camera.zoom(-10.0);
        assert_eq!(camera.zoom_level(), 0.1);
        camera.zoom(10.0);
        assert_eq!(camera.zoom_level(), 3.0);
    }

    #[test]
    fn non_finite_zoom_is_ignored() {
        let mut camera = Camera::default();
        camera.zoom(0.5);
        let before = camera.zoom_level();

        camera.zoom(f32::NAN);
        camera.zoom(f32::INFINITY);
        assert_eq!(camera.zoom_level(), before);

        camera.apply_input(&CameraInput {
            zoom: f32::NAN,
            ..Default::default()
        });
        assert_eq!(camera.zoom_level(), before);

        camera.zoom(-10.0);
        assert_eq!(camera.zoom_level(), 0.1);
        camera.zoom(10.0);
        assert_eq!(camera.zoom_level(), 3.0);
    }

    #[test]
    fn reset_matches_fresh_camera() {
        let mut camera = Camera::default();
        camera.start_drag(Vec2::new(10.0, 10.0));
        camera.drag_to(Vec2::new(50.0, 30.0));
        camera.scroll(3.0);
        camera.apply_input(&HeldKeys {
            up: true,
            left: true,
            roll_left: true,
            ..Default::default()
        }
        .to_input(camera.settings()));
        assert_ne!(camera, Camera::default());

        camera.reset();
        assert_eq!(camera, Camera::default());
    }

    #[test]
    fn drag_rotates_only_while_dragging() {
        let mut camera = Camera::default();
        camera.drag_to(Vec2::new(100.0, 100.0));
        assert_eq!(camera.rotation, Vec3::new(30.0, 0.0, 0.0));

        camera.start_drag(Vec2::new(0.0, 0.0));
        assert!(camera.is_dragging());
        camera.drag_to(Vec2::new(20.0, -10.0));
        assert_relative_eq!(camera.rotation.y, 2.0);
        assert_relative_eq!(camera.rotation.x, 29.0);

        camera.end_drag();
        camera.drag_to(Vec2::new(500.0, 500.0));
        assert_relative_eq!(camera.rotation.y, 2.0);
    }

    #[test]
    fn held_keys_map_to_rotation_or_motion() {
        let settings = CameraSettings::default();
        let forward = HeldKeys {
            up: true,
            ..Default::default()
        }
        .to_input(&settings);
        assert_eq!(forward.translation, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(forward.rotation, Vec3::ZERO);

        let tilt = HeldKeys {
            up: true,
            ctrl: true,
            ..Default::default()
        }
        .to_input(&settings);
        assert_eq!(tilt.translation, Vec3::ZERO);
        assert_eq!(tilt.rotation, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn inputs_from_different_sources_add_up() {
        let mut total = CameraInput {
            rotation: Vec3::new(0.0, 1.0, 0.0),
            ..Default::default()
        };
        total += CameraInput {
            rotation: Vec3::new(0.0, 2.0, 0.0),
            zoom: 0.1,
            ..Default::default()
        };
        let mut camera = Camera::default();
        camera.apply_input(&total);
        assert_relative_eq!(camera.rotation.y, 3.0);
        assert_relative_eq!(camera.zoom_level(), 1.1, epsilon = 1e-6);
    }

    #[test]
    fn view_matrix_translates_then_rotates_in_fixed_order() {
        let mut camera = Camera::default();
        camera.rotation = Vec3::new(90.0, 90.0, 0.0);
        camera.zoom(1.0);

        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, -600.0 - 200.0))
            * Mat4::from_rotation_x(90f32.to_radians())
            * Mat4::from_rotation_y(90f32.to_radians());
        assert!(camera.view_matrix().abs_diff_eq(expected, 1e-3));

        let permuted = Mat4::from_translation(Vec3::new(0.0, 0.0, -800.0))
            * Mat4::from_rotation_y(90f32.to_radians())
            * Mat4::from_rotation_x(90f32.to_radians());
        assert!(!camera.view_matrix().abs_diff_eq(permuted, 1e-3));
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let camera = Camera::default();
        let projection = Projection::new(&ProjectionConfig::default(), 1000, 800);
        let point = projection
            .project(Vec3::ZERO, &camera.view_matrix())
            .expect("origin is in front of the camera");
        assert_relative_eq!(point.x, 500.0, epsilon = 1e-2);
        assert_relative_eq!(point.y, 400.0, epsilon = 1e-2);
        assert!(point.is_visible(1000.0, 800.0));
        assert_relative_eq!(point.label_position(800.0, 30.0).y, 370.0, epsilon = 1e-2);
    }

    #[test]
    fn point_behind_camera_is_not_visible() {
        let camera = Camera::default();
        let projection = Projection::new(&ProjectionConfig::default(), 1000, 800);
        // The camera sits 600 units in front of the origin along +z of the
        // rotated frame; push a point well past it.
        let eye = camera.view_matrix().inverse().transform_point3(Vec3::ZERO);
        let behind = eye * 2.0;
        let point = projection.project(behind, &camera.view_matrix());
        assert!(point.map_or(true, |p| !p.is_visible(1000.0, 800.0)));
    }
}
