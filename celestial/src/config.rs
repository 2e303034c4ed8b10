//! Simulation configuration
//!
//! Physical constants, trail lengths, camera defaults and scene settings are
//! grouped into one [`SimConfig`] that is passed explicitly into scenario,
//! system and camera construction.

use std::f64::consts::PI;

use glam::Vec3;

use crate::error::{ConfigError, Result};
use crate::trail::FadePolicy;

/// Physical constants and numerical guards used by the force model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    /// Gravitational constant (scaled for visualization, not SI)
    pub g: f64,
    /// Speed of light (rescaled together with `g`)
    pub c: f64,
    /// Below this separation the force is treated as zero
    pub min_distance: f64,
    /// Precession is recorded inside `factor * center.radius`
    pub precession_radius_factor: f64,
    pub precession_rate: f64,
    /// Photons with |x| or |z| beyond this bound are dropped
    pub escape_bound: f64,
    /// Cosmetic self-rotation in degrees per unit of simulated time
    pub spin_rate: f64,
}

impl PhysicsConfig {
    /// Schwarzschild radius: rs = 2GM/c²
    pub fn schwarzschild_radius(&self, mass: f64) -> f64 {
        2.0 * self.g * mass / (self.c * self.c)
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            g: 6.67e-11,
            c: 3.0e8,
            min_distance: 0.1,
            precession_radius_factor: 1.5,
            precession_rate: 0.01,
            escape_bound: 1000.0,
            spin_rate: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailConfig {
    pub capacity: usize,
    pub fade: FadePolicy,
}

/// Camera defaults and input sensitivities.
///
/// `reset()` on a camera restores exactly these values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub position: Vec3,
    /// Pitch, yaw, roll in degrees
    pub rotation: Vec3,
    pub zoom: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    /// One scroll-wheel notch
    pub zoom_step: f32,
    /// Depth translation per unit of zoom away from 1.0
    pub zoom_offset: f32,
    /// Degrees per pixel of pointer drag
    pub drag_sensitivity: f32,
    /// Degrees per frame while a rotation key is held
    pub key_rotate_step: f32,
    /// World units per frame while a move key is held
    pub key_move_step: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -600.0),
            rotation: Vec3::new(30.0, 0.0, 0.0),
            zoom: 1.0,
            zoom_min: 0.1,
            zoom_max: 3.0,
            zoom_step: 0.1,
            zoom_offset: 200.0,
            drag_sensitivity: 0.1,
            key_rotate_step: 1.0,
            key_move_step: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 1.0,
            far: 5000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockConfig {
    pub dt: f64,
    /// Multiplier applied by one speed-up / slow-down step
    pub factor: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self { dt: 1.0, factor: 1.2 }
    }
}

/// Spacetime grid drawn under the black hole
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    pub size: f64,
    pub divisions: usize,
    /// Visual magnification of the Schwarzschild radius
    pub rs_scale: f64,
    /// Well depth at the (magnified) horizon
    pub depth: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 400.0,
            divisions: 20,
            rs_scale: 20.0,
            depth: 60.0,
        }
    }
}

/// Ring of photons fired inward at the center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotonBeam {
    pub count: usize,
    pub distance: f64,
    pub angle_step: f64,
    /// Initial velocity is `-position * inbound_speed`
    pub inbound_speed: f64,
    /// Uniform jitter added to vx and vz
    pub jitter: f64,
    pub mass: f64,
    pub radius: f64,
    pub color: [f32; 4],
}

impl Default for PhotonBeam {
    fn default() -> Self {
        Self {
            count: 15,
            distance: 400.0,
            angle_step: PI / 7.0,
            inbound_speed: 0.01,
            jitter: 0.1,
            mass: 1e-10,
            radius: 1.0,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Complete configuration for one scene
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimConfig {
    pub physics: PhysicsConfig,
    pub trail: TrailConfig,
    pub camera: CameraSettings,
    pub projection: ProjectionConfig,
    pub clock: ClockConfig,
    pub grid: GridConfig,
    pub photons: PhotonBeam,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            capacity: 300,
            fade: FadePolicy::FadeOut,
        }
    }
}

impl SimConfig {
    /// Keplerian solar system scene
    pub fn solar_system() -> Self {
        Self::default()
    }

    /// Black hole scene with Newtonian planets and photons.
    ///
    /// Units are rescaled so that `G = 1` and the starting velocities of the
    /// planets are close to circular around a center of mass 450.
    pub fn black_hole() -> Self {
        Self {
            physics: PhysicsConfig {
                g: 1.0,
                c: 20.0,
                ..PhysicsConfig::default()
            },
            trail: TrailConfig {
                capacity: 1000,
                fade: FadePolicy::FadeOut,
            },
            camera: CameraSettings {
                position: Vec3::new(0.0, 0.0, -750.0),
                rotation: Vec3::ZERO,
                ..CameraSettings::default()
            },
            projection: ProjectionConfig {
                fov_y_degrees: 45.0,
                near: 0.1,
                far: 2000.0,
            },
            clock: ClockConfig { dt: 0.5, factor: 1.2 },
            grid: GridConfig::default(),
            photons: PhotonBeam::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("gravitational constant", self.physics.g),
            ("speed of light", self.physics.c),
            ("escape bound", self.physics.escape_bound),
            ("timestep factor", self.clock.factor),
            ("grid size", self.grid.size),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if !(self.physics.min_distance >= 0.0) {
            return Err(ConfigError::InvalidParameter(format!(
                "min_distance {} must be non-negative",
                self.physics.min_distance
            )));
        }

        if !self.clock.dt.is_finite() || self.clock.dt < 0.0 {
            return Err(ConfigError::InvalidTimestep(self.clock.dt));
        }

        let cam = &self.camera;
        if !(cam.zoom_min > 0.0) || !(cam.zoom_min <= cam.zoom_max) {
            return Err(ConfigError::InvalidZoomRange {
                min: cam.zoom_min,
                max: cam.zoom_max,
            });
        }
        if cam.zoom < cam.zoom_min || cam.zoom > cam.zoom_max {
            return Err(ConfigError::ZoomOutOfRange {
                zoom: cam.zoom,
                min: cam.zoom_min,
                max: cam.zoom_max,
            });
        }

        let proj = &self.projection;
        if !(proj.fov_y_degrees > 0.0 && proj.fov_y_degrees < 180.0) {
            return Err(ConfigError::InvalidParameter(format!(
                "field of view {} must lie in (0, 180) degrees",
                proj.fov_y_degrees
            )));
        }
        if !(proj.near > 0.0 && proj.near < proj.far) {
            return Err(ConfigError::InvalidParameter(format!(
                "clip planes near={} far={} are invalid",
                proj.near, proj.far
            )));
        }

        if self.grid.divisions == 0 {
            return Err(ConfigError::InvalidParameter(
                "grid needs at least one division".to_string(),
            ));
        }

        Ok(())
    }
}
