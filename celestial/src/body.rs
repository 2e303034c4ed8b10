//! Celestial bodies and their two motion rules
//!
//! A body is either *Keplerian* (position is an analytic function of an
//! accumulated orbit angle) or *Newtonian* (position integrated from velocity
//! under gravity). The rule is chosen at construction and never changes.

use glam::DVec3;

use crate::config::{PhysicsConfig, TrailConfig};
use crate::trail::{FadePolicy, TrailBuffer};

/// Default trail length for bodies built without an explicit trail config
pub const DEFAULT_TRAIL_LENGTH: usize = 300;

/// What a body represents, used for display and for rules that only apply
/// to some bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Star,
    Planet,
    BlackHole,
    Photon,
}

/// Circular, optionally inclined orbit around the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerOrbit {
    pub distance: f64,
    /// Radians per unit of simulated time
    pub orbital_speed: f64,
    /// Radians
    pub inclination: f64,
    /// Accumulated orbit angle in radians, never wrapped
    pub angle: f64,
}

impl KeplerOrbit {
    /// Point on the orbit at `angle`
    pub fn point(&self, angle: f64) -> DVec3 {
        let (sin_a, cos_a) = angle.sin_cos();
        let (sin_i, cos_i) = self.inclination.sin_cos();
        DVec3::new(
            self.distance * cos_a,
            self.distance * sin_a * cos_i,
            self.distance * sin_a * sin_i,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Keplerian(KeplerOrbit),
    Newtonian { velocity: DVec3 },
}

/// A body in the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String,
    pub kind: BodyKind,
    pub position: DVec3,
    pub mass: f64,
    pub radius: f64,
    pub color: [f32; 4],
    /// Forces exerted by this body get the Schwarzschild correction
    pub strong_field: bool,
    /// Cosmetic self-rotation in degrees
    pub spin_angle: f64,
    pub spin_rate: f64,
    /// Accumulated perihelion shift near a strong-field body (display only)
    pub perihelion_shift: f64,
    trail: TrailBuffer,
    motion: Motion,
}

impl Body {
    /// Keplerian planet on a circular orbit of radius `distance`.
    ///
    /// Starts at angle 0, i.e. on the +x axis.
    pub fn keplerian(
        name: &str,
        distance: f64,
        orbital_speed: f64,
        inclination_degrees: f64,
    ) -> Self {
        let orbit = KeplerOrbit {
            distance,
            orbital_speed,
            inclination: inclination_degrees.to_radians(),
            angle: 0.0,
        };
        Self::with_motion(name, orbit.point(0.0), 1.0, Motion::Keplerian(orbit))
    }

    /// Body whose position is integrated from `velocity` under gravity
    pub fn newtonian(name: &str, position: DVec3, velocity: DVec3, mass: f64) -> Self {
        Self::with_motion(name, position, mass, Motion::Newtonian { velocity })
    }

    fn with_motion(name: &str, position: DVec3, mass: f64, motion: Motion) -> Self {
        Self {
            name: name.to_string(),
            kind: BodyKind::Planet,
            position,
            mass,
            radius: 1.0,
            color: [1.0, 1.0, 1.0, 1.0],
            strong_field: false,
            spin_angle: 0.0,
            spin_rate: 0.0,
            perihelion_shift: 0.0,
            trail: TrailBuffer::new(DEFAULT_TRAIL_LENGTH, FadePolicy::default()),
            motion,
        }
    }

    pub fn with_kind(mut self, kind: BodyKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_spin_rate(mut self, degrees_per_unit: f64) -> Self {
        self.spin_rate = degrees_per_unit;
        self
    }

    pub fn with_strong_field(mut self) -> Self {
        self.strong_field = true;
        self
    }

    pub fn with_trail(mut self, trail: TrailConfig) -> Self {
        self.trail = TrailBuffer::new(trail.capacity, trail.fade);
        self
    }

    pub fn is_keplerian(&self) -> bool {
        matches!(self.motion, Motion::Keplerian(_))
    }

    pub fn orbit(&self) -> Option<&KeplerOrbit> {
        match &self.motion {
            Motion::Keplerian(orbit) => Some(orbit),
            Motion::Newtonian { .. } => None,
        }
    }

    pub fn velocity(&self) -> Option<DVec3> {
        match self.motion {
            Motion::Newtonian { velocity } => Some(velocity),
            Motion::Keplerian(_) => None,
        }
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        self.position.distance(other.position)
    }

    /// Gravitational force exerted on `self` by `other`.
    ///
    /// Inverse-square attraction, multiplied by `1 + 3 rs / d` when `other` is
    /// a strong-field source. The multiplier is a first-order approximation,
    /// not a geodesic solve. Inside `precession_radius_factor * other.radius`
    /// of a strong-field source, non-photon bodies accumulate
    /// `perihelion_shift`.
    pub fn compute_force(&mut self, other: &Body, dt: f64, physics: &PhysicsConfig) -> DVec3 {
        let dt = sanitize_dt(dt);
        let delta = other.position - self.position;
        let distance = delta.length();

        if distance < physics.min_distance {
            return DVec3::ZERO;
        }

        let mut force = physics.g * self.mass * other.mass / (distance * distance);

        if other.strong_field {
            let rs = physics.schwarzschild_radius(other.mass);
            force *= 1.0 + 3.0 * rs / distance;

            if distance < physics.precession_radius_factor * other.radius
                && self.kind != BodyKind::Photon
            {
                self.perihelion_shift += physics.precession_rate * dt / distance;
            }
        }

        delta * (force / distance)
    }

    /// Newton's second law: velocity += force / mass * dt.
    ///
    /// Keplerian bodies and bodies without positive mass are not affected.
    pub fn accelerate(&mut self, force: DVec3, dt: f64) {
        let dt = sanitize_dt(dt);
        if self.mass <= 0.0 {
            return;
        }
        if let Motion::Newtonian { velocity } = &mut self.motion {
            *velocity += force / self.mass * dt;
        }
    }

    /// Advance one step and record the new position in the trail.
    ///
    /// Newtonian bodies move with the velocity already updated by
    /// [`Body::accelerate`] this step (semi-implicit Euler).
    pub fn update(&mut self, dt: f64) {
        let dt = sanitize_dt(dt);

        match &mut self.motion {
            Motion::Keplerian(orbit) => {
                orbit.angle += orbit.orbital_speed * dt;
                self.position = orbit.point(orbit.angle);
            }
            Motion::Newtonian { velocity } => {
                self.position += *velocity * dt;
            }
        }

        self.trail.append(self.position);
        self.advance_spin(dt);
    }

    /// Turn the body about its own axis without moving it
    pub fn advance_spin(&mut self, dt: f64) {
        self.spin_angle += self.spin_rate * sanitize_dt(dt);
    }

    /// Rewind a Keplerian body to angle 0 and forget its trail.
    ///
    /// Newtonian bodies carry no analytic state to rewind and are left as is.
    pub fn reset_orbit(&mut self) {
        if let Motion::Keplerian(orbit) = &mut self.motion {
            orbit.angle = 0.0;
            self.position = orbit.point(0.0);
            self.spin_angle = 0.0;
            self.trail.clear();
        }
    }
}

/// Negative or non-finite timesteps become zero
pub(crate) fn sanitize_dt(dt: f64) -> f64 {
    if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        log::debug!("rejecting timestep {dt}, using 0");
        0.0
    }
}
