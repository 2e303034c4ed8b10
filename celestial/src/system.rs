//! A central body with the planets and photons moving around it

use glam::DVec3;
use rand::Rng;

use crate::body::{sanitize_dt, Body, BodyKind};
use crate::config::{PhotonBeam, PhysicsConfig, TrailConfig};

/// What happened to the roster during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Names of planets absorbed by the center, in processing order
    pub captured: Vec<String>,
    /// Photons absorbed by the center
    pub photons_captured: usize,
    /// Photons that left the simulation volume
    pub escaped: usize,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.captured.is_empty() && self.photons_captured == 0 && self.escaped == 0
    }
}

/// Owns the center and every secondary body and is the only place where
/// bodies are added or removed.
///
/// Only body-vs-center gravity is modelled; secondaries do not attract each
/// other.
#[derive(Debug, Clone)]
pub struct System {
    center: Body,
    planets: Vec<Body>,
    photons: Vec<Body>,
    physics: PhysicsConfig,
    trail: TrailConfig,
    beam: Option<PhotonBeam>,
    elapsed: f64,
    captured: Vec<String>,
    photons_captured: usize,
    escaped: usize,
}

impl System {
    pub fn new(center: Body, physics: PhysicsConfig, trail: TrailConfig) -> Self {
        Self {
            center,
            planets: Vec::new(),
            photons: Vec::new(),
            physics,
            trail,
            beam: None,
            elapsed: 0.0,
            captured: Vec::new(),
            photons_captured: 0,
            escaped: 0,
        }
    }

    pub fn with_planets(mut self, planets: impl IntoIterator<Item = Body>) -> Self {
        self.planets.extend(planets);
        self
    }

    /// Enable the photon beam and spawn its first roster
    pub fn with_photon_beam<R: Rng + ?Sized>(mut self, beam: PhotonBeam, rng: &mut R) -> Self {
        self.beam = Some(beam);
        self.reset_photons(rng);
        self
    }

    pub fn push_photon(&mut self, body: Body) {
        self.photons.push(body.with_kind(BodyKind::Photon));
    }

    pub fn center(&self) -> &Body {
        &self.center
    }

    pub fn planets(&self) -> &[Body] {
        &self.planets
    }

    pub fn photons(&self) -> &[Body] {
        &self.photons
    }

    /// Every live body: center first, then planets, then photons
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        std::iter::once(&self.center)
            .chain(self.planets.iter())
            .chain(self.photons.iter())
    }

    pub fn find(&self, name: &str) -> Option<&Body> {
        self.bodies().find(|b| b.name == name)
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    /// Simulated time accumulated by unpaused ticks
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Names of every planet captured since construction
    pub fn captured(&self) -> &[String] {
        &self.captured
    }

    /// Photons captured since construction, across photon resets
    pub fn photons_captured(&self) -> usize {
        self.photons_captured
    }

    /// Photons that escaped since construction
    pub fn escaped(&self) -> usize {
        self.escaped
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies().map(|b| b.mass).sum()
    }

    /// Farthest Keplerian orbit, or farthest current distance for Newtonian planets
    pub fn max_planet_distance(&self) -> f64 {
        self.planets
            .iter()
            .map(|p| match p.orbit() {
                Some(orbit) => orbit.distance,
                None => p.distance_to(&self.center),
            })
            .fold(0.0, f64::max)
    }

    /// Advance every secondary by `dt` and apply capture and escape rules.
    ///
    /// Planets are processed before photons, each in roster order. A Newtonian
    /// body is captured when it lies inside the center's radius before or after
    /// its step. A capture adds the captured mass to the center immediately, so
    /// bodies processed later in the same tick are pulled by the increased mass.
    pub fn tick(&mut self, dt: f64, paused: bool) -> TickReport {
        let mut report = TickReport::default();
        if paused {
            return report;
        }

        let dt = sanitize_dt(dt);
        self.elapsed += dt;
        self.center.advance_spin(dt);

        let mut planets = std::mem::take(&mut self.planets);
        planets.retain_mut(|planet| {
            if planet.is_keplerian() {
                planet.update(dt);
                return true;
            }
            !self.advance_newtonian(planet, dt, &mut report)
        });
        self.planets = planets;

        let bound = self.physics.escape_bound;
        let mut photons = std::mem::take(&mut self.photons);
        photons.retain_mut(|photon| {
            if self.advance_newtonian(photon, dt, &mut report) {
                return false;
            }
            if photon.position.x.abs() > bound || photon.position.z.abs() > bound {
                report.escaped += 1;
                return false;
            }
            true
        });
        self.photons = photons;

        self.escaped += report.escaped;
        self.photons_captured += report.photons_captured;
        if report.photons_captured > 0 {
            log::debug!("{} photon(s) crossed the horizon", report.photons_captured);
        }
        if !report.captured.is_empty() {
            log::info!(
                "{} absorbed {:?}, mass now {:.4e}",
                self.center.name,
                report.captured,
                self.center.mass
            );
            self.captured.extend(report.captured.iter().cloned());
        }
        if report.escaped > 0 {
            log::debug!("{} photon(s) left the simulation volume", report.escaped);
        }

        report
    }

    /// Replace the photon roster with a fresh beam.
    ///
    /// Does nothing for systems built without a photon beam.
    pub fn reset_photons<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let Some(beam) = self.beam else {
            return;
        };

        self.photons.clear();
        for i in 0..beam.count {
            let angle = i as f64 * beam.angle_step;
            let position =
                DVec3::new(beam.distance * angle.cos(), 0.0, beam.distance * angle.sin());

            let mut velocity = -position * beam.inbound_speed;
            if beam.jitter > 0.0 {
                velocity.x += rng.gen_range(-beam.jitter..beam.jitter);
                velocity.z += rng.gen_range(-beam.jitter..beam.jitter);
            }

            let photon = Body::newtonian("Photon", position, velocity, beam.mass)
                .with_kind(BodyKind::Photon)
                .with_radius(beam.radius)
                .with_color(beam.color)
                .with_trail(self.trail);
            self.photons.push(photon);
        }
        log::info!("spawned {} photons", self.photons.len());
    }

    /// Step a Newtonian body under the center's gravity. Returns true when the
    /// body was captured, either already inside the center or after moving.
    fn advance_newtonian(&mut self, body: &mut Body, dt: f64, report: &mut TickReport) -> bool {
        if self.absorb_if_captured(body, report) {
            return true;
        }
        let force = body.compute_force(&self.center, dt, &self.physics);
        body.accelerate(force, dt);
        body.update(dt);
        self.absorb_if_captured(body, report)
    }

    fn absorb_if_captured(&mut self, body: &Body, report: &mut TickReport) -> bool {
        if body.distance_to(&self.center) < self.center.radius {
            self.center.mass += body.mass;
            if body.kind == BodyKind::Photon {
                report.photons_captured += 1;
            } else {
                report.captured.push(body.name.clone());
            }
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn physics() -> PhysicsConfig {
        PhysicsConfig {
            g: 1.0,
            c: 20.0,
            ..PhysicsConfig::default()
        }
    }

    fn center(mass: f64, radius: f64) -> Body {
        Body::newtonian("Center", DVec3::ZERO, DVec3::ZERO, mass)
            .with_kind(BodyKind::BlackHole)
            .with_radius(radius)
    }

    #[test]
    fn paused_tick_changes_nothing() {
        let mut system = System::new(center(1000.0, 5.0), physics(), TrailConfig::default())
            .with_planets([Body::keplerian("Earth", 100.0, 0.01, 0.0)]);
        let before = system.planets()[0].clone();
        let report = system.tick(100.0, true);
        assert!(report.is_empty());
        assert_eq!(system.planets()[0], before);
        assert_eq!(system.elapsed(), 0.0);
    }

    #[test]
    fn center_spins_in_place() {
        let sun = center(1000.0, 5.0).with_spin_rate(10.0);
        let mut system = System::new(sun, physics(), TrailConfig::default());
        system.tick(0.5, false);
        system.tick(0.5, true);
        assert_relative_eq!(system.center().spin_angle, 5.0);
        assert_eq!(system.center().position, DVec3::ZERO);
        assert!(system.center().trail().is_empty());
    }

    #[test]
    fn photon_escapes_past_bound() {
        let mut system = System::new(center(0.0, 5.0), physics(), TrailConfig::default());
        system.push_photon(Body::newtonian(
            "Photon",
            DVec3::new(999.0, 0.0, 0.0),
            DVec3::new(5.0, 0.0, 0.0),
            1e-10,
        ));
        let report = system.tick(1.0, false);
        assert_eq!(report.escaped, 1);
        assert!(system.photons().is_empty());
        assert_eq!(system.escaped(), 1);
    }

    #[test]
    fn captured_photons_are_counted_not_named() {
        let mut system = System::new(center(450.0, 30.0), physics(), TrailConfig::default());
        for x in [5.0, -5.0, 10.0] {
            system.push_photon(Body::newtonian(
                "Photon",
                DVec3::new(x, 0.0, 0.0),
                DVec3::ZERO,
                1e-10,
            ));
        }
        let report = system.tick(1.0, false);

        assert_eq!(report.photons_captured, 3);
        assert!(report.captured.is_empty());
        assert!(system.photons().is_empty());
        assert_eq!(system.photons_captured(), 3);
        assert!(system.captured().is_empty());
    }

    #[test]
    fn photon_beyond_bound_on_y_is_kept() {
        let mut system = System::new(center(0.0, 5.0), physics(), TrailConfig::default());
        system.push_photon(Body::newtonian(
            "Photon",
            DVec3::new(0.0, 5000.0, 0.0),
            DVec3::ZERO,
            1e-10,
        ));
        system.tick(1.0, false);
        assert_eq!(system.photons().len(), 1);
    }

    #[test]
    fn absorption_mid_tick_is_seen_by_later_bodies() {
        let physics = PhysicsConfig { g: 1.0, ..physics() };
        let inside = Body::newtonian("Doomed", DVec3::new(1.0, 0.0, 0.0), DVec3::ZERO, 500.0);
        let witness = Body::newtonian("Witness", DVec3::new(100.0, 0.0, 0.0), DVec3::ZERO, 1.0);

        let mut system = System::new(center(1000.0, 5.0), physics, TrailConfig::default())
            .with_planets([inside, witness]);
        let report = system.tick(1.0, false);

        assert_eq!(report.captured, vec!["Doomed".to_string()]);
        assert_relative_eq!(system.center().mass, 1500.0);

        // Witness was pulled by 1500, not 1000: a = 1500 / 100²
        let v = system.planets()[0].velocity().unwrap_or_default();
        assert_relative_eq!(v.x, -1500.0 / 10_000.0, epsilon = 1e-12);
    }

    #[test]
    fn reset_photons_rebuilds_whole_roster() {
        let mut rng = StdRng::seed_from_u64(7);
        let beam = PhotonBeam::default();
        let mut system = System::new(center(450.0, 30.0), physics(), TrailConfig::default())
            .with_photon_beam(beam, &mut rng);
        assert_eq!(system.photons().len(), beam.count);

        for _ in 0..50 {
            system.tick(1.0, false);
        }
        system.reset_photons(&mut rng);

        assert_eq!(system.photons().len(), beam.count);
        for photon in system.photons() {
            assert_relative_eq!(photon.position.length(), beam.distance, epsilon = 1e-9);
            assert!(photon.trail().is_empty());
            assert_eq!(photon.kind, BodyKind::Photon);
        }
    }

    #[test]
    fn reset_photons_without_beam_is_noop() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut system = System::new(center(450.0, 30.0), physics(), TrailConfig::default());
        system.reset_photons(&mut rng);
        assert!(system.photons().is_empty());
    }

    #[test]
    fn bodies_lists_center_first() {
        let system = System::new(center(1.0, 1.0), physics(), TrailConfig::default())
            .with_planets([Body::keplerian("A", 10.0, 0.1, 0.0)]);
        let names: Vec<&str> = system.bodies().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Center", "A"]);
        assert!(system.find("A").is_some());
        assert!(system.find("B").is_none());
    }
}
