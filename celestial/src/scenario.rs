//! Ready-made scenes

use glam::DVec3;
use rand::Rng;

use crate::body::{Body, BodyKind};
use crate::config::SimConfig;
use crate::system::System;

const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
const BLUE: [f32; 4] = [0.1, 0.4, 0.9, 1.0];
const RED: [f32; 4] = [0.9, 0.2, 0.2, 1.0];
const ORANGE: [f32; 4] = [1.0, 0.65, 0.0, 1.0];
const GREY: [f32; 4] = [0.6, 0.6, 0.6, 1.0];
const JUPITER: [f32; 4] = [0.9, 0.7, 0.4, 1.0];
const SATURN: [f32; 4] = [0.9, 0.8, 0.5, 1.0];
const HORIZON: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

struct PlanetSpec {
    name: &'static str,
    distance: f64,
    radius: f64,
    /// Radians per unit of simulated time for Keplerian planets, starting
    /// speed along +z for Newtonian ones
    speed: f64,
    inclination_degrees: f64,
    mass: f64,
    color: [f32; 4],
}

const SOLAR_PLANETS: [PlanetSpec; 6] = [
    PlanetSpec {
        name: "Mercury",
        distance: 70.0,
        radius: 3.0,
        speed: 0.02,
        inclination_degrees: 7.0,
        mass: 3.3e23,
        color: GREY,
    },
    PlanetSpec {
        name: "Venus",
        distance: 100.0,
        radius: 6.0,
        speed: 0.015,
        inclination_degrees: 3.4,
        mass: 4.87e24,
        color: ORANGE,
    },
    PlanetSpec {
        name: "Earth",
        distance: 150.0,
        radius: 7.0,
        speed: 0.01,
        inclination_degrees: 0.0,
        mass: 5.97e24,
        color: BLUE,
    },
    PlanetSpec {
        name: "Mars",
        distance: 200.0,
        radius: 5.0,
        speed: 0.008,
        inclination_degrees: 1.8,
        mass: 6.42e23,
        color: RED,
    },
    PlanetSpec {
        name: "Jupiter",
        distance: 280.0,
        radius: 15.0,
        speed: 0.004,
        inclination_degrees: 1.3,
        mass: 1.9e27,
        color: JUPITER,
    },
    PlanetSpec {
        name: "Saturn",
        distance: 400.0,
        radius: 12.0,
        speed: 0.003,
        inclination_degrees: 2.5,
        mass: 5.68e26,
        color: SATURN,
    },
];

/// Masses in units of 1e25 kg so that they stay small next to the hole
const BLACK_HOLE_PLANETS: [PlanetSpec; 4] = [
    PlanetSpec {
        name: "Mercury",
        distance: 120.0,
        radius: 4.0,
        speed: 2.0,
        inclination_degrees: 0.0,
        mass: 0.033,
        color: GREY,
    },
    PlanetSpec {
        name: "Venus",
        distance: 180.0,
        radius: 8.0,
        speed: 1.6,
        inclination_degrees: 0.0,
        mass: 0.487,
        color: ORANGE,
    },
    PlanetSpec {
        name: "Earth",
        distance: 250.0,
        radius: 9.0,
        speed: 1.3,
        inclination_degrees: 0.0,
        mass: 0.597,
        color: BLUE,
    },
    PlanetSpec {
        name: "Mars",
        distance: 320.0,
        radius: 6.0,
        speed: 1.1,
        inclination_degrees: 0.0,
        mass: 0.0642,
        color: RED,
    },
];

const SUN_MASS: f64 = 1.989e30;
const SUN_RADIUS: f64 = 20.0;
const BLACK_HOLE_MASS: f64 = 450.0;
const BLACK_HOLE_RADIUS: f64 = 30.0;

/// Sun with six Keplerian planets on slightly inclined circular orbits
pub fn solar_system(config: &SimConfig) -> System {
    debug_assert!(config.validate().is_ok());

    let sun = Body::newtonian("Sun", DVec3::ZERO, DVec3::ZERO, SUN_MASS)
        .with_kind(BodyKind::Star)
        .with_radius(SUN_RADIUS)
        .with_color(YELLOW)
        .with_spin_rate(config.physics.spin_rate)
        .with_trail(config.trail);

    let planets = SOLAR_PLANETS.iter().map(|p| {
        Body::keplerian(p.name, p.distance, p.speed, p.inclination_degrees)
            .with_mass(p.mass)
            .with_radius(p.radius)
            .with_color(p.color)
            .with_spin_rate(config.physics.spin_rate)
            .with_trail(config.trail)
    });

    let system = System::new(sun, config.physics, config.trail).with_planets(planets);
    log::info!("solar system ready with {} planets", system.planets().len());
    system
}

/// Strong-field black hole with four Newtonian planets and a photon beam
pub fn black_hole<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> System {
    debug_assert!(config.validate().is_ok());

    let hole = Body::newtonian("Black Hole", DVec3::ZERO, DVec3::ZERO, BLACK_HOLE_MASS)
        .with_kind(BodyKind::BlackHole)
        .with_radius(BLACK_HOLE_RADIUS)
        .with_color(HORIZON)
        .with_strong_field()
        .with_trail(config.trail);

    let planets = BLACK_HOLE_PLANETS.iter().map(|p| {
        Body::newtonian(
            p.name,
            DVec3::new(p.distance, 0.0, 0.0),
            DVec3::new(0.0, 0.0, p.speed),
            p.mass,
        )
        .with_radius(p.radius)
        .with_color(p.color)
        .with_spin_rate(config.physics.spin_rate)
        .with_trail(config.trail)
    });

    let system = System::new(hole, config.physics, config.trail)
        .with_planets(planets)
        .with_photon_beam(config.photons, rng);
    log::info!(
        "black hole ready: rs = {:.3}, {} planets, {} photons",
        config.physics.schwarzschild_radius(BLACK_HOLE_MASS),
        system.planets().len(),
        system.photons().len()
    );
    system
}

/// Camera distance that frames every planet orbit
pub fn recommended_camera_distance(system: &System) -> f64 {
    1.5 * system.max_planet_distance()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn solar_system_roster() {
        let system = solar_system(&SimConfig::solar_system());
        let names: Vec<&str> = system.planets().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn"]);
        assert!(system.planets().iter().all(Body::is_keplerian));
        assert!(system.photons().is_empty());
        assert_eq!(system.center().kind, BodyKind::Star);
        assert_relative_eq!(recommended_camera_distance(&system), 600.0);
    }

    #[test]
    fn black_hole_planets_start_near_circular() {
        let config = SimConfig::black_hole();
        let mut rng = StdRng::seed_from_u64(3);
        let system = black_hole(&config, &mut rng);

        assert!(system.center().strong_field);
        assert_eq!(system.photons().len(), config.photons.count);
        for planet in system.planets() {
            let r = planet.position.length();
            let v = planet.velocity().unwrap_or_default().length();
            let circular = (config.physics.g * BLACK_HOLE_MASS / r).sqrt();
            assert!((v / circular - 1.0).abs() < 0.15, "{} v={v} vc={circular}", planet.name);
        }
    }
}
