//! Scenario presets driven for a while, the way the viewers drive them.

use celestial::scenario;
use celestial::scenery;
use celestial::{Camera, Projection, SimClock, SimConfig};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_solar_system_runs_without_captures() {
    let config = SimConfig::solar_system();
    let mut system = scenario::solar_system(&config);
    let mut clock = SimClock::new(&config.clock);

    for _ in 0..500 {
        let report = system.tick(clock.dt(), clock.is_paused());
        assert!(report.is_empty());
    }
    clock.toggle_pause();
    let elapsed = system.elapsed();
    system.tick(clock.dt(), clock.is_paused());
    assert_eq!(system.elapsed(), elapsed);

    for planet in system.planets() {
        let orbit = planet
            .orbit()
            .copied()
            .unwrap_or_else(|| panic!("{} is keplerian", planet.name));
        approx::assert_relative_eq!(planet.position.length(), orbit.distance, epsilon = 1e-9);
        assert_eq!(planet.trail().len(), config.trail.capacity);
    }
}

#[test]
fn test_black_hole_photons_leave_or_fall_in() {
    let config = SimConfig::black_hole();
    let mut rng = StdRng::seed_from_u64(42);
    let mut system = scenario::black_hole(&config, &mut rng);
    let start_mass = system.center().mass;

    for _ in 0..2000 {
        system.tick(config.clock.dt, false);
    }

    // Photons head almost straight for the hole and either cross the
    // horizon or slingshot out of the volume.
    assert!(system.photons().is_empty());
    assert_eq!(
        system.escaped() + system.photons_captured(),
        config.photons.count
    );
    assert!(system.center().mass >= start_mass);
    assert!(system.captured().is_empty());

    system.reset_photons(&mut rng);
    assert_eq!(system.photons().len(), config.photons.count);
}

#[test]
fn test_planets_visible_from_default_camera() {
    let config = SimConfig::solar_system();
    let system = scenario::solar_system(&config);
    let camera = Camera::new(config.camera);
    let projection = Projection::new(&config.projection, 1600, 900);
    let view = camera.view_matrix();

    // Every planet starts on the +x axis; Saturn at 400 needs a wide window
    for body in system.bodies() {
        let world = body.position.as_vec3();
        let point = projection.project(world, &view);
        assert!(
            point.is_some_and(|p| p.is_visible(1600.0, 900.0)),
            "{} should be on screen",
            body.name
        );
    }
}

#[test]
fn test_scenery_for_black_hole() {
    let config = SimConfig::black_hole();
    let vertices = scenery::spacetime_grid(&config.grid, 450.0, &config.physics);
    let lines = scenery::grid_lines(&vertices, config.grid.divisions);
    assert_eq!(lines.len(), 2 * (config.grid.divisions + 1));
    assert!(vertices.iter().all(|v| v.y <= 0.0));

    let mut rng = StdRng::seed_from_u64(5);
    let stars = scenery::star_field(100, 1500.0, &mut rng);
    assert!(stars.iter().all(|s| s.as_vec3().length() > 1000.0));
    assert_ne!(stars[0].as_vec3(), Vec3::ZERO);
}
