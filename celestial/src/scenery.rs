//! Static geometry drawn around the bodies: orbit loops, the warped
//! spacetime grid and the background star field

use std::f64::consts::TAU;

use glam::DVec3;
use rand::Rng;

use crate::body::Body;
use crate::config::{GridConfig, PhysicsConfig};

/// Closed loop along a Keplerian orbit, first point repeated at the end.
///
/// Newtonian bodies have no analytic orbit and yield `None`.
pub fn orbit_loop(body: &Body, segments: usize) -> Option<Vec<DVec3>> {
    let orbit = body.orbit()?;
    let segments = segments.max(3);
    Some(
        (0..=segments)
            .map(|i| orbit.point(TAU * i as f64 / segments as f64))
            .collect(),
    )
}

/// Row-major `(divisions + 1)²` vertices over `[-size, size]²` in the xz plane.
///
/// With `center_mass` of zero the grid is flat. Otherwise it sinks towards a
/// well around the origin whose rim is the Schwarzschild radius magnified by
/// `rs_scale`.
pub fn spacetime_grid(grid: &GridConfig, center_mass: f64, physics: &PhysicsConfig) -> Vec<DVec3> {
    let n = grid.divisions.max(1);
    let step = 2.0 * grid.size / n as f64;
    let rs = physics.schwarzschild_radius(center_mass) * grid.rs_scale;

    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    for row in 0..=n {
        let z = -grid.size + row as f64 * step;
        for col in 0..=n {
            let x = -grid.size + col as f64 * step;
            let y = if center_mass > 0.0 && rs > 0.0 {
                let d = (x * x + z * z).sqrt().max(1.0);
                if d > rs {
                    -grid.depth * rs / d
                } else {
                    -grid.depth
                }
            } else {
                0.0
            };
            vertices.push(DVec3::new(x, y, z));
        }
    }
    vertices
}

/// Split grid vertices into polylines: every row, then every column
pub fn grid_lines(vertices: &[DVec3], divisions: usize) -> Vec<Vec<DVec3>> {
    let stride = divisions.max(1) + 1;
    if vertices.len() != stride * stride {
        log::warn!(
            "grid has {} vertices, expected {}",
            vertices.len(),
            stride * stride
        );
        return Vec::new();
    }

    let rows = vertices.chunks(stride).map(<[DVec3]>::to_vec);
    let columns = (0..stride).map(|col| {
        (0..stride)
            .map(|row| vertices[row * stride + col])
            .collect::<Vec<_>>()
    });
    rows.chain(columns).collect()
}

/// Points spread uniformly over a sphere of `radius`
pub fn star_field<R: Rng + ?Sized>(count: usize, radius: f64, rng: &mut R) -> Vec<DVec3> {
    (0..count)
        .map(|_| {
            let z: f64 = rng.gen_range(-1.0..=1.0);
            let theta: f64 = rng.gen_range(0.0..TAU);
            let r = (1.0 - z * z).sqrt();
            DVec3::new(r * theta.cos(), r * theta.sin(), z) * radius
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn black_hole_physics() -> PhysicsConfig {
        PhysicsConfig {
            g: 1.0,
            c: 20.0,
            ..PhysicsConfig::default()
        }
    }

    #[test]
    fn orbit_loop_is_closed_and_on_radius() {
        let planet = Body::keplerian("Venus", 100.0, 0.015, 3.4);
        let points = orbit_loop(&planet, 64).unwrap_or_default();
        assert_eq!(points.len(), 65);
        assert!(points[0].abs_diff_eq(points[64], 1e-9));
        for p in &points {
            assert_relative_eq!(p.length(), 100.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn newtonian_body_has_no_orbit_loop() {
        let rock = Body::newtonian("Rock", DVec3::X, DVec3::ZERO, 1.0);
        assert!(orbit_loop(&rock, 32).is_none());
    }

    #[test]
    fn flat_grid_without_mass() {
        let grid = GridConfig::default();
        let vertices = spacetime_grid(&grid, 0.0, &black_hole_physics());
        assert_eq!(vertices.len(), 21 * 21);
        assert!(vertices.iter().all(|v| v.y == 0.0));
        assert_eq!(vertices[0], DVec3::new(-400.0, 0.0, -400.0));
        assert_eq!(vertices[440], DVec3::new(400.0, 0.0, 400.0));
    }

    #[test]
    fn warped_grid_sinks_towards_center() {
        let grid = GridConfig::default();
        let physics = black_hole_physics();
        let vertices = spacetime_grid(&grid, 450.0, &physics);

        // rs = 2.25 * 20 = 45, so the origin is inside the well
        let center = vertices[10 * 21 + 10];
        assert_eq!(center.x, 0.0);
        assert_eq!(center.y, -60.0);

        // (400, 0) is outside: y = -60 * 45 / 400
        let edge = vertices[10 * 21 + 20];
        assert_relative_eq!(edge.y, -60.0 * 45.0 / 400.0, epsilon = 1e-9);

        let corner = vertices[0];
        assert!(corner.y > edge.y);
    }

    #[test]
    fn grid_lines_cover_rows_and_columns() {
        let grid = GridConfig {
            divisions: 4,
            ..GridConfig::default()
        };
        let vertices = spacetime_grid(&grid, 0.0, &black_hole_physics());
        let lines = grid_lines(&vertices, grid.divisions);
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|l| l.len() == 5));
        // First column runs along z at x = -size
        assert!(lines[5].iter().all(|p| p.x == -400.0));
    }

    #[test]
    fn stars_lie_on_sphere() {
        let mut rng = StdRng::seed_from_u64(11);
        let stars = star_field(200, 1500.0, &mut rng);
        assert_eq!(stars.len(), 200);
        for star in stars {
            assert_relative_eq!(star.length(), 1500.0, epsilon = 1e-6);
        }
    }
}
