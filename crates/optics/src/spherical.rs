use std::f32::consts::PI;

use glam::{Vec2, Vec3};

/// Below this magnitude of `sin(phi)` the direction is treated as a pole and
/// `theta` collapses to zero instead of dividing by a vanishing value.
pub const POLE_EPSILON: f32 = 1e-4;

/// Maps a unit direction to equirectangular texture coordinates.
///
/// `phi` is the angle from the +Y axis, `theta` the angle of the XZ
/// projection from +X; both are normalised by pi. The same convention, with
/// no flip or mirror, is used for every environment lookup in the shaders.
pub fn to_spherical(dir: Vec3) -> Vec2 {
    let phi = dir.y.clamp(-1.0, 1.0).acos();
    let sin_phi = phi.sin();
    let theta = if sin_phi.abs() > POLE_EPSILON {
        (dir.x / sin_phi).clamp(-1.0, 1.0).acos()
    } else {
        0.0
    };
    Vec2::new(theta / PI, phi / PI)
}

/// Inverse of [`to_spherical`] for directions on the +Z hemisphere.
///
/// The forward map folds the sign of `z` (theta lands in `[0, pi]`), so the
/// reconstruction always has `z >= 0`.
pub fn from_spherical(uv: Vec2) -> Vec3 {
    let theta = uv.x * PI;
    let phi = uv.y * PI;
    let sin_phi = phi.sin();
    Vec3::new(sin_phi * theta.cos(), phi.cos(), sin_phi * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directions_off_pole() -> Vec<Vec3> {
        let mut dirs = Vec::new();
        for i in 0..24 {
            for j in 1..12 {
                let theta = i as f32 / 24.0 * PI;
                let phi = j as f32 / 12.0 * PI;
                dirs.push(Vec3::new(
                    phi.sin() * theta.cos(),
                    phi.cos(),
                    phi.sin() * theta.sin(),
                ));
            }
        }
        dirs
    }

    #[test]
    fn round_trips_away_from_the_poles() {
        for dir in directions_off_pole() {
            let rebuilt = from_spherical(to_spherical(dir));
            assert!(
                (rebuilt - dir).length() < 1e-4,
                "{dir:?} -> {rebuilt:?}"
            );
        }
    }

    #[test]
    fn uv_stays_in_unit_square() {
        for dir in directions_off_pole() {
            let uv = to_spherical(dir);
            assert!((0.0..=1.0).contains(&uv.x), "{uv:?}");
            assert!((0.0..=1.0).contains(&uv.y), "{uv:?}");
        }
    }

    #[test]
    fn poles_collapse_theta_to_zero() {
        let up = to_spherical(Vec3::Y);
        let down = to_spherical(Vec3::NEG_Y);
        assert_eq!(up.x, 0.0);
        assert_eq!(down.x, 0.0);
        assert!(up.y.abs() < 1e-6);
        assert!((down.y - 1.0).abs() < 1e-6);
    }
}
