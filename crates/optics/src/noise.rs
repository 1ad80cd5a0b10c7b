//! 3D gradient noise driving the bubble scene's vertex displacement.

use glam::Vec3;

fn hash3(cell: Vec3, seed: f32) -> Vec3 {
    // Integer-lattice variant of hash13: three decorrelated channels per cell.
    let p = cell + Vec3::splat(seed * 17.013);
    let dot = p.dot(Vec3::new(127.1, 311.7, 74.7));
    Vec3::new(
        (dot.sin() * 43758.547).fract(),
        ((dot + 19.19).sin() * 43758.547).fract(),
        ((dot + 47.57).sin() * 43758.547).fract(),
    ) * 2.0
        - Vec3::ONE
}

fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Gradient noise over the unit lattice, output in `[-1, 1]`.
///
/// Deterministic for a fixed `seed`; the bubble displacement depends on that
/// so a paused scene re-renders identically.
pub fn gradient3(p: Vec3, seed: f32) -> f32 {
    let cell = p.floor();
    let frac = p - cell;

    let mut value = 0.0;
    for corner_z in 0..2 {
        for corner_y in 0..2 {
            for corner_x in 0..2 {
                let corner = Vec3::new(corner_x as f32, corner_y as f32, corner_z as f32);
                let gradient = hash3(cell + corner, seed).normalize_or_zero();
                let offset = frac - corner;
                let weight = fade(1.0 - offset.x.abs().min(1.0))
                    * fade(1.0 - offset.y.abs().min(1.0))
                    * fade(1.0 - offset.z.abs().min(1.0));
                value += weight * gradient.dot(offset);
            }
        }
    }
    value.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_and_deterministic() {
        for i in 0..200 {
            let p = Vec3::new(i as f32 * 0.37, (i as f32 * 0.11).sin() * 5.0, i as f32 * -0.23);
            let a = gradient3(p, 7.0);
            let b = gradient3(p, 7.0);
            assert_eq!(a, b);
            assert!((-1.0..=1.0).contains(&a), "noise produced {a}");
        }
    }

    #[test]
    fn seed_changes_the_field() {
        let p = Vec3::new(1.3, 2.7, -0.4);
        assert_ne!(gradient3(p, 1.0), gradient3(p, 2.0));
    }

    #[test]
    fn field_is_continuous_over_small_steps() {
        let p = Vec3::new(0.45, 1.2, 3.3);
        let here = gradient3(p, 0.0);
        let near = gradient3(p + Vec3::splat(1e-3), 0.0);
        assert!((here - near).abs() < 0.05);
    }
}
