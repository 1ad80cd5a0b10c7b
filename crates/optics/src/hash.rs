use glam::Vec3;

fn fract(value: f32) -> f32 {
    value - value.floor()
}

/// 3D-to-1D hash, used as the per-pixel dispersion jitter.
///
/// Ported unchanged from the fragment shader so CPU and GPU agree bit-for-bit
/// up to floating point. Output is in `[0, 1)`.
pub fn hash13(p: Vec3) -> f32 {
    let mut p3 = Vec3::new(fract(p.x * 0.1031), fract(p.y * 0.1031), fract(p.z * 0.1031));
    let shifted = Vec3::new(p3.z, p3.y, p3.x) + Vec3::splat(31.32);
    p3 += Vec3::splat(p3.dot(shifted));
    fract((p3.x + p3.y) * p3.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_in_unit_interval() {
        for i in 0..64 {
            for j in 0..64 {
                let value = hash13(Vec3::new(i as f32 * 13.7, j as f32 * 7.3, 0.42));
                assert!((0.0..1.0).contains(&value), "hash13 produced {value}");
            }
        }
    }

    #[test]
    fn deterministic_for_equal_inputs() {
        let p = Vec3::new(812.0, 333.5, 1.25);
        assert_eq!(hash13(p), hash13(p));
    }

    #[test]
    fn nearby_pixels_decorrelate() {
        // Not a statistical test, just a guard against a degenerate port that
        // returns the same value for every fragment.
        let a = hash13(Vec3::new(100.0, 100.0, 1.0));
        let b = hash13(Vec3::new(101.0, 100.0, 1.0));
        assert_ne!(a, b);
    }
}
