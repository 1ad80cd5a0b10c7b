use std::f32::consts::PI;

use glam::Vec3;

/// BT.601-style luminance weights used by the saturation adjustment.
pub const LUMINANCE_WEIGHTS: Vec3 = Vec3::new(0.2125, 0.7154, 0.0721);

/// Rescales chroma around the luminance axis. An adjustment of 1.0 is the
/// identity; 0.0 collapses to grayscale; values above 1.0 extrapolate.
pub fn saturate_rgb(rgb: Vec3, adjustment: f32) -> Vec3 {
    let intensity = Vec3::splat(rgb.dot(LUMINANCE_WEIGHTS));
    intensity.lerp(rgb, adjustment)
}

/// Darkens everything but near-white regions (`c^8` per channel), the cheap
/// absorption stand-in applied to direct reflection and refraction samples.
pub fn remap_shadows(color: Vec3) -> Vec3 {
    Vec3::new(
        color.x.powi(8),
        color.y.powi(8),
        color.z.powi(8),
    )
}

/// Time-animated cosine palette tinting specular highlights and the nacre
/// term. Output stays within `[0.6, 1.0]` per channel.
pub fn spectrum(x: f32, time: f32) -> Vec3 {
    let a = Vec3::new(0.8, 0.8, 0.9);
    let b = Vec3::new(0.2, 0.1, 0.1);
    let c = Vec3::ONE;
    let d = Vec3::new(
        0.18 * (0.1 * time).cos(),
        0.33 + 0.18 * (0.2 * time).sin(),
        0.67,
    );
    let phase = (c * x + d) * 2.0 * PI;
    a + b * Vec3::new(phase.x.cos(), phase.y.cos(), phase.z.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturation_of_one_is_identity() {
        let samples = [
            Vec3::new(0.2, 0.4, 0.6),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::ONE,
            Vec3::new(0.33, 0.91, 0.05),
        ];
        for color in samples {
            let adjusted = saturate_rgb(color, 1.0);
            assert!((adjusted - color).length() < 1e-6, "{color:?} -> {adjusted:?}");
        }
    }

    #[test]
    fn saturation_of_zero_is_grayscale() {
        let gray = saturate_rgb(Vec3::new(0.8, 0.1, 0.3), 0.0);
        assert!((gray.x - gray.y).abs() < 1e-6);
        assert!((gray.y - gray.z).abs() < 1e-6);
    }

    #[test]
    fn shadow_remap_keeps_range_and_order() {
        assert_eq!(remap_shadows(Vec3::ZERO), Vec3::ZERO);
        assert!((remap_shadows(Vec3::ONE) - Vec3::ONE).length() < 1e-6);
        let dim = remap_shadows(Vec3::splat(0.5));
        let bright = remap_shadows(Vec3::splat(0.9));
        assert!(dim.x < bright.x);
        assert!(dim.x < 0.01);
    }

    #[test]
    fn spectrum_stays_in_display_range() {
        for i in 0..100 {
            let x = i as f32 / 100.0 * 3.0;
            let c = spectrum(x, i as f32 * 0.31);
            for channel in [c.x, c.y, c.z] {
                assert!((0.0..=1.0).contains(&channel), "spectrum produced {channel}");
            }
        }
    }
}
