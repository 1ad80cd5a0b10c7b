//! Final per-pixel color assembly.

use glam::Vec3;

use crate::params::OpticalParams;

/// Blend weight of the front buffer when the two offscreen passes are
/// combined into the visible frame. Tuned, not derived.
pub const FRONT_BLEND: f32 = 0.98;

/// Which leg of the render sequence a fragment is being shaded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Back faces into the back target, normals flipped.
    Back,
    /// Front faces into the front target, fed by the back target.
    Front,
    /// Legacy one-pass rendering straight to the frame.
    Single,
}

impl PassKind {
    /// Weight on the internal dispersion term. The back pass contributes a
    /// quarter so the interior read-through stays dim.
    pub fn dispersion_weight(self) -> f32 {
        match self {
            PassKind::Back => 0.25,
            PassKind::Front | PassKind::Single => 1.0,
        }
    }
}

/// Everything the compositor needs for one fragment, already sampled.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceSample {
    pub fresnel: f32,
    /// Shadow-remapped environment reflection.
    pub reflection: Vec3,
    /// Shadow-remapped direct refraction of the input texture.
    pub refraction: Vec3,
    /// Internal (transmitted) dispersion accumulator output.
    pub dispersion: Vec3,
    /// External (reflected) dispersion accumulator output.
    pub external_dispersion: Vec3,
    pub specular: f32,
    /// Spectrum palette evaluated at the specular value.
    pub spectrum_specular: Vec3,
    /// Spectrum palette evaluated at the fresnel value.
    pub spectrum_fresnel: Vec3,
}

/// Combines the shading terms into the fragment color, clamped to display
/// range.
pub fn compose(sample: &SurfaceSample, pass: PassKind, params: &OpticalParams) -> Vec3 {
    let color = match pass {
        PassKind::Back | PassKind::Front => {
            sample.dispersion * pass.dispersion_weight()
                + sample.external_dispersion * sample.specular
                + sample.reflection * (sample.fresnel * params.reflect_power).powi(2)
                + sample.spectrum_specular * sample.specular
                + sample.spectrum_fresnel * sample.fresnel * params.nacre
        }
        PassKind::Single => {
            // The older flat blend: refraction against reflection by fresnel,
            // dispersion layered the same way, spectrum tints on top.
            sample.refraction.lerp(sample.reflection, sample.fresnel)
                + sample.dispersion.lerp(sample.external_dispersion, sample.fresnel)
                + sample.spectrum_specular * sample.specular
                + sample.spectrum_fresnel * sample.fresnel
        }
    };
    color.clamp(Vec3::ZERO, Vec3::ONE)
}

/// Screen blend of the two offscreen buffers, heavily favoring the front
/// pass.
pub fn screen_blend(back: Vec3, front: Vec3) -> Vec3 {
    back.lerp(front, FRONT_BLEND)
}
