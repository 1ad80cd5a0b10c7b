use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use optics::OpticalParams;

/// Fixed per-tick advance of the time uniform. Playback is refresh-rate
/// dependent by design.
pub const TIME_STEP: f32 = 0.01;

/// CPU mirror of the `GlassParams` std140 block declared in the shaders.
/// Field order and packing must match the GLSL declaration exactly.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub struct GlassUniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    /// xyz camera position, w flip-normal flag.
    pub camera: [f32; 4],
    /// xy viewport pixels, z time, w dispersion pass weight.
    pub resolution: [f32; 4],
    /// ior red, yellow, green, cyan.
    pub ior_a: [f32; 4],
    /// ior blue, purple, saturation, chromatic aberration.
    pub ior_b: [f32; 4],
    /// refract, reflect, fresnel, nacre powers.
    pub powers: [f32; 4],
    /// xyz light direction, w shininess.
    pub light: [f32; 4],
    /// diffuseness, light strength, slide, salt.
    pub shading: [f32; 4],
}

unsafe impl Zeroable for GlassUniforms {}
unsafe impl Pod for GlassUniforms {}

impl GlassUniforms {
    pub fn new(resolution: [f32; 2]) -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            model: identity,
            view: identity,
            proj: identity,
            camera: [0.0, 0.0, 4.0, 0.0],
            resolution: [resolution[0], resolution[1], 0.0, 1.0],
            ior_a: [1.0; 4],
            ior_b: [1.0, 1.0, 1.0, 0.25],
            powers: [1.0, 1.0, 4.0, 0.5],
            light: [-1.0, 0.0, 1.0, 40.0],
            shading: [0.2, 1.0, 0.1, 0.05],
        }
    }

    pub fn set_resolution(&mut self, resolution: [f32; 2]) {
        self.resolution[0] = resolution[0];
        self.resolution[1] = resolution[1];
    }

    pub fn set_time(&mut self, time: f32) {
        self.resolution[2] = time;
    }

    pub fn time(&self) -> f32 {
        self.resolution[2]
    }

    pub fn set_pass(&mut self, flip_normal: bool, dispersion_weight: f32) {
        self.camera[3] = if flip_normal { 1.0 } else { 0.0 };
        self.resolution[3] = dispersion_weight;
    }

    pub fn set_camera(&mut self, view: Mat4, proj: Mat4, eye: Vec3) {
        self.view = view.to_cols_array_2d();
        self.proj = proj.to_cols_array_2d();
        self.camera[0] = eye.x;
        self.camera[1] = eye.y;
        self.camera[2] = eye.z;
    }

    pub fn set_model(&mut self, model: Mat4) {
        self.model = model.to_cols_array_2d();
    }

    /// Copies the whole tunable surface in; called once per frame so panel
    /// edits land before the next pass.
    pub fn set_params(&mut self, params: &OpticalParams) {
        self.ior_a = [params.ior_r, params.ior_y, params.ior_g, params.ior_c];
        self.ior_b = [
            params.ior_b,
            params.ior_p,
            params.saturation,
            params.chromatic_aberration,
        ];
        self.powers = [
            params.refract_power,
            params.reflect_power,
            params.fresnel_power,
            params.nacre,
        ];
        self.light = [
            params.light.x,
            params.light.y,
            params.light.z,
            params.shininess,
        ];
        self.shading = [
            params.diffuseness,
            params.light_strength,
            params.dispersion_slide,
            params.dispersion_salt,
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_size_is_a_multiple_of_sixteen() {
        // std140 requires it; three mat4s plus seven vec4s.
        assert_eq!(std::mem::size_of::<GlassUniforms>(), 3 * 64 + 7 * 16);
        assert_eq!(std::mem::size_of::<GlassUniforms>() % 16, 0);
    }

    #[test]
    fn params_map_onto_the_packed_vectors() {
        let mut uniforms = GlassUniforms::new([640.0, 480.0]);
        let mut params = OpticalParams::default();
        params.ior_r = 1.25;
        params.saturation = 1.5;
        params.nacre = 0.75;
        params.dispersion_salt = 0.02;
        uniforms.set_params(&params);
        assert_eq!(uniforms.ior_a[0], 1.25);
        assert_eq!(uniforms.ior_b[2], 1.5);
        assert_eq!(uniforms.powers[3], 0.75);
        assert_eq!(uniforms.shading[3], 0.02);
    }

    #[test]
    fn pass_state_toggles_flip_and_weight() {
        let mut uniforms = GlassUniforms::new([100.0, 100.0]);
        uniforms.set_pass(true, 0.25);
        assert_eq!(uniforms.camera[3], 1.0);
        assert_eq!(uniforms.resolution[3], 0.25);
        uniforms.set_pass(false, 1.0);
        assert_eq!(uniforms.camera[3], 0.0);
        assert_eq!(uniforms.resolution[3], 1.0);
    }

    #[test]
    fn time_advances_in_fixed_steps() {
        let mut uniforms = GlassUniforms::new([100.0, 100.0]);
        for _ in 0..10 {
            uniforms.set_time(uniforms.time() + TIME_STEP);
        }
        assert!((uniforms.time() - 0.1).abs() < 1e-6);
    }
}
