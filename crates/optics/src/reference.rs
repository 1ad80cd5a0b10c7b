//! CPU reference renderer.
//!
//! Evaluates the full fragment pipeline for every pixel of a frame, with the
//! same per-pixel independence the GPU relies on: no pixel reads another's
//! result, so the frame is a parallel map over rows. Numerical comparisons
//! against the GLSL path and the property tests both run through here.

use glam::{Vec2, Vec3};
use rayon::prelude::*;

use crate::color::{remap_shadows, spectrum};
use crate::compositor::{compose, PassKind, SurfaceSample};
use crate::dispersion;
use crate::params::OpticalParams;
use crate::shading::{fresnel, reflect, refract, specular};
use crate::spherical::to_spherical;

/// Fixed ratio used for the direct (non-dispersed) refraction sample.
pub const DIRECT_REFRACTION_ETA: f32 = 1.0 / 1.444;

/// Anything a direction- or screen-space lookup can sample from.
pub trait Environment: Sync {
    fn sample(&self, uv: Vec2) -> Vec3;
}

impl<F> Environment for F
where
    F: Fn(Vec2) -> Vec3 + Sync,
{
    fn sample(&self, uv: Vec2) -> Vec3 {
        self(uv)
    }
}

/// Constant-color environment, the placeholder until real assets load.
#[derive(Debug, Clone, Copy)]
pub struct FlatEnvironment(pub Vec3);

impl Environment for FlatEnvironment {
    fn sample(&self, _uv: Vec2) -> Vec3 {
        self.0
    }
}

/// Interpolated vertex state for one fragment.
#[derive(Debug, Clone, Copy)]
pub struct PixelInput {
    /// Fragment coordinate in device pixels; feeds the dispersion jitter.
    pub frag_coord: Vec2,
    /// Screen-space coordinate in `[0, 1]` used for input-texture lookups.
    pub uv: Vec2,
    /// View-space eye direction (constant, straight into the screen).
    pub eye: Vec3,
    /// World-space direction from the camera to the surface point.
    pub world_eye: Vec3,
    /// Unit surface normal, already flipped for back-face passes.
    pub normal: Vec3,
}

/// Frame-constant shading inputs.
pub struct ShadeContext<'a, E: Environment + ?Sized, B: Environment + ?Sized> {
    /// Equirectangular environment, sampled by direction.
    pub env: &'a E,
    /// Input texture: the backdrop, or the back target on the front pass.
    pub background: &'a B,
    pub params: &'a OpticalParams,
    pub time: f32,
    pub loop_count: u32,
    pub pass: PassKind,
}

/// Shades one fragment. Mirrors `glass.frag` top to bottom.
pub fn shade_pixel<E, B>(ctx: &ShadeContext<'_, E, B>, input: &PixelInput) -> Vec3
where
    E: Environment + ?Sized,
    B: Environment + ?Sized,
{
    let params = ctx.params;
    let f = fresnel(input.eye, input.normal, params.fresnel_power);

    let reflected = reflect(input.eye, input.normal).normalize_or_zero();
    let reflection = remap_shadows(ctx.env.sample(to_spherical(reflected)));

    let refracted = refract(input.eye, input.normal, DIRECT_REFRACTION_ETA).normalize_or_zero();
    let refraction = remap_shadows(ctx.background.sample(to_spherical(refracted)));

    let spec = specular(
        input.normal,
        input.eye,
        params.light,
        params.shininess,
        params.diffuseness,
    ) * params.light_strength;

    let background = |uv: Vec2| ctx.background.sample(uv);
    let internal = dispersion::internal(
        &background,
        input.uv,
        input.world_eye,
        input.normal,
        input.frag_coord,
        ctx.time,
        params,
        ctx.loop_count,
    );
    let external = dispersion::external(
        &background,
        input.uv,
        input.world_eye,
        input.normal,
        input.frag_coord,
        ctx.time,
        params,
        ctx.loop_count,
    );

    let sample = SurfaceSample {
        fresnel: f,
        reflection,
        refraction,
        dispersion: internal,
        external_dispersion: external,
        specular: spec,
        spectrum_specular: spectrum(spec, ctx.time),
        spectrum_fresnel: spectrum(f, ctx.time),
    };
    compose(&sample, ctx.pass, params)
}

/// Renders a full frame, row-parallel. `geometry` yields the interpolated
/// surface state for covered pixels and `None` where the backdrop shows
/// through.
pub fn render<E, B, G>(
    width: u32,
    height: u32,
    geometry: &G,
    ctx: &ShadeContext<'_, E, B>,
) -> Vec<Vec3>
where
    E: Environment + ?Sized,
    B: Environment + ?Sized,
    G: Fn(u32, u32) -> Option<PixelInput> + Sync,
{
    (0..height)
        .into_par_iter()
        .flat_map_iter(|y| {
            (0..width).map(move |x| match geometry(x, y) {
                Some(input) => shade_pixel(ctx, &input),
                None => {
                    let uv = Vec2::new(
                        (x as f32 + 0.5) / width as f32,
                        (y as f32 + 0.5) / height as f32,
                    );
                    ctx.background.sample(uv)
                }
            })
        })
        .collect()
}

/// Screen-filling sphere: the stock geometry for reference renders and
/// equivalence tests.
pub fn sphere_geometry(width: u32, height: u32) -> impl Fn(u32, u32) -> Option<PixelInput> + Sync {
    move |x, y| {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        let ndc = Vec2::new(
            (x as f32 + 0.5) / w * 2.0 - 1.0,
            1.0 - (y as f32 + 0.5) / h * 2.0,
        );
        let r2 = ndc.length_squared();
        if r2 >= 1.0 {
            return None;
        }
        let normal = Vec3::new(ndc.x, ndc.y, (1.0 - r2).sqrt());
        let eye = Vec3::new(0.0, 0.0, -1.0);
        Some(PixelInput {
            frag_coord: Vec2::new(x as f32 + 0.5, y as f32 + 0.5),
            uv: Vec2::new((x as f32 + 0.5) / w, (y as f32 + 0.5) / h),
            eye,
            world_eye: (normal * 0.2 + eye).normalize(),
            normal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_background(uv: Vec2) -> Vec3 {
        Vec3::new(uv.x.clamp(0.0, 1.0), uv.y.clamp(0.0, 1.0), 0.5)
    }

    #[test]
    fn parallel_render_matches_sequential_scan() {
        let params = OpticalParams::default();
        let env = FlatEnvironment(Vec3::new(0.7, 0.8, 0.9));
        let ctx = ShadeContext {
            env: &env,
            background: &gradient_background,
            params: &params,
            time: 1.5,
            loop_count: 8,
            pass: PassKind::Front,
        };
        let (w, h) = (24, 16);
        let geometry = sphere_geometry(w, h);
        let parallel = render(w, h, &geometry, &ctx);

        let mut sequential = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                sequential.push(match geometry(x, y) {
                    Some(input) => shade_pixel(&ctx, &input),
                    None => gradient_background(Vec2::new(
                        (x as f32 + 0.5) / w as f32,
                        (y as f32 + 0.5) / h as f32,
                    )),
                });
            }
        }

        assert_eq!(parallel.len(), sequential.len());
        for (a, b) in parallel.iter().zip(&sequential) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn covered_pixels_stay_in_display_range() {
        let params = OpticalParams::default();
        let env = FlatEnvironment(Vec3::ONE);
        for pass in [PassKind::Back, PassKind::Front, PassKind::Single] {
            let ctx = ShadeContext {
                env: &env,
                background: &gradient_background,
                params: &params,
                time: 0.0,
                loop_count: 8,
                pass,
            };
            let (w, h) = (16, 16);
            for color in render(w, h, &sphere_geometry(w, h), &ctx) {
                for channel in [color.x, color.y, color.z] {
                    assert!((0.0..=1.0).contains(&channel), "{pass:?}: {channel}");
                }
            }
        }
    }

    #[test]
    fn two_pass_blend_matches_manual_mix() {
        let params = OpticalParams::default();
        let env = FlatEnvironment(Vec3::splat(0.8));
        let geometry = sphere_geometry(8, 8);
        let back_ctx = ShadeContext {
            env: &env,
            background: &gradient_background,
            params: &params,
            time: 0.3,
            loop_count: 8,
            pass: PassKind::Back,
        };
        let front_ctx = ShadeContext { pass: PassKind::Front, ..back_ctx };
        let back = render(8, 8, &geometry, &back_ctx);
        let front = render(8, 8, &geometry, &front_ctx);
        for (b, f) in back.iter().zip(&front) {
            let blended = crate::compositor::screen_blend(*b, *f);
            let expected = *b * (1.0 - crate::compositor::FRONT_BLEND)
                + *f * crate::compositor::FRONT_BLEND;
            assert!((blended - expected).length() < 1e-6);
        }
    }
}
