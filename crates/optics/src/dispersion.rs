//! Six-band chromatic dispersion accumulator.
//!
//! Wavelength-dependent refraction is faked by sampling the input texture at
//! six slightly different offsets, one per synthetic spectral band (red,
//! yellow, green, cyan, blue, purple), and folding the bands back into RGB
//! through a fixed mixing matrix. Looping with a jittered slide trades a
//! little noise for the banding a small fixed sample count would show.

use glam::{Vec2, Vec3};

use crate::color::saturate_rgb;
use crate::hash::hash13;
use crate::params::OpticalParams;
use crate::shading::{reflect, refract};
use crate::spherical::to_spherical;

pub const BAND_COUNT: usize = 6;

/// How one band turns a texture sample into a scalar response.
#[derive(Debug, Clone, Copy)]
enum BandExtract {
    /// Read a single RGB channel.
    Primary(usize),
    /// Cross-channel composite `(4a + 4b - 2c) / 6` after a swizzle,
    /// approximating a narrow band from three broad channels.
    Composite([usize; 3]),
}

#[derive(Debug, Clone, Copy)]
struct Band {
    extract: BandExtract,
    /// Multiplier on the slide ramp; outer bands spread further per step.
    rate: f32,
}

/// Red through purple, matching the order of [`OpticalParams::band_iors`].
const BANDS: [Band; BAND_COUNT] = [
    Band { extract: BandExtract::Primary(0), rate: 1.0 },
    Band { extract: BandExtract::Composite([0, 1, 2]), rate: 2.5 },
    Band { extract: BandExtract::Primary(1), rate: 2.0 },
    Band { extract: BandExtract::Composite([1, 2, 0]), rate: 2.5 },
    Band { extract: BandExtract::Primary(2), rate: 3.0 },
    Band { extract: BandExtract::Composite([2, 0, 1]), rate: 3.0 },
];

fn band_sample<S>(sample: &S, uv: Vec2, offset: Vec2, scale: f32, aberration: f32) -> Vec3
where
    S: Fn(Vec2) -> Vec3 + ?Sized,
{
    sample(uv + offset * scale * aberration) * 0.5
}

fn band_response<S>(
    sample: &S,
    uv: Vec2,
    offset: Vec2,
    scale: f32,
    aberration: f32,
    band: &Band,
) -> f32
where
    S: Fn(Vec2) -> Vec3 + ?Sized,
{
    let sampled = band_sample(sample, uv, offset, scale, aberration);
    match band.extract {
        BandExtract::Primary(channel) => sampled[channel],
        BandExtract::Composite(rule) => {
            let swizzled = Vec3::new(sampled[rule[0]], sampled[rule[1]], sampled[rule[2]]);
            (swizzled.x * 4.0 + swizzled.y * 4.0 - swizzled.z * 2.0) / 6.0
        }
    }
}

/// Shared accumulator loop. `offsets` holds one sampling direction per band
/// and `power` the base spread (refractive or reflective) the slide ramps on.
fn accumulate<S>(
    sample: &S,
    uv: Vec2,
    offsets: &[Vec2; BAND_COUNT],
    power: f32,
    frag_coord: Vec2,
    time: f32,
    params: &OpticalParams,
    loop_count: u32,
) -> Vec3
where
    S: Fn(Vec2) -> Vec3 + ?Sized,
{
    let loop_count = loop_count.max(1);
    let jitter = hash13(frag_coord.extend(time));
    let mut color = Vec3::ZERO;

    for i in 0..loop_count {
        let slide =
            i as f32 / loop_count as f32 * params.dispersion_slide + jitter * params.dispersion_salt;

        let mut responses = [0.0f32; BAND_COUNT];
        for (response, (offset, band)) in
            responses.iter_mut().zip(offsets.iter().zip(BANDS.iter()))
        {
            let scale = power + slide * band.rate;
            *response = band_response(
                sample,
                uv,
                *offset,
                scale,
                params.chromatic_aberration,
                band,
            );
        }
        let [r, y, g, c, b, p] = responses;

        // Spectral-to-RGB reconstruction; contributions clamp before the sum
        // so the mixing matrix cannot amplify out-of-range inputs.
        color += Vec3::new(
            (r + (2.0 * p + 2.0 * y - c) / 3.0).clamp(0.0, 1.0),
            (g + (2.0 * y + 2.0 * c - p) / 3.0).clamp(0.0, 1.0),
            (b + (2.0 * c + 2.0 * p - y) / 3.0).clamp(0.0, 1.0),
        );

        // Re-saturating the running sum each iteration (not once at the end)
        // is intentional; it matches the tuned look.
        color = saturate_rgb(color, params.saturation);
    }

    (color / loop_count as f32).clamp(Vec3::ZERO, Vec3::ONE)
}

/// Dispersion of light passing through the surface: each band refracts the
/// view direction with its own index of refraction.
pub fn internal<S>(
    sample: &S,
    uv: Vec2,
    eye: Vec3,
    normal: Vec3,
    frag_coord: Vec2,
    time: f32,
    params: &OpticalParams,
    loop_count: u32,
) -> Vec3
where
    S: Fn(Vec2) -> Vec3 + ?Sized,
{
    let iors = params.band_iors();
    let mut offsets = [Vec2::ZERO; BAND_COUNT];
    for (offset, ior) in offsets.iter_mut().zip(iors) {
        *offset = refract(eye, normal, 1.0 / ior).truncate();
    }
    accumulate(
        sample,
        uv,
        &offsets,
        params.refract_power,
        frag_coord,
        time,
        params,
        loop_count,
    )
}

/// Dispersion of light bouncing off the surface: every band shares the
/// spherical coordinate of the reflected direction and spreads on the
/// reflect power instead.
pub fn external<S>(
    sample: &S,
    uv: Vec2,
    eye: Vec3,
    normal: Vec3,
    frag_coord: Vec2,
    time: f32,
    params: &OpticalParams,
    loop_count: u32,
) -> Vec3
where
    S: Fn(Vec2) -> Vec3 + ?Sized,
{
    let reflected = to_spherical(reflect(eye, -normal));
    accumulate(
        sample,
        uv,
        &[reflected; BAND_COUNT],
        params.reflect_power,
        frag_coord,
        time,
        params,
        loop_count,
    )
}
