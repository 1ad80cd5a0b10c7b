//! CPU-side implementation of the glass shading mathematics.
//!
//! Everything in this crate mirrors the GLSL in the `renderer` crate term for
//! term: the spherical environment lookup, the six-band dispersion
//! accumulator, the Fresnel/specular shading terms, and the final compositing
//! step. The renderer owns the GPU copy; this crate is the reference the test
//! suite runs against, and the single source of truth for the tunable
//! parameter surface (names, defaults, ranges).
//!
//! None of the functions here touch global state. The per-pixel entry points
//! take the parameter set by reference and are independent per pixel, which
//! is what lets [`reference::render`] evaluate them with a parallel iterator.

pub mod color;
pub mod compositor;
pub mod dispersion;
pub mod hash;
pub mod noise;
pub mod params;
pub mod reference;
pub mod shading;
pub mod spherical;

pub use compositor::{compose, screen_blend, PassKind, SurfaceSample, FRONT_BLEND};
pub use params::{OpticalParams, ParamDescriptor, ParamSlot, DESCRIPTORS};
pub use reference::{render, shade_pixel, Environment, FlatEnvironment, PixelInput, ShadeContext};
