//! wgpu host for the glass demo scenes.
//!
//! The crate owns everything between the window handle and the swapchain:
//! the GPU context, the offscreen back/front target pair, the compiled
//! material pipelines, mesh geometry, the backdrop raster, and environment
//! texture loading. The shading math itself lives twice: as GLSL under
//! `src/shaders/` for the GPU, and in the `optics` crate for the CPU
//! reference the tests compare against.
//!
//! Frame orchestration is data-first: [`passes`] describes the per-frame
//! render sequence as a plain list of pass descriptors, and [`Renderer`]
//! walks it in order. The host (the `glassworks` binary) drives one
//! [`Renderer::render`] call per display refresh.

pub mod background;
pub mod camera;
pub mod environment;
pub mod geometry;
mod gpu;
pub mod shaders;

pub use gpu::passes;
pub use gpu::{
    FrameInput, GlassUniforms, MaterialKind, Renderer, RendererOptions, SurfaceMetrics, DPR_CAP,
    TIME_STEP,
};
