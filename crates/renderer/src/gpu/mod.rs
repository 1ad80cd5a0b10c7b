mod context;
pub mod passes;
mod pipeline;
mod state;
pub mod targets;
pub mod uniforms;

pub use state::{FrameInput, MaterialKind, Renderer, RendererOptions};
pub use targets::{SurfaceMetrics, DPR_CAP};
pub use uniforms::{GlassUniforms, TIME_STEP};
