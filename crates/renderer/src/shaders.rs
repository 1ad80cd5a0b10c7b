//! GLSL source assembly and compilation.
//!
//! The shader files carry no `#version` line and no numeric constants of
//! their own; both come from here. Host-side constants reach the GLSL
//! through [`ShaderDefines`], a typed table rendered into a `#define`
//! prelude at pipeline-build time, so a value like pi is written in exactly
//! one place.

use std::borrow::Cow;

use anyhow::Result;
use wgpu::naga::ShaderStage;

pub const MESH_VERT: &str = include_str!("shaders/mesh.vert");
pub const FULLSCREEN_VERT: &str = include_str!("shaders/fullscreen.vert");
pub const GLASS_FRAG: &str = include_str!("shaders/glass.frag");
pub const BUBBLE_FRAG: &str = include_str!("shaders/bubble.frag");
pub const BACKDROP_FRAG: &str = include_str!("shaders/backdrop.frag");
pub const COMPOSITE_FRAG: &str = include_str!("shaders/composite.frag");

/// Compile-time parameter table for a shader module.
#[derive(Debug, Clone, Default)]
pub struct ShaderDefines {
    entries: Vec<(&'static str, String)>,
}

impl ShaderDefines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn int(mut self, name: &'static str, value: i64) -> Self {
        self.entries.push((name, value.to_string()));
        self
    }

    pub fn float(mut self, name: &'static str, value: f64) -> Self {
        // `{:?}` prints the shortest representation that round-trips, so the
        // GLSL constant carries full precision.
        self.entries.push((name, format!("{value:?}")));
        self
    }

    pub fn flag(mut self, name: &'static str) -> Self {
        self.entries.push((name, String::new()));
        self
    }

    fn render(&self) -> String {
        let mut prelude = String::new();
        for (name, value) in &self.entries {
            if value.is_empty() {
                prelude.push_str(&format!("#define {name}\n"));
            } else {
                prelude.push_str(&format!("#define {name} {value}\n"));
            }
        }
        prelude
    }
}

/// Constants shared by every material shader.
pub fn base_defines(loop_count: u32) -> ShaderDefines {
    ShaderDefines::new()
        .float("PI", std::f64::consts::PI)
        .float("POLE_EPSILON", f64::from(optics::spherical::POLE_EPSILON))
        .float(
            "DIRECT_REFRACTION_ETA",
            f64::from(optics::reference::DIRECT_REFRACTION_ETA),
        )
        .int("DISPERSION_LOOP", i64::from(loop_count.max(1)))
}

fn assemble(source: &str, defines: &ShaderDefines) -> String {
    format!("#version 450\n{}#line 1\n{}", defines.render(), source)
}

/// Compiles an assembled GLSL stage through naga's frontend.
pub fn compile_shader(
    device: &wgpu::Device,
    label: &str,
    source: &str,
    stage: ShaderStage,
    defines: &ShaderDefines,
) -> Result<wgpu::ShaderModule> {
    let assembled = assemble(source, defines);
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(assembled),
            stage,
            defines: &[],
        },
    }))
}
