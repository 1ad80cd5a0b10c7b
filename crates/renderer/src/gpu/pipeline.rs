use anyhow::Result;
use wgpu::naga::ShaderStage;

use crate::geometry::vertex_layout;
use crate::shaders::{
    base_defines, compile_shader, ShaderDefines, BACKDROP_FRAG, BUBBLE_FRAG, COMPOSITE_FRAG,
    FULLSCREEN_VERT, GLASS_FRAG, MESH_VERT,
};

use super::passes::CullMode;
use super::targets::{TARGET_COLOR_FORMAT, TARGET_DEPTH_FORMAT};

/// Bind group layouts shared by every pipeline of a scene.
pub(crate) struct PipelineLayouts {
    /// Group 0: the std140 parameter block, visible to both stages.
    pub uniform_layout: wgpu::BindGroupLayout,
    /// Group 1 for the glass material: input texture + equirect environment.
    pub glass_material_layout: wgpu::BindGroupLayout,
    /// Group 1 for the bubble material: cubemap.
    pub cubemap_layout: wgpu::BindGroupLayout,
    /// Backdrop blit: one texture and sampler.
    pub blit_layout: wgpu::BindGroupLayout,
    /// Composite: back and front target views plus a shared sampler.
    pub composite_layout: wgpu::BindGroupLayout,
}

fn texture_entry(binding: u32, dimension: wgpu::TextureViewDimension) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: dimension,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

impl PipelineLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let glass_material_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("glass material layout"),
                entries: &[
                    texture_entry(0, wgpu::TextureViewDimension::D2),
                    sampler_entry(1),
                    texture_entry(2, wgpu::TextureViewDimension::D2),
                    sampler_entry(3),
                ],
            });

        let cubemap_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cubemap layout"),
            entries: &[texture_entry(0, wgpu::TextureViewDimension::Cube), sampler_entry(1)],
        });

        let blit_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("backdrop blit layout"),
            entries: &[texture_entry(0, wgpu::TextureViewDimension::D2), sampler_entry(1)],
        });

        let composite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("composite layout"),
            entries: &[
                texture_entry(0, wgpu::TextureViewDimension::D2),
                texture_entry(1, wgpu::TextureViewDimension::D2),
                sampler_entry(2),
            ],
        });

        Self {
            uniform_layout,
            glass_material_layout,
            cubemap_layout,
            blit_layout,
            composite_layout,
        }
    }
}

fn offscreen_depth_state(write_enabled: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: TARGET_DEPTH_FORMAT,
        depth_write_enabled: write_enabled,
        depth_compare: if write_enabled {
            wgpu::CompareFunction::LessEqual
        } else {
            wgpu::CompareFunction::Always
        },
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

fn mesh_pipeline(
    device: &wgpu::Device,
    label: &str,
    layouts: &PipelineLayouts,
    material_layout: &wgpu::BindGroupLayout,
    fragment_source: &str,
    defines: &ShaderDefines,
    cull: CullMode,
) -> Result<wgpu::RenderPipeline> {
    let vertex_module =
        compile_shader(device, "mesh vertex", MESH_VERT, ShaderStage::Vertex, defines)?;
    let fragment_module =
        compile_shader(device, label, fragment_source, ShaderStage::Fragment, defines)?;

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[&layouts.uniform_layout, material_layout],
        push_constant_ranges: &[],
    });

    Ok(device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &vertex_module,
            entry_point: Some("main"),
            buffers: &[vertex_layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: cull.to_wgpu(),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(offscreen_depth_state(true)),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &fragment_module,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: TARGET_COLOR_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    }))
}

pub(crate) fn glass_pipeline(
    device: &wgpu::Device,
    layouts: &PipelineLayouts,
    loop_count: u32,
    cull: CullMode,
    single_pass: bool,
) -> Result<wgpu::RenderPipeline> {
    let mut defines = base_defines(loop_count);
    if single_pass {
        defines = defines.flag("SINGLE_PASS");
    }
    mesh_pipeline(
        device,
        "glass pipeline",
        layouts,
        &layouts.glass_material_layout,
        GLASS_FRAG,
        &defines,
        cull,
    )
}

pub(crate) fn bubble_pipeline(
    device: &wgpu::Device,
    layouts: &PipelineLayouts,
    loop_count: u32,
) -> Result<wgpu::RenderPipeline> {
    mesh_pipeline(
        device,
        "bubble pipeline",
        layouts,
        &layouts.cubemap_layout,
        BUBBLE_FRAG,
        &base_defines(loop_count),
        CullMode::None,
    )
}

/// Fullscreen blit of the backdrop raster, drawn before the mesh with depth
/// writes off so the mesh always lands on top.
pub(crate) fn backdrop_pipeline(
    device: &wgpu::Device,
    layouts: &PipelineLayouts,
) -> Result<wgpu::RenderPipeline> {
    let defines = ShaderDefines::new();
    let vertex_module = compile_shader(
        device,
        "fullscreen vertex",
        FULLSCREEN_VERT,
        ShaderStage::Vertex,
        &defines,
    )?;
    let fragment_module = compile_shader(
        device,
        "backdrop fragment",
        BACKDROP_FRAG,
        ShaderStage::Fragment,
        &defines,
    )?;
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("backdrop pipeline"),
        bind_group_layouts: &[&layouts.blit_layout],
        push_constant_ranges: &[],
    });
    Ok(device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("backdrop pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &vertex_module,
            entry_point: Some("main"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(offscreen_depth_state(false)),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &fragment_module,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: TARGET_COLOR_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    }))
}

/// Screen blend of the offscreen pair onto the swapchain. `front_blend` is
/// resolved into the shader at build time through the define table.
pub(crate) fn composite_pipeline(
    device: &wgpu::Device,
    layouts: &PipelineLayouts,
    surface_format: wgpu::TextureFormat,
    front_blend: f32,
) -> Result<wgpu::RenderPipeline> {
    let defines = ShaderDefines::new().float("FRONT_BLEND", f64::from(front_blend));
    let vertex_module = compile_shader(
        device,
        "fullscreen vertex",
        FULLSCREEN_VERT,
        ShaderStage::Vertex,
        &defines,
    )?;
    let fragment_module = compile_shader(
        device,
        "composite fragment",
        COMPOSITE_FRAG,
        ShaderStage::Fragment,
        &defines,
    )?;
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("composite pipeline"),
        bind_group_layouts: &[&layouts.composite_layout],
        push_constant_ranges: &[],
    });
    Ok(device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("composite pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &vertex_module,
            entry_point: Some("main"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &fragment_module,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    }))
}
