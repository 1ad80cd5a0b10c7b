use std::path::PathBuf;

use anyhow::{Context as AnyhowContext, Result};
use glam::{Mat4, Vec3};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use wgpu::util::{DeviceExt, TextureDataOrder};

use optics::{OpticalParams, FRONT_BLEND};

use crate::background::Backdrop;
use crate::environment::{CubemapImage, EquirectImage};
use crate::geometry::{BoundingSphere, MeshData, Shape, Vertex};

use super::context::GpuContext;
use super::passes::{
    bubble_plan, single_pass_plan, two_pass_plan, CullMode, InputBinding, PassDesc, PassStage,
    TargetSlot,
};
use super::pipeline::{
    backdrop_pipeline, bubble_pipeline, composite_pipeline, glass_pipeline, PipelineLayouts,
};
use super::targets::{SurfaceMetrics, TargetPair};
use super::uniforms::GlassUniforms;

/// Which material/pass arrangement a scene renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    Glass { two_pass: bool },
    Bubble,
}

#[derive(Debug, Clone)]
pub struct RendererOptions {
    pub material: MaterialKind,
    /// Dispersion loop iterations, resolved into the shader at build time.
    pub loop_count: u32,
    pub shape: Shape,
    pub backdrop_text: String,
    /// File-backed backdrop; overrides the synthesized text raster.
    pub backdrop_image: Option<PathBuf>,
}

/// Everything the frame driver pushes into a single render call.
pub struct FrameInput<'a> {
    pub params: &'a OpticalParams,
    pub time: f32,
    pub model: Mat4,
    pub view: Mat4,
    pub proj: Mat4,
    pub eye: Vec3,
}

struct TextureBundle {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

struct Mesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    vertex_count: usize,
    shape: Shape,
    bounding: BoundingSphere,
}

impl Mesh {
    fn upload(device: &wgpu::Device, shape: Shape) -> Self {
        let data = MeshData::generate(shape);
        let bounding = data.bounding_sphere();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh vertices"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh indices"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
            vertex_count: data.vertices.len(),
            shape,
            bounding,
        }
    }
}

enum ScenePipelines {
    TwoPass {
        back: wgpu::RenderPipeline,
        front: wgpu::RenderPipeline,
    },
    Single(wgpu::RenderPipeline),
    Bubble(wgpu::RenderPipeline),
}

impl ScenePipelines {
    fn for_cull(&self, cull: CullMode) -> &wgpu::RenderPipeline {
        match self {
            ScenePipelines::TwoPass { back, front } => match cull {
                CullMode::FrontFaces => back,
                _ => front,
            },
            ScenePipelines::Single(pipeline) | ScenePipelines::Bubble(pipeline) => pipeline,
        }
    }
}

/// The wgpu host for one demo scene: owns the device, the offscreen target
/// pair, the compiled material pipelines, and the live uniform block.
pub struct Renderer {
    context: GpuContext,
    layouts: PipelineLayouts,
    material: MaterialKind,
    metrics: SurfaceMetrics,
    targets: TargetPair,

    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: GlassUniforms,

    scene_pipelines: ScenePipelines,
    backdrop_pipeline: Option<wgpu::RenderPipeline>,
    composite_pipeline: wgpu::RenderPipeline,

    backdrop: Option<TextureBundle>,
    backdrop_text: String,
    backdrop_from_file: bool,
    environment: TextureBundle,
    cubemap: TextureBundle,

    backdrop_blit_bind: Option<wgpu::BindGroup>,
    glass_backdrop_bind: Option<wgpu::BindGroup>,
    glass_backtarget_bind: Option<wgpu::BindGroup>,
    cubemap_bind: Option<wgpu::BindGroup>,
    composite_bind: wgpu::BindGroup,

    mesh: Mesh,
    clear_color: wgpu::Color,
}

fn linear_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

fn rgba8_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    layers: u32,
    data: &[u8],
) -> wgpu::Texture {
    device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: layers,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        data,
    )
}

fn equirect_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    width: u32,
    height: u32,
    pixels_f32: &[f32],
) -> TextureBundle {
    // Stored as rgba16float: filterable everywhere, keeps the HDR range.
    let mut data = Vec::with_capacity(pixels_f32.len() * 2);
    for &value in pixels_f32 {
        data.extend_from_slice(&half::f16::from_f32(value).to_le_bytes());
    }
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("environment map"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba16Float,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        &data,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = linear_sampler(device, "environment sampler");
    TextureBundle { _texture: texture, view, sampler }
}

fn placeholder_cubemap(device: &wgpu::Device, queue: &wgpu::Queue) -> TextureBundle {
    let mut data = Vec::with_capacity(6 * 4);
    for face in 0..6u8 {
        let value = if face % 2 == 0 { 200 } else { 120 };
        data.extend([value, value, value, 255]);
    }
    let texture = rgba8_texture(device, queue, "placeholder cubemap", 1, 1, 6, &data);
    let view = texture.create_view(&wgpu::TextureViewDescriptor {
        label: Some("placeholder cubemap view"),
        dimension: Some(wgpu::TextureViewDimension::Cube),
        array_layer_count: Some(6),
        ..Default::default()
    });
    let sampler = linear_sampler(device, "cubemap sampler");
    TextureBundle { _texture: texture, view, sampler }
}

impl Renderer {
    pub fn new<T>(target: &T, metrics: SurfaceMetrics, options: &RendererOptions) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, metrics.physical)?;
        let layouts = PipelineLayouts::new(&context.device);
        let targets = TargetPair::new(&context.device, metrics);

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform buffer"),
            size: std::mem::size_of::<GlassUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform bind group"),
            layout: &layouts.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let loop_count = options.loop_count;
        let (scene_pipelines, needs_backdrop, front_blend, clear_color) = match options.material {
            MaterialKind::Glass { two_pass: true } => (
                ScenePipelines::TwoPass {
                    back: glass_pipeline(
                        &context.device,
                        &layouts,
                        loop_count,
                        CullMode::FrontFaces,
                        false,
                    )?,
                    front: glass_pipeline(
                        &context.device,
                        &layouts,
                        loop_count,
                        CullMode::BackFaces,
                        false,
                    )?,
                },
                true,
                FRONT_BLEND,
                wgpu::Color::BLACK,
            ),
            MaterialKind::Glass { two_pass: false } => (
                ScenePipelines::Single(glass_pipeline(
                    &context.device,
                    &layouts,
                    loop_count,
                    CullMode::None,
                    true,
                )?),
                true,
                1.0,
                wgpu::Color::BLACK,
            ),
            MaterialKind::Bubble => (
                ScenePipelines::Bubble(bubble_pipeline(&context.device, &layouts, loop_count)?),
                false,
                1.0,
                wgpu::Color {
                    r: 0.92,
                    g: 0.92,
                    b: 0.92,
                    a: 1.0,
                },
            ),
        };

        let backdrop_pipe = if needs_backdrop {
            Some(backdrop_pipeline(&context.device, &layouts)?)
        } else {
            None
        };
        let composite = composite_pipeline(
            &context.device,
            &layouts,
            context.surface_format,
            front_blend,
        )?;

        // Environment starts as a neutral 1x1 until the real map arrives.
        let environment = equirect_texture(&context.device, &context.queue, 1, 1, &[0.5; 4]);
        let cubemap = placeholder_cubemap(&context.device, &context.queue);

        let backdrop_from_file = options.backdrop_image.is_some();
        let backdrop = if needs_backdrop {
            let raster = match &options.backdrop_image {
                Some(path) => Backdrop::from_image(path)
                    .context("loading the backdrop image")?,
                None => {
                    let (width, height) = metrics.pixel_size();
                    Backdrop::text(width, height, &options.backdrop_text)
                }
            };
            Some(Self::upload_backdrop(&context, &raster))
        } else {
            None
        };

        let mesh = Mesh::upload(&context.device, options.shape);
        let mut uniforms = GlassUniforms::new(metrics.resolution());
        uniforms.set_params(&OpticalParams::default());

        let composite_bind = Self::build_composite_bind(&context.device, &layouts, &targets);
        let mut renderer = Self {
            context,
            layouts,
            material: options.material,
            metrics,
            targets,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
            scene_pipelines,
            backdrop_pipeline: backdrop_pipe,
            composite_pipeline: composite,
            backdrop,
            backdrop_text: options.backdrop_text.clone(),
            backdrop_from_file,
            environment,
            cubemap,
            backdrop_blit_bind: None,
            glass_backdrop_bind: None,
            glass_backtarget_bind: None,
            cubemap_bind: None,
            composite_bind,
            mesh,
            clear_color,
        };
        renderer.rebuild_bind_groups();
        Ok(renderer)
    }

    fn upload_backdrop(context: &GpuContext, raster: &Backdrop) -> TextureBundle {
        let texture = rgba8_texture(
            &context.device,
            &context.queue,
            "backdrop texture",
            raster.width,
            raster.height,
            1,
            &raster.pixels,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = linear_sampler(&context.device, "backdrop sampler");
        TextureBundle { _texture: texture, view, sampler }
    }

    fn build_composite_bind(
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        targets: &TargetPair,
    ) -> wgpu::BindGroup {
        let sampler = linear_sampler(device, "composite sampler");
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("composite bind group"),
            layout: &layouts.composite_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.back.color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&targets.front.color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        })
    }

    /// Rebuilds every bind group that references a swappable texture: the
    /// backdrop, the environment, and the offscreen target views.
    fn rebuild_bind_groups(&mut self) {
        let device = &self.context.device;

        if let Some(backdrop) = &self.backdrop {
            self.backdrop_blit_bind = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("backdrop blit bind group"),
                layout: &self.layouts.blit_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&backdrop.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&backdrop.sampler),
                    },
                ],
            }));

            self.glass_backdrop_bind = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("glass material bind group (backdrop)"),
                layout: &self.layouts.glass_material_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&backdrop.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&backdrop.sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(&self.environment.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(&self.environment.sampler),
                    },
                ],
            }));

            self.glass_backtarget_bind =
                Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("glass material bind group (back target)"),
                    layout: &self.layouts.glass_material_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(
                                &self.targets.back.color_view,
                            ),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&backdrop.sampler),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::TextureView(&self.environment.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 3,
                            resource: wgpu::BindingResource::Sampler(&self.environment.sampler),
                        },
                    ],
                }));
        }

        if matches!(self.material, MaterialKind::Bubble) {
            self.cubemap_bind = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("cubemap bind group"),
                layout: &self.layouts.cubemap_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&self.cubemap.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.cubemap.sampler),
                    },
                ],
            }));
        }

        self.composite_bind =
            Self::build_composite_bind(device, &self.layouts, &self.targets);
    }

    pub fn metrics(&self) -> SurfaceMetrics {
        self.metrics
    }

    /// Capped-DPR size the offscreen pair currently uses.
    pub fn target_size(&self) -> (u32, u32) {
        self.targets.size()
    }

    pub fn shape(&self) -> Shape {
        self.mesh.shape
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.mesh.bounding
    }

    /// Applies a viewport change: surface, offscreen pair, resolution
    /// uniform, and the synthesized backdrop all move in lockstep.
    pub fn resize(&mut self, metrics: SurfaceMetrics) {
        if metrics.physical.width == 0 || metrics.physical.height == 0 {
            return;
        }
        self.metrics = metrics;
        self.context.resize(metrics.physical);
        self.targets.resize(&self.context.device, metrics);
        self.uniforms.set_resolution(metrics.resolution());

        if self.backdrop.is_some() && !self.backdrop_from_file {
            let (width, height) = metrics.pixel_size();
            let raster = Backdrop::text(width, height, &self.backdrop_text);
            self.backdrop = Some(Self::upload_backdrop(&self.context, &raster));
        }
        self.rebuild_bind_groups();
        tracing::debug!(
            width = metrics.physical.width,
            height = metrics.physical.height,
            scale = metrics.scale_factor,
            "resized renderer surfaces"
        );
    }

    /// Swaps the mesh geometry; the previous GPU buffers drop here and the
    /// bounding sphere reflects the new shape immediately.
    pub fn set_shape(&mut self, shape: Shape) {
        if shape == self.mesh.shape {
            return;
        }
        self.mesh = Mesh::upload(&self.context.device, shape);
        tracing::debug!(
            shape = shape.name(),
            radius = self.mesh.bounding.radius,
            "swapped mesh geometry"
        );
    }

    /// Uploads the real environment map once its load completes.
    pub fn install_environment(&mut self, image: &EquirectImage) {
        self.environment = equirect_texture(
            &self.context.device,
            &self.context.queue,
            image.width,
            image.height,
            &image.pixels,
        );
        self.rebuild_bind_groups();
        tracing::debug!(width = image.width, height = image.height, "environment map installed");
    }

    pub fn install_cubemap(&mut self, image: &CubemapImage) {
        let texture = rgba8_texture(
            &self.context.device,
            &self.context.queue,
            "cubemap texture",
            image.face_size,
            image.face_size,
            6,
            &image.layers,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("cubemap view"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            array_layer_count: Some(6),
            ..Default::default()
        });
        let sampler = linear_sampler(&self.context.device, "cubemap sampler");
        self.cubemap = TextureBundle { _texture: texture, view, sampler };
        self.rebuild_bind_groups();
        tracing::debug!(face_size = image.face_size, "cubemap installed");
    }

    /// Streams displaced vertices into the mesh; the slice length must match
    /// the current geometry.
    pub fn update_mesh_vertices(&mut self, vertices: &[Vertex]) {
        if vertices.len() != self.mesh.vertex_count {
            tracing::warn!(
                expected = self.mesh.vertex_count,
                actual = vertices.len(),
                "ignoring displaced vertex set with mismatched length"
            );
            return;
        }
        self.context
            .queue
            .write_buffer(&self.mesh.vertex_buffer, 0, bytemuck::cast_slice(vertices));
    }

    fn plan(&self) -> Vec<PassDesc> {
        match self.material {
            MaterialKind::Glass { two_pass: true } => two_pass_plan().to_vec(),
            MaterialKind::Glass { two_pass: false } => single_pass_plan().to_vec(),
            MaterialKind::Bubble => bubble_plan().to_vec(),
        }
    }

    fn material_bind_group(&self, input: InputBinding) -> Option<&wgpu::BindGroup> {
        match input {
            InputBinding::Backdrop => self.glass_backdrop_bind.as_ref(),
            InputBinding::BackTarget => self.glass_backtarget_bind.as_ref(),
            InputBinding::Cubemap => self.cubemap_bind.as_ref(),
            InputBinding::TargetPair => Some(&self.composite_bind),
        }
    }

    /// Executes the frame plan. The whole uniform block is staged before
    /// each pass so every pass sees its own flip/weight state.
    pub fn render(&mut self, frame: &FrameInput<'_>) -> Result<(), wgpu::SurfaceError> {
        let surface_texture = self.context.surface.get_current_texture()?;
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.uniforms.set_params(frame.params);
        self.uniforms.set_model(frame.model);
        self.uniforms.set_camera(frame.view, frame.proj, frame.eye);
        self.uniforms.set_time(frame.time);
        self.uniforms.set_resolution(self.metrics.resolution());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        for pass in self.plan() {
            match pass.stage {
                PassStage::Mesh => self.encode_mesh_pass(&mut encoder, &pass),
                PassStage::Composite => {
                    self.encode_composite_pass(&mut encoder, &surface_view);
                }
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn stage_uniforms(&self, encoder: &mut wgpu::CommandEncoder) {
        let staging = self
            .context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("uniform staging"),
                contents: bytemuck::bytes_of(&self.uniforms),
                usage: wgpu::BufferUsages::COPY_SRC,
            });
        encoder.copy_buffer_to_buffer(
            &staging,
            0,
            &self.uniform_buffer,
            0,
            std::mem::size_of::<GlassUniforms>() as u64,
        );
    }

    fn encode_mesh_pass(&mut self, encoder: &mut wgpu::CommandEncoder, pass: &PassDesc) {
        self.uniforms.set_pass(pass.flip_normal, pass.dispersion_weight);
        self.stage_uniforms(encoder);

        let target = match pass.target {
            TargetSlot::Back => &self.targets.back,
            TargetSlot::Front => &self.targets.front,
            // Mesh passes never render to the surface; the composite does.
            TargetSlot::Surface => &self.targets.front,
        };

        let Some(material_bind) = self.material_bind_group(pass.input) else {
            return;
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &target.color_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        if pass.draw_backdrop {
            if let (Some(pipeline), Some(bind)) =
                (self.backdrop_pipeline.as_ref(), self.backdrop_blit_bind.as_ref())
            {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, bind, &[]);
                render_pass.draw(0..3, 0..1);
            }
        }

        render_pass.set_pipeline(self.scene_pipelines.for_cull(pass.cull));
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_bind_group(1, material_bind, &[]);
        render_pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.mesh.index_count, 0, 0..1);
    }

    fn encode_composite_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("composite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        render_pass.set_pipeline(&self.composite_pipeline);
        render_pass.set_bind_group(0, &self.composite_bind, &[]);
        render_pass.draw(0..3, 0..1);
    }

    /// Reconfigures the surface after `Lost`/`Outdated` without changing any
    /// sizes.
    pub fn reconfigure_surface(&mut self) {
        let size = self.context.size;
        self.context.resize(size);
    }
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            material: MaterialKind::Glass { two_pass: true },
            loop_count: 16,
            shape: Shape::Torus,
            backdrop_text: crate::background::DEFAULT_TEXT.to_string(),
            backdrop_image: None,
        }
    }
}

// The frame driver runs single-threaded; `Renderer` is only ever touched
// from the event-loop context that created it.
