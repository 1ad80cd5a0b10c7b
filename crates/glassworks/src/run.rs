//! Window setup and the per-frame driver.
//!
//! One redraw per display refresh: advance the fixed-step time and mesh
//! spin, settle the camera and pointer interpolation, re-displace the bubble
//! shell when active, then hand the frame input to the renderer's pass plan.
//! Everything mutable lives in the event-loop closure; the only other thread
//! is the one-shot environment loader draining into a channel.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use glam::{Mat4, Vec2};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use renderer::background::DEFAULT_TEXT;
use renderer::camera::OrbitCamera;
use renderer::environment::{load_cubemap, EquirectLoader};
use renderer::geometry::{displace_sphere, MeshData, Shape};
use renderer::{FrameInput, Renderer, RendererOptions, SurfaceMetrics, TIME_STEP};

use crate::cli::RunArgs;
use crate::panel::{ControlPanel, PanelCommand};
use crate::pointer::PointerTracker;
use crate::presets::ScenePreset;
use crate::scenes::SceneKind;

/// Fixed per-tick mesh spin, matching the fixed time step: playback speed
/// follows the display refresh rate.
const ROTATION_STEP: f32 = 0.01;

const ORBIT_RADIUS: f32 = 4.0;

/// Seed of the bubble displacement noise field.
const NOISE_SEED: f32 = 4.0;

const DEFAULT_ENVIRONMENT_URL: &str =
    "https://cdn.shopify.com/s/files/1/0817/9308/9592/files/overcast_soil_puresky_1k.hdr?v=1727295592";

const DEFAULT_CUBEMAP_DIR: &str = "assets/cubemap";

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn environment_cache_path() -> PathBuf {
    directories_next::ProjectDirs::from("", "", "glassworks")
        .map(|dirs| dirs.cache_dir().join("environment.hdr"))
        .unwrap_or_else(|| PathBuf::from("glassworks-environment.hdr"))
}

fn resolve_shape(args: &RunArgs, preset: Option<&ScenePreset>, scene: SceneKind) -> Shape {
    if !scene.geometry_swappable() {
        if args.shape.is_some() {
            warn!("--shape is ignored by the bubble scene");
        }
        return scene.default_shape();
    }
    args.shape
        .or_else(|| preset.and_then(ScenePreset::shape))
        .unwrap_or_else(|| scene.default_shape())
}

pub fn run(args: RunArgs) -> Result<()> {
    let scene = args.scene;
    let preset = args
        .preset
        .as_ref()
        .map(|path| ScenePreset::load(path))
        .transpose()
        .context("loading the scene preset")?;

    let mut params = scene.base_params();
    if let Some(preset) = &preset {
        preset.apply_params(&mut params);
    }

    let shape = resolve_shape(&args, preset.as_ref(), scene);
    let loop_count = args
        .loop_count
        .or_else(|| preset.as_ref().and_then(|preset| preset.loop_count))
        .unwrap_or_else(|| scene.loop_count());
    let backdrop_text = args
        .backdrop_text
        .clone()
        .or_else(|| preset.as_ref().and_then(|preset| preset.backdrop_text.clone()))
        .unwrap_or_else(|| DEFAULT_TEXT.to_string());

    let options = RendererOptions {
        material: scene.material(),
        loop_count,
        shape,
        backdrop_text,
        backdrop_image: args.backdrop_image.clone(),
    };

    let event_loop = EventLoop::new().context("failed to create the event loop")?;
    let window = WindowBuilder::new()
        .with_title(format!("glassworks - {}", scene.name()))
        .with_inner_size(LogicalSize::new(1280.0, 720.0))
        .build(&event_loop)
        .context("failed to create the window")?;

    let metrics = SurfaceMetrics::new(window.inner_size(), window.scale_factor());
    let mut renderer = Renderer::new(&window, metrics, &options)?;
    info!(
        scene = scene.name(),
        shape = shape.name(),
        loop_count,
        "glassworks starting"
    );

    let mut equirect_loader = if scene.uses_environment_map() && !args.no_fetch {
        let url = args
            .environment_url
            .clone()
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT_URL.to_string());
        Some(EquirectLoader::spawn(url, environment_cache_path()))
    } else {
        None
    };

    if scene.uses_cubemap() {
        let dir = args
            .cubemap_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CUBEMAP_DIR));
        match load_cubemap(&dir) {
            Ok(cubemap) => renderer.install_cubemap(&cubemap),
            Err(error) => warn!(%error, "cubemap load failed; keeping the placeholder"),
        }
    }

    // Host-side copy of the sphere the bubble re-displaces every tick.
    let base_sphere = scene.uses_cubemap().then(|| MeshData::generate(Shape::Sphere));

    let inner = window.inner_size();
    let mut pointer = PointerTracker::new(Vec2::new(inner.width as f32, inner.height as f32));
    let mut camera = OrbitCamera::new(ORBIT_RADIUS);
    let mut panel = ControlPanel::new();

    let mut time = 0.0f32;
    let mut spin = Vec2::ZERO;
    let mut shift_held = false;
    let mut dragging = false;
    let mut last_cursor: Option<Vec2> = None;
    let mut pending_resize: Option<(SurfaceMetrics, Instant)> = None;

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
                WindowEvent::Resized(size) => {
                    let metrics = SurfaceMetrics::new(size, window.scale_factor());
                    match scene.resize_debounce() {
                        Some(delay) => {
                            pending_resize = Some((metrics, Instant::now() + delay));
                        }
                        None => {
                            renderer.resize(metrics);
                            pointer.set_viewport(Vec2::new(size.width as f32, size.height as f32));
                        }
                    }
                }
                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    let metrics = SurfaceMetrics::new(window.inner_size(), scale_factor);
                    renderer.resize(metrics);
                }
                WindowEvent::ModifiersChanged(modifiers) => {
                    shift_held = modifiers.state().shift_key();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state == ElementState::Pressed {
                        match event.logical_key {
                            Key::Named(NamedKey::Tab) => {
                                let command = if shift_held {
                                    PanelCommand::FocusPrev
                                } else {
                                    PanelCommand::FocusNext
                                };
                                panel.apply(command, &mut params);
                                info!(control = panel.focused_control().name, "panel focus");
                            }
                            Key::Named(NamedKey::Escape) => elwt.exit(),
                            Key::Character(ref text) => match text.as_str() {
                                "+" | "=" => panel.apply(PanelCommand::Increase, &mut params),
                                "-" => panel.apply(PanelCommand::Decrease, &mut params),
                                "g" | "G" => {
                                    if scene.geometry_swappable() {
                                        renderer.set_shape(renderer.shape().next());
                                    }
                                }
                                "p" | "P" => print!("{}", panel.describe(&params)),
                                _ => {}
                            },
                            _ => {}
                        }
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let cursor = Vec2::new(position.x as f32, position.y as f32);
                    if dragging {
                        if let Some(last) = last_cursor {
                            let delta = cursor - last;
                            camera.drag(delta.x, delta.y);
                        }
                    }
                    last_cursor = Some(cursor);
                    pointer.point_at(cursor);
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    if button == MouseButton::Left {
                        dragging = state == ElementState::Pressed;
                    }
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    let steps = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y * 0.3,
                        MouseScrollDelta::PixelDelta(position) => position.y as f32 * 0.01,
                    };
                    camera.zoom(steps);
                }
                WindowEvent::RedrawRequested => {
                    if let Some((metrics, deadline)) = pending_resize {
                        if Instant::now() >= deadline {
                            renderer.resize(metrics);
                            pointer.set_viewport(Vec2::new(
                                metrics.physical.width as f32,
                                metrics.physical.height as f32,
                            ));
                            pending_resize = None;
                        }
                    }

                    if let Some(loader) = &equirect_loader {
                        if let Some(result) = loader.poll() {
                            match result {
                                Ok(image) => renderer.install_environment(&image),
                                Err(error) => {
                                    warn!(%error, "environment map load failed; keeping the placeholder");
                                }
                            }
                            equirect_loader = None;
                        }
                    }

                    time += TIME_STEP;
                    spin += Vec2::splat(ROTATION_STEP);
                    camera.tick();
                    pointer.tick();

                    let model = if let Some(base) = &base_sphere {
                        let displaced = displace_sphere(
                            base,
                            time,
                            pointer.amplitude(),
                            pointer.rotation(),
                            NOISE_SEED,
                        );
                        renderer.update_mesh_vertices(&displaced);
                        // The pointer spin is baked into the vertices.
                        Mat4::IDENTITY
                    } else {
                        Mat4::from_rotation_x(spin.x) * Mat4::from_rotation_y(spin.y)
                    };

                    let metrics = renderer.metrics();
                    let aspect =
                        metrics.physical.width as f32 / metrics.physical.height.max(1) as f32;
                    let frame = FrameInput {
                        params: &params,
                        time,
                        model,
                        view: camera.view(),
                        proj: camera.projection(aspect),
                        eye: camera.eye(),
                    };
                    match renderer.render(&frame) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            renderer.reconfigure_surface();
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            tracing::error!("surface out of memory; exiting");
                            elwt.exit();
                        }
                        Err(wgpu::SurfaceError::Timeout) => {
                            warn!("surface timeout; skipping the frame");
                        }
                        Err(error) => {
                            warn!(%error, "surface error; retrying next frame");
                        }
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                elwt.set_control_flow(ControlFlow::Poll);
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|err| anyhow!("event loop error: {err}"))
}
