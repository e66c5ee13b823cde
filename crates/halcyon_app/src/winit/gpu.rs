//! wgpu-backed render surface.
//!
//! Every visible entity is drawn as a flat quad of its geometry's extent in
//! its local XY plane, shaded by its [`ShaderProgram`] or a flat-color
//! default. Programs supply only `fs_main`; the vertex stage and uniform
//! block come from [`PRELUDE`]:
//!
//! ```wgsl
//! struct Uniforms {
//!     view_proj: mat4x4<f32>,
//!     model: mat4x4<f32>,
//!     extent: vec4<f32>,
//!     params: array<vec4<f32>, 8>,
//! };
//! ```
//!
//! `params[i]` holds the program's i-th declared uniform.

use std::any::Any;
use std::borrow::Cow;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, UVec2};
use halcyon_core::{Error, Result};
use halcyon_scene::{Entity, EntityKey, ShaderProgram};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::surface::{FrameView, RenderSurface};

/// Maximum number of named uniforms a program can declare.
pub const MAX_PARAMS: usize = 8;

/// Shared vertex stage prepended to every program.
pub const PRELUDE: &str = r"
struct Uniforms {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    extent: vec4<f32>,
    params: array<vec4<f32>, 8>,
};

@group(0) @binding(0) var<uniform> u: Uniforms;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(0.0, 0.0), vec2<f32>(1.0, 0.0), vec2<f32>(1.0, 1.0),
        vec2<f32>(0.0, 0.0), vec2<f32>(1.0, 1.0), vec2<f32>(0.0, 1.0),
    );
    let uv = corners[index];
    let local = vec4<f32>((uv - vec2<f32>(0.5)) * u.extent.xy, 0.0, 1.0);

    var out: VertexOutput;
    out.position = u.view_proj * u.model * local;
    out.uv = uv;
    return out;
}
";

const FLAT_COLOR: &str = r"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(u.params[0].rgb, 1.0);
}
";

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct EntityUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    extent: [f32; 4],
    params: [[f32; 4]; MAX_PARAMS],
}

struct DrawSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct GpuSurface {
    surface: wgpu::Surface<'static>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: Option<wgpu::SurfaceConfiguration>,
    vsync: bool,

    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: FxHashMap<u64, wgpu::RenderPipeline>,
    slots: FxHashMap<EntityKey, DrawSlot>,
    flat_color: ShaderProgram,
}

impl GpuSurface {
    /// Acquires an adapter and device for `window`. The surface itself is
    /// configured by [`RenderSurface::initialize`].
    pub async fn new<W>(window: W, vsync: bool) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(|e| Error::SurfaceUnavailable(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| Error::SurfaceUnavailable(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Halcyon Device"),
                memory_hints: wgpu::MemoryHints::Performance,
                ..Default::default()
            })
            .await
            .map_err(|e| Error::SurfaceUnavailable(e.to_string()))?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Entity Uniforms Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Entity Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        Ok(Self {
            surface,
            adapter,
            device,
            queue,
            config: None,
            vsync,
            bind_group_layout,
            pipeline_layout,
            pipelines: FxHashMap::default(),
            slots: FxHashMap::default(),
            flat_color: ShaderProgram::new("flat_color", FLAT_COLOR, ["color"]),
        })
    }

    #[must_use]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    fn color_format(&self) -> Option<wgpu::TextureFormat> {
        self.config.as_ref().map(|c| c.format)
    }

    fn ensure_pipeline(&mut self, program: &ShaderProgram, format: wgpu::TextureFormat) {
        if self.pipelines.contains_key(&program.hash()) {
            return;
        }
        log::debug!("Compiling shader program '{}'", program.label());

        let source = format!("{PRELUDE}\n{}", program.source());
        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(program.label()),
            source: wgpu::ShaderSource::Wgsl(Cow::Owned(source)),
        });

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(program.label()),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipelines.insert(program.hash(), pipeline);
    }

    fn write_slot(&mut self, key: EntityKey, uniforms: &EntityUniforms) {
        let slot = self.slots.entry(key).or_insert_with(|| {
            let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Entity Uniforms"),
                size: std::mem::size_of::<EntityUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Entity Bind Group"),
                layout: &self.bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            DrawSlot { buffer, bind_group }
        });
        self.queue.write_buffer(&slot.buffer, 0, bytemuck::bytes_of(uniforms));
    }
}

fn entity_uniforms(entity: &Entity, program: &ShaderProgram, view_proj: Mat4) -> EntityUniforms {
    let mut params = [[0.0; 4]; MAX_PARAMS];
    for (slot, name) in params.iter_mut().zip(program.uniforms()) {
        if let Some(value) = entity.params().get(name) {
            *slot = value.to_vec4().to_array();
        }
    }
    EntityUniforms {
        view_proj: view_proj.to_cols_array_2d(),
        model: entity.transform.matrix_as_mat4().to_cols_array_2d(),
        extent: entity.geometry.extent().extend(0.0).to_array(),
        params,
    }
}

impl RenderSurface for GpuSurface {
    fn initialize(&mut self, physical_size: UVec2) -> Result<()> {
        let mut config = self
            .surface
            .get_default_config(&self.adapter, physical_size.x.max(1), physical_size.y.max(1))
            .ok_or_else(|| Error::SurfaceUnavailable("Surface not supported by adapter".to_string()))?;

        config.present_mode = if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        self.surface.configure(&self.device, &config);
        self.config = Some(config);
        Ok(())
    }

    fn resize(&mut self, physical_size: UVec2) {
        let Some(config) = &mut self.config else {
            return;
        };
        if physical_size.x > 0 && physical_size.y > 0 {
            config.width = physical_size.x;
            config.height = physical_size.y;
            self.surface.configure(&self.device, config);
        }
    }

    fn render(&mut self, view: &FrameView<'_>) -> Result<()> {
        let Some(format) = self.color_format() else {
            return Err(Error::SurfaceUnavailable("surface not initialized".to_string()));
        };

        let view_proj = view.camera.view_projection_matrix();
        let mut draws: Vec<(EntityKey, u64)> = Vec::new();

        for (key, entity) in view.scene.entities() {
            if !entity.visible {
                continue;
            }
            let program = entity.material.program.clone().unwrap_or_else(|| self.flat_color.clone());
            if program.uniforms().len() > MAX_PARAMS {
                log::warn!(
                    "Program '{}' declares {} uniforms; only {MAX_PARAMS} are supplied",
                    program.label(),
                    program.uniforms().len()
                );
            }
            self.ensure_pipeline(&program, format);
            self.write_slot(key, &entity_uniforms(entity, &program, view_proj));
            draws.push((key, program.hash()));
        }

        let live: FxHashSet<EntityKey> = draws.iter().map(|(key, _)| *key).collect();
        self.slots.retain(|key, _| live.contains(key));

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if let Some(config) = &self.config {
                    self.surface.configure(&self.device, config);
                }
                return Ok(());
            }
            Err(e) => return Err(Error::Window(format!("Failed to acquire frame: {e:?}"))),
        };
        let target = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let clear = view.scene.background().clear_color();
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(clear.x),
                            g: f64::from(clear.y),
                            b: f64::from(clear.z),
                            a: f64::from(clear.w),
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for (key, hash) in &draws {
                let (Some(pipeline), Some(slot)) = (self.pipelines.get(hash), self.slots.get(key)) else {
                    continue;
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, &slot.bind_group, &[]);
                pass.draw(0..6, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
