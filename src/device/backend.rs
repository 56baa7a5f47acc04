//! WGPU Backend
//!
//! [`WgpuDevice`] maps executed stream operations onto real GPU work:
//! profiling scopes become encoder debug groups, clears and draws become
//! render passes, effect blits become fullscreen-triangle passes.
//!
//! The backend creates no shaders and no pipelines. Applications register
//! prepared resources against the pipeline's non-owning handles:
//!
//! - [`WgpuDevice::register_surface`] — texture view per [`SurfaceId`]
//! - [`WgpuDevice::register_draw`] — [`GpuDraw`] per drawable key
//! - [`WgpuDevice::register_effect`] — [`EffectBlit`] per [`EffectId`]
//! - [`WgpuDevice::set_skybox_pipeline`] — the sky's fullscreen pipeline
//!
//! Per-camera uniforms (view, view-projection, position) live in a single
//! uniform buffer rewritten by `bind_camera`; pipelines that consume them
//! bind [`WgpuDevice::camera_bind_group_layout`] at group 0.

use glam::{Mat4, Vec4};
use log::{debug, warn};
use rustc_hash::FxHashMap;
use slotmap::SecondaryMap;

use crate::device::GraphicsDevice;
use crate::frame::context::{EffectId, FrameSurfaces, SurfaceId};
use crate::interner;
use crate::scene::camera::RenderCamera;
use crate::scene::drawable::DrawableKey;
use crate::stream::{ClearTarget, DrawKind, StreamOp};

/// Per-camera uniform block, written once per `bind_camera`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    view_projection: Mat4,
    view: Mat4,
    position: Vec4,
}

/// Prepared GPU data for one drawable.
pub struct GpuDraw {
    pub pipeline: wgpu::RenderPipeline,
    /// Optional per-object bind group at group 1.
    pub bind_group: Option<wgpu::BindGroup>,
    pub vertex_buffer: wgpu::Buffer,
    /// Index buffer, format and index count; `None` for non-indexed draws.
    pub index: Option<(wgpu::Buffer, wgpu::IndexFormat, u32)>,
    /// Vertex count for non-indexed draws.
    pub vertex_count: u32,
}

/// Prepared fullscreen effect: pipeline plus its input bind group.
pub struct EffectBlit {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group: wgpu::BindGroup,
}

/// The production [`GraphicsDevice`] over a wgpu device/queue pair.
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,

    camera_buffer: wgpu::Buffer,
    camera_layout: wgpu::BindGroupLayout,
    camera_bind_group: wgpu::BindGroup,

    surfaces: FxHashMap<SurfaceId, wgpu::TextureView>,
    draws: SecondaryMap<DrawableKey, GpuDraw>,
    effects: FxHashMap<EffectId, EffectBlit>,
    skybox_pipeline: Option<wgpu::RenderPipeline>,

    /// Views bound by the current frame (color, depth).
    bound: Option<(wgpu::TextureView, wgpu::TextureView)>,
    encoder: Option<wgpu::CommandEncoder>,
}

impl WgpuDevice {
    #[must_use]
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Layout"),
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

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera BindGroup"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        Self {
            device,
            queue,
            camera_buffer,
            camera_layout,
            camera_bind_group,
            surfaces: FxHashMap::default(),
            draws: SecondaryMap::new(),
            effects: FxHashMap::default(),
            skybox_pipeline: None,
            bound: None,
            encoder: None,
        }
    }

    /// Layout for the group-0 camera uniforms, for app pipeline creation.
    #[must_use]
    pub fn camera_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.camera_layout
    }

    /// Registers (or replaces) the texture view behind a surface handle.
    pub fn register_surface(&mut self, id: SurfaceId, view: wgpu::TextureView) {
        self.surfaces.insert(id, view);
    }

    /// Registers (or replaces) the GPU data behind a drawable key.
    pub fn register_draw(&mut self, key: DrawableKey, draw: GpuDraw) {
        self.draws.insert(key, draw);
    }

    /// Removes the GPU data for a drawable that left the world.
    pub fn unregister_draw(&mut self, key: DrawableKey) {
        self.draws.remove(key);
    }

    /// Registers (or replaces) a fullscreen effect.
    pub fn register_effect(&mut self, id: EffectId, effect: EffectBlit) {
        self.effects.insert(id, effect);
    }

    /// Sets the fullscreen sky pipeline; `None` skips skybox draws.
    pub fn set_skybox_pipeline(&mut self, pipeline: Option<wgpu::RenderPipeline>) {
        self.skybox_pipeline = pipeline;
    }

    fn record_clear(
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        target: ClearTarget,
        color: Vec4,
    ) {
        let color_load = if target.contains(ClearTarget::COLOR) {
            wgpu::LoadOp::Clear(wgpu::Color {
                r: f64::from(color.x),
                g: f64::from(color.y),
                b: f64::from(color.z),
                a: f64::from(color.w),
            })
        } else {
            wgpu::LoadOp::Load
        };
        let depth_load = if target.contains(ClearTarget::DEPTH) {
            wgpu::LoadOp::Clear(1.0)
        } else {
            wgpu::LoadOp::Load
        };

        // Clear-only pass; dropped immediately.
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Clear Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: color_load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: depth_load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    fn record_draw_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        draws: &[StreamOp],
    ) {
        let pass_desc = wgpu::RenderPassDescriptor {
            label: Some("Geometry Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        };

        let mut pass = encoder.begin_render_pass(&pass_desc);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);

        for op in draws {
            let StreamOp::Draw(kind) = op else { continue };
            match kind {
                DrawKind::Geometry(key) => {
                    let Some(draw) = self.draws.get(*key) else {
                        warn!("GpuDraw missing for {key:?}, draw skipped");
                        continue;
                    };
                    pass.set_pipeline(&draw.pipeline);
                    if let Some(bind_group) = &draw.bind_group {
                        pass.set_bind_group(1, bind_group, &[]);
                    }
                    pass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
                    if let Some((index_buffer, index_format, count)) = &draw.index {
                        pass.set_index_buffer(index_buffer.slice(..), *index_format);
                        pass.draw_indexed(0..*count, 0, 0..1);
                    } else {
                        pass.draw(0..draw.vertex_count, 0..1);
                    }
                }
                DrawKind::Skybox => {
                    let Some(pipeline) = &self.skybox_pipeline else {
                        debug!("No skybox pipeline registered, sky draw skipped");
                        continue;
                    };
                    pass.set_pipeline(pipeline);
                    // Fullscreen triangle
                    pass.draw(0..3, 0..1);
                }
            }
        }
    }

    fn record_blit(&self, encoder: &mut wgpu::CommandEncoder, dest: SurfaceId, effect: EffectId) {
        let Some(dest_view) = self.surfaces.get(&dest) else {
            warn!("Blit destination {dest:?} not registered, blit skipped");
            return;
        };
        let Some(blit) = self.effects.get(&effect) else {
            warn!("Effect {effect:?} not registered, blit skipped");
            return;
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Effect Blit"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: dest_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        pass.set_pipeline(&blit.pipeline);
        pass.set_bind_group(0, &blit.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

impl GraphicsDevice for WgpuDevice {
    fn bind_camera(&mut self, camera: &RenderCamera, surfaces: &FrameSurfaces) {
        let uniforms = CameraUniforms {
            view_projection: camera.view_projection_matrix(),
            view: camera.view_matrix(),
            position: camera.position().extend(1.0),
        };
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&uniforms));

        let color = self.surfaces.get(&surfaces.color).cloned();
        let depth = self.surfaces.get(&surfaces.depth).cloned();
        self.bound = match (color, depth) {
            (Some(color), Some(depth)) => Some((color, depth)),
            _ => {
                warn!(
                    "Frame surfaces not registered (color {:?}, depth {:?})",
                    surfaces.color, surfaces.depth
                );
                None
            }
        };
    }

    fn execute(&mut self, label: &str, ops: &[StreamOp]) {
        let Some((color_view, depth_view)) = self.bound.clone() else {
            warn!("execute() without bound surfaces, frame dropped");
            return;
        };

        let mut encoder = self.encoder.take().unwrap_or_else(|| {
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Inkline Encoder"),
                })
        });

        encoder.push_debug_group(label);

        let mut i = 0;
        while i < ops.len() {
            match &ops[i] {
                StreamOp::BeginScope(name) => {
                    encoder.push_debug_group(interner::resolve(*name));
                    i += 1;
                }
                StreamOp::EndScope(_) => {
                    encoder.pop_debug_group();
                    i += 1;
                }
                StreamOp::Clear { target, color } => {
                    Self::record_clear(&mut encoder, &color_view, &depth_view, *target, *color);
                    i += 1;
                }
                StreamOp::Draw(_) => {
                    // Batch consecutive draws into one render pass
                    let run = ops[i..]
                        .iter()
                        .take_while(|op| matches!(op, StreamOp::Draw(_)))
                        .count();
                    self.record_draw_pass(&mut encoder, &color_view, &depth_view, &ops[i..i + run]);
                    i += run;
                }
                StreamOp::Blit { dest, effect, .. } => {
                    self.record_blit(&mut encoder, *dest, *effect);
                    i += 1;
                }
            }
        }

        encoder.pop_debug_group();
        self.encoder = Some(encoder);
    }

    fn submit(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            self.queue.submit(std::iter::once(encoder.finish()));
        }
    }
}
