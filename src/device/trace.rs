//! Trace Device
//!
//! [`TraceDevice`] implements [`GraphicsDevice`] by recording every
//! executed operation as a flat [`TraceEvent`] list. Tests and headless
//! tools assert on the recorded sequence instead of driving a GPU.

use crate::device::GraphicsDevice;
use crate::frame::context::{EffectId, FrameSurfaces, SurfaceId};
use crate::interner;
use crate::scene::camera::RenderCamera;
use crate::scene::drawable::DrawableKey;
use crate::stream::{DrawKind, StreamOp};

/// One observed device-side event.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// `bind_camera` was called for the named camera.
    BindCamera { camera: String },
    /// A profiling scope opened.
    BeginScope(String),
    /// A profiling scope closed.
    EndScope(String),
    /// A clear reached the device.
    Clear { color: bool, depth: bool },
    /// A geometry draw reached the device.
    DrawGeometry(DrawableKey),
    /// The skybox draw reached the device.
    DrawSkybox,
    /// A fullscreen effect blit reached the device.
    Blit { effect: EffectId, dest: SurfaceId },
    /// `submit` flushed the executed work.
    Submit,
}

/// Recording [`GraphicsDevice`] for tests and headless runs.
#[derive(Debug, Default)]
pub struct TraceDevice {
    events: Vec<TraceEvent>,
}

impl TraceDevice {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything observed so far, in order.
    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Forgets all recorded events.
    pub fn reset(&mut self) {
        self.events.clear();
    }

    /// Number of geometry draws observed (skybox excluded).
    #[must_use]
    pub fn geometry_draw_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::DrawGeometry(_)))
            .count()
    }

    /// Number of skybox draws observed.
    #[must_use]
    pub fn skybox_draw_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::DrawSkybox))
            .count()
    }

    /// Number of effect blits observed.
    #[must_use]
    pub fn blit_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Blit { .. }))
            .count()
    }

    /// Number of submits observed.
    #[must_use]
    pub fn submit_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Submit))
            .count()
    }
}

impl GraphicsDevice for TraceDevice {
    fn bind_camera(&mut self, camera: &RenderCamera, _surfaces: &FrameSurfaces) {
        self.events.push(TraceEvent::BindCamera {
            camera: camera.name.to_string(),
        });
    }

    fn execute(&mut self, _label: &str, ops: &[StreamOp]) {
        for op in ops {
            let event = match op {
                StreamOp::BeginScope(name) => {
                    TraceEvent::BeginScope(interner::resolve(*name).to_string())
                }
                StreamOp::EndScope(name) => {
                    TraceEvent::EndScope(interner::resolve(*name).to_string())
                }
                StreamOp::Clear { target, .. } => TraceEvent::Clear {
                    color: target.contains(crate::stream::ClearTarget::COLOR),
                    depth: target.contains(crate::stream::ClearTarget::DEPTH),
                },
                StreamOp::Draw(DrawKind::Geometry(key)) => TraceEvent::DrawGeometry(*key),
                StreamOp::Draw(DrawKind::Skybox) => TraceEvent::DrawSkybox,
                StreamOp::Blit { effect, dest, .. } => TraceEvent::Blit {
                    effect: *effect,
                    dest: *dest,
                },
            };
            self.events.push(event);
        }
    }

    fn submit(&mut self) {
        self.events.push(TraceEvent::Submit);
    }
}
