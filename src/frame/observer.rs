//! Frame Observer
//!
//! Editor-only concerns (gizmo drawing, scene-view preparation, overlay
//! rendering for unsupported materials) are not part of the runtime
//! contract. They hook into the frame as an injectable [`FrameObserver`]
//! invoked at fixed points of the state machine, defaulting to
//! [`NoopObserver`] in production builds. This keeps editor branches out
//! of the core sequencing.

use crate::frame::context::FrameContext;
use crate::scene::camera::RenderCamera;
use crate::stream::CommandStream;

/// Hooks invoked at fixed points of the per-frame state machine.
///
/// All methods default to no-ops; implement only what you need.
pub trait FrameObserver {
    /// Called at the start of Setup, before anything is recorded.
    ///
    /// An editor implementation prepares scene-view state and per-camera
    /// profiling names here.
    fn frame_prepared(&mut self, _camera: &RenderCamera) {}

    /// Called after the three geometry buckets have been drawn.
    ///
    /// An editor implementation appends gizmo and unsupported-material
    /// overlay draws to the stream here.
    fn geometry_drawn(&mut self, _stream: &mut CommandStream, _frame: &FrameContext) {}

    /// Called when the frame aborts because culling was unsupported.
    fn frame_aborted(&mut self, _camera: &RenderCamera) {}

    /// Called after the frame's commands were submitted to the device.
    fn frame_submitted(&mut self, _camera: &RenderCamera) {}
}

/// The production default: observes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl FrameObserver for NoopObserver {}
