//! Graphics Device Seam
//!
//! The pipeline core records into a [`crate::stream::CommandStream`]; a
//! [`GraphicsDevice`] is the thing the accumulated stream is executed
//! against. Two implementations ship with the crate:
//!
//! - [`WgpuDevice`]: the production backend recording real GPU work
//! - [`TraceDevice`]: records executed operations as plain data, for
//!   tests and headless runs
//!
//! The seam keeps the per-frame state machine free of any engine base
//! class: the renderer drives the device through three calls and nothing
//! else.

pub mod backend;
pub mod trace;

pub use backend::{EffectBlit, GpuDraw, WgpuDevice};
pub use trace::{TraceDevice, TraceEvent};

use crate::frame::context::FrameSurfaces;
use crate::scene::camera::RenderCamera;
use crate::stream::StreamOp;

/// The device the command stream executes against.
///
/// `execute` is only ever reached through
/// [`crate::stream::CommandStream::execute_and_clear`]; `submit` flushes
/// everything executed since the last flush.
pub trait GraphicsDevice {
    /// Binds per-camera parameters and the frame's target surfaces.
    ///
    /// Runs during Setup, before any stream command is recorded.
    fn bind_camera(&mut self, camera: &RenderCamera, surfaces: &FrameSurfaces);

    /// Executes one batch of recorded operations, attributed to `label`.
    fn execute(&mut self, label: &str, ops: &[StreamOp]);

    /// Flushes all executed work to the GPU queue.
    fn submit(&mut self);
}
