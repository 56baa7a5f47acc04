//! Render Pass Trait
//!
//! A pass is a self-contained, optionally-enabled unit of extra rendering
//! work bound to one insertion point and one target. Passes are constructed
//! once at pipeline setup, re-bound to the current frame's target every
//! frame, and executed zero or one time per frame.

use crate::frame::context::{FrameContext, SurfaceId};
use crate::frame::stage::InsertionPoint;
use crate::stream::CommandStream;

/// A pluggable frame stage.
///
/// # Contract
///
/// - `set_target` re-binds the pass to the current frame's target; the
///   target handle is a non-owning reference to a surface owned by the
///   frame. A pass must not rebind or mutate the target mid-execution
///   (single-target contract per frame).
/// - `enabled` is the pass's own gate: camera category and required
///   resources. A disabled pass is skipped silently — no error, no log.
/// - `execute` records into the stream; it runs only when `enabled`
///   returned true for this frame.
pub trait RenderPass {
    /// Pass name, used for profiling scope attribution.
    fn name(&self) -> &str;

    /// The fixed insertion point this pass executes at.
    fn insertion_point(&self) -> InsertionPoint;

    /// Re-binds the current frame's target.
    fn set_target(&mut self, target: SurfaceId);

    /// Whether this pass applies to the given frame.
    fn enabled(&self, frame: &FrameContext) -> bool;

    /// Records the pass's work into the stream.
    fn execute(&mut self, stream: &mut CommandStream, frame: &FrameContext);
}
