//! Frame Renderer
//!
//! [`FrameRenderer`] orchestrates one camera's frame:
//!
//! ```text
//! Setup → Cull → DrawVisibleGeometry → passes at insertion points → Submit
//! ```
//!
//! The sequence is the pipeline's core correctness contract — the clear
//! must precede every draw, draws must precede post-processing passes, and
//! nothing may reorder. The renderer owns the [`CommandStream`] for the
//! frame's duration; one renderer serves one logical thread of control,
//! rendering cameras strictly sequentially. Concurrent cameras need their
//! own renderer instance each (own stream, own pass bindings).

use crate::cull::VisibilityCuller;
use crate::device::GraphicsDevice;
use crate::frame::batcher::DrawBatcher;
use crate::frame::context::FrameContext;
use crate::frame::observer::{FrameObserver, NoopObserver};
use crate::frame::stage::InsertionPoint;
use crate::interner;
use crate::passes::RenderPassRegistry;
use crate::stream::CommandStream;

/// 帧状态机
///
/// `Aborted` 仅能从 Setup 后的剔除失败进入; `Submitted` 与 `Aborted`
/// 都是终态，下一帧从头开始。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// No frame in flight.
    Idle,
    /// Camera bound, clear recorded, profiling scope open.
    Setup,
    /// Culling produced a result; drawing may proceed.
    Culled,
    /// Culling was unsupported; the frame ended with zero draws.
    Aborted,
    /// All geometry buckets and passes recorded.
    Drawn,
    /// Commands executed against the device; renderer ready for reuse.
    Submitted,
}

/// Per-camera frame orchestrator.
pub struct FrameRenderer {
    stream: CommandStream,
    batcher: DrawBatcher,
    observer: Box<dyn FrameObserver>,
    state: FrameState,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stream: CommandStream::default(),
            batcher: DrawBatcher::default(),
            observer: Box::new(NoopObserver),
            state: FrameState::Idle,
        }
    }

    /// Replaces the draw batcher (builder style).
    #[must_use]
    pub fn with_batcher(mut self, batcher: DrawBatcher) -> Self {
        self.batcher = batcher;
        self
    }

    /// Injects a frame observer (builder style). Editor builds hook gizmo
    /// and scene-view work in here; production keeps the no-op default.
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn FrameObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The state the last frame ended in.
    #[inline]
    #[must_use]
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Renders one camera's frame.
    ///
    /// Either submits a complete frame of commands or aborts silently when
    /// culling parameters cannot be derived. No value is returned; the
    /// side effect is the submitted (or abandoned) command stream.
    pub fn render(
        &mut self,
        frame: &FrameContext,
        culler: &dyn VisibilityCuller,
        registry: &mut RenderPassRegistry,
        device: &mut dyn GraphicsDevice,
    ) {
        debug_assert!(
            !matches!(self.state, FrameState::Setup | FrameState::Culled | FrameState::Drawn),
            "FrameRenderer reentered mid-frame"
        );

        // ====================================================================
        // Setup
        // ====================================================================
        self.state = FrameState::Setup;
        self.observer.frame_prepared(frame.camera);

        device.bind_camera(frame.camera, &frame.surfaces);
        if !frame.clear.is_noop() {
            self.stream.clear(frame.clear.target, frame.clear.color);
        }
        let scope = interner::intern(&frame.camera.name);
        self.stream.begin_scope(scope);

        // ====================================================================
        // Cull — 失败则整帧中止: 不绘制、不执行 Pass、流安全清空
        // ====================================================================
        let Some(params) = culler.try_get_culling_params(frame.camera) else {
            self.stream.end_scope(scope);
            self.stream.abandon();
            self.state = FrameState::Aborted;
            self.observer.frame_aborted(frame.camera);
            return;
        };
        let culling = culler.cull(&params);
        self.state = FrameState::Culled;

        // ====================================================================
        // DrawVisibleGeometry — Opaque → Skybox → Transparent，
        // 注册的 Pass 按插入点穿插其间
        // ====================================================================
        let mut queue = registry.collect(frame);
        self.batcher.prepare(&culling);

        queue.run_until(InsertionPoint::BeforeOpaque, &mut self.stream, frame);
        self.batcher.draw_opaque(&mut self.stream);
        queue.run_until(InsertionPoint::AfterOpaque, &mut self.stream, frame);
        self.batcher.draw_skybox(&mut self.stream);
        queue.run_until(InsertionPoint::BeforeTransparent, &mut self.stream, frame);
        self.batcher.draw_transparent(&mut self.stream);
        self.state = FrameState::Drawn;

        self.observer.geometry_drawn(&mut self.stream, frame);

        queue.run_until(InsertionPoint::AfterPostProcess, &mut self.stream, frame);

        // ====================================================================
        // Submit — 执行累积的命令流并清空，流可直接复用
        // ====================================================================
        self.stream.end_scope(scope);
        self.stream.execute_and_clear(device);
        device.submit();
        self.state = FrameState::Submitted;
        self.observer.frame_submitted(frame.camera);
    }
}
