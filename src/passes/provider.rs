//! Pass Providers and the Per-Frame Pass Queue
//!
//! A [`PassProvider`] is the plugin contract through which external
//! features contribute passes: constructed once at pipeline configuration,
//! asked every frame to re-bind targets and enqueue its passes.
//!
//! The [`PassQueue`] collects enqueued passes and orders them by
//! (insertion point, registration order) — insertion-point order first,
//! ties broken by the order providers enqueued them. The ordering is
//! deterministic and stable across frames.

use smallvec::SmallVec;

use crate::frame::context::{FrameContext, FrameSurfaces};
use crate::frame::stage::InsertionPoint;
use crate::passes::pass::RenderPass;
use crate::stream::CommandStream;

/// Plugin contract consumed by the registry.
///
/// `add_passes` must itself check camera category and required-resource
/// non-nullness before enqueuing — the same guards the pass's `enabled`
/// re-checks at execute time.
pub trait PassProvider {
    /// Re-binds the provider's passes to the current frame's surfaces.
    fn setup_targets(&mut self, surfaces: &FrameSurfaces);

    /// Enqueues this provider's passes for the current frame, if they apply.
    fn add_passes<'a>(&'a mut self, queue: &mut PassQueue<'a>, frame: &FrameContext);
}

/// 队列条目
///
/// 存储 Pass 引用及其插入点与入队序号，用于排序和执行。
struct QueueEntry<'a> {
    point: InsertionPoint,
    /// 同插入点内的入队顺序（用于稳定排序）
    order: u16,
    pass: &'a mut dyn RenderPass,
}

/// The ordered set of passes executing in one frame.
///
/// Does not own passes — it borrows them from their providers for the
/// duration of the frame, which is also what makes one queue per
/// in-flight frame a compiler-enforced requirement.
pub struct PassQueue<'a> {
    entries: SmallVec<[QueueEntry<'a>; 8]>,
    next_order: u16,
    /// Execution cursor; entries before it already ran this frame.
    cursor: usize,
}

impl Default for PassQueue<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PassQueue<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
            next_order: 0,
            cursor: 0,
        }
    }

    /// Enqueues a pass at its own insertion point.
    ///
    /// Passes sharing an insertion point execute in enqueue order.
    pub fn enqueue(&mut self, pass: &'a mut dyn RenderPass) {
        let point = pass.insertion_point();
        self.entries.push(QueueEntry {
            point,
            order: self.next_order,
            pass,
        });
        self.next_order = self.next_order.wrapping_add(1);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorts into execution order. Called once after collection.
    pub(crate) fn sort(&mut self) {
        // (point, order) 全序，无需稳定排序
        self.entries
            .sort_unstable_by_key(|e| (e.point.order(), e.order));
    }

    /// Executes every not-yet-run pass whose insertion point is at or
    /// before `point`, in order. Disabled passes are skipped silently.
    pub fn run_until(
        &mut self,
        point: InsertionPoint,
        stream: &mut CommandStream,
        frame: &FrameContext,
    ) {
        while self.cursor < self.entries.len() {
            let entry = &mut self.entries[self.cursor];
            if entry.point > point {
                break;
            }
            self.cursor += 1;
            // Execute-time guard, mirroring the add_passes-time check
            if entry.pass.enabled(frame) {
                entry.pass.execute(stream, frame);
            }
        }
    }
}
