//! Render Pass Registry
//!
//! Owns the pass providers registered at pipeline configuration and turns
//! them into a sorted [`PassQueue`] every frame: bind targets, collect
//! applicable passes, order by (insertion point, registration order).

use crate::frame::context::FrameContext;
use crate::passes::provider::{PassProvider, PassQueue};

/// The ordered set of optional extension stages.
///
/// Providers are registered once during pipeline configuration; their
/// registration order is the tie-breaker for passes sharing an insertion
/// point, so it is part of the pipeline's deterministic contract.
#[derive(Default)]
pub struct RenderPassRegistry {
    providers: Vec<Box<dyn PassProvider>>,
}

impl RenderPassRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider. Configuration-time only, never per frame.
    pub fn register(&mut self, provider: Box<dyn PassProvider>) {
        self.providers.push(provider);
    }

    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Builds this frame's pass queue.
    ///
    /// Every provider first re-binds the frame's surfaces to its passes,
    /// then enqueues those that apply to this camera. The returned queue
    /// borrows the passes until the frame ends.
    pub fn collect<'a>(&'a mut self, frame: &FrameContext) -> PassQueue<'a> {
        let mut queue = PassQueue::new();
        for provider in &mut self.providers {
            provider.setup_targets(&frame.surfaces);
            provider.add_passes(&mut queue, frame);
        }
        queue.sort();
        queue
    }
}
