//! Pipeline Configuration
//!
//! The static configuration entry point: a [`PipelineAsset`] holds
//! validated [`PipelineSettings`] plus the pass providers registered for
//! this pipeline, and produces a ready [`RenderPipeline`]. Configuration
//! happens once at load time; nothing here is on the per-frame hot path.
//!
//! ```ignore
//! let pipeline = PipelineAsset::new(PipelineSettings::default())
//!     .with_provider(Box::new(EffectPassProvider::new(volumetric)))
//!     .create_pipeline()?;
//!
//! pipeline.render_cameras(&mut device, &world, &frames);
//! ```

use serde::{Deserialize, Serialize};

use crate::cull::{FrustumCuller, VisibilityCuller};
use crate::device::GraphicsDevice;
use crate::errors::{PipelineError, Result};
use crate::frame::context::FrameContext;
use crate::frame::observer::FrameObserver;
use crate::frame::renderer::{FrameRenderer, FrameState};
use crate::frame::DrawBatcher;
use crate::interner::{self, Name};
use crate::passes::{PassProvider, RenderPassRegistry};
use crate::scene::drawable::{DrawableWorld, RenderQueueRange};

/// Static pipeline configuration, loadable from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Technique tag a drawable must carry to be recognized.
    pub technique: String,
    /// Render-queue interval of the opaque bucket.
    pub opaque_range: RenderQueueRange,
    /// Render-queue interval of the transparent bucket.
    pub transparent_range: RenderQueueRange,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            technique: interner::DEFAULT_TECHNIQUE.to_string(),
            opaque_range: RenderQueueRange::OPAQUE,
            transparent_range: RenderQueueRange::TRANSPARENT,
        }
    }
}

impl PipelineSettings {
    /// Parses settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn validate(&self) -> Result<()> {
        if self.technique.is_empty() {
            return Err(PipelineError::EmptyTechnique);
        }
        if self.opaque_range.min > self.opaque_range.max {
            return Err(PipelineError::InvalidQueueRange {
                context: "opaque",
                min: self.opaque_range.min,
                max: self.opaque_range.max,
            });
        }
        if self.transparent_range.min > self.transparent_range.max {
            return Err(PipelineError::InvalidQueueRange {
                context: "transparent",
                min: self.transparent_range.min,
                max: self.transparent_range.max,
            });
        }
        if self.opaque_range.max >= self.transparent_range.min {
            return Err(PipelineError::OverlappingQueueRanges {
                opaque_max: self.opaque_range.max,
                transparent_min: self.transparent_range.min,
            });
        }
        Ok(())
    }
}

/// The configuration asset producing a pipeline.
///
/// Providers registered here are fixed for the pipeline's lifetime; their
/// registration order is the tie-break order for same-insertion-point
/// passes.
pub struct PipelineAsset {
    settings: PipelineSettings,
    providers: Vec<Box<dyn PassProvider>>,
    observer: Option<Box<dyn FrameObserver>>,
}

impl PipelineAsset {
    #[must_use]
    pub fn new(settings: PipelineSettings) -> Self {
        Self {
            settings,
            providers: Vec::new(),
            observer: None,
        }
    }

    /// Registers a pass provider (builder style).
    #[must_use]
    pub fn with_provider(mut self, provider: Box<dyn PassProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Injects a frame observer for editor builds (builder style).
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn FrameObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Validates the settings and builds the pipeline.
    pub fn create_pipeline(self) -> Result<RenderPipeline> {
        self.settings.validate()?;
        interner::preload_builtin();

        let technique = interner::intern(&self.settings.technique);
        let batcher = DrawBatcher::new(self.settings.opaque_range, self.settings.transparent_range);

        let mut renderer = FrameRenderer::new().with_batcher(batcher);
        if let Some(observer) = self.observer {
            renderer = renderer.with_observer(observer);
        }

        let mut registry = RenderPassRegistry::new();
        for provider in self.providers {
            registry.register(provider);
        }

        Ok(RenderPipeline {
            renderer,
            registry,
            technique,
        })
    }
}

/// A configured pipeline: one frame renderer plus its registered passes.
pub struct RenderPipeline {
    renderer: FrameRenderer,
    registry: RenderPassRegistry,
    technique: Name,
}

impl RenderPipeline {
    /// The technique tag this pipeline recognizes.
    #[must_use]
    pub fn technique(&self) -> Name {
        self.technique
    }

    /// State the last rendered frame ended in.
    #[must_use]
    pub fn last_frame_state(&self) -> FrameState {
        self.renderer.state()
    }

    /// Renders one frame with an externally supplied culler.
    pub fn render_frame(
        &mut self,
        frame: &FrameContext,
        culler: &dyn VisibilityCuller,
        device: &mut dyn GraphicsDevice,
    ) {
        self.renderer
            .render(frame, culler, &mut self.registry, device);
    }

    /// Renders a set of cameras strictly sequentially over one world.
    ///
    /// Cameras share this pipeline's single command stream; each frame
    /// fully submits (or aborts) before the next begins, so no commands
    /// leak across cameras.
    pub fn render_cameras(
        &mut self,
        device: &mut dyn GraphicsDevice,
        world: &DrawableWorld,
        frames: &[FrameContext],
    ) {
        let culler = FrustumCuller::new(world, self.technique);
        for frame in frames {
            self.render_frame(frame, &culler, device);
        }
    }
}
