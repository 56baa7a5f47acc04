#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod cull;
pub mod device;
pub mod errors;
pub mod frame;
pub mod interner;
pub mod passes;
pub mod pipeline;
pub mod scene;
pub mod stream;

pub use cull::{CullingParams, CullingResult, FrustumCuller, VisibilityCuller};
pub use device::{GraphicsDevice, TraceDevice, WgpuDevice};
pub use errors::{PipelineError, Result};
pub use frame::{
    ClearPolicy, DrawBatcher, EffectId, FrameContext, FrameObserver, FrameRenderer, FrameState,
    FrameSurfaces, InsertionPoint, NoopObserver, SurfaceId,
};
pub use passes::{EffectPass, EffectPassProvider, PassProvider, RenderPass, RenderPassRegistry};
pub use pipeline::{PipelineAsset, PipelineSettings, RenderPipeline};
pub use scene::{CameraKind, ClearFlags, Drawable, DrawableKey, DrawableWorld, RenderCamera};
pub use stream::{ClearTarget, CommandStream, DrawKind, StreamOp};
