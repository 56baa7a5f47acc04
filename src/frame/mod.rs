//! 帧渲染组织
//!
//! 提供：
//! - FrameRenderer: 每相机帧编排状态机
//! - FrameContext: 帧上下文（相机、目标表面、清屏策略）
//! - DrawBatcher: 剔除结果分桶与排序
//! - InsertionPoint: 帧内固定插入点枚举
//! - FrameObserver: 编辑器挂钩观察者

pub mod batcher;
pub mod context;
pub mod observer;
pub mod renderer;
pub mod stage;

pub use batcher::{DrawBatcher, RenderKey};
pub use context::{ClearPolicy, EffectId, FrameContext, FrameSurfaces, SurfaceId};
pub use observer::{FrameObserver, NoopObserver};
pub use renderer::{FrameRenderer, FrameState};
pub use stage::InsertionPoint;
