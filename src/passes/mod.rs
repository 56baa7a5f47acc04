//! 可插拔渲染 Pass
//!
//! 提供：
//! - RenderPass: Pass 抽象接口
//! - EffectPass / EffectPassProvider: 全屏效果 Pass 及其 Provider
//! - PassProvider / PassQueue: 外部插件契约与帧内执行队列
//! - RenderPassRegistry: 配置期注册、逐帧收集

pub mod effect;
pub mod pass;
pub mod provider;
pub mod registry;

pub use effect::{EffectPass, EffectPassProvider};
pub use pass::RenderPass;
pub use provider::{PassProvider, PassQueue};
pub use registry::RenderPassRegistry;
