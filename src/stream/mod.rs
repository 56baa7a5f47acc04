//! 命令流
//!
//! [`CommandStream`] 是一段有名字的延迟图形操作序列: 清屏、绘制、全屏效果
//! Blit，以及成对的采样范围标记 (profiling scope)。
//!
//! 约定:
//! - 命令只累积，不立即生效; [`CommandStream::execute_and_clear`] 是命令
//!   到达设备的唯一途径，执行后流立即清空，可复用于下一帧。
//! - 空流上执行是无操作（幂等，不报错）。
//! - 范围标记必须严格配对; 不配对是管线接线层面的结构性 bug，直接 panic，
//!   不做恢复。

use std::borrow::Cow;

use glam::Vec4;
use smallvec::SmallVec;

use crate::device::GraphicsDevice;
use crate::frame::context::{EffectId, SurfaceId};
use crate::interner::{self, Name};
use crate::scene::drawable::DrawableKey;

bitflags::bitflags! {
    /// Which attachments a clear operation touches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearTarget: u8 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
    }
}

/// What a draw operation draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    /// One culled drawable.
    Geometry(DrawableKey),
    /// The camera's sky representation; exactly one per frame.
    Skybox,
}

/// One recorded operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamOp {
    /// Opens a named profiling scope.
    BeginScope(Name),
    /// Closes the matching profiling scope.
    EndScope(Name),
    /// Clears the bound target.
    Clear { target: ClearTarget, color: Vec4 },
    /// Draws geometry or the skybox.
    Draw(DrawKind),
    /// Runs a fullscreen effect from `source` into `dest`.
    Blit {
        source: SurfaceId,
        dest: SurfaceId,
        effect: EffectId,
    },
}

/// 有序、命名的延迟命令缓冲
pub struct CommandStream {
    name: Cow<'static, str>,
    ops: Vec<StreamOp>,
    /// 当前打开的范围栈，用于配对检查
    open_scopes: SmallVec<[Name; 4]>,
}

impl Default for CommandStream {
    fn default() -> Self {
        Self::new("Render Camera")
    }
}

impl CommandStream {
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ops: Vec::with_capacity(256),
            open_scopes: SmallVec::new(),
        }
    }

    /// 流的名字（用于性能分析归属）
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// 已录制命令的只读视图
    #[inline]
    #[must_use]
    pub fn ops(&self) -> &[StreamOp] {
        &self.ops
    }

    /// 打开一个命名采样范围
    ///
    /// 范围内追加的命令在性能分析中归属于该名字。
    pub fn begin_scope(&mut self, name: Name) {
        self.open_scopes.push(name);
        self.ops.push(StreamOp::BeginScope(name));
    }

    /// 关闭最近打开的采样范围
    ///
    /// # Panics
    /// 没有打开的范围、或名字与最近一次 `begin_scope` 不匹配时 panic。
    pub fn end_scope(&mut self, name: Name) {
        let Some(open) = self.open_scopes.pop() else {
            panic!(
                "CommandStream '{}': end_scope('{}') without a matching begin_scope",
                self.name,
                interner::resolve(name)
            );
        };
        assert!(
            open == name,
            "CommandStream '{}': scope mismatch, open '{}' closed as '{}'",
            self.name,
            interner::resolve(open),
            interner::resolve(name)
        );
        self.ops.push(StreamOp::EndScope(name));
    }

    /// 录制一次清屏
    pub fn clear(&mut self, target: ClearTarget, color: Vec4) {
        self.ops.push(StreamOp::Clear { target, color });
    }

    /// 录制一次绘制
    pub fn draw(&mut self, kind: DrawKind) {
        self.ops.push(StreamOp::Draw(kind));
    }

    /// 录制一次全屏效果 Blit
    pub fn blit(&mut self, source: SurfaceId, dest: SurfaceId, effect: EffectId) {
        self.ops.push(StreamOp::Blit { source, dest, effect });
    }

    /// 执行并清空: 命令到达设备的唯一途径
    ///
    /// 空流上是无操作。执行后流为空，可直接复用。
    ///
    /// # Panics
    /// 存在未关闭的采样范围时 panic。
    pub fn execute_and_clear(&mut self, device: &mut dyn GraphicsDevice) {
        self.assert_balanced();
        if self.ops.is_empty() {
            return;
        }
        device.execute(&self.name, &self.ops);
        self.ops.clear();
    }

    /// 丢弃已录制命令，不触达设备
    ///
    /// 供帧中止路径使用: 范围已配对关闭后安全清空。
    ///
    /// # Panics
    /// 存在未关闭的采样范围时 panic。
    pub fn abandon(&mut self) {
        self.assert_balanced();
        self.ops.clear();
    }

    fn assert_balanced(&self) {
        assert!(
            self.open_scopes.is_empty(),
            "CommandStream '{}': {} profiling scope(s) left open (first: '{}')",
            self.name,
            self.open_scopes.len(),
            interner::resolve(self.open_scopes[0])
        );
    }
}
