//! Fullscreen Effect Pass
//!
//! [`EffectPass`] is the workhorse extension pass: a fullscreen effect
//! (volumetric light, fog, color grading) blitting the frame's color
//! target through a prepared effect material. The effect itself is a
//! black box; this module only supplies the frame plumbing around it.

use std::borrow::Cow;

use crate::frame::context::{EffectId, FrameContext, FrameSurfaces, SurfaceId};
use crate::frame::stage::InsertionPoint;
use crate::interner::{self, Name};
use crate::passes::pass::RenderPass;
use crate::passes::provider::{PassProvider, PassQueue};
use crate::scene::camera::CameraKind;
use crate::stream::CommandStream;

/// A fullscreen effect bound to one insertion point and one target.
///
/// The pass is enabled only when the camera matches its category and both
/// its effect and target handles are present; otherwise it is skipped
/// silently and the frame proceeds normally.
pub struct EffectPass {
    name: Cow<'static, str>,
    /// Interned name, doubling as the profiling scope label.
    scope: Name,
    point: InsertionPoint,
    effect: Option<EffectId>,
    target: Option<SurfaceId>,
    /// Camera category this effect applies to.
    camera_kind: CameraKind,
}

impl EffectPass {
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, point: InsertionPoint) -> Self {
        let name = name.into();
        let scope = interner::intern(&name);
        Self {
            name,
            scope,
            point,
            effect: None,
            target: None,
            camera_kind: CameraKind::Game,
        }
    }

    /// Binds the effect material (builder style).
    #[must_use]
    pub fn with_effect(mut self, effect: EffectId) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Restricts the pass to a camera category (builder style).
    #[must_use]
    pub fn with_camera_kind(mut self, kind: CameraKind) -> Self {
        self.camera_kind = kind;
        self
    }

    /// Replaces the effect material at runtime; `None` disables the pass.
    pub fn set_effect(&mut self, effect: Option<EffectId>) {
        self.effect = effect;
    }

    #[must_use]
    pub fn effect(&self) -> Option<EffectId> {
        self.effect
    }

    #[must_use]
    pub fn target(&self) -> Option<SurfaceId> {
        self.target
    }

    #[must_use]
    pub fn camera_kind(&self) -> CameraKind {
        self.camera_kind
    }
}

impl RenderPass for EffectPass {
    fn name(&self) -> &str {
        &self.name
    }

    fn insertion_point(&self) -> InsertionPoint {
        self.point
    }

    fn set_target(&mut self, target: SurfaceId) {
        self.target = Some(target);
    }

    fn enabled(&self, frame: &FrameContext) -> bool {
        frame.camera.kind == self.camera_kind && self.effect.is_some() && self.target.is_some()
    }

    fn execute(&mut self, stream: &mut CommandStream, _frame: &FrameContext) {
        // 资源检查已在 enabled / add_passes 中完成
        let (Some(effect), Some(target)) = (self.effect, self.target) else {
            return;
        };

        stream.begin_scope(self.scope);
        // 单目标约定: 源与目标都是本帧绑定的同一个目标
        stream.blit(target, target, effect);
        stream.end_scope(self.scope);
    }
}

/// Provider wrapping one [`EffectPass`].
///
/// Constructed once at pipeline configuration; every frame it re-binds the
/// frame's color target and enqueues the pass when it applies.
pub struct EffectPassProvider {
    pass: EffectPass,
}

impl EffectPassProvider {
    #[must_use]
    pub fn new(pass: EffectPass) -> Self {
        Self { pass }
    }

    #[must_use]
    pub fn pass_mut(&mut self) -> &mut EffectPass {
        &mut self.pass
    }
}

impl PassProvider for EffectPassProvider {
    fn setup_targets(&mut self, surfaces: &FrameSurfaces) {
        self.pass.set_target(surfaces.color);
    }

    fn add_passes<'a>(&'a mut self, queue: &mut PassQueue<'a>, frame: &FrameContext) {
        // 相机类别检查
        if frame.camera.kind != self.pass.camera_kind {
            return;
        }
        // 资源检查
        if self.pass.effect.is_none() || self.pass.target.is_none() {
            return;
        }
        queue.enqueue(&mut self.pass);
    }
}
