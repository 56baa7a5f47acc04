//! Frame Context
//!
//! [`FrameContext`] bundles everything one camera's frame renders with: the
//! camera itself, the target surfaces, and the clear policy derived from the
//! camera's clear flags. It is created once per frame, owned exclusively by
//! the frame renderer for the frame's duration, and discarded after submit.
//!
//! Surface and effect handles are *non-owning*: the surfaces belong to the
//! surrounding surface-management system, never to the renderer or to
//! individual passes.

use glam::Vec4;

use crate::scene::camera::{ClearFlags, RenderCamera};
use crate::stream::ClearTarget;

/// Non-owning handle to a render surface managed outside the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// Non-owning handle to a fullscreen effect (a prepared material).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId(pub u64);

/// The target surfaces of one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameSurfaces {
    /// Color target the frame renders into.
    pub color: SurfaceId,
    /// Depth target paired with the color target.
    pub depth: SurfaceId,
}

/// Resolved clear behavior for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ClearPolicy {
    pub target: ClearTarget,
    pub color: Vec4,
}

impl ClearPolicy {
    /// Derives the clear policy from a camera's clear flags.
    ///
    /// Depth is cleared for every flag except `Nothing`; color is cleared
    /// for `Skybox` and `Color`. The clear color is the camera background
    /// only for `Color` — a skybox clear uses transparent black since the
    /// sky draw overwrites it anyway.
    #[must_use]
    pub fn for_camera(camera: &RenderCamera) -> Self {
        let flags = camera.clear_flags;
        let mut target = ClearTarget::empty();
        if flags.clears_depth() {
            target |= ClearTarget::DEPTH;
        }
        if flags.clears_color() {
            target |= ClearTarget::COLOR;
        }

        let color = if flags == ClearFlags::Color {
            camera.background
        } else {
            Vec4::ZERO
        };

        Self { target, color }
    }

    /// Whether anything is cleared at all.
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.target.is_empty()
    }
}

/// Everything one camera's frame is rendered against.
pub struct FrameContext<'a> {
    pub camera: &'a RenderCamera,
    pub surfaces: FrameSurfaces,
    pub clear: ClearPolicy,
}

impl<'a> FrameContext<'a> {
    #[must_use]
    pub fn new(camera: &'a RenderCamera, surfaces: FrameSurfaces) -> Self {
        Self {
            camera,
            surfaces,
            clear: ClearPolicy::for_camera(camera),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::camera::{ClearFlags, RenderCamera};

    fn camera_with(flags: ClearFlags) -> RenderCamera {
        RenderCamera::new_perspective(60.0, 1.0, 0.1, 100.0)
            .with_clear(flags, Vec4::new(0.2, 0.4, 0.6, 1.0))
    }

    #[test]
    fn color_flags_use_camera_background() {
        let cam = camera_with(ClearFlags::Color);
        let policy = ClearPolicy::for_camera(&cam);
        assert_eq!(policy.target, ClearTarget::COLOR | ClearTarget::DEPTH);
        assert_eq!(policy.color, Vec4::new(0.2, 0.4, 0.6, 1.0));
    }

    #[test]
    fn skybox_flags_clear_to_transparent_black() {
        let cam = camera_with(ClearFlags::Skybox);
        let policy = ClearPolicy::for_camera(&cam);
        assert_eq!(policy.target, ClearTarget::COLOR | ClearTarget::DEPTH);
        assert_eq!(policy.color, Vec4::ZERO);
    }

    #[test]
    fn depth_flags_leave_color_alone() {
        let policy = ClearPolicy::for_camera(&camera_with(ClearFlags::Depth));
        assert_eq!(policy.target, ClearTarget::DEPTH);
    }

    #[test]
    fn nothing_flags_clear_nothing() {
        let policy = ClearPolicy::for_camera(&camera_with(ClearFlags::Nothing));
        assert!(policy.is_noop());
    }
}
