//! 可见性剔除
//!
//! 回答"这台相机潜在可见哪些物体"。两步协作协议:
//!
//! 1. [`VisibilityCuller::try_get_culling_params`] — 从相机推导剔除参数。
//!    视锥退化（矩阵含非有限值、近远平面倒置等）时返回 `None`，
//!    调用方据此中止整帧。
//! 2. [`VisibilityCuller::cull`] — 执行剔除，产出本帧消费、不跨帧持久的
//!    [`CullingResult`]。
//!
//! 自带实现 [`FrustumCuller`]: Gribb-Hartmann 视锥平面对包围球的相交测试，
//! 同时过滤掉未携带本管线技术标签的物体。

use glam::Vec3;

use crate::interner::Name;
use crate::scene::camera::{Frustum, ProjectionType, RenderCamera};
use crate::scene::drawable::{DrawableKey, DrawableWorld};

/// Culling parameters derived from one camera.
///
/// Never persisted across frames; rebuilt per camera per frame.
#[derive(Debug, Clone)]
pub struct CullingParams {
    /// Frustum planes extracted from the camera's view-projection matrix.
    pub frustum: Frustum,
    /// Camera position, used for per-item depth metrics.
    pub origin: Vec3,
    /// Technique tag a drawable must carry to participate.
    pub technique: Name,
}

/// One potentially visible drawable, with the data the batcher sorts on.
#[derive(Debug, Clone, Copy)]
pub struct VisibleDrawable {
    pub key: DrawableKey,
    /// Render-queue value, copied out so the batcher needs no world access.
    pub queue: u16,
    /// Opaque-sort grouping key.
    pub batch_key: u32,
    /// Squared distance from the camera, for depth ordering.
    pub distance_sq: f32,
}

/// The set of potentially visible drawables for one frame.
///
/// Produced by a [`VisibilityCuller`], consumed immediately by the draw
/// batcher, then dropped.
#[derive(Debug, Default)]
pub struct CullingResult {
    pub visible: Vec<VisibleDrawable>,
}

impl CullingResult {
    #[must_use]
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

/// Collaborator interface consumed by the frame renderer.
pub trait VisibilityCuller {
    /// Derives culling parameters for `camera`, or `None` when the camera's
    /// frustum is degenerate and the frame must abort.
    fn try_get_culling_params(&self, camera: &RenderCamera) -> Option<CullingParams>;

    /// Runs culling with previously derived parameters.
    fn cull(&self, params: &CullingParams) -> CullingResult;
}

/// Frustum/sphere culler over a [`DrawableWorld`].
///
/// Applies the pipeline-scoping contract: drawables whose technique tag is
/// not the pipeline's are filtered here and never reach the batcher.
pub struct FrustumCuller<'w> {
    world: &'w DrawableWorld,
    technique: Name,
}

impl<'w> FrustumCuller<'w> {
    #[must_use]
    pub fn new(world: &'w DrawableWorld, technique: Name) -> Self {
        Self { world, technique }
    }

    /// 相机参数是否能构成一个可用的视锥
    fn camera_is_valid(camera: &RenderCamera) -> bool {
        if !camera.aspect.is_finite() || camera.aspect <= 0.0 {
            return false;
        }
        if !camera.near.is_finite() || !camera.far.is_finite() || camera.near >= camera.far {
            return false;
        }
        if let ProjectionType::Perspective = camera.projection_type {
            if camera.near <= 0.0 {
                return false;
            }
            if !camera.fov.is_finite() || camera.fov <= 0.0 || camera.fov >= std::f32::consts::PI {
                return false;
            }
        }
        camera.view_projection_matrix().is_finite()
    }
}

impl VisibilityCuller for FrustumCuller<'_> {
    fn try_get_culling_params(&self, camera: &RenderCamera) -> Option<CullingParams> {
        if !Self::camera_is_valid(camera) {
            return None;
        }

        Some(CullingParams {
            frustum: Frustum::from_matrix(camera.view_projection_matrix()),
            origin: camera.position(),
            technique: self.technique,
        })
    }

    fn cull(&self, params: &CullingParams) -> CullingResult {
        let mut visible = Vec::with_capacity(self.world.len());

        for (key, drawable) in self.world.iter() {
            // 管线作用域约定: 未携带本管线技术标签的物体不参与
            if drawable.technique != params.technique {
                continue;
            }
            if !params.frustum.intersects_sphere(drawable.center, drawable.radius) {
                continue;
            }

            visible.push(VisibleDrawable {
                key,
                queue: drawable.queue,
                batch_key: drawable.batch_key,
                distance_sq: drawable.center.distance_squared(params.origin),
            });
        }

        CullingResult { visible }
    }
}
