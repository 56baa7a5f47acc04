use glam::{Affine3A, Mat4, Vec3, Vec4};
use std::borrow::Cow;

/// Category of a camera, deciding which optional passes apply to it.
///
/// Extension passes are usually restricted to [`CameraKind::Game`]: preview,
/// reflection and scene-view cameras render the plain frame without effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraKind {
    /// An interactive in-game camera.
    Game,
    /// An editor scene-view camera.
    SceneView,
    /// A thumbnail / inspector preview camera.
    Preview,
    /// A camera rendering a reflection probe.
    Reflection,
}

/// Camera clear behavior, ordered from "clears the most" to "clears nothing".
///
/// The ordering is load-bearing: everything up to and including `Depth`
/// clears the depth buffer, everything up to and including `Color` also
/// clears the color buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum ClearFlags {
    /// Clear color and depth; the sky fills the background.
    Skybox = 1,
    /// Clear depth and fill color with the camera background color.
    Color = 2,
    /// Clear depth only, keep previous color contents.
    Depth = 3,
    /// Clear nothing.
    Nothing = 4,
}

impl ClearFlags {
    /// Whether the depth buffer is cleared under these flags.
    #[inline]
    #[must_use]
    pub fn clears_depth(self) -> bool {
        self <= Self::Depth
    }

    /// Whether the color buffer is cleared under these flags.
    #[inline]
    #[must_use]
    pub fn clears_color(self) -> bool {
        self <= Self::Color
    }
}

/// 渲染相机
///
/// 持有投影参数与缓存的矩阵，renderer 只读。
/// `kind` 与 `clear_flags` 决定帧的清屏策略与可选 Pass 的适用性。
#[derive(Debug, Clone)]
pub struct RenderCamera {
    pub name: Cow<'static, str>,
    pub kind: CameraKind,
    pub clear_flags: ClearFlags,
    /// 清屏背景色（仅 `ClearFlags::Color` 时生效）
    pub background: Vec4,

    // === 投影属性 (Projection Only) ===
    pub projection_type: ProjectionType,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub ortho_size: f32,

    // 缓存的矩阵
    pub(crate) world_matrix: Affine3A,
    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) view_projection_matrix: Mat4,
}

#[derive(Debug, Clone, Copy)]
pub enum ProjectionType {
    Perspective,
    Orthographic,
}

impl RenderCamera {
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            name: Cow::Borrowed("Camera"),
            kind: CameraKind::Game,
            clear_flags: ClearFlags::Skybox,
            background: Vec4::ZERO,
            projection_type: ProjectionType::Perspective,
            fov: fov.to_radians(),
            aspect,
            near,
            far,
            ortho_size: 10.0,

            world_matrix: Affine3A::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        };

        cam.update_projection_matrix();
        cam
    }

    #[must_use]
    pub fn new_orthographic(ortho_size: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            name: Cow::Borrowed("Camera"),
            kind: CameraKind::Game,
            clear_flags: ClearFlags::Skybox,
            background: Vec4::ZERO,
            projection_type: ProjectionType::Orthographic,
            fov: 60_f32.to_radians(),
            aspect,
            near,
            far,
            ortho_size,

            world_matrix: Affine3A::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        };

        cam.update_projection_matrix();
        cam
    }

    /// 设置相机名称（链式调用）
    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// 设置相机类别（链式调用）
    #[must_use]
    pub fn with_kind(mut self, kind: CameraKind) -> Self {
        self.kind = kind;
        self
    }

    /// 设置清屏行为（链式调用）
    #[must_use]
    pub fn with_clear(mut self, flags: ClearFlags, background: Vec4) -> Self {
        self.clear_flags = flags;
        self.background = background;
        self
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix = match self.projection_type {
            ProjectionType::Perspective => {
                // glam 的 perspective_rh 默认是为了 WGPU/Vulkan 设计的 (0 to 1)
                Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
            }
            ProjectionType::Orthographic => {
                let w = self.ortho_size * self.aspect;
                let h = self.ortho_size;
                Mat4::orthographic_rh(-w, w, -h, h, self.near, self.far)
            }
        };

        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    pub fn update_view_projection(&mut self, world_transform: &Affine3A) {
        self.world_matrix = *world_transform;

        // 1. View Matrix = World Inverse
        self.view_matrix = Mat4::from(*world_transform).inverse();

        // 2. VP
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    /// 相机世界空间位置
    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.world_matrix.translation.into()
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.view_projection_matrix
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Frustum {
    planes: [Vec4; 6], // Left, Right, Bottom, Top, Near, Far
}

impl Frustum {
    #[must_use]
    pub fn from_matrix(m: Mat4) -> Self {
        let rows = [m.row(0), m.row(1), m.row(2), m.row(3)];

        let mut planes = [Vec4::ZERO; 6];
        // 提取公式: https://www.gamedevs.org/uploads/fast-extraction-viewing-frustum-planes-from-world-view-projection-matrix.pdf
        // Gribb-Hartmann 方法

        // Left:   row4 + row1
        planes[0] = rows[3] + rows[0];
        // Right:  row4 - row1
        planes[1] = rows[3] - rows[0];
        // Bottom: row4 + row2
        planes[2] = rows[3] + rows[1];
        // Top:    row4 - row2
        planes[3] = rows[3] - rows[1];
        // NDC Z is [0, 1] for WGPU-style projections.
        planes[4] = rows[2]; // Near
        planes[5] = rows[3] - rows[2]; // Far

        // Normalize
        for plane in &mut planes {
            let length = Vec3::new(plane.x, plane.y, plane.z).length();
            *plane /= length;
        }

        Self { planes }
    }

    // 简单的球体相交检测
    #[must_use]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        for plane in &self.planes {
            let dist = plane.x * center.x + plane.y * center.y + plane.z * center.z + plane.w;
            if dist < -radius {
                return false;
            }
        }
        true
    }
}
