//! Drawable storage
//!
//! A [`Drawable`] is the pipeline's view of one renderable object: a
//! bounding sphere for culling, a render-queue value for bucket selection,
//! a technique tag deciding whether this pipeline recognizes it at all,
//! and a batch key used by the opaque sort to group state-compatible draws.
//!
//! The pipeline never owns meshes or materials; a [`DrawableKey`] is the
//! stable handle a device backend resolves to real GPU data.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::interner::{self, Name};

slotmap::new_key_type! {
    /// Stable handle to a [`Drawable`] in a [`DrawableWorld`].
    pub struct DrawableKey;
}

/// Well-known render-queue anchors.
///
/// The queue value decides coarse draw order: everything inside the opaque
/// range draws before the skybox, everything inside the transparent range
/// draws after it.
pub mod queue {
    /// Background geometry drawn before regular opaques.
    pub const BACKGROUND: u16 = 1000;
    /// Default opaque geometry.
    pub const GEOMETRY: u16 = 2000;
    /// Alpha-tested opaque geometry.
    pub const ALPHA_TEST: u16 = 2450;
    /// Last queue value still considered opaque.
    pub const GEOMETRY_LAST: u16 = 2500;
    /// Default transparent geometry.
    pub const TRANSPARENT: u16 = 3000;
    /// Overlay geometry drawn last.
    pub const OVERLAY: u16 = 4000;
}

/// Inclusive render-queue interval used to select a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderQueueRange {
    pub min: u16,
    pub max: u16,
}

impl RenderQueueRange {
    /// The default opaque range.
    pub const OPAQUE: Self = Self { min: 0, max: queue::GEOMETRY_LAST };
    /// The default transparent range.
    pub const TRANSPARENT: Self = Self { min: queue::GEOMETRY_LAST + 1, max: 5000 };

    #[inline]
    #[must_use]
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, queue: u16) -> bool {
        queue >= self.min && queue <= self.max
    }
}

/// One renderable object as seen by the pipeline.
#[derive(Debug, Clone)]
pub struct Drawable {
    /// Render-queue value; selects the opaque or transparent bucket.
    pub queue: u16,
    /// Technique tag; drawables tagged for another pipeline are invisible
    /// to this one.
    pub technique: Name,
    /// Bounding sphere center, world space.
    pub center: Vec3,
    /// Bounding sphere radius.
    pub radius: f32,
    /// Grouping key for the opaque sort (shared material / pipeline state).
    pub batch_key: u32,
}

impl Drawable {
    /// Creates an opaque drawable with the default technique tag.
    #[must_use]
    pub fn opaque(center: Vec3, radius: f32, batch_key: u32) -> Self {
        Self {
            queue: queue::GEOMETRY,
            technique: interner::intern(interner::DEFAULT_TECHNIQUE),
            center,
            radius,
            batch_key,
        }
    }

    /// Creates a transparent drawable with the default technique tag.
    #[must_use]
    pub fn transparent(center: Vec3, radius: f32, batch_key: u32) -> Self {
        Self {
            queue: queue::TRANSPARENT,
            technique: interner::intern(interner::DEFAULT_TECHNIQUE),
            center,
            radius,
            batch_key,
        }
    }

    /// Overrides the render-queue value (builder style).
    #[must_use]
    pub fn with_queue(mut self, queue: u16) -> Self {
        self.queue = queue;
        self
    }

    /// Overrides the technique tag (builder style).
    #[must_use]
    pub fn with_technique(mut self, technique: Name) -> Self {
        self.technique = technique;
        self
    }
}

/// 可绘制对象集合
///
/// 剔除器的输入域。按 [`DrawableKey`] 稳定寻址，跨帧持久。
#[derive(Default)]
pub struct DrawableWorld {
    drawables: SlotMap<DrawableKey, Drawable>,
}

impl DrawableWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, drawable: Drawable) -> DrawableKey {
        self.drawables.insert(drawable)
    }

    pub fn remove(&mut self, key: DrawableKey) -> Option<Drawable> {
        self.drawables.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: DrawableKey) -> Option<&Drawable> {
        self.drawables.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DrawableKey, &Drawable)> {
        self.drawables.iter()
    }
}
