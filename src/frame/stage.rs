//! Insertion Point Definitions
//!
//! [`InsertionPoint`] defines the fixed, ordered set of stages in the
//! per-frame sequence at which extension passes may inject work.

/// Insertion point enumeration.
///
/// Defines where in the frame an extension pass executes. Multiple passes
/// may share an insertion point; they then execute in registration order.
///
/// # Frame Position
///
/// ```text
/// Setup → Cull
///   → [BeforeOpaque] → opaque draws → [AfterOpaque]
///   → skybox draw
///   → [BeforeTransparent] → transparent draws → [AfterTransparent]
///   → [BeforePostProcess] → [AfterPostProcess]
/// → Submit
/// ```
///
/// # Example
///
/// ```ignore
/// // A volumetric-light effect running just before post-processing
/// let pass = EffectPass::new("VolumetricLight", InsertionPoint::BeforePostProcess);
/// ```
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
#[repr(u8)]
pub enum InsertionPoint {
    /// Before any opaque geometry is drawn.
    ///
    /// Suitable for: depth pre-passes, per-frame compute warm-up.
    BeforeOpaque = 0,

    /// After opaque geometry, before the skybox.
    ///
    /// Suitable for: decals, screen-space effects reading opaque depth.
    AfterOpaque = 1,

    /// After the skybox, before transparent geometry.
    ///
    /// Suitable for: effects that must composite under translucents.
    BeforeTransparent = 2,

    /// After all transparent geometry.
    ///
    /// Suitable for: distortion effects, particle composites.
    AfterTransparent = 3,

    /// Before post-processing.
    ///
    /// Suitable for: volumetric light, fog, screen-space reflections.
    BeforePostProcess = 4,

    /// After post-processing (executed last, before submit).
    ///
    /// Suitable for: overlays, debug visualization.
    AfterPostProcess = 5,
}

impl InsertionPoint {
    /// Returns the numeric index of the insertion point (used for sorting).
    #[inline]
    #[must_use]
    pub const fn order(self) -> u8 {
        self as u8
    }

    /// Insertion point name (for debugging).
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BeforeOpaque => "BeforeOpaque",
            Self::AfterOpaque => "AfterOpaque",
            Self::BeforeTransparent => "BeforeTransparent",
            Self::AfterTransparent => "AfterTransparent",
            Self::BeforePostProcess => "BeforePostProcess",
            Self::AfterPostProcess => "AfterPostProcess",
        }
    }

    /// All insertion points in execution order.
    pub const ALL: [Self; 6] = [
        Self::BeforeOpaque,
        Self::AfterOpaque,
        Self::BeforeTransparent,
        Self::AfterTransparent,
        Self::BeforePostProcess,
        Self::AfterPostProcess,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_point_ordering() {
        assert!(InsertionPoint::BeforeOpaque < InsertionPoint::AfterOpaque);
        assert!(InsertionPoint::AfterOpaque < InsertionPoint::BeforeTransparent);
        assert!(InsertionPoint::BeforeTransparent < InsertionPoint::AfterTransparent);
        assert!(InsertionPoint::AfterTransparent < InsertionPoint::BeforePostProcess);
        assert!(InsertionPoint::BeforePostProcess < InsertionPoint::AfterPostProcess);
    }

    #[test]
    fn test_all_is_in_execution_order() {
        for pair in InsertionPoint::ALL.windows(2) {
            assert!(pair[0].order() < pair[1].order());
        }
    }
}
