//! Process-wide immutable name registry.
//!
//! Interns names (technique tags, scope and effect labels) into compact
//! integer [`Name`] symbols for cheap comparison and hashing. Backed by a
//! global `lasso::ThreadedRodeo` behind a `once_cell::sync::Lazy`, so the
//! registry is shared across the whole process and never shrinks.

use lasso::{Spur, ThreadedRodeo};
use once_cell::sync::Lazy;

/// Global string interner instance.
static INTERNER: Lazy<ThreadedRodeo> = Lazy::new(ThreadedRodeo::new);

/// Interned symbol type.
///
/// A compact integer identifier that can be compared and hashed cheaply.
pub type Name = Spur;

/// The built-in default technique tag.
///
/// Drawables and pipelines that do not specify a technique are scoped to
/// this tag.
pub const DEFAULT_TECHNIQUE: &str = "SRPDefaultUnlit";

/// Interns a string, returning its [`Name`].
///
/// If the string is already present, returns the existing symbol; otherwise
/// it is added to the registry.
#[inline]
#[must_use]
pub fn intern(s: &str) -> Name {
    INTERNER.get_or_intern(s)
}

/// Returns the [`Name`] for an already-interned string, or `None`.
///
/// Does not allocate or modify the registry.
#[inline]
#[must_use]
pub fn get(s: &str) -> Option<Name> {
    INTERNER.get(s)
}

/// Resolves a [`Name`] back to its string.
///
/// # Panics
/// Panics if the symbol does not belong to this registry (should not happen
/// for symbols produced by [`intern`]).
#[inline]
#[must_use]
pub fn resolve(name: Name) -> &'static str {
    INTERNER.resolve(&name)
}

/// Warms up the registry with the built-in technique and scope names.
///
/// Called during pipeline construction so the common names are interned
/// ahead of the hot path.
pub fn preload_builtin() {
    let builtin = [
        DEFAULT_TECHNIQUE,
        "Opaque",
        "Skybox",
        "Transparent",
        "Render Camera",
    ];

    for name in builtin {
        let _ = intern(name);
    }
}
