//! Scene-facing types: cameras and the drawable domain the culler sees.

pub mod camera;
pub mod drawable;

pub use camera::{CameraKind, ClearFlags, Frustum, ProjectionType, RenderCamera};
pub use drawable::{Drawable, DrawableKey, DrawableWorld, RenderQueueRange};
