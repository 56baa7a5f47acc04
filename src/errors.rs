//! Error Types
//!
//! This module defines the error types used by the pipeline's cold
//! configuration path.
//!
//! # Overview
//!
//! [`PipelineError`] covers the failure modes of static pipeline
//! configuration: settings parsing and settings validation. Per-frame
//! conditions are deliberately *not* errors:
//!
//! - A camera whose culling parameters cannot be derived aborts its frame
//!   cleanly (no error value, no partial draw).
//! - A pass with a missing effect or target is silently skipped.
//! - An unbalanced profiling scope is a structural bug in pipeline wiring
//!   and panics instead of surfacing here.

use thiserror::Error;

/// The error type for pipeline configuration.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A render-queue range is empty or inverted.
    #[error("Invalid render-queue range: {context} ({min}..={max})")]
    InvalidQueueRange {
        /// Which range was rejected
        context: &'static str,
        /// Lower bound of the rejected range
        min: u16,
        /// Upper bound of the rejected range
        max: u16,
    },

    /// The opaque and transparent ranges overlap, so a drawable could be
    /// claimed by both buckets.
    #[error("Overlapping render-queue ranges: opaque ends at {opaque_max}, transparent starts at {transparent_min}")]
    OverlappingQueueRanges {
        /// Upper bound of the opaque range
        opaque_max: u16,
        /// Lower bound of the transparent range
        transparent_min: u16,
    },

    /// The recognized technique tag is empty.
    #[error("Pipeline technique tag must not be empty")]
    EmptyTechnique,

    /// Settings JSON parse error.
    #[error("Settings parse error: {0}")]
    SettingsParse(#[from] serde_json::Error),
}

/// Alias for `Result<T, PipelineError>`.
pub type Result<T> = std::result::Result<T, PipelineError>;
