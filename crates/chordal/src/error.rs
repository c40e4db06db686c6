//! Error types for Chordal operations.
//!
//! Most conditions the pipeline meets are deliberately *not* errors: an empty
//! element collection, a malformed persisted settings blob, a payload pushed
//! before the rendering surface is ready, and an unresolvable relationship
//! endpoint are all recovered locally. [`ChordError`] covers the conditions
//! that genuinely abort an operation.

use std::io;

use thiserror::Error;

/// The main error type for Chordal operations.
#[derive(Debug, Error)]
pub enum ChordError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The rendering engine's activation precondition failed. Fatal: surfaced
    /// once at initialization and never retried.
    #[error("Rendering engine activation failed: {0}")]
    Activation(String),

    /// The rendering surface failed to boot or load content.
    #[error("Rendering surface error: {0}")]
    Surface(String),

    /// A model document could not be interpreted.
    #[error("Model error: {0}")]
    Model(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
