//! Error types for document operations.

use crate::layers::LayerId;
use thiserror::Error;

/// Errors raised by structural document edits.
///
/// Geometry is clamped rather than rejected; these only cover requests that
/// cannot be interpreted at all (unknown IDs, broken tree invariants).
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Layer not found: {0}")]
    LayerNotFound(LayerId),
    #[error("Duplicate layer id: {0}")]
    DuplicateId(LayerId),
    #[error("Layer is not a group: {0}")]
    NotAGroup(LayerId),
    #[error("Layer is nested inside a group: {0}")]
    NotTopLevel(LayerId),
    #[error("Grouping needs at least two layers, got {0}")]
    GroupTooSmall(usize),
    #[error("Layer {id} is smaller than the minimum size ({width}x{height})")]
    InvalidDimensions { id: LayerId, width: f64, height: f64 },
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;
