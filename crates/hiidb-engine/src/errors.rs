//! Engine error taxonomy.
//!
//! Every operation either completes or fails synchronously with one of these
//! codes; there is no logging channel and no retry policy. Size and validity
//! checks run before any mutation, so a failed call leaves previously
//! committed state untouched.

use hiidb_format::FormatError;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HiiError {
    /// Malformed or contradictory caller input, detected before mutation.
    #[error("invalid parameter")]
    InvalidParameter,

    /// Handle, token, language, form id, or default-image source absent.
    #[error("not found")]
    NotFound,

    /// Caller-supplied output buffer is insufficient; `required` is exact.
    #[error("buffer too small: {required} bytes required")]
    BufferTooSmall { required: usize },

    /// Allocation bound or size arithmetic exceeded.
    #[error("out of resources")]
    OutOfResources,
}

impl From<FormatError> for HiiError {
    fn from(_: FormatError) -> Self {
        // Undecodable pack bytes are a caller-input problem at this boundary.
        HiiError::InvalidParameter
    }
}

pub type Result<T> = std::result::Result<T, HiiError>;
