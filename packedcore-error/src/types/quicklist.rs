use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

pub type QuicklistResult<T> = Result<T, QuicklistError>;

/// Reported (non-fatal) failures from the Quicklist core.
///
/// Allocation failures inside Node operations are fatal and `panic!` rather than appear here.
#[derive(Debug, Error)]
pub enum QuicklistError {
    #[error("bookmark limit of {limit} exceeded")]
    BookmarkLimitExceeded { limit: usize },

    #[error("bookmark name '{0}' already in use")]
    BookmarkNameTaken(String),

    #[error("no bookmark named '{0}'")]
    BookmarkNotFound(String),

    #[error("index {index} out of range for length {len}")]
    InvalidIndex { index: i64, len: usize },
}

impl ErrorExt for QuicklistError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BookmarkLimitExceeded { .. } => StatusCode::BookmarkLimitExceeded,
            Self::BookmarkNameTaken(_) => StatusCode::BookmarkNameTaken,
            Self::BookmarkNotFound(_) => StatusCode::BookmarkNotFound,
            Self::InvalidIndex { .. } => StatusCode::InvalidIndex,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
