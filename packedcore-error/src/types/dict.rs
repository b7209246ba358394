use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

pub type DictResult<T> = Result<T, DictError>;

/// Reported (non-fatal) failures from the Dictionary core.
///
/// Fatal conditions — allocation failure outside `try_expand`, a raw
/// iterator's fingerprint mismatching at release, `pause_rehash` underflow —
/// are programming errors and `panic!` rather than appear here.
#[derive(Debug, Error)]
pub enum DictError {
    #[error("key already exists")]
    KeyExists,

    #[error("key not found")]
    KeyNotFound,

    #[error("dict is already rehashing")]
    AlreadyRehashing,

    #[error("allocation failed while expanding to {requested} buckets")]
    AllocationFailed { requested: usize },
}

impl ErrorExt for DictError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::KeyExists => StatusCode::KeyExists,
            Self::KeyNotFound => StatusCode::KeyNotFound,
            Self::AlreadyRehashing => StatusCode::AlreadyRehashing,
            Self::AllocationFailed { .. } => StatusCode::AllocationFailed,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
