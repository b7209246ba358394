use std::fmt;

/// Status codes for categorizing failures raised by the Dictionary and
/// Quicklist cores.
///
/// # Ranges
/// - 0xxx: success
/// - 2xxx: data/lookup errors (key presence, indices)
/// - 5xxx: resource errors (allocation, rehash state)
/// - 9xxx: internal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatusCode {
    Success = 0,

    KeyNotFound = 2000,
    KeyExists = 2001,
    InvalidIndex = 2002,
    BookmarkNotFound = 2003,
    BookmarkNameTaken = 2004,

    AlreadyRehashing = 5000,
    AllocationFailed = 5001,
    BookmarkLimitExceeded = 5002,

    Internal = 9000,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl StatusCode {
    /// Numeric representation of the status code.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Whether this code represents a caller mistake rather than an
    /// infrastructure failure (lookup/index errors vs. resource errors).
    pub fn is_client_error(&self) -> bool {
        (2000..=4999).contains(&self.code())
    }

    /// Recommended log level for this code.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Trace,
            Self::KeyNotFound
            | Self::KeyExists
            | Self::InvalidIndex
            | Self::BookmarkNotFound
            | Self::BookmarkNameTaken => LogLevel::Debug,
            Self::AlreadyRehashing | Self::BookmarkLimitExceeded => LogLevel::Warn,
            Self::AllocationFailed | Self::Internal => LogLevel::Error,
        }
    }
}

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}
