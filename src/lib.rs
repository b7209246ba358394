//! Incrementally-resizable hash dictionary and compressible packed-array
//! quicklist cores for an in-memory data store.
//!
//! Main modules:
//! - `database` — the two collection cores: `dict` (hash map) and
//!   `quicklist` (segmented list), plus the `listpack` byte-array they
//!   share and a small `config` struct for their process-wide knobs.
//! - `hash` — process-wide hash seed shared by `database::dict`'s
//!   default key-hashing strategy.

/// The two collection cores (`dict`, `quicklist`) and their shared
/// `listpack`/`config` support modules.
pub mod database;
/// Process-wide hash seed shared by `database::dict::DefaultDictType`.
pub mod hash;

pub use database::{
    config::Config,
    dict::{Dict, DictType},
    listpack::ListPack,
    quicklist::{CompressDepth, Direction, FillPolicy, QuickList},
};
pub use packedcore_error::{DictError, DictResult, ErrorExt, QuicklistError, QuicklistResult, StatusCode};
