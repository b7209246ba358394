//! Core database data structures.
//!
//! - `dict`: incrementally-resizable chained hash map.
//! - `quicklist`: segmented, compressible doubly-linked packed-array list.
//! - `listpack`: packed byte-array dependency of `quicklist`.
//! - `config`: process-wide knobs shared by the two cores.

pub mod config;
pub mod dict;
pub mod listpack;
pub mod quicklist;

pub use config::Config;
pub use dict::Dict;
pub use quicklist::QuickList;
