//! Error types shared by the Dictionary and Quicklist cores.
//!
//! Split out into its own crate, kept separate from `packedcore` itself:
//! reported failures get a small enumerated [`StatusCode`] via the
//! [`ErrorExt`] trait, fatal failures `panic!` at the call site instead of
//! flowing through here.

pub mod ext;
pub mod status_code;
pub mod types;

pub use ext::*;
pub use status_code::*;
pub use types::*;
