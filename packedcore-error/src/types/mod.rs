pub mod dict;
pub mod quicklist;

pub use dict::*;
pub use quicklist::*;
