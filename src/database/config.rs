//! Process-wide knobs for the two cores, following a validate-then-apply
//! pattern scaled down to the handful of fields this crate actually has.

use super::{
    dict::{self},
    quicklist::{self, CompressDepth, FillPolicy},
};

/// Snapshot of the two cores' global defaults, for callers that want to
/// configure them from one place (e.g. at process startup) instead of
/// calling the per-module setters directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub resize_enabled: bool,
    pub default_fill: FillPolicy,
    pub default_compress: CompressDepth,
    pub plain_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resize_enabled: true,
            default_fill: FillPolicy::Count(128),
            default_compress: CompressDepth(0),
            plain_threshold: 1024,
        }
    }
}

impl Config {
    /// Pushes this configuration's values into the process-wide atomics
    /// in [`dict`] and [`quicklist`]. `default_fill`/`default_compress`
    /// are not global state — they're returned for the caller to pass
    /// into each [`quicklist::QuickList::new`] call — but are kept here
    /// so one `Config` value describes a whole deployment's defaults.
    pub fn apply(&self) {
        dict::set_resize_policy(self.resize_enabled);
        quicklist::set_plain_threshold(self.plain_threshold);
    }
}
