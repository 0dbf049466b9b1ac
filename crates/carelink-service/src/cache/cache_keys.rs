//! Cache key generators for consistent key naming.

use carelink_core::{MasterList, ProfileId};

/// Key of a cached authorization profile.
#[must_use]
pub fn profile(id: &ProfileId) -> String {
    format!("profile:{}", id)
}

/// Key of a cached master list under the given version prefix.
#[must_use]
pub fn master_list(version: &str, kind: MasterList) -> String {
    format!("{}:{}", version, kind.as_str())
}
