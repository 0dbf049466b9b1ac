//! Profile role value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role attached to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProfileRole {
    /// Signed-up identity without a privileged role.
    #[default]
    None,
    /// Hospital administrator, scoped to one hospital.
    Admin,
    /// Network-wide back-office operator.
    SuperAdmin,
}

impl ProfileRole {
    /// Returns the lowercase wire and storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Admin => "admin",
            Self::SuperAdmin => "superadmin",
        }
    }

    /// Returns the landing path for this role.
    #[must_use]
    pub const fn home_path(&self) -> &'static str {
        match self {
            Self::None => "/",
            Self::Admin => "/admin",
            Self::SuperAdmin => "/superadmin",
        }
    }

    /// Parses a role from a string.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "" => Some(Self::None),
            "admin" | "hospital_admin" => Some(Self::Admin),
            "superadmin" | "super_admin" => Some(Self::SuperAdmin),
            _ => None,
        }
    }
}

impl fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
