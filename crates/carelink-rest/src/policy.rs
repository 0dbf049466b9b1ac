//! Route decisions of the request gate.
//!
//! Pure: given the request path and whatever profile the caller resolved
//! to, say whether the request proceeds, is redirected, or is refused.
//! Browser paths get redirects; `/api/` paths get status codes.

use axum::http::StatusCode;
use carelink_core::{ApprovalStatus, CachedProfile, ProfileRole};

pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";
pub const PENDING_PATH: &str = "/pending-approval";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
pub const SIGN_IN_PATH: &str = "/api/v1/me/sign-in";

/// Which part of the site a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Sign-in and sign-up pages.
    Entry,
    /// Where pending users wait for approval.
    Waiting,
    /// Hospital-admin dashboards.
    Admin,
    /// Superadmin back office.
    SuperAdmin,
    /// Anything any signed-in user with an approved profile may see.
    Authenticated,
    /// Needs a profile row in any status.
    SignIn,
    Public,
}

impl PathClass {
    #[must_use]
    pub fn classify(path: &str) -> Self {
        if path == LOGIN_PATH || path == SIGNUP_PATH {
            Self::Entry
        } else if path == PENDING_PATH {
            Self::Waiting
        } else if under(path, "/admin") || under(path, "/api/v1/admin") {
            Self::Admin
        } else if under(path, "/superadmin") || under(path, "/api/v1/superadmin") {
            Self::SuperAdmin
        } else if path == SIGN_IN_PATH {
            Self::SignIn
        } else if under(path, "/api/v1/me") {
            Self::Authenticated
        } else {
            Self::Public
        }
    }

    #[must_use]
    pub const fn is_privileged(self) -> bool {
        matches!(
            self,
            Self::Admin | Self::SuperAdmin | Self::Authenticated | Self::SignIn
        )
    }

    const fn admits(self, role: ProfileRole) -> bool {
        match self {
            Self::Admin => matches!(role, ProfileRole::Admin),
            Self::SuperAdmin => matches!(role, ProfileRole::SuperAdmin),
            _ => true,
        }
    }
}

fn under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn is_api(path: &str) -> bool {
    path.starts_with("/api/")
}

/// Outcome of the gate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Continue,
    Redirect(&'static str),
    Reject {
        status: StatusCode,
        reason: &'static str,
    },
}

impl GateDecision {
    fn refuse(path: &str, redirect_to: &'static str, status: StatusCode, reason: &'static str) -> Self {
        if is_api(path) {
            Self::Reject { status, reason }
        } else {
            Self::Redirect(redirect_to)
        }
    }
}

/// Decides what happens to a request for `path`.
#[must_use]
pub fn decide(path: &str, profile: Option<&CachedProfile>) -> GateDecision {
    let class = PathClass::classify(path);

    match class {
        PathClass::Entry => match profile {
            Some(profile) => GateDecision::Redirect(profile.role.home_path()),
            None => GateDecision::Continue,
        },
        PathClass::Waiting => match profile {
            Some(profile) if profile.is_approved() => {
                GateDecision::Redirect(profile.role.home_path())
            }
            _ => GateDecision::Continue,
        },
        PathClass::Public => GateDecision::Continue,
        PathClass::SignIn => match profile {
            Some(_) => GateDecision::Continue,
            None => GateDecision::refuse(
                path,
                LOGIN_PATH,
                StatusCode::UNAUTHORIZED,
                "Authentication required",
            ),
        },
        PathClass::Admin | PathClass::SuperAdmin | PathClass::Authenticated => {
            let Some(profile) = profile else {
                return GateDecision::refuse(
                    path,
                    LOGIN_PATH,
                    StatusCode::UNAUTHORIZED,
                    "Authentication required",
                );
            };

            match profile.status {
                ApprovalStatus::Pending => GateDecision::refuse(
                    path,
                    PENDING_PATH,
                    StatusCode::FORBIDDEN,
                    "Profile is pending approval",
                ),
                ApprovalStatus::Rejected => GateDecision::refuse(
                    path,
                    UNAUTHORIZED_PATH,
                    StatusCode::FORBIDDEN,
                    "Profile was rejected",
                ),
                ApprovalStatus::Approved if !class.admits(profile.role) => GateDecision::refuse(
                    path,
                    UNAUTHORIZED_PATH,
                    StatusCode::FORBIDDEN,
                    "Role does not permit this area",
                ),
                ApprovalStatus::Approved => GateDecision::Continue,
            }
        }
    }
}
