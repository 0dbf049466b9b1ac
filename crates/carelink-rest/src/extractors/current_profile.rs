//! Profile resolved by the request gate.

use crate::responses::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use carelink_core::{CachedProfile, CarelinkError};

/// The caller's authorization profile.
///
/// Only present on requests the gate let through with a profile attached;
/// extraction fails with 401 otherwise.
#[derive(Debug, Clone)]
pub struct CurrentProfile(pub CachedProfile);

impl std::ops::Deref for CurrentProfile {
    type Target = CachedProfile;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentProfile
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| AppError(CarelinkError::unauthorized("No profile for this session")))
    }
}
