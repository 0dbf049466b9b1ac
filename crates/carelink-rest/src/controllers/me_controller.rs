//! The caller's own session.

use crate::{
    extractors::CurrentProfile,
    responses::{ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use carelink_core::CarelinkError;
use carelink_service::SessionProfileResponse;

/// Routes nested under `/api/v1/me`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(current_session))
        .route("/sign-in", post(sign_in))
}

async fn current_session(profile: CurrentProfile) -> ApiResult<SessionProfileResponse> {
    ok(profile.0.into())
}

/// Drops whatever the cache held for the caller and answers from the row.
async fn sign_in(
    State(state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
) -> ApiResult<SessionProfileResponse> {
    state.profile_admin.record_sign_in(&profile.id).await?;

    let fresh = state
        .profile_cache
        .get_authorized_profile(&profile.id)
        .await
        .ok_or_else(|| AppError(CarelinkError::unauthorized("Profile no longer exists")))?;

    ok(fresh.into())
}
