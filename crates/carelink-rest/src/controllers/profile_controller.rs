//! Profile approval controller.
//!
//! Superadmin-only; the gate keeps everyone else out of this tree.

use crate::{
    extractors::ValidatedJson,
    responses::{created, no_content, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use carelink_core::{NewProfile, ProfileId};
use carelink_service::{
    ApproveProfileRequest, AssignHospitalRequest, ChangeStatusRequest, ProfileResponse,
};

/// Routes nested under `/api/v1/superadmin/profiles`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(provision_profile))
        .route("/pending", get(list_pending))
        .route("/:id", axum::routing::delete(purge_profile))
        .route("/:id/approve", post(approve_profile))
        .route("/:id/reject", post(reject_profile))
        .route("/:id/status", put(change_status))
        .route("/:id/hospital", put(assign_hospital))
}

async fn list_pending(State(state): State<AppState>) -> ApiResult<Vec<ProfileResponse>> {
    let pending = state.profile_admin.list_pending().await?;
    ok(pending.into_iter().map(ProfileResponse::from).collect())
}

async fn provision_profile(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<NewProfile>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.profile_admin.provision_profile(request).await?;
    Ok(created(ProfileResponse::from(profile)))
}

async fn approve_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<ApproveProfileRequest>>,
) -> ApiResult<ProfileResponse> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let profile = state
        .profile_admin
        .approve_profile(&ProfileId::new(id), request)
        .await?;
    ok(profile.into())
}

async fn reject_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ProfileResponse> {
    let profile = state.profile_admin.reject_profile(&ProfileId::new(id)).await?;
    ok(profile.into())
}

async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ChangeStatusRequest>,
) -> ApiResult<ProfileResponse> {
    let profile = state
        .profile_admin
        .change_status(&ProfileId::new(id), request)
        .await?;
    ok(profile.into())
}

async fn assign_hospital(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<AssignHospitalRequest>,
) -> ApiResult<ProfileResponse> {
    let profile = state
        .profile_admin
        .assign_hospital(&ProfileId::new(id), request)
        .await?;
    ok(profile.into())
}

async fn purge_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.profile_admin.purge_profile(&ProfileId::new(id)).await?;
    Ok(no_content())
}
