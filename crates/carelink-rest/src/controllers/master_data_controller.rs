//! Master-data controller.
//!
//! Lists are public and served from the master-data cache. Maintenance
//! routes live under the superadmin area, which the gate restricts.

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
    Router,
};
use carelink_core::{
    CarelinkError, Location, LocationInput, MasterDataId, MasterList, NamedEntryInput, Service,
    Specialty,
};
use carelink_service::RefreshResponse;

/// Public read routes, nested under `/api/v1/master-data`.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/locations", get(list_locations))
        .route("/services", get(list_services))
        .route("/specialties", get(list_specialties))
}

/// Maintenance routes, nested under `/api/v1/superadmin/master-data`.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/locations", post(create_location))
        .route("/locations/:id", put(update_location).delete(delete_location))
        .route("/services", post(create_service))
        .route("/services/:id", put(update_service).delete(delete_service))
        .route("/specialties", post(create_specialty))
        .route(
            "/specialties/:id",
            put(update_specialty).delete(delete_specialty),
        )
        .route("/refresh/:list", post(refresh_list))
}

fn parse_id(raw: &str) -> Result<MasterDataId, AppError> {
    MasterDataId::parse(raw)
        .map_err(|_| AppError(CarelinkError::validation(format!("'{}' is not a valid id", raw))))
}

async fn list_locations(State(state): State<AppState>) -> ApiResult<Vec<Location>> {
    ok(state.master_data.locations().await)
}

async fn list_services(State(state): State<AppState>) -> ApiResult<Vec<Service>> {
    ok(state.master_data.services().await)
}

async fn list_specialties(State(state): State<AppState>) -> ApiResult<Vec<Specialty>> {
    ok(state.master_data.specialties().await)
}

async fn create_location(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LocationInput>,
) -> Result<impl IntoResponse, AppError> {
    let location = state.master_data.create_location(input).await?;
    Ok(created(location))
}

async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<LocationInput>,
) -> ApiResult<Location> {
    let location = state.master_data.update_location(parse_id(&id)?, input).await?;
    ok(location)
}

async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.master_data.delete_location(parse_id(&id)?).await?;
    Ok(no_content())
}

async fn create_service(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NamedEntryInput>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.master_data.create_service(input).await?;
    Ok(created(service))
}

async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<NamedEntryInput>,
) -> ApiResult<Service> {
    let service = state.master_data.update_service(parse_id(&id)?, input).await?;
    ok(service)
}

async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.master_data.delete_service(parse_id(&id)?).await?;
    Ok(no_content())
}

async fn create_specialty(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NamedEntryInput>,
) -> Result<impl IntoResponse, AppError> {
    let specialty = state.master_data.create_specialty(input).await?;
    Ok(created(specialty))
}

async fn update_specialty(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<NamedEntryInput>,
) -> ApiResult<Specialty> {
    let specialty = state
        .master_data
        .update_specialty(parse_id(&id)?, input)
        .await?;
    ok(specialty)
}

async fn delete_specialty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.master_data.delete_specialty(parse_id(&id)?).await?;
    Ok(no_content())
}

async fn refresh_list(
    State(state): State<AppState>,
    Path(list): Path<String>,
) -> ApiResult<RefreshResponse> {
    let kind = MasterList::from_str(&list)
        .ok_or_else(|| AppError(CarelinkError::not_found("master data list", &list)))?;

    state.master_data.refresh(kind).await;

    ok(RefreshResponse {
        list: kind.as_str().to_string(),
        message: format!("{} will be reloaded on next read", kind),
    })
}
