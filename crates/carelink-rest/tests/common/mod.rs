//! In-process application for HTTP tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use carelink_config::{CacheConfig, SecurityConfig, ServerConfig};
use carelink_core::{
    ApprovalStatus, HospitalId, Location, MasterDataId, Profile, ProfileId, ProfileRole, Service,
    Specialty,
};
use carelink_repository::memory::{InMemoryMasterDataRepository, InMemoryProfileRepository};
use carelink_rest::middleware::GateState;
use carelink_rest::{build_router, AppState};
use carelink_security::{TokenProvider, TokenProviderInterface};
use carelink_service::{
    CacheHealth, CacheInterface, InMemoryCache, MasterDataCacheComponent,
    MasterDataServiceComponent, ProfileAdminServiceComponent, ProfileCacheComponent,
    TaskSupervisor,
};
use chrono::Utc;
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub cache: Arc<InMemoryCache>,
    pub profiles: Arc<InMemoryProfileRepository>,
    pub tasks: Arc<TaskSupervisor>,
    pub tokens: Arc<TokenProvider>,
    pub cookie_name: String,
}

pub fn profile(id: &str, role: ProfileRole, status: ApprovalStatus, hospital: Option<&str>) -> Profile {
    let now = Utc::now();
    Profile {
        id: ProfileId::new(id),
        email: format!("{id}@carelink.test"),
        full_name: Some(format!("User {id}")),
        role,
        status,
        hospital_id: hospital.map(HospitalId::new),
        created_at: now,
        updated_at: now,
    }
}

pub fn default_profiles() -> Vec<Profile> {
    vec![
        profile("root", ProfileRole::SuperAdmin, ApprovalStatus::Approved, None),
        profile("admin", ProfileRole::Admin, ApprovalStatus::Approved, Some("h1")),
        profile("waiting", ProfileRole::Admin, ApprovalStatus::Pending, Some("h2")),
        profile("blocked", ProfileRole::Admin, ApprovalStatus::Rejected, Some("h3")),
        profile("member", ProfileRole::None, ApprovalStatus::Approved, None),
    ]
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_profiles(default_profiles())
    }

    pub fn with_profiles(rows: Vec<Profile>) -> Self {
        let cache = Arc::new(InMemoryCache::new());
        let profiles = Arc::new(InMemoryProfileRepository::with_profiles(rows));
        let master_data = Arc::new(InMemoryMasterDataRepository::seeded(
            [Location {
                id: MasterDataId::new(),
                city: "Pune".to_string(),
                state: "Maharashtra".to_string(),
            }],
            [Service {
                id: MasterDataId::new(),
                name: "Radiology".to_string(),
                description: None,
            }],
            [Specialty {
                id: MasterDataId::new(),
                name: "Cardiology".to_string(),
                description: Some("Heart care".to_string()),
            }],
        ));
        let tasks = Arc::new(TaskSupervisor::new());
        let settings = CacheConfig::default();
        let security = Arc::new(SecurityConfig::default());
        let tokens = Arc::new(TokenProvider::new(security.clone()));

        let profile_cache = Arc::new(ProfileCacheComponent::new(
            cache.clone(),
            profiles.clone(),
            tasks.clone(),
            settings.clone(),
        ));
        let lists = Arc::new(MasterDataCacheComponent::new(
            cache.clone(),
            master_data.clone(),
            tasks.clone(),
            settings,
        ));

        let state = AppState::new(
            profile_cache.clone(),
            Arc::new(ProfileAdminServiceComponent::new(
                profiles.clone(),
                profile_cache.clone(),
            )),
            Arc::new(MasterDataServiceComponent::new(master_data, lists)),
        )
        .with_health_check(Arc::new(CacheHealth::new(
            cache.clone() as Arc<dyn CacheInterface>,
            Duration::from_millis(500),
        )));

        let gate = GateState::new(
            tokens.clone(),
            profile_cache,
            security.session_cookie_name.as_str(),
        );

        Self {
            router: build_router(state, gate, &ServerConfig::default()),
            cache,
            profiles,
            tasks,
            tokens,
            cookie_name: security.session_cookie_name.clone(),
        }
    }

    pub fn token_for(&self, id: &str) -> String {
        self.tokens.issue_access_token(&ProfileId::new(id)).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get_as(&self, uri: &str, who: Option<&str>) -> Response<Body> {
        self.send(request("GET", uri, who.map(|id| self.token_for(id)), None))
            .await
    }

    pub async fn send_as(
        &self,
        method: &str,
        uri: &str,
        who: &str,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        self.send(request(method, uri, Some(self.token_for(who)), body))
            .await
    }
}

pub fn request(
    method: &str,
    uri: &str,
    bearer: Option<String>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location_of(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
