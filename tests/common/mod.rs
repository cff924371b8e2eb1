#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::{http::header, web, App};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use trip_planner_api::config::AppConfig;
use trip_planner_api::db::memory::MemoryStore;
use trip_planner_api::db::store::{ResetSummary, Store, StoreError};
use trip_planner_api::models::plan_request::CreatePlanRequest;
use trip_planner_api::models::travel_plan::TravelPlan;
use trip_planner_api::models::user::User;
use trip_planner_api::services::account_service::issue_token;
use trip_planner_api::services::openai_service::{
    CompletionRequest, GenerationError, TextGenerator,
};
use trip_planner_api::AppState;

pub const JWT_SECRET: &str = "integration-test-secret";

/// Canned text generator that records every request it receives.
pub struct StubGenerator {
    reply: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubGenerator {
    pub fn replying(reply: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request);
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(GenerationError::Api {
                status: 503,
                message: "model overloaded".to_string(),
            }),
        }
    }
}

/// Memory store whose plan inserts always fail. Everything else is delegated.
pub struct FailingInsertStore {
    inner: Arc<MemoryStore>,
}

pub const INSERT_FAILURE_DETAIL: &str = "plans index rejected write on shard-7";

#[async_trait]
impl Store for FailingInsertStore {
    async fn insert_plan(&self, _plan: &TravelPlan) -> Result<(), StoreError> {
        Err(StoreError::Duplicate(INSERT_FAILURE_DETAIL.to_string()))
    }

    async fn find_plan_for_owner(
        &self,
        id: &str,
        owner_id: &str,
    ) -> Result<Option<TravelPlan>, StoreError> {
        self.inner.find_plan_for_owner(id, owner_id).await
    }

    async fn list_plans_for_owner(&self, owner_id: &str) -> Result<Vec<TravelPlan>, StoreError> {
        self.inner.list_plans_for_owner(owner_id).await
    }

    async fn find_shared_plan(&self, id: &str) -> Result<Option<TravelPlan>, StoreError> {
        self.inner.find_shared_plan(id).await
    }

    async fn mark_plan_shared(&self, id: &str, owner_id: &str) -> Result<bool, StoreError> {
        self.inner.mark_plan_shared(id, owner_id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.inner.find_user_by_email(email).await
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.inner.insert_user(user).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }

    async fn reset(&self) -> Result<ResetSummary, StoreError> {
        self.inner.reset().await
    }
}

pub fn attraction(name: &str, lat: f64, lng: f64, visit_time: &str) -> Value {
    json!({
        "name": name,
        "description": format!("A visit to {}", name),
        "latitude": lat,
        "longitude": lng,
        "visitTime": visit_time,
        "duration": "1 hour"
    })
}

/// Six Tokyo stops split across `day1` and `day2`.
pub fn tokyo_response() -> String {
    json!({
        "day1": { "attractions": [
            attraction("Senso-ji", 35.7148, 139.7967, "Day 1, 09:00"),
            attraction("Tokyo Skytree", 35.7101, 139.8107, "Day 1, 11:00"),
            attraction("Ueno Park", 35.7156, 139.7745, "Day 1, 14:00")
        ]},
        "day2": { "attractions": [
            attraction("Meiji Jingu", 35.6764, 139.6993, "Day 2, 09:00"),
            attraction("Shibuya Crossing", 35.6595, 139.7005, "Day 2, 12:00"),
            attraction("Tokyo Tower", 35.6586, 139.7454, "Day 2, 16:00")
        ]}
    })
    .to_string()
}

pub fn tokyo_request() -> Value {
    json!({
        "destination": "Tokyo",
        "startDate": "2024-05-01",
        "endDate": "2024-05-03",
        "mode": "balanced",
        "preferences": ["food", "history"]
    })
}

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub store: Arc<MemoryStore>,
    pub generator: Arc<StubGenerator>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_generator(StubGenerator::replying(tokyo_response()))
    }

    pub fn with_generator(generator: Arc<StubGenerator>) -> Self {
        Self::with_env(&[], generator)
    }

    /// Extra settings on top of the in-memory test defaults.
    pub fn with_env(pairs: &[(&str, &str)], generator: Arc<StubGenerator>) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::build(pairs, generator, store.clone(), store)
    }

    /// Plan inserts fail; `store` still exposes the untouched memory store.
    pub fn with_failing_inserts() -> Self {
        let store = Arc::new(MemoryStore::new());
        let failing = Arc::new(FailingInsertStore {
            inner: store.clone(),
        });
        Self::build(&[], StubGenerator::replying(tokyo_response()), store, failing)
    }

    fn build(
        pairs: &[(&str, &str)],
        generator: Arc<StubGenerator>,
        store: Arc<MemoryStore>,
        backend: Arc<dyn Store>,
    ) -> Self {
        let mut env: HashMap<String, String> = HashMap::from([
            ("DATABASE_BACKEND".to_string(), "memory".to_string()),
            ("JWT_SECRET".to_string(), JWT_SECRET.to_string()),
            ("BCRYPT_COST".to_string(), "4".to_string()),
        ]);
        for (key, value) in pairs {
            env.insert(key.to_string(), value.to_string());
        }
        let config = AppConfig::from_lookup(|key| env.get(key).cloned())
            .expect("test configuration is valid");

        let state = AppState::new(config, backend, generator.clone())
            .expect("page templates compile");

        Self {
            state: web::Data::new(state),
            store,
            generator,
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .configure(trip_planner_api::configure)
    }

    /// Generates and stores the Tokyo plan for `owner_id` without going
    /// through HTTP. Returns the plan id.
    pub async fn seed_plan(&self, owner_id: &str) -> String {
        let request: CreatePlanRequest =
            serde_json::from_value(tokyo_request()).expect("request deserializes");
        let trip = request.validate().expect("request is valid");
        self.state
            .generator
            .generate_plan(owner_id, trip)
            .await
            .expect("plan is generated")
            .id
    }

    pub fn token_for(&self, user_id: &str) -> String {
        let user = User {
            id: user_id.to_string(),
            email: format!("{}@example.com", user_id),
            password_hash: String::new(),
            name: None,
            created_at: Utc::now(),
        };
        issue_token(&self.state.config.auth, &user, Utc::now()).expect("token encodes")
    }
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}
