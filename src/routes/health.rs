use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde::Serialize;
use std::collections::HashMap;

use crate::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

impl ServiceStatus {
    fn ok(details: String) -> Self {
        Self {
            status: "ok".to_string(),
            details: Some(details),
        }
    }

    fn error(details: String) -> Self {
        Self {
            status: "error".to_string(),
            details: Some(details),
        }
    }
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let database = check_database(&state).await;
    let text_generation = check_text_generation(&state);

    let degraded = database.status != "ok" || text_generation.status != "ok";

    let mut services = HashMap::new();
    services.insert("database".to_string(), database);
    services.insert("text_generation".to_string(), text_generation);

    HttpResponse::Ok().json(HealthStatus {
        status: if degraded { "degraded" } else { "ok" }.to_string(),
        services,
        environment: state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn check_database(state: &AppState) -> ServiceStatus {
    match state.store.ping().await {
        Ok(_) => ServiceStatus::ok("Connected successfully to the database".to_string()),
        Err(e) => {
            error!("Database health check failed: {}", e);
            ServiceStatus::error("Failed to reach the database".to_string())
        }
    }
}

fn check_text_generation(state: &AppState) -> ServiceStatus {
    if !state.generator.text_generator().is_configured() {
        return ServiceStatus::error("OPENAI_API_KEY not configured".to_string());
    }

    let generation = &state.config.generation;
    match generation.api_key.as_deref() {
        Some(key) => ServiceStatus::ok(format!(
            "API key configured ({}), model {}",
            mask_secret(key),
            generation.model
        )),
        None => ServiceStatus::ok("Text generator configured".to_string()),
    }
}

/// Keeps the first and last four characters of long secrets.
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}***{}", head, tail)
    } else {
        "***".to_string()
    }
}
