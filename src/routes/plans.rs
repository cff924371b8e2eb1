use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::plan_request::CreatePlanRequest;
use crate::services::plan_service;
use crate::AppState;

const PLAN_NOT_FOUND: &str = "Travel plan not found";

/*
    POST /plans
*/
pub async fn create(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    input: web::Json<CreatePlanRequest>,
) -> Result<HttpResponse, ApiError> {
    let trip = input.into_inner().validate()?;
    let plan = state.generator.generate_plan(&user.user_id, trip).await?;
    Ok(HttpResponse::Created().json(plan))
}

/*
    GET /plans
*/
pub async fn list(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let plans = plan_service::list_owned(state.store.as_ref(), &user.user_id).await?;
    Ok(HttpResponse::Ok().json(plans))
}

/*
    GET /plans/{id}
*/
pub async fn get_by_id(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let plan_id = path.into_inner();
    match plan_service::get_owned(state.store.as_ref(), &plan_id, &user.user_id).await? {
        Some(plan) => Ok(HttpResponse::Ok().json(plan)),
        None => Err(ApiError::not_found(PLAN_NOT_FOUND)),
    }
}

/*
    POST /plans/{id}/share
*/
pub async fn share(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let plan_id = path.into_inner();
    let url = plan_service::activate_share(
        state.store.as_ref(),
        &state.config.public_base_url,
        &plan_id,
        &user.user_id,
    )
    .await?;

    match url {
        Some(url) => Ok(HttpResponse::Ok().json(json!({ "shareUrl": url.as_str() }))),
        None => Err(ApiError::not_found(PLAN_NOT_FOUND)),
    }
}
