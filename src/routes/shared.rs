use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::services::plan_service;
use crate::AppState;

pub(crate) const SHARED_NOT_FOUND: &str = "Shared travel plan not found";

/*
    GET /shared/{id} (public)
*/
pub async fn get_by_id(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let plan_id = path.into_inner();
    match plan_service::get_shared(state.store.as_ref(), &plan_id).await? {
        Some(plan) => Ok(HttpResponse::Ok().json(plan)),
        None => Err(ApiError::not_found(SHARED_NOT_FOUND)),
    }
}
