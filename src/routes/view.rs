use actix_web::{http::header::ContentType, web, HttpResponse};
use chrono::Utc;

use crate::error::ApiError;
use crate::routes::shared::SHARED_NOT_FOUND;
use crate::services::plan_service;
use crate::AppState;

/*
    GET /shared/{id}/view (public HTML page)
*/
pub async fn shared_page(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let plan_id = path.into_inner();
    let plan = plan_service::get_shared(state.store.as_ref(), &plan_id)
        .await?
        .ok_or_else(|| ApiError::not_found(SHARED_NOT_FOUND))?;

    let html = state
        .pages
        .render_plan(&plan, Utc::now().date_naive())
        .map_err(|err| ApiError::internal("Failed to render travel plan", err))?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(html))
}
