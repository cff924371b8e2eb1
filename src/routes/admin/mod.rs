use actix_web::{web, HttpResponse};
use log::warn;

use crate::error::ApiError;
use crate::middleware::auth::AuthMiddleware;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AuthMiddleware)
            .route("/reset", web::post().to(reset)),
    );
}

/*
    POST /admin/reset
    Deletes every plan and account. Refused in production unless
    ALLOW_DB_RESET=true.
*/
pub async fn reset(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    if !state.config.reset_allowed() {
        warn!("Refused database reset requested by {}", user.user_id);
        return Err(ApiError::Forbidden(
            "Database reset is disabled in production".to_string(),
        ));
    }

    let summary = state.store.reset().await?;
    warn!(
        "Database reset by {}: {} plans, {} users deleted",
        user.user_id, summary.plans_deleted, summary.users_deleted
    );
    Ok(HttpResponse::Ok().json(summary))
}
