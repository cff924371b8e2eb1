use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::models::user::{RegisterRequest, RegisterResponse, SigninRequest, TokenResponse};
use crate::services::account_service;
use crate::AppState;

/*
    POST /auth/register
*/
pub async fn register(
    state: web::Data<AppState>,
    input: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = account_service::register(
        state.store.as_ref(),
        &state.config.auth,
        input.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user_id: user.id,
    }))
}

/*
    POST /auth/signin
*/
pub async fn signin(
    state: web::Data<AppState>,
    input: web::Json<SigninRequest>,
) -> Result<HttpResponse, ApiError> {
    let auth_token =
        account_service::signin(state.store.as_ref(), &state.config.auth, input.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(TokenResponse { auth_token }))
}
