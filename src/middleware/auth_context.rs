use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use log::warn;

use crate::error::ApiError;
use crate::middleware::auth::Claims;

/// The plan owner making the request. Only available on routes mounted
/// behind [`AuthMiddleware`](super::auth::AuthMiddleware), which leaves the
/// decoded [`Claims`] in the request extensions.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
}

impl From<&Claims> for AuthenticatedUser {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.user_id.clone(),
            email: claims.sub.clone(),
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let owner = req.extensions().get::<Claims>().map(AuthenticatedUser::from);
        ready(owner.ok_or_else(|| {
            warn!("No plan owner on request to {}", req.path());
            ApiError::Unauthorized
        }))
    }
}
