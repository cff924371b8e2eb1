use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::{info, warn};
use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::db::store::{Store, StoreError};
use crate::middleware::auth::Claims;
use crate::models::user::{RegisterRequest, SigninRequest, User};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("User already exists")]
    AlreadyExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("token generation failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => AccountError::AlreadyExists,
            other => AccountError::Store(other),
        }
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
        )
        .expect("email pattern compiles")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
}

fn non_blank(password: Option<String>) -> Option<String> {
    password.filter(|p| !p.trim().is_empty())
}

pub async fn register(
    store: &dyn Store,
    auth: &AuthConfig,
    input: RegisterRequest,
) -> Result<User, AccountError> {
    let (email, password) = match (normalize_email(input.email), non_blank(input.password)) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(AccountError::MissingCredentials),
    };
    if !is_valid_email(&email) {
        return Err(AccountError::InvalidEmail);
    }
    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AccountError::AlreadyExists);
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        email,
        password_hash: bcrypt::hash(password, auth.bcrypt_cost)?,
        name: input
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        created_at: Utc::now(),
    };
    store.insert_user(&user).await?;
    info!("Registered user {}", user.id);
    Ok(user)
}

/// Verifies credentials and returns a bearer token. Unknown emails and wrong
/// passwords fail the same way.
pub async fn signin(
    store: &dyn Store,
    auth: &AuthConfig,
    input: SigninRequest,
) -> Result<String, AccountError> {
    let (email, password) = match (normalize_email(input.email), non_blank(input.password)) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(AccountError::MissingCredentials),
    };

    let user = match store.find_user_by_email(&email).await? {
        Some(user) => user,
        None => {
            warn!("Sign-in attempt for unknown account");
            return Err(AccountError::InvalidCredentials);
        }
    };

    if !bcrypt::verify(&password, &user.password_hash).unwrap_or(false) {
        warn!("Failed sign-in for user {}", user.id);
        return Err(AccountError::InvalidCredentials);
    }

    Ok(issue_token(auth, &user, Utc::now())?)
}

pub fn issue_token(
    auth: &AuthConfig,
    user: &User,
    now: DateTime<Utc>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user.email.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(auth.token_ttl_hours)).timestamp() as usize,
        user_id: user.id.clone(),
    };

    let header = Header::new(Algorithm::HS256);
    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
}
