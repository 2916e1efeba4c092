use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use super::{jwt::TokenError, services};
use crate::{error::AppError, state::AppState};

/// Identity resolved from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthRejection {
    #[error("missing Authorization header")]
    MissingToken,
    #[error("Authorization header is not a bearer token")]
    MalformedHeader,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<AuthRejection> for AppError {
    fn from(r: AuthRejection) -> Self {
        match r {
            AuthRejection::MissingToken => {
                AppError::Unauthorized("Authentication token required".into())
            }
            AuthRejection::MalformedHeader => {
                AppError::Unauthorized("Invalid Authorization header".into())
            }
            AuthRejection::Token(_) => AppError::Unauthorized("Invalid or expired token".into()),
            AuthRejection::Internal(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(parts: &Parts) -> Result<&str, AuthRejection> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthRejection::MissingToken)?;
    let value = header
        .to_str()
        .map_err(|_| AuthRejection::MalformedHeader)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthRejection::MalformedHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthRejection::MalformedHeader);
    }
    Ok(token)
}

/// Gate for protected handlers: rejects with 401 unless the token verifies
/// and its subject still exists.
#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        services::authenticate(state, token).await
    }
}
