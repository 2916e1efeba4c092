use axum::{
    extract::State,
    routing::{delete, get, post, put},
    Router,
};
use tracing::instrument;

use super::{
    dto::{
        AuthResponse, DeleteAccountRequest, LoginRequest, MessageResponse, RegisterRequest,
        UpdateProfileRequest,
    },
    extractors::AuthUser,
    repo_types::User,
    services,
};
use crate::{
    error::{ApiJson, ApiSuccess, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(get_me))
        .route("/auth/profile", put(update_profile))
        .route("/auth/account", delete(delete_account))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> AppResult<ApiSuccess<AuthResponse>> {
    services::register(&state, payload)
        .await
        .map(ApiSuccess::created)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<ApiSuccess<AuthResponse>> {
    services::login(&state, payload).await.map(ApiSuccess::ok)
}

#[instrument(skip(state, auth), fields(user_id = %auth.id, username = %auth.username))]
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<ApiSuccess<User>> {
    services::me(&state, auth.id).await.map(ApiSuccess::ok)
}

#[instrument(skip(state, auth, payload), fields(user_id = %auth.id, username = %auth.username))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> AppResult<ApiSuccess<User>> {
    services::update_profile(&state, &auth, payload)
        .await
        .map(ApiSuccess::ok)
}

#[instrument(skip(state, auth, payload), fields(user_id = %auth.id, username = %auth.username))]
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<DeleteAccountRequest>,
) -> AppResult<ApiSuccess<MessageResponse>> {
    services::delete_account(&state, &auth, payload).await?;
    Ok(ApiSuccess::ok(MessageResponse {
        message: "Account deleted successfully".into(),
    }))
}
