use axum::{
    extract::State,
    routing::{get, put},
    Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{DeletedGame, RenameGameRequest, SaveGameRequest, UpdateGameRequest},
    repo_types::SavedGame,
    services,
};
use crate::{
    auth::AuthUser,
    error::{ApiJson, ApiPath, ApiSuccess, AppResult},
    state::AppState,
};

pub fn game_routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(list_games).post(save_game))
        .route(
            "/games/:id",
            get(get_game).put(update_game).delete(delete_game),
        )
        .route("/games/:id/rename", put(rename_game))
}

#[instrument(skip(state, auth, body), fields(user_id = %auth.id))]
pub async fn save_game(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<SaveGameRequest>,
) -> AppResult<ApiSuccess<SavedGame>> {
    services::save(&state, auth.id, body)
        .await
        .map(ApiSuccess::created)
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn list_games(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<ApiSuccess<Vec<SavedGame>>> {
    services::list(&state, auth.id).await.map(ApiSuccess::ok)
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn get_game(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<ApiSuccess<SavedGame>> {
    services::get(&state, auth.id, id).await.map(ApiSuccess::ok)
}

#[instrument(skip(state, auth, body), fields(user_id = %auth.id))]
pub async fn update_game(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateGameRequest>,
) -> AppResult<ApiSuccess<SavedGame>> {
    services::update(&state, auth.id, id, body)
        .await
        .map(ApiSuccess::ok)
}

#[instrument(skip(state, auth, body), fields(user_id = %auth.id))]
pub async fn rename_game(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<RenameGameRequest>,
) -> AppResult<ApiSuccess<SavedGame>> {
    services::rename(&state, auth.id, id, body.name)
        .await
        .map(ApiSuccess::ok)
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn delete_game(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<ApiSuccess<DeletedGame>> {
    services::delete(&state, auth.id, id).await?;
    Ok(ApiSuccess::ok(DeletedGame { id }))
}
