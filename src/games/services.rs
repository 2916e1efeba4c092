use tracing::info;
use uuid::Uuid;

use super::{
    dto::{SaveGameRequest, UpdateGameRequest},
    repo_types::{GameChanges, SavedGame},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub const NAME_MAX: usize = 100;

fn game_not_found() -> AppError {
    AppError::NotFound("Game not found or not owned by user".into())
}

fn validate_name(name: Option<String>, missing: &str) -> AppResult<String> {
    let name = name.map(|n| n.trim().to_owned()).unwrap_or_default();
    if name.is_empty() {
        return Err(AppError::Validation(missing.into()));
    }
    if name.chars().count() > NAME_MAX {
        return Err(AppError::Validation("Game name too long".into()));
    }
    Ok(name)
}

fn validate_game_data(data: serde_json::Value) -> AppResult<serde_json::Value> {
    if !data.is_object() {
        return Err(AppError::Validation("Invalid game data format".into()));
    }
    Ok(data)
}

pub async fn save(state: &AppState, user_id: Uuid, req: SaveGameRequest) -> AppResult<SavedGame> {
    let name = validate_name(req.name, "Name and game data are required")?;
    let data = req
        .game_data
        .ok_or_else(|| AppError::Validation("Name and game data are required".into()))
        .and_then(validate_game_data)?;

    let game = state.games.create(user_id, &name, data).await?;
    info!(%user_id, game_id = %game.id, "game saved");
    Ok(game)
}

pub async fn list(state: &AppState, user_id: Uuid) -> AppResult<Vec<SavedGame>> {
    Ok(state.games.list_by_user(user_id).await?)
}

pub async fn get(state: &AppState, user_id: Uuid, id: Uuid) -> AppResult<SavedGame> {
    state
        .games
        .find(user_id, id)
        .await?
        .ok_or_else(game_not_found)
}

pub async fn update(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    req: UpdateGameRequest,
) -> AppResult<SavedGame> {
    let changes = GameChanges {
        name: req
            .name
            .map(|n| validate_name(Some(n), "Game name is required"))
            .transpose()?,
        game_data: req.game_data.map(validate_game_data).transpose()?,
    };
    if changes.is_empty() {
        return Err(AppError::Validation("No changes provided".into()));
    }
    apply(state, user_id, id, changes).await
}

pub async fn rename(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    name: Option<String>,
) -> AppResult<SavedGame> {
    let name = validate_name(name, "New name is required")?;
    apply(
        state,
        user_id,
        id,
        GameChanges {
            name: Some(name),
            game_data: None,
        },
    )
    .await
}

async fn apply(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    changes: GameChanges,
) -> AppResult<SavedGame> {
    let game = state
        .games
        .update(user_id, id, changes)
        .await?
        .ok_or_else(game_not_found)?;
    info!(%user_id, game_id = %game.id, "game updated");
    Ok(game)
}

pub async fn delete(state: &AppState, user_id: Uuid, id: Uuid) -> AppResult<()> {
    if !state.games.delete(user_id, id).await? {
        return Err(game_not_found());
    }
    info!(%user_id, game_id = %id, "game deleted");
    Ok(())
}
