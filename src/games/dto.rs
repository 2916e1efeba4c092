use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveGameRequest {
    pub name: Option<String>,
    pub game_data: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateGameRequest {
    pub name: Option<String>,
    pub game_data: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenameGameRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedGame {
    pub id: Uuid,
}
