use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::repo_types::{GameChanges, SavedGame};

/// Saved games, always scoped to their owner.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        game_data: serde_json::Value,
    ) -> anyhow::Result<SavedGame>;

    /// Most recently updated first.
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<SavedGame>>;

    async fn find(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<SavedGame>>;

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: GameChanges,
    ) -> anyhow::Result<Option<SavedGame>>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgGameStore {
    db: PgPool,
}

impl PgGameStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GameStore for PgGameStore {
    async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        game_data: serde_json::Value,
    ) -> anyhow::Result<SavedGame> {
        let game = sqlx::query_as::<_, SavedGame>(
            r#"
            INSERT INTO saved_games (user_id, name, game_data)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, game_data, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(Json(game_data))
        .fetch_one(&self.db)
        .await
        .context("insert saved game")?;
        Ok(game)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<SavedGame>> {
        let rows = sqlx::query_as::<_, SavedGame>(
            r#"
            SELECT id, user_id, name, game_data, created_at, updated_at
            FROM saved_games
            WHERE user_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list saved games")?;
        Ok(rows)
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<SavedGame>> {
        let game = sqlx::query_as::<_, SavedGame>(
            r#"
            SELECT id, user_id, name, game_data, created_at, updated_at
            FROM saved_games
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("select saved game")?;
        Ok(game)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: GameChanges,
    ) -> anyhow::Result<Option<SavedGame>> {
        let game = sqlx::query_as::<_, SavedGame>(
            r#"
            UPDATE saved_games
            SET name = COALESCE($3, name),
                game_data = COALESCE($4, game_data),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, game_data, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(changes.name)
        .bind(changes.game_data.map(Json))
        .fetch_optional(&self.db)
        .await
        .context("update saved game")?;
        Ok(game)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM saved_games WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete saved game")?;
        Ok(res.rows_affected() > 0)
    }
}
