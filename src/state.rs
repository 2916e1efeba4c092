use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{
    jwt::JwtKeys,
    repo::{PgUserStore, UserStore},
};
use crate::config::AppConfig;
use crate::games::repo::{GameStore, PgGameStore};

/// Handles shared by every request. Built once at startup and injected.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub games: Arc<dyn GameStore>,
    pub jwt: JwtKeys,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn from_pool(db: PgPool, config: Arc<AppConfig>) -> Self {
        Self::from_parts(
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgGameStore::new(db)),
            config,
        )
    }

    pub fn from_parts(
        users: Arc<dyn UserStore>,
        games: Arc<dyn GameStore>,
        config: Arc<AppConfig>,
    ) -> Self {
        let jwt = JwtKeys::from(&config.jwt);
        Self {
            users,
            games,
            jwt,
            config,
        }
    }
}
