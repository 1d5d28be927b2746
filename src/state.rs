use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::repo::{PgSessionRepo, PgUserRepo, SessionRepo, UserRepo};
use crate::config::AppConfig;
use crate::moods::repo::{MoodRepo, PgMoodRepo};
use crate::resources::repo::{PgResourceRepo, ResourceRepo};
use crate::storage::{LocalStorage, StorageClient};
use crate::tasks::repo::{PgTaskRepo, TaskRepo};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub sessions: Arc<dyn SessionRepo>,
    pub tasks: Arc<dyn TaskRepo>,
    pub moods: Arc<dyn MoodRepo>,
    pub resources: Arc<dyn ResourceRepo>,
    pub storage: Arc<dyn StorageClient>,
}

impl AppState {
    /// Postgres-backed repositories sharing one pool, files under the uploads dir.
    pub fn from_pool(db: PgPool, config: Arc<AppConfig>) -> Self {
        let storage = Arc::new(LocalStorage::new(config.uploads.dir.clone()));
        Self {
            users: Arc::new(PgUserRepo::new(db.clone())),
            sessions: Arc::new(PgSessionRepo::new(db.clone())),
            tasks: Arc::new(PgTaskRepo::new(db.clone())),
            moods: Arc::new(PgMoodRepo::new(db.clone())),
            resources: Arc::new(PgResourceRepo::new(db)),
            storage,
            config,
        }
    }
}
