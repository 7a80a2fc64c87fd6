use crate::config::AppConfig;
use crate::db;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config).await?;
        db::migrate(&db).await?;
        Ok(Self::from_parts(db, config))
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    /// Fresh migrated in-memory database, for tests.
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let db = db::connect_in_memory().await.expect("in-memory pool ok");
        db::migrate(&db).await.expect("migrations ok");
        Self::from_parts(db, Arc::new(test_config("sqlite::memory:".into(), 1)))
    }

    /// Migrated database file inside `dir`, behind a multi-connection pool
    /// like the one the server runs with.
    #[cfg(test)]
    pub async fn on_disk(dir: &tempfile::TempDir) -> Self {
        let url = format!("sqlite://{}", dir.path().join("contacts.db").display());
        let config = test_config(url, 5);
        let db = db::connect(&config).await.expect("file pool ok");
        db::migrate(&db).await.expect("migrations ok");
        Self::from_parts(db, Arc::new(config))
    }
}

#[cfg(test)]
fn test_config(database_url: String, max_connections: u32) -> AppConfig {
    use crate::config::JobConfig;

    AppConfig {
        database_url,
        max_connections,
        host: "127.0.0.1".into(),
        port: 0,
        job: JobConfig {
            enabled: false,
            ..JobConfig::default()
        },
    }
}
