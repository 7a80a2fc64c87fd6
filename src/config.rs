use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub enabled: bool,
    pub interval_secs: u64,
    pub delete_delay_secs: u64,
}

impl JobConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn delete_delay(&self) -> Duration {
        Duration::from_secs(self.delete_delay_secs)
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 15,
            delete_delay_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub job: JobConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = JobConfig::default();
        let job = JobConfig {
            enabled: env_parse("JOB_ENABLED").unwrap_or(defaults.enabled),
            interval_secs: env_parse("JOB_INTERVAL_SECS").unwrap_or(defaults.interval_secs),
            delete_delay_secs: env_parse("JOB_DELETE_DELAY_SECS")
                .unwrap_or(defaults.delete_delay_secs),
        };
        anyhow::ensure!(job.interval_secs > 0, "JOB_INTERVAL_SECS must be positive");

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://contacts.db?mode=rwc".into()),
            max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(5),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parse("APP_PORT").unwrap_or(8080),
            job,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}
