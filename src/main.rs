use std::net::SocketAddr;

use contactmail::{app, jobs::SyntheticContactJob, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "contactmail=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init().await?;

    let job = if app_state.config.job.enabled {
        Some(SyntheticContactJob::new(app_state.db.clone(), &app_state.config.job).spawn())
    } else {
        tracing::info!("synthetic contact job disabled");
        None
    };

    let addr: SocketAddr =
        format!("{}:{}", app_state.config.host, app_state.config.port).parse()?;
    let result = app::serve(app::build_app(app_state), addr).await;

    if let Some(job) = job {
        job.shutdown().await;
    }
    result
}
