use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    emails::{
        dto::{EmailResponse, SendEmailRequest},
        services,
    },
    error::AppResult,
    state::AppState,
};

pub fn email_routes() -> Router<AppState> {
    Router::new()
        .route("/contact/:username/email", get(get_emails).post(send_email))
        .route(
            "/contact/:username/email/:email_id",
            get(get_email).delete(delete_email),
        )
}

#[instrument(skip(state, payload))]
pub async fn send_email(
    State(state): State<AppState>,
    Path(username): Path<String>,
    payload: Result<Json<SendEmailRequest>, JsonRejection>,
) -> AppResult<Json<EmailResponse>> {
    let Json(payload) = payload?;
    let email = services::send_email(&state.db, &username, payload)
        .await
        .map_err(|e| {
            warn!(error = %e, %username, "send email failed");
            e
        })?;
    info!(
        email_id = email.email_id,
        from = %email.from_email,
        to = %email.to_email,
        "email sent"
    );
    Ok(Json(email))
}

#[instrument(skip(state))]
pub async fn get_emails(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<Vec<EmailResponse>>> {
    let emails = services::list_emails(&state.db, &username).await?;
    Ok(Json(emails))
}

#[instrument(skip(state, path))]
pub async fn get_email(
    State(state): State<AppState>,
    path: Result<Path<(String, i64)>, PathRejection>,
) -> AppResult<Json<EmailResponse>> {
    let Path((username, email_id)) = path?;
    let email = services::get_email(&state.db, &username, email_id).await?;
    Ok(Json(email))
}

#[instrument(skip(state, path))]
pub async fn delete_email(
    State(state): State<AppState>,
    path: Result<Path<(String, i64)>, PathRejection>,
) -> AppResult<Json<EmailResponse>> {
    let Path((username, email_id)) = path?;
    let email = services::delete_email(&state.db, &username, email_id)
        .await
        .map_err(|e| {
            warn!(error = %e, %username, email_id, "delete email failed");
            e
        })?;
    info!(%username, email_id, "email deleted");
    Ok(Json(email))
}
