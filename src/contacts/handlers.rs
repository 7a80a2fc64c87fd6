use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    contacts::{
        dto::{ContactResponse, CreateContactRequest, UpdateContactRequest},
        services,
    },
    error::AppResult,
    state::AppState,
};

pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/contact", post(add_contact).get(get_contacts))
        .route(
            "/contact/:username",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
}

#[instrument(skip(state, payload))]
pub async fn add_contact(
    State(state): State<AppState>,
    payload: Result<Json<CreateContactRequest>, JsonRejection>,
) -> AppResult<Json<ContactResponse>> {
    let Json(payload) = payload?;
    let new_contact = payload.validate().map_err(|e| {
        warn!(error = %e, "invalid contact payload");
        e
    })?;

    let contact = services::create_contact(&state.db, new_contact)
        .await
        .map_err(|e| {
            warn!(error = %e, "create contact failed");
            e
        })?;

    info!(
        username = %contact.username,
        addresses = contact.addresses.len(),
        "contact created"
    );
    Ok(Json(contact))
}

#[instrument(skip(state))]
pub async fn get_contacts(State(state): State<AppState>) -> AppResult<Json<Vec<ContactResponse>>> {
    let contacts = services::list_contacts(&state.db).await?;
    Ok(Json(contacts))
}

#[instrument(skip(state))]
pub async fn get_contact(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<ContactResponse>> {
    let contact = services::get_contact(&state.db, &username).await?;
    Ok(Json(contact))
}

#[instrument(skip(state, payload))]
pub async fn update_contact(
    State(state): State<AppState>,
    Path(username): Path<String>,
    payload: Result<Json<UpdateContactRequest>, JsonRejection>,
) -> AppResult<Json<ContactResponse>> {
    let Json(names) = payload?;
    let contact = services::update_contact(&state.db, &username, names).await?;
    info!(username = %contact.username, "contact updated");
    Ok(Json(contact))
}

#[instrument(skip(state))]
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<ContactResponse>> {
    let contact = services::delete_contact(&state.db, &username)
        .await
        .map_err(|e| {
            warn!(error = %e, %username, "delete contact failed");
            e
        })?;
    info!(%username, addresses = contact.addresses.len(), "contact deleted");
    Ok(Json(contact))
}
