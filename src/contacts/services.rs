use std::collections::HashMap;

use sqlx::SqlitePool;
use tracing::debug;

use super::dto::{ContactResponse, NewContact, UpdateContactRequest};
use super::repo;
use crate::error::{is_unique_violation, AppError, AppResult};

const USERNAME_EXISTS: &str = "Username exist";
const USERNAME_MISSING: &str = "username does not exist";

/// Create a contact and all of its addresses in one transaction.
///
/// The insert is the first statement so the transaction takes the write lock
/// before reading anything; the UNIQUE constraint on `username` is the
/// existence check.
pub async fn create_contact(db: &SqlitePool, new: NewContact) -> AppResult<ContactResponse> {
    let mut tx = db.begin().await?;

    let contact = repo::insert(&mut *tx, &new.username, &new.first_name, &new.last_name)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(USERNAME_EXISTS)
            } else {
                AppError::from(e)
            }
        })?;

    let mut addresses = Vec::with_capacity(new.addresses.len());
    for email in &new.addresses {
        addresses.push(repo::insert_address(&mut *tx, &contact.username, email).await?);
    }

    tx.commit().await?;
    debug!(username = %contact.username, addresses = addresses.len(), "contact stored");
    Ok(ContactResponse::from_rows(contact, addresses))
}

/// Every contact with its addresses, read from one snapshot.
pub async fn list_contacts(db: &SqlitePool) -> AppResult<Vec<ContactResponse>> {
    let mut tx = db.begin().await?;
    let contacts = repo::list_all(&mut *tx).await?;
    let addresses = repo::all_addresses(&mut *tx).await?;
    tx.commit().await?;

    let mut by_owner: HashMap<String, Vec<_>> = HashMap::new();
    for address in addresses {
        by_owner
            .entry(address.person_id.clone())
            .or_default()
            .push(address);
    }

    Ok(contacts
        .into_iter()
        .map(|c| {
            let addresses = by_owner.remove(&c.username).unwrap_or_default();
            ContactResponse::from_rows(c, addresses)
        })
        .collect())
}

pub async fn get_contact(db: &SqlitePool, username: &str) -> AppResult<ContactResponse> {
    let mut tx = db.begin().await?;
    let contact = repo::find_by_username(&mut *tx, username)
        .await?
        .ok_or_else(|| AppError::not_found(USERNAME_MISSING))?;
    let addresses = repo::addresses_of(&mut *tx, username).await?;
    tx.commit().await?;
    Ok(ContactResponse::from_rows(contact, addresses))
}

/// Overwrite the name fields. The username and address set never change here.
pub async fn update_contact(
    db: &SqlitePool,
    username: &str,
    names: UpdateContactRequest,
) -> AppResult<ContactResponse> {
    let mut tx = db.begin().await?;
    let contact = repo::update_names(&mut *tx, username, &names.first_name, &names.last_name)
        .await?
        .ok_or_else(|| AppError::not_found(USERNAME_MISSING))?;
    let addresses = repo::addresses_of(&mut *tx, username).await?;
    tx.commit().await?;
    Ok(ContactResponse::from_rows(contact, addresses))
}

/// Delete a contact and its addresses; returns what was removed.
///
/// Both statements are deletes, so the write lock is taken up front. An
/// unknown username rolls back the (empty) address delete.
pub async fn delete_contact(db: &SqlitePool, username: &str) -> AppResult<ContactResponse> {
    let mut tx = db.begin().await?;

    let addresses = repo::delete_addresses_of(&mut *tx, username).await?;
    let contact = repo::delete(&mut *tx, username)
        .await?
        .ok_or_else(|| AppError::not_found(USERNAME_MISSING))?;
    tx.commit().await?;

    Ok(ContactResponse::from_rows(contact, addresses))
}

/// Like [`delete_contact`] but absence is not an error.
/// Returns whether a contact was removed.
pub async fn delete_if_exists(db: &SqlitePool, username: &str) -> AppResult<bool> {
    match delete_contact(db, username).await {
        Ok(_) => Ok(true),
        Err(AppError::NotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Email addresses currently owned by `username`; empty for unknown users.
pub async fn list_user_emails(db: &SqlitePool, username: &str) -> AppResult<Vec<String>> {
    let addresses = repo::addresses_of(db, username).await?;
    Ok(addresses.into_iter().map(|a| a.email).collect())
}
