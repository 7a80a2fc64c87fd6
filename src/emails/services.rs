use sqlx::SqlitePool;
use time::OffsetDateTime;

use super::dto::{EmailResponse, SendEmailRequest};
use super::repo;
use super::repo_types::NewEmail;
use crate::contacts;
use crate::error::{AppError, AppResult};
use crate::validation::is_valid_email;

const EMAIL_MISSING: &str = "email does not exist";

/// Store an email sent by `username`. The sender is the contact's oldest
/// address. Nothing is written unless the recipient is well-formed.
pub async fn send_email(
    db: &SqlitePool,
    username: &str,
    req: SendEmailRequest,
) -> AppResult<EmailResponse> {
    let to_email = req.to_email.trim();
    if !is_valid_email(to_email) {
        return Err(AppError::validation("Not a valid email address"));
    }

    if contacts::repo::find_by_username(db, username).await?.is_none() {
        return Err(AppError::not_found("username does not exist"));
    }
    let sender = contacts::repo::first_address(db, username)
        .await?
        .ok_or_else(|| AppError::validation("contact has no address to send from"))?;

    let new_email = NewEmail {
        from_email: sender.email,
        to_email: to_email.to_string(),
        date: OffsetDateTime::now_utc(),
        subject: req.subject,
        text: req.text,
    };
    let stored = repo::insert(db, &new_email).await?;
    Ok(stored.into())
}

/// Emails addressed to any of the contact's current addresses.
pub async fn list_emails(db: &SqlitePool, username: &str) -> AppResult<Vec<EmailResponse>> {
    let addresses = contacts::services::list_user_emails(db, username).await?;
    let rows = repo::list_to_any(db, &addresses).await?;
    Ok(rows.into_iter().map(EmailResponse::from).collect())
}

pub async fn get_email(db: &SqlitePool, username: &str, email_id: i64) -> AppResult<EmailResponse> {
    let email = repo::find_owned(db, username, email_id)
        .await?
        .ok_or_else(|| AppError::not_found(EMAIL_MISSING))?;
    Ok(email.into())
}

/// Delete an email addressed to the contact; returns the removed record.
/// Ownership is checked by the delete itself, so of two concurrent deletes
/// exactly one gets the record.
pub async fn delete_email(
    db: &SqlitePool,
    username: &str,
    email_id: i64,
) -> AppResult<EmailResponse> {
    let email = repo::delete_owned(db, username, email_id)
        .await?
        .ok_or_else(|| AppError::not_found(EMAIL_MISSING))?;
    Ok(email.into())
}
