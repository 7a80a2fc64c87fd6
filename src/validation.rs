use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::error::{AppError, AppResult};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Turns the raw `addresses` payload into a list of distinct, trimmed
/// email addresses, keeping first-seen order.
pub(crate) fn address_list(raw: &Value) -> AppResult<Vec<String>> {
    let items = raw
        .as_array()
        .ok_or_else(|| AppError::validation("Addresses need to be list."))?;

    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let email = item
            .as_str()
            .map(str::trim)
            .ok_or_else(|| AppError::validation("Addresses need to be strings."))?;
        if !is_valid_email(email) {
            return Err(AppError::validation(format!(
                "Not a valid email address: {email}"
            )));
        }
        if !out.iter().any(|e| e == email) {
            out.push(email.to_string());
        }
    }
    Ok(out)
}

pub(crate) fn required_text(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}
