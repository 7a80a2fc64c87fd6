use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::emails::repo_types::EmailRow;

/// Request body for sending an email from a contact.
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to_email: String,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailResponse {
    pub email_id: i64,
    pub from_email: String,
    pub to_email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub subject: String,
    pub text: String,
}

impl From<EmailRow> for EmailResponse {
    fn from(r: EmailRow) -> Self {
        Self {
            email_id: r.email_id,
            from_email: r.from_email,
            to_email: r.to_email,
            date: r.date,
            subject: r.subject,
            text: r.text,
        }
    }
}
