use sqlx::FromRow;
use time::OffsetDateTime;

/// Email record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct EmailRow {
    pub email_id: i64,
    pub from_email: String,
    pub to_email: String,
    pub date: OffsetDateTime,
    pub subject: String,
    pub text: String,
}

/// A validated message about to be stored.
#[derive(Debug)]
pub struct NewEmail {
    pub from_email: String,
    pub to_email: String,
    pub date: OffsetDateTime,
    pub subject: String,
    pub text: String,
}
