use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Contact record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactRow {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Address record; `person_id` holds the owner's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AddressRow {
    pub id: i64,
    pub email: String,
    pub person_id: String,
}
