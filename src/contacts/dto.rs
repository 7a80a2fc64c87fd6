use serde::{Deserialize, Serialize};

use crate::contacts::repo_types::{AddressRow, ContactRow};
use crate::error::AppResult;
use crate::validation::{address_list, required_text};

/// Request body for contact creation. `addresses` stays raw so a
/// non-list payload gets its own error instead of a generic parse failure.
#[derive(Debug, Deserialize)]
pub struct CreateContactRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub addresses: serde_json::Value,
}

/// Request body for contact update. Other fields in the body are ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateContactRequest {
    pub first_name: String,
    pub last_name: String,
}

/// A validated contact ready to be stored.
#[derive(Debug, Clone)]
pub struct NewContact {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub addresses: Vec<String>,
}

impl CreateContactRequest {
    pub fn validate(self) -> AppResult<NewContact> {
        let addresses = address_list(&self.addresses)?;
        Ok(NewContact {
            username: required_text("username", &self.username)?,
            first_name: self.first_name,
            last_name: self.last_name,
            addresses,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResponse {
    pub id: i64,
    pub email: String,
    pub person_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub addresses: Vec<AddressResponse>,
}

impl From<AddressRow> for AddressResponse {
    fn from(r: AddressRow) -> Self {
        Self {
            id: r.id,
            email: r.email,
            person_id: r.person_id,
        }
    }
}

impl ContactResponse {
    pub fn from_rows(contact: ContactRow, addresses: Vec<AddressRow>) -> Self {
        Self {
            username: contact.username,
            first_name: contact.first_name,
            last_name: contact.last_name,
            addresses: addresses.into_iter().map(AddressResponse::from).collect(),
        }
    }
}
