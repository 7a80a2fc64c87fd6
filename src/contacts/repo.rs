use sqlx::SqliteExecutor;

use crate::contacts::repo_types::{AddressRow, ContactRow};

/// Find a contact by its username.
pub async fn find_by_username(
    db: impl SqliteExecutor<'_>,
    username: &str,
) -> sqlx::Result<Option<ContactRow>> {
    sqlx::query_as::<_, ContactRow>(
        r#"
        SELECT id, username, first_name, last_name
        FROM contact
        WHERE username = ?1
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await
}

pub async fn list_all(db: impl SqliteExecutor<'_>) -> sqlx::Result<Vec<ContactRow>> {
    sqlx::query_as::<_, ContactRow>(
        r#"
        SELECT id, username, first_name, last_name
        FROM contact
        ORDER BY id ASC
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn insert(
    db: impl SqliteExecutor<'_>,
    username: &str,
    first_name: &str,
    last_name: &str,
) -> sqlx::Result<ContactRow> {
    sqlx::query_as::<_, ContactRow>(
        r#"
        INSERT INTO contact (username, first_name, last_name)
        VALUES (?1, ?2, ?3)
        RETURNING id, username, first_name, last_name
        "#,
    )
    .bind(username)
    .bind(first_name)
    .bind(last_name)
    .fetch_one(db)
    .await
}

/// Overwrite the name fields; `None` when no contact has this username.
pub async fn update_names(
    db: impl SqliteExecutor<'_>,
    username: &str,
    first_name: &str,
    last_name: &str,
) -> sqlx::Result<Option<ContactRow>> {
    sqlx::query_as::<_, ContactRow>(
        r#"
        UPDATE contact
           SET first_name = ?2, last_name = ?3
         WHERE username = ?1
        RETURNING id, username, first_name, last_name
        "#,
    )
    .bind(username)
    .bind(first_name)
    .bind(last_name)
    .fetch_optional(db)
    .await
}

/// Remove a contact; `None` when no contact has this username.
pub async fn delete(
    db: impl SqliteExecutor<'_>,
    username: &str,
) -> sqlx::Result<Option<ContactRow>> {
    sqlx::query_as::<_, ContactRow>(
        r#"
        DELETE FROM contact
         WHERE username = ?1
        RETURNING id, username, first_name, last_name
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await
}

// ---- Addresses ----

pub async fn insert_address(
    db: impl SqliteExecutor<'_>,
    username: &str,
    email: &str,
) -> sqlx::Result<AddressRow> {
    sqlx::query_as::<_, AddressRow>(
        r#"
        INSERT INTO address (email, person_id)
        VALUES (?1, ?2)
        RETURNING id, email, person_id
        "#,
    )
    .bind(email)
    .bind(username)
    .fetch_one(db)
    .await
}

/// All addresses owned by `username`, oldest first.
pub async fn addresses_of(
    db: impl SqliteExecutor<'_>,
    username: &str,
) -> sqlx::Result<Vec<AddressRow>> {
    sqlx::query_as::<_, AddressRow>(
        r#"
        SELECT id, email, person_id
          FROM address
         WHERE person_id = ?1
         ORDER BY id ASC
        "#,
    )
    .bind(username)
    .fetch_all(db)
    .await
}

pub async fn all_addresses(db: impl SqliteExecutor<'_>) -> sqlx::Result<Vec<AddressRow>> {
    sqlx::query_as::<_, AddressRow>(
        r#"
        SELECT id, email, person_id
          FROM address
         ORDER BY id ASC
        "#,
    )
    .fetch_all(db)
    .await
}

/// The oldest address of a contact; used as the sender of outgoing mail.
pub async fn first_address(
    db: impl SqliteExecutor<'_>,
    username: &str,
) -> sqlx::Result<Option<AddressRow>> {
    sqlx::query_as::<_, AddressRow>(
        r#"
        SELECT id, email, person_id
          FROM address
         WHERE person_id = ?1
         ORDER BY id ASC
         LIMIT 1
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await
}

/// Remove every address of a contact and return them, oldest first.
pub async fn delete_addresses_of(
    db: impl SqliteExecutor<'_>,
    username: &str,
) -> sqlx::Result<Vec<AddressRow>> {
    let mut removed = sqlx::query_as::<_, AddressRow>(
        r#"
        DELETE FROM address
         WHERE person_id = ?1
        RETURNING id, email, person_id
        "#,
    )
    .bind(username)
    .fetch_all(db)
    .await?;
    // RETURNING order is unspecified
    removed.sort_by_key(|a| a.id);
    Ok(removed)
}
