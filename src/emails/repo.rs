use sqlx::{QueryBuilder, Sqlite, SqliteExecutor};

use crate::emails::repo_types::{EmailRow, NewEmail};

pub async fn insert(db: impl SqliteExecutor<'_>, email: &NewEmail) -> sqlx::Result<EmailRow> {
    sqlx::query_as::<_, EmailRow>(
        r#"
        INSERT INTO email (from_email, to_email, date, subject, text)
        VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING email_id, from_email, to_email, date, subject, text
        "#,
    )
    .bind(&email.from_email)
    .bind(&email.to_email)
    .bind(email.date)
    .bind(&email.subject)
    .bind(&email.text)
    .fetch_one(db)
    .await
}

/// The email `email_id`, provided it was sent to one of `username`'s addresses.
pub async fn find_owned(
    db: impl SqliteExecutor<'_>,
    username: &str,
    email_id: i64,
) -> sqlx::Result<Option<EmailRow>> {
    sqlx::query_as::<_, EmailRow>(
        r#"
        SELECT email_id, from_email, to_email, date, subject, text
          FROM email
         WHERE email_id = ?1
           AND to_email IN (SELECT email FROM address WHERE person_id = ?2)
        "#,
    )
    .bind(email_id)
    .bind(username)
    .fetch_optional(db)
    .await
}

/// Every email whose recipient is one of `recipients`, oldest first.
pub async fn list_to_any(
    db: impl SqliteExecutor<'_>,
    recipients: &[String],
) -> sqlx::Result<Vec<EmailRow>> {
    if recipients.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
        "SELECT email_id, from_email, to_email, date, subject, text FROM email WHERE to_email IN (",
    );
    let mut list = qb.separated(", ");
    for r in recipients {
        list.push_bind(r.clone());
    }
    list.push_unseparated(") ORDER BY email_id ASC");

    qb.build_query_as::<EmailRow>().fetch_all(db).await
}

/// Delete the email if `username` owns it; `None` when nothing was removed.
pub async fn delete_owned(
    db: impl SqliteExecutor<'_>,
    username: &str,
    email_id: i64,
) -> sqlx::Result<Option<EmailRow>> {
    sqlx::query_as::<_, EmailRow>(
        r#"
        DELETE FROM email
         WHERE email_id = ?1
           AND to_email IN (SELECT email FROM address WHERE person_id = ?2)
        RETURNING email_id, from_email, to_email, date, subject, text
        "#,
    )
    .bind(email_id)
    .bind(username)
    .fetch_optional(db)
    .await
}
