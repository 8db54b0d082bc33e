use sqlx::SqlitePool;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

use crate::{schema::{ContactSubmission, ValidContact}, AppResult};

type ContactRow = (String, String, String, String, Option<String>, String, String);

/// Persists a validated submission. Rows are never updated or deleted from here.
#[tracing::instrument(name = "Insert contact submission", skip_all)]
pub async fn insert(db_pool: &SqlitePool, contact: ValidContact) -> AppResult<ContactSubmission> {
    let record = ContactSubmission::new(contact);

    sqlx::query("INSERT INTO contact_submissions (id,name,phone,address,email,description,created_at) VALUES (?,?,?,?,?,?,?)")
        .bind(record.id.to_string())
        .bind(&record.name)
        .bind(&record.phone)
        .bind(&record.address)
        .bind(record.email.as_deref())
        .bind(&record.description)
        .bind(record.created_at.format(&Rfc3339)?)
        .execute(db_pool)
        .await?;

    Ok(record)
}

#[tracing::instrument(name = "Find contact submission", skip(db_pool))]
pub async fn find(db_pool: &SqlitePool, id: Uuid) -> AppResult<Option<ContactSubmission>> {
    let row: Option<ContactRow> = sqlx::query_as("SELECT id,name,phone,address,email,description,created_at FROM contact_submissions WHERE id=?")
        .bind(id.to_string())
        .fetch_optional(db_pool)
        .await?;

    let Some((id, name, phone, address, email, description, created_at)) = row else {
        return Ok(None);
    };

    Ok(Some(ContactSubmission {
        id: Uuid::parse_str(&id)?,
        name,
        phone,
        address,
        email,
        description,
        created_at: OffsetDateTime::parse(&created_at, &Rfc3339)?,
    }))
}

pub async fn count(db_pool: &SqlitePool) -> AppResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contact_submissions")
        .fetch_one(db_pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use crate::{db, schema::ContactInput};

    use super::*;

    fn valid() -> ValidContact {
        ContactInput {
            name: "John Smith".to_owned(),
            phone: "9818750889".to_owned(),
            address: "C-220, Pandav Nagar, Delhi".to_owned(),
            email: Some("john@example.com".to_owned()),
            description: "Cockroaches in kitchen area".to_owned(),
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn insert_then_find() {
        let db_pool = db::connect("sqlite::memory:", 1).await.unwrap();

        let record = insert(&db_pool, valid()).await.unwrap();
        let found = find(&db_pool, record.id).await.unwrap().unwrap();

        assert_eq!(found, record);
        assert_eq!(found.email.as_deref(), Some("john@example.com"));
        assert_eq!(count(&db_pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn every_insert_gets_its_own_id() {
        let db_pool = db::connect("sqlite::memory:", 1).await.unwrap();

        let a = insert(&db_pool, valid()).await.unwrap();
        let b = insert(&db_pool, valid()).await.unwrap();

        assert_ne!(a.id, b.id);
        assert!(b.created_at >= a.created_at);
        assert_eq!(count(&db_pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let db_pool = db::connect("sqlite::memory:", 1).await.unwrap();
        assert!(find(&db_pool, Uuid::now_v7()).await.unwrap().is_none());
    }
}
