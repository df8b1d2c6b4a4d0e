//! User directory persistence

use rollcall_common::db::User;
use rollcall_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Load the full user directory (the batch-start snapshot)
pub async fn load_all_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(
        "SELECT id, full_name_lowercase, card_code, group_tag FROM users ORDER BY full_name_lowercase",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let id_str: String = row.get("id");
            let id = Uuid::parse_str(&id_str)
                .map_err(|e| Error::Internal(format!("Invalid user id in database: {}", e)))?;
            Ok(User {
                id,
                full_name_lowercase: row.get("full_name_lowercase"),
                card_code: row.get("card_code"),
                group_tag: row.get("group_tag"),
            })
        })
        .collect()
}

/// Insert new users. Insert-only: existing rows are never touched.
pub async fn insert_users(pool: &SqlitePool, users: &[User]) -> Result<()> {
    for user in users {
        sqlx::query(
            r#"
            INSERT INTO users (id, full_name_lowercase, card_code, group_tag)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.full_name_lowercase)
        .bind(&user.card_code)
        .bind(&user.group_tag)
        .execute(pool)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_common::db::connect_memory;

    #[tokio::test]
    async fn insert_then_load_round_trips() {
        let pool = connect_memory().await.unwrap();
        let users = vec![
            User::new("bob jones".to_string(), None, Some("youth".to_string())),
            User::new("alice smith".to_string(), Some("A001".to_string()), None),
        ];
        insert_users(&pool, &users).await.unwrap();

        let loaded = load_all_users(&pool).await.unwrap();
        assert_eq!(loaded.len(), 2);
        // Ordered by name
        assert_eq!(loaded[0].full_name_lowercase, "alice smith");
        assert_eq!(loaded[0].card_code.as_deref(), Some("A001"));
        assert_eq!(loaded[1].group_tag.as_deref(), Some("youth"));
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_database_error() {
        let pool = connect_memory().await.unwrap();
        let first = vec![User::new("alice smith".to_string(), None, None)];
        insert_users(&pool, &first).await.unwrap();

        let second = vec![User::new("alice smith".to_string(), None, None)];
        assert!(insert_users(&pool, &second).await.is_err());
    }
}
