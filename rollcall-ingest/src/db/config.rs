//! Operator configuration and invocation accounting
//!
//! The `config` table mirrors the operator-maintained settings document:
//! email recipient lists for the weekly metrics and the invocation
//! threshold. `function_calls` counts endpoint invocations per ISO week so
//! a misbehaving upstream exporter shows up before it exhausts quota; the
//! original design emailed the developers at the threshold, here it logs a
//! warning.

use rollcall_common::week::current_week_id;
use rollcall_common::{Error, Result};
use sqlx::SqlitePool;
use tracing::warn;

const EMAIL_RECIPIENTS_KEY: &str = "email_recipients";
const EMAIL_OF_DEVELOPERS_KEY: &str = "email_of_developers";
const MAX_WEEKLY_FUNCTION_CALLS_KEY: &str = "max_weekly_function_calls";

/// Default weekly invocation threshold when none is configured
const DEFAULT_MAX_WEEKLY_FUNCTION_CALLS: i64 = 500;

/// Church staff recipients of the attendance metrics (JSON array in config)
pub async fn get_email_recipients(pool: &SqlitePool) -> Result<Vec<String>> {
    get_email_list(pool, EMAIL_RECIPIENTS_KEY).await
}

/// Developer recipients for threshold warnings (JSON array in config)
pub async fn get_email_of_developers(pool: &SqlitePool) -> Result<Vec<String>> {
    get_email_list(pool, EMAIL_OF_DEVELOPERS_KEY).await
}

/// Weekly invocation threshold
pub async fn get_max_weekly_function_calls(pool: &SqlitePool) -> Result<i64> {
    let value: Option<(String,)> = sqlx::query_as("SELECT value FROM config WHERE key = ?")
        .bind(MAX_WEEKLY_FUNCTION_CALLS_KEY)
        .fetch_optional(pool)
        .await?;
    match value {
        Some((raw,)) => raw
            .parse::<i64>()
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", MAX_WEEKLY_FUNCTION_CALLS_KEY, e))),
        None => Ok(DEFAULT_MAX_WEEKLY_FUNCTION_CALLS),
    }
}

async fn get_email_list(pool: &SqlitePool, key: &str) -> Result<Vec<String>> {
    let value: Option<(String,)> = sqlx::query_as("SELECT value FROM config WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    match value {
        Some((raw,)) => serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", key, e))),
        None => Ok(Vec::new()),
    }
}

/// Bump this week's invocation counter for an endpoint and return the new
/// count. Warns when the weekly threshold is exceeded.
pub async fn record_invocation(pool: &SqlitePool, function_name: &str) -> Result<i64> {
    let week_id = current_week_id();

    sqlx::query(
        "INSERT INTO function_calls (week_id, function_name, calls) VALUES (?, ?, 1)
         ON CONFLICT(week_id, function_name) DO UPDATE SET calls = calls + 1",
    )
    .bind(&week_id)
    .bind(function_name)
    .execute(pool)
    .await?;

    let calls: i64 =
        sqlx::query_scalar("SELECT calls FROM function_calls WHERE week_id = ? AND function_name = ?")
            .bind(&week_id)
            .bind(function_name)
            .fetch_one(pool)
            .await?;

    let threshold = get_max_weekly_function_calls(pool).await?;
    if calls > threshold {
        warn!(
            function_name,
            week_id = %week_id,
            calls,
            threshold,
            "Weekly invocation threshold exceeded"
        );
    }

    Ok(calls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_common::db::connect_memory;

    #[tokio::test]
    async fn email_recipients_default_to_empty() {
        let pool = connect_memory().await.unwrap();
        assert!(get_email_recipients(&pool).await.unwrap().is_empty());
        assert!(get_email_of_developers(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn email_recipients_parse_json_array() {
        let pool = connect_memory().await.unwrap();
        sqlx::query("INSERT INTO config (key, value) VALUES ('email_recipients', ?)")
            .bind(r#"["staff@example.org","pastor@example.org"]"#)
            .execute(&pool)
            .await
            .unwrap();

        let recipients = get_email_recipients(&pool).await.unwrap();
        assert_eq!(recipients, vec!["staff@example.org", "pastor@example.org"]);
    }

    #[tokio::test]
    async fn threshold_defaults_when_unset() {
        let pool = connect_memory().await.unwrap();
        assert_eq!(get_max_weekly_function_calls(&pool).await.unwrap(), 500);
    }

    #[tokio::test]
    async fn record_invocation_counts_per_function() {
        let pool = connect_memory().await.unwrap();

        assert_eq!(record_invocation(&pool, "updateUsers").await.unwrap(), 1);
        assert_eq!(record_invocation(&pool, "updateUsers").await.unwrap(), 2);
        assert_eq!(record_invocation(&pool, "updateAttendance").await.unwrap(), 1);
    }
}
