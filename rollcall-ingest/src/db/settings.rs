//! Settings database operations
//!
//! Get/set accessors for the key-value settings table. Holds the attendance
//! watermark: the latest attendance date already folded into the log, read
//! by the exporter side to avoid re-sending old rows.

use rollcall_common::{Error, Result};
use sqlx::SqlitePool;

const LATEST_ATTENDANCE_DATE_KEY: &str = "latest_attendance_date";

/// Get the attendance watermark (epoch millis), None if never set
pub async fn get_latest_attendance_date(pool: &SqlitePool) -> Result<Option<i64>> {
    get_setting(pool, LATEST_ATTENDANCE_DATE_KEY).await
}

/// Advance the attendance watermark to `candidate`.
///
/// Monotonically non-decreasing: a candidate at or below the stored value is
/// a no-op. Returns true when the watermark moved.
pub async fn advance_latest_attendance_date(pool: &SqlitePool, candidate: i64) -> Result<bool> {
    match get_latest_attendance_date(pool).await? {
        Some(current) if candidate <= current => Ok(false),
        _ => {
            set_setting(pool, LATEST_ATTENDANCE_DATE_KEY, candidate).await?;
            Ok(true)
        }
    }
}

/// Generic setting getter (internal)
async fn get_setting<T>(pool: &SqlitePool, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match row {
        Some((value,)) => {
            let parsed = value
                .parse::<T>()
                .map_err(|e| Error::Config(format!("Parse setting failed: {}", e)))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Generic setting setter (internal)
async fn set_setting<T>(pool: &SqlitePool, key: &str, value: T) -> Result<()>
where
    T: std::fmt::Display,
{
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value.to_string())
    .execute(pool)
    .await?;

    Ok(())
}
