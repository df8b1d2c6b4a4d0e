//! Attendance log persistence

use rollcall_common::db::AttendanceRecord;
use rollcall_common::Result;
use sqlx::SqlitePool;

/// Append attendance records (the table is an append-only log)
pub async fn insert_records(pool: &SqlitePool, records: &[AttendanceRecord]) -> Result<()> {
    for record in records {
        sqlx::query(
            r#"
            INSERT INTO attendance (id, date, user_id, card_code_at_time, full_name_at_time)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.date)
        .bind(record.user_id.to_string())
        .bind(&record.card_code_at_time)
        .bind(&record.full_name_at_time)
        .execute(pool)
        .await?;
    }
    Ok(())
}

/// Max `date` over all persisted attendance records.
///
/// A live query, deliberately not the cached watermark setting: the exporter
/// resumes from what is actually in the log.
pub async fn latest_entry_date(pool: &SqlitePool) -> Result<Option<i64>> {
    let max: Option<i64> = sqlx::query_scalar("SELECT MAX(date) FROM attendance")
        .fetch_one(pool)
        .await?;
    Ok(max)
}
