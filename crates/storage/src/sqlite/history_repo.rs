use chrono::{DateTime, Utc};
use quiz_core::model::HistoryEntry;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{HistoryRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

fn map_history_row(row: &sqlx::sqlite::SqliteRow) -> Result<HistoryEntry, StorageError> {
    let topic: String = row.try_get("topic").map_err(ser)?;
    let score = u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?;
    let correct = u32_from_i64(
        "correct_answers",
        row.try_get::<i64, _>("correct_answers").map_err(ser)?,
    )?;
    let total = u32_from_i64(
        "total_questions",
        row.try_get::<i64, _>("total_questions").map_err(ser)?,
    )?;
    let completed_at: DateTime<Utc> = row.try_get("completed_at").map_err(ser)?;
    let total_time = u32_from_i64("total_time", row.try_get::<i64, _>("total_time").map_err(ser)?)?;

    HistoryEntry::from_persisted(topic, score, correct, total, completed_at, total_time)
        .map_err(ser)
}

#[async_trait::async_trait]
impl HistoryRepository for SqliteRepository {
    async fn prepend_entry(&self, entry: &HistoryEntry, cap: u32) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
                INSERT INTO quiz_history (
                    topic, score, correct_answers, total_questions, completed_at, total_time
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(entry.topic())
        .bind(i64::from(entry.score()))
        .bind(i64::from(entry.correct_answers()))
        .bind(i64::from(entry.total_questions()))
        .bind(entry.date())
        .bind(i64::from(entry.total_time_secs()))
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        // Insertion order defines "newest", not completed_at.
        sqlx::query(
            r"
                DELETE FROM quiz_history
                WHERE id NOT IN (
                    SELECT id FROM quiz_history ORDER BY id DESC LIMIT ?1
                )
            ",
        )
        .bind(i64::from(cap))
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryEntry>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT topic, score, correct_answers, total_questions, completed_at, total_time
                FROM quiz_history
                ORDER BY id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_history_row(&row)?);
        }
        Ok(out)
    }
}
