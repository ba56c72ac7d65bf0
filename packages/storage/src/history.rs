// ABOUTME: Review and code generation history storage
// ABOUTME: Entries are listed and deleted by their position in insertion order

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::debug;

use codementor_core::{generate_id, HistoryEntry, HistoryKind, HistoryPayload};

use crate::StorageError;

pub struct HistoryStorage {
    pool: SqlitePool,
}

impl HistoryStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append an entry to the end of a user's history
    pub async fn add_entry(
        &self,
        user_id: &str,
        payload: HistoryPayload,
    ) -> Result<HistoryEntry, StorageError> {
        let entry = HistoryEntry {
            id: generate_id(),
            payload,
            timestamp: Utc::now(),
        };

        debug!(
            "Adding {} history entry {} for user {}",
            entry.payload.kind(),
            entry.id,
            user_id
        );

        let query = sqlx::query(
            r#"
            INSERT INTO history_entries (
                id, user_id, kind, code_snippet, issues, suggestions,
                query, language, generated_code, explanation, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(user_id)
        .bind(entry.payload.kind().as_str());

        let query = match &entry.payload {
            HistoryPayload::Review {
                code_snippet,
                issues,
                suggestions,
            } => query
                .bind(code_snippet)
                .bind(serde_json::to_string(issues)?)
                .bind(serde_json::to_string(suggestions)?)
                .bind(None::<String>)
                .bind(None::<String>)
                .bind(None::<String>)
                .bind(None::<String>),
            HistoryPayload::Codegen {
                query: prompt,
                language,
                generated_code,
                explanation,
            } => query
                .bind(None::<String>)
                .bind("[]")
                .bind("[]")
                .bind(prompt)
                .bind(language)
                .bind(generated_code)
                .bind(explanation),
        };

        query
            .bind(entry.timestamp)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(entry)
    }

    /// List a user's history, oldest first
    pub async fn list_entries(&self, user_id: &str) -> Result<Vec<HistoryEntry>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT id, kind, code_snippet, issues, suggestions,
                   query, language, generated_code, explanation, created_at
            FROM history_entries
            WHERE user_id = ?
            ORDER BY seq ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_entry).collect()
    }

    /// Remove the entry at zero-based `index`.
    ///
    /// Returns `false` when the user has no entry at that position.
    pub async fn delete_at(&self, user_id: &str, index: usize) -> Result<bool, StorageError> {
        // SQLite reads a negative OFFSET as zero
        let Ok(offset) = i64::try_from(index) else {
            return Ok(false);
        };

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let target: Option<i64> = sqlx::query_scalar(
            "SELECT seq FROM history_entries WHERE user_id = ? ORDER BY seq ASC LIMIT 1 OFFSET ?",
        )
        .bind(user_id)
        .bind(offset)
        .fetch_optional(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        let Some(seq) = target else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM history_entries WHERE seq = ?")
            .bind(seq)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        debug!("Deleted history entry at index {} for user {}", index, user_id);
        Ok(true)
    }
}

fn row_to_entry(row: &SqliteRow) -> Result<HistoryEntry, StorageError> {
    let kind: String = row.try_get("kind")?;
    let kind: HistoryKind = kind.parse().map_err(StorageError::Database)?;

    let payload = match kind {
        HistoryKind::Review => HistoryPayload::Review {
            code_snippet: row.try_get("code_snippet")?,
            issues: decode_list(row.try_get("issues")?)?,
            suggestions: decode_list(row.try_get("suggestions")?)?,
        },
        HistoryKind::Codegen => HistoryPayload::Codegen {
            query: row.try_get("query")?,
            language: row.try_get("language")?,
            generated_code: row.try_get("generated_code")?,
            explanation: row.try_get("explanation")?,
        },
    };

    let timestamp: DateTime<Utc> = row.try_get("created_at")?;

    Ok(HistoryEntry {
        id: row.try_get("id")?,
        payload,
        timestamp,
    })
}

pub(crate) fn decode_list(raw: String) -> Result<Vec<String>, StorageError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_memory_pool;

    async fn setup() -> (SqlitePool, HistoryStorage) {
        let pool = init_memory_pool().await.unwrap();
        for id in ["user-a", "user-b"] {
            sqlx::query(
                "INSERT INTO users (id, username, email, password_hash) VALUES (?, ?, ?, 'x')",
            )
            .bind(id)
            .bind(id)
            .bind(format!("{}@example.com", id))
            .execute(&pool)
            .await
            .unwrap();
        }
        let storage = HistoryStorage::new(pool.clone());
        (pool, storage)
    }

    fn review(snippet: &str) -> HistoryPayload {
        HistoryPayload::Review {
            code_snippet: Some(snippet.to_string()),
            issues: vec!["issue".to_string()],
            suggestions: vec!["suggestion".to_string()],
        }
    }

    #[tokio::test]
    async fn test_add_and_list_preserves_order() {
        let (_pool, storage) = setup().await;

        storage.add_entry("user-a", review("first")).await.unwrap();
        storage
            .add_entry(
                "user-a",
                HistoryPayload::Codegen {
                    query: Some("fizzbuzz".to_string()),
                    language: Some("rust".to_string()),
                    generated_code: Some("fn main() {}".to_string()),
                    explanation: Some("prints".to_string()),
                },
            )
            .await
            .unwrap();
        storage.add_entry("user-a", review("third")).await.unwrap();

        let entries = storage.list_entries("user-a").await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].payload, review("first"));
        assert_eq!(entries[1].payload.kind(), HistoryKind::Codegen);
        assert_eq!(entries[2].payload, review("third"));
    }

    #[tokio::test]
    async fn test_history_is_per_user() {
        let (_pool, storage) = setup().await;

        storage.add_entry("user-a", review("mine")).await.unwrap();

        assert_eq!(storage.list_entries("user-a").await.unwrap().len(), 1);
        assert!(storage.list_entries("user-b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_position() {
        let (_pool, storage) = setup().await;

        for snippet in ["zero", "one", "two"] {
            storage.add_entry("user-a", review(snippet)).await.unwrap();
        }

        assert!(storage.delete_at("user-a", 1).await.unwrap());

        let remaining = storage.list_entries("user-a").await.unwrap();
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining[0].payload, review("zero"));
        assert_eq!(remaining[1].payload, review("two"));
    }

    #[tokio::test]
    async fn test_delete_out_of_range_is_noop() {
        let (_pool, storage) = setup().await;

        storage.add_entry("user-a", review("only")).await.unwrap();

        assert!(!storage.delete_at("user-a", 1).await.unwrap());
        assert!(!storage.delete_at("user-b", 0).await.unwrap());
        assert!(!storage.delete_at("user-a", usize::MAX).await.unwrap());
        assert_eq!(storage.list_entries("user-a").await.unwrap().len(), 1);
    }
}
