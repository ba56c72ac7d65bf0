// ABOUTME: Learning roadmap storage
// ABOUTME: One roadmap per user with ordered day entries and completion flags

use sqlx::{Row, SqlitePool};
use tracing::debug;

use codementor_core::{Roadmap, RoadmapDay};

use crate::history::decode_list;
use crate::StorageError;

pub struct RoadmapStorage {
    pool: SqlitePool,
}

impl RoadmapStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store `roadmap` for the user, replacing any previous one
    pub async fn replace_roadmap(
        &self,
        user_id: &str,
        roadmap: &Roadmap,
    ) -> Result<(), StorageError> {
        debug!(
            "Replacing roadmap for user {} ({} days)",
            user_id,
            roadmap.days.len()
        );

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query("DELETE FROM roadmap_days WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        sqlx::query("DELETE FROM roadmaps WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        sqlx::query(
            r#"
            INSERT INTO roadmaps (user_id, field, duration, skill_level, daily_time, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&roadmap.field)
        .bind(roadmap.duration as i64)
        .bind(&roadmap.skill_level)
        .bind(&roadmap.daily_time)
        .bind(roadmap.created_at)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        for day in &roadmap.days {
            sqlx::query(
                r#"
                INSERT INTO roadmap_days (
                    user_id, day, title, objectives, task, resources,
                    practice_questions, tip, next_day_hint, completed
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(user_id)
            .bind(day.day as i64)
            .bind(&day.title)
            .bind(serde_json::to_string(&day.objectives)?)
            .bind(&day.task)
            .bind(serde_json::to_string(&day.resources)?)
            .bind(serde_json::to_string(&day.practice_questions)?)
            .bind(&day.tip)
            .bind(&day.next_day_hint)
            .bind(day.completed)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        Ok(())
    }

    /// Fetch the user's roadmap, if one has been generated
    pub async fn get_roadmap(&self, user_id: &str) -> Result<Option<Roadmap>, StorageError> {
        let header = sqlx::query(
            "SELECT field, duration, skill_level, daily_time, created_at FROM roadmaps WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let Some(header) = header else {
            return Ok(None);
        };

        let rows = sqlx::query(
            r#"
            SELECT day, title, objectives, task, resources, practice_questions,
                   tip, next_day_hint, completed
            FROM roadmap_days
            WHERE user_id = ?
            ORDER BY day ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let mut days = Vec::with_capacity(rows.len());
        for row in rows {
            days.push(RoadmapDay {
                day: row.try_get::<i64, _>("day")? as u32,
                title: row.try_get("title")?,
                objectives: decode_list(row.try_get("objectives")?)?,
                task: row.try_get("task")?,
                resources: decode_list(row.try_get("resources")?)?,
                practice_questions: decode_list(row.try_get("practice_questions")?)?,
                tip: row.try_get("tip")?,
                next_day_hint: row.try_get("next_day_hint")?,
                completed: row.try_get("completed")?,
            });
        }

        Ok(Some(Roadmap {
            field: header.try_get("field")?,
            duration: header.try_get::<i64, _>("duration")? as u32,
            skill_level: header.try_get("skill_level")?,
            daily_time: header.try_get("daily_time")?,
            days,
            created_at: header.try_get("created_at")?,
        }))
    }

    /// Persist the completion flag of a single day.
    ///
    /// Ordering rules are enforced by the caller via `Roadmap::can_complete`.
    pub async fn set_day_completed(
        &self,
        user_id: &str,
        day: u32,
        completed: bool,
    ) -> Result<(), StorageError> {
        let result =
            sqlx::query("UPDATE roadmap_days SET completed = ? WHERE user_id = ? AND day = ?")
                .bind(completed)
                .bind(user_id)
                .bind(day as i64)
                .execute(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
