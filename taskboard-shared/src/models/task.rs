/// Task model and queries
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     text TEXT NOT NULL,
///     user_id UUID NOT NULL REFERENCES users (id),
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Every task is owned by exactly one user. Queries here take no stance on
/// ownership; the owner checks live in [`crate::tasks`], which is the only
/// path mutating callers go through.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A single task item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// The task text
    pub text: String,

    /// Owning user's ID
    pub user_id: Uuid,

    /// Completion flag, false on creation
    pub completed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Inserts a new task for `user_id`, not yet completed
    pub async fn create(pool: &PgPool, user_id: Uuid, text: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (text, user_id)
            VALUES ($1, $2)
            RETURNING id, text, user_id, completed, created_at, updated_at
            "#,
        )
        .bind(text)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, text, user_id, completed, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// All tasks owned by `user_id`, in store-native order
    pub async fn list_by_owner(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, text, user_id, completed, created_at, updated_at
            FROM tasks
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Overwrites text and completion flag, returning the updated row
    pub async fn save(
        pool: &PgPool,
        id: Uuid,
        text: &str,
        completed: bool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET text = $2, completed = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, text, user_id, completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(text)
        .bind(completed)
        .fetch_one(pool)
        .await
    }

    /// Deletes a task by ID; true if a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
