/// Owner-scoped task operations
///
/// Every operation here takes the authenticated caller's identity and
/// enforces the ownership invariant: a task can only be read as part of its
/// owner's list, and only mutated or deleted by its owner. Handlers never
/// touch [`Task`](crate::models::task::Task) queries directly for mutations.
///
/// Updates are partial. A patch may carry new text, a new completion flag,
/// both, or neither; see [`TaskPatch`] for the merge rules.
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::task::Task;

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// No task with the requested ID
    #[error("Task not found")]
    NotFound,

    /// The task exists but belongs to a different user
    #[error("Not authorized to modify this task")]
    Forbidden,

    /// Underlying store failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// A partial update to a task
///
/// Merge rules, matching the PATCH endpoint's contract:
///
/// - `text` replaces the existing text only when present and non-empty; an
///   omitted or empty value keeps the current text.
/// - `completed` is applied whenever present; an explicit `false` clears
///   the flag, only omission leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    /// Replacement text, if any
    pub text: Option<String>,

    /// Replacement completion flag, if any
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Resolves the patch against the task's current state
    ///
    /// Returns the `(text, completed)` pair the task should hold afterwards.
    fn apply(self, current: &Task) -> (String, bool) {
        let text = match self.text {
            Some(text) if !text.is_empty() => text,
            _ => current.text.clone(),
        };
        let completed = self.completed.unwrap_or(current.completed);

        (text, completed)
    }
}

/// Returns all of `owner_id`'s tasks, in store-native order
pub async fn list_tasks(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Task>, TaskError> {
    Ok(Task::list_by_owner(pool, owner_id).await?)
}

/// Creates a task owned by `owner_id`, with `completed = false`
pub async fn create_task(pool: &PgPool, owner_id: Uuid, text: &str) -> Result<Task, TaskError> {
    let task = Task::create(pool, owner_id, text).await?;
    debug!(task_id = %task.id, owner_id = %owner_id, "created task");
    Ok(task)
}

/// Applies a partial update to one of `owner_id`'s tasks
///
/// # Errors
///
/// - [`TaskError::NotFound`] if no task with `task_id` exists
/// - [`TaskError::Forbidden`] if the task belongs to someone else
pub async fn update_task(
    pool: &PgPool,
    owner_id: Uuid,
    task_id: Uuid,
    patch: TaskPatch,
) -> Result<Task, TaskError> {
    let existing = Task::find_by_id(pool, task_id)
        .await?
        .ok_or(TaskError::NotFound)?;

    if existing.user_id != owner_id {
        return Err(TaskError::Forbidden);
    }

    let (text, completed) = patch.apply(&existing);
    let task = Task::save(pool, task_id, &text, completed).await?;

    debug!(task_id = %task.id, owner_id = %owner_id, "updated task");
    Ok(task)
}

/// Deletes one of `owner_id`'s tasks
///
/// The owner check mirrors [`update_task`]; a task can only be deleted by
/// the user it belongs to.
///
/// # Errors
///
/// - [`TaskError::NotFound`] if no task with `task_id` exists
/// - [`TaskError::Forbidden`] if the task belongs to someone else
pub async fn delete_task(pool: &PgPool, owner_id: Uuid, task_id: Uuid) -> Result<(), TaskError> {
    let existing = Task::find_by_id(pool, task_id)
        .await?
        .ok_or(TaskError::NotFound)?;

    if existing.user_id != owner_id {
        return Err(TaskError::Forbidden);
    }

    Task::delete(pool, task_id).await?;

    debug!(task_id = %task_id, owner_id = %owner_id, "deleted task");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(text: &str, completed: bool) -> Task {
        Task {
            id: Uuid::new_v4(),
            text: text.to_string(),
            user_id: Uuid::new_v4(),
            completed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_patch_replaces_text() {
        let patch = TaskPatch {
            text: Some("walk the dog".to_string()),
            completed: None,
        };

        let (text, completed) = patch.apply(&task("buy milk", false));
        assert_eq!(text, "walk the dog");
        assert!(!completed);
    }

    #[test]
    fn test_patch_empty_text_keeps_existing() {
        let patch = TaskPatch {
            text: Some(String::new()),
            completed: None,
        };

        let (text, _) = patch.apply(&task("buy milk", false));
        assert_eq!(text, "buy milk");
    }

    #[test]
    fn test_patch_omitted_text_keeps_existing() {
        let patch = TaskPatch {
            text: None,
            completed: Some(true),
        };

        let (text, completed) = patch.apply(&task("buy milk", false));
        assert_eq!(text, "buy milk");
        assert!(completed);
    }

    #[test]
    fn test_patch_explicit_false_clears_flag() {
        // false is a real value here, not an omission
        let patch = TaskPatch {
            text: None,
            completed: Some(false),
        };

        let (_, completed) = patch.apply(&task("buy milk", true));
        assert!(!completed);
    }

    #[test]
    fn test_patch_omitted_flag_keeps_existing() {
        let patch = TaskPatch {
            text: Some("new text".to_string()),
            completed: None,
        };

        let (_, completed) = patch.apply(&task("buy milk", true));
        assert!(completed);
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let (text, completed) = TaskPatch::default().apply(&task("buy milk", true));
        assert_eq!(text, "buy milk");
        assert!(completed);
    }
}
