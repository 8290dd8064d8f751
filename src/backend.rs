use std::cell::RefCell;

use chrono::Utc;
use thiserror::Error;
use ulid::Ulid;

use crate::model::{DeleteResponse, Task, TaskDraft, TaskPatch, TaskResponse};

/// Failure surface of the task backend. Only `NotFound` and `Rejected`
/// carry a server-authored message; transport failures have nothing
/// user-facing and callers substitute their own fallback text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("{message}")]
    NotFound { message: String },
    #[error("{message}")]
    Rejected { message: String },
    #[error("backend unavailable: {reason}")]
    Unavailable { reason: String },
}

impl BackendError {
    pub fn not_found(message: impl Into<String>) -> Self {
        BackendError::NotFound {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        BackendError::Rejected {
            message: message.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        BackendError::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound { .. })
    }

    /// The message shown to the user: the backend's own wording when it
    /// supplied any, otherwise the caller's generic fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            BackendError::NotFound { message } | BackendError::Rejected { message }
                if !message.is_empty() =>
            {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

/// The REST-style task backend, consumed only through this interface. Each
/// call stands for a completed round-trip; its effect is applied from the
/// completion callback on the single-threaded event loop.
pub trait TaskBackend {
    fn list_tasks(&self) -> Result<Vec<Task>, BackendError>;
    fn fetch_task(&self, id: &str) -> Result<Task, BackendError>;
    fn create_task(&mut self, draft: &TaskDraft) -> Result<TaskResponse, BackendError>;
    fn update_task(&mut self, id: &str, patch: &TaskPatch) -> Result<TaskResponse, BackendError>;
    fn delete_task(&mut self, id: &str) -> Result<DeleteResponse, BackendError>;
}

const MSG_CREATED: &str = "Task created successfully";
const MSG_UPDATED: &str = "Task updated successfully";
const MSG_DELETED: &str = "Task deleted successfully";
const MSG_NOT_FOUND: &str = "Task not found";

/// In-memory reference backend: the same contract a real server honors,
/// with ulid ids and UTC stamps assigned on write. Doubles as the test
/// collaborator; `fail_next_call` scripts a single failure to exercise the
/// error path.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tasks: Vec<Task>,
    // RefCell so read-only calls can still consume a scripted failure.
    fail_next: RefCell<Option<BackendError>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            fail_next: RefCell::new(None),
        }
    }

    /// Make the next backend call fail with the given error.
    pub fn fail_next_call(&mut self, error: BackendError) {
        *self.fail_next.borrow_mut() = Some(error);
    }

    fn take_scripted_failure(&self) -> Result<(), BackendError> {
        match self.fail_next.borrow_mut().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl TaskBackend for MemoryBackend {
    fn list_tasks(&self) -> Result<Vec<Task>, BackendError> {
        self.take_scripted_failure()?;
        Ok(self.tasks.clone())
    }

    fn fetch_task(&self, id: &str) -> Result<Task, BackendError> {
        self.take_scripted_failure()?;
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| BackendError::not_found(MSG_NOT_FOUND))
    }

    fn create_task(&mut self, draft: &TaskDraft) -> Result<TaskResponse, BackendError> {
        self.take_scripted_failure()?;
        draft
            .require_title()
            .map_err(|err| BackendError::rejected(err.to_string()))?;

        let now = Utc::now();
        let task = Task {
            id: Ulid::new().to_string(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            execution_date_time: draft.execution_date_time.clone(),
            status: draft.status,
            priority: draft.priority,
            created_at: now,
            updated_at: now,
        };
        self.tasks.push(task.clone());

        Ok(TaskResponse {
            task,
            message: MSG_CREATED.to_string(),
        })
    }

    fn update_task(&mut self, id: &str, patch: &TaskPatch) -> Result<TaskResponse, BackendError> {
        self.take_scripted_failure()?;
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| BackendError::not_found(MSG_NOT_FOUND))?;

        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(BackendError::rejected("Task title cannot be empty"));
            }
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = Some(description.clone());
        }
        if let Some(execution) = &patch.execution_date_time {
            task.execution_date_time = execution.clone();
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        task.updated_at = Utc::now();

        Ok(TaskResponse {
            task: task.clone(),
            message: MSG_UPDATED.to_string(),
        })
    }

    fn delete_task(&mut self, id: &str) -> Result<DeleteResponse, BackendError> {
        self.take_scripted_failure()?;
        let position = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| BackendError::not_found(MSG_NOT_FOUND))?;
        self.tasks.remove(position);

        Ok(DeleteResponse {
            message: MSG_DELETED.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskPriority, TaskStatus};
    use pretty_assertions::assert_eq;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            description: None,
            execution_date_time: "2026-08-07T14:30".into(),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
        }
    }

    #[test]
    fn create_assigns_id_and_stamps() {
        let mut backend = MemoryBackend::new();
        let response = backend.create_task(&draft("Write report")).unwrap();

        assert!(!response.task.id.is_empty());
        assert_eq!(response.task.created_at, response.task.updated_at);
        assert_eq!(response.message, "Task created successfully");
        assert_eq!(backend.list_tasks().unwrap().len(), 1);
    }

    #[test]
    fn create_rejects_blank_titles() {
        let mut backend = MemoryBackend::new();
        let err = backend.create_task(&draft("   ")).unwrap_err();
        assert_eq!(err, BackendError::rejected("Task title cannot be empty"));
        assert!(backend.list_tasks().unwrap().is_empty());
    }

    #[test]
    fn update_patches_only_present_fields() {
        let mut backend = MemoryBackend::new();
        let created = backend.create_task(&draft("Write report")).unwrap().task;

        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..TaskPatch::default()
        };
        let updated = backend.update_task(&created.id, &patch).unwrap().task;

        assert_eq!(updated.title, "Write report");
        assert_eq!(updated.status, TaskStatus::Completed);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn missing_ids_surface_not_found() {
        let mut backend = MemoryBackend::new();
        assert!(backend.fetch_task("nope").unwrap_err().is_not_found());
        assert!(backend
            .update_task("nope", &TaskPatch::default())
            .unwrap_err()
            .is_not_found());
        assert!(backend.delete_task("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn scripted_failure_fires_once() {
        let mut backend = MemoryBackend::new();
        backend.fail_next_call(BackendError::unavailable("connection refused"));

        assert!(backend.create_task(&draft("a")).is_err());
        assert!(backend.create_task(&draft("a")).is_ok());
    }

    #[test]
    fn user_message_prefers_the_backend_wording() {
        let rejected = BackendError::rejected("Execution date is in the past");
        assert_eq!(
            rejected.user_message("Failed to create task"),
            "Execution date is in the past"
        );

        let unavailable = BackendError::unavailable("timeout");
        assert_eq!(
            unavailable.user_message("Failed to create task"),
            "Failed to create task"
        );
    }
}
