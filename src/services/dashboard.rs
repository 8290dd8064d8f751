use tracing::{debug, warn};

use crate::backend::TaskBackend;
use crate::config::AppConfig;
use crate::event::PushEvent;
use crate::model::{Task, TaskDraft, TaskPatch};
use crate::store::TaskStore;
use crate::view::{self, Projection, ViewQuery, PAGE_SIZE_OPTIONS};

const FALLBACK_LOAD: &str = "Failed to load tasks";
const FALLBACK_CREATE: &str = "Failed to create task";
const FALLBACK_UPDATE: &str = "Failed to update task";
const FALLBACK_DELETE: &str = "Failed to delete task";
const DETAIL_NOT_FOUND: &str = "The task you are looking for does not exist.";

/// A success/failure signal for the notification side channel. How it is
/// rendered (toast, status bar) is the embedder's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Presentation state for the single-task page: the record, or a
/// not-found panel with the message to show. An absent task is a normal
/// outcome here, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskDetail {
    Found(Task),
    NotFound { message: String },
}

/// Routes user intents into store mutations and backend calls, and owns
/// everything the table needs: the reconciled task collection, the view
/// query (search, sort toggle, page, page size), the latest notice, and the
/// load failure, if any.
///
/// All mutation entry points funnel through the owned [`TaskStore`]; the
/// push-channel collaborator drives [`Self::on_task_created`] and
/// [`Self::on_task_updated`], and performs its own subscription mechanics.
/// Backend failures never touch the store; they surface as error notices
/// carrying the backend's message or a generic fallback.
pub struct DashboardService<B: TaskBackend> {
    backend: B,
    store: TaskStore,
    query: ViewQuery,
    notice: Option<Notice>,
    load_error: Option<String>,
}

impl<B: TaskBackend> DashboardService<B> {
    pub fn new(config: &AppConfig, backend: B) -> Self {
        Self {
            backend,
            store: TaskStore::new(),
            query: ViewQuery::new(config.default_page_size()),
            notice: None,
            load_error: None,
        }
    }

    /// Fetch the task list and hydrate the store. Only the first non-empty
    /// result ever lands (see [`TaskStore::hydrate`]); calling this again
    /// later will not resynchronize entries changed while disconnected.
    pub fn load(&mut self) {
        match self.backend.list_tasks() {
            Ok(tasks) => {
                debug!(count = tasks.len(), "task list fetched");
                self.load_error = None;
                self.store.hydrate(tasks);
            }
            Err(err) => {
                warn!(error = %err, "task list fetch failed");
                self.load_error = Some(err.user_message(FALLBACK_LOAD));
            }
        }
    }

    /// The page the table renders right now.
    pub fn projection(&self) -> Projection {
        view::project(self.store.snapshot(), &self.query)
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.snapshot()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Consume the pending notice, if any.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.query.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.page = page.max(1);
    }

    /// Switch the page size. Values outside [`PAGE_SIZE_OPTIONS`] are
    /// ignored; the pickers only offer the fixed set.
    pub fn set_page_size(&mut self, page_size: usize) {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            debug!(page_size, "ignoring page size outside the allowed set");
            return;
        }
        self.query.page_size = page_size;
        self.query.page = 1;
    }

    pub fn toggle_priority_sort(&mut self) {
        self.query.sort_by_priority = !self.query.sort_by_priority;
    }

    /// Create a task. On success the confirmed record is merged into the
    /// store (a no-op if the push event for it arrived first) and the
    /// backend's message becomes an info notice.
    pub fn submit_create(&mut self, draft: TaskDraft) {
        if let Err(err) = draft.require_title() {
            self.set_notice_error(err.to_string());
            return;
        }

        match self.backend.create_task(&draft) {
            Ok(response) => {
                self.store.apply_created(response.task);
                self.set_notice_info(response.message);
            }
            Err(err) => {
                warn!(error = %err, "create failed");
                self.set_notice_error(err.user_message(FALLBACK_CREATE));
            }
        }
    }

    pub fn submit_update(&mut self, id: &str, patch: TaskPatch) {
        match self.backend.update_task(id, &patch) {
            Ok(response) => {
                self.store.apply_updated(response.task);
                self.set_notice_info(response.message);
            }
            Err(err) => {
                warn!(id, error = %err, "update failed");
                self.set_notice_error(err.user_message(FALLBACK_UPDATE));
            }
        }
    }

    /// Delete a task. When the confirmed delete empties the current page
    /// and a prior page exists, step back one page so the table never shows
    /// an empty window with content before it.
    pub fn submit_delete(&mut self, id: &str) {
        let last_on_page = self.projection().visible_tasks.len() == 1 && self.query.page > 1;

        match self.backend.delete_task(id) {
            Ok(response) => {
                self.store.apply_deleted(id);
                self.set_notice_info(response.message);
                if last_on_page {
                    self.query.page -= 1;
                }
            }
            Err(err) => {
                warn!(id, error = %err, "delete failed");
                self.set_notice_error(err.user_message(FALLBACK_DELETE));
            }
        }
    }

    /// Fetch a single task for the detail page. An absent task becomes the
    /// not-found presentation state with the backend's message, or a stock
    /// line when the backend supplied none.
    pub fn task_detail(&self, id: &str) -> TaskDetail {
        match self.backend.fetch_task(id) {
            Ok(task) => TaskDetail::Found(task),
            Err(err) => TaskDetail::NotFound {
                message: err.user_message(DETAIL_NOT_FOUND),
            },
        }
    }

    /// Push-channel handler for `taskCreated`. Idempotent against the
    /// local create confirmation landing first.
    pub fn on_task_created(&mut self, task: Task) {
        self.store.apply_created(task);
    }

    /// Push-channel handler for `taskUpdated`. Upserts when this client
    /// never saw the corresponding create.
    pub fn on_task_updated(&mut self, task: Task) {
        self.store.apply_updated(task);
    }

    pub fn apply_push(&mut self, event: PushEvent) {
        match event {
            PushEvent::TaskCreated(task) => self.on_task_created(task),
            PushEvent::TaskUpdated(task) => self.on_task_updated(task),
        }
    }

    fn set_notice_info(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice {
            message: message.into(),
            kind: NoticeKind::Info,
        });
    }

    fn set_notice_error(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice {
            message: message.into(),
            kind: NoticeKind::Error,
        });
    }
}
