use tracing::debug;

use crate::model::Task;

/// Single source of truth for the in-memory task collection. Three writers
/// feed it: the initial list fetch, push-channel events, and confirmed local
/// mutations. Entries are keyed by task id and kept in insertion order;
/// presentation order is always recomputed downstream, never stored here.
///
/// Every operation is an infallible structural edit. Idempotence against
/// duplicate or out-of-order delivery rests on the id-presence checks, not
/// on sequence numbers or timestamps.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    hydrated: bool,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the store contents with the fetched snapshot, but only on
    /// the first call that carries a non-empty sequence. Later fetch results
    /// are ignored so they cannot clobber entries already merged in from
    /// push events. An empty result does not consume the one-shot.
    pub fn hydrate(&mut self, tasks: Vec<Task>) {
        if self.hydrated {
            debug!(count = tasks.len(), "store already hydrated, fetch result ignored");
            return;
        }
        if tasks.is_empty() {
            return;
        }
        self.tasks = tasks;
        self.hydrated = true;
    }

    /// Insert a freshly created task unless an entry with the same id is
    /// already present. Duplicate delivery (a push event racing the local
    /// create confirmation, or channel redelivery) is a no-op. Returns
    /// whether the task was inserted.
    pub fn apply_created(&mut self, task: Task) -> bool {
        if self.tasks.iter().any(|t| t.id == task.id) {
            debug!(id = task.id.as_str(), "duplicate create ignored");
            return false;
        }
        self.tasks.push(task);
        true
    }

    /// Replace the entry matching the task's id in place, preserving its
    /// collection position. Unknown ids are inserted as new, since an
    /// update originating from another session may precede any create this
    /// client ever saw. Returns whether an existing entry was replaced.
    pub fn apply_updated(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => {
                *existing = task;
                true
            }
            None => {
                debug!(id = task.id.as_str(), "update for unknown task, inserting");
                self.tasks.push(task);
                false
            }
        }
    }

    /// Remove the entry with the given id, if present. Returns whether an
    /// entry was removed.
    pub fn apply_deleted(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        before != self.tasks.len()
    }

    /// The current collection in insertion order.
    pub fn snapshot(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskPriority, TaskStatus};
    use pretty_assertions::assert_eq;

    fn task(id: &str) -> Task {
        let now = chrono::Utc::now();
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            description: None,
            execution_date_time: "2026-08-07T14:30".into(),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            created_at: now,
            updated_at: now,
        }
    }

    fn ids(store: &TaskStore) -> Vec<&str> {
        store.snapshot().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn hydrate_applies_only_the_first_non_empty_result() {
        let mut store = TaskStore::new();

        store.hydrate(Vec::new());
        assert!(store.is_empty());

        store.hydrate(vec![task("a"), task("b")]);
        assert_eq!(ids(&store), vec!["a", "b"]);

        store.hydrate(vec![task("c")]);
        assert_eq!(ids(&store), vec!["a", "b"]);
    }

    #[test]
    fn empty_hydrate_does_not_consume_the_one_shot() {
        let mut store = TaskStore::new();
        store.hydrate(Vec::new());
        store.hydrate(vec![task("a")]);
        assert_eq!(ids(&store), vec!["a"]);
    }

    #[test]
    fn repeated_creates_with_one_id_keep_a_single_entry() {
        let mut store = TaskStore::new();
        assert!(store.apply_created(task("a")));
        assert!(!store.apply_created(task("a")));
        assert!(!store.apply_created(task("a")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_replaces_in_place_and_keeps_position() {
        let mut store = TaskStore::new();
        store.hydrate(vec![task("a"), task("b"), task("c")]);

        let mut revised = task("b");
        revised.title = "Renamed".into();
        assert!(store.apply_updated(revised));

        assert_eq!(ids(&store), vec!["a", "b", "c"]);
        assert_eq!(store.get("b").unwrap().title, "Renamed");
    }

    #[test]
    fn update_for_unknown_id_upserts() {
        let mut store = TaskStore::new();
        store.apply_created(task("a"));

        assert!(!store.apply_updated(task("z")));
        assert_eq!(ids(&store), vec!["a", "z"]);
    }

    #[test]
    fn delete_of_absent_id_is_a_no_op() {
        let mut store = TaskStore::new();
        store.apply_created(task("a"));

        assert!(!store.apply_deleted("missing"));
        assert_eq!(ids(&store), vec!["a"]);

        assert!(store.apply_deleted("a"));
        assert!(store.is_empty());
    }
}
