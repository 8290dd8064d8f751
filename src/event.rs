use serde::{Deserialize, Serialize};

use crate::model::Task;

/// An event pushed by the server over the persistent channel, independent of
/// any request/response call. Each carries the full task record.
///
/// The channel only announces creates and updates. Deletions are observed
/// solely through the local delete confirmation, so a task removed by
/// another session stays visible here until a fresh session refetches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum PushEvent {
    TaskCreated(Task),
    TaskUpdated(Task),
}

impl PushEvent {
    pub fn task(&self) -> &Task {
        match self {
            PushEvent::TaskCreated(task) | PushEvent::TaskUpdated(task) => task,
        }
    }
}
