pub mod dashboard;

pub use dashboard::{DashboardService, Notice, NoticeKind, TaskDetail};
