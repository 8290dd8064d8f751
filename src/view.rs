use crate::model::Task;

pub const PAGE_SIZE_OPTIONS: [usize; 5] = [5, 10, 20, 50, 100];
pub const PAGE_SIZE_DEFAULT: usize = 10;

/// How many page buttons are shown before the window collapses to an
/// ellipsis on either side.
const MAX_VISIBLE_PAGES: usize = 5;

/// UI-controlled inputs the projection is derived from. The engine owns one
/// of these per dashboard; the reset rules (search or page-size changes snap
/// back to page 1) are applied by the dashboard, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    pub sort_by_priority: bool,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl ViewQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            sort_by_priority: true,
            page: 1,
            page_size,
        }
    }
}

/// What the table renders: the visible slice plus the pagination totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub visible_tasks: Vec<Task>,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Derive the visible page from a store snapshot: case-insensitive substring
/// filter over title and status, stable priority-descending sort (ties keep
/// snapshot order), then the requested page window clamped to what exists.
pub fn project(tasks: &[Task], query: &ViewQuery) -> Projection {
    let needle = query.search.to_lowercase();
    let mut filtered: Vec<&Task> = tasks
        .iter()
        .filter(|task| {
            task.title.to_lowercase().contains(&needle) || task.status.as_str().contains(&needle)
        })
        .collect();

    if query.sort_by_priority {
        filtered.sort_by(|a, b| b.priority.weight().cmp(&a.priority.weight()));
    }

    let total_items = filtered.len();
    let total_pages = total_items.div_ceil(query.page_size);
    let start = query.page.saturating_sub(1) * query.page_size;
    let visible_tasks = filtered
        .into_iter()
        .skip(start)
        .take(query.page_size)
        .cloned()
        .collect();

    Projection {
        visible_tasks,
        total_pages,
        total_items,
    }
}

/// One entry in the pagination strip: a numbered button or an ellipsis gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(usize),
    Ellipsis,
}

/// The windowed sequence of page buttons. Up to five pages render in full;
/// beyond that the window keeps the first page, the last page, and the
/// neighborhood of the current page, with ellipsis gaps between.
pub fn page_numbers(current: usize, total: usize) -> Vec<PageToken> {
    let mut pages = Vec::new();

    if total <= MAX_VISIBLE_PAGES {
        for page in 1..=total {
            pages.push(PageToken::Page(page));
        }
        return pages;
    }

    if current <= 3 {
        for page in 1..=4 {
            pages.push(PageToken::Page(page));
        }
        pages.push(PageToken::Ellipsis);
        pages.push(PageToken::Page(total));
    } else if current >= total - 2 {
        pages.push(PageToken::Page(1));
        pages.push(PageToken::Ellipsis);
        for page in (total - 3)..=total {
            pages.push(PageToken::Page(page));
        }
    } else {
        pages.push(PageToken::Page(1));
        pages.push(PageToken::Ellipsis);
        for page in (current - 1)..=(current + 1) {
            pages.push(PageToken::Page(page));
        }
        pages.push(PageToken::Ellipsis);
        pages.push(PageToken::Page(total));
    }

    pages
}

/// 1-based bounds of the visible rows for the "Results: X - Y of Z" line.
/// An empty result set reports `(0, 0)`.
pub fn item_range(current: usize, page_size: usize, total_items: usize) -> (usize, usize) {
    if total_items == 0 {
        return (0, 0);
    }
    let start = (current - 1) * page_size + 1;
    let end = (current * page_size).min(total_items);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskPriority, TaskStatus};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn task(id: &str, title: &str, status: TaskStatus, priority: TaskPriority) -> Task {
        let now = chrono::Utc::now();
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            execution_date_time: "2026-08-07T14:30".into(),
            status,
            priority,
            created_at: now,
            updated_at: now,
        }
    }

    fn numbered(count: usize) -> Vec<Task> {
        (1..=count)
            .map(|n| {
                task(
                    &format!("t{n}"),
                    &format!("Task {n}"),
                    TaskStatus::Pending,
                    TaskPriority::Medium,
                )
            })
            .collect()
    }

    fn visible_ids(projection: &Projection) -> Vec<&str> {
        projection
            .visible_tasks
            .iter()
            .map(|t| t.id.as_str())
            .collect()
    }

    #[test]
    fn filter_matches_title_and_status_case_insensitively() {
        let tasks = vec![
            task("1", "Write weekly report", TaskStatus::Pending, TaskPriority::Low),
            task("2", "Fix login bug", TaskStatus::Completed, TaskPriority::Low),
        ];

        let mut query = ViewQuery::new(10);
        query.search = "PEND".into();
        let projection = project(&tasks, &query);
        assert_eq!(visible_ids(&projection), vec!["1"]);

        query.search = "LOGIN".into();
        let projection = project(&tasks, &query);
        assert_eq!(visible_ids(&projection), vec!["2"]);

        query.search = String::new();
        let projection = project(&tasks, &query);
        assert_eq!(projection.total_items, 2);
    }

    #[test]
    fn sort_is_priority_descending_and_stable() {
        let tasks = vec![
            task("1", "a", TaskStatus::Pending, TaskPriority::Low),
            task("2", "b", TaskStatus::Pending, TaskPriority::High),
            task("3", "c", TaskStatus::Pending, TaskPriority::High),
        ];

        let projection = project(&tasks, &ViewQuery::new(10));
        assert_eq!(visible_ids(&projection), vec!["2", "3", "1"]);
    }

    #[test]
    fn sort_toggle_off_keeps_snapshot_order() {
        let tasks = vec![
            task("1", "a", TaskStatus::Pending, TaskPriority::Low),
            task("2", "b", TaskStatus::Pending, TaskPriority::High),
        ];

        let mut query = ViewQuery::new(10);
        query.sort_by_priority = false;
        let projection = project(&tasks, &query);
        assert_eq!(visible_ids(&projection), vec!["1", "2"]);
    }

    #[rstest]
    #[case(23, 10, 1, 10, 3)]
    #[case(23, 10, 3, 3, 3)]
    #[case(5, 5, 1, 5, 1)]
    #[case(0, 10, 1, 0, 0)]
    #[case(7, 20, 9, 0, 1)]
    fn pagination_math(
        #[case] total: usize,
        #[case] page_size: usize,
        #[case] page: usize,
        #[case] expected_visible: usize,
        #[case] expected_pages: usize,
    ) {
        let tasks = numbered(total);
        let mut query = ViewQuery::new(page_size);
        query.page = page;

        let projection = project(&tasks, &query);
        assert_eq!(projection.visible_tasks.len(), expected_visible);
        assert_eq!(projection.total_pages, expected_pages);
        assert_eq!(projection.total_items, total);
    }

    #[test]
    fn page_window_slices_in_order() {
        let tasks = numbered(23);
        let mut query = ViewQuery::new(10);
        query.page = 3;

        let projection = project(&tasks, &query);
        assert_eq!(visible_ids(&projection), vec!["t21", "t22", "t23"]);
    }

    #[test]
    fn page_numbers_render_all_when_few() {
        use PageToken::*;
        assert_eq!(page_numbers(1, 3), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(page_numbers(2, 5).len(), 5);
        assert!(page_numbers(1, 0).is_empty());
    }

    #[test]
    fn page_numbers_collapse_around_the_current_page() {
        use PageToken::*;
        assert_eq!(
            page_numbers(2, 9),
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(9)]
        );
        assert_eq!(
            page_numbers(8, 9),
            vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9)]
        );
        assert_eq!(
            page_numbers(5, 9),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(9)]
        );
    }

    #[rstest]
    #[case(1, 10, 23, 1, 10)]
    #[case(3, 10, 23, 21, 23)]
    #[case(1, 10, 0, 0, 0)]
    fn item_range_bounds(
        #[case] page: usize,
        #[case] page_size: usize,
        #[case] total: usize,
        #[case] start: usize,
        #[case] end: usize,
    ) {
        assert_eq!(item_range(page, page_size, total), (start, end));
    }
}
