use crate::task::Task;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

/// Projects the subset of tasks the active filter shows, preserving the
/// source order.
pub fn visible(tasks: &[Task], filter: StatusFilter) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| match filter {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

pub fn stats(tasks: &[Task]) -> Stats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let percentage = if total > 0 {
        (completed as f64 / total as f64 * 100.0).round() as u32
    } else {
        0
    };

    Stats {
        completed,
        total,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{StatusFilter, stats, visible};
    use crate::task::{Category, Task};

    fn fixture(completed: &[bool]) -> Vec<Task> {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        completed
            .iter()
            .enumerate()
            .map(|(idx, done)| {
                let mut task = Task::new(format!("task {idx}"), Category::None, now);
                task.completed = *done;
                task
            })
            .collect()
    }

    #[test]
    fn all_filter_returns_the_input_list() {
        let tasks = fixture(&[false, true, false]);
        let rows = visible(&tasks, StatusFilter::All);
        assert_eq!(rows.len(), 3);
        for (row, task) in rows.iter().zip(&tasks) {
            assert_eq!(*row, task);
        }
    }

    #[test]
    fn active_never_contains_completed_and_vice_versa() {
        let tasks = fixture(&[false, true, true, false]);

        let active = visible(&tasks, StatusFilter::Active);
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|task| !task.completed));

        let completed = visible(&tasks, StatusFilter::Completed);
        assert_eq!(completed.len(), 2);
        assert!(completed.iter().all(|task| task.completed));
    }

    #[test]
    fn visible_preserves_source_order() {
        let tasks = fixture(&[false, true, false, true, false]);
        let active = visible(&tasks, StatusFilter::Active);
        let texts: Vec<&str> = active.iter().map(|task| task.text.as_str()).collect();
        assert_eq!(texts, vec!["task 0", "task 2", "task 4"]);
    }

    #[test]
    fn stats_of_empty_list_is_zero_percent() {
        let result = stats(&[]);
        assert_eq!(result.completed, 0);
        assert_eq!(result.total, 0);
        assert_eq!(result.percentage, 0);
    }

    #[test]
    fn stats_rounds_the_completion_ratio() {
        let half = stats(&fixture(&[true, false]));
        assert_eq!(half.completed, 1);
        assert_eq!(half.total, 2);
        assert_eq!(half.percentage, 50);

        let third = stats(&fixture(&[true, false, false]));
        assert_eq!(third.percentage, 33);

        let two_thirds = stats(&fixture(&[true, true, false]));
        assert_eq!(two_thirds.percentage, 67);
    }

    #[test]
    fn filter_names_parse_and_unknown_is_rejected() {
        assert_eq!(StatusFilter::parse("all"), Some(StatusFilter::All));
        assert_eq!(StatusFilter::parse("Active"), Some(StatusFilter::Active));
        assert_eq!(
            StatusFilter::parse("COMPLETED"),
            Some(StatusFilter::Completed)
        );
        assert_eq!(StatusFilter::parse("done"), None);
    }
}
