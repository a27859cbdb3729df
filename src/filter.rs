// Filtering and counting for task collections

use crate::models::Task;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which subset of tasks to show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterMode {
    /// Parse a mode name; unrecognized names fall back to `All`
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => FilterMode::Active,
            "completed" => FilterMode::Completed,
            _ => FilterMode::All,
        }
    }

    /// Whether a task is visible under this mode
    pub fn matches(self, task: &Task) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Active => task.is_active(),
            FilterMode::Completed => task.completed,
        }
    }
}

impl FromStr for FilterMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::All => write!(f, "all"),
            FilterMode::Active => write!(f, "active"),
            FilterMode::Completed => write!(f, "completed"),
        }
    }
}

/// Per-mode task counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCounts {
    pub all: usize,
    pub active: usize,
    pub completed: usize,
}

impl FilterCounts {
    pub fn get(&self, mode: FilterMode) -> usize {
        match mode {
            FilterMode::All => self.all,
            FilterMode::Active => self.active,
            FilterMode::Completed => self.completed,
        }
    }
}

/// Select the tasks visible under `mode`, preserving order
pub fn filter(tasks: &[Task], mode: FilterMode) -> Vec<Task> {
    tasks.iter().filter(|t| mode.matches(t)).cloned().collect()
}

/// Count tasks per filter mode
pub fn counts(tasks: &[Task]) -> FilterCounts {
    let completed = tasks.iter().filter(|t| t.completed).count();
    FilterCounts {
        all: tasks.len(),
        active: tasks.len() - completed,
        completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: &str, completed: bool) -> Task {
        let ts = Utc::now();
        Task {
            id: id.to_string(),
            text: format!("Task {}", id),
            completed,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn sample() -> Vec<Task> {
        vec![task("a", false), task("b", true), task("c", false), task("d", true)]
    }

    #[test]
    fn test_filter_all_returns_input() {
        let tasks = sample();
        assert_eq!(filter(&tasks, FilterMode::All), tasks);
    }

    #[test]
    fn test_filter_active_and_completed() {
        let tasks = sample();

        let active: Vec<_> = filter(&tasks, FilterMode::Active).into_iter().map(|t| t.id).collect();
        assert_eq!(active, vec!["a", "c"]);

        let done: Vec<_> = filter(&tasks, FilterMode::Completed).into_iter().map(|t| t.id).collect();
        assert_eq!(done, vec!["b", "d"]);
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let tasks = sample();
        let before = tasks.clone();
        let _ = filter(&tasks, FilterMode::Completed);
        assert_eq!(tasks, before);
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!("active".parse::<FilterMode>().unwrap(), FilterMode::Active);
        assert_eq!(FilterMode::parse_lenient("Completed"), FilterMode::Completed);
        assert_eq!(FilterMode::parse_lenient("all"), FilterMode::All);
        assert_eq!(FilterMode::parse_lenient("archived"), FilterMode::All);
        assert_eq!(FilterMode::parse_lenient(""), FilterMode::All);
    }

    #[test]
    fn test_filter_mode_display() {
        assert_eq!(FilterMode::All.to_string(), "all");
        assert_eq!(FilterMode::Active.to_string(), "active");
        assert_eq!(FilterMode::Completed.to_string(), "completed");
    }

    #[test]
    fn test_counts() {
        let c = counts(&sample());
        assert_eq!(c, FilterCounts { all: 4, active: 2, completed: 2 });
        assert_eq!(c.get(FilterMode::Active), 2);
        assert_eq!(counts(&[]), FilterCounts::default());
    }
}
