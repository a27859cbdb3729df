// Data models for TodoStore

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single to-do record
///
/// Serialized with camelCase keys and ISO-8601 timestamps. Records persisted
/// without `updatedAt` load with `updated_at` equal to `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PersistedTask")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// On-disk shape, tolerant of older records
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedTask {
    id: String,
    text: String,
    #[serde(default)]
    completed: bool,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl From<PersistedTask> for Task {
    fn from(raw: PersistedTask) -> Self {
        // updated_at never precedes created_at
        let updated_at = raw.updated_at.map_or(raw.created_at, |u| u.max(raw.created_at));
        Self {
            id: raw.id,
            text: raw.text,
            completed: raw.completed,
            created_at: raw.created_at,
            updated_at,
        }
    }
}

impl Task {
    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl NewTask {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskUpdate {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            text: None,
            completed: Some(completed),
        }
    }

    /// Check if any fields are set
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }
}
