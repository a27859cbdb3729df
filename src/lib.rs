// TodoStore - Validated task-list persistence over a key-value backend

pub mod backend;
pub mod config;
pub mod error;
pub mod file;
pub mod filter;
pub mod models;
pub mod outcome;
pub mod snapshot;
pub mod sqlite;
pub mod store;
pub mod validation;

// Re-export main types for convenience
pub use backend::{Backend, MemoryBackend};
pub use config::{BackendKind, Config};
pub use error::{LoadFailure, StoreError};
pub use file::FileBackend;
pub use filter::{FilterCounts, FilterMode, counts, filter};
pub use models::{NewTask, Task, TaskUpdate};
pub use outcome::Outcome;
pub use sqlite::SqliteBackend;
pub use store::{DEFAULT_KEY, TodoStore};
pub use validation::{MAX_TEXT_LEN, ValidationError, validate_text};
