// Task store over a key-value backend

use crate::backend::Backend;
use crate::error::{LoadFailure, StoreError};
use crate::models::{NewTask, Task, TaskUpdate};
use crate::snapshot;
use crate::validation::validate_text;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Key holding the serialized collection unless overridden
pub const DEFAULT_KEY: &str = "vibes-todos";

const PROBE_KEY: &str = "todostore-probe";
const PROBE_KEY_ALT: &str = "todostore-probe-alt";

type Clock = Box<dyn Fn() -> DateTime<Utc>>;
type LoadFailureHook = Box<dyn Fn(&LoadFailure)>;

/// Sole owner of the persisted task collection
///
/// The backend is the source of truth: every operation re-reads the full
/// collection and every mutation writes it back whole. Construct one store per
/// backend and hand it to the collaborators that need it.
pub struct TodoStore<B: Backend> {
    backend: B,
    key: String,
    clock: Clock,
    on_load_failure: LoadFailureHook,
}

impl<B: Backend> TodoStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            key: DEFAULT_KEY.to_string(),
            clock: Box::new(Utc::now),
            on_load_failure: Box::new(|failure: &LoadFailure| warn!(%failure, "Falling back to empty task list")),
        }
    }

    /// Use a different backend key for the collection
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Replace the time source used for timestamps
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Called whenever `get_all` degrades to an empty collection
    pub fn on_load_failure(mut self, hook: impl Fn(&LoadFailure) + 'static) -> Self {
        self.on_load_failure = Box::new(hook);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// All tasks in insertion order, oldest first
    ///
    /// Never fails: a backend fault or corrupt data yields an empty list and
    /// is reported through the load-failure hook.
    pub fn get_all(&self) -> Vec<Task> {
        let raw = match self.backend.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                (self.on_load_failure)(&LoadFailure::Read {
                    key: self.key.clone(),
                    message: format!("{:#}", e),
                });
                return Vec::new();
            }
        };

        match snapshot::decode(&raw) {
            Ok(tasks) => tasks,
            Err(e) => {
                (self.on_load_failure)(&LoadFailure::Corrupt {
                    key: self.key.clone(),
                    message: e.to_string(),
                });
                Vec::new()
            }
        }
    }

    /// Look up a single task
    pub fn get(&self, id: &str) -> Option<Task> {
        self.get_all().into_iter().find(|t| t.id == id)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add an incomplete task
    pub fn add(&mut self, text: &str) -> Result<Task, StoreError> {
        self.add_with(NewTask::new(text))
    }

    /// Add a task with an explicit initial completion state
    pub fn add_with(&mut self, new: NewTask) -> Result<Task, StoreError> {
        let text = validate_text(&new.text)?;

        let mut tasks = self.get_all();
        let now = (self.clock)();
        let task = Task {
            id: Self::generate_id(&tasks),
            text: text.to_string(),
            completed: new.completed,
            created_at: now,
            updated_at: now,
        };

        tasks.push(task.clone());
        self.persist(&tasks)?;

        info!(id = %task.id, completed = task.completed, "Added task");
        Ok(task)
    }

    /// Merge `update` into the task with `id`
    ///
    /// Text is validated before anything is read. Completed tasks may still be
    /// edited; refusing that is left to the caller.
    pub fn update(&mut self, id: &str, update: TaskUpdate) -> Result<Task, StoreError> {
        let text = match update.text.as_deref() {
            Some(text) => Some(validate_text(text)?.to_string()),
            None => None,
        };

        let mut tasks = self.get_all();
        let now = (self.clock)();

        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(text) = text {
            task.text = text;
        }
        if let Some(completed) = update.completed {
            task.completed = completed;
        }
        task.updated_at = now.max(task.created_at);

        let updated = task.clone();
        self.persist(&tasks)?;

        debug!(id, completed = updated.completed, "Updated task");
        Ok(updated)
    }

    /// Remove the task with `id`, returning it
    pub fn delete(&mut self, id: &str) -> Result<Task, StoreError> {
        let mut tasks = self.get_all();

        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = tasks.remove(index);

        self.persist(&tasks)?;

        info!(id, "Deleted task");
        Ok(removed)
    }

    /// Flip the completion state of the task with `id`
    pub fn toggle(&mut self, id: &str) -> Result<Task, StoreError> {
        let current = self.get(id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.update(id, TaskUpdate::completed(!current.completed))
    }

    /// Remove the whole persisted collection
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.backend.remove(&self.key).map_err(|e| {
            warn!(key = %self.key, error = ?e, "Failed to clear tasks");
            StoreError::Persistence("Failed to clear todos from storage".to_string())
        })?;

        info!(key = %self.key, "Cleared all tasks");
        Ok(())
    }

    // ========================================================================
    // Availability
    // ========================================================================

    /// Whether the backend accepts a write, read-back, and removal
    pub fn is_available(&mut self) -> bool {
        match self.probe() {
            Ok(available) => available,
            Err(e) => {
                debug!(error = ?e, "Storage probe failed");
                false
            }
        }
    }

    /// Probe key, never the collection's own key
    fn probe_key(&self) -> &'static str {
        if self.key == PROBE_KEY { PROBE_KEY_ALT } else { PROBE_KEY }
    }

    fn probe(&mut self) -> eyre::Result<bool> {
        let key = self.probe_key();
        self.backend.write(key, PROBE_KEY)?;

        // Remove on every path once the write landed
        let echoed = self.backend.read(key);
        let removed = self.backend.remove(key);

        let echoed = echoed?;
        removed?;
        Ok(echoed.as_deref() == Some(PROBE_KEY))
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn persist(&mut self, tasks: &[Task]) -> Result<(), StoreError> {
        let raw = snapshot::encode(tasks).map_err(|e| {
            warn!(error = ?e, "Failed to serialize tasks");
            StoreError::Persistence("Failed to serialize todos".to_string())
        })?;

        self.backend.write(&self.key, &raw).map_err(|e| {
            warn!(key = %self.key, error = ?e, "Failed to save tasks");
            StoreError::Persistence("Failed to save todos to storage".to_string())
        })
    }

    /// Time-ordered id, re-drawn on the off chance it collides
    fn generate_id(existing: &[Task]) -> String {
        loop {
            let id = format!("todo-{}", Uuid::now_v7().simple());
            if !existing.iter().any(|t| t.id == id) {
                return id;
            }
        }
    }
}
