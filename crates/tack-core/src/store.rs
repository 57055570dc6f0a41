use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::task::{Category, Task};

pub const SLOT_FILE: &str = "tasks.json";

#[derive(Debug, Error)]
pub enum AddError {
    #[error("task text cannot be empty")]
    EmptyText,
    #[error(transparent)]
    Persist(#[from] anyhow::Error),
}

/// Owns the task list and its persistence slot. Every mutation rewrites the
/// whole slot before returning.
#[derive(Debug)]
pub struct TaskStore {
    slot_path: PathBuf,
    tasks: Vec<Task>,
    recovered: bool,
}

impl TaskStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let slot_path = data_dir.join(SLOT_FILE);
        let (tasks, recovered) = load_slot(&slot_path);

        info!(
            slot = %slot_path.display(),
            count = tasks.len(),
            recovered,
            "opened task store"
        );

        Ok(Self {
            slot_path,
            tasks,
            recovered,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn recovered_from_corruption(&self) -> bool {
        self.recovered
    }

    #[tracing::instrument(skip(self, text))]
    pub fn add(
        &mut self,
        text: &str,
        category: Category,
        now: DateTime<Utc>,
    ) -> Result<Task, AddError> {
        let text = text.trim();
        if text.is_empty() {
            debug!("rejected empty task text");
            return Err(AddError::EmptyText);
        }

        let task = Task::new(text.to_string(), category, now);
        self.tasks.push(task.clone());
        self.persist()?;

        debug!(id = %task.id, count = self.tasks.len(), "task added");
        Ok(task)
    }

    /// Flips completion on the matching task and returns the new value.
    /// Unknown ids are a silent no-op; the slot is not rewritten.
    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn toggle(&mut self, id: Uuid) -> anyhow::Result<Option<bool>> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("toggle on unknown id; no-op");
            return Ok(None);
        };

        task.completed = !task.completed;
        let completed = task.completed;
        self.persist()?;
        Ok(Some(completed))
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn delete(&mut self, id: Uuid) -> anyhow::Result<Option<Task>> {
        let Some(idx) = self.tasks.iter().position(|task| task.id == id) else {
            debug!("delete on unknown id; no-op");
            return Ok(None);
        };

        let removed = self.tasks.remove(idx);
        self.persist()?;
        debug!(count = self.tasks.len(), "task deleted");
        Ok(Some(removed))
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn set_category(&mut self, id: Uuid, category: Category) -> anyhow::Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("set_category on unknown id; no-op");
            return Ok(false);
        };

        task.category = category;
        self.persist()?;
        Ok(true)
    }

    #[tracing::instrument(skip(self))]
    fn persist(&self) -> anyhow::Result<()> {
        save_slot_atomic(&self.slot_path, &self.tasks)
            .with_context(|| format!("failed to save {}", self.slot_path.display()))
    }
}

/// Missing slot starts empty; unreadable or unparseable content also starts
/// empty but is reported through the second value so a recovery notice can
/// be surfaced.
fn load_slot(path: &Path) -> (Vec<Task>, bool) {
    if !path.exists() {
        debug!(slot = %path.display(), "no slot file; starting empty");
        return (Vec::new(), false);
    }

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(slot = %path.display(), error = %err, "slot unreadable; starting empty");
            return (Vec::new(), true);
        }
    };

    match serde_json::from_str::<Vec<Task>>(&raw) {
        Ok(tasks) => {
            debug!(count = tasks.len(), "loaded tasks from slot");
            (tasks, false)
        }
        Err(err) => {
            warn!(slot = %path.display(), error = %err, "slot unparseable; starting empty");
            (Vec::new(), true)
        }
    }
}

#[tracing::instrument(skip(path, tasks))]
fn save_slot_atomic(path: &Path, tasks: &[Task]) -> anyhow::Result<()> {
    debug!(slot = %path.display(), count = tasks.len(), "saving slot atomically");

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    let serialized = serde_json::to_string(tasks)?;
    temp.write_all(serialized.as_bytes())?;
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}
