//! Persistence for workflows, automations and their run history.
//!
//! Everything is stored as JSON arrays under string keys through the
//! [`KeyValueStore`] trait, which mirrors the browser-storage shape the
//! documents originally lived in. [`MemoryStore`] backs tests;
//! [`FileStore`] keeps one JSON file per key under a directory.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::canvas::CanvasState;
use crate::error::StoreError;
use crate::sql::generate_sql;

mod records;

pub use records::{
    Automation, AutomationRun, EmailConfig, ExportConfig, ExportFormat, RunStatus,
    SavedWorkflow, ScheduleConfig, ScheduleFrequency, TriggerConfig, TriggerType,
};

const WORKFLOWS_KEY: &str = "pipewright.workflows";
const AUTOMATIONS_KEY: &str = "pipewright.automations";
const RUNS_KEY: &str = "pipewright.automation_runs";

/// A flat string-keyed blob store. Values are JSON documents.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store, used in tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: ahash::AHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Directory-backed store: each key becomes `<root>/<key>.json`.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens (and creates, if needed) the storage directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::write(self.path_for(key), value).map_err(|source| StoreError::Io {
            key: key.to_string(),
            source,
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// Typed access to the workflow and automation collections on top of any
/// [`KeyValueStore`]. Collections are read-modify-write JSON arrays.
pub struct WorkflowStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> WorkflowStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    fn load_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        match self.backend.get(key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
            None => Ok(Vec::new()),
        }
    }

    fn save_list<T: Serialize>(&mut self, key: &str, list: &[T]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(list).map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })?;
        self.backend.set(key, &raw)
    }

    pub fn workflows(&self) -> Result<Vec<SavedWorkflow>, StoreError> {
        self.load_list(WORKFLOWS_KEY)
    }

    pub fn workflow(&self, id: &str) -> Result<SavedWorkflow, StoreError> {
        self.workflows()?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Inserts or replaces a workflow by id. The SQL preview is regenerated
    /// from the canvas on every save so the stored text never goes stale.
    pub fn save_workflow(&mut self, mut workflow: SavedWorkflow) -> Result<(), StoreError> {
        workflow.generated_sql = generate_sql(&workflow.canvas_state);
        let mut list = self.workflows()?;
        match list.iter_mut().find(|w| w.id == workflow.id) {
            Some(existing) => *existing = workflow,
            None => list.push(workflow),
        }
        debug!(count = list.len(), "saving workflow list");
        self.save_list(WORKFLOWS_KEY, &list)
    }

    pub fn delete_workflow(&mut self, id: &str) -> Result<(), StoreError> {
        let mut list = self.workflows()?;
        let before = list.len();
        list.retain(|w| w.id != id);
        if list.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.save_list(WORKFLOWS_KEY, &list)
    }

    pub fn automations(&self) -> Result<Vec<Automation>, StoreError> {
        self.load_list(AUTOMATIONS_KEY)
    }

    pub fn automation(&self, id: &str) -> Result<Automation, StoreError> {
        self.automations()?
            .into_iter()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn save_automation(&mut self, automation: Automation) -> Result<(), StoreError> {
        let mut list = self.automations()?;
        match list.iter_mut().find(|a| a.id == automation.id) {
            Some(existing) => *existing = automation,
            None => list.push(automation),
        }
        self.save_list(AUTOMATIONS_KEY, &list)
    }

    pub fn delete_automation(&mut self, id: &str) -> Result<(), StoreError> {
        let mut list = self.automations()?;
        let before = list.len();
        list.retain(|a| a.id != id);
        if list.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.save_list(AUTOMATIONS_KEY, &list)
    }

    /// Appends a run record and stamps it as the owning automation's
    /// last run if that automation still exists.
    pub fn record_run(&mut self, run: AutomationRun) -> Result<(), StoreError> {
        let mut runs = self.runs()?;
        runs.push(run.clone());
        self.save_list(RUNS_KEY, &runs)?;

        let mut automations = self.automations()?;
        if let Some(owner) = automations.iter_mut().find(|a| a.id == run.automation_id) {
            owner.last_run = Some(run.started_at.clone());
            self.save_list(AUTOMATIONS_KEY, &automations)?;
        }
        Ok(())
    }

    pub fn runs(&self) -> Result<Vec<AutomationRun>, StoreError> {
        self.load_list(RUNS_KEY)
    }

    pub fn runs_for(&self, automation_id: &str) -> Result<Vec<AutomationRun>, StoreError> {
        Ok(self
            .runs()?
            .into_iter()
            .filter(|r| r.automation_id == automation_id)
            .collect())
    }
}

/// A workflow store builder for a one-liner file-backed setup.
impl WorkflowStore<FileStore> {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Ok(Self::new(FileStore::open(root)?))
    }
}

impl Default for WorkflowStore<MemoryStore> {
    fn default() -> Self {
        Self::new(MemoryStore::new())
    }
}

/// Convenience constructor for a fresh workflow record.
pub fn new_workflow(
    id: impl Into<String>,
    name: impl Into<String>,
    canvas_state: CanvasState,
    timestamp: impl Into<String>,
) -> SavedWorkflow {
    let timestamp = timestamp.into();
    SavedWorkflow {
        id: id.into(),
        name: name.into(),
        description: None,
        created_at: timestamp.clone(),
        updated_at: timestamp,
        canvas_state,
        generated_sql: String::new(),
    }
}
