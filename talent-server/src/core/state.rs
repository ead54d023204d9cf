use crate::core::{Config, Result};
use crate::jobs::{DEFAULT_JOB_TITLES, JobStorage};
use crate::reorder::ReorderEngine;

/// Shared handles cloned into every handler
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Config | Immutable configuration |
/// | storage | JobStorage | redb job store |
/// | engine | ReorderEngine | Shift transactions over `storage` |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub storage: JobStorage,
    pub engine: ReorderEngine,
}

impl ServerState {
    pub fn new(config: Config, storage: JobStorage) -> Self {
        let engine = ReorderEngine::new(storage.clone());
        Self {
            config,
            storage,
            engine,
        }
    }

    /// Open the on-disk store under `work_dir` and seed it if configured
    pub fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_path();
        tracing::info!(path = %db_path.display(), "Opening job store");
        let storage = JobStorage::open(&db_path)?;

        let state = Self::new(config.clone(), storage);
        if config.seed_jobs {
            state.seed()?;
        }
        Ok(state)
    }

    /// In-memory store (tests and demo mode)
    pub fn in_memory(config: Config) -> Result<Self> {
        let storage = JobStorage::open_in_memory()?;
        Ok(Self::new(config, storage))
    }

    /// Seed the default job board into an empty store
    pub fn seed(&self) -> Result<usize> {
        Ok(self.storage.seed_if_empty(DEFAULT_JOB_TITLES)?)
    }
}
