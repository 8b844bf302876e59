//! Reload-capable owner of the current graph.
//!
//! A `GraphSnapshot` is one loaded graph with the index built from it. The
//! `GraphService` hands out the current snapshot as an `Arc`, so readers
//! query without holding any lock. A reload loads and indexes the file into
//! a new snapshot first and then swaps it in; a failed reload leaves the
//! previous snapshot in place.
//!
//! # Invariants
//!
//! - A snapshot's index is always built from that snapshot's graph.
//! - `snapshot()` never observes a partially built index.
//! - Generations increase by one per successful reload.

use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use crate::config::GraphConfig;
use crate::graph::Graph;
use crate::index::{Index, IndexSettings};
use crate::query::{QueryEngine, QuerySettings};
use crate::resolver::Resolver;
use crate::turtle::{LoadError, load_graph};

/// An immutable graph, its index and the settings to query it with.
#[derive(Debug)]
pub struct GraphSnapshot {
    graph: Graph,
    index: Index,
    settings: QuerySettings,
    generation: u64,
    build_time: Duration,
}

impl GraphSnapshot {
    /// Index `graph` into a snapshot.
    #[must_use]
    pub fn build(
        graph: Graph,
        index_settings: &IndexSettings,
        settings: QuerySettings,
        generation: u64,
    ) -> Self {
        let started = Instant::now();
        let index = Index::build(&graph, index_settings);
        Self {
            graph,
            index,
            settings,
            generation,
            build_time: started.elapsed(),
        }
    }

    /// Load the configured file and index it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or malformed.
    pub fn load(config: &GraphConfig, generation: u64) -> Result<Self, LoadError> {
        let started = Instant::now();
        let graph = load_graph(&config.triple_path)?;
        let mut snapshot = Self::build(graph, &config.index, config.query, generation);
        snapshot.build_time = started.elapsed();
        Ok(snapshot)
    }

    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    #[must_use]
    pub const fn index(&self) -> &Index {
        &self.index
    }

    #[must_use]
    pub const fn settings(&self) -> &QuerySettings {
        &self.settings
    }

    /// 1 for the initial load, then one more per successful reload.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Time taken to load and index this snapshot.
    #[must_use]
    pub const fn build_time(&self) -> Duration {
        self.build_time
    }

    #[must_use]
    pub const fn engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.graph, &self.index, &self.settings)
    }

    #[must_use]
    pub const fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.graph, &self.index, self.settings.incoming_limit)
    }
}

/// Errors that can occur while loading or swapping snapshots.
#[derive(Debug)]
pub enum ServiceError {
    /// The triple file could not be loaded.
    Load(LoadError),
    /// A lock was poisoned by a panicking thread.
    LockPoisoned,
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(e) => write!(f, "load error: {e}"),
            Self::LockPoisoned => write!(f, "graph lock poisoned"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::LockPoisoned => None,
        }
    }
}

impl From<LoadError> for ServiceError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

/// Owns the current snapshot and replaces it on reload.
pub struct GraphService {
    config: GraphConfig,
    current: RwLock<Arc<GraphSnapshot>>,
    /// Serializes reloads so generations are assigned in swap order.
    reload_lock: Mutex<()>,
}

impl GraphService {
    /// Load the configured file and serve it.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial load fails; nothing is served from a
    /// partially loaded graph.
    pub fn load(config: GraphConfig) -> Result<Self, ServiceError> {
        let snapshot = GraphSnapshot::load(&config, 1)?;
        log_loaded("Loaded graph", &snapshot);
        Ok(Self::from_snapshot(config, snapshot))
    }

    /// Serve an already built snapshot. Reloads read `config.triple_path`.
    #[must_use]
    pub fn from_snapshot(config: GraphConfig, snapshot: GraphSnapshot) -> Self {
        Self {
            config,
            current: RwLock::new(Arc::new(snapshot)),
            reload_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// The snapshot currently being served.
    ///
    /// The returned `Arc` stays valid across later reloads.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn snapshot(&self) -> Result<Arc<GraphSnapshot>, ServiceError> {
        let current = self.current.read().map_err(|_| ServiceError::LockPoisoned)?;
        Ok(Arc::clone(&current))
    }

    /// Reload the triple file and swap the new snapshot in.
    ///
    /// # Post-conditions
    ///
    /// - On success, `snapshot()` returns the new snapshot.
    /// - On failure, `snapshot()` still returns the previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or a lock is poisoned.
    #[allow(clippy::significant_drop_tightening)] // The reload lock must span build and swap
    pub fn reload(&self) -> Result<Arc<GraphSnapshot>, ServiceError> {
        let _reloading = self
            .reload_lock
            .lock()
            .map_err(|_| ServiceError::LockPoisoned)?;
        let generation = self.snapshot()?.generation() + 1;

        let snapshot = match GraphSnapshot::load(&self.config, generation) {
            Ok(snapshot) => Arc::new(snapshot),
            Err(e) => {
                tracing::warn!(
                    path = %self.config.triple_path.display(),
                    "Reload failed, keeping previous graph: {e}"
                );
                return Err(e.into());
            }
        };
        log_loaded("Reloaded graph", &snapshot);

        let mut current = self
            .current
            .write()
            .map_err(|_| ServiceError::LockPoisoned)?;
        *current = Arc::clone(&snapshot);
        Ok(snapshot)
    }
}

fn log_loaded(message: &str, snapshot: &GraphSnapshot) {
    tracing::info!(
        statements = snapshot.graph.len(),
        subjects = snapshot.index.len(),
        generation = snapshot.generation,
        elapsed = ?snapshot.build_time,
        "{message}"
    );
}
