//! # Engine Module
//!
//! Owns the current [`Snapshot`] of the store and swaps it atomically on
//! reload.
//!
//! A snapshot is immutable: it holds the enriched store, the optional
//! query backend and its own document cache. Requests take an `Arc` to the
//! current snapshot, so a reload never changes a response in flight and a
//! failed reload leaves the previous snapshot serving.

use crate::graph::{DocumentSource, TripleStore};
use crate::loader::{LoadReport, Loader};
use crate::partition::{PartitionSummary, enrich};
use crate::primitives::MAX_CACHED_DOCUMENTS;
use crate::resolver::{DocumentCache, ResolverKind};
use crate::storage::SparqlStore;
use crate::{Document, RdfDocError};
use chrono::{SecondsFormat, Utc};
use oxrdf::NamedNodeRef;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{error, info};

/// Where and how the engine loads its store.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub data_path: PathBuf,
    pub queries_path: Option<PathBuf>,
    pub resolver: ResolverKind,
    pub cache_capacity: usize,
}

impl EngineConfig {
    #[must_use]
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            queries_path: None,
            resolver: ResolverKind::default(),
            cache_capacity: MAX_CACHED_DOCUMENTS,
        }
    }
}

/// Figures describing a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotReport {
    pub version: u64,
    pub loaded_at: String,
    pub resolver: String,
    pub triples: usize,
    pub load: LoadReport,
    pub partitions: PartitionSummary,
}

/// One immutable, fully enriched version of the store.
pub struct Snapshot {
    store: TripleStore,
    query: Option<SparqlStore>,
    cache: DocumentCache,
    report: SnapshotReport,
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("version", &self.report.version)
            .field("triples", &self.report.triples)
            .field("resolver", &self.report.resolver)
            .finish_non_exhaustive()
    }
}

impl Snapshot {
    /// Load, enrich and index the store described by `config`.
    pub fn build(config: &EngineConfig, version: u64) -> Result<Self, RdfDocError> {
        let mut loader = Loader::new(&config.data_path);
        if let Some(queries) = &config.queries_path {
            loader = loader.with_queries(queries);
        }
        let (store, load) = loader.load()?;
        Self::assemble(store, load, config.resolver, config.cache_capacity, version)
    }

    /// Build a snapshot from an already loaded store.
    pub fn from_store(store: TripleStore, resolver: ResolverKind) -> Result<Self, RdfDocError> {
        let load = LoadReport {
            triples: store.len(),
            ..LoadReport::default()
        };
        Self::assemble(store, load, resolver, MAX_CACHED_DOCUMENTS, 0)
    }

    fn assemble(
        mut store: TripleStore,
        load: LoadReport,
        resolver: ResolverKind,
        cache_capacity: usize,
        version: u64,
    ) -> Result<Self, RdfDocError> {
        let partitions = enrich(&mut store);
        let query = match resolver {
            ResolverKind::Query => Some(SparqlStore::from_triples(&store)?),
            ResolverKind::Memory => None,
        };
        let report = SnapshotReport {
            version,
            loaded_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            resolver: resolver.to_string(),
            triples: store.len(),
            load,
            partitions,
        };
        Ok(Self {
            store,
            query,
            cache: DocumentCache::new(cache_capacity),
            report,
        })
    }

    /// The document for `uri`, or `None` when nothing describes it.
    pub fn document(&self, uri: NamedNodeRef<'_>) -> Result<Option<Arc<Document>>, RdfDocError> {
        self.cache.get_or_resolve(self.source(), uri)
    }

    fn source(&self) -> &dyn DocumentSource {
        match &self.query {
            Some(query) => query,
            None => &self.store,
        }
    }

    #[must_use]
    pub fn store(&self) -> &TripleStore {
        &self.store
    }

    #[must_use]
    pub fn report(&self) -> &SnapshotReport {
        &self.report
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.report.version
    }

    #[must_use]
    pub fn cached_documents(&self) -> usize {
        self.cache.len()
    }
}

/// Holder of the current snapshot.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    current: RwLock<Arc<Snapshot>>,
    next_version: AtomicU64,
    /// Held for a whole reload so snapshots are swapped in version order.
    reload_lock: Mutex<()>,
}

impl Engine {
    /// Load the initial snapshot.
    pub fn open(config: EngineConfig) -> Result<Self, RdfDocError> {
        let snapshot = Snapshot::build(&config, 1)?;
        info!(
            version = 1,
            triples = snapshot.report.triples,
            resolver = %config.resolver,
            "engine ready"
        );
        Ok(Self {
            config,
            current: RwLock::new(Arc::new(snapshot)),
            next_version: AtomicU64::new(2),
            reload_lock: Mutex::new(()),
        })
    }

    /// Wrap an existing snapshot.
    #[must_use]
    pub fn with_snapshot(config: EngineConfig, snapshot: Snapshot) -> Self {
        let next = snapshot.version().saturating_add(1);
        Self {
            config,
            current: RwLock::new(Arc::new(snapshot)),
            next_version: AtomicU64::new(next),
            reload_lock: Mutex::new(()),
        }
    }

    /// The snapshot serving requests right now.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rebuild the snapshot from disk and swap it in.
    ///
    /// On failure the current snapshot keeps serving and the error is
    /// returned. Concurrent reloads run one after another.
    pub fn reload(&self) -> Result<Arc<Snapshot>, RdfDocError> {
        let _reloading = self.reload_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let version = self.next_version.fetch_add(1, Ordering::SeqCst);
        let snapshot = match Snapshot::build(&self.config, version) {
            Ok(snapshot) => Arc::new(snapshot),
            Err(e) => {
                error!(version, error = %e, "reload failed, keeping current snapshot");
                return Err(e);
            }
        };
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&snapshot);
        info!(version, triples = snapshot.report.triples, "snapshot swapped");
        Ok(snapshot)
    }
}
