//! # Document Resolution
//!
//! Entry point turning a URI into a [`Document`], plus the per-snapshot
//! document cache.
//!
//! The cache is single-flight: concurrent requests for the same URI wait
//! for one resolution instead of each walking the store. Only non-empty
//! documents are kept.

use crate::graph::DocumentSource;
use crate::{Document, RdfDocError};
use dashmap::DashMap;
use oxrdf::NamedNodeRef;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

/// Which backend answers document lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolverKind {
    /// Walk the in-memory indexes.
    #[default]
    Memory,
    /// Run SPARQL queries against the embedded store.
    Query,
}

impl FromStr for ResolverKind {
    type Err = RdfDocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "query" => Ok(Self::Query),
            other => Err(RdfDocError::Config(format!("unknown resolver: {other}"))),
        }
    }
}

impl std::fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Query => f.write_str("query"),
        }
    }
}

/// Resolve `uri` against `source`. Returns `None` for unknown resources.
pub fn resolve<S: DocumentSource + ?Sized>(
    source: &S,
    uri: NamedNodeRef<'_>,
) -> Result<Option<Document>, RdfDocError> {
    let document = source.describe(uri)?;
    Ok((!document.is_empty()).then_some(document))
}

type Slot = Arc<Mutex<Option<Arc<Document>>>>;

/// Bounded, single-flight cache of resolved documents.
#[derive(Debug)]
pub struct DocumentCache {
    entries: DashMap<String, Slot>,
    capacity: usize,
}

impl DocumentCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
        }
    }

    /// Number of cached entries (including in-flight ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the cached document for `uri`, resolving it with `source` on
    /// a miss.
    ///
    /// Errors and empty documents are not cached. Once `capacity` entries
    /// exist, new URIs are resolved without being stored.
    pub fn get_or_resolve<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
        uri: NamedNodeRef<'_>,
    ) -> Result<Option<Arc<Document>>, RdfDocError> {
        let key = uri.as_str();
        if !self.entries.contains_key(key) && self.entries.len() >= self.capacity {
            return Ok(resolve(source, uri)?.map(Arc::new));
        }

        loop {
            let slot: Slot = Arc::clone(&self.entries.entry(key.to_owned()).or_default());
            let mut cached = slot.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(document) = cached.as_ref() {
                return Ok(Some(Arc::clone(document)));
            }
            // The slot was dropped by a failed resolution while we waited on it.
            if !self.is_current(key, &slot) {
                continue;
            }

            return match resolve(source, uri) {
                Ok(Some(document)) => {
                    let document = Arc::new(document);
                    *cached = Some(Arc::clone(&document));
                    Ok(Some(document))
                }
                other => {
                    self.entries.remove_if(key, |_, current| Arc::ptr_eq(current, &slot));
                    other.map(|doc| doc.map(Arc::new))
                }
            };
        }
    }

    fn is_current(&self, key: &str, slot: &Slot) -> bool {
        self.entries
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current.value(), slot))
    }
}
