//! # rdfdoc-core
//!
//! The Document Resource Engine for rdfdoc - THE LOGIC.
//!
//! This crate turns a directory of RDF statement files into a store and
//! serves it as one bounded document per resource URI.
//!
//! ## Pipeline
//!
//! - `loader`: statement files, embedded content, MediaObject metadata,
//!   SPARQL update scripts
//! - `partition` / `void`: per-authority VoID statistics added to the store
//! - `graph` / `storage`: document resolution (in-memory or query-based)
//! - `resolver`: per-snapshot document cache
//! - `negotiation`, `templates`, `redact`, `formats`: everything a server
//!   needs to turn a document into a response
//! - `engine`: immutable snapshots with atomic reload
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is synchronous: NO async, NO network dependencies
//! - Never mutates a snapshot once built
//! - Fails a load on the first invalid input instead of serving partial data

// =============================================================================
// MODULES
// =============================================================================

pub mod engine;
pub mod files;
pub mod formats;
pub mod graph;
pub mod loader;
pub mod negotiation;
pub mod partition;
pub mod primitives;
pub mod redact;
pub mod resolver;
pub mod storage;
pub mod templates;
pub mod types;
pub mod vocab;
pub mod void;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{Document, RdfDocError};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use engine::{Engine, EngineConfig, Snapshot, SnapshotReport};
pub use graph::{DocumentSource, TripleStore};
pub use loader::{LoadReport, Loader};
pub use partition::{PartitionSummary, authority_of, enrich, partition};
pub use resolver::{DocumentCache, ResolverKind, resolve};
pub use storage::SparqlStore;

// =============================================================================
// RE-EXPORTS: Presentation
// =============================================================================

pub use formats::{DEFAULT_MIMETYPES, Representation, serialize};
pub use negotiation::{AcceptHeader, available_mimetypes, negotiate};
pub use redact::redact;
pub use templates::{TemplateIndex, TemplateMatch};
