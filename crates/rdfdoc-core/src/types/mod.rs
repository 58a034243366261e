//! # Core Type Definitions
//!
//! This module contains the core types shared by every stage of the engine:
//! - The per-resource `Document` produced by resolution
//! - Error types (`RdfDocError`)
//!
//! ## Document Guarantees
//!
//! A `Document` is immutable once resolved. Every statement it holds is
//! reachable from its URI: either directly, through a fragment URI sharing
//! the document URI as prefix, or through a chain of blank nodes.

use crate::vocab::{owl, rdf, schema};
use oxrdf::{Graph, NamedNode, NamedNodeRef, SubjectRef, TermRef, Triple, TripleRef};
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// DOCUMENT
// =============================================================================

/// The bounded description of one resource URI.
///
/// Empty documents mean "not found"; the resolver never caches them.
#[derive(Debug)]
pub struct Document {
    uri: NamedNode,
    graph: Graph,
}

impl Document {
    /// Create an empty document for `uri`.
    #[must_use]
    pub fn new(uri: NamedNode) -> Self {
        Self {
            uri,
            graph: Graph::new(),
        }
    }

    /// Create a document from an already-collected graph.
    #[must_use]
    pub fn from_graph(uri: NamedNode, graph: Graph) -> Self {
        Self { uri, graph }
    }

    /// The URI this document describes.
    #[must_use]
    pub fn uri(&self) -> NamedNodeRef<'_> {
        self.uri.as_ref()
    }

    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn insert<'a>(&mut self, triple: impl Into<TripleRef<'a>>) -> bool {
        self.graph.insert(triple)
    }

    pub fn iter(&self) -> impl Iterator<Item = TripleRef<'_>> {
        self.graph.iter()
    }

    /// Statements sorted by their N-Triples rendering.
    ///
    /// Used wherever output must not depend on interning order.
    #[must_use]
    pub fn sorted_triples(&self) -> Vec<Triple> {
        let mut triples: Vec<Triple> = self.graph.iter().map(TripleRef::into_owned).collect();
        triples.sort_by_cached_key(ToString::to_string);
        triples
    }

    /// First object of `(subject, predicate, ?)`, if any.
    #[must_use]
    pub fn value<'a>(
        &'a self,
        subject: impl Into<SubjectRef<'a>>,
        predicate: NamedNodeRef<'a>,
    ) -> Option<TermRef<'a>> {
        self.graph.object_for_subject_predicate(subject, predicate)
    }

    /// `rdf:type` values of the document URI, IRIs only, sorted.
    #[must_use]
    pub fn types(&self) -> Vec<NamedNodeRef<'_>> {
        let mut types: Vec<NamedNodeRef<'_>> = self
            .graph
            .objects_for_subject_predicate(self.uri.as_ref(), rdf::TYPE)
            .filter_map(|term| match term {
                TermRef::NamedNode(node) => Some(node),
                _ => None,
            })
            .collect();
        types.sort_unstable_by_key(|node| node.as_str());
        types.dedup();
        types
    }

    #[must_use]
    pub fn is_media_object(&self) -> bool {
        self.graph.contains(TripleRef::new(
            self.uri.as_ref(),
            rdf::TYPE,
            schema::MEDIA_OBJECT,
        ))
    }

    /// Native format of a MediaObject (its `schema:encodingFormat`).
    #[must_use]
    pub fn encoding_format(&self) -> Option<&str> {
        if !self.is_media_object() {
            return None;
        }
        match self.value(self.uri.as_ref(), schema::ENCODING_FORMAT)? {
            TermRef::Literal(literal) => Some(literal.value()),
            _ => None,
        }
    }

    /// Content location of a MediaObject.
    #[must_use]
    pub fn content_url(&self) -> Option<NamedNodeRef<'_>> {
        self.graph
            .objects_for_subject_predicate(self.uri.as_ref(), schema::CONTENT_URL)
            .find_map(|term| match term {
                TermRef::NamedNode(node) => Some(node),
                _ => None,
            })
    }

    /// Redirect target declared through `owl:sameAs`.
    #[must_use]
    pub fn same_as(&self) -> Option<NamedNodeRef<'_>> {
        self.graph
            .objects_for_subject_predicate(self.uri.as_ref(), owl::SAME_AS)
            .find_map(|term| match term {
                TermRef::NamedNode(node) => Some(node),
                _ => None,
            })
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the rdfdoc engine.
///
/// - No silent failures: loading aborts on the first invalid input
/// - Use `Result<T, RdfDocError>` for fallible operations
/// - Request-time failures are mapped to HTTP statuses by the server
#[derive(Debug, Error)]
pub enum RdfDocError {
    /// A statement file could not be parsed.
    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A `file://` reference points at a file that does not exist.
    #[error("Referenced file not found: {0}")]
    MissingFile(String),

    /// A `file://` IRI could not be turned into a local path.
    #[error("Invalid file IRI: {0}")]
    InvalidFileIri(String),

    /// A MediaObject has no usable `schema:contentUrl`.
    #[error("MediaObject {0} has no file content URL")]
    MissingContentUrl(String),

    /// A string that should be an absolute IRI is not one.
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// Nothing in the store describes the resource.
    #[error("No document describes {0}")]
    UnknownResource(String),

    /// A media type no representation produces.
    #[error("Unknown media type: {0}")]
    UnknownMediaType(String),

    /// An update script failed to parse or execute.
    #[error("Update script {path} failed: {message}")]
    Update { path: PathBuf, message: String },

    /// The embedded query store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A document could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A template could not be loaded or rendered.
    #[error("Template error: {0}")]
    Template(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for RdfDocError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
