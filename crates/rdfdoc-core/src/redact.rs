//! # Redaction
//!
//! Removes statements that would leak local file locations.
//!
//! Applied to every document before it is serialized or rendered. The
//! operation is idempotent.

use crate::Document;
use oxrdf::{Graph, TermRef};

/// Whether `term` is an IRI in the `file:` scheme.
#[must_use]
pub fn is_file_reference(term: TermRef<'_>) -> bool {
    matches!(term, TermRef::NamedNode(node) if node.as_str().starts_with("file:"))
}

/// Copy of `document` without statements whose object is a `file:` IRI.
#[must_use]
pub fn redact(document: &Document) -> Document {
    let mut graph = Graph::new();
    for triple in document.iter() {
        if !is_file_reference(triple.object) {
            graph.insert(triple);
        }
    }
    Document::from_graph(document.uri().into_owned(), graph)
}
