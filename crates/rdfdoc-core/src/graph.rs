//! # Triple Store
//!
//! The in-memory statement store for rdfdoc CORE.
//!
//! This module implements the `DocumentSource` trait for [`TripleStore`],
//! which resolves documents by walking its own indexes. The query-backed
//! alternative lives in [`crate::storage`].
//!
//! Set semantics: inserting a statement twice keeps one copy.

use crate::{Document, RdfDocError};
use oxrdf::{
    Graph, NamedNodeRef, Subject, SubjectRef, Term, TermRef, Triple, TripleRef,
};
use std::collections::{BTreeSet, HashSet};
use std::ops::Bound;

// =============================================================================
// DOCUMENT SOURCE TRAIT
// =============================================================================

/// A backend able to produce the bounded description of a URI.
///
/// The description contains:
/// - every statement whose subject is the URI
/// - every statement whose subject is an IRI starting with `<uri>#`
/// - the blank-node closure of all of the above
///
/// Implementations return an empty document for unknown URIs.
pub trait DocumentSource: Send + Sync {
    /// Resolve the document for `uri`.
    fn describe(&self, uri: NamedNodeRef<'_>) -> Result<Document, RdfDocError>;
}

// =============================================================================
// TRIPLE STORE
// =============================================================================

/// The loaded statement set.
///
/// Wraps an [`oxrdf::Graph`] and keeps an ordered index of IRI subjects so
/// that fragment lookups are range scans instead of full iterations.
#[derive(Debug, Default)]
pub struct TripleStore {
    graph: Graph,
    /// IRI subjects with at least one statement, ordered for prefix scans.
    iri_subjects: BTreeSet<String>,
}

impl TripleStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a statement. Returns `false` if it was already present.
    pub fn insert<'a>(&mut self, triple: impl Into<TripleRef<'a>>) -> bool {
        let triple = triple.into();
        if let SubjectRef::NamedNode(node) = triple.subject {
            if !self.iri_subjects.contains(node.as_str()) {
                self.iri_subjects.insert(node.as_str().to_owned());
            }
        }
        self.graph.insert(triple)
    }

    /// Remove a statement. Returns `false` if it was not present.
    pub fn remove<'a>(&mut self, triple: impl Into<TripleRef<'a>>) -> bool {
        let triple = triple.into();
        let removed = self.graph.remove(triple);
        if removed {
            if let SubjectRef::NamedNode(node) = triple.subject {
                if self.graph.triples_for_subject(node).next().is_none() {
                    self.iri_subjects.remove(node.as_str());
                }
            }
        }
        removed
    }

    /// Replace every `(subject, predicate, *)` statement with a single one.
    pub fn set(
        &mut self,
        subject: impl Into<Subject>,
        predicate: NamedNodeRef<'_>,
        object: impl Into<Term>,
    ) {
        let subject = subject.into();
        let previous: Vec<Term> = self
            .graph
            .objects_for_subject_predicate(subject.as_ref(), predicate)
            .map(TermRef::into_owned)
            .collect();
        for term in &previous {
            self.graph
                .remove(TripleRef::new(subject.as_ref(), predicate, term.as_ref()));
        }
        let object = object.into();
        self.insert(TripleRef::new(subject.as_ref(), predicate, object.as_ref()));
    }

    /// Insert every statement of `other`.
    pub fn extend_from(&mut self, other: &Self) {
        for triple in other.iter() {
            self.insert(triple);
        }
    }

    #[must_use]
    pub fn contains<'a>(&self, triple: impl Into<TripleRef<'a>>) -> bool {
        self.graph.contains(triple)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TripleRef<'_>> {
        self.graph.iter()
    }

    /// The underlying graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn triples_for_subject<'a>(
        &'a self,
        subject: impl Into<SubjectRef<'a>>,
    ) -> impl Iterator<Item = TripleRef<'a>> {
        self.graph.triples_for_subject(subject)
    }

    pub fn objects_for<'a>(
        &'a self,
        subject: impl Into<SubjectRef<'a>>,
        predicate: NamedNodeRef<'a>,
    ) -> impl Iterator<Item = TermRef<'a>> {
        self.graph.objects_for_subject_predicate(subject, predicate)
    }

    pub fn subjects_for<'a>(
        &'a self,
        predicate: NamedNodeRef<'a>,
        object: impl Into<TermRef<'a>>,
    ) -> impl Iterator<Item = SubjectRef<'a>> {
        self.graph.subjects_for_predicate_object(predicate, object)
    }

    /// IRI subjects in lexical order.
    pub fn iri_subjects(&self) -> impl Iterator<Item = NamedNodeRef<'_>> {
        self.iri_subjects
            .iter()
            .map(|iri| NamedNodeRef::new_unchecked(iri.as_str()))
    }

    /// IRI subjects starting with `prefix`, in lexical order.
    pub fn iri_subjects_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = NamedNodeRef<'a>> {
        self.iri_subjects
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |iri| iri.starts_with(prefix))
            .map(|iri| NamedNodeRef::new_unchecked(iri.as_str()))
    }

    /// Copy the concise bounded description of `resource` into `out`.
    ///
    /// Follows blank-node objects transitively. Each blank node is expanded
    /// at most once, so cycles terminate.
    pub fn describe_into<'a>(&'a self, resource: SubjectRef<'a>, out: &mut Graph) {
        let mut visited: HashSet<SubjectRef<'a>> = HashSet::new();
        let mut pending = vec![resource];
        visited.insert(resource);
        while let Some(subject) = pending.pop() {
            for triple in self.graph.triples_for_subject(subject) {
                if let TermRef::BlankNode(node) = triple.object {
                    let next = SubjectRef::BlankNode(node);
                    if visited.insert(next) {
                        pending.push(next);
                    }
                }
                out.insert(triple);
            }
        }
    }
}

impl FromIterator<Triple> for TripleStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut store = Self::new();
        for triple in iter {
            store.insert(&triple);
        }
        store
    }
}

impl DocumentSource for TripleStore {
    fn describe(&self, uri: NamedNodeRef<'_>) -> Result<Document, RdfDocError> {
        let mut graph = Graph::new();
        self.describe_into(uri.into(), &mut graph);
        let fragment_prefix = format!("{}#", uri.as_str());
        for subject in self.iri_subjects_with_prefix(&fragment_prefix) {
            self.describe_into(subject.into(), &mut graph);
        }
        Ok(Document::from_graph(uri.into_owned(), graph))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{BlankNode, Literal, NamedNode};

    fn node(iri: &str) -> NamedNode {
        NamedNode::new_unchecked(iri)
    }

    fn lit(value: &str) -> Literal {
        Literal::new_simple_literal(value)
    }

    fn sample_store() -> TripleStore {
        let a = node("https://example.org/a");
        let p = node("https://example.org/p");
        let b1 = BlankNode::new_unchecked("b1");
        let b2 = BlankNode::new_unchecked("b2");
        [
            Triple::new(a.clone(), p.clone(), lit("direct")),
            Triple::new(a.clone(), p.clone(), b1.clone()),
            Triple::new(b1.clone(), p.clone(), b2.clone()),
            Triple::new(b2.clone(), p.clone(), lit("nested")),
            // cycle back to b1
            Triple::new(b2, p.clone(), b1),
            Triple::new(node("https://example.org/a#frag"), p.clone(), lit("fragment")),
            Triple::new(node("https://example.org/ab"), p.clone(), lit("sibling")),
            Triple::new(node("https://example.org/c"), p, a),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn insert_is_set_semantics() {
        let mut store = TripleStore::new();
        let t = Triple::new(node("https://x/s"), node("https://x/p"), lit("o"));
        assert!(store.insert(&t));
        assert!(!store.insert(&t));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_updates_subject_index() {
        let mut store = TripleStore::new();
        let t = Triple::new(node("https://x/s"), node("https://x/p"), lit("o"));
        store.insert(&t);
        assert_eq!(store.iri_subjects().count(), 1);
        assert!(store.remove(&t));
        assert_eq!(store.iri_subjects().count(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn set_replaces_all_values() {
        let mut store = TripleStore::new();
        let s = node("https://x/s");
        let p = node("https://x/p");
        store.insert(&Triple::new(s.clone(), p.clone(), lit("one")));
        store.insert(&Triple::new(s.clone(), p.clone(), lit("two")));
        store.set(s.clone(), p.as_ref(), lit("three"));
        let values: Vec<String> = store
            .objects_for(&s, p.as_ref())
            .map(|t| t.to_string())
            .collect();
        assert_eq!(values, vec!["\"three\"".to_string()]);
    }

    #[test]
    fn prefix_scan_is_bounded() {
        let store = sample_store();
        let found: Vec<&str> = store
            .iri_subjects_with_prefix("https://example.org/a#")
            .map(|n| n.as_str())
            .collect();
        assert_eq!(found, vec!["https://example.org/a#frag"]);
    }

    #[test]
    fn describe_follows_blank_nodes_and_fragments() {
        let store = sample_store();
        let doc = store
            .describe(node("https://example.org/a").as_ref())
            .expect("describe");
        // direct(2) + b1(1) + b2(2) + fragment(1); siblings and inbound links excluded
        assert_eq!(doc.len(), 6);
        let rendered: Vec<String> = doc.iter().map(|t| t.to_string()).collect();
        assert!(rendered.iter().any(|t| t.contains("fragment")));
        assert!(!rendered.iter().any(|t| t.contains("sibling")));
        assert!(!rendered.iter().any(|t| t.starts_with("<https://example.org/c>")));
    }

    #[test]
    fn describe_unknown_uri_is_empty() {
        let store = sample_store();
        let doc = store.describe(node("https://example.org/zzz").as_ref());
        assert!(matches!(doc, Ok(ref d) if d.is_empty()));
    }
}
