//! # SPARQL-backed Store
//!
//! An oxigraph store holding the loaded statements.
//!
//! It serves two purposes:
//! - executing SPARQL Update scripts against the loaded statements
//! - answering document lookups through queries (the `query` resolver)
//!
//! ## Integration with Engine
//!
//! The loader copies the [`TripleStore`] into a `SparqlStore`, runs the
//! update scripts and copies the result back. When the query resolver is
//! selected the snapshot keeps the `SparqlStore` as its document source.

use crate::graph::{DocumentSource, TripleStore};
use crate::{Document, RdfDocError};
use oxigraph::model::{GraphNameRef, NamedNodeRef, SubjectRef, Term, Triple};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use oxrdf::{Graph, Subject, TripleRef};
use std::collections::HashSet;
use std::path::Path;

/// An embedded, in-memory SPARQL store.
pub struct SparqlStore {
    store: Store,
}

impl std::fmt::Debug for SparqlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparqlStore")
            .field("quads", &self.store.len().ok())
            .finish_non_exhaustive()
    }
}

impl SparqlStore {
    /// Create an empty in-memory store.
    pub fn new() -> Result<Self, RdfDocError> {
        let store = Store::new().map_err(|e| RdfDocError::Storage(e.to_string()))?;
        Ok(Self { store })
    }

    /// Copy every statement of `triples` into a new store's default graph.
    pub fn from_triples(triples: &TripleStore) -> Result<Self, RdfDocError> {
        let store = Self::new()?;
        for triple in triples.iter() {
            store
                .store
                .insert(triple.in_graph(GraphNameRef::DefaultGraph))
                .map_err(|e| RdfDocError::Storage(e.to_string()))?;
        }
        Ok(store)
    }

    /// Execute a SPARQL Update script. `origin` is used for error reporting.
    pub fn update(&self, script: &str, origin: &Path) -> Result<(), RdfDocError> {
        self.store.update(script).map_err(|e| RdfDocError::Update {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Copy the store back into a [`TripleStore`]. Graph names are dropped.
    pub fn to_triples(&self) -> Result<TripleStore, RdfDocError> {
        let mut triples = TripleStore::new();
        for quad in self.store.iter() {
            let quad = quad.map_err(|e| RdfDocError::Storage(e.to_string()))?;
            triples.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
        }
        Ok(triples)
    }

    pub fn len(&self) -> Result<usize, RdfDocError> {
        self.store
            .len()
            .map_err(|e| RdfDocError::Storage(e.to_string()))
    }

    pub fn is_empty(&self) -> Result<bool, RdfDocError> {
        self.store
            .is_empty()
            .map_err(|e| RdfDocError::Storage(e.to_string()))
    }

    /// IRI subjects sharing `<uri>#` as prefix.
    fn fragment_subjects(&self, uri: NamedNodeRef<'_>) -> Result<Vec<Subject>, RdfDocError> {
        let query = format!(
            "SELECT DISTINCT ?s WHERE {{ ?s ?p ?o . FILTER(isIRI(?s) && STRSTARTS(STR(?s), \"{}#\")) }}",
            escape_string_literal(uri.as_str())
        );
        let mut subjects = Vec::new();
        let results = self
            .store
            .query(query.as_str())
            .map_err(|e| RdfDocError::Storage(e.to_string()))?;
        if let QueryResults::Solutions(solutions) = results {
            for solution in solutions {
                let solution = solution.map_err(|e| RdfDocError::Storage(e.to_string()))?;
                if let Some(Term::NamedNode(node)) = solution.get("s") {
                    subjects.push(Subject::NamedNode(node.clone()));
                }
            }
        }
        Ok(subjects)
    }

    /// Copy the concise bounded description of `resource` into `out`.
    fn describe_into(&self, resource: Subject, out: &mut Graph) -> Result<(), RdfDocError> {
        let mut visited: HashSet<Subject> = HashSet::new();
        visited.insert(resource.clone());
        let mut pending = vec![resource];
        while let Some(subject) = pending.pop() {
            let quads =
                self.store
                    .quads_for_pattern(Some(subject.as_ref()), None, None, None);
            for quad in quads {
                let quad = quad.map_err(|e| RdfDocError::Storage(e.to_string()))?;
                if let Term::BlankNode(node) = &quad.object {
                    let next = Subject::BlankNode(node.clone());
                    if visited.insert(next.clone()) {
                        pending.push(next);
                    }
                }
                out.insert(TripleRef::new(&quad.subject, &quad.predicate, &quad.object));
            }
        }
        Ok(())
    }
}

impl DocumentSource for SparqlStore {
    fn describe(&self, uri: NamedNodeRef<'_>) -> Result<Document, RdfDocError> {
        let mut graph = Graph::new();
        self.describe_into(SubjectRef::from(uri).into_owned(), &mut graph)?;
        for subject in self.fragment_subjects(uri)? {
            self.describe_into(subject, &mut graph)?;
        }
        Ok(Document::from_graph(uri.into_owned(), graph))
    }
}

/// Escape a value for use inside a double-quoted SPARQL string literal.
fn escape_string_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}
