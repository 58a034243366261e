//! Template view of a document.
//!
//! Templates receive a JSON object:
//!
//! ```json
//! {
//!   "uri": "https://example.org/alice",
//!   "types": ["https://schema.org/Person"],
//!   "resource": { "<predicate>": [term, ...] },
//!   "document": { "<subject key>": { "<predicate>": [term, ...] } },
//!   "triples": [ { "subject": term, "predicate": "<iri>", "object": term } ],
//!   "prefixes": { "schema": "https://schema.org/" }
//! }
//! ```
//!
//! A term is `{ "kind": "iri" | "blank" | "literal", "value": ..., "key": ...,
//! "datatype": ..., "language": ... }`. `key` is set on IRIs and blank nodes
//! and indexes `document`. `resource` is the entry of the document URI.

use crate::Document;
use crate::primitives::NAMESPACE_PREFIXES;
use oxrdf::{SubjectRef, TermRef};
use serde_json::{Map, Value, json};

/// Build the template context for `document`.
#[must_use]
pub fn document_view(document: &Document) -> Value {
    let mut subjects: Map<String, Value> = Map::new();
    let mut triples = Vec::new();

    for triple in document.sorted_triples() {
        let subject = subject_term(triple.subject.as_ref());
        let object = object_term(triple.object.as_ref());
        let key = subject_key(triple.subject.as_ref());

        let entry = subjects
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(predicates) = entry {
            let values = predicates
                .entry(triple.predicate.as_str().to_owned())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(values) = values {
                values.push(object.clone());
            }
        }

        triples.push(json!({
            "subject": subject,
            "predicate": triple.predicate.as_str(),
            "object": object,
        }));
    }

    let resource = subjects
        .get(document.uri().as_str())
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));
    let types: Vec<&str> = document.types().iter().map(|t| t.as_str()).collect();
    let prefixes: Map<String, Value> = NAMESPACE_PREFIXES
        .iter()
        .map(|(name, iri)| ((*name).to_owned(), Value::String((*iri).to_owned())))
        .collect();

    json!({
        "uri": document.uri().as_str(),
        "types": types,
        "resource": resource,
        "document": subjects,
        "triples": triples,
        "prefixes": prefixes,
    })
}

/// Key of a subject inside `document`: the IRI, or `_:<id>`.
#[must_use]
pub fn subject_key(subject: SubjectRef<'_>) -> String {
    match subject {
        SubjectRef::NamedNode(node) => node.as_str().to_owned(),
        SubjectRef::BlankNode(node) => format!("_:{}", node.as_str()),
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    }
}

fn subject_term(subject: SubjectRef<'_>) -> Value {
    match subject {
        SubjectRef::NamedNode(node) => {
            json!({ "kind": "iri", "value": node.as_str(), "key": node.as_str() })
        }
        SubjectRef::BlankNode(node) => {
            json!({ "kind": "blank", "value": node.as_str(), "key": subject_key(subject) })
        }
        #[allow(unreachable_patterns)]
        other => json!({ "kind": "triple", "value": other.to_string() }),
    }
}

fn object_term(term: TermRef<'_>) -> Value {
    match term {
        TermRef::NamedNode(node) => subject_term(node.into()),
        TermRef::BlankNode(node) => subject_term(node.into()),
        TermRef::Literal(literal) => {
            let mut value = json!({
                "kind": "literal",
                "value": literal.value(),
                "datatype": literal.datatype().as_str(),
            });
            if let (Some(language), Value::Object(map)) = (literal.language(), &mut value) {
                map.insert("language".to_owned(), Value::String(language.to_owned()));
            }
            value
        }
        #[allow(unreachable_patterns)]
        other => json!({ "kind": "triple", "value": other.to_string() }),
    }
}
