//! Expanded JSON-LD output.
//!
//! One node object per subject, subjects and values in stable order.
//! `rdf:type` IRIs are written as `@type`.

use crate::vocab::{rdf, xsd};
use crate::{Document, RdfDocError};
use oxrdf::{SubjectRef, TermRef};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// JSON value of the expanded JSON-LD form of `document`.
#[must_use]
pub fn to_value(document: &Document) -> Value {
    let mut nodes: BTreeMap<String, Map<String, Value>> = BTreeMap::new();
    for triple in document.sorted_triples() {
        let id = subject_id(triple.subject.as_ref());
        let node = nodes.entry(id.clone()).or_insert_with(|| {
            let mut node = Map::new();
            node.insert("@id".to_owned(), Value::String(id));
            node
        });

        if triple.predicate == rdf::TYPE {
            if let Some(class) = type_id(triple.object.as_ref()) {
                push(node, "@type", Value::String(class));
                continue;
            }
        }
        push(node, triple.predicate.as_str(), object_value(triple.object.as_ref()));
    }
    Value::Array(nodes.into_values().map(Value::Object).collect())
}

/// Pretty-printed expanded JSON-LD bytes.
pub fn to_vec(document: &Document) -> Result<Vec<u8>, RdfDocError> {
    serde_json::to_vec_pretty(&to_value(document))
        .map_err(|e| RdfDocError::Serialization(e.to_string()))
}

fn push(node: &mut Map<String, Value>, key: &str, value: Value) {
    match node
        .entry(key.to_owned())
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        Value::Array(values) => values.push(value),
        other => *other = Value::Array(vec![value]),
    }
}

fn subject_id(subject: SubjectRef<'_>) -> String {
    match subject {
        SubjectRef::NamedNode(node) => node.as_str().to_owned(),
        SubjectRef::BlankNode(node) => format!("_:{}", node.as_str()),
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    }
}

fn type_id(term: TermRef<'_>) -> Option<String> {
    match term {
        TermRef::NamedNode(node) => Some(node.as_str().to_owned()),
        TermRef::BlankNode(node) => Some(format!("_:{}", node.as_str())),
        _ => None,
    }
}

fn object_value(term: TermRef<'_>) -> Value {
    match term {
        TermRef::NamedNode(node) => json!({ "@id": node.as_str() }),
        TermRef::BlankNode(node) => json!({ "@id": format!("_:{}", node.as_str()) }),
        TermRef::Literal(literal) => {
            if let Some(language) = literal.language() {
                json!({ "@value": literal.value(), "@language": language })
            } else if literal.datatype() == xsd::STRING {
                json!({ "@value": literal.value() })
            } else {
                json!({ "@value": literal.value(), "@type": literal.datatype().as_str() })
            }
        }
        #[allow(unreachable_patterns)]
        other => json!({ "@value": other.to_string() }),
    }
}
