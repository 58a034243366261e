//! # VoID Statistics
//!
//! Dataset descriptions in the Vocabulary of Interlinked Datasets.
//!
//! For a dataset `D` the generator emits:
//! - `D` typed `void:Dataset` with `triples`, `classes`, `distinctSubjects`,
//!   `distinctObjects` and `properties`
//! - one class partition `D_class<i>` per distinct `rdf:type` value
//! - one property partition `D_property<i>` per distinct predicate
//!
//! Partition indices follow the lexical order of the class or property, so
//! output is identical across runs.

use crate::graph::TripleStore;
use crate::vocab::{rdf, void, xsd};
use oxrdf::{Literal, NamedNode, NamedNodeRef, Subject, Term, TermRef, Triple};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Default)]
struct ClassStats {
    class: Option<Term>,
    entities: HashSet<Subject>,
    triples: usize,
    properties: HashSet<NamedNode>,
    objects: HashSet<Term>,
}

#[derive(Debug, Default)]
struct PropertyStats {
    triples: usize,
    subjects: HashSet<Subject>,
    objects: HashSet<Term>,
}

/// Compute the VoID description of `graph` as dataset `dataset`.
///
/// Partition statistics are computed with distinct counts.
#[must_use]
pub fn generate_void(graph: &TripleStore, dataset: NamedNodeRef<'_>) -> Vec<Triple> {
    // class key -> stats, entity -> class keys
    let mut classes: BTreeMap<String, ClassStats> = BTreeMap::new();
    let mut type_map: HashMap<Subject, Vec<String>> = HashMap::new();
    for triple in graph.iter() {
        if triple.predicate != rdf::TYPE {
            continue;
        }
        let key = triple.object.to_string();
        let stats = classes.entry(key.clone()).or_default();
        stats.class.get_or_insert_with(|| triple.object.into_owned());
        stats.entities.insert(triple.subject.into_owned());
        type_map.entry(triple.subject.into_owned()).or_default().push(key);
    }

    let mut triples = 0usize;
    let mut subjects: HashSet<Subject> = HashSet::new();
    let mut objects: HashSet<Term> = HashSet::new();
    let mut properties: BTreeMap<String, (NamedNode, PropertyStats)> = BTreeMap::new();

    for triple in graph.iter() {
        triples += 1;
        let subject = triple.subject.into_owned();
        let object = triple.object.into_owned();

        if let Some(keys) = type_map.get(&subject) {
            for key in keys {
                if let Some(stats) = classes.get_mut(key) {
                    stats.triples += 1;
                    stats.properties.insert(triple.predicate.into_owned());
                    stats.objects.insert(object.clone());
                }
            }
        }

        let (_, stats) = properties
            .entry(triple.predicate.as_str().to_owned())
            .or_insert_with(|| (triple.predicate.into_owned(), PropertyStats::default()));
        stats.triples += 1;
        stats.subjects.insert(subject.clone());
        stats.objects.insert(object.clone());

        subjects.insert(subject);
        objects.insert(object);
    }

    let mut out = Vec::new();
    let mut emit = |subject: &NamedNode, predicate: NamedNodeRef<'_>, object: Term| {
        out.push(Triple::new(subject.clone(), predicate, object));
    };

    let dataset = dataset.into_owned();
    emit(&dataset, rdf::TYPE, iri(void::DATASET));
    emit(&dataset, void::TRIPLES, count(triples));
    emit(&dataset, void::CLASSES, count(classes.len()));
    emit(&dataset, void::DISTINCT_OBJECTS, count(objects.len()));
    emit(&dataset, void::DISTINCT_SUBJECTS, count(subjects.len()));
    emit(&dataset, void::PROPERTIES, count(properties.len()));

    for (index, stats) in classes.values().enumerate() {
        let Some(class) = &stats.class else {
            continue;
        };
        let part = partition_iri(&dataset, "class", index);
        emit(&dataset, void::CLASS_PARTITION, part.clone().into());
        emit(&part, rdf::TYPE, iri(void::DATASET));
        emit(&part, void::TRIPLES, count(stats.triples));
        emit(&part, void::CLASSES, count(1));
        emit(&part, void::CLASS, class.clone());
        emit(&part, void::ENTITIES, count(stats.entities.len()));
        emit(&part, void::DISTINCT_SUBJECTS, count(stats.entities.len()));
        emit(&part, void::PROPERTIES, count(stats.properties.len()));
        emit(&part, void::DISTINCT_OBJECTS, count(stats.objects.len()));
    }

    for (index, (property, stats)) in properties.values().enumerate() {
        let part = partition_iri(&dataset, "property", index);
        let mut entities = 0usize;
        let mut property_classes: HashSet<&str> = HashSet::new();
        for subject in &stats.subjects {
            if let Some(keys) = type_map.get(subject) {
                entities += 1;
                property_classes.extend(keys.iter().map(String::as_str));
            }
        }
        emit(&dataset, void::PROPERTY_PARTITION, part.clone().into());
        emit(&part, rdf::TYPE, iri(void::DATASET));
        emit(&part, void::TRIPLES, count(stats.triples));
        emit(&part, void::PROPERTIES, count(1));
        emit(&part, void::PROPERTY, property.clone().into());
        emit(&part, void::ENTITIES, count(entities));
        emit(&part, void::CLASSES, count(property_classes.len()));
        emit(&part, void::DISTINCT_SUBJECTS, count(stats.subjects.len()));
        emit(&part, void::DISTINCT_OBJECTS, count(stats.objects.len()));
    }

    out
}

/// `<dataset>_<kind><index>`.
fn partition_iri(dataset: &NamedNode, kind: &str, index: usize) -> NamedNode {
    NamedNode::new_unchecked(format!("{}_{kind}{index}", dataset.as_str()))
}

fn iri(node: NamedNodeRef<'_>) -> Term {
    node.into_owned().into()
}

fn count(value: usize) -> Term {
    Literal::new_typed_literal(value.to_string(), xsd::INTEGER).into()
}

/// Integer value of a `(subject, predicate)` statistic, for inspection.
#[must_use]
pub fn statistic(triples: &[Triple], subject: &str, predicate: NamedNodeRef<'_>) -> Option<u64> {
    triples
        .iter()
        .find(|t| t.predicate == predicate && subject_is(&t.subject, subject))
        .and_then(|t| match t.object.as_ref() {
            TermRef::Literal(literal) => literal.value().parse().ok(),
            _ => None,
        })
}

fn subject_is(subject: &Subject, iri: &str) -> bool {
    matches!(subject, Subject::NamedNode(node) if node.as_str() == iri)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(iri: &str) -> NamedNode {
        NamedNode::new_unchecked(iri)
    }

    fn sample() -> TripleStore {
        let person = node("https://ex.org/Person");
        let name = node("https://ex.org/name");
        let alice = node("https://ex.org/alice");
        let bob = node("https://ex.org/bob");
        [
            Triple::new(alice.clone(), rdf::TYPE, person.clone()),
            Triple::new(bob.clone(), rdf::TYPE, person),
            Triple::new(alice, name.clone(), Literal::new_simple_literal("Alice")),
            Triple::new(bob, name, Literal::new_simple_literal("Bob")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn dataset_statistics() {
        let out = generate_void(&sample(), NamedNodeRef::new_unchecked("https://ex.org/"));
        let d = "https://ex.org/";
        assert_eq!(statistic(&out, d, void::TRIPLES), Some(4));
        assert_eq!(statistic(&out, d, void::CLASSES), Some(1));
        assert_eq!(statistic(&out, d, void::DISTINCT_SUBJECTS), Some(2));
        // Person, "Alice", "Bob"
        assert_eq!(statistic(&out, d, void::DISTINCT_OBJECTS), Some(3));
        assert_eq!(statistic(&out, d, void::PROPERTIES), Some(2));
    }

    #[test]
    fn class_partition_statistics() {
        let out = generate_void(&sample(), NamedNodeRef::new_unchecked("https://ex.org/"));
        let part = "https://ex.org/_class0";
        assert_eq!(statistic(&out, part, void::TRIPLES), Some(4));
        assert_eq!(statistic(&out, part, void::ENTITIES), Some(2));
        assert_eq!(statistic(&out, part, void::PROPERTIES), Some(2));
        assert_eq!(statistic(&out, part, void::CLASSES), Some(1));
    }

    #[test]
    fn property_partitions_are_ordered() {
        let out = generate_void(&sample(), NamedNodeRef::new_unchecked("https://ex.org/"));
        let first = out
            .iter()
            .find(|t| subject_is(&t.subject, "https://ex.org/_property0") && t.predicate == void::PROPERTY)
            .map(|t| t.object.to_string());
        // "http://www.w3.org/..." sorts before "https://ex.org/name"
        assert_eq!(
            first.as_deref(),
            Some("<http://www.w3.org/1999/02/22-rdf-syntax-ns#type>")
        );
        let name = "https://ex.org/_property1";
        assert_eq!(statistic(&out, name, void::TRIPLES), Some(2));
        assert_eq!(statistic(&out, name, void::ENTITIES), Some(2));
        assert_eq!(statistic(&out, name, void::CLASSES), Some(1));
        assert_eq!(statistic(&out, name, void::DISTINCT_OBJECTS), Some(2));
    }

    #[test]
    fn output_is_deterministic() {
        let d = NamedNodeRef::new_unchecked("https://ex.org/");
        let a: Vec<String> = generate_void(&sample(), d).iter().map(ToString::to_string).collect();
        let b: Vec<String> = generate_void(&sample(), d).iter().map(ToString::to_string).collect();
        assert_eq!(a, b);
    }
}
