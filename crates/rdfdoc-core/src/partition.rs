//! # Partitioning
//!
//! Groups the store by URI authority (`scheme://authority/`) and adds a
//! VoID description of each group back into the store.
//!
//! A partition receives the concise bounded description of every IRI
//! subject under its authority. Statements about blank nodes therefore
//! appear in the partition of the IRI that reaches them; a blank node
//! reachable from two authorities is counted in both.
//!
//! Generated partition IRIs of the form `<D>_<local>` are rewritten to
//! `<D>#<sha256-hex(local)>`, so every statistic lives in the document of
//! the dataset IRI.

use crate::graph::TripleStore;
use crate::void::generate_void;
use crate::vocab::void;
use oxiri::Iri;
use oxrdf::{Graph, Literal, NamedNode, Subject, SubjectRef, Term, Triple};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Result of partitioning a store.
#[derive(Debug, Default)]
pub struct Partitions {
    /// Authority IRI -> statements of that authority.
    pub datasets: BTreeMap<String, TripleStore>,
    /// Statements whose subject is not an IRI with an authority.
    pub unpartitioned: usize,
}

/// Per-dataset figures reported after enrichment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartitionSummary {
    /// Authority IRI -> number of statements in the partition.
    pub datasets: BTreeMap<String, usize>,
    pub unpartitioned: usize,
    /// Statements added by VoID generation.
    pub void_triples: usize,
}

/// `scheme://authority/` of an IRI, or `None` when it has no authority.
#[must_use]
pub fn authority_of(iri: &str) -> Option<String> {
    let parsed = Iri::parse(iri).ok()?;
    let authority = parsed.authority().filter(|a| !a.is_empty())?;
    Some(format!("{}://{}/", parsed.scheme(), authority))
}

/// Split `store` by authority.
#[must_use]
pub fn partition(store: &TripleStore) -> Partitions {
    let mut partitions = Partitions::default();
    for subject in store.iri_subjects() {
        let Some(authority) = authority_of(subject.as_str()) else {
            partitions.unpartitioned += store.triples_for_subject(subject).count();
            continue;
        };
        let mut closure = Graph::new();
        store.describe_into(subject.into(), &mut closure);
        let dataset = partitions.datasets.entry(authority).or_default();
        for triple in closure.iter() {
            dataset.insert(triple);
        }
    }
    partitions.unpartitioned += store
        .iter()
        .filter(|triple| !matches!(triple.subject, SubjectRef::NamedNode(_)))
        .count();
    partitions
}

/// Add VoID statistics for every authority partition to `store`.
pub fn enrich(store: &mut TripleStore) -> PartitionSummary {
    let partitions = partition(store);
    if partitions.unpartitioned > 0 {
        warn!(
            statements = partitions.unpartitioned,
            "statements without an IRI subject are not partitioned"
        );
    }

    let mut summary = PartitionSummary {
        unpartitioned: partitions.unpartitioned,
        ..PartitionSummary::default()
    };
    for (authority, dataset_store) in &partitions.datasets {
        let dataset = NamedNode::new_unchecked(authority.as_str());
        let mut description = generate_void(dataset_store, dataset.as_ref());
        description.push(Triple::new(
            dataset.clone(),
            void::URI_SPACE,
            Literal::new_simple_literal(authority.as_str()),
        ));
        for triple in &description {
            let rewritten = rewrite_partition_triple(authority, triple);
            if store.insert(&rewritten) {
                summary.void_triples += 1;
            }
        }
        debug!(dataset = %authority, triples = dataset_store.len(), "partition described");
        summary
            .datasets
            .insert(authority.clone(), dataset_store.len());
    }
    summary
}

/// Rewrite `<dataset>_<local>` to `<dataset>#<sha256-hex(local)>`.
///
/// IRIs that do not start with `<dataset>_` are returned unchanged.
#[must_use]
pub fn partition_fragment(dataset: &str, iri: &str) -> Option<String> {
    let local = iri.strip_prefix(dataset)?.strip_prefix('_')?;
    let digest = Sha256::digest(local.as_bytes());
    Some(format!("{dataset}#{}", hex::encode(digest)))
}

fn rewrite_partition_triple(dataset: &str, triple: &Triple) -> Triple {
    let subject = match &triple.subject {
        Subject::NamedNode(node) => partition_fragment(dataset, node.as_str())
            .map(|iri| Subject::NamedNode(NamedNode::new_unchecked(iri)))
            .unwrap_or_else(|| triple.subject.clone()),
        other => other.clone(),
    };
    let object = match &triple.object {
        Term::NamedNode(node) => partition_fragment(dataset, node.as_str())
            .map(|iri| Term::NamedNode(NamedNode::new_unchecked(iri)))
            .unwrap_or_else(|| triple.object.clone()),
        other => other.clone(),
    };
    Triple::new(subject, triple.predicate.clone(), object)
}
