//! # Property-Based Tests
//!
//! Invariants of document resolution, negotiation, redaction and partition
//! naming over generated stores.

use oxrdf::{BlankNode, Literal, NamedNode, NamedNodeRef, Subject, Term, Triple};
use proptest::collection::vec;
use proptest::prelude::*;
use rdfdoc_core::partition::partition_fragment;
use rdfdoc_core::redact::is_file_reference;
use rdfdoc_core::{
    AcceptHeader, DEFAULT_MIMETYPES, Document, DocumentSource, SparqlStore, TripleStore,
    negotiate, redact,
};

// =============================================================================
// GENERATORS
// =============================================================================

/// (subject, predicate, object kind, object) indexes.
type RawTriple = (u8, u8, u8, u8);

fn subject(index: u8) -> Subject {
    if index < 3 {
        NamedNode::new_unchecked(format!("https://ex.org/r{index}")).into()
    } else if index == 3 {
        NamedNode::new_unchecked("https://ex.org/r0#part").into()
    } else if index == 6 {
        NamedNode::new_unchecked("https://ex.org/r0x").into()
    } else {
        BlankNode::new_unchecked(format!("b{index}")).into()
    }
}

fn object(kind: u8, index: u8) -> Term {
    match kind {
        0 => NamedNode::new_unchecked(format!("https://ex.org/r{index}")).into(),
        1 => BlankNode::new_unchecked(format!("b{}", index + 4)).into(),
        2 => NamedNode::new_unchecked(format!("file:///srv/f{index}.png")).into(),
        _ => Literal::new_simple_literal(format!("v{index}")).into(),
    }
}

fn store_from(raw: &[RawTriple]) -> TripleStore {
    raw.iter()
        .map(|&(s, p, kind, o)| {
            Triple::new(
                subject(s % 7),
                NamedNode::new_unchecked(format!("https://ex.org/p{}", p % 3)),
                object(kind % 4, o % 4),
            )
        })
        .collect()
}

fn raw_triples() -> impl Strategy<Value = Vec<RawTriple>> {
    vec((any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>()), 1..30)
}

fn r0() -> NamedNodeRef<'static> {
    NamedNodeRef::new_unchecked("https://ex.org/r0")
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every statement about the resource is part of its document.
    #[test]
    fn document_contains_all_statements_about_resource(raw in raw_triples()) {
        let store = store_from(&raw);
        let document = store.describe(r0()).expect("describe");
        for triple in store.iter() {
            if triple.subject.to_string() == "<https://ex.org/r0>" {
                prop_assert!(document.graph().contains(triple));
            }
        }
    }

    /// Blank-node objects of the document are described inside it.
    #[test]
    fn document_is_closed_over_blank_nodes(raw in raw_triples()) {
        let store = store_from(&raw);
        let document = store.describe(r0()).expect("describe");
        for triple in document.iter() {
            if let oxrdf::TermRef::BlankNode(node) = triple.object {
                for about in store.triples_for_subject(node) {
                    prop_assert!(document.graph().contains(about));
                }
            }
        }
    }

    /// The query backend resolves the same document as the in-memory one.
    #[test]
    fn query_and_memory_resolvers_agree(raw in raw_triples()) {
        let store = store_from(&raw);
        let query = SparqlStore::from_triples(&store).expect("store");
        let memory = store.describe(r0()).expect("memory");
        let queried = query.describe(r0()).expect("query");
        prop_assert_eq!(shape(&memory), shape(&queried));
    }

    /// Statements about siblings (`r1`, `r2`) and about IRIs that merely
    /// share the resource's prefix (`r0x`) never leak into its document.
    #[test]
    fn document_excludes_foreign_subjects(raw in raw_triples()) {
        let store = store_from(&raw);
        let query = SparqlStore::from_triples(&store).expect("store");
        let documents = [
            store.describe(r0()).expect("memory"),
            query.describe(r0()).expect("query"),
        ];
        for document in &documents {
            let objects: Vec<String> = document.iter().map(|t| t.object.to_string()).collect();
            for triple in document.iter() {
                match triple.subject {
                    oxrdf::SubjectRef::NamedNode(node) => prop_assert!(
                        node == r0() || node.as_str().starts_with("https://ex.org/r0#"),
                        "foreign subject {}", node
                    ),
                    oxrdf::SubjectRef::BlankNode(node) => prop_assert!(
                        objects.contains(&node.to_string()),
                        "unreachable blank node {}", node
                    ),
                    #[allow(unreachable_patterns)]
                    _ => prop_assert!(false, "unexpected subject {}", triple.subject),
                }
            }
        }
    }

    /// Redaction removes every file reference and is idempotent.
    #[test]
    fn redaction_is_idempotent(raw in raw_triples()) {
        let store = store_from(&raw);
        let document = store.describe(r0()).expect("describe");
        let once = redact(&document);
        prop_assert!(!once.iter().any(|t| is_file_reference(t.object)));
        prop_assert_eq!(once.sorted_triples(), redact(&once).sorted_triples());
    }

    /// Without an Accept header the first default representation wins; with
    /// one, the pick is always something the client listed.
    #[test]
    fn negotiation_picks_listed_type(picks in vec(0usize..DEFAULT_MIMETYPES.len(), 1..4)) {
        let document = Document::new(NamedNode::new_unchecked("https://ex.org/r0"));
        let absent = negotiate(&document, &AcceptHeader::Absent);
        prop_assert_eq!(absent.as_deref(), Some(DEFAULT_MIMETYPES[0]));

        let listed: Vec<&str> = picks.iter().map(|&i| DEFAULT_MIMETYPES[i]).collect();
        let header = listed.join(", ");
        let chosen = negotiate(&document, &AcceptHeader::parse(&header)).expect("acceptable");
        prop_assert!(listed.contains(&chosen.as_str()));
    }

    /// Partition fragments are stable and distinct per local name.
    #[test]
    fn partition_fragments_are_deterministic(a in "[a-z0-9]{1,12}", b in "[a-z0-9]{1,12}") {
        let dataset = "https://ex.org/";
        let fa = partition_fragment(dataset, &format!("{dataset}_{a}")).expect("fragment");
        let fb = partition_fragment(dataset, &format!("{dataset}_{b}")).expect("fragment");
        prop_assert!(fa.starts_with("https://ex.org/#"));
        prop_assert_eq!(fa.len(), dataset.len() + 1 + 64);
        prop_assert_eq!(a == b, fa == fb);
        prop_assert_eq!(
            Some(fa),
            partition_fragment(dataset, &format!("{dataset}_{a}"))
        );
    }
}

/// Statements with blank nodes replaced by a placeholder, sorted.
///
/// Blank node labels may differ between backends.
fn shape(document: &Document) -> Vec<String> {
    let mut lines: Vec<String> = document
        .iter()
        .map(|t| {
            let s = match t.subject {
                oxrdf::SubjectRef::BlankNode(_) => "_".to_owned(),
                other => other.to_string(),
            };
            let o = match t.object {
                oxrdf::TermRef::BlankNode(_) => "_".to_owned(),
                other => other.to_string(),
            };
            format!("{s} {} {o}", t.predicate)
        })
        .collect();
    lines.sort();
    lines
}
