//! # Engine Tests
//!
//! Load a fixture tree end to end and check the resulting snapshot with
//! both resolvers.

use oxrdf::NamedNodeRef;
use rdfdoc_core::void::statistic;
use rdfdoc_core::vocab::void;
use rdfdoc_core::{Engine, EngineConfig, ResolverKind};
use std::fs;
use std::path::Path;
use std::sync::Arc;

// =============================================================================
// FIXTURE
// =============================================================================

fn write(root: &Path, relative: &str, body: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, body).expect("write");
}

/// Statement files in three formats and nested directories, plus one
/// update script.
fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    write(
        root,
        "data/a/people.ttl",
        "@prefix schema: <https://schema.org/> .\n\
         <https://ex.org/alice> a schema:Person ;\n\
             schema:name \"Alice\" ;\n\
             schema:knows [ schema:name \"Bob\" ] .\n",
    );
    write(
        root,
        "data/b/more.nt",
        "<https://other.org/x> <https://schema.org/name> \"X\" .\n",
    );
    write(
        root,
        "data/c/quads.trig",
        "<https://g> { <https://ex.org/carol> <https://schema.org/name> \"Carol\" . }\n",
    );
    write(
        root,
        "data/urn.ttl",
        "<urn:isbn:1> <https://schema.org/name> \"Book\" .\n",
    );
    write(
        root,
        "queries/01-rename.rq",
        "PREFIX schema: <https://schema.org/>\n\
         DELETE { ?s schema:name \"Carol\" } INSERT { ?s schema:name \"Caroline\" }\n\
         WHERE { ?s schema:name \"Carol\" }\n",
    );
    dir
}

fn config(root: &Path, resolver: ResolverKind) -> EngineConfig {
    let mut config = EngineConfig::new(root.join("data"));
    config.queries_path = Some(root.join("queries"));
    config.resolver = resolver;
    config
}

fn uri(iri: &str) -> NamedNodeRef<'_> {
    NamedNodeRef::new_unchecked(iri)
}

// =============================================================================
// TESTS
// =============================================================================

#[test]
fn snapshot_report() {
    let dir = fixture();
    let engine = Engine::open(config(dir.path(), ResolverKind::Memory)).expect("open");
    let snapshot = engine.snapshot();
    let report = snapshot.report();

    assert_eq!(report.load.statement_files, 4);
    assert_eq!(report.load.update_scripts, 1);
    assert_eq!(report.partitions.datasets.get("https://ex.org/"), Some(&5));
    assert_eq!(report.partitions.datasets.get("https://other.org/"), Some(&1));
    // Bob's blank node and the URN
    assert_eq!(report.partitions.unpartitioned, 2);
    assert_eq!(report.triples, report.load.triples + report.partitions.void_triples);
}

#[test]
fn update_scripts_are_applied() {
    let dir = fixture();
    let engine = Engine::open(config(dir.path(), ResolverKind::Memory)).expect("open");
    let carol = engine
        .snapshot()
        .document(uri("https://ex.org/carol"))
        .expect("resolve")
        .expect("found");
    let text: Vec<String> = carol.sorted_triples().iter().map(ToString::to_string).collect();
    assert_eq!(text.len(), 1);
    assert!(text[0].contains("\"Caroline\""));
}

#[test]
fn dataset_document_carries_statistics() {
    let dir = fixture();
    let engine = Engine::open(config(dir.path(), ResolverKind::Memory)).expect("open");
    let dataset = engine
        .snapshot()
        .document(uri("https://ex.org/"))
        .expect("resolve")
        .expect("found");
    let triples = dataset.sorted_triples();

    assert_eq!(statistic(&triples, "https://ex.org/", void::TRIPLES), Some(5));
    assert_eq!(statistic(&triples, "https://ex.org/", void::CLASSES), Some(1));
    // Partition nodes are fragments of the dataset IRI
    assert!(
        triples
            .iter()
            .filter(|t| t.predicate == void::CLASS_PARTITION)
            .all(|t| t.object.to_string().starts_with("<https://ex.org/#"))
    );
    assert!(
        !triples
            .iter()
            .any(|t| t.to_string().contains("https://ex.org/_"))
    );
}

#[test]
fn resolvers_agree() {
    let dir = fixture();
    let memory = Engine::open(config(dir.path(), ResolverKind::Memory)).expect("open");
    let query = Engine::open(config(dir.path(), ResolverKind::Query)).expect("open");

    for iri in ["https://ex.org/alice", "https://ex.org/", "https://other.org/x"] {
        let a = memory.snapshot().document(uri(iri)).expect("memory").expect("found");
        let b = query.snapshot().document(uri(iri)).expect("query").expect("found");
        assert_eq!(a.len(), b.len(), "{iri}");
    }
    assert!(
        query
            .snapshot()
            .document(uri("https://ex.org/nobody"))
            .expect("query")
            .is_none()
    );
}

#[test]
fn documents_are_cached_per_snapshot() {
    let dir = fixture();
    let engine = Engine::open(config(dir.path(), ResolverKind::Memory)).expect("open");
    let snapshot = engine.snapshot();
    let first = snapshot.document(uri("https://ex.org/alice")).expect("resolve").expect("found");
    let second = snapshot.document(uri("https://ex.org/alice")).expect("resolve").expect("found");
    assert!(Arc::ptr_eq(&first, &second));

    let reloaded = engine.reload().expect("reload");
    let third = reloaded.document(uri("https://ex.org/alice")).expect("resolve").expect("found");
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(first.sorted_triples(), third.sorted_triples());
}

#[test]
fn broken_update_script_fails_the_load() {
    let dir = fixture();
    write(dir.path(), "queries/02-broken.rq", "DELETE WHERE {");
    assert!(Engine::open(config(dir.path(), ResolverKind::Memory)).is_err());
}
