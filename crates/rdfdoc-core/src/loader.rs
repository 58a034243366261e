//! # Loader Module
//!
//! Builds the [`TripleStore`] from the data directory.
//!
//! - Parse every statement file under the data root
//! - Resolve `file://` references relative to the file that contains them
//! - Embed referenced text for content predicates
//! - Derive file metadata for every MediaObject
//! - Apply SPARQL update scripts in enumeration order
//!
//! Any failure aborts the load; a partially loaded store is never returned.

use crate::files::{
    extension_of, file_iri_to_path, find_files, guess_media_type, path_to_file_iri,
    resolve_file_reference, sha256_file,
};
use crate::graph::TripleStore;
use crate::primitives::{
    CONTENT_EMBED_PREDICATES, FILE_IRI_PREFIX, RDF_FILE_EXTENSIONS,
    UNSUPPORTED_RDF_FILE_EXTENSIONS, UPDATE_FILE_EXTENSIONS, XSD_DATETIME_FORMAT,
};
use crate::storage::SparqlStore;
use crate::vocab::{rdf, schema, xsd};
use crate::RdfDocError;
use chrono::{DateTime, Utc};
use oxrdf::{Literal, Subject, SubjectRef, Term, TermRef, Triple, TripleRef};
use oxrdfio::{RdfFormat, RdfParser};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Summary of a completed load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub statement_files: usize,
    /// Statement files in a syntax that cannot be parsed.
    pub skipped_files: usize,
    pub update_scripts: usize,
    pub media_objects: usize,
    pub triples: usize,
}

/// The Loader turns a data directory into a store.
#[derive(Debug, Clone)]
pub struct Loader {
    data_path: PathBuf,
    queries_path: Option<PathBuf>,
}

impl Loader {
    /// Create a loader reading statement files from `data_path`.
    #[must_use]
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            queries_path: None,
        }
    }

    /// Also apply the update scripts found under `queries_path`.
    #[must_use]
    pub fn with_queries(mut self, queries_path: impl Into<PathBuf>) -> Self {
        self.queries_path = Some(queries_path.into());
        self
    }

    /// Load the store.
    ///
    /// # Errors
    /// Returns an error if the data root is missing, any statement file is
    /// malformed, a referenced file is missing, a MediaObject lacks a file
    /// content URL, or an update script fails.
    pub fn load(&self) -> Result<(TripleStore, LoadReport), RdfDocError> {
        if !self.data_path.is_dir() {
            return Err(RdfDocError::Io(format!(
                "data directory not found: {}",
                self.data_path.display()
            )));
        }

        let mut report = LoadReport::default();
        let mut store = TripleStore::new();
        for path in find_files(&self.data_path, RDF_FILE_EXTENSIONS)? {
            let file_store = parse_statement_file(&path)?;
            info!(path = %path.display(), "loaded statement file");
            debug!(path = %path.display(), triples = file_store.len(), "statement file triples");
            store.extend_from(&file_store);
            report.statement_files += 1;
        }
        for path in find_files(&self.data_path, UNSUPPORTED_RDF_FILE_EXTENSIONS)? {
            warn!(path = %path.display(), "unsupported statement syntax, file skipped");
            report.skipped_files += 1;
        }

        report.media_objects = annotate_media_objects(&mut store)?;

        let scripts = match &self.queries_path {
            Some(root) if root.is_dir() => find_files(root, UPDATE_FILE_EXTENSIONS)?,
            Some(root) => {
                debug!(path = %root.display(), "no update script directory");
                Vec::new()
            }
            None => Vec::new(),
        };
        report.update_scripts = scripts.len();
        let store = apply_updates(store, &scripts)?;

        report.triples = store.len();
        info!(
            files = report.statement_files,
            skipped = report.skipped_files,
            scripts = report.update_scripts,
            media_objects = report.media_objects,
            triples = report.triples,
            "store loaded"
        );
        Ok((store, report))
    }
}

/// Parse one statement file and resolve its `file://` references.
///
/// Graph names of quad syntaxes are dropped. Relative IRIs resolve against
/// the file's own location.
pub fn parse_statement_file(path: &Path) -> Result<TripleStore, RdfDocError> {
    let parse_error = |message: String| RdfDocError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let format = extension_of(path)
        .and_then(|ext| RdfFormat::from_extension(&ext))
        .ok_or_else(|| parse_error("unsupported statement syntax".to_owned()))?;

    let absolute = path.canonicalize()?;
    let parser = RdfParser::from_format(format)
        .with_base_iri(path_to_file_iri(&absolute)?.into_string())
        .map_err(|e| parse_error(e.to_string()))?;

    let mut store = TripleStore::new();
    for quad in parser.for_reader(BufReader::new(File::open(path)?)) {
        let quad = quad.map_err(|e| parse_error(e.to_string()))?;
        store.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
    }

    resolve_file_references(&mut store, path)?;
    Ok(store)
}

/// Rewrite every `file://` object of `store`.
///
/// Objects of content predicates are replaced by the text of the file;
/// any other reference becomes an absolute `file://` IRI.
pub fn resolve_file_references(
    store: &mut TripleStore,
    statement_file: &Path,
) -> Result<usize, RdfDocError> {
    let references: Vec<Triple> = store
        .iter()
        .filter(|triple| {
            matches!(triple.object, TermRef::NamedNode(node) if node.as_str().starts_with(FILE_IRI_PREFIX))
        })
        .map(TripleRef::into_owned)
        .collect();

    for triple in &references {
        let Term::NamedNode(target) = &triple.object else {
            continue;
        };
        let path = resolve_file_reference(target.as_str(), statement_file)?;
        let embed = CONTENT_EMBED_PREDICATES
            .iter()
            .any(|predicate| predicate.as_str() == triple.predicate.as_str());
        if embed {
            warn!(subject = %triple.subject, path = %path.display(), "embedding file content");
            let text = fs::read_to_string(&path)?;
            store.set(
                triple.subject.clone(),
                triple.predicate.as_ref(),
                Literal::new_simple_literal(text),
            );
        } else {
            store.remove(triple);
            let absolute = path_to_file_iri(&path)?;
            store.insert(TripleRef::new(&triple.subject, &triple.predicate, &absolute));
        }
    }
    Ok(references.len())
}

/// Derive name, format, checksum, size and timestamps for every MediaObject.
///
/// Values replace any previously stated ones. Returns the number of
/// MediaObjects annotated.
pub fn annotate_media_objects(store: &mut TripleStore) -> Result<usize, RdfDocError> {
    let subjects: Vec<Subject> = store
        .subjects_for(rdf::TYPE, schema::MEDIA_OBJECT)
        .map(SubjectRef::into_owned)
        .collect();

    for subject in &subjects {
        let content_url = store
            .objects_for(subject, schema::CONTENT_URL)
            .find_map(|term| match term {
                TermRef::NamedNode(node) if node.as_str().starts_with(FILE_IRI_PREFIX) => {
                    Some(node.as_str().to_owned())
                }
                _ => None,
            })
            .ok_or_else(|| RdfDocError::MissingContentUrl(subject.to_string()))?;

        let path = file_iri_to_path(&content_url)?;
        let metadata =
            fs::metadata(&path).map_err(|_| RdfDocError::MissingFile(content_url.clone()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let modified = metadata.modified()?;
        let created = metadata.created().unwrap_or(modified);

        store.set(subject.clone(), schema::NAME, Literal::new_simple_literal(name));
        store.set(
            subject.clone(),
            schema::ENCODING_FORMAT,
            Literal::new_simple_literal(guess_media_type(&path)),
        );
        store.set(
            subject.clone(),
            schema::SHA256,
            Literal::new_simple_literal(sha256_file(&path)?),
        );
        store.set(
            subject.clone(),
            schema::SIZE,
            Literal::new_typed_literal(metadata.len().to_string(), xsd::INTEGER),
        );
        store.set(subject.clone(), schema::DATE_CREATED, xsd_datetime(created));
        store.set(subject.clone(), schema::DATE_MODIFIED, xsd_datetime(modified));
        debug!(subject = %subject, path = %path.display(), "annotated media object");
    }
    Ok(subjects.len())
}

/// Run SPARQL update scripts against the store, in order.
pub fn apply_updates(store: TripleStore, scripts: &[PathBuf]) -> Result<TripleStore, RdfDocError> {
    if scripts.is_empty() {
        return Ok(store);
    }
    let sparql = SparqlStore::from_triples(&store)?;
    for script in scripts {
        let text = fs::read_to_string(script)?;
        sparql.update(&text, script)?;
        info!(path = %script.display(), "applied update script");
    }
    sparql.to_triples()
}

fn xsd_datetime(time: SystemTime) -> Literal {
    let time: DateTime<Utc> = time.into();
    Literal::new_typed_literal(time.format(XSD_DATETIME_FORMAT).to_string(), xsd::DATE_TIME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{NamedNode, NamedNodeRef};
    use std::fs;

    fn node(iri: &str) -> NamedNode {
        NamedNode::new_unchecked(iri)
    }

    #[test]
    fn embeds_text_and_absolutizes_other_references() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("body.md"), "Hello *world*").expect("write");
        fs::write(dir.path().join("cv.pdf"), b"%PDF").expect("write");
        fs::write(
            dir.path().join("data.ttl"),
            "@prefix schema: <https://schema.org/> .\n\
             <https://example.org/a> schema:articleBody <file://body.md> ;\n\
                 schema:url <file://cv.pdf> .\n",
        )
        .expect("write");

        let store = parse_statement_file(&dir.path().join("data.ttl")).expect("parse");
        assert_eq!(store.len(), 2);
        let a = node("https://example.org/a");
        let body: Vec<String> = store
            .objects_for(&a, schema::ARTICLE_BODY)
            .map(|t| t.to_string())
            .collect();
        assert_eq!(body, vec!["\"Hello *world*\"".to_string()]);

        let url = store
            .objects_for(&a, NamedNodeRef::new_unchecked("https://schema.org/url"))
            .next()
            .map(|t| t.to_string())
            .expect("url");
        assert!(url.starts_with("<file:///"));
        assert!(url.ends_with("cv.pdf>"));
    }

    #[test]
    fn missing_reference_aborts() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("data.ttl"),
            "<https://example.org/a> <https://schema.org/text> <file://nope.txt> .\n",
        )
        .expect("write");
        let err = parse_statement_file(&dir.path().join("data.ttl"));
        assert!(matches!(err, Err(RdfDocError::MissingFile(_))));
    }

    #[test]
    fn malformed_file_aborts_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("bad.ttl"), "this is not turtle").expect("write");
        let err = Loader::new(dir.path()).load();
        assert!(matches!(err, Err(RdfDocError::Parse { ref path, .. }) if path.ends_with("bad.ttl")));
    }

    #[test]
    fn media_object_metadata() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("photo.png"), b"abc").expect("write");
        fs::write(
            dir.path().join("media.ttl"),
            "@prefix schema: <https://schema.org/> .\n\
             <https://example.org/photo> a schema:MediaObject ;\n\
                 schema:contentUrl <file://photo.png> ;\n\
                 schema:name \"stale\" .\n",
        )
        .expect("write");

        let (store, report) = Loader::new(dir.path()).load().expect("load");
        assert_eq!(report.media_objects, 1);
        let photo = node("https://example.org/photo");
        let value = |predicate: NamedNodeRef<'_>| {
            store
                .objects_for(&photo, predicate)
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(value(schema::NAME), vec!["\"photo.png\"".to_string()]);
        assert_eq!(value(schema::ENCODING_FORMAT), vec!["\"image/png\"".to_string()]);
        assert_eq!(
            value(schema::SHA256),
            vec!["\"ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad\"".to_string()]
        );
        assert_eq!(
            value(schema::SIZE),
            vec!["\"3\"^^<http://www.w3.org/2001/XMLSchema#integer>".to_string()]
        );
        let modified = value(schema::DATE_MODIFIED);
        assert_eq!(modified.len(), 1);
        assert!(modified[0].ends_with("^^<http://www.w3.org/2001/XMLSchema#dateTime>"));
        assert_eq!(value(schema::DATE_CREATED).len(), 1);
    }

    #[test]
    fn media_object_without_content_url_aborts() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("media.ttl"),
            "<https://example.org/m> a <https://schema.org/MediaObject> .\n",
        )
        .expect("write");
        let err = Loader::new(dir.path()).load();
        assert!(matches!(err, Err(RdfDocError::MissingContentUrl(_))));
    }

    #[test]
    fn update_scripts_run_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let data = dir.path().join("data");
        let queries = dir.path().join("queries");
        fs::create_dir_all(&data).expect("mkdir");
        fs::create_dir_all(&queries).expect("mkdir");
        fs::write(
            data.join("a.nt"),
            "<https://example.org/a> <https://example.org/p> \"1\" .\n",
        )
        .expect("write");
        fs::write(
            queries.join("01-add.rq"),
            "INSERT DATA { <https://example.org/b> <https://example.org/p> \"2\" }",
        )
        .expect("write");
        fs::write(
            queries.join("02-drop.sparql"),
            "DELETE WHERE { <https://example.org/a> ?p ?o }",
        )
        .expect("write");

        let (store, report) = Loader::new(&data).with_queries(&queries).load().expect("load");
        assert_eq!(report.update_scripts, 2);
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.iri_subjects().map(|n| n.as_str().to_owned()).collect::<Vec<_>>(),
            vec!["https://example.org/b".to_string()]
        );
    }

    #[test]
    fn json_ld_files_are_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("people.jsonld"),
            r#"{"@id": "https://example.org/a", "https://schema.org/name": "A"}"#,
        )
        .expect("write");

        let (store, report) = Loader::new(dir.path()).load().expect("load");
        assert_eq!(report.statement_files, 1);
        let a = node("https://example.org/a");
        let names: Vec<String> = store.objects_for(&a, schema::NAME).map(|t| t.to_string()).collect();
        assert_eq!(names, vec!["\"A\"".to_string()]);
    }

    #[test]
    fn unsupported_syntaxes_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("a.nt"), "<https://example.org/a> <https://example.org/p> \"1\" .\n")
            .expect("write");
        fs::write(dir.path().join("b.trix"), "<TriX/>").expect("write");
        fs::write(dir.path().join("c.hext"), "[]").expect("write");

        let (store, report) = Loader::new(dir.path()).load().expect("load");
        assert_eq!(report.statement_files, 1);
        assert_eq!(report.skipped_files, 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_data_root_is_an_error() {
        let err = Loader::new("/definitely/not/here").load();
        assert!(matches!(err, Err(RdfDocError::Io(_))));
    }
}
