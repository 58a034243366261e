//! # Local File Helpers
//!
//! Enumeration of input files and conversion between `file://` IRIs and
//! local paths.

use crate::RdfDocError;
use crate::primitives::{
    CHECKSUM_CHUNK_SIZE, FALLBACK_MEDIA_TYPE, FILE_IRI_PREFIX, FILE_MEDIA_TYPES,
};
use oxrdf::NamedNode;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use url::Url;
use walkdir::WalkDir;

/// Recursively list the files under `root` whose extension is one of
/// `extensions` (case-insensitive).
///
/// Entries are visited depth-first with siblings sorted by file name, so
/// the order is stable across platforms.
pub fn find_files(root: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, RdfDocError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| RdfDocError::Io(e.to_string()))?;
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Lowercased extension of `path`.
#[must_use]
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    extension_of(path).is_some_and(|ext| extensions.contains(&ext.as_str()))
}

/// Guess the media type of a file from its extension.
#[must_use]
pub fn guess_media_type(path: &Path) -> &'static str {
    extension_of(path)
        .and_then(|ext| {
            FILE_MEDIA_TYPES
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, media_type)| *media_type)
        })
        .unwrap_or(FALLBACK_MEDIA_TYPE)
}

/// Hex-encoded SHA-256 of a file, read in fixed-size chunks.
pub fn sha256_file(path: &Path) -> Result<String, RdfDocError> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHECKSUM_CHUNK_SIZE];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

// =============================================================================
// FILE IRIS
// =============================================================================

/// Local path of an absolute `file://` IRI.
pub fn file_iri_to_path(iri: &str) -> Result<PathBuf, RdfDocError> {
    Url::parse(iri)
        .ok()
        .filter(|url| url.scheme() == "file")
        .and_then(|url| url.to_file_path().ok())
        .ok_or_else(|| RdfDocError::InvalidFileIri(iri.to_owned()))
}

/// Absolute `file://` IRI for an absolute `path`.
pub fn path_to_file_iri(path: &Path) -> Result<NamedNode, RdfDocError> {
    let url = Url::from_file_path(path)
        .map_err(|()| RdfDocError::InvalidFileIri(path.display().to_string()))?;
    NamedNode::new(String::from(url)).map_err(|e| RdfDocError::InvalidIri(e.to_string()))
}

/// Resolve a `file://` reference against the directory of the statement
/// file that contains it. The target must exist.
///
/// `file://notes/a.md` is relative to that directory; `file:///srv/a.md`
/// is absolute.
pub fn resolve_file_reference(iri: &str, statement_file: &Path) -> Result<PathBuf, RdfDocError> {
    let reference = iri
        .strip_prefix(FILE_IRI_PREFIX)
        .ok_or_else(|| RdfDocError::InvalidFileIri(iri.to_owned()))?;
    let directory = match statement_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let base = Url::from_directory_path(directory.canonicalize()?)
        .map_err(|()| RdfDocError::InvalidFileIri(directory.display().to_string()))?;
    let target = base
        .join(reference)
        .ok()
        .and_then(|url| url.to_file_path().ok())
        .ok_or_else(|| RdfDocError::InvalidFileIri(iri.to_owned()))?;
    target
        .canonicalize()
        .map_err(|_| RdfDocError::MissingFile(iri.to_owned()))
}
