//! # Engine Primitives
//!
//! Hardcoded runtime constants for the rdfdoc engine.
//!
//! These are compiled into the binary and are immutable at runtime:
//! file selection, embedding rules, metadata formats and the
//! namespace prefixes bound on every serialized document.

use crate::vocab::schema;
use oxrdf::NamedNodeRef;

// =============================================================================
// FILE SELECTION
// =============================================================================

/// Extensions of statement files loaded from the data root.
///
/// Restricted to the syntaxes `oxrdfio` can parse. Graph names of quad
/// formats are discarded on load.
pub const RDF_FILE_EXTENSIONS: &[&str] = &["ttl", "nt", "nq", "rdf", "n3", "trig", "jsonld"];

/// RDF syntaxes with no parser available. Such files are reported and
/// skipped.
pub const UNSUPPORTED_RDF_FILE_EXTENSIONS: &[&str] = &["trix", "hext"];

/// Extensions of SPARQL update scripts applied after loading.
pub const UPDATE_FILE_EXTENSIONS: &[&str] = &["rq", "sparql"];

/// Extension of presentation templates.
pub const TEMPLATE_FILE_EXTENSIONS: &[&str] = &["html"];

/// Scheme prefix identifying local file references inside statements.
pub const FILE_IRI_PREFIX: &str = "file://";

// =============================================================================
// LOADER RULES
// =============================================================================

/// Predicates whose `file://` objects are replaced by the file's text.
pub const CONTENT_EMBED_PREDICATES: [NamedNodeRef<'static>; 2] =
    [schema::ARTICLE_BODY, schema::TEXT];

/// Format of `xsd:dateTime` values derived from file timestamps (UTC).
pub const XSD_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Read size used when computing file checksums.
pub const CHECKSUM_CHUNK_SIZE: usize = 64 * 1024;

/// Media type used when a file extension is unknown.
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Extension to media type table for MediaObject content files.
pub const FILE_MEDIA_TYPES: &[(&str, &str)] = &[
    ("ttl", "text/turtle"),
    ("nt", "application/n-triples"),
    ("nq", "application/n-quads"),
    ("jsonld", "application/ld+json"),
    ("rdf", "application/rdf+xml"),
    ("n3", "text/n3"),
    ("hext", "application/hext"),
    ("trig", "application/trig"),
    ("trix", "application/trix"),
    ("avif", "image/avif"),
    ("webp", "image/webp"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/vnd.microsoft.icon"),
    ("pdf", "application/pdf"),
    ("bib", "application/x-bibtex"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("zip", "application/zip"),
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("csv", "text/csv"),
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("mp3", "audio/mpeg"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
];

// =============================================================================
// SERIALIZATION
// =============================================================================

/// Namespace prefixes bound on serialized documents.
pub const NAMESPACE_PREFIXES: &[(&str, &str)] = &[
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("schema", "https://schema.org/"),
    ("void", "http://rdfs.org/ns/void#"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("vcard", "http://www.w3.org/2006/vcard/ns#"),
    ("cv", "http://rdfs.org/resume-rdf/cv.rdfs#"),
    ("pim", "http://www.w3.org/ns/pim/space#"),
    ("ldp", "http://www.w3.org/ns/ldp#"),
    ("solid", "http://www.w3.org/ns/solid/terms#"),
    ("sd", "http://www.w3.org/ns/sparql-service-description#"),
];

// =============================================================================
// TEMPLATES & CACHING
// =============================================================================

/// Template bucket used when a host has no domain-scoped templates.
pub const DEFAULT_TEMPLATE_DOMAIN: &str = "_";

/// Maximum number of resolved documents kept per snapshot.
///
/// Once reached, further documents are resolved without being cached.
pub const MAX_CACHED_DOCUMENTS: usize = 10_000;
