//! # Representation Formats
//!
//! Media types a document can be served as, and their serializers.
//!
//! - RDF syntaxes are written by `oxrdfio` with the standard prefixes bound
//! - JSON-LD is written in expanded form ([`jsonld`])
//! - HTML is rendered from templates by the server, using [`view`]

pub mod jsonld;
pub mod view;

use crate::primitives::NAMESPACE_PREFIXES;
use crate::{Document, RdfDocError};
use oxrdfio::{RdfFormat, RdfSerializer};

pub use view::document_view;

/// Representations offered for every document, in preference order.
pub const DEFAULT_MIMETYPES: [&str; 7] = [
    "text/turtle",
    "text/plain",
    "text/html",
    "text/n3",
    "application/ld+json",
    "application/n-triples",
    "application/rdf+xml",
];

/// How a negotiated media type is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Turtle,
    NTriples,
    RdfXml,
    JsonLd,
    /// Rendered from a template.
    Html,
}

impl Representation {
    /// Representation producing `mimetype`, if it is one of the built-in types.
    #[must_use]
    pub fn for_mimetype(mimetype: &str) -> Option<Self> {
        match mimetype {
            "text/turtle" | "text/plain" | "text/n3" => Some(Self::Turtle),
            "application/n-triples" => Some(Self::NTriples),
            "application/rdf+xml" => Some(Self::RdfXml),
            "application/ld+json" => Some(Self::JsonLd),
            "text/html" => Some(Self::Html),
            _ => None,
        }
    }

    fn rdf_format(self) -> Option<RdfFormat> {
        match self {
            Self::Turtle => Some(RdfFormat::Turtle),
            Self::NTriples => Some(RdfFormat::NTriples),
            Self::RdfXml => Some(RdfFormat::RdfXml),
            Self::JsonLd | Self::Html => None,
        }
    }
}

/// Serialize `document` as `representation`.
///
/// Statements are written in a stable order. HTML is not a serialization
/// and is rejected here.
pub fn serialize(document: &Document, representation: Representation) -> Result<Vec<u8>, RdfDocError> {
    if representation == Representation::JsonLd {
        return jsonld::to_vec(document);
    }
    let format = representation.rdf_format().ok_or_else(|| {
        RdfDocError::Serialization(format!("{representation:?} is not an RDF syntax"))
    })?;

    let mut serializer = RdfSerializer::from_format(format);
    for (prefix, iri) in NAMESPACE_PREFIXES {
        serializer = serializer
            .with_prefix(*prefix, *iri)
            .map_err(|e| RdfDocError::Serialization(e.to_string()))?;
    }
    let mut writer = serializer.for_writer(Vec::new());
    for triple in document.sorted_triples() {
        writer
            .serialize_triple(triple.as_ref())
            .map_err(|e| RdfDocError::Serialization(e.to_string()))?;
    }
    writer
        .finish()
        .map_err(|e| RdfDocError::Serialization(e.to_string()))
}
