//! # Vocabulary Terms
//!
//! IRIs of the vocabularies the engine reads and writes.
//! `rdf` and `xsd` come from [`oxrdf::vocab`]; the rest are declared here.

pub use oxrdf::vocab::{rdf, xsd};

/// schema.org terms (https namespace, as published).
pub mod schema {
    use oxrdf::NamedNodeRef;

    pub const MEDIA_OBJECT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://schema.org/MediaObject");
    pub const CONTENT_URL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://schema.org/contentUrl");
    pub const ENCODING_FORMAT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://schema.org/encodingFormat");
    pub const NAME: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("https://schema.org/name");
    pub const SHA256: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("https://schema.org/sha256");
    pub const SIZE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("https://schema.org/size");
    pub const DATE_CREATED: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://schema.org/dateCreated");
    pub const DATE_MODIFIED: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://schema.org/dateModified");
    pub const ARTICLE_BODY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://schema.org/articleBody");
    pub const TEXT: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("https://schema.org/text");
}

/// OWL terms.
pub mod owl {
    use oxrdf::NamedNodeRef;

    pub const SAME_AS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#sameAs");
}

/// Vocabulary of Interlinked Datasets.
pub mod void {
    use oxrdf::NamedNodeRef;

    pub const NAMESPACE: &str = "http://rdfs.org/ns/void#";

    pub const DATASET: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#Dataset");
    pub const TRIPLES: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#triples");
    pub const CLASSES: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#classes");
    pub const PROPERTIES: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#properties");
    pub const ENTITIES: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#entities");
    pub const DISTINCT_SUBJECTS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#distinctSubjects");
    pub const DISTINCT_OBJECTS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#distinctObjects");
    pub const CLASS_PARTITION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#classPartition");
    pub const PROPERTY_PARTITION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#propertyPartition");
    pub const CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#class");
    pub const PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#property");
    pub const URI_SPACE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#uriSpace");
}
