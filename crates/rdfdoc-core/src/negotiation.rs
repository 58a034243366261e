//! # Content Negotiation
//!
//! Selects the representation of a document from the client's `Accept`
//! header.
//!
//! Ranking is done by [`headers_accept::Accept::negotiate`]: the highest
//! weight wins, the most specific matching range decides the weight, and
//! ties go to the order of the available list. The list itself is ordered
//! here, with a MediaObject's native format first.
//!
//! Without an `Accept` header the first available type is chosen. A header
//! that is present but cannot be parsed accepts nothing.

use crate::Document;
use crate::formats::DEFAULT_MIMETYPES;
use headers::HeaderMapExt;
use headers_accept::Accept;
use http::header::{ACCEPT, HeaderMap, HeaderValue};
use mediatype::MediaType;

/// What the client stated in its `Accept` header.
#[derive(Debug, Default)]
pub enum AcceptHeader {
    /// No header was sent.
    #[default]
    Absent,
    /// A header was sent but it is not a valid media range list.
    Unparseable,
    /// A parsed media range list.
    Ranges(Accept),
}

impl AcceptHeader {
    /// Read the `Accept` header of a request.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match headers.typed_try_get::<Accept>() {
            Ok(Some(accept)) => Self::Ranges(accept),
            Ok(None) => Self::Absent,
            Err(_) => Self::Unparseable,
        }
    }

    /// Parse a raw header value.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let Ok(value) = HeaderValue::from_str(value) else {
            return Self::Unparseable;
        };
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, value);
        Self::from_headers(&headers)
    }

    /// Parse an optional header value.
    #[must_use]
    pub fn from_header(value: Option<&str>) -> Self {
        value.map(Self::parse).unwrap_or_default()
    }

    /// Whether the client sent an `Accept` header at all.
    #[must_use]
    pub fn is_provided(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Whether `mimetype` is acceptable to the client.
    ///
    /// An absent header accepts everything.
    #[must_use]
    pub fn accepts(&self, mimetype: &str) -> bool {
        self.best_match(&[mimetype]).is_some()
    }

    /// Pick the best entry of `available`.
    ///
    /// Entries that are not valid media types are never chosen.
    #[must_use]
    pub fn best_match<'a, S: AsRef<str>>(&self, available: &'a [S]) -> Option<&'a str> {
        let accept = match self {
            Self::Absent => return available.first().map(AsRef::as_ref),
            Self::Unparseable => return None,
            Self::Ranges(accept) => accept,
        };

        let (names, media_types): (Vec<&'a str>, Vec<MediaType<'_>>) = available
            .iter()
            .filter_map(|candidate| {
                let candidate = candidate.as_ref();
                MediaType::parse(candidate).ok().map(|parsed| (candidate, parsed))
            })
            .unzip();

        let chosen = accept.negotiate(&media_types)?;
        media_types
            .iter()
            .position(|media_type| media_type == chosen)
            .and_then(|index| names.get(index).copied())
    }
}

/// Representations offered for `document`, in preference order.
///
/// A MediaObject offers its native format first, in place of HTML.
#[must_use]
pub fn available_mimetypes(document: &Document) -> Vec<String> {
    let mut available: Vec<String> = DEFAULT_MIMETYPES.iter().map(|m| (*m).to_owned()).collect();
    if let Some(native) = document.encoding_format() {
        available.retain(|m| m != "text/html" && m != native);
        available.insert(0, native.to_owned());
    }
    available
}

/// Choose a representation of `document` for the client's `Accept` header.
///
/// Returns `None` when nothing offered is acceptable.
#[must_use]
pub fn negotiate(document: &Document, accept: &AcceptHeader) -> Option<String> {
    let available = available_mimetypes(document);
    accept.best_match(&available).map(str::to_owned)
}
