//! # Document Handler
//!
//! The one endpoint: `GET /{path}` answers with the document of
//! `<proto>://<host>/<path>` in the negotiated representation.

use super::AppState;
use super::error::ApiError;
use crate::render::request_hostname;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{self, AsHeaderName, HeaderMap, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use oxrdf::{NamedNode, TermRef};
use rdfdoc_core::files::file_iri_to_path;
use rdfdoc_core::primitives::FILE_IRI_PREFIX;
use rdfdoc_core::vocab::schema;
use rdfdoc_core::{AcceptHeader, Document, Representation, negotiate, redact, serialize};
use std::path::{Path, PathBuf};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, warn};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_ACCEL_REDIRECT: HeaderName = HeaderName::from_static("x-accel-redirect");

// =============================================================================
// REQUEST BASE
// =============================================================================

/// `<proto>://<host>` the client addressed.
///
/// The host comes from `X-Forwarded-For`, else `Host`, else `localhost`;
/// the scheme from `X-Forwarded-Proto`, else `http`. Only the first entry
/// of a forwarded list is used.
pub fn request_base(headers: &HeaderMap) -> String {
    let host = first_value(headers, X_FORWARDED_FOR)
        .or_else(|| first_value(headers, header::HOST))
        .unwrap_or("localhost");
    let proto = first_value(headers, X_FORWARDED_PROTO).unwrap_or("http");
    format!("{proto}://{host}")
}

fn first_value<K: AsHeaderName>(headers: &HeaderMap, name: K) -> Option<&str> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

// =============================================================================
// DOCUMENT HANDLER
// =============================================================================

/// Serve the document addressed by the request.
pub async fn document_handler(State(state): State<AppState>, request: Request) -> Response {
    let accept = AcceptHeader::from_headers(request.headers());
    let base = request_base(request.headers());

    match serve_document(&state, &base, &accept, request).await {
        Ok(response) => response,
        Err(err) => {
            let host = request_hostname(&base);
            err.into_page(&state.renderer, host.as_deref(), &accept)
        }
    }
}

async fn serve_document(
    state: &AppState,
    base: &str,
    accept: &AcceptHeader,
    request: Request,
) -> Result<Response, ApiError> {
    let uri = NamedNode::new(format!("{base}{}", request.uri().path()))
        .map_err(|_| ApiError::NotFound)?;
    let snapshot = state.engine.snapshot();
    let document = snapshot.document(uri.as_ref())?.ok_or(ApiError::NotFound)?;

    let mimetype = negotiate(&document, accept).ok_or(ApiError::NotAcceptable)?;

    if let Some(target) = document.same_as() {
        debug!(uri = %uri, target = %target, "redirecting");
        return Ok((
            StatusCode::TEMPORARY_REDIRECT,
            [(header::LOCATION, header_value(target.as_str())?)],
        )
            .into_response());
    }

    if document.encoding_format() == Some(mimetype.as_str()) {
        let path = native_file(&document)?;
        debug!(uri = %uri, path = %path.display(), "serving native file");
        return serve_native(state, &path, &mimetype, request).await;
    }

    let representation =
        Representation::for_mimetype(&mimetype).ok_or(ApiError::NotAcceptable)?;
    let document = redact(&document);
    debug!(uri = %uri, mimetype = %mimetype, "serving document");

    let body = if representation == Representation::Html {
        let Some(template) = state.renderer.find(&document) else {
            warn!(uri = %uri, "no html template found");
            return Err(ApiError::NotAcceptable);
        };
        state
            .renderer
            .render_document(&document, &template)?
            .into_bytes()
    } else {
        serialize(&document, representation)?
    };

    Ok(([(header::CONTENT_TYPE, header_value(&mimetype)?)], body).into_response())
}

// =============================================================================
// NATIVE FILES
// =============================================================================

/// Local file behind a MediaObject.
fn native_file(document: &Document) -> Result<PathBuf, ApiError> {
    let iri = document
        .graph()
        .objects_for_subject_predicate(document.uri(), schema::CONTENT_URL)
        .find_map(|term| match term {
            TermRef::NamedNode(node) if node.as_str().starts_with(FILE_IRI_PREFIX) => {
                Some(node.as_str())
            }
            _ => None,
        })
        .ok_or_else(|| {
            ApiError::Internal(format!("{} has no file content URL", document.uri()))
        })?;
    Ok(file_iri_to_path(iri)?)
}

async fn serve_native(
    state: &AppState,
    path: &Path,
    mimetype: &str,
    request: Request,
) -> Result<Response, ApiError> {
    let content_type = header_value(mimetype)?;

    if state.config.use_x_accel_redirect {
        let location = header_value(&path.to_string_lossy())?;
        return Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type), (X_ACCEL_REDIRECT, location)],
        )
            .into_response());
    }

    let mut response = match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    };
    if response.status().is_success() {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    Ok(response)
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value)
        .map_err(|e| ApiError::Internal(format!("invalid header value {value:?}: {e}")))
}
