//! # API Errors
//!
//! Request outcomes that are not a document.

use crate::render::{ErrorPage, Renderer};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use rdfdoc_core::{AcceptHeader, RdfDocError};
use tracing::error;

/// Failure of a document request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No document for the requested URI.
    NotFound,
    /// Nothing the client accepts can be produced.
    NotAcceptable,
    /// Anything else; carries the full error text.
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::NotFound => "The requested URL was not found on the server.",
            Self::NotAcceptable => {
                "The resource identified by the request is only capable of generating \
                 response entities which have content characteristics not acceptable \
                 according to the accept headers sent in the request."
            }
            Self::Internal(_) => {
                "The server encountered an internal error and was unable to complete \
                 your request."
            }
        }
    }

    fn title(&self) -> &'static str {
        self.status().canonical_reason().unwrap_or("Error")
    }

    /// Full error text.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Internal(detail) => detail.clone(),
            other => other.title().to_owned(),
        }
    }

    /// Response for this error, using an HTML error page when the client
    /// accepts HTML and a page exists for `host`.
    ///
    /// 406 never gets a page.
    pub fn into_page(self, renderer: &Renderer, host: Option<&str>, accept: &AcceptHeader) -> Response {
        let status = self.status();
        if status != StatusCode::NOT_ACCEPTABLE && accept.is_provided() && accept.accepts("text/html") {
            let detail = self.detail();
            let page = ErrorPage {
                code: status.as_u16(),
                title: self.title(),
                description: self.description(),
                detail: &detail,
            };
            if let Some(body) = renderer.render_error(host, &page) {
                return (status, Html(body)).into_response();
            }
        }
        self.into_response()
    }
}

impl From<RdfDocError> for ApiError {
    fn from(err: RdfDocError) -> Self {
        error!(error = %err, "request failed");
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.title()).into_response()
    }
}
