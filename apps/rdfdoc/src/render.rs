//! # HTML Rendering
//!
//! Handlebars registry over the template tree, plus the helpers templates
//! can call:
//!
//! - `{{{markdown text}}}` renders Markdown to HTML
//! - `{{#each (sort_by_predicate subjects document predicate)}}` orders
//!   subject keys by the first value of `predicate`
//!
//! Every template sees the document view from `rdfdoc_core::formats::view`
//! plus `document_uri`, `template_type`, `current_year` and `app_debug`.
//! Error pages see `error_code`, `error_title`, `error_description` and
//! `error_message`.

use chrono::Datelike;
use handlebars::{Handlebars, handlebars_helper};
use pulldown_cmark::{Options, Parser, html};
use rdfdoc_core::formats::document_view;
use rdfdoc_core::primitives::DEFAULT_TEMPLATE_DOMAIN;
use rdfdoc_core::templates::hostname;
use rdfdoc_core::{Document, RdfDocError, TemplateIndex, TemplateMatch};
use serde_json::{Map, Value, json};
use std::cmp::Ordering;
use std::path::Path;
use tracing::{debug, info, warn};

// =============================================================================
// HELPERS
// =============================================================================

handlebars_helper!(markdown: |text: str| markdown_to_html(text));

handlebars_helper!(sort_by_predicate: |subjects: array, document: object, predicate: str| {
    sort_subjects(subjects, document, predicate)
});

/// Markdown to HTML with tables, footnotes and strikethrough.
pub fn markdown_to_html(text: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_FOOTNOTES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(text, opts);
    let mut output = String::new();
    html::push_html(&mut output, parser);
    output
}

/// Order `subjects` by the first value of `predicate` in `document`.
///
/// A subject is either a key string or a term object with a `key`.
/// Subjects without a value keep their relative order after the others.
pub fn sort_subjects(subjects: &[Value], document: &Map<String, Value>, predicate: &str) -> Vec<Value> {
    let sort_key = |subject: &Value| -> Option<String> {
        let key = match subject {
            Value::String(key) => key.as_str(),
            other => other.get("key")?.as_str()?,
        };
        let first = document.get(key)?.get(predicate)?.get(0)?;
        first.get("value")?.as_str().map(str::to_owned)
    };

    let mut keyed: Vec<(Option<String>, Value)> = subjects
        .iter()
        .map(|subject| (sort_key(subject), subject.clone()))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    keyed.into_iter().map(|(_, subject)| subject).collect()
}

fn current_year() -> i32 {
    chrono::Utc::now().year()
}

// =============================================================================
// RENDERER
// =============================================================================

/// Details shown on an error page.
#[derive(Debug, Clone)]
pub struct ErrorPage<'a> {
    pub code: u16,
    pub title: &'a str,
    pub description: &'a str,
    /// Full error text; only shown in debug mode.
    pub detail: &'a str,
}

/// Compiled templates and the index used to choose between them.
pub struct Renderer {
    registry: Handlebars<'static>,
    index: TemplateIndex,
    debug: bool,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("templates", &self.index.len())
            .field("debug", &self.debug)
            .finish()
    }
}

impl Renderer {
    /// Compile every template under `root`. A missing root gives an empty
    /// renderer.
    pub fn load(root: &Path, debug: bool) -> Result<Self, RdfDocError> {
        let index = TemplateIndex::load(root)?;
        let mut registry = Handlebars::new();
        registry.register_helper("markdown", Box::new(markdown));
        registry.register_helper("sort_by_predicate", Box::new(sort_by_predicate));

        for (name, path) in index.iter() {
            registry
                .register_template_file(&name, path)
                .map_err(|e| RdfDocError::Template(format!("{}: {}", path.display(), e)))?;
            debug!(template = %name, path = %path.display(), "template registered");
        }
        info!(templates = index.len(), root = %root.display(), "templates loaded");

        Ok(Self {
            registry,
            index,
            debug,
        })
    }

    /// Renderer without templates.
    #[must_use]
    pub fn empty(debug: bool) -> Self {
        Self {
            registry: Handlebars::new(),
            index: TemplateIndex::new(),
            debug,
        }
    }

    #[must_use]
    pub fn index(&self) -> &TemplateIndex {
        &self.index
    }

    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Template for `document`, chosen by its host and types.
    #[must_use]
    pub fn find(&self, document: &Document) -> Option<TemplateMatch> {
        self.index.find(document.uri().as_str(), document.types())
    }

    /// Render `document` with the template `template`.
    pub fn render_document(
        &self,
        document: &Document,
        template: &TemplateMatch,
    ) -> Result<String, RdfDocError> {
        let mut context = document_view(document);
        if let Value::Object(map) = &mut context {
            map.insert("document_uri".to_owned(), json!(document.uri().as_str()));
            map.insert("template_type".to_owned(), json!(template.type_name));
            map.insert("current_year".to_owned(), json!(current_year()));
            map.insert("app_debug".to_owned(), json!(self.debug));
        }
        self.registry
            .render(&template.name, &context)
            .map_err(|e| RdfDocError::Template(format!("{}: {}", template.name, e)))
    }

    /// Render the error page for a request on `host`, if one exists.
    ///
    /// Candidates, in order: `<host>/_<code>`, `<host>/_error`, `_/_<code>`,
    /// `_/_error`.
    #[must_use]
    pub fn render_error(&self, host: Option<&str>, page: &ErrorPage<'_>) -> Option<String> {
        let code = format!("_{}", page.code);
        let mut candidates = Vec::with_capacity(4);
        if let Some(host) = host {
            candidates.push((host, code.as_str()));
            candidates.push((host, "_error"));
        }
        candidates.push((DEFAULT_TEMPLATE_DOMAIN, code.as_str()));
        candidates.push((DEFAULT_TEMPLATE_DOMAIN, "_error"));

        let name = candidates
            .into_iter()
            .find_map(|(domain, name)| self.index.lookup(domain, name))?;

        let message = if self.debug { page.detail } else { page.title };
        let context = json!({
            "error_code": page.code,
            "error_title": page.title,
            "error_description": page.description,
            "error_message": message,
            "current_year": current_year(),
            "app_debug": self.debug,
        });
        match self.registry.render(&name, &context) {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(template = %name, error = %e, "error page failed to render");
                None
            }
        }
    }
}

/// Host of a request base such as `https://example.org:8443`.
#[must_use]
pub fn request_hostname(base: &str) -> Option<String> {
    hostname(&format!("{base}/"))
}
