//! # Template Resolution
//!
//! Maps a document's host and types to a presentation template.
//!
//! Templates live in a directory tree:
//!
//! ```text
//! templates/
//!   Person.html              default domain "_"
//!   _error.html
//!   example.org/
//!     Person.html            only for documents on example.org
//!     _404.html
//! ```
//!
//! The domain is the host of the document URI when a directory of that
//! name exists, otherwise `_`. Within the domain, the first type (in the
//! order given) whose local name has a template wins.

use crate::RdfDocError;
use crate::files::find_files;
use crate::primitives::{DEFAULT_TEMPLATE_DOMAIN, TEMPLATE_FILE_EXTENSIONS};
use oxiri::Iri;
use oxrdf::NamedNodeRef;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// A template chosen for a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMatch {
    /// Registered name, `<domain>/<local name>`.
    pub name: String,
    /// File the template was loaded from.
    pub path: PathBuf,
    /// Local name of the type that selected it.
    pub type_name: String,
}

/// Index of the templates under a root directory.
#[derive(Debug, Clone, Default)]
pub struct TemplateIndex {
    /// (domain, local name) -> file
    entries: BTreeMap<(String, String), PathBuf>,
    domains: BTreeSet<String>,
}

impl TemplateIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `root` for templates.
    ///
    /// Files directly under `root` belong to the default domain; files in
    /// a subdirectory belong to the domain named by that directory. A
    /// missing root yields an empty index.
    pub fn load(root: &Path) -> Result<Self, RdfDocError> {
        let mut index = Self::new();
        if !root.is_dir() {
            return Ok(index);
        }
        for path in find_files(root, TEMPLATE_FILE_EXTENSIONS)? {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let parent = path.parent().unwrap_or(root);
            let domain = if parent == root {
                DEFAULT_TEMPLATE_DOMAIN.to_owned()
            } else {
                parent
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(DEFAULT_TEMPLATE_DOMAIN)
                    .to_owned()
            };
            index.insert(&domain, stem, path.clone());
        }
        Ok(index)
    }

    /// Register a template file for `(domain, name)`.
    pub fn insert(&mut self, domain: &str, name: &str, path: PathBuf) {
        self.domains.insert(domain.to_owned());
        self.entries
            .insert((domain.to_owned(), name.to_owned()), path);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All templates as `(registered name, file)`.
    pub fn iter(&self) -> impl Iterator<Item = (String, &Path)> {
        self.entries
            .iter()
            .map(|((domain, name), path)| (template_name(domain, name), path.as_path()))
    }

    /// Template domain for a host: the host itself when it has templates,
    /// otherwise the default domain.
    #[must_use]
    pub fn domain_for<'a>(&'a self, host: Option<&'a str>) -> &'a str {
        match host {
            Some(host) if self.domains.contains(host) => host,
            _ => DEFAULT_TEMPLATE_DOMAIN,
        }
    }

    /// Registered name of `(domain, name)`, if such a template exists.
    #[must_use]
    pub fn lookup(&self, domain: &str, name: &str) -> Option<String> {
        self.entries
            .contains_key(&(domain.to_owned(), name.to_owned()))
            .then(|| template_name(domain, name))
    }

    /// Find the template for a document at `uri` with the given types.
    #[must_use]
    pub fn find<'a>(
        &self,
        uri: &str,
        types: impl IntoIterator<Item = NamedNodeRef<'a>>,
    ) -> Option<TemplateMatch> {
        let host = hostname(uri);
        let domain = self.domain_for(host.as_deref());
        types.into_iter().find_map(|class| {
            let local = type_local_name(class.as_str());
            let key = (domain.to_owned(), local.to_owned());
            self.entries.get(&key).map(|path| TemplateMatch {
                name: template_name(domain, local),
                path: path.clone(),
                type_name: local.to_owned(),
            })
        })
    }
}

/// Registered name of a template.
#[must_use]
pub fn template_name(domain: &str, name: &str) -> String {
    format!("{domain}/{name}")
}

/// Lowercased host of an IRI, without user info or port.
#[must_use]
pub fn hostname(iri: &str) -> Option<String> {
    let parsed = Iri::parse(iri).ok()?;
    let authority = parsed.authority()?;
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let host = if host.starts_with('[') {
        host.split_once(']').map_or(host, |(h, _)| h).trim_start_matches('[')
    } else {
        host.split_once(':').map_or(host, |(h, _)| h)
    };
    (!host.is_empty()).then(|| host.to_ascii_lowercase())
}

/// Local name of a type IRI: its fragment, or else its last path segment.
#[must_use]
pub fn type_local_name(iri: &str) -> &str {
    if let Some((_, fragment)) = iri.split_once('#') {
        if !fragment.is_empty() {
            return fragment;
        }
    }
    let path = iri.split(['#', '?']).next().unwrap_or(iri);
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn person() -> NamedNodeRef<'static> {
        NamedNodeRef::new_unchecked("https://schema.org/Person")
    }

    fn thing() -> NamedNodeRef<'static> {
        NamedNodeRef::new_unchecked("http://xmlns.com/foaf/0.1/#Thing")
    }

    #[test]
    fn local_names() {
        assert_eq!(type_local_name("https://schema.org/Person"), "Person");
        assert_eq!(type_local_name("http://xmlns.com/foaf/0.1/#Agent"), "Agent");
        assert_eq!(type_local_name("https://ex.org/ns#"), "ns");
        assert_eq!(type_local_name("https://ex.org/a/b?x=1"), "b");
    }

    #[test]
    fn hostnames() {
        assert_eq!(hostname("https://Example.org/a").as_deref(), Some("example.org"));
        assert_eq!(hostname("http://u:p@host:8080/x").as_deref(), Some("host"));
        assert_eq!(hostname("http://[::1]:80/").as_deref(), Some("::1"));
        assert_eq!(hostname("urn:isbn:1"), None);
    }

    #[test]
    fn domain_templates_take_precedence() {
        let mut index = TemplateIndex::new();
        index.insert("_", "Person", PathBuf::from("Person.html"));
        index.insert("example.org", "Person", PathBuf::from("example.org/Person.html"));

        let on_domain = index.find("https://example.org/alice", [person()]).expect("match");
        assert_eq!(on_domain.name, "example.org/Person");
        assert_eq!(on_domain.type_name, "Person");

        let elsewhere = index.find("https://other.org/bob", [person()]).expect("match");
        assert_eq!(elsewhere.name, "_/Person");
    }

    #[test]
    fn example_org_person_lookup() {
        let alice = "https://example.org/alice";

        let mut scoped = TemplateIndex::new();
        scoped.insert("_", "Person", PathBuf::from("Person.html"));
        scoped.insert("example.org", "Person", PathBuf::from("example.org/Person.html"));
        let found = scoped.find(alice, [person()]).expect("scoped");
        assert_eq!(found.path, PathBuf::from("example.org/Person.html"));

        let mut wildcard = TemplateIndex::new();
        wildcard.insert("_", "Person", PathBuf::from("Person.html"));
        let found = wildcard.find(alice, [person()]).expect("wildcard");
        assert_eq!(found.name, "_/Person");
        assert_eq!(found.path, PathBuf::from("Person.html"));

        assert!(TemplateIndex::new().find(alice, [person()]).is_none());
    }

    #[test]
    fn domain_without_match_does_not_fall_back() {
        let mut index = TemplateIndex::new();
        index.insert("_", "Thing", PathBuf::from("Thing.html"));
        index.insert("example.org", "Person", PathBuf::from("example.org/Person.html"));
        assert!(index.find("https://example.org/x", [thing()]).is_none());
    }

    #[test]
    fn first_matching_type_wins() {
        let mut index = TemplateIndex::new();
        index.insert("_", "Person", PathBuf::from("Person.html"));
        index.insert("_", "Thing", PathBuf::from("Thing.html"));
        let found = index.find("https://ex.org/a", [thing(), person()]).expect("match");
        assert_eq!(found.type_name, "Thing");
        assert!(index.find("https://ex.org/a", std::iter::empty()).is_none());
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("example.org")).expect("mkdir");
        fs::write(dir.path().join("Person.html"), "<p>{{uri}}</p>").expect("write");
        fs::write(dir.path().join("_error.html"), "error").expect("write");
        fs::write(dir.path().join("example.org/Person.html"), "x").expect("write");
        fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

        let index = TemplateIndex::load(dir.path()).expect("load");
        assert_eq!(index.len(), 3);
        assert_eq!(index.lookup("_", "_error").as_deref(), Some("_/_error"));
        assert_eq!(index.domain_for(Some("example.org")), "example.org");
        assert_eq!(index.domain_for(Some("other.org")), "_");
        assert_eq!(index.domain_for(None), "_");
    }

    #[test]
    fn missing_root_is_empty() {
        let index = TemplateIndex::load(Path::new("/no/such/templates")).expect("load");
        assert!(index.is_empty());
    }
}
