//! # Storage Backends
//!
//! Alternative document sources to the in-memory [`crate::TripleStore`].

pub mod sparql_store;

pub use sparql_store::SparqlStore;
