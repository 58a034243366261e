//! # rdfdoc
//!
//! Library half of the rdfdoc binary: HTTP surface, CLI, configuration and
//! HTML rendering on top of `rdfdoc-core`.
//!
//! Split from `main.rs` so integration tests can build the router.

pub mod api;
pub mod cli;
pub mod config;
pub mod render;
