//! # CLI Command Implementations

use crate::api::{self, AppState};
use crate::config::ServerConfig;
use crate::render::Renderer;
use oxrdf::NamedNode;
use rdfdoc_core::{
    Engine, RdfDocError, Representation, SnapshotReport, TemplateIndex, redact, serialize,
};

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Load the store and start the HTTP server.
pub async fn cmd_serve(
    config: ServerConfig,
    host: &str,
    port: u16,
    quiet: bool,
) -> Result<(), RdfDocError> {
    if !quiet {
        println!("rdfdoc {} starting...", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Configuration:");
        println!("  Host:      {}", host);
        println!("  Port:      {}", port);
        println!("  Data:      {}", config.data_path.display());
        println!("  Queries:   {}", config.queries_path.display());
        println!("  Templates: {}", config.template_path.display());
        println!("  Resolver:  {}", config.resolver);
        println!("  X-Accel:   {}", config.use_x_accel_redirect);
        println!("  Debug:     {}", config.debug);
        println!();
        println!("Press Ctrl+C to stop");
        println!();
    }

    let state = AppState::load(config)?;
    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, state).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Load the store and print its statistics.
pub fn cmd_status(config: &ServerConfig, json_mode: bool) -> Result<(), RdfDocError> {
    let engine = Engine::open(config.engine_config()?)?;
    let snapshot = engine.snapshot();
    let report = snapshot.report();

    if json_mode {
        println!("{}", status_json(report)?);
        return Ok(());
    }

    print!("{}", format_status(config, report));
    Ok(())
}

/// Machine-readable status report.
pub fn status_json(report: &SnapshotReport) -> Result<String, RdfDocError> {
    serde_json::to_string_pretty(report).map_err(|e| RdfDocError::Serialization(e.to_string()))
}

/// Human-readable status report.
pub fn format_status(config: &ServerConfig, report: &SnapshotReport) -> String {
    let mut out = String::new();
    out.push_str("rdfdoc Store Status\n");
    out.push_str("===================\n");
    out.push_str(&format!("Data:          {}\n", config.data_path.display()));
    out.push_str(&format!("Resolver:      {}\n", report.resolver));
    out.push_str(&format!("Loaded at:     {}\n", report.loaded_at));
    out.push('\n');
    out.push_str(&format!("Files:         {}\n", report.load.statement_files));
    out.push_str(&format!("Skipped:       {}\n", report.load.skipped_files));
    out.push_str(&format!("Updates:       {}\n", report.load.update_scripts));
    out.push_str(&format!("MediaObjects:  {}\n", report.load.media_objects));
    out.push_str(&format!("Triples:       {}\n", report.triples));
    out.push_str(&format!("Non-URI subj.: {}\n", report.partitions.unpartitioned));
    out.push_str(&format!("VoID triples:  {}\n", report.partitions.void_triples));
    out.push('\n');
    out.push_str("Partitions:\n");
    for (authority, triples) in &report.partitions.datasets {
        out.push_str(&format!("  {:<40} {}\n", authority, triples));
    }
    out
}

// =============================================================================
// DESCRIBE COMMAND
// =============================================================================

/// The redacted document of `uri` as `format`.
///
/// `text/html` renders with the configured templates.
pub fn describe(config: &ServerConfig, uri: &str, format: &str) -> Result<Vec<u8>, RdfDocError> {
    let representation = Representation::for_mimetype(format)
        .ok_or_else(|| RdfDocError::UnknownMediaType(format.to_owned()))?;
    let uri = NamedNode::new(uri).map_err(|e| RdfDocError::InvalidIri(format!("{uri}: {e}")))?;

    let engine = Engine::open(config.engine_config()?)?;
    let snapshot = engine.snapshot();
    let document = snapshot
        .document(uri.as_ref())?
        .ok_or_else(|| RdfDocError::UnknownResource(uri.to_string()))?;
    let document = redact(&document);

    if representation == Representation::Html {
        let renderer = Renderer::load(&config.template_path, config.debug)?;
        let template = renderer
            .find(&document)
            .ok_or_else(|| RdfDocError::Template(format!("No template for {uri}")))?;
        return Ok(renderer.render_document(&document, &template)?.into_bytes());
    }
    serialize(&document, representation)
}

// =============================================================================
// TEMPLATES COMMAND
// =============================================================================

/// Print the template table.
pub fn cmd_templates(config: &ServerConfig) -> Result<(), RdfDocError> {
    let index = TemplateIndex::load(&config.template_path)?;
    if index.is_empty() {
        println!("No templates under {}", config.template_path.display());
        return Ok(());
    }
    for (name, path) in index.iter() {
        println!("{:<40} {}", name, path.display());
    }
    Ok(())
}
