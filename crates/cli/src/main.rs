//! `process-deployer` CLI entry-point.
//!
//! Available sub-commands:
//! - `transform` — turn every executable process of a JSON document into a
//!   process definition and print the result.
//! - `validate`  — check the flow structure of every process in a document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use engine::flow::{FlowElementProcessor, StructuralFlowProcessor};
use engine::{
    DeploymentContext, Diagnostic, HandlerConfig, ParseContext, ProcessDefinitionRecord,
    ProcessDocument, ProcessParseHandler,
};

#[derive(Parser)]
#[command(
    name = "process-deployer",
    about = "Turns parsed process models into runtime process definitions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transform a process document into process definitions.
    Transform {
        /// Path to the process document JSON file.
        path: PathBuf,
        /// Deployment the definitions belong to (a fresh UUID by default).
        #[arg(long, env = "DEPLOYMENT_ID")]
        deployment_id: Option<String>,
        /// Engine version recorded on every definition.
        #[arg(long, env = "ENGINE_VERSION")]
        engine_version: Option<String>,
        /// Overrides the document's target namespace.
        #[arg(long)]
        target_namespace: Option<String>,
        /// Keep going when a process fails to transform.
        #[arg(long)]
        keep_going: bool,
    },
    /// Validate the flow structure of a process document.
    Validate {
        /// Path to the process document JSON file.
        path: PathBuf,
    },
}

#[derive(Serialize)]
struct TransformOutput<'a> {
    deployment_id: &'a str,
    definitions: &'a [ProcessDefinitionRecord],
    diagnostics: &'a [Diagnostic],
}

fn read_document(path: &Path) -> Result<ProcessDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid process document {}", path.display()))
}

fn transform(
    path: &Path,
    deployment_id: Option<String>,
    engine_version: Option<String>,
    target_namespace: Option<String>,
    keep_going: bool,
) -> Result<bool> {
    let document = read_document(path)?;

    let deployment_id = deployment_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let namespace = target_namespace.unwrap_or(document.target_namespace);
    let mut deployment = DeploymentContext::new(deployment_id, namespace)
        .with_item_definitions(document.item_definitions);
    if let Some(version) = engine_version {
        deployment = deployment.with_engine_version(version);
    }
    info!(
        "Transforming {} processes for deployment {} at {}",
        document.processes.len(),
        deployment.deployment_id,
        deployment.deployed_at.to_rfc3339()
    );

    let handler = ProcessParseHandler::new(HandlerConfig { continue_on_error: keep_going });
    let mut ctx = ParseContext::new(deployment);
    let summary = handler.parse_all(&document.processes, &mut ctx)?;

    let output = TransformOutput {
        deployment_id: &ctx.deployment.deployment_id,
        definitions: &ctx.definitions,
        diagnostics: &ctx.diagnostics,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    info!(
        "{} produced, {} skipped, {} failed",
        summary.produced,
        summary.skipped,
        summary.failures.len()
    );
    for failure in &summary.failures {
        error!("process '{}': {}", failure.process_id, failure.error);
    }
    Ok(summary.failures.is_empty())
}

fn validate(path: &Path) -> Result<bool> {
    let document = read_document(path)?;
    let processor = StructuralFlowProcessor;
    let mut all_valid = true;

    for process in &document.processes {
        let mut ctx = ParseContext::new(DeploymentContext::new(
            "validation",
            document.target_namespace.clone(),
        ));
        let result = processor
            .process_flow_elements(&process.flow_elements, &mut ctx)
            .and_then(|()| processor.process_artifacts(&process.artifacts, &process.flow_elements, &mut ctx));

        match result {
            Ok(()) => println!("✅ Process '{}' is valid.", process.id),
            Err(e) => {
                eprintln!("❌ Process '{}': {e}", process.id);
                all_valid = false;
            }
        }
        for diagnostic in &ctx.diagnostics {
            println!("   ⚠️  {diagnostic}");
        }
    }
    Ok(all_valid)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let ok = match cli.command {
        Command::Transform {
            path,
            deployment_id,
            engine_version,
            target_namespace,
            keep_going,
        } => transform(&path, deployment_id, engine_version, target_namespace, keep_going)?,
        Command::Validate { path } => validate(&path)?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
