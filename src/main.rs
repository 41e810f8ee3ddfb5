// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::Parser;
use kube::Client;
use meshvet::{
    config::{Cli, OutputFormat, SourceKind},
    constants::{EXIT_CODE_FINDINGS, TOKIO_WORKER_THREADS},
    finding::ContentHashIdentifier,
    metrics::gather_metrics,
    report::{finding_count, render_json, render_text},
    source::{cluster::ClusterSource, manifest::ManifestSource, VirtualServiceSource},
    vetters::{conflicting_vs_host::ConflictingVirtualServiceHost, VetterRegistry},
};
use std::sync::Arc;
use tracing::{debug, error, info};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.validate()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("meshvet")
        .enable_all()
        .build()?;

    let findings = runtime.block_on(async_main(cli.clone()))?;

    if cli.fail_on_findings && findings > 0 {
        std::process::exit(EXIT_CODE_FINDINGS);
    }
    Ok(())
}

fn init_logging() {
    // Logs go to stderr so stdout carries only the report.
    //
    // Respects RUST_LOG environment variable if set, otherwise defaults to INFO level
    // Example: RUST_LOG=debug meshvet
    //
    // Respects RUST_LOG_FORMAT environment variable for output format
    // Example: RUST_LOG_FORMAT=json meshvet
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

/// Run every registered vetter, print the report and return the finding count.
async fn async_main(cli: Cli) -> Result<usize> {
    init_logging();

    info!("Starting meshvet");
    debug!(?cli, "Parsed command line");

    let source = build_source(&cli).await?;
    let registry = build_registry(&cli, source);

    info!(vetters = registry.len(), "Running vetters");
    let reports = match registry.run_all().await {
        Ok(reports) => reports,
        Err(e) => {
            error!("Vetting failed: {e}");
            return Err(e.into());
        }
    };

    let output = match cli.output {
        OutputFormat::Text => render_text(&reports),
        OutputFormat::Json => render_json(&reports)?,
    };
    println!("{output}");

    let findings = finding_count(&reports);
    info!(findings, "Vetting complete");

    if cli.print_metrics {
        eprintln!("{}", gather_metrics()?);
    }

    Ok(findings)
}

async fn build_source(cli: &Cli) -> Result<Arc<dyn VirtualServiceSource>> {
    match cli.source {
        SourceKind::Manifest => {
            debug!(files = cli.files.len(), "Reading VirtualServices from manifests");
            Ok(Arc::new(ManifestSource::new(cli.files.clone())))
        }
        SourceKind::Cluster => {
            debug!("Initializing Kubernetes client");
            let client = Client::try_default().await?;
            debug!("Kubernetes client initialized successfully");
            Ok(Arc::new(
                ClusterSource::new(client, cli.mesh_scope()).with_namespace(cli.namespace.clone()),
            ))
        }
    }
}

/// Every check is registered here, once, with its collaborators injected.
fn build_registry(cli: &Cli, source: Arc<dyn VirtualServiceSource>) -> VetterRegistry {
    VetterRegistry::new().with(Arc::new(ConflictingVirtualServiceHost::new(
        source,
        Arc::new(cli.normalizer()),
        Arc::new(ContentHashIdentifier),
    )))
}
