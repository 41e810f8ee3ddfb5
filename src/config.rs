// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Command line configuration for the `meshvet` binary.
//!
//! Logging is configured through the environment, like every other binary in
//! this family: `RUST_LOG` sets the filter (default `info`) and
//! `RUST_LOG_FORMAT=json` switches to structured JSON output.

use crate::constants::{DEFAULT_CLUSTER_DOMAIN, DEFAULT_EXCLUDED_NAMESPACES};
use crate::errors::ConfigError;
use crate::hostname::ServiceHostNormalizer;
use crate::source::scope::MeshScope;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Where `VirtualService`s are read from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// The cluster selected by the current kubeconfig or in-cluster config
    #[default]
    Cluster,
    /// YAML manifests given with `--file`
    Manifest,
}

/// Report format written to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable blocks
    #[default]
    Text,
    /// JSON array of vetter reports
    Json,
}

/// Check Istio routing configuration for conflicts.
#[derive(Clone, Debug, Parser)]
#[command(name = "meshvet", version, about)]
pub struct Cli {
    /// Where to read VirtualServices from
    #[arg(long, value_enum, default_value_t = SourceKind::Cluster)]
    pub source: SourceKind,

    /// Manifest file to read (repeatable, manifest source only)
    #[arg(long = "file", short = 'f', value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Only list VirtualServices in this namespace (cluster source only)
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Cluster domain removed from fully qualified service hosts
    #[arg(long, default_value = DEFAULT_CLUSTER_DOMAIN)]
    pub cluster_domain: String,

    /// Namespace never considered part of the mesh (repeatable)
    #[arg(long = "exclude-namespace", value_name = "NAMESPACE")]
    pub exclude_namespaces: Vec<String>,

    /// Treat every non-excluded namespace as part of the mesh
    #[arg(long)]
    pub include_all_namespaces: bool,

    /// Report format
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Exit with status 2 when any finding is reported
    #[arg(long)]
    pub fail_on_findings: bool,

    /// Print Prometheus metrics to stderr after the run
    #[arg(long)]
    pub print_metrics: bool,
}

impl Cli {
    /// Mesh scope built from the namespace flags.
    ///
    /// Without `--exclude-namespace` the default system namespaces are excluded.
    #[must_use]
    pub fn mesh_scope(&self) -> MeshScope {
        let excluded_namespaces = if self.exclude_namespaces.is_empty() {
            DEFAULT_EXCLUDED_NAMESPACES
                .iter()
                .map(ToString::to_string)
                .collect()
        } else {
            self.exclude_namespaces.iter().cloned().collect()
        };

        MeshScope {
            excluded_namespaces,
            include_all: self.include_all_namespaces,
        }
    }

    /// Hostname normalizer for the configured cluster domain.
    #[must_use]
    pub fn normalizer(&self) -> ServiceHostNormalizer {
        ServiceHostNormalizer::new(&self.cluster_domain)
    }

    /// Check flag combinations clap cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ManifestWithoutFiles`] when `--source manifest` is
    /// used without `--file`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source == SourceKind::Manifest && self.files.is_empty() {
            return Err(ConfigError::ManifestWithoutFiles);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
