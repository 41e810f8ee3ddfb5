// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for meshvet.
//!
//! This module provides structured errors for:
//! - Hostname normalization (malformed hosts or namespaces)
//! - Vetter runs (normalization failures with object context, listing failures)
//! - Manifest loading (I/O and YAML parse failures)
//! - Command line flag combinations clap cannot express
//!
//! A [`HostnameError`] is always fatal to a detection run. The detector wraps it
//! in [`VetError::Normalization`] together with the offending object and host.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned when a raw hostname cannot be turned into its canonical form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostnameError {
    /// The host is empty (or only whitespace / a single dot)
    #[error("hostname is empty")]
    Empty,

    /// The host exceeds the maximum DNS name length
    #[error("hostname '{host}' is {length} characters long (maximum {max})")]
    TooLong {
        /// The offending hostname
        host: String,
        /// Length after canonicalization
        length: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// One of the dot-separated labels is not a valid DNS label
    #[error("hostname '{host}' has invalid label '{label}': {reason}")]
    InvalidLabel {
        /// The offending hostname
        host: String,
        /// The invalid label
        label: String,
        /// Explanation of what is invalid
        reason: String,
    },

    /// A `*` appears anywhere other than as the entire leftmost label
    #[error("hostname '{host}' has a wildcard outside the leftmost label")]
    MisplacedWildcard {
        /// The offending hostname
        host: String,
    },

    /// The owning namespace cannot be used to qualify a short name
    #[error("namespace '{namespace}' is not a valid DNS label")]
    InvalidNamespace {
        /// The offending namespace
        namespace: String,
    },
}

/// Errors that abort a vetter run.
#[derive(Error, Debug)]
pub enum VetError {
    /// A declared host could not be normalized; no findings are produced
    #[error("unable to normalize host '{host}' of VirtualService {namespace}/{name}: {source}")]
    Normalization {
        /// Name of the `VirtualService` declaring the host
        name: String,
        /// Namespace of the `VirtualService`
        namespace: String,
        /// The raw host as declared
        host: String,
        /// Underlying normalization failure
        #[source]
        source: HostnameError,
    },

    /// The Kubernetes API returned an error while listing resources
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// A manifest file could not be read
    #[error("failed to read manifest {}: {source}", path.display())]
    ManifestIo {
        /// Path of the manifest
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A manifest document is not valid YAML or not a valid `VirtualService`
    #[error("failed to parse manifest {}: {source}", path.display())]
    ManifestParse {
        /// Path of the manifest
        path: PathBuf,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },

    /// A manifest `VirtualService` has no `metadata.name`
    #[error("VirtualService in manifest {} (document {document}) has no metadata.name", path.display())]
    ManifestMissingName {
        /// Path of the manifest
        path: PathBuf,
        /// Zero-based index of the YAML document in the file
        document: usize,
    },
}

/// Invalid combinations of command line flags.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `--source manifest` was given without any `--file`
    #[error("--source manifest requires at least one --file")]
    ManifestWithoutFiles,
}

impl VetError {
    /// Short category name used as a metric label.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Normalization { .. } => "normalization",
            Self::Kube(_) => "kube_api",
            Self::ManifestIo { .. } | Self::ManifestParse { .. } | Self::ManifestMissingName { .. } => {
                "manifest"
            }
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
