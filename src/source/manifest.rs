// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `VirtualService`s read from YAML manifests on disk.
//!
//! Each file may contain several `---` separated documents. Documents of other
//! kinds are skipped, so a full application bundle can be checked before it is
//! applied. Objects without a namespace land in `default`, as `kubectl apply`
//! would place them.

use super::VirtualServiceSource;
use crate::constants::{DEFAULT_NAMESPACE, ISTIO_NETWORKING_GROUP, KIND_VIRTUAL_SERVICE};
use crate::crd::VirtualService;
use crate::errors::VetError;
use async_trait::async_trait;
use kube::Resource;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads `VirtualService`s from manifest files, in file then document order.
#[derive(Clone, Debug, Default)]
pub struct ManifestSource {
    paths: Vec<PathBuf>,
}

impl ManifestSource {
    /// Create a source over the given manifest files.
    #[must_use]
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

/// Parse every `VirtualService` out of one manifest's contents.
///
/// `path` is only used for error reporting.
///
/// # Errors
///
/// Returns [`VetError::ManifestParse`] for invalid YAML or a malformed
/// `VirtualService`, and [`VetError::ManifestMissingName`] for one without a
/// name.
pub fn parse_manifest(path: &Path, contents: &str) -> Result<Vec<VirtualService>, VetError> {
    let mut virtual_services = Vec::new();

    for (document, deserializer) in serde_yaml::Deserializer::from_str(contents).enumerate() {
        let mut value = serde_yaml::Value::deserialize(deserializer).map_err(|source| {
            VetError::ManifestParse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        if !is_virtual_service(&value) {
            continue;
        }

        // Every served version shares the fields we read; decode as the one we model
        if let Some(mapping) = value.as_mapping_mut() {
            mapping.insert(
                serde_yaml::Value::String("apiVersion".to_string()),
                serde_yaml::Value::String(VirtualService::api_version(&()).into_owned()),
            );
        }

        let mut vs: VirtualService =
            serde_yaml::from_value(value).map_err(|source| VetError::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;

        if vs.metadata.name.as_deref().unwrap_or_default().is_empty() {
            return Err(VetError::ManifestMissingName {
                path: path.to_path_buf(),
                document,
            });
        }
        if vs.metadata.namespace.as_deref().unwrap_or_default().is_empty() {
            vs.metadata.namespace = Some(DEFAULT_NAMESPACE.to_string());
        }

        virtual_services.push(vs);
    }

    Ok(virtual_services)
}

fn is_virtual_service(value: &serde_yaml::Value) -> bool {
    let kind = value.get("kind").and_then(serde_yaml::Value::as_str);
    let api_version = value.get("apiVersion").and_then(serde_yaml::Value::as_str);

    kind == Some(KIND_VIRTUAL_SERVICE)
        && api_version.is_some_and(|v| v.starts_with(&format!("{ISTIO_NETWORKING_GROUP}/")))
}

#[async_trait]
impl VirtualServiceSource for ManifestSource {
    async fn list_virtual_services(&self) -> Result<Vec<VirtualService>, VetError> {
        let mut virtual_services = Vec::new();

        for path in &self.paths {
            let contents =
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| VetError::ManifestIo {
                        path: path.clone(),
                        source,
                    })?;

            let parsed = parse_manifest(path, &contents)?;
            debug!(
                path = %path.display(),
                count = parsed.len(),
                "Loaded VirtualServices from manifest"
            );
            virtual_services.extend(parsed);
        }

        Ok(virtual_services)
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod manifest_tests;
