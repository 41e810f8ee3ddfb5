// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Read-only access to the `VirtualService`s a check should inspect.
//!
//! Checks depend on the narrow [`VirtualServiceSource`] capability: "return the
//! current ordered snapshot of in-scope `VirtualService`s". Mesh membership is
//! decided here, never inside a check.
//!
//! # Sources
//!
//! - [`StaticSource`] - a fixed in-memory snapshot (tests, embedding)
//! - [`manifest::ManifestSource`] - multi-document YAML manifests on disk
//! - [`cluster::ClusterSource`] - live listing from the Kubernetes API,
//!   filtered by [`scope::MeshScope`]

pub mod cluster;
pub mod manifest;
pub mod pagination;
pub mod scope;

use crate::crd::VirtualService;
use crate::errors::VetError;
use async_trait::async_trait;

/// Provides the in-scope `VirtualService` snapshot for one check run.
#[async_trait]
pub trait VirtualServiceSource: Send + Sync {
    /// List the in-scope `VirtualService`s in a stable order.
    ///
    /// # Errors
    ///
    /// Returns a [`VetError`] if the snapshot cannot be retrieved.
    async fn list_virtual_services(&self) -> Result<Vec<VirtualService>, VetError>;
}

/// Fixed snapshot returned verbatim on every call.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    virtual_services: Vec<VirtualService>,
}

impl StaticSource {
    /// Wrap an already filtered snapshot.
    #[must_use]
    pub fn new(virtual_services: Vec<VirtualService>) -> Self {
        Self { virtual_services }
    }
}

#[async_trait]
impl VirtualServiceSource for StaticSource {
    async fn list_virtual_services(&self) -> Result<Vec<VirtualService>, VetError> {
        Ok(self.virtual_services.clone())
    }
}
