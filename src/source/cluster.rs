// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Live `VirtualService` listing from the Kubernetes API.
//!
//! Namespaces and `VirtualService`s are listed concurrently, then the
//! `VirtualService`s are filtered to namespaces inside the [`MeshScope`] and
//! sorted by namespace and name so every run sees the same order.

use super::pagination::list_all_paginated;
use super::scope::MeshScope;
use super::VirtualServiceSource;
use crate::crd::{RoutingObject, VirtualService};
use crate::errors::VetError;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::{api::ListParams, Api, Client, ResourceExt};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Lists `VirtualService`s from the cluster the client points at.
#[derive(Clone)]
pub struct ClusterSource {
    client: Client,
    scope: MeshScope,
    namespace: Option<String>,
}

impl ClusterSource {
    /// Create a source listing across all namespaces in `scope`.
    #[must_use]
    pub fn new(client: Client, scope: MeshScope) -> Self {
        Self {
            client,
            scope,
            namespace: None,
        }
    }

    /// Restrict listing to a single namespace (still subject to the scope).
    #[must_use]
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    async fn mesh_namespaces(&self) -> Result<BTreeSet<String>, kube::Error> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let namespaces = list_all_paginated(&api, ListParams::default()).await?;

        Ok(filter_mesh_namespaces(&self.scope, &namespaces))
    }

    async fn all_virtual_services(&self) -> Result<Vec<VirtualService>, kube::Error> {
        let api: Api<VirtualService> = match &self.namespace {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::all(self.client.clone()),
        };
        list_all_paginated(&api, ListParams::default()).await
    }
}

/// Names of the namespaces that belong to the mesh.
#[must_use]
pub fn filter_mesh_namespaces(scope: &MeshScope, namespaces: &[Namespace]) -> BTreeSet<String> {
    namespaces
        .iter()
        .filter(|namespace| scope.includes(&namespace.name_any(), namespace.labels()))
        .map(|namespace| namespace.name_any())
        .collect()
}

/// Keep `VirtualService`s living in `mesh_namespaces`, ordered by namespace and name.
#[must_use]
pub fn select_in_mesh(
    virtual_services: Vec<VirtualService>,
    mesh_namespaces: &BTreeSet<String>,
) -> Vec<VirtualService> {
    let mut selected: Vec<VirtualService> = virtual_services
        .into_iter()
        .filter(|vs| mesh_namespaces.contains(vs.object_namespace()))
        .collect();

    selected.sort_by(|a, b| {
        (a.object_namespace(), a.object_name()).cmp(&(b.object_namespace(), b.object_name()))
    });
    selected
}

#[async_trait]
impl VirtualServiceSource for ClusterSource {
    async fn list_virtual_services(&self) -> Result<Vec<VirtualService>, VetError> {
        let (mesh_namespaces, virtual_services) =
            futures::try_join!(self.mesh_namespaces(), self.all_virtual_services())?;

        debug!(
            mesh_namespaces = mesh_namespaces.len(),
            listed = virtual_services.len(),
            "Listed namespaces and VirtualServices"
        );

        let selected = select_in_mesh(virtual_services, &mesh_namespaces);

        info!(
            count = selected.len(),
            namespace = ?self.namespace,
            "Retrieved VirtualServices in mesh"
        );

        Ok(selected)
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod cluster_tests;
