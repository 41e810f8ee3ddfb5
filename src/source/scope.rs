// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Mesh membership of namespaces.
//!
//! A namespace is part of the mesh when it is not excluded and either carries
//! `istio-injection=enabled`, carries an `istio.io/rev` revision label, or the
//! scope includes every namespace.

use crate::constants::{
    DEFAULT_EXCLUDED_NAMESPACES, ISTIO_INJECTION_ENABLED, ISTIO_INJECTION_LABEL,
    ISTIO_REVISION_LABEL,
};
use std::collections::{BTreeMap, BTreeSet};

/// Which namespaces are considered part of the mesh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeshScope {
    /// Namespaces never in the mesh
    pub excluded_namespaces: BTreeSet<String>,
    /// Skip the injection label requirement
    pub include_all: bool,
}

impl Default for MeshScope {
    fn default() -> Self {
        Self {
            excluded_namespaces: DEFAULT_EXCLUDED_NAMESPACES
                .iter()
                .map(ToString::to_string)
                .collect(),
            include_all: false,
        }
    }
}

impl MeshScope {
    /// Whether a namespace with `labels` belongs to the mesh.
    #[must_use]
    pub fn includes(&self, namespace: &str, labels: &BTreeMap<String, String>) -> bool {
        if self.excluded_namespaces.contains(namespace) {
            return false;
        }
        if self.include_all {
            return true;
        }

        labels
            .get(ISTIO_INJECTION_LABEL)
            .is_some_and(|value| value == ISTIO_INJECTION_ENABLED)
            || labels.contains_key(ISTIO_REVISION_LABEL)
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod scope_tests;
