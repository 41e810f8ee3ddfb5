// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Configuration checks ("vetters") and the registry that runs them.
//!
//! A vetter inspects a snapshot of mesh configuration and returns findings. It
//! never mutates the configuration it reads.
//!
//! # Registration
//!
//! Vetters are registered explicitly: `main` builds a [`VetterRegistry`] once
//! at startup with every collaborator injected. There is no global registry.
//!
//! ```rust
//! use meshvet::crd::{VirtualService, VirtualServiceSpec};
//! use meshvet::finding::ContentHashIdentifier;
//! use meshvet::hostname::ServiceHostNormalizer;
//! use meshvet::source::StaticSource;
//! use meshvet::vetters::{conflicting_vs_host::ConflictingVirtualServiceHost, VetterRegistry};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), meshvet::errors::VetError> {
//! let source = Arc::new(StaticSource::new(Vec::<VirtualService>::new()));
//! let registry = VetterRegistry::new().with(Arc::new(ConflictingVirtualServiceHost::new(
//!     source,
//!     Arc::new(ServiceHostNormalizer::default()),
//!     Arc::new(ContentHashIdentifier),
//! )));
//!
//! let reports = registry.run_all().await?;
//! assert!(reports[0].findings.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! # Available Vetters
//!
//! - [`conflicting_vs_host::ConflictingVirtualServiceHost`] - hosts defined by
//!   more than one `VirtualService`

pub mod conflicting_vs_host;

use crate::errors::VetError;
use crate::finding::Finding;
use crate::metrics::{record_normalization_error, record_vet_error, record_vet_success};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Identity of a vetter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VetterInfo {
    /// Stable vetter identifier
    pub id: String,
    /// Vetter version
    pub version: String,
}

/// A read-only configuration check.
#[async_trait]
pub trait Vetter: Send + Sync {
    /// Identity of this vetter.
    fn info(&self) -> VetterInfo;

    /// Run the check against the current configuration snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`VetError`] when the snapshot cannot be retrieved or the
    /// check cannot reach a trustworthy result.
    async fn vet(&self) -> Result<Vec<Finding>, VetError>;
}

/// Findings of one vetter run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VetterReport {
    /// The vetter that produced the findings
    pub vetter: VetterInfo,
    /// Findings in the order the vetter returned them
    pub findings: Vec<Finding>,
}

/// Ordered list of vetters, built once at startup.
#[derive(Clone, Default)]
pub struct VetterRegistry {
    vetters: Vec<Arc<dyn Vetter>>,
}

impl VetterRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vetter, builder style.
    #[must_use]
    pub fn with(mut self, vetter: Arc<dyn Vetter>) -> Self {
        self.register(vetter);
        self
    }

    /// Append a vetter.
    pub fn register(&mut self, vetter: Arc<dyn Vetter>) {
        self.vetters.push(vetter);
    }

    /// Number of registered vetters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vetters.len()
    }

    /// Whether no vetter is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vetters.is_empty()
    }

    /// Identities of the registered vetters, in registration order.
    #[must_use]
    pub fn infos(&self) -> Vec<VetterInfo> {
        self.vetters.iter().map(|vetter| vetter.info()).collect()
    }

    /// Run every vetter in registration order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing vetter and returns its error.
    pub async fn run_all(&self) -> Result<Vec<VetterReport>, VetError> {
        let mut reports = Vec::with_capacity(self.vetters.len());

        for vetter in &self.vetters {
            let info = vetter.info();
            let start = Instant::now();

            match vetter.vet().await {
                Ok(findings) => {
                    record_vet_success(&info.id, start.elapsed(), &findings);
                    info!(
                        vetter = %info.id,
                        version = %info.version,
                        findings = findings.len(),
                        "Vetter completed"
                    );
                    reports.push(VetterReport {
                        vetter: info,
                        findings,
                    });
                }
                Err(e) => {
                    record_vet_error(&info.id, start.elapsed(), e.category());
                    if matches!(e, VetError::Normalization { .. }) {
                        record_normalization_error(&info.id);
                    }
                    error!(vetter = %info.id, "Vetter failed: {e}");
                    return Err(e);
                }
            }
        }

        Ok(reports)
    }
}
