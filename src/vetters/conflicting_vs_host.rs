// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Detection of hosts claimed by more than one `VirtualService`.
//!
//! Istio merges routing for a host from exactly one `VirtualService`. When two
//! objects define the same host the winner is undefined, so every such host is
//! reported as an error.
//!
//! # Algorithm
//!
//! 1. Normalize every declared host against its owner's namespace. The first
//!    malformed host aborts the run; no partial results are returned.
//! 2. Group owners by canonical host, preserving input order per host.
//! 3. Emit one [`Finding`] per host owned by two or more distinct objects,
//!    ordered by host.
//! 4. Assign content-derived ids last.
//!
//! # Example
//!
//! ```rust
//! use meshvet::crd::RoutingRef;
//! use meshvet::finding::ContentHashIdentifier;
//! use meshvet::hostname::ServiceHostNormalizer;
//! use meshvet::vetters::conflicting_vs_host::detect;
//!
//! let objects = vec![
//!     RoutingRef::new("a", "ns1", &["foo"]),
//!     RoutingRef::new("b", "ns1", &["foo.ns1.svc"]),
//! ];
//!
//! let findings = detect(&objects, &ServiceHostNormalizer::default(), &ContentHashIdentifier)?;
//! assert_eq!(findings.len(), 1);
//! assert_eq!(findings[0].attribute("host"), Some("foo.ns1.svc"));
//! assert_eq!(findings[0].attribute("object_names"), Some("a, b"));
//! # Ok::<(), meshvet::errors::VetError>(())
//! ```

use crate::constants::{
    ATTR_HOST, ATTR_LIST_SEPARATOR, ATTR_NAMESPACES, ATTR_OBJECT_NAMES,
    CONFLICTING_VS_HOST_VETTER_ID, CONFLICTING_VS_HOST_VETTER_VERSION, HOST_IN_MULTIPLE_VS_MESSAGE,
    HOST_IN_MULTIPLE_VS_SUMMARY, KIND_HOST_IN_MULTIPLE_VS,
};
use crate::crd::RoutingObject;
use crate::errors::VetError;
use crate::finding::{assign_ids, Finding, FindingIdentifier, Severity};
use crate::hostname::HostNormalizer;
use crate::source::VirtualServiceSource;
use crate::vetters::{Vetter, VetterInfo};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, error};

/// Canonical host → owners in input order. Repeated declarations by one
/// object appear repeatedly.
type HostGroups<'a, O> = BTreeMap<String, Vec<&'a O>>;

/// Find every canonical host claimed by more than one routing object.
///
/// Findings are sorted ascending by their `host` attribute and carry ids from
/// `identifier`. An empty input, or one without shared hosts, yields an empty
/// list.
///
/// # Errors
///
/// Returns [`VetError::Normalization`] for the first host `normalizer` rejects.
/// No findings are returned in that case.
pub fn detect<O, N, I>(objects: &[O], normalizer: &N, identifier: &I) -> Result<Vec<Finding>, VetError>
where
    O: RoutingObject,
    N: HostNormalizer + ?Sized,
    I: FindingIdentifier + ?Sized,
{
    let groups = group_by_host(objects, normalizer)?;

    let mut findings: Vec<Finding> = groups
        .iter()
        .filter(|(_, owners)| distinct_owners(owners) > 1)
        .map(|(host, owners)| {
            debug!(host = %host, owners = owners.len(), "Host claimed by multiple VirtualServices");
            conflicting_host_finding(host, owners)
        })
        .collect();

    // BTreeMap iteration already yields hosts in order; keep the guarantee explicit
    findings.sort_by(|a, b| a.attribute(ATTR_HOST).cmp(&b.attribute(ATTR_HOST)));
    assign_ids(&mut findings, identifier);

    debug!(
        objects = objects.len(),
        hosts = groups.len(),
        findings = findings.len(),
        "Completed conflicting host detection"
    );

    Ok(findings)
}

fn group_by_host<'a, O, N>(objects: &'a [O], normalizer: &N) -> Result<HostGroups<'a, O>, VetError>
where
    O: RoutingObject,
    N: HostNormalizer + ?Sized,
{
    let mut groups: HostGroups<'a, O> = BTreeMap::new();

    for object in objects {
        for raw_host in object.declared_hosts() {
            let host = normalizer
                .normalize(raw_host, object.object_namespace())
                .map_err(|source| {
                    error!(
                        name = object.object_name(),
                        namespace = object.object_namespace(),
                        host = %raw_host,
                        "Unable to normalize host: {source}"
                    );
                    VetError::Normalization {
                        name: object.object_name().to_string(),
                        namespace: object.object_namespace().to_string(),
                        host: raw_host.clone(),
                        source,
                    }
                })?;
            groups.entry(host).or_default().push(object);
        }
    }

    Ok(groups)
}

/// Number of distinct `(namespace, name)` identities in a group.
fn distinct_owners<O: RoutingObject>(owners: &[&O]) -> usize {
    owners
        .iter()
        .map(|owner| (owner.object_namespace(), owner.object_name()))
        .collect::<BTreeSet<_>>()
        .len()
}

/// Build the finding for one conflicting host.
///
/// Names and namespaces are joined in group order and stay positionally
/// aligned; an object declaring the host twice is listed twice. The returned
/// finding has an empty id.
#[must_use]
pub fn conflicting_host_finding<O: RoutingObject>(host: &str, owners: &[&O]) -> Finding {
    let names: Vec<&str> = owners.iter().map(|owner| owner.object_name()).collect();
    let namespaces: Vec<&str> = owners
        .iter()
        .map(|owner| owner.object_namespace())
        .collect();

    Finding {
        id: String::new(),
        kind: KIND_HOST_IN_MULTIPLE_VS.to_string(),
        summary: HOST_IN_MULTIPLE_VS_SUMMARY.to_string(),
        message: HOST_IN_MULTIPLE_VS_MESSAGE.to_string(),
        severity: Severity::Error,
        attributes: BTreeMap::from([
            (ATTR_HOST.to_string(), host.to_string()),
            (ATTR_OBJECT_NAMES.to_string(), names.join(ATTR_LIST_SEPARATOR)),
            (
                ATTR_NAMESPACES.to_string(),
                namespaces.join(ATTR_LIST_SEPARATOR),
            ),
        ]),
    }
}

/// Vetter reporting hosts defined by multiple `VirtualService`s.
///
/// All collaborators are injected: the source decides which objects are in
/// scope, the normalizer and identifier are shared with other checks.
pub struct ConflictingVirtualServiceHost {
    source: Arc<dyn VirtualServiceSource>,
    normalizer: Arc<dyn HostNormalizer>,
    identifier: Arc<dyn FindingIdentifier>,
}

impl ConflictingVirtualServiceHost {
    /// Create the vetter from its collaborators.
    #[must_use]
    pub fn new(
        source: Arc<dyn VirtualServiceSource>,
        normalizer: Arc<dyn HostNormalizer>,
        identifier: Arc<dyn FindingIdentifier>,
    ) -> Self {
        Self {
            source,
            normalizer,
            identifier,
        }
    }
}

#[async_trait]
impl Vetter for ConflictingVirtualServiceHost {
    fn info(&self) -> VetterInfo {
        VetterInfo {
            id: CONFLICTING_VS_HOST_VETTER_ID.to_string(),
            version: CONFLICTING_VS_HOST_VETTER_VERSION.to_string(),
        }
    }

    async fn vet(&self) -> Result<Vec<Finding>, VetError> {
        let virtual_services = self.source.list_virtual_services().await.map_err(|e| {
            error!("Error occurred retrieving VirtualServices: {e}");
            e
        })?;

        debug!(
            count = virtual_services.len(),
            "Checking VirtualServices for conflicting hosts"
        );

        detect(
            &virtual_services,
            self.normalizer.as_ref(),
            self.identifier.as_ref(),
        )
    }
}

#[cfg(test)]
#[path = "conflicting_vs_host_tests.rs"]
mod conflicting_vs_host_tests;
