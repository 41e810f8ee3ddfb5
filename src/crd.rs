// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Resource types inspected by meshvet.
//!
//! Istio owns the `VirtualService` CRD; this module only models the parts the
//! checks read. Route definitions (`http`, `tcp`, `tls`) are kept as opaque
//! JSON so manifests and live objects round-trip without loss.
//!
//! # Routing objects
//!
//! The conflict detector does not care where an object came from. Anything that
//! exposes a name, a namespace and an ordered list of hosts implements
//! [`RoutingObject`]: live [`VirtualService`]s and the plain [`RoutingRef`].
//!
//! # Example
//!
//! ```rust
//! use meshvet::crd::{RoutingObject, VirtualService, VirtualServiceSpec};
//!
//! let mut vs = VirtualService::new(
//!     "reviews",
//!     VirtualServiceSpec {
//!         hosts: vec!["reviews".to_string()],
//!         ..Default::default()
//!     },
//! );
//! vs.metadata.namespace = Some("bookinfo".to_string());
//!
//! assert_eq!(vs.object_name(), "reviews");
//! assert_eq!(vs.object_namespace(), "bookinfo");
//! assert_eq!(vs.declared_hosts(), ["reviews".to_string()]);
//! ```

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `VirtualService` binds one or more hosts to traffic routing rules.
///
/// Only `hosts` matters to the checks. A host is either a short service name
/// (`reviews`), a service-qualified name (`reviews.bookinfo.svc.cluster.local`)
/// or an external DNS name (`bookinfo.example.com`).
///
/// # Example
///
/// ```yaml
/// apiVersion: networking.istio.io/v1alpha3
/// kind: VirtualService
/// metadata:
///   name: reviews
///   namespace: bookinfo
/// spec:
///   hosts:
///     - reviews
///   http:
///     - route:
///         - destination:
///             host: reviews
///             subset: v1
/// ```
#[derive(CustomResource, Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "networking.istio.io",
    version = "v1alpha3",
    kind = "VirtualService",
    namespaced,
    shortname = "vs",
    doc = "Istio VirtualService (read-only view used by meshvet)"
)]
#[serde(rename_all = "camelCase")]
pub struct VirtualServiceSpec {
    /// Destination hosts to which traffic is being sent.
    #[serde(default)]
    pub hosts: Vec<String>,

    /// Gateways and sidecars that should apply these routes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gateways: Vec<String>,

    /// Namespaces to which this `VirtualService` is exported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub export_to: Vec<String>,

    /// HTTP routes, kept opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<Vec<serde_json::Value>>,

    /// TCP routes, kept opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp: Option<Vec<serde_json::Value>>,

    /// TLS routes, kept opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<Vec<serde_json::Value>>,
}

/// A named, namespaced object that claims ownership of hostnames.
///
/// Implementors must return non-empty names and namespaces for any object
/// handed to the detector.
pub trait RoutingObject {
    /// Object name, unique within its namespace.
    fn object_name(&self) -> &str;

    /// Namespace of the object.
    fn object_namespace(&self) -> &str;

    /// Raw hosts in declared order.
    fn declared_hosts(&self) -> &[String];
}

impl RoutingObject for VirtualService {
    fn object_name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    fn object_namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or_default()
    }

    fn declared_hosts(&self) -> &[String] {
        &self.spec.hosts
    }
}

/// Plain routing object, detached from any Kubernetes metadata.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutingRef {
    /// Object name
    pub name: String,
    /// Object namespace
    pub namespace: String,
    /// Raw hosts in declared order
    #[serde(default)]
    pub hosts: Vec<String>,
}

impl RoutingRef {
    /// Build a routing reference from borrowed parts.
    #[must_use]
    pub fn new(name: &str, namespace: &str, hosts: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            hosts: hosts.iter().map(ToString::to_string).collect(),
        }
    }
}

impl RoutingObject for RoutingRef {
    fn object_name(&self) -> &str {
        &self.name
    }

    fn object_namespace(&self) -> &str {
        &self.namespace
    }

    fn declared_hosts(&self) -> &[String] {
        &self.hosts
    }
}

impl<T: RoutingObject + ?Sized> RoutingObject for &T {
    fn object_name(&self) -> &str {
        (**self).object_name()
    }

    fn object_namespace(&self) -> &str {
        (**self).object_namespace()
    }

    fn declared_hosts(&self) -> &[String] {
        (**self).declared_hosts()
    }
}

impl<T: RoutingObject + ?Sized> RoutingObject for std::sync::Arc<T> {
    fn object_name(&self) -> &str {
        (**self).object_name()
    }

    fn object_namespace(&self) -> &str {
        (**self).object_namespace()
    }

    fn declared_hosts(&self) -> &[String] {
        (**self).declared_hosts()
    }
}

#[cfg(test)]
#[path = "crd_tests.rs"]
mod crd_tests;
