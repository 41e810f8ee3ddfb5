// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for meshvet.
//!
//! This module contains the string and numeric constants shared by the
//! checks, the sources and the CLI. Constants are organized by category.

// ============================================================================
// Istio API Constants
// ============================================================================

/// API group of Istio networking resources
pub const ISTIO_NETWORKING_GROUP: &str = "networking.istio.io";

/// API version of the `VirtualService` resources we read
pub const ISTIO_NETWORKING_VERSION: &str = "v1alpha3";

/// Kind name for `VirtualService` resource
pub const KIND_VIRTUAL_SERVICE: &str = "VirtualService";

// ============================================================================
// Hostname Constants
// ============================================================================

/// Default Kubernetes cluster domain
pub const DEFAULT_CLUSTER_DOMAIN: &str = "cluster.local";

/// Label appended to `<service>.<namespace>` to form a service host
pub const SERVICE_DOMAIN_LABEL: &str = "svc";

/// Maximum length of a fully qualified hostname (RFC 1035)
pub const MAX_HOSTNAME_LENGTH: usize = 253;

/// Maximum length of a single DNS label (RFC 1035)
pub const MAX_LABEL_LENGTH: usize = 63;

/// Wildcard label allowed as the leftmost label of a host
pub const WILDCARD_LABEL: &str = "*";

// ============================================================================
// Conflicting VirtualService Host Check
// ============================================================================

/// Identifier of the conflicting host vetter
pub const CONFLICTING_VS_HOST_VETTER_ID: &str = "ConflictingVirtualServiceHost";

/// Version of the conflicting host vetter
pub const CONFLICTING_VS_HOST_VETTER_VERSION: &str = "0.1.0";

/// Finding kind emitted when a host is defined by multiple `VirtualService`s
pub const KIND_HOST_IN_MULTIPLE_VS: &str = "host-in-multiple-vs";

/// Summary template; `${host}` is substituted from the finding attributes
pub const HOST_IN_MULTIPLE_VS_SUMMARY: &str =
    "Multiple VirtualServices define the same host - ${host}";

/// Message template; `${object_names}`, `${namespaces}` and `${host}` are substituted
pub const HOST_IN_MULTIPLE_VS_MESSAGE: &str = "The VirtualServices ${object_names} in namespace(s) \
     ${namespaces} define the same host, ${host}. A host name can be defined by only one \
     VirtualService. Consider updating the VirtualService(s) to have unique hostnames.";

/// Attribute key for the conflicting canonical host
pub const ATTR_HOST: &str = "host";

/// Attribute key for the names of the conflicting `VirtualService`s
pub const ATTR_OBJECT_NAMES: &str = "object_names";

/// Attribute key for the namespaces of the conflicting `VirtualService`s
pub const ATTR_NAMESPACES: &str = "namespaces";

/// Separator used when joining names and namespaces into one attribute
pub const ATTR_LIST_SEPARATOR: &str = ", ";

// ============================================================================
// Mesh Scope Constants
// ============================================================================

/// Namespace label enabling sidecar injection
pub const ISTIO_INJECTION_LABEL: &str = "istio-injection";

/// Value of [`ISTIO_INJECTION_LABEL`] for namespaces in the mesh
pub const ISTIO_INJECTION_ENABLED: &str = "enabled";

/// Namespace label selecting a revisioned control plane
pub const ISTIO_REVISION_LABEL: &str = "istio.io/rev";

/// Namespaces never considered part of the mesh unless overridden
pub const DEFAULT_EXCLUDED_NAMESPACES: &[&str] = &["kube-system", "kube-public", "istio-system"];

/// Namespace assigned to manifest objects that do not declare one
pub const DEFAULT_NAMESPACE: &str = "default";

// ============================================================================
// Kubernetes API Constants
// ============================================================================

/// Page size for paginated list calls against the API server
pub const KUBE_LIST_PAGE_SIZE: u32 = 100;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 2;

/// Process exit code when `--fail-on-findings` is set and findings exist
pub const EXIT_CODE_FINDINGS: i32 = 2;
