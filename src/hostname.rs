// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Hostname normalization for mesh hosts.
//!
//! Istio resolves a short host such as `reviews` relative to the namespace of
//! the object that declares it. Before two hosts can be compared they have to
//! be reduced to one canonical, fully qualified form.
//!
//! # Canonical form
//!
//! [`ServiceHostNormalizer`] produces:
//!
//! | Declared host (namespace `ns1`)  | Canonical host        |
//! |----------------------------------|-----------------------|
//! | `foo`                            | `foo.ns1.svc`         |
//! | `foo.ns1.svc`                    | `foo.ns1.svc`         |
//! | `Foo.NS1.svc.cluster.local.`     | `foo.ns1.svc`         |
//! | `shared.example.com`             | `shared.example.com`  |
//! | `*.example.com`                  | `*.example.com`       |
//!
//! Malformed hosts are rejected with a [`HostnameError`]; they are never
//! silently skipped.
//!
//! # Example
//!
//! ```rust
//! use meshvet::hostname::{HostNormalizer, ServiceHostNormalizer};
//!
//! let normalizer = ServiceHostNormalizer::default();
//! assert_eq!(normalizer.normalize("foo", "ns1").unwrap(), "foo.ns1.svc");
//! assert!(normalizer.normalize("bad..host", "ns1").is_err());
//! ```

use crate::constants::{
    DEFAULT_CLUSTER_DOMAIN, MAX_HOSTNAME_LENGTH, MAX_LABEL_LENGTH, SERVICE_DOMAIN_LABEL,
    WILDCARD_LABEL,
};
use crate::errors::HostnameError;

/// Converts a raw host declared by an object into its canonical form.
///
/// Implementations must be pure: the same `(raw_host, namespace)` pair always
/// yields the same result.
pub trait HostNormalizer: Send + Sync {
    /// Normalize `raw_host` declared by an object living in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns a [`HostnameError`] when the host (or the namespace needed to
    /// qualify it) is malformed.
    fn normalize(&self, raw_host: &str, namespace: &str) -> Result<String, HostnameError>;
}

impl<F> HostNormalizer for F
where
    F: Fn(&str, &str) -> Result<String, HostnameError> + Send + Sync,
{
    fn normalize(&self, raw_host: &str, namespace: &str) -> Result<String, HostnameError> {
        self(raw_host, namespace)
    }
}

/// Normalizer for Kubernetes service hosts.
///
/// Short names are qualified as `<name>.<namespace>.svc`; service hosts that
/// spell out the cluster domain have it removed so both spellings collide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceHostNormalizer {
    cluster_domain: String,
}

impl ServiceHostNormalizer {
    /// Create a normalizer for the given cluster domain (e.g. `cluster.local`).
    ///
    /// Surrounding dots and case are ignored.
    #[must_use]
    pub fn new(cluster_domain: &str) -> Self {
        Self {
            cluster_domain: cluster_domain.trim().trim_matches('.').to_ascii_lowercase(),
        }
    }

    /// The cluster domain stripped from service hosts.
    #[must_use]
    pub fn cluster_domain(&self) -> &str {
        &self.cluster_domain
    }

    fn service_suffix(&self) -> String {
        format!(".{SERVICE_DOMAIN_LABEL}.{}", self.cluster_domain)
    }
}

impl Default for ServiceHostNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_CLUSTER_DOMAIN)
    }
}

impl HostNormalizer for ServiceHostNormalizer {
    fn normalize(&self, raw_host: &str, namespace: &str) -> Result<String, HostnameError> {
        let host = canonicalize(raw_host)?;

        if host == WILDCARD_LABEL {
            return Ok(host);
        }

        if !host.contains('.') {
            if validate_label(namespace, namespace).is_err() {
                return Err(HostnameError::InvalidNamespace {
                    namespace: namespace.to_string(),
                });
            }
            return Ok(format!("{host}.{namespace}.{SERVICE_DOMAIN_LABEL}"));
        }

        if !self.cluster_domain.is_empty() {
            if let Some(service_host) = host.strip_suffix(&self.service_suffix()) {
                return Ok(format!("{service_host}.{SERVICE_DOMAIN_LABEL}"));
            }
        }

        Ok(host)
    }
}

/// Lower-case, trim and validate a raw host without qualifying it.
///
/// # Errors
///
/// Returns a [`HostnameError`] if the host is empty, too long, has an invalid
/// label or places a wildcard anywhere but the leftmost label.
pub fn canonicalize(raw_host: &str) -> Result<String, HostnameError> {
    let trimmed = raw_host.trim();
    let host = trimmed
        .strip_suffix('.')
        .unwrap_or(trimmed)
        .to_ascii_lowercase();

    if host.is_empty() {
        return Err(HostnameError::Empty);
    }

    if host.len() > MAX_HOSTNAME_LENGTH {
        return Err(HostnameError::TooLong {
            length: host.len(),
            host,
            max: MAX_HOSTNAME_LENGTH,
        });
    }

    for (index, label) in host.split('.').enumerate() {
        if label == WILDCARD_LABEL {
            if index == 0 {
                continue;
            }
            return Err(HostnameError::MisplacedWildcard { host: host.clone() });
        }
        if label.contains('*') {
            return Err(HostnameError::MisplacedWildcard { host: host.clone() });
        }
        validate_label(&host, label)?;
    }

    Ok(host)
}

/// Validate one DNS label (RFC 1123).
fn validate_label(host: &str, label: &str) -> Result<(), HostnameError> {
    let invalid = |reason: String| HostnameError::InvalidLabel {
        host: host.to_string(),
        label: label.to_string(),
        reason,
    };

    if label.is_empty() {
        return Err(invalid("label is empty".to_string()));
    }
    if label.len() > MAX_LABEL_LENGTH {
        return Err(invalid(format!(
            "label is {} characters long (maximum {MAX_LABEL_LENGTH})",
            label.len()
        )));
    }
    if let Some(c) = label
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(invalid(format!("contains invalid character '{c}'")));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(invalid("label must not start or end with '-'".to_string()));
    }

    Ok(())
}

#[cfg(test)]
#[path = "hostname_tests.rs"]
mod hostname_tests;
