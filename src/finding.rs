// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Finding records produced by the checks.
//!
//! A [`Finding`] keeps its `summary` and `message` as templates with `${key}`
//! placeholders; the values live in `attributes`. Consumers either store the
//! template and attributes separately or call [`Finding::rendered_summary`] /
//! [`Finding::rendered_message`] for display.
//!
//! # Identifiers
//!
//! Every finding carries an `id` derived from its content through a
//! [`FindingIdentifier`]. The id is assigned after every other field is final,
//! so two runs over the same configuration yield the same ids.
//!
//! ```rust
//! use meshvet::finding::{ContentHashIdentifier, Finding, FindingIdentifier, Severity};
//! use std::collections::BTreeMap;
//!
//! let mut finding = Finding {
//!     id: String::new(),
//!     kind: "example".to_string(),
//!     summary: "Host ${host} is claimed twice".to_string(),
//!     message: "Host ${host} is claimed twice".to_string(),
//!     severity: Severity::Error,
//!     attributes: BTreeMap::from([("host".to_string(), "foo.ns1.svc".to_string())]),
//! };
//! finding.id = ContentHashIdentifier.compute_id(&finding);
//!
//! assert_eq!(finding.id.len(), 64);
//! assert_eq!(finding.rendered_summary(), "Host foo.ns1.svc is claimed twice");
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Severity of a finding, ordered from least to most severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Informational only
    Info,
    /// Likely misconfiguration
    Warning,
    /// Configuration with undefined runtime behavior
    Error,
}

impl Severity {
    /// Upper-case name used in reports and identifiers.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured diagnostic describing one detected problem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Content-derived stable identifier
    pub id: String,
    /// Fixed tag identifying the finding type
    pub kind: String,
    /// Short template, parameterized by `attributes`
    pub summary: String,
    /// Long template, parameterized by `attributes`
    pub message: String,
    /// Fixed severity of the finding type
    pub severity: Severity,
    /// Template parameters
    pub attributes: BTreeMap<String, String>,
}

impl Finding {
    /// Look up a single attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Summary with every `${key}` placeholder replaced.
    #[must_use]
    pub fn rendered_summary(&self) -> String {
        render_template(&self.summary, &self.attributes)
    }

    /// Message with every `${key}` placeholder replaced.
    #[must_use]
    pub fn rendered_message(&self) -> String {
        render_template(&self.message, &self.attributes)
    }
}

/// Substitute `${key}` placeholders with values from `attributes`.
///
/// Placeholders without a matching attribute are left untouched.
#[must_use]
pub fn render_template(template: &str, attributes: &BTreeMap<String, String>) -> String {
    attributes
        .iter()
        .fold(template.to_string(), |rendered, (key, value)| {
            rendered.replace(&format!("${{{key}}}"), value)
        })
}

/// Computes the identifier of a finding from its content.
///
/// Implementations must ignore the current `id` field and be deterministic.
pub trait FindingIdentifier: Send + Sync {
    /// Compute the id for `finding`.
    fn compute_id(&self, finding: &Finding) -> String;
}

impl<F> FindingIdentifier for F
where
    F: Fn(&Finding) -> String + Send + Sync,
{
    fn compute_id(&self, finding: &Finding) -> String {
        self(finding)
    }
}

/// SHA-256 over kind, severity, templates and attributes, hex encoded.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContentHashIdentifier;

impl FindingIdentifier for ContentHashIdentifier {
    fn compute_id(&self, finding: &Finding) -> String {
        let mut hasher = Sha256::new();
        // NUL separators keep adjacent fields from running into each other
        for field in [
            finding.kind.as_str(),
            finding.severity.as_str(),
            finding.summary.as_str(),
            finding.message.as_str(),
        ] {
            hasher.update(field.as_bytes());
            hasher.update([0u8]);
        }
        for (key, value) in &finding.attributes {
            hasher.update(key.as_bytes());
            hasher.update(b"=");
            hasher.update(value.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Assign ids to `findings` in place. Must run after every other field is final.
pub fn assign_ids<I: FindingIdentifier + ?Sized>(findings: &mut [Finding], identifier: &I) {
    for finding in findings {
        finding.id = identifier.compute_id(finding);
    }
}

#[cfg(test)]
#[path = "finding_tests.rs"]
mod finding_tests;
