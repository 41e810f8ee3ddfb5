// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # meshvet - Istio routing configuration checks
//!
//! meshvet inspects Istio service-mesh configuration and reports problems that
//! lead to undefined routing at runtime. It is strictly read-only: findings are
//! reported, configuration is never modified.
//!
//! ## Overview
//!
//! The library provides:
//!
//! - A typed, read-only model of Istio `VirtualService` resources
//! - Hostname normalization for namespace-relative mesh hosts
//! - Conflict detection for hosts claimed by multiple `VirtualService`s
//! - Deterministic findings with content-derived identifiers
//! - Sources for live clusters, YAML manifests and in-memory snapshots
//!
//! ## Modules
//!
//! - [`crd`] - `VirtualService` model and the [`crd::RoutingObject`] abstraction
//! - [`hostname`] - Canonical host normalization
//! - [`finding`] - Finding records and identifiers
//! - [`vetters`] - Checks and the registry that runs them
//! - [`source`] - Where `VirtualService`s come from
//! - [`report`] - Text and JSON rendering
//! - [`metrics`] - Prometheus metrics
//!
//! ## Example
//!
//! ```rust
//! use meshvet::crd::RoutingRef;
//! use meshvet::finding::ContentHashIdentifier;
//! use meshvet::hostname::ServiceHostNormalizer;
//! use meshvet::vetters::conflicting_vs_host::detect;
//!
//! let objects = vec![
//!     RoutingRef::new("frontend", "ns1", &["shared.example.com"]),
//!     RoutingRef::new("frontend-v2", "ns2", &["shared.example.com"]),
//! ];
//!
//! let findings = detect(&objects, &ServiceHostNormalizer::default(), &ContentHashIdentifier)?;
//! assert_eq!(findings.len(), 1);
//! assert_eq!(findings[0].attribute("namespaces"), Some("ns1, ns2"));
//! # Ok::<(), meshvet::errors::VetError>(())
//! ```

pub mod config;
pub mod constants;
pub mod crd;
pub mod errors;
pub mod finding;
pub mod hostname;
pub mod metrics;
pub mod report;
pub mod source;
pub mod vetters;
