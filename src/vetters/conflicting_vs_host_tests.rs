// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `conflicting_vs_host.rs`

use super::*;
use crate::crd::{RoutingRef, VirtualService, VirtualServiceSpec};
use crate::errors::HostnameError;
use crate::finding::ContentHashIdentifier;
use crate::hostname::ServiceHostNormalizer;
use crate::source::StaticSource;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

fn run(objects: &[RoutingRef]) -> Result<Vec<Finding>, VetError> {
    detect(
        objects,
        &ServiceHostNormalizer::default(),
        &ContentHashIdentifier,
    )
}

fn hosts_of(findings: &[Finding]) -> Vec<&str> {
    findings
        .iter()
        .filter_map(|finding| finding.attribute(ATTR_HOST))
        .collect()
}

fn virtual_service(name: &str, namespace: &str, hosts: &[&str]) -> VirtualService {
    VirtualService {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: VirtualServiceSpec {
            hosts: hosts.iter().map(ToString::to_string).collect(),
            ..Default::default()
        },
    }
}

#[test]
fn test_empty_input_yields_no_findings() {
    assert!(run(&[]).unwrap().is_empty());
}

#[test]
fn test_unique_hosts_yield_no_findings() {
    let objects = vec![
        RoutingRef::new("a", "ns1", &["foo", "bar.example.com"]),
        RoutingRef::new("b", "ns1", &["baz"]),
        RoutingRef::new("c", "ns2", &["foo"]), // foo.ns2.svc, not foo.ns1.svc
        RoutingRef::new("d", "ns2", &[]),
    ];

    assert!(run(&objects).unwrap().is_empty());
}

#[test]
fn test_pairwise_conflict() {
    let objects = vec![
        RoutingRef::new("A", "ns1", &["foo.ns1.svc"]),
        RoutingRef::new("B", "ns1", &["foo.ns1.svc"]),
    ];

    let findings = run(&objects).unwrap();

    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.attribute(ATTR_HOST), Some("foo.ns1.svc"));
    assert_eq!(finding.attribute(ATTR_OBJECT_NAMES), Some("A, B"));
    assert_eq!(finding.attribute(ATTR_NAMESPACES), Some("ns1, ns1"));
    assert_eq!(finding.kind, KIND_HOST_IN_MULTIPLE_VS);
    assert_eq!(finding.severity, Severity::Error);
    assert_eq!(finding.summary, HOST_IN_MULTIPLE_VS_SUMMARY);
    assert_eq!(finding.message, HOST_IN_MULTIPLE_VS_MESSAGE);
    assert_eq!(finding.attributes.len(), 3);
    assert_eq!(finding.id.len(), 64);
}

#[test]
fn test_object_names_align_with_namespaces() {
    let objects = vec![
        RoutingRef::new("A", "ns1", &["foo.ns1.svc"]),
        RoutingRef::new("B", "ns2", &["foo.ns1.svc.cluster.local"]),
    ];

    let findings = run(&objects).unwrap();
    let finding = &findings[0];

    let keys: Vec<&str> = finding.attributes.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["host", "namespaces", "object_names"]);
    assert_eq!(finding.attribute("object_names"), Some("A, B"));

    let names: Vec<&str> = finding.attribute(ATTR_OBJECT_NAMES).unwrap().split(", ").collect();
    let namespaces: Vec<&str> = finding.attribute(ATTR_NAMESPACES).unwrap().split(", ").collect();
    assert_eq!(
        names.into_iter().zip(namespaces).collect::<Vec<_>>(),
        vec![("A", "ns1"), ("B", "ns2")]
    );

    assert_eq!(
        finding.rendered_message(),
        "The VirtualServices A, B in namespace(s) ns1, ns2 define the same host, foo.ns1.svc. \
         A host name can be defined by only one VirtualService. Consider updating the \
         VirtualService(s) to have unique hostnames."
    );
}

#[test]
fn test_shorthand_equals_fully_qualified() {
    let objects = vec![
        RoutingRef::new("A", "ns1", &["foo"]),
        RoutingRef::new("B", "ns1", &["foo.ns1.svc"]),
        RoutingRef::new("C", "ns2", &["foo.ns1.svc.cluster.local"]),
    ];

    let findings = run(&objects).unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].attribute(ATTR_HOST), Some("foo.ns1.svc"));
    assert_eq!(findings[0].attribute(ATTR_OBJECT_NAMES), Some("A, B, C"));
    assert_eq!(findings[0].attribute(ATTR_NAMESPACES), Some("ns1, ns1, ns2"));
}

#[test]
fn test_cross_namespace_conflict() {
    let objects = vec![
        RoutingRef::new("A", "ns1", &["shared.example.com"]),
        RoutingRef::new("B", "ns2", &["shared.example.com"]),
    ];

    let findings = run(&objects).unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].attribute(ATTR_HOST), Some("shared.example.com"));
    assert_eq!(findings[0].attribute(ATTR_OBJECT_NAMES), Some("A, B"));
    assert_eq!(findings[0].attribute(ATTR_NAMESPACES), Some("ns1, ns2"));
}

#[test]
fn test_same_name_in_different_namespaces_is_distinct() {
    let objects = vec![
        RoutingRef::new("gateway", "ns1", &["shared.example.com"]),
        RoutingRef::new("gateway", "ns2", &["shared.example.com"]),
    ];

    let findings = run(&objects).unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(
        findings[0].attribute(ATTR_OBJECT_NAMES),
        Some("gateway, gateway")
    );
}

#[test]
fn test_self_repetition_is_not_a_conflict() {
    let objects = vec![
        RoutingRef::new("A", "ns1", &["foo", "foo.ns1.svc", "FOO"]),
        RoutingRef::new("B", "ns1", &["bar"]),
    ];

    assert!(run(&objects).unwrap().is_empty());
}

#[test]
fn test_self_repetition_is_listed_verbatim_in_a_conflict() {
    let objects = vec![
        RoutingRef::new("A", "ns1", &["foo", "foo"]),
        RoutingRef::new("B", "ns1", &["foo"]),
    ];

    let findings = run(&objects).unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].attribute(ATTR_OBJECT_NAMES), Some("A, A, B"));
    assert_eq!(findings[0].attribute(ATTR_NAMESPACES), Some("ns1, ns1, ns1"));
}

#[test]
fn test_owners_follow_input_order() {
    let objects = vec![
        RoutingRef::new("zeta", "ns2", &["shared.example.com"]),
        RoutingRef::new("alpha", "ns1", &["shared.example.com"]),
    ];

    let findings = run(&objects).unwrap();

    assert_eq!(findings[0].attribute(ATTR_OBJECT_NAMES), Some("zeta, alpha"));
    assert_eq!(findings[0].attribute(ATTR_NAMESPACES), Some("ns2, ns1"));
}

#[test]
fn test_findings_sorted_by_host() {
    let objects = vec![
        RoutingRef::new("a", "ns1", &["zulu.example.com", "alpha.example.com", "mike"]),
        RoutingRef::new("b", "ns1", &["mike.ns1.svc", "zulu.example.com"]),
        RoutingRef::new("c", "ns2", &["alpha.example.com"]),
    ];

    let findings = run(&objects).unwrap();

    assert_eq!(
        hosts_of(&findings),
        vec!["alpha.example.com", "mike.ns1.svc", "zulu.example.com"]
    );
}

#[test]
fn test_detection_is_deterministic() {
    let objects = vec![
        RoutingRef::new("a", "ns1", &["foo", "shared.example.com"]),
        RoutingRef::new("b", "ns2", &["shared.example.com", "foo.ns1.svc"]),
        RoutingRef::new("c", "ns3", &["other.example.com"]),
    ];

    let first = run(&objects).unwrap();
    let second = run(&objects).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_ne!(first[0].id, first[1].id);
}

#[test]
fn test_ids_match_content_hash() {
    let objects = vec![
        RoutingRef::new("a", "ns1", &["foo"]),
        RoutingRef::new("b", "ns1", &["foo"]),
    ];

    let findings = run(&objects).unwrap();
    let recomputed = ContentHashIdentifier.compute_id(&findings[0]);

    assert_eq!(findings[0].id, recomputed);
}

#[test]
fn test_identifier_runs_after_attributes_are_final() {
    let objects = vec![
        RoutingRef::new("a", "ns1", &["foo"]),
        RoutingRef::new("b", "ns1", &["foo"]),
    ];
    let identifier = |finding: &Finding| {
        format!(
            "{}|{}",
            finding.attribute(ATTR_HOST).unwrap_or("missing"),
            finding.attribute(ATTR_OBJECT_NAMES).unwrap_or("missing")
        )
    };

    let findings = detect(&objects, &ServiceHostNormalizer::default(), &identifier).unwrap();

    assert_eq!(findings[0].id, "foo.ns1.svc|a, b");
}

#[test]
fn test_normalization_failure_is_fatal() {
    let objects = vec![
        RoutingRef::new("a", "ns1", &["shared.example.com"]),
        RoutingRef::new("b", "ns1", &["shared.example.com"]),
        RoutingRef::new("broken", "ns2", &["ok.example.com", "bad..host"]),
    ];

    match run(&objects) {
        Err(VetError::Normalization {
            name,
            namespace,
            host,
            source,
        }) => {
            assert_eq!(name, "broken");
            assert_eq!(namespace, "ns2");
            assert_eq!(host, "bad..host");
            assert!(matches!(source, HostnameError::InvalidLabel { .. }));
        }
        other => panic!("expected normalization error, got {other:?}"),
    }
}

#[test]
fn test_custom_normalizer_is_used() {
    let objects = vec![
        RoutingRef::new("a", "ns1", &["foo"]),
        RoutingRef::new("b", "ns2", &["foo"]),
    ];
    // Ignores namespaces entirely, so bare names collide across namespaces
    let bare = |host: &str, _namespace: &str| -> Result<String, HostnameError> {
        Ok(host.to_string())
    };

    let findings = detect(&objects, &bare, &ContentHashIdentifier).unwrap();

    assert_eq!(hosts_of(&findings), vec!["foo"]);
}

#[test]
fn test_detect_accepts_virtual_services() {
    let objects = vec![
        virtual_service("reviews", "bookinfo", &["reviews"]),
        virtual_service("reviews-canary", "bookinfo", &["reviews.bookinfo.svc.cluster.local"]),
    ];

    let findings = detect(
        &objects,
        &ServiceHostNormalizer::default(),
        &ContentHashIdentifier,
    )
    .unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(
        findings[0].rendered_summary(),
        "Multiple VirtualServices define the same host - reviews.bookinfo.svc"
    );
    assert_eq!(
        findings[0].rendered_message(),
        "The VirtualServices reviews, reviews-canary in namespace(s) bookinfo, bookinfo define \
         the same host, reviews.bookinfo.svc. A host name can be defined by only one \
         VirtualService. Consider updating the VirtualService(s) to have unique hostnames."
    );
}

#[test]
fn test_conflicting_host_finding_has_empty_id() {
    let a = RoutingRef::new("a", "ns1", &[]);
    let b = RoutingRef::new("b", "ns2", &[]);

    let finding = conflicting_host_finding("foo.example.com", &[&a, &b]);

    assert!(finding.id.is_empty());
    assert_eq!(finding.attribute(ATTR_OBJECT_NAMES), Some("a, b"));
}

#[tokio::test]
async fn test_vetter_reads_from_source() {
    let source = StaticSource::new(vec![
        virtual_service("a", "ns1", &["shared.example.com"]),
        virtual_service("b", "ns2", &["shared.example.com"]),
        virtual_service("c", "ns2", &["c"]),
    ]);
    let vetter = ConflictingVirtualServiceHost::new(
        Arc::new(source),
        Arc::new(ServiceHostNormalizer::default()),
        Arc::new(ContentHashIdentifier),
    );

    let info = vetter.info();
    assert_eq!(info.id, "ConflictingVirtualServiceHost");
    assert_eq!(info.version, "0.1.0");

    let findings = vetter.vet().await.unwrap();
    assert_eq!(hosts_of(&findings), vec!["shared.example.com"]);
}

#[tokio::test]
async fn test_vetter_propagates_normalization_error() {
    let source = StaticSource::new(vec![virtual_service("a", "ns1", &["foo.*.com"])]);
    let vetter = ConflictingVirtualServiceHost::new(
        Arc::new(source),
        Arc::new(ServiceHostNormalizer::default()),
        Arc::new(ContentHashIdentifier),
    );

    let result = vetter.vet().await;
    assert!(matches!(result, Err(VetError::Normalization { .. })));
}
