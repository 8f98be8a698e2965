//! Property-based tests for the document codec.

use proptest::prelude::*;

use crate::codec::{decode, encode, encode_preview, units};
use crate::service::{RestartPolicy, ServiceRecord};

/// Build a collection of `count` records exercising the modeled fields.
///
/// Records are named `svc0..svcN`; each one past the first depends on its
/// predecessor so that `depends_on` round-trips too.
fn build_records(
    count: usize,
    host: u16,
    container: u16,
    environment: &[String],
    replicas: u32,
    memory: u32,
    cpu: f64,
    restart: RestartPolicy,
    health_enabled: bool,
) -> Vec<ServiceRecord> {
    (0..count)
        .map(|i| {
            let mut record = ServiceRecord::new(format!("svc{i}"), "nginx:alpine");
            record.host_port = host.to_string();
            record.container_port = container.to_string();
            record.environment = environment.to_vec();
            record.volumes = vec!["./data:/var/data".to_string()];
            record.deploy.replicas = replicas;
            record.resources.memory_limit = memory;
            record.resources.cpu_limit = cpu;
            record.restart = restart;
            record.health_check.enabled = health_enabled;
            record.networks = vec!["backend".to_string()];
            record.labels = vec![("tier".to_string(), format!("t{i}"))];
            if i > 0 {
                record.depends_on = vec![format!("svc{}", i - 1)];
            }
            record
        })
        .collect()
}

fn restart_from_index(index: u8) -> RestartPolicy {
    match index % 4 {
        0 => RestartPolicy::No,
        1 => RestartPolicy::Always,
        2 => RestartPolicy::OnFailure,
        _ => RestartPolicy::UnlessStopped,
    }
}

proptest! {
    /// decode is a left inverse of encode for modeled fields.
    #[test]
    fn prop_decode_inverts_encode(
        count in 1usize..4,
        host in 1u16..=65535,
        container in 1u16..=65535,
        environment in prop::collection::vec("[A-Z][A-Z0-9_]{0,5}=[a-z0-9]{0,8}", 0..4),
        replicas in 1u32..4,
        memory in prop_oneof![Just(0u32), 128u32..4096],
        cpu in prop_oneof![Just(0.0f64), Just(0.5f64), Just(2.0f64)],
        restart_index in 0u8..4,
        health_enabled in any::<bool>(),
    ) {
        let records = build_records(
            count,
            host,
            container,
            &environment,
            replicas,
            memory,
            cpu,
            restart_from_index(restart_index),
            health_enabled,
        );

        let yaml = encode(&records, None).unwrap();
        let result = decode(&yaml).unwrap();

        prop_assert!(result.warnings.is_empty(), "round trip produced warnings: {:?}", result.warnings);
        prop_assert_eq!(result.records, records);
    }

    /// Encoding the same collection twice is byte-identical.
    #[test]
    fn prop_encode_is_idempotent(
        count in 1usize..4,
        host in 1u16..=65535,
        container in 1u16..=65535,
        restart_index in 0u8..4,
    ) {
        let records = build_records(
            count,
            host,
            container,
            &[],
            1,
            0,
            0.0,
            restart_from_index(restart_index),
            false,
        );

        let first = encode(&records, None).unwrap();
        let second = encode(&records, None).unwrap();
        prop_assert_eq!(first, second);
    }

    /// For a fully valid collection, the lenient preview renders exactly
    /// what the strict encoder renders, with no skips.
    #[test]
    fn prop_preview_matches_strict_for_valid_records(
        count in 1usize..4,
        host in 1u16..=65535,
        container in 1u16..=65535,
    ) {
        let records = build_records(
            count,
            host,
            container,
            &[],
            1,
            0,
            0.0,
            RestartPolicy::No,
            false,
        );

        let strict = encode(&records, None).unwrap();
        let preview = encode_preview(&records, None).unwrap();
        prop_assert!(preview.warnings.is_empty());
        prop_assert_eq!(preview.yaml, strict);
    }

    /// Memory formatting and normalization are inverses on whole MB.
    #[test]
    fn prop_memory_format_round_trips(megabytes in 1u32..1_000_000) {
        let formatted = units::format_memory_mb(megabytes);
        prop_assert_eq!(units::normalize_memory_mb(&formatted), megabytes);
    }

    /// Gigabyte spellings scale by 1024.
    #[test]
    fn prop_gigabytes_scale(gigabytes in 1u32..64) {
        let raw = format!("{gigabytes}G");
        prop_assert_eq!(units::normalize_memory_mb(&raw), gigabytes * 1024);
    }
}
