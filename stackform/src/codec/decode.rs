//! Decoding compose documents into service records.
//!
//! Decoding is forgiving: absent fields take defaults, each field accepts
//! every recognized input shape, and a malformed service entry is skipped
//! with a logged note rather than aborting the import. Only two
//! conditions are hard failures: a document with no recognizable service
//! map, and a malformed entry in a single-service document (legacy mode,
//! where skipping would leave nothing to import).

use serde_yaml::Value;

use crate::codec::document::{value_to_string, RawService};
use crate::codec::{probe, units};
use crate::error::{Error, Result, Warning};
use crate::service::{HealthCheck, RestartPolicy, ServiceRecord};

/// Top-level keys the codec understands; everything else is reported as
/// an advanced feature.
const MODELED_TOP_LEVEL_KEYS: &[&str] = &["version", "services", "networks", "x-profile"];

/// The outcome of a decode: the recovered records plus non-blocking
/// warnings (skipped entries, advanced features).
#[derive(Debug, Clone)]
pub struct DecodeResult {
    /// Recovered service records, in document order.
    pub records: Vec<ServiceRecord>,
    /// Non-blocking conditions encountered along the way.
    pub warnings: Vec<Warning>,
}

/// Decode a compose document from YAML text.
///
/// # Errors
///
/// Fails when the text is not valid YAML, when there is no top-level
/// `services` map, or when the only service in a single-service document
/// cannot be parsed.
///
/// # Examples
///
/// ```
/// use stackform::codec::decode;
///
/// let result = decode("services:\n  web:\n    image: nginx\n").unwrap();
/// assert_eq!(result.records[0].name, "web");
/// assert_eq!(result.records[0].image, "nginx");
/// ```
pub fn decode(input: &str) -> Result<DecodeResult> {
    let doc: Value = serde_yaml::from_str(input)?;
    decode_value(&doc)
}

/// Decode an already-parsed document tree.
///
/// # Errors
///
/// Same failure conditions as [`decode`], minus YAML parsing.
pub fn decode_value(doc: &Value) -> Result<DecodeResult> {
    let root = doc
        .as_mapping()
        .ok_or_else(|| Error::format("document is not a mapping"))?;

    let services = root
        .get(&Value::String("services".to_string()))
        .and_then(Value::as_mapping)
        .ok_or_else(|| Error::format("document has no top-level services map"))?;

    let mut advanced: Vec<String> = Vec::new();
    for key in root.keys() {
        let key = value_to_string(key);
        if !MODELED_TOP_LEVEL_KEYS.contains(&key.as_str()) {
            push_unique(&mut advanced, format!("{key} (top-level)"));
        }
    }

    let single_service = services.len() == 1;
    let mut records = Vec::with_capacity(services.len());
    let mut warnings = Vec::new();

    for (key, value) in services {
        let name = value_to_string(key);
        match serde_yaml::from_value::<RawService>(value.clone()) {
            Ok(raw) => records.push(build_record(name, raw, &mut advanced)),
            Err(err) if single_service => {
                return Err(Error::format(format!(
                    "service '{name}' cannot be parsed: {err}"
                )));
            }
            Err(err) => {
                log::warn!("skipping malformed service '{name}': {err}");
                warnings.push(Warning::SkippedService {
                    name,
                    reason: err.to_string(),
                });
            }
        }
    }

    if !advanced.is_empty() {
        warnings.push(Warning::AdvancedFeatures { features: advanced });
    }

    Ok(DecodeResult { records, warnings })
}

/// Normalize one raw entry into a service record.
fn build_record(name: String, raw: RawService, advanced: &mut Vec<String>) -> ServiceRecord {
    let mut record = ServiceRecord::new(name, raw.image.unwrap_or_default());

    if let Some(ports) = raw.ports {
        if let Some(first) = ports.into_iter().next() {
            let (host, container) = first.normalize();
            record.host_port = host;
            record.container_port = container;
        }
    }

    if let Some(environment) = raw.environment {
        record.environment = environment.normalize();
    }

    if let Some(volumes) = raw.volumes {
        record.volumes = volumes;
    }

    if let Some(check) = raw.healthcheck {
        let defaults = HealthCheck::default();
        record.health_check = HealthCheck {
            enabled: true,
            interval: check.interval.unwrap_or(defaults.interval),
            timeout: check.timeout.unwrap_or(defaults.timeout),
            retries: check.retries.unwrap_or(defaults.retries),
            start_period: check.start_period,
            test: check.test.map(super::document::TestShape::normalize),
        };
        // A probe identical to the derived default is the default.
        let derived = probe::derive_test(&record.image, &record.container_port);
        if record.health_check.test.as_deref() == Some(derived.as_slice()) {
            record.health_check.test = None;
        }
    }

    if let Some(deploy) = raw.deploy {
        record.deploy.replicas = deploy.replicas.unwrap_or(1);
        if let Some(limits) = deploy.resources.and_then(|r| r.limits) {
            if let Some(cpus) = limits.cpus {
                record.resources.cpu_limit = units::parse_cpu_limit(&cpus.into_string());
            }
            if let Some(memory) = limits.memory {
                record.resources.memory_limit = units::normalize_memory_mb(&memory.into_string());
            }
        }
    }

    if let Some(depends) = raw.depends_on {
        record.depends_on = depends.normalize();
    }

    if let Some(networks) = raw.networks {
        let (names, has_attributes) = networks.normalize();
        record.networks = names;
        if has_attributes {
            push_unique(
                advanced,
                "networks (service-level attributes)".to_string(),
            );
        }
    }

    if let Some(labels) = raw.labels {
        record.labels = labels.normalize();
    }

    if let Some(restart) = raw.restart {
        match RestartPolicy::parse(&restart) {
            Some(policy) => record.restart = policy,
            None => {
                log::debug!(
                    "service '{}': unknown restart policy '{restart}', using default",
                    record.name
                );
            }
        }
    }

    for key in raw.extra.keys() {
        push_unique(advanced, key.clone());
    }

    record
}

/// Append preserving first-seen order, without duplicates.
fn push_unique(features: &mut Vec<String>, feature: String) {
    if !features.contains(&feature) {
        features.push(feature);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_one(yaml: &str) -> ServiceRecord {
        let result = decode(yaml).unwrap();
        assert_eq!(result.records.len(), 1);
        result.records.into_iter().next().unwrap()
    }

    #[test]
    fn test_decode_requires_services_map() {
        let err = decode("version: '3'\n").unwrap_err();
        assert!(err.is_format());

        let err = decode("- just\n- a\n- list\n").unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn test_decode_minimal_service_gets_defaults() {
        let record = decode_one("services:\n  web:\n    image: nginx\n");
        assert_eq!(record.name, "web");
        assert_eq!(record.image, "nginx");
        assert_eq!(record.host_port, "");
        assert_eq!(record.container_port, "");
        assert!(!record.health_check.enabled);
        assert_eq!(record.health_check.interval, "30s");
        assert_eq!(record.health_check.timeout, "10s");
        assert_eq!(record.health_check.retries, 3);
        assert_eq!(record.deploy.replicas, 1);
        assert_eq!(record.restart, RestartPolicy::No);
    }

    #[test]
    fn test_decode_missing_image_defaults_to_empty() {
        let record = decode_one("services:\n  web:\n    restart: always\n");
        assert_eq!(record.image, "");
        assert_eq!(record.restart, RestartPolicy::Always);
    }

    #[test]
    fn test_decode_port_with_protocol_suffix() {
        let record = decode_one(
            "services:\n  web:\n    image: nginx\n    ports:\n      - \"8080:80/tcp\"\n",
        );
        assert_eq!(record.host_port, "8080");
        assert_eq!(record.container_port, "80");
    }

    #[test]
    fn test_decode_port_object_form() {
        let record = decode_one(
            "services:\n  web:\n    image: nginx\n    ports:\n      - target: 80\n        published: 8080\n",
        );
        assert_eq!(record.host_port, "8080");
        assert_eq!(record.container_port, "80");
    }

    #[test]
    fn test_decode_environment_mapping_form() {
        let record = decode_one(
            "services:\n  db:\n    image: postgres:13\n    environment:\n      POSTGRES_DB: app\n      POSTGRES_PORT: 5432\n",
        );
        assert_eq!(
            record.environment,
            vec!["POSTGRES_DB=app", "POSTGRES_PORT=5432"]
        );
    }

    #[test]
    fn test_decode_depends_on_mapping_form() {
        let record = decode_one(
            "services:\n  web:\n    image: nginx\n    depends_on:\n      db:\n        condition: service_healthy\n",
        );
        assert_eq!(record.depends_on, vec!["db"]);
    }

    #[test]
    fn test_decode_memory_units() {
        let record = decode_one(
            "services:\n  db:\n    image: postgres:13\n    deploy:\n      resources:\n        limits:\n          cpus: \"0.5\"\n          memory: 1G\n",
        );
        assert_eq!(record.resources.memory_limit, 1024);
        assert!((record.resources.cpu_limit - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_decode_healthcheck_partial_fills_defaults() {
        let record = decode_one(
            "services:\n  db:\n    image: postgres:13\n    healthcheck:\n      interval: 5s\n",
        );
        assert!(record.health_check.enabled);
        assert_eq!(record.health_check.interval, "5s");
        assert_eq!(record.health_check.timeout, "10s");
        assert_eq!(record.health_check.retries, 3);
    }

    #[test]
    fn test_decode_healthcheck_derived_probe_normalizes_to_default() {
        let record = decode_one(
            "services:\n  db:\n    image: postgres:13\n    healthcheck:\n      test: [\"CMD\", \"pg_isready\"]\n      interval: 30s\n",
        );
        assert!(record.health_check.enabled);
        assert_eq!(record.health_check.test, None);
    }

    #[test]
    fn test_decode_healthcheck_custom_probe_kept() {
        let record = decode_one(
            "services:\n  db:\n    image: postgres:13\n    healthcheck:\n      test: [\"CMD-SHELL\", \"pg_isready -U app\"]\n",
        );
        assert_eq!(
            record.health_check.test,
            Some(vec![
                "CMD-SHELL".to_string(),
                "pg_isready -U app".to_string()
            ])
        );
    }

    #[test]
    fn test_decode_unknown_restart_falls_back() {
        let record = decode_one("services:\n  web:\n    image: nginx\n    restart: sometimes\n");
        assert_eq!(record.restart, RestartPolicy::No);
    }

    #[test]
    fn test_decode_reports_advanced_features() {
        let result = decode(
            "volumes:\n  data:\nservices:\n  web:\n    image: nginx\n    build: .\n    command: [serve]\n",
        )
        .unwrap();
        let features = result
            .warnings
            .iter()
            .find_map(|warning| match warning {
                Warning::AdvancedFeatures { features } => Some(features.clone()),
                _ => None,
            })
            .unwrap();
        assert!(features.contains(&"volumes (top-level)".to_string()));
        assert!(features.contains(&"build".to_string()));
        assert!(features.contains(&"command".to_string()));
    }

    #[test]
    fn test_decode_network_attributes_flagged() {
        let result = decode(
            "services:\n  web:\n    image: nginx\n    networks:\n      frontend:\n        aliases: [edge]\n",
        )
        .unwrap();
        assert_eq!(result.records[0].networks, vec!["frontend"]);
        assert!(result.warnings.iter().any(|warning| matches!(
            warning,
            Warning::AdvancedFeatures { features }
                if features.contains(&"networks (service-level attributes)".to_string())
        )));
    }

    #[test]
    fn test_decode_skips_malformed_entry_in_multi_service_document() {
        let result = decode(
            "services:\n  broken:\n    volumes:\n      mapping: not-a-list\n    image: nginx\n  web:\n    image: nginx\n",
        )
        .unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].name, "web");
        assert!(result
            .warnings
            .iter()
            .any(|warning| matches!(warning, Warning::SkippedService { name, .. } if name == "broken")));
    }

    #[test]
    fn test_decode_single_service_malformed_is_hard_failure() {
        let err = decode("services:\n  broken:\n    volumes:\n      mapping: not-a-list\n")
            .unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn test_decode_backwards_dependency_scenario() {
        // Intentionally backwards: the database depends on the web tier.
        let result = decode(
            "services:\n  web:\n    image: nginx:alpine\n    ports:\n      - \"80:80\"\n  db:\n    image: postgres:13\n    depends_on:\n      - web\n",
        )
        .unwrap();
        assert_eq!(result.records.len(), 2);
        let db = &result.records[1];
        assert_eq!(db.name, "db");
        assert_eq!(db.depends_on, vec!["web"]);
    }
}
