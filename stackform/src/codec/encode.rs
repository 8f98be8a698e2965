//! Encoding service records into the compose document.
//!
//! The document is assembled as an ordered YAML mapping (entry order
//! follows record order, key order follows [`ServiceEntry`] field order)
//! and rendered with the default emitter: 2-space indentation, unlimited
//! width, no anchors or aliases. That formatting is a contract with
//! callers who diff the output visually, so nothing here may reorder
//! keys.

use serde_yaml::{Mapping, Value};

use crate::codec::document::{
    DeployEntry, HealthcheckEntry, LimitsEntry, ResourcesEntry, ServiceEntry,
};
use crate::codec::{probe, units};
use crate::error::{Error, Result, Warning};
use crate::service::ServiceRecord;
use crate::validate::CollectionValidator;

/// Document version emitted at the top of every generated file.
const DOCUMENT_VERSION: &str = "3";

/// Encoding policy.
///
/// Strict encoding is for final generation: anything incoherent aborts
/// with a validation error. Lenient encoding is for live preview: invalid
/// records are skipped so the rest of the batch still renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeMode {
    /// Fail on the first invalid record.
    Strict,
    /// Skip invalid records, reporting each skip as a warning.
    Lenient,
}

/// The outcome of an encode: the rendered document plus any skip
/// warnings produced in lenient mode.
#[derive(Debug, Clone)]
pub struct EncodeResult {
    /// The rendered YAML text.
    pub yaml: String,
    /// Records skipped in lenient mode.
    pub warnings: Vec<Warning>,
}

/// Encode a collection strictly.
///
/// # Errors
///
/// Fails with a validation error when the collection is empty or any
/// record is invalid (blank name or image, bad port, duplicate name).
///
/// # Examples
///
/// ```
/// use stackform::codec::encode;
/// use stackform::ServiceRecord;
///
/// let records = vec![ServiceRecord::new("web", "nginx:alpine")];
/// let yaml = encode(&records, None).unwrap();
/// assert!(yaml.contains("web:"));
/// ```
pub fn encode(records: &[ServiceRecord], profile: Option<&str>) -> Result<String> {
    let result = encode_with_mode(records, profile, EncodeMode::Strict)?;
    Ok(result.yaml)
}

/// Encode a collection leniently, skipping invalid records.
///
/// Intended for live preview: a half-filled record never blanks out the
/// whole document.
///
/// # Errors
///
/// Fails only when the rendered document cannot be serialized; invalid
/// records are reported through the result's warnings instead.
pub fn encode_preview(records: &[ServiceRecord], profile: Option<&str>) -> Result<EncodeResult> {
    encode_with_mode(records, profile, EncodeMode::Lenient)
}

/// Encode a collection under an explicit policy.
///
/// # Errors
///
/// In strict mode, fails on an empty collection or any invalid record.
/// In lenient mode, fails only on serialization problems.
pub fn encode_with_mode(
    records: &[ServiceRecord],
    profile: Option<&str>,
    mode: EncodeMode,
) -> Result<EncodeResult> {
    if mode == EncodeMode::Strict {
        if records.is_empty() {
            return Err(Error::validation(
                "services",
                "cannot generate a document from an empty service collection",
            ));
        }
        CollectionValidator::validate_collection(records)?;
    }

    let mut services = Mapping::new();
    let mut warnings = Vec::new();

    for record in records {
        if mode == EncodeMode::Lenient {
            if let Err(err) = CollectionValidator::validate_record(record) {
                let name = if record.name.trim().is_empty() {
                    "<unnamed>".to_string()
                } else {
                    record.name.clone()
                };
                log::debug!("preview skipping service '{name}': {err}");
                warnings.push(Warning::SkippedService {
                    name,
                    reason: err.to_string(),
                });
                continue;
            }
            if services.contains_key(&Value::String(record.name.clone())) {
                warnings.push(Warning::SkippedService {
                    name: record.name.clone(),
                    reason: "duplicate service name".to_string(),
                });
                continue;
            }
        }

        services.insert(
            Value::String(record.name.clone()),
            serde_yaml::to_value(build_entry(record))?,
        );
    }

    let mut root = Mapping::new();
    root.insert(
        Value::String("version".to_string()),
        Value::String(DOCUMENT_VERSION.to_string()),
    );
    if let Some(tag) = profile {
        root.insert(
            Value::String("x-profile".to_string()),
            Value::String(tag.to_string()),
        );
    }
    root.insert(
        Value::String("services".to_string()),
        Value::Mapping(services),
    );

    let networks = collect_networks(records);
    if !networks.is_empty() {
        let mut section = Mapping::new();
        for name in networks {
            section.insert(Value::String(name), Value::Mapping(Mapping::new()));
        }
        root.insert(
            Value::String("networks".to_string()),
            Value::Mapping(section),
        );
    }

    let yaml = serde_yaml::to_string(&Value::Mapping(root))?;
    Ok(EncodeResult { yaml, warnings })
}

/// Build the document entry for one record.
fn build_entry(record: &ServiceRecord) -> ServiceEntry {
    let ports = record
        .has_port_mapping()
        .then(|| {
            vec![format!(
                "{}:{}",
                record.host_port.trim(),
                record.container_port.trim()
            )]
        });

    let environment = non_blank_entries(&record.environment);
    let volumes = non_blank_entries(&record.volumes);

    let depends_on = (!record.depends_on.is_empty()).then(|| record.depends_on.clone());
    let networks = (!record.networks.is_empty()).then(|| record.networks.clone());

    let labels: Mapping = record
        .labels
        .iter()
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (Value::String(key.clone()), Value::String(value.clone())))
        .collect();
    let labels = (!labels.is_empty()).then_some(labels);

    ServiceEntry {
        image: record.image.clone(),
        ports,
        environment,
        volumes,
        restart: record.restart.to_string(),
        healthcheck: build_healthcheck(record),
        deploy: build_deploy(record),
        depends_on,
        networks,
        labels,
    }
}

/// Build the `healthcheck` section, if the record's check qualifies.
fn build_healthcheck(record: &ServiceRecord) -> Option<HealthcheckEntry> {
    let check = &record.health_check;
    if !check.enabled || check.interval.trim().is_empty() || check.timeout.trim().is_empty() {
        return None;
    }

    let test = probe::normalize_custom_test(check.test.as_deref())
        .unwrap_or_else(|| probe::derive_test(&record.image, &record.container_port));

    Some(HealthcheckEntry {
        test,
        interval: check.interval.clone(),
        timeout: check.timeout.clone(),
        retries: check.retries,
        start_period: check
            .start_period
            .as_ref()
            .filter(|period| !period.trim().is_empty())
            .cloned(),
    })
}

/// Build the `deploy` section, if any of its knobs are set.
fn build_deploy(record: &ServiceRecord) -> Option<DeployEntry> {
    let replicas = record.deploy.replicas;
    let cpu = record.resources.cpu_limit;
    let memory = record.resources.memory_limit;

    if replicas <= 1 && cpu <= 0.0 && memory == 0 {
        return None;
    }

    let resources = (cpu > 0.0 || memory > 0).then(|| ResourcesEntry {
        limits: LimitsEntry {
            cpus: (cpu > 0.0).then(|| units::format_cpus(cpu)),
            memory: (memory > 0).then(|| units::format_memory_mb(memory)),
        },
    });

    Some(DeployEntry {
        replicas: (replicas > 1).then_some(replicas),
        resources,
    })
}

/// Union of all per-service network names, in first-seen order.
fn collect_networks(records: &[ServiceRecord]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        for network in &record.networks {
            if !names.iter().any(|existing| existing == network) {
                names.push(network.clone());
            }
        }
    }
    names
}

/// Trimmed, blank-dropped copy of a list field, or None when empty.
fn non_blank_entries(entries: &[String]) -> Option<Vec<String>> {
    let kept: Vec<String> = entries
        .iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect();
    (!kept.is_empty()).then_some(kept)
}
