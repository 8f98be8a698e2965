//! Document-side types for the compose codec.
//!
//! The encode path serializes [`ServiceEntry`] values whose field order
//! matches the emitted key order. The decode path deserializes
//! [`RawService`] values whose fields are small tagged unions with one
//! variant per recognized input shape, dispatched by serde's runtime type
//! check. The multiple equivalent external representations (string vs.
//! object ports, list vs. mapping environment, and so on) are therefore
//! normalized in one place instead of branching all over the decoder.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

/// A service entry as emitted into the document.
///
/// Field order here is the emitted key order; optional sections are
/// omitted entirely rather than serialized empty.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceEntry {
    /// Image reference.
    pub image: String,

    /// Port mappings (`host:container`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<String>>,

    /// `KEY=VALUE` entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Vec<String>>,

    /// Mount specs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<String>>,

    /// Restart policy spelling.
    pub restart: String,

    /// Health check section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<HealthcheckEntry>,

    /// Deploy section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deploy: Option<DeployEntry>,

    /// Dependency names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<String>>,

    /// Network names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<String>>,

    /// Labels, in insertion order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Mapping>,
}

/// The emitted `healthcheck` section.
#[derive(Debug, Clone, Serialize)]
pub struct HealthcheckEntry {
    /// Probe command.
    pub test: Vec<String>,
    /// Probe interval.
    pub interval: String,
    /// Probe timeout.
    pub timeout: String,
    /// Failure threshold.
    pub retries: u32,
    /// Grace period before probing starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_period: Option<String>,
}

/// The emitted `deploy` section.
#[derive(Debug, Clone, Serialize)]
pub struct DeployEntry {
    /// Replica count, only emitted above 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,
    /// Resource limits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourcesEntry>,
}

/// The emitted `deploy.resources` section.
#[derive(Debug, Clone, Serialize)]
pub struct ResourcesEntry {
    /// Limit values.
    pub limits: LimitsEntry,
}

/// The emitted `deploy.resources.limits` section.
#[derive(Debug, Clone, Serialize)]
pub struct LimitsEntry {
    /// CPU limit in cores, as a stable decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpus: Option<String>,
    /// Memory limit, as `<int>MB`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

/// A scalar that may arrive as a number, boolean, or string.
///
/// YAML documents written by hand are loose about quoting, so port
/// numbers, replica counts, and limit values all show up in both forms.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// An integer scalar.
    Int(i64),
    /// A floating-point scalar.
    Float(f64),
    /// A boolean scalar.
    Bool(bool),
    /// A string scalar.
    Str(String),
}

impl Scalar {
    /// Normalize to the string spelling used by the record model.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Str(s) => s,
        }
    }
}

/// Recognized shapes of a `ports` list entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PortEntry {
    /// Long object form: `{target: 80, published: 8080}`.
    Object {
        /// Container-side port.
        target: Scalar,
        /// Host-side port.
        #[serde(default)]
        published: Option<Scalar>,
    },
    /// Shorthand form: `"8080:80/tcp"`, `"8080:80"`, or `"80"`.
    Shorthand(Scalar),
}

impl PortEntry {
    /// Normalize to `(host_port, container_port)` decimal strings.
    ///
    /// Shorthand strings drop any `/protocol` suffix, then split on `:`;
    /// the first segment is the host port and the second (when present)
    /// the container port.
    #[must_use]
    pub fn normalize(self) -> (String, String) {
        match self {
            Self::Object { target, published } => (
                published.map(Scalar::into_string).unwrap_or_default(),
                target.into_string(),
            ),
            Self::Shorthand(scalar) => {
                let raw = scalar.into_string();
                let without_protocol = raw.split('/').next().unwrap_or("").to_string();
                let mut parts = without_protocol.splitn(2, ':');
                let host = parts.next().unwrap_or("").trim().to_string();
                let container = parts.next().unwrap_or("").trim().to_string();
                (host, container)
            }
        }
    }
}

/// Recognized shapes of the `environment` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnvShape {
    /// List form: `["KEY=VALUE", ...]`.
    List(Vec<Scalar>),
    /// Mapping form: `{KEY: VALUE, ...}`.
    Map(Mapping),
}

impl EnvShape {
    /// Normalize to ordered `KEY=VALUE` lines.
    #[must_use]
    pub fn normalize(self) -> Vec<String> {
        match self {
            Self::List(entries) => entries.into_iter().map(Scalar::into_string).collect(),
            Self::Map(mapping) => mapping
                .into_iter()
                .map(|(key, value)| format!("{}={}", value_to_string(&key), value_to_string(&value)))
                .collect(),
        }
    }
}

/// Recognized shapes of the `depends_on` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DependsShape {
    /// List form: `[db, cache]`.
    List(Vec<String>),
    /// Mapping form: `{db: {condition: service_healthy}}`; only the
    /// keys are modeled.
    Map(Mapping),
}

impl DependsShape {
    /// Normalize to the dependency name list.
    #[must_use]
    pub fn normalize(self) -> Vec<String> {
        match self {
            Self::List(names) => names,
            Self::Map(mapping) => mapping.keys().map(value_to_string).collect(),
        }
    }
}

/// Recognized shapes of the per-service `networks` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NetworksShape {
    /// List form: `[frontend, backend]`.
    List(Vec<String>),
    /// Mapping form: `{frontend: {aliases: [...]}}`.
    Map(Mapping),
}

impl NetworksShape {
    /// Normalize to the network name list, also reporting whether any
    /// mapping entry carried a non-trivial body (aliases and friends),
    /// which the record model cannot represent.
    #[must_use]
    pub fn normalize(self) -> (Vec<String>, bool) {
        match self {
            Self::List(names) => (names, false),
            Self::Map(mapping) => {
                let mut has_attributes = false;
                let names = mapping
                    .into_iter()
                    .map(|(key, value)| {
                        if !is_trivial_body(&value) {
                            has_attributes = true;
                        }
                        value_to_string(&key)
                    })
                    .collect();
                (names, has_attributes)
            }
        }
    }
}

/// Recognized shapes of the `labels` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LabelsShape {
    /// List form: `["key=value", ...]`.
    List(Vec<String>),
    /// Mapping form: `{key: value, ...}`.
    Map(Mapping),
}

impl LabelsShape {
    /// Normalize to ordered key/value pairs.
    ///
    /// List entries without an `=` become a key with an empty value.
    #[must_use]
    pub fn normalize(self) -> Vec<(String, String)> {
        match self {
            Self::List(entries) => entries
                .into_iter()
                .map(|entry| match entry.split_once('=') {
                    Some((key, value)) => (key.to_string(), value.to_string()),
                    None => (entry, String::new()),
                })
                .collect(),
            Self::Map(mapping) => mapping
                .into_iter()
                .map(|(key, value)| (value_to_string(&key), value_to_string(&value)))
                .collect(),
        }
    }
}

/// Recognized shapes of `healthcheck.test`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TestShape {
    /// Exec form: `["CMD", "pg_isready"]`.
    List(Vec<String>),
    /// Shell form: a bare command string.
    Command(String),
}

impl TestShape {
    /// Normalize to the exec-form vector.
    #[must_use]
    pub fn normalize(self) -> Vec<String> {
        match self {
            Self::List(parts) => parts,
            Self::Command(command) => vec!["CMD-SHELL".to_string(), command],
        }
    }
}

/// A `healthcheck` section as read from a document.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawHealthcheck {
    /// Probe command, either shape.
    #[serde(default)]
    pub test: Option<TestShape>,
    /// Probe interval.
    #[serde(default)]
    pub interval: Option<String>,
    /// Probe timeout.
    #[serde(default)]
    pub timeout: Option<String>,
    /// Failure threshold.
    #[serde(default)]
    pub retries: Option<u32>,
    /// Grace period.
    #[serde(default)]
    pub start_period: Option<String>,
}

/// A `deploy.resources.limits` section as read from a document.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawLimits {
    /// CPU limit, number or string.
    #[serde(default)]
    pub cpus: Option<Scalar>,
    /// Memory limit with an optional unit suffix.
    #[serde(default)]
    pub memory: Option<Scalar>,
}

/// A `deploy.resources` section as read from a document.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawResources {
    /// Limit values.
    #[serde(default)]
    pub limits: Option<RawLimits>,
}

/// A `deploy` section as read from a document.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawDeploy {
    /// Replica count.
    #[serde(default)]
    pub replicas: Option<u32>,
    /// Resource limits.
    #[serde(default)]
    pub resources: Option<RawResources>,
}

/// A service entry as read from a document, before normalization.
///
/// Unmodeled keys collect into `extra` so the decoder can report them as
/// advanced features instead of losing them silently.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawService {
    /// Image reference.
    #[serde(default)]
    pub image: Option<String>,
    /// Port mappings, either shape.
    #[serde(default)]
    pub ports: Option<Vec<PortEntry>>,
    /// Environment, either shape.
    #[serde(default)]
    pub environment: Option<EnvShape>,
    /// Mount specs. Only the list form is accepted.
    #[serde(default)]
    pub volumes: Option<Vec<String>>,
    /// Health check section.
    #[serde(default)]
    pub healthcheck: Option<RawHealthcheck>,
    /// Deploy section.
    #[serde(default)]
    pub deploy: Option<RawDeploy>,
    /// Dependencies, either shape.
    #[serde(default)]
    pub depends_on: Option<DependsShape>,
    /// Networks, either shape.
    #[serde(default)]
    pub networks: Option<NetworksShape>,
    /// Labels, either shape.
    #[serde(default)]
    pub labels: Option<LabelsShape>,
    /// Restart policy spelling.
    #[serde(default)]
    pub restart: Option<String>,
    /// Everything the record model does not represent.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Render a YAML value as the plain string the record model stores.
#[must_use]
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Whether a mapping-entry body carries no information (null or empty).
fn is_trivial_body(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Mapping(mapping) => mapping.is_empty(),
        _ => false,
    }
}
