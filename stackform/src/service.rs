//! Service record types.
//!
//! This module defines the canonical in-memory representation of one
//! configured service. Records are pure data: the codec, graph builder,
//! and overlay resolver all consume them read-only and produce derived
//! structures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One configured service, as edited in the form.
///
/// A collection of records is exclusively owned by the editing session;
/// everything derived from it (document tree, graph) is disposable and
/// recomputed on demand.
///
/// # Examples
///
/// ```
/// use stackform::ServiceRecord;
///
/// let record = ServiceRecord::new("web", "nginx:alpine");
/// assert_eq!(record.name, "web");
/// assert_eq!(record.deploy.replicas, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Identifier, unique within its collection.
    ///
    /// Must match `[A-Za-z][A-Za-z0-9_-]*`.
    pub name: String,

    /// Image reference. Not validated beyond non-empty.
    pub image: String,

    /// Host port as a decimal string; resolved to an integer in
    /// [1, 65535] at validation time. Blank means no port mapping.
    #[serde(default)]
    pub host_port: String,

    /// Container port as a decimal string; same rules as `host_port`.
    #[serde(default)]
    pub container_port: String,

    /// Ordered `KEY=VALUE` entries. Insertion order is preserved and
    /// duplicates are allowed; last-wins is a decode-time policy choice,
    /// not enforced here.
    #[serde(default)]
    pub environment: Vec<String>,

    /// Ordered mount specs (`source:target[:mode]`).
    #[serde(default)]
    pub volumes: Vec<String>,

    /// Health check configuration.
    #[serde(default)]
    pub health_check: HealthCheck,

    /// Resource limits.
    #[serde(default)]
    pub resources: Resources,

    /// Deployment settings.
    #[serde(default)]
    pub deploy: DeployConfig,

    /// Restart policy.
    #[serde(default)]
    pub restart: RestartPolicy,

    /// Names of services this one depends on. Self-reference is
    /// forbidden; references to absent services are a soft warning only.
    #[serde(default)]
    pub depends_on: Vec<String>,

    /// Network names this service joins.
    #[serde(default)]
    pub networks: Vec<String>,

    /// Label key/value pairs, in insertion order.
    #[serde(default)]
    pub labels: Vec<(String, String)>,

    /// Free-text notes. Never serialized to the compose document.
    #[serde(default)]
    pub notes: String,
}

impl ServiceRecord {
    /// Creates a record with the given name and image and default
    /// settings everywhere else.
    #[must_use]
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            ..Self::default()
        }
    }

    /// Whether both port fields are populated.
    #[must_use]
    pub fn has_port_mapping(&self) -> bool {
        !self.host_port.trim().is_empty() && !self.container_port.trim().is_empty()
    }
}

impl Default for ServiceRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            image: String::new(),
            host_port: String::new(),
            container_port: String::new(),
            environment: Vec::new(),
            volumes: Vec::new(),
            health_check: HealthCheck::default(),
            resources: Resources::default(),
            deploy: DeployConfig::default(),
            restart: RestartPolicy::default(),
            depends_on: Vec::new(),
            networks: Vec::new(),
            labels: Vec::new(),
            notes: String::new(),
        }
    }
}

/// Health check configuration for a service.
///
/// The default is disabled with the standard probe cadence, so a record
/// decoded from a document without a `healthcheck` section compares equal
/// to a freshly created one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Whether the health check is emitted at all.
    pub enabled: bool,

    /// Probe interval as a duration string (e.g. `30s`).
    pub interval: String,

    /// Probe timeout as a duration string.
    pub timeout: String,

    /// Number of consecutive failures before the service is unhealthy.
    pub retries: u32,

    /// Grace period before probing starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_period: Option<String>,

    /// Custom test command. When absent, a command is derived from the
    /// image name at encode time (see [`crate::codec::probe`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<Vec<String>>,
}

impl Default for HealthCheck {
    fn default() -> Self {
        Self {
            enabled: false,
            interval: "30s".to_string(),
            timeout: "10s".to_string(),
            retries: 3,
            start_period: None,
            test: None,
        }
    }
}

/// Resource limits for a service.
///
/// Zero means "no limit configured"; the encoder omits the `deploy`
/// resources section entirely in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Resources {
    /// CPU limit in cores.
    pub cpu_limit: f64,

    /// Memory limit in megabytes.
    pub memory_limit: u32,
}

/// Deployment settings for a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Replica count. Defaults to 1; only values above 1 are emitted.
    pub replicas: u32,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self { replicas: 1 }
    }
}

/// Restart policy for a service.
///
/// # Examples
///
/// ```
/// use stackform::RestartPolicy;
///
/// assert_eq!(RestartPolicy::UnlessStopped.to_string(), "unless-stopped");
/// assert_eq!(RestartPolicy::parse("on-failure"), Some(RestartPolicy::OnFailure));
/// assert_eq!(RestartPolicy::parse("sometimes"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
    /// Never restart.
    #[default]
    No,
    /// Always restart.
    Always,
    /// Restart only on non-zero exit.
    OnFailure,
    /// Restart unless explicitly stopped.
    UnlessStopped,
}

impl RestartPolicy {
    /// Parses a policy from its document spelling.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "no" => Some(Self::No),
            "always" => Some(Self::Always),
            "on-failure" => Some(Self::OnFailure),
            "unless-stopped" => Some(Self::UnlessStopped),
            _ => None,
        }
    }
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::No => write!(f, "no"),
            Self::Always => write!(f, "always"),
            Self::OnFailure => write!(f, "on-failure"),
            Self::UnlessStopped => write!(f, "unless-stopped"),
        }
    }
}

/// Splits raw form input into list entries.
///
/// Entries are separated by newlines or commas; blank entries are
/// dropped and the rest trimmed. This is the flush-time projection from
/// the form's free-text fields (environment, volumes) into the record's
/// canonical list shape.
///
/// # Examples
///
/// ```
/// use stackform::service::split_list_input;
///
/// let entries = split_list_input("A=1\nB=2, C=3\n\n");
/// assert_eq!(entries, vec!["A=1", "B=2", "C=3"]);
/// ```
#[must_use]
pub fn split_list_input(raw: &str) -> Vec<String> {
    raw.split(['\n', ','])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}
