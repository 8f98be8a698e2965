//! Environment overlays.
//!
//! An overlay is a named, sparse set of per-service field overrides
//! applied on top of the base service collection. Override semantics are
//! shallow: a field present in the patch replaces the base field
//! entirely. Nested objects like the health check are swapped as a
//! unit, never merged field-by-field.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::service::{DeployConfig, HealthCheck, Resources, RestartPolicy, ServiceRecord};

/// Sentinel environment name for the unmodified base collection.
///
/// The base environment never carries overrides; resolving it returns
/// the base records unchanged.
pub const BASE_ENVIRONMENT: &str = "base";

/// A sparse override for one service.
///
/// Every field is optional; `None` means "inherit from the base record".
/// The service name itself is not patchable: overrides are keyed by
/// name in the owning [`Environment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ServicePatch {
    /// Replacement image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Replacement host port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_port: Option<String>,

    /// Replacement container port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_port: Option<String>,

    /// Replacement environment entries (whole list).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Vec<String>>,

    /// Replacement mount specs (whole list).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<String>>,

    /// Replacement health check (whole object).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,

    /// Replacement resource limits (whole object).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,

    /// Replacement deploy settings (whole object).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy: Option<DeployConfig>,

    /// Replacement restart policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart: Option<RestartPolicy>,

    /// Replacement dependency list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<String>>,

    /// Replacement network list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<String>>,

    /// Replacement labels (whole list).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<(String, String)>>,

    /// Replacement notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ServicePatch {
    /// Whether the patch overrides nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the patch to a copy of a base record.
    #[must_use]
    pub fn apply_to(&self, base: &ServiceRecord) -> ServiceRecord {
        let mut record = base.clone();

        if let Some(ref image) = self.image {
            record.image.clone_from(image);
        }
        if let Some(ref host_port) = self.host_port {
            record.host_port.clone_from(host_port);
        }
        if let Some(ref container_port) = self.container_port {
            record.container_port.clone_from(container_port);
        }
        if let Some(ref environment) = self.environment {
            record.environment.clone_from(environment);
        }
        if let Some(ref volumes) = self.volumes {
            record.volumes.clone_from(volumes);
        }
        if let Some(ref health_check) = self.health_check {
            record.health_check = health_check.clone();
        }
        if let Some(ref resources) = self.resources {
            record.resources = resources.clone();
        }
        if let Some(ref deploy) = self.deploy {
            record.deploy = deploy.clone();
        }
        if let Some(restart) = self.restart {
            record.restart = restart;
        }
        if let Some(ref depends_on) = self.depends_on {
            record.depends_on.clone_from(depends_on);
        }
        if let Some(ref networks) = self.networks {
            record.networks.clone_from(networks);
        }
        if let Some(ref labels) = self.labels {
            record.labels.clone_from(labels);
        }
        if let Some(ref notes) = self.notes {
            record.notes.clone_from(notes);
        }

        record
    }
}

/// A named deployment environment: a sparse override map over the base
/// collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Environment name, unique among the project's environments.
    pub name: String,

    /// Optional profile tag passed through to the encoder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Per-service patches, keyed by service name.
    #[serde(default)]
    pub overrides: HashMap<String, ServicePatch>,
}

impl Environment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile: None,
            overrides: HashMap::new(),
        }
    }

    /// Insert or replace a service's patch; an empty patch deletes the
    /// entry instead, keeping the override map minimal.
    pub fn update_override(&mut self, service: &str, patch: ServicePatch) {
        if patch.is_empty() {
            self.overrides.remove(service);
        } else {
            self.overrides.insert(service.to_string(), patch);
        }
    }
}

/// Compute an effective record list for an environment.
///
/// Records with an override get a shallow-merged copy; records without
/// one pass through unchanged. The [`BASE_ENVIRONMENT`] sentinel always
/// returns the base collection as-is.
#[must_use]
pub fn apply_overlay(base: &[ServiceRecord], overlay: &Environment) -> Vec<ServiceRecord> {
    if overlay.name == BASE_ENVIRONMENT {
        return base.to_vec();
    }

    base.iter()
        .map(|record| match overlay.overrides.get(&record.name) {
            Some(patch) => patch.apply_to(record),
            None => record.clone(),
        })
        .collect()
}

/// Compute the minimal patch turning `base` into `current`.
///
/// A field enters the patch only if it differs structurally; two equal
/// records produce an empty patch.
#[must_use]
pub fn compute_override(base: &ServiceRecord, current: &ServiceRecord) -> ServicePatch {
    fn differs<T: PartialEq + Clone>(base: &T, current: &T) -> Option<T> {
        (base != current).then(|| current.clone())
    }

    ServicePatch {
        image: differs(&base.image, &current.image),
        host_port: differs(&base.host_port, &current.host_port),
        container_port: differs(&base.container_port, &current.container_port),
        environment: differs(&base.environment, &current.environment),
        volumes: differs(&base.volumes, &current.volumes),
        health_check: differs(&base.health_check, &current.health_check),
        resources: differs(&base.resources, &current.resources),
        deploy: differs(&base.deploy, &current.deploy),
        restart: differs(&base.restart, &current.restart),
        depends_on: differs(&base.depends_on, &current.depends_on),
        networks: differs(&base.networks, &current.networks),
        labels: differs(&base.labels, &current.labels),
        notes: differs(&base.notes, &current.notes),
    }
}

/// A project: the base collection plus its environments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    /// The base service collection.
    #[serde(default)]
    pub base_services: Vec<ServiceRecord>,

    /// Named environments layered over the base collection.
    #[serde(default)]
    pub environments: Vec<Environment>,

    /// Environment selected when none is specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_environment: Option<String>,
}

impl ProjectConfig {
    /// Look up an environment by name.
    #[must_use]
    pub fn environment(&self, name: &str) -> Option<&Environment> {
        self.environments.iter().find(|env| env.name == name)
    }

    /// Resolve the effective record list for an environment name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the name is neither the base sentinel nor
    /// a defined environment.
    pub fn resolve(&self, name: &str) -> Result<Vec<ServiceRecord>> {
        if name == BASE_ENVIRONMENT {
            return Ok(self.base_services.clone());
        }

        let overlay = self.environment(name).ok_or_else(|| Error::NotFound {
            resource: format!("environment '{name}'"),
        })?;
        Ok(apply_overlay(&self.base_services, overlay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_record() -> ServiceRecord {
        let mut record = ServiceRecord::new("db", "postgres:13");
        record.host_port = "5432".to_string();
        record.container_port = "5432".to_string();
        record.environment = vec!["POSTGRES_DB=app".to_string()];
        record
    }

    #[test]
    fn test_empty_patch_is_empty() {
        assert!(ServicePatch::default().is_empty());
        let patch = ServicePatch {
            image: Some("postgres:16".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_apply_to_replaces_only_present_fields() {
        let base = base_record();
        let patch = ServicePatch {
            image: Some("postgres:16".to_string()),
            environment: Some(vec!["POSTGRES_DB=prod".to_string()]),
            ..Default::default()
        };

        let patched = patch.apply_to(&base);
        assert_eq!(patched.image, "postgres:16");
        assert_eq!(patched.environment, vec!["POSTGRES_DB=prod"]);
        // Untouched fields pass through.
        assert_eq!(patched.host_port, "5432");
        assert_eq!(patched.name, "db");
    }

    #[test]
    fn test_patch_replaces_nested_objects_whole() {
        let mut base = base_record();
        base.health_check.enabled = true;
        base.health_check.retries = 9;

        let patch = ServicePatch {
            health_check: Some(HealthCheck::default()),
            ..Default::default()
        };

        let patched = patch.apply_to(&base);
        // No field-level merge of the nested object: retries resets too.
        assert!(!patched.health_check.enabled);
        assert_eq!(patched.health_check.retries, 3);
    }

    #[test]
    fn test_compute_override_identical_records_is_empty() {
        let base = base_record();
        let patch = compute_override(&base, &base.clone());
        assert!(patch.is_empty());
    }

    #[test]
    fn test_compute_override_captures_differences_only() {
        let base = base_record();
        let mut current = base.clone();
        current.image = "postgres:16".to_string();
        current.deploy.replicas = 3;

        let patch = compute_override(&base, &current);
        assert_eq!(patch.image.as_deref(), Some("postgres:16"));
        assert_eq!(patch.deploy, Some(DeployConfig { replicas: 3 }));
        assert!(patch.host_port.is_none());
        assert!(patch.environment.is_none());
    }

    #[test]
    fn test_update_override_removes_empty_patches() {
        let mut env = Environment::new("staging");
        env.update_override("db", ServicePatch {
            image: Some("postgres:16".to_string()),
            ..Default::default()
        });
        assert_eq!(env.overrides.len(), 1);

        env.update_override("db", ServicePatch::default());
        assert!(env.overrides.is_empty());
    }

    #[test]
    fn test_apply_overlay() {
        let base = vec![base_record(), ServiceRecord::new("web", "nginx:alpine")];
        let mut env = Environment::new("prod");
        env.update_override("db", ServicePatch {
            image: Some("postgres:16".to_string()),
            ..Default::default()
        });

        let resolved = apply_overlay(&base, &env);
        assert_eq!(resolved[0].image, "postgres:16");
        assert_eq!(resolved[1], base[1]);
    }

    #[test]
    fn test_base_sentinel_passes_through() {
        let base = vec![base_record()];
        let mut env = Environment::new(BASE_ENVIRONMENT);
        // Even a stray override on the sentinel is ignored.
        env.overrides.insert(
            "db".to_string(),
            ServicePatch {
                image: Some("postgres:16".to_string()),
                ..Default::default()
            },
        );

        let resolved = apply_overlay(&base, &env);
        assert_eq!(resolved, base);
    }

    #[test]
    fn test_project_resolve() {
        let mut project = ProjectConfig {
            base_services: vec![base_record()],
            ..Default::default()
        };
        let mut env = Environment::new("prod");
        env.update_override("db", ServicePatch {
            restart: Some(RestartPolicy::Always),
            ..Default::default()
        });
        project.environments.push(env);

        let resolved = project.resolve("prod").unwrap();
        assert_eq!(resolved[0].restart, RestartPolicy::Always);

        let base = project.resolve(BASE_ENVIRONMENT).unwrap();
        assert_eq!(base[0].restart, RestartPolicy::No);

        assert!(project.resolve("missing").is_err());
    }

    #[test]
    fn test_environment_json_round_trip() {
        let mut env = Environment::new("staging");
        env.profile = Some("lowtraffic".to_string());
        env.update_override("db", ServicePatch {
            resources: Some(Resources {
                cpu_limit: 0.5,
                memory_limit: 512,
            }),
            ..Default::default()
        });

        let json = serde_json::to_string(&[env.clone()]).unwrap();
        let back: Vec<Environment> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![env]);
    }
}
