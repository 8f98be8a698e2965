//! Service record and collection validation.
//!
//! Validation never auto-corrects: hard failures come back as
//! [`Error::Validation`], while tolerated-but-suspect states (dangling
//! dependency references during in-progress edits) come back as
//! [`Warning`] values.

use crate::error::{Error, Result, Warning};
use crate::service::ServiceRecord;
use std::collections::HashSet;

/// Validates service records and collections.
///
/// # Examples
///
/// ```
/// use stackform::{CollectionValidator, ServiceRecord};
///
/// let records = vec![ServiceRecord::new("web", "nginx:alpine")];
/// let warnings = CollectionValidator::validate_collection(&records).unwrap();
/// assert!(warnings.is_empty());
/// ```
pub struct CollectionValidator;

impl CollectionValidator {
    /// Validate a whole collection.
    ///
    /// Hard failures: any individual record invalid, duplicate names,
    /// self-dependency. Dangling `depends_on` references are returned as
    /// warnings so that half-edited collections remain workable.
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the first hard failure.
    pub fn validate_collection(records: &[ServiceRecord]) -> Result<Vec<Warning>> {
        let mut seen = HashSet::new();
        for record in records {
            Self::validate_record(record)?;

            if !seen.insert(record.name.as_str()) {
                return Err(Error::validation(
                    "name",
                    format!("duplicate service name: {}", record.name),
                ));
            }
        }

        let names: HashSet<&str> = records.iter().map(|r| r.name.as_str()).collect();
        let mut warnings = Vec::new();
        for record in records {
            for dep in &record.depends_on {
                if !names.contains(dep.as_str()) {
                    warnings.push(Warning::DanglingDependency {
                        service: record.name.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        Ok(warnings)
    }

    /// Validate a single record.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name or image is missing or
    /// malformed, a populated port is out of range, a resource limit is
    /// negative, or the record depends on itself.
    pub fn validate_record(record: &ServiceRecord) -> Result<()> {
        Self::validate_name("name", &record.name)?;

        if record.image.trim().is_empty() {
            return Err(Error::validation(
                format!("{}.image", record.name),
                "image reference cannot be empty",
            ));
        }

        if !record.host_port.trim().is_empty() {
            Self::parse_port(&format!("{}.host_port", record.name), &record.host_port)?;
        }
        if !record.container_port.trim().is_empty() {
            Self::parse_port(
                &format!("{}.container_port", record.name),
                &record.container_port,
            )?;
        }

        if record.resources.cpu_limit < 0.0 {
            return Err(Error::validation(
                format!("{}.resources.cpu_limit", record.name),
                "cannot be negative",
            ));
        }

        if record.deploy.replicas == 0 {
            return Err(Error::validation(
                format!("{}.deploy.replicas", record.name),
                "must be at least 1",
            ));
        }

        if record.depends_on.iter().any(|dep| dep == &record.name) {
            return Err(Error::validation(
                format!("{}.depends_on", record.name),
                "a service cannot depend on itself",
            ));
        }

        Ok(())
    }

    /// Validate a service identifier.
    ///
    /// Identifiers must start with a letter and contain only letters,
    /// digits, underscores, and dashes.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending field.
    pub fn validate_name(field: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            return Err(Error::validation(field, "cannot be empty"));
        }

        let mut chars = value.chars();
        let first = chars.next().expect("identifier is non-empty");
        if !first.is_ascii_alphabetic() {
            return Err(Error::validation(field, "must start with a letter"));
        }

        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(Error::validation(
                field,
                "may contain only letters, digits, underscores, and dashes",
            ));
        }

        Ok(())
    }

    /// Resolve a decimal port string to an integer in [1, 65535].
    ///
    /// # Errors
    ///
    /// Returns a validation error if the string is not a port number.
    #[allow(clippy::cast_possible_truncation)]
    pub fn parse_port(field: &str, value: &str) -> Result<u16> {
        let port: u32 = value
            .trim()
            .parse()
            .map_err(|_| Error::validation(field, format!("not a port number: {value}")))?;

        if port == 0 || port > 65535 {
            return Err(Error::validation(
                field,
                format!("port {port} is out of range [1, 65535]"),
            ));
        }

        Ok(port as u16)
    }
}
