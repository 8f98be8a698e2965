//! Saved service-collection templates.
//!
//! A template is a named, reusable service collection with descriptive
//! metadata. Templates are persisted through the injected key-value
//! capability as a single JSON document, capped at a fixed count with
//! the stalest entry evicted first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::service::ServiceRecord;
use crate::store::KeyValueStore;

/// Store key under which the template list is persisted.
pub const TEMPLATES_KEY: &str = "templates";

/// Maximum number of templates retained; saving past the cap evicts the
/// least recently updated template.
pub const MAX_TEMPLATES: usize = 50;

/// A saved service collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Store-assigned identifier; `None` until first saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name.
    pub name: String,

    /// Free-text description.
    #[serde(default)]
    pub description: String,

    /// Search tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// The saved records.
    pub services: Vec<ServiceRecord>,

    /// When the template was first saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the template was last saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Optional author attribution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// How many times the template has been applied.
    #[serde(default)]
    pub usage_count: u32,
}

impl Template {
    /// Creates an unsaved template around a service collection.
    #[must_use]
    pub fn new(name: impl Into<String>, services: Vec<ServiceRecord>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            tags: Vec::new(),
            services,
            created_at: None,
            updated_at: None,
            author: None,
            usage_count: 0,
        }
    }

    fn freshness(&self) -> DateTime<Utc> {
        self.updated_at
            .or(self.created_at)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Template listing entry, without the full service payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    /// Store identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Search tags.
    pub tags: Vec<String>,
    /// Number of services in the template.
    pub service_count: usize,
    /// When the template was first saved.
    pub created_at: Option<DateTime<Utc>>,
    /// When the template was last saved.
    pub updated_at: Option<DateTime<Utc>>,
    /// Optional author attribution.
    pub author: Option<String>,
    /// How many times the template has been applied.
    pub usage_count: u32,
}

/// Template persistence over a key-value capability.
///
/// # Examples
///
/// ```
/// use stackform::store::MemoryStore;
/// use stackform::template::{Template, TemplateStore};
/// use stackform::ServiceRecord;
///
/// let mut store = TemplateStore::new(MemoryStore::new());
/// let template = Template::new("lamp", vec![ServiceRecord::new("web", "httpd")]);
/// let id = store.save(template).unwrap();
/// assert!(store.get(&id).unwrap().is_some());
/// ```
#[derive(Debug)]
pub struct TemplateStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TemplateStore<S> {
    /// Wraps a key-value capability.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Save a template, assigning an id when it has none, and return the
    /// id. An existing id updates in place; a new template past the cap
    /// evicts the least recently updated one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn save(&mut self, mut template: Template) -> Result<String> {
        let mut templates = self.load_all()?;
        let now = Utc::now();

        let id = match template.id.clone() {
            Some(id) => id,
            None => {
                let id = format!("local-{}-{}", now.timestamp_millis(), templates.len());
                template.id = Some(id.clone());
                id
            }
        };

        template.updated_at = Some(now);

        match templates
            .iter()
            .position(|existing| existing.id.as_deref() == Some(id.as_str()))
        {
            Some(slot) => {
                template.created_at = templates[slot].created_at.or(Some(now));
                templates[slot] = template;
            }
            None => {
                if templates.len() >= MAX_TEMPLATES {
                    if let Some((stalest, _)) = templates
                        .iter()
                        .enumerate()
                        .min_by_key(|(_, t)| t.freshness())
                    {
                        templates.remove(stalest);
                    }
                }
                template.created_at = Some(now);
                templates.push(template);
            }
        }

        self.save_all(&templates)?;
        Ok(id)
    }

    /// Listing metadata, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn metadata(&self) -> Result<Vec<TemplateMetadata>> {
        let mut templates = self.load_all()?;
        templates.sort_by_key(|t| std::cmp::Reverse(t.freshness()));

        Ok(templates
            .into_iter()
            .map(|t| TemplateMetadata {
                id: t.id.unwrap_or_default(),
                name: t.name,
                description: t.description,
                tags: t.tags,
                service_count: t.services.len(),
                created_at: t.created_at,
                updated_at: t.updated_at,
                author: t.author,
                usage_count: t.usage_count,
            })
            .collect())
    }

    /// Fetch a template by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn get(&self, id: &str) -> Result<Option<Template>> {
        Ok(self
            .load_all()?
            .into_iter()
            .find(|t| t.id.as_deref() == Some(id)))
    }

    /// Delete a template by id; returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let mut templates = self.load_all()?;
        let before = templates.len();
        templates.retain(|t| t.id.as_deref() != Some(id));

        if templates.len() == before {
            return Ok(false);
        }
        self.save_all(&templates)?;
        Ok(true)
    }

    /// Bump a template's usage counter. Missing ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn record_usage(&mut self, id: &str) -> Result<()> {
        let mut templates = self.load_all()?;
        if let Some(template) = templates
            .iter_mut()
            .find(|t| t.id.as_deref() == Some(id))
        {
            template.usage_count += 1;
            self.save_all(&templates)?;
        }
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<Template>> {
        match self.store.get(TEMPLATES_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_all(&mut self, templates: &[Template]) -> Result<()> {
        let json = serde_json::to_string_pretty(templates)?;
        self.store.put(TEMPLATES_KEY, &json)
    }
}
