//! The editing session.
//!
//! The service collection is the single source of truth. The "current
//! record" bound to a form is only a transient projection: [`EditorSession::load`]
//! copies a record out, edits happen on the draft, and nothing reaches
//! the collection until an explicit [`EditorSession::flush`]. There is no
//! implicit synchronization in either direction.
//!
//! The dependency graph is recomputed on every structural change, with
//! node positions carried over by identity so a user-arranged diagram
//! stays put.

use crate::error::{Error, Result, Warning};
use crate::graph::ComposeGraph;
use crate::service::ServiceRecord;
use crate::validate::CollectionValidator;

/// A transient working copy of one record.
#[derive(Debug, Clone)]
struct Draft {
    index: usize,
    record: ServiceRecord,
}

/// An editing session owning a service collection and its derived graph.
///
/// # Examples
///
/// ```
/// use stackform::{EditorSession, ServiceRecord};
///
/// let mut session = EditorSession::new();
/// session.add_record(ServiceRecord::new("web", "nginx:alpine"));
///
/// session.load(0).unwrap();
/// session.draft_mut().unwrap().image = "nginx:1.27".to_string();
/// assert_eq!(session.records()[0].image, "nginx:alpine"); // not yet flushed
///
/// session.flush().unwrap();
/// assert_eq!(session.records()[0].image, "nginx:1.27");
/// ```
#[derive(Debug)]
pub struct EditorSession {
    records: Vec<ServiceRecord>,
    graph: ComposeGraph,
    draft: Option<Draft>,
}

impl EditorSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::from_records(Vec::new())
    }

    /// Creates a session owning the given collection.
    #[must_use]
    pub fn from_records(records: Vec<ServiceRecord>) -> Self {
        let graph = ComposeGraph::build(&records);
        Self {
            records,
            graph,
            draft: None,
        }
    }

    /// The owned collection.
    #[must_use]
    pub fn records(&self) -> &[ServiceRecord] {
        &self.records
    }

    /// Consume the session, yielding the collection.
    #[must_use]
    pub fn into_records(self) -> Vec<ServiceRecord> {
        self.records
    }

    /// The current dependency graph.
    #[must_use]
    pub fn graph(&self) -> &ComposeGraph {
        &self.graph
    }

    /// Append a record and return its index.
    ///
    /// The record is not validated here; half-filled records are a
    /// normal editing state. Validation happens at generation time.
    pub fn add_record(&mut self, record: ServiceRecord) -> usize {
        self.records.push(record);
        self.rebuild_graph();
        self.records.len() - 1
    }

    /// Remove the record at `index`, discarding any draft loaded from it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the index is out of bounds.
    pub fn remove_record(&mut self, index: usize) -> Result<ServiceRecord> {
        if index >= self.records.len() {
            return Err(Error::NotFound {
                resource: format!("service at index {index}"),
            });
        }

        let removed = self.records.remove(index);
        self.draft = match self.draft.take() {
            Some(draft) if draft.index == index => None,
            Some(mut draft) => {
                if draft.index > index {
                    draft.index -= 1;
                }
                Some(draft)
            }
            None => None,
        };
        self.rebuild_graph();
        Ok(removed)
    }

    /// Load a record into the draft projection, replacing any previous
    /// draft without flushing it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the index is out of bounds.
    pub fn load(&mut self, index: usize) -> Result<()> {
        let record = self
            .records
            .get(index)
            .ok_or_else(|| Error::NotFound {
                resource: format!("service at index {index}"),
            })?
            .clone();
        self.draft = Some(Draft { index, record });
        Ok(())
    }

    /// The draft record, if one is loaded.
    #[must_use]
    pub fn draft(&self) -> Option<&ServiceRecord> {
        self.draft.as_ref().map(|draft| &draft.record)
    }

    /// Mutable access to the draft record.
    pub fn draft_mut(&mut self) -> Option<&mut ServiceRecord> {
        self.draft.as_mut().map(|draft| &mut draft.record)
    }

    /// Write the draft back into the collection.
    ///
    /// The draft stays loaded afterwards, so repeated edit/flush cycles
    /// work without reloading.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no draft is loaded.
    pub fn flush(&mut self) -> Result<()> {
        let draft = self.draft.as_ref().ok_or_else(|| Error::NotFound {
            resource: "loaded draft".to_string(),
        })?;
        self.records[draft.index] = draft.record.clone();
        self.rebuild_graph();
        Ok(())
    }

    /// Validate the collection, returning soft warnings plus any
    /// dependency cycles.
    ///
    /// # Errors
    ///
    /// Returns the first hard validation failure.
    pub fn validate(&self) -> Result<Vec<Warning>> {
        let mut warnings = CollectionValidator::validate_collection(&self.records)?;
        warnings.extend(self.graph.cycles());
        Ok(warnings)
    }

    fn rebuild_graph(&mut self) {
        self.graph = ComposeGraph::rebuild(&self.records, &self.graph);
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_is_isolated_until_flush() {
        let mut session =
            EditorSession::from_records(vec![ServiceRecord::new("web", "nginx:alpine")]);

        session.load(0).unwrap();
        session.draft_mut().unwrap().image = "nginx:1.27".to_string();
        assert_eq!(session.records()[0].image, "nginx:alpine");

        session.flush().unwrap();
        assert_eq!(session.records()[0].image, "nginx:1.27");
    }

    #[test]
    fn test_load_replaces_unflushed_draft() {
        let mut session = EditorSession::from_records(vec![
            ServiceRecord::new("web", "nginx:alpine"),
            ServiceRecord::new("db", "postgres:13"),
        ]);

        session.load(0).unwrap();
        session.draft_mut().unwrap().image = "edited".to_string();
        // Navigating away without flushing discards the edit.
        session.load(1).unwrap();
        session.flush().unwrap();

        assert_eq!(session.records()[0].image, "nginx:alpine");
    }

    #[test]
    fn test_flush_without_draft_fails() {
        let mut session = EditorSession::new();
        assert!(session.flush().is_err());
    }

    #[test]
    fn test_add_and_remove_rebuild_graph() {
        let mut session = EditorSession::new();
        session.add_record(ServiceRecord::new("web", "nginx:alpine"));
        assert_eq!(session.graph().nodes().len(), 1);

        session.add_record(ServiceRecord::new("db", "postgres:13"));
        assert_eq!(session.graph().nodes().len(), 2);

        let removed = session.remove_record(0).unwrap();
        assert_eq!(removed.name, "web");
        assert_eq!(session.graph().nodes().len(), 1);
        assert_eq!(session.graph().nodes()[0].id, "db");
    }

    #[test]
    fn test_remove_adjusts_draft_index() {
        let mut session = EditorSession::from_records(vec![
            ServiceRecord::new("web", "nginx:alpine"),
            ServiceRecord::new("db", "postgres:13"),
        ]);

        session.load(1).unwrap();
        session.remove_record(0).unwrap();
        session.draft_mut().unwrap().image = "postgres:16".to_string();
        session.flush().unwrap();

        assert_eq!(session.records()[0].name, "db");
        assert_eq!(session.records()[0].image, "postgres:16");
    }

    #[test]
    fn test_remove_discards_matching_draft() {
        let mut session =
            EditorSession::from_records(vec![ServiceRecord::new("web", "nginx:alpine")]);
        session.load(0).unwrap();
        session.remove_record(0).unwrap();
        assert!(session.draft().is_none());
    }

    #[test]
    fn test_validate_surfaces_cycles() {
        let mut web = ServiceRecord::new("web", "nginx:alpine");
        web.depends_on = vec!["db".to_string()];
        let mut db = ServiceRecord::new("db", "postgres:13");
        db.depends_on = vec!["web".to_string()];

        let session = EditorSession::from_records(vec![web, db]);
        let warnings = session.validate().unwrap();
        assert!(warnings
            .iter()
            .any(|warning| matches!(warning, Warning::Cycle { .. })));
    }
}
