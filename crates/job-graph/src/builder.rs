//! Fluent builder for job graphs
//!
//! Hops are declared by entry name, so a whole job can be written down
//! before any handle exists.

use std::sync::Arc;

use crate::entry::{JobEntry, SpecialEntry};
use crate::error::{JobGraphError, Result};
use crate::graph::JobGraph;
use crate::repository::{ObjectRevision, RepositoryDirectory};
use crate::types::{EntryId, Hop, JobEntryNode, Note, Point};

struct PendingHop {
    from: String,
    to: String,
    configure: fn(Hop) -> Hop,
}

/// Fluent builder for constructing job graphs
///
/// # Example
///
/// ```ignore
/// let graph = JobBuilder::new("nightly")
///     .add_start((0, 0))
///     .add_dummy("wait", (100, 0))
///     .add_hop("START", "wait")
///     .build()?;
/// ```
pub struct JobBuilder {
    graph: JobGraph,
    hops: Vec<PendingHop>,
}

impl JobBuilder {
    /// Create a new job builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            graph: JobGraph::named(name),
            hops: Vec::new(),
        }
    }

    /// Set the filename the job was loaded from
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.graph.set_filename(Some(filename.into()));
        self
    }

    /// Set the repository directory
    pub fn in_directory(mut self, path: impl Into<String>) -> Self {
        self.graph
            .set_repository_directory(Some(RepositoryDirectory::new(path)));
        self
    }

    /// Set the revision name
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.graph
            .set_object_revision(Some(ObjectRevision::new(revision)));
        self
    }

    /// Add an entry backed by any work unit
    pub fn add_entry(mut self, entry: Arc<dyn JobEntry>, location: impl Into<Point>) -> Self {
        self.graph.push_entry(JobEntryNode::new(entry).at(location));
        self
    }

    /// Add the START entry
    pub fn add_start(self, location: impl Into<Point>) -> Self {
        self.add_entry(Arc::new(SpecialEntry::start()), location)
    }

    /// Add a named dummy entry
    pub fn add_dummy(self, name: impl Into<String>, location: impl Into<Point>) -> Self {
        self.add_entry(Arc::new(SpecialEntry::named(name)), location)
    }

    /// Add a hop between two entries, by name
    pub fn add_hop(self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.add_hop_with(from, to, |hop| hop)
    }

    /// Add a disabled hop between two entries
    pub fn add_disabled_hop(self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.add_hop_with(from, to, |hop| hop.with_enabled(false))
    }

    /// Add a hop followed on failure of the source entry
    pub fn add_failure_hop(self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.add_hop_with(from, to, Hop::on_failure)
    }

    fn add_hop_with(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        configure: fn(Hop) -> Hop,
    ) -> Self {
        self.hops.push(PendingHop {
            from: from.into(),
            to: to.into(),
            configure,
        });
        self
    }

    /// Add a note
    pub fn add_note(mut self, text: impl Into<String>, location: impl Into<Point>) -> Self {
        self.graph.add_note(Note::new(text, location));
        self
    }

    /// Resolve hop names and return the finished graph, marked clean
    pub fn build(mut self) -> Result<JobGraph> {
        for pending in std::mem::take(&mut self.hops) {
            let from = self.lookup(&pending.from)?;
            let to = self.lookup(&pending.to)?;
            self.graph.add_hop((pending.configure)(Hop::new(from, to)))?;
        }
        self.graph.clear_changed();
        Ok(self.graph)
    }

    fn lookup(&self, name: &str) -> Result<EntryId> {
        self.graph
            .find_entry_by_name(name)
            .ok_or_else(|| JobGraphError::UnknownEntryName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_resolves_hops() {
        let graph = JobBuilder::new("nightly")
            .in_directory("/jobs")
            .with_revision("1.0")
            .add_start((0, 0))
            .add_dummy("a", (100, 0))
            .add_dummy("b", (200, 0))
            .add_hop("START", "a")
            .add_failure_hop("a", "b")
            .add_disabled_hop("START", "b")
            .add_note("hello", (50, 50))
            .build()
            .unwrap();

        assert_eq!(graph.nr_entries(), 3);
        assert_eq!(graph.nr_hops(), 3);
        assert_eq!(graph.nr_notes(), 1);
        assert!(!graph.has_changed());
        assert!(!graph.hop(2).unwrap().enabled);
        assert_eq!(graph.repository_directory().unwrap().path, "/jobs");

        let a = graph.find_entry_by_name("a").unwrap();
        let b = graph.find_entry_by_name("b").unwrap();
        assert_eq!(graph.entry(a).unwrap().location, Point::new(100, 0));
        assert!(graph.is_path_exist(a, b));
    }

    #[test]
    fn test_unknown_hop_endpoint() {
        let result = JobBuilder::new("broken")
            .add_start((0, 0))
            .add_hop("START", "missing")
            .build();

        assert!(matches!(result, Err(JobGraphError::UnknownEntryName(name)) if name == "missing"));
    }
}
