//! Repository reference resolution
//!
//! Before a job is exported or executed, every work unit that points into a
//! repository gets to resolve those pointers. A failing entry does not stop
//! the pass: all entries are visited once, failures are collected, and the
//! call fails afterwards with all of them.

use crate::error::{JobGraphError, ReferenceFailure, Result};
use crate::graph::JobGraph;
use crate::repository::Repository;

impl JobGraph {
    /// Resolve the repository references of every entry
    ///
    /// Entries are visited in entry order. Copies sharing a work unit are
    /// each visited. Returns `JobGraphError::LookupReferences` carrying
    /// every per-entry failure when at least one entry failed.
    pub fn lookup_repository_references(&self, repository: &dyn Repository) -> Result<()> {
        let mut failures = Vec::new();

        for (id, node) in self.entries() {
            if !node.entry.has_repository_references() {
                continue;
            }
            if let Err(cause) = node.entry.lookup_repository_references(repository) {
                log::warn!(
                    "Entry '{}' of job '{}' could not resolve its references in '{}': {}",
                    node.name,
                    self.name().unwrap_or_default(),
                    repository.name(),
                    cause
                );
                failures.push(ReferenceFailure {
                    entry: id,
                    entry_name: node.name.clone(),
                    cause,
                });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(JobGraphError::LookupReferences { failures })
        }
    }
}
