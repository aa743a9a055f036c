//! The job graph store
//!
//! `JobGraph` owns the entries, hops and notes of one job design together
//! with its identity metadata (name, repository directory, revision,
//! filename) and its change tracker.
//!
//! Entries live in an arena keyed by `EntryId`. The entry order used for
//! display and `entry_at` is kept separately, so removing an entry never
//! changes the handle of another one.

use std::collections::HashMap;
use std::sync::Arc;

use crate::changes::ChangeTracker;
use crate::constants::{BORDER_INDENT, ICON_SIZE, MAXIMUM_MARGIN};
use crate::error::{JobGraphError, Result};
use crate::events::ContentListener;
use crate::repository::{ObjectRevision, RepositoryDirectory};
use crate::types::{EntryId, Hop, JobEntryNode, Note, Point};

/// A job design: entry nodes connected by hops, plus annotations
#[derive(Debug, Default)]
pub struct JobGraph {
    name: Option<String>,
    filename: Option<String>,
    directory: Option<RepositoryDirectory>,
    revision: Option<ObjectRevision>,
    description: Option<String>,

    entries: HashMap<EntryId, JobEntryNode>,
    order: Vec<EntryId>,
    next_id: u64,
    hops: Vec<Hop>,
    notes: Vec<Note>,

    changes: ChangeTracker,
}

impl JobGraph {
    /// Create a new empty, clean job graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty job graph with a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    // =========================================================================
    // Identity metadata
    // =========================================================================

    /// Job name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set or clear the job name
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// File the job was loaded from or saved to
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Set or clear the job's filename
    pub fn set_filename(&mut self, filename: Option<String>) {
        self.filename = filename;
    }

    /// Repository directory holding the job
    pub fn repository_directory(&self) -> Option<&RepositoryDirectory> {
        self.directory.as_ref()
    }

    /// Set or clear the repository directory
    pub fn set_repository_directory(&mut self, directory: Option<RepositoryDirectory>) {
        self.directory = directory;
    }

    /// Repository revision the job was loaded at
    pub fn object_revision(&self) -> Option<&ObjectRevision> {
        self.revision.as_ref()
    }

    /// Set or clear the repository revision
    pub fn set_object_revision(&mut self, revision: Option<ObjectRevision>) {
        self.revision = revision;
    }

    /// Free-text description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Set or clear the description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    // =========================================================================
    // Change tracking
    // =========================================================================

    /// Whether the design has unsaved changes
    pub fn has_changed(&self) -> bool {
        self.changes.has_changed()
    }

    /// Set the dirty flag and notify every content listener
    pub fn set_changed(&mut self, changed: bool) {
        let source = self.name.as_deref().unwrap_or_default();
        self.changes.set_changed(changed, source);
    }

    /// Mark the design dirty
    pub fn mark_changed(&mut self) {
        self.set_changed(true);
    }

    /// Mark the design clean (e.g. after saving)
    pub fn clear_changed(&mut self) {
        self.set_changed(false);
    }

    pub fn add_content_listener(&mut self, listener: Arc<dyn ContentListener>) {
        self.changes.add_listener(listener);
    }

    /// Returns `false` when the listener was not registered
    pub fn remove_content_listener(&mut self, listener: &Arc<dyn ContentListener>) -> bool {
        self.changes.remove_listener(listener)
    }

    // =========================================================================
    // Entries
    // =========================================================================

    /// Insert an entry at `index` in the entry order
    ///
    /// An index past the end appends. Returns the handle assigned to the node.
    pub fn add_entry(&mut self, index: usize, node: JobEntryNode) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;

        let index = index.min(self.order.len());
        log::debug!("Adding job entry '{}' as {} at index {}", node.name, id, index);
        self.order.insert(index, id);
        self.entries.insert(id, node);
        self.mark_changed();
        id
    }

    /// Append an entry to the entry order
    pub fn push_entry(&mut self, node: JobEntryNode) -> EntryId {
        self.add_entry(self.order.len(), node)
    }

    /// Remove an entry together with every hop touching it
    pub fn remove_entry(&mut self, id: EntryId) -> Result<JobEntryNode> {
        let node = self
            .entries
            .remove(&id)
            .ok_or(JobGraphError::UnknownEntry(id))?;
        self.order.retain(|e| *e != id);

        let before = self.hops.len();
        self.hops.retain(|h| h.from != id && h.to != id);
        log::debug!(
            "Removed job entry '{}' ({}) and {} attached hop(s)",
            node.name,
            id,
            before - self.hops.len()
        );
        self.mark_changed();
        Ok(node)
    }

    pub fn entry(&self, id: EntryId) -> Option<&JobEntryNode> {
        self.entries.get(&id)
    }

    pub fn contains_entry(&self, id: EntryId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Handle of the entry at `index` in the entry order
    pub fn entry_at(&self, index: usize) -> Option<EntryId> {
        self.order.get(index).copied()
    }

    /// Position of an entry in the entry order
    pub fn index_of_entry(&self, id: EntryId) -> Option<usize> {
        self.order.iter().position(|e| *e == id)
    }

    /// Entries in entry order
    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &JobEntryNode)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.entries.get(id).map(|node| (*id, node)))
    }

    pub fn nr_entries(&self) -> usize {
        self.order.len()
    }

    /// Find an entry by name and copy number
    pub fn find_entry(&self, name: &str, copy_nr: u32) -> Option<EntryId> {
        self.entries()
            .find(|(_, node)| node.name == name && node.copy_nr == copy_nr)
            .map(|(id, _)| id)
    }

    /// Find the first entry with the given name, whatever its copy number
    pub fn find_entry_by_name(&self, name: &str) -> Option<EntryId> {
        self.entries()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    /// The first START entry in entry order
    pub fn find_start(&self) -> Option<EntryId> {
        self.entries()
            .find(|(_, node)| node.is_start())
            .map(|(id, _)| id)
    }

    /// Move an entry on the canvas
    pub fn set_entry_location(&mut self, id: EntryId, location: impl Into<Point>) -> Result<()> {
        let node = self
            .entries
            .get_mut(&id)
            .ok_or(JobGraphError::UnknownEntry(id))?;
        node.location = location.into();
        self.mark_changed();
        Ok(())
    }

    /// Rename an entry
    pub fn rename_entry(&mut self, id: EntryId, name: impl Into<String>) -> Result<()> {
        let node = self
            .entries
            .get_mut(&id)
            .ok_or(JobGraphError::UnknownEntry(id))?;
        node.name = name.into();
        self.mark_changed();
        Ok(())
    }

    // =========================================================================
    // Hops
    // =========================================================================

    /// Append a hop
    ///
    /// Both endpoints must be entries of this graph. No loop check is done
    /// here; use `add_hop_checked` or `would_create_cycle` for that.
    pub fn add_hop(&mut self, hop: Hop) -> Result<usize> {
        for endpoint in [hop.from, hop.to] {
            if !self.entries.contains_key(&endpoint) {
                return Err(JobGraphError::UnknownEntry(endpoint));
            }
        }
        log::debug!("Adding hop {} -> {}", hop.from, hop.to);
        self.hops.push(hop);
        self.mark_changed();
        Ok(self.hops.len() - 1)
    }

    /// Append a hop unless it would close a loop
    pub fn add_hop_checked(&mut self, hop: Hop) -> Result<usize> {
        if self.would_create_cycle(hop.from, hop.to) {
            return Err(JobGraphError::HopCreatesCycle {
                from: hop.from,
                to: hop.to,
            });
        }
        self.add_hop(hop)
    }

    pub fn remove_hop(&mut self, index: usize) -> Result<Hop> {
        if index >= self.hops.len() {
            return Err(JobGraphError::HopIndexOutOfRange {
                index,
                len: self.hops.len(),
            });
        }
        let hop = self.hops.remove(index);
        self.mark_changed();
        Ok(hop)
    }

    pub fn set_hop_enabled(&mut self, index: usize, enabled: bool) -> Result<()> {
        let len = self.hops.len();
        let hop = self
            .hops
            .get_mut(index)
            .ok_or(JobGraphError::HopIndexOutOfRange { index, len })?;
        hop.enabled = enabled;
        self.mark_changed();
        Ok(())
    }

    pub fn hop(&self, index: usize) -> Option<&Hop> {
        self.hops.get(index)
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    pub fn nr_hops(&self) -> usize {
        self.hops.len()
    }

    /// Index of the first hop from `from` to `to`
    pub fn find_hop(&self, from: EntryId, to: EntryId) -> Option<usize> {
        self.hops.iter().position(|h| h.from == from && h.to == to)
    }

    /// Get hops going out of an entry
    pub fn outgoing_hops(&self, id: EntryId) -> impl Iterator<Item = &Hop> + '_ {
        self.hops.iter().filter(move |h| h.from == id)
    }

    /// Get hops coming into an entry
    pub fn incoming_hops(&self, id: EntryId) -> impl Iterator<Item = &Hop> + '_ {
        self.hops.iter().filter(move |h| h.to == id)
    }

    /// Entries directly reachable from `id`
    pub fn find_next_entries(&self, id: EntryId, include_disabled: bool) -> Vec<EntryId> {
        self.outgoing_hops(id)
            .filter(|h| include_disabled || h.enabled)
            .map(|h| h.to)
            .collect()
    }

    /// Entries with a hop into `id`
    pub fn find_previous_entries(&self, id: EntryId, include_disabled: bool) -> Vec<EntryId> {
        self.incoming_hops(id)
            .filter(|h| include_disabled || h.enabled)
            .map(|h| h.from)
            .collect()
    }

    // =========================================================================
    // Notes
    // =========================================================================

    pub fn add_note(&mut self, note: Note) -> usize {
        self.notes.push(note);
        self.mark_changed();
        self.notes.len() - 1
    }

    pub fn remove_note(&mut self, index: usize) -> Result<Note> {
        if index >= self.notes.len() {
            return Err(JobGraphError::NoteIndexOutOfRange {
                index,
                len: self.notes.len(),
            });
        }
        let note = self.notes.remove(index);
        self.mark_changed();
        Ok(note)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn nr_notes(&self) -> usize {
        self.notes.len()
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Top-left corner of the design, inset by `BORDER_INDENT`
    ///
    /// Entries and notes both count. An empty design yields the origin; an
    /// axis whose minimum does not exceed the inset is clamped to 0.
    pub fn get_minimum(&self) -> Point {
        let locations = self
            .entries
            .values()
            .map(|node| node.location)
            .chain(self.notes.iter().map(|note| note.location));

        let mut min: Option<Point> = None;
        for location in locations {
            min = Some(match min {
                None => location,
                Some(m) => Point::new(m.x.min(location.x), m.y.min(location.y)),
            });
        }

        match min {
            None => Point::origin(),
            Some(m) => Point::new(inset(m.x), inset(m.y)),
        }
    }

    /// Bottom-right corner of the design plus `MAXIMUM_MARGIN`
    ///
    /// Saturates at `i32::MAX` for designs placed at the edge of the canvas.
    pub fn get_maximum(&self) -> Point {
        let mut max = Point::origin();
        for node in self.entries.values() {
            max.x = max.x.max(node.location.x.saturating_add(ICON_SIZE));
            max.y = max.y.max(node.location.y.saturating_add(ICON_SIZE));
        }
        for note in &self.notes {
            max.x = max.x.max(note.location.x.saturating_add(note.width));
            max.y = max.y.max(note.location.y.saturating_add(note.height));
        }
        Point::new(
            max.x.saturating_add(MAXIMUM_MARGIN),
            max.y.saturating_add(MAXIMUM_MARGIN),
        )
    }

    // =========================================================================
    // Whole-graph operations
    // =========================================================================

    /// Drop all content and metadata; listeners stay registered
    ///
    /// The graph ends up clean.
    pub fn clear(&mut self) {
        self.name = None;
        self.filename = None;
        self.directory = None;
        self.revision = None;
        self.description = None;
        self.entries.clear();
        self.order.clear();
        self.hops.clear();
        self.notes.clear();
        self.clear_changed();
    }

    pub(crate) fn replace_layout(
        &mut self,
        locations: impl IntoIterator<Item = (EntryId, Point)>,
        hops: Vec<Hop>,
        notes: Vec<Note>,
    ) {
        for (id, location) in locations {
            if let Some(node) = self.entries.get_mut(&id) {
                node.location = location;
            }
        }
        self.hops = hops
            .into_iter()
            .filter(|h| self.entries.contains_key(&h.from) && self.entries.contains_key(&h.to))
            .collect();
        self.notes = notes;
        self.mark_changed();
    }
}

fn inset(value: i32) -> i32 {
    if value > BORDER_INDENT {
        value - BORDER_INDENT
    } else {
        0
    }
}

/// Job identity
///
/// When either side has a filename, the jobs are equal exactly when both
/// filenames are present and identical. Otherwise name, directory path,
/// revision name and filename must all match, absent matching absent.
impl PartialEq for JobGraph {
    fn eq(&self, other: &Self) -> bool {
        if self.filename.is_some() || other.filename.is_some() {
            return self.filename == other.filename;
        }
        self.name == other.name
            && self.directory.as_ref().map(|d| d.path.as_str())
                == other.directory.as_ref().map(|d| d.path.as_str())
            && self.revision.as_ref().map(|r| r.name.as_str())
                == other.revision.as_ref().map(|r| r.name.as_str())
    }
}

impl Eq for JobGraph {}
