//! Layout undo/redo for job designs
//!
//! Snapshots capture the layout of a job (entry positions, hops and notes),
//! not the work units themselves, which are shared and may hold resolved
//! repository state. Restoring a snapshot therefore never resurrects a
//! removed entry; hops pointing at one are dropped on restore.
//!
//! Snapshots are stored as zstd-compressed JSON. Undo and redo apply the
//! snapshot to the graph directly.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_UNDO;
use crate::error::{JobGraphError, Result};
use crate::graph::JobGraph;
use crate::types::{EntryId, Hop, Note, Point};

/// Serializable layout of a job graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobLayout {
    /// Entry positions in entry order
    pub locations: Vec<(EntryId, Point)>,
    pub hops: Vec<Hop>,
    pub notes: Vec<Note>,
}

impl JobGraph {
    /// Capture the current layout
    pub fn layout(&self) -> JobLayout {
        JobLayout {
            locations: self
                .entries()
                .map(|(id, node)| (id, node.location))
                .collect(),
            hops: self.hops().to_vec(),
            notes: self.notes().to_vec(),
        }
    }

    /// Put a previously captured layout back
    pub fn restore_layout(&mut self, layout: JobLayout) {
        self.replace_layout(layout.locations, layout.hops, layout.notes);
    }
}

/// A compressed `JobLayout`
#[derive(PartialEq, Eq)]
struct LayoutSnapshot(Vec<u8>);

impl LayoutSnapshot {
    fn capture(graph: &JobGraph) -> Result<Self> {
        let json = serde_json::to_vec(&graph.layout())?;
        zstd::encode_all(&json[..], 3)
            .map(Self)
            .map_err(|e| JobGraphError::Compression(e.to_string()))
    }

    fn apply(&self, graph: &mut JobGraph) -> Result<()> {
        let json =
            zstd::decode_all(&self.0[..]).map_err(|e| JobGraphError::Compression(e.to_string()))?;
        graph.restore_layout(serde_json::from_slice(&json)?);
        Ok(())
    }
}

/// Undo/redo history of a job graph's layout
///
/// Call `record` after every edit worth undoing. The most recent recording
/// is the layout `undo` steps back from.
///
/// ```ignore
/// let mut history = UndoStack::default();
/// history.record(&graph)?;
/// graph.set_entry_location(id, (200, 40))?;
/// history.record(&graph)?;
///
/// history.undo(&mut graph)?; // entry back where it was
/// ```
pub struct UndoStack {
    /// Older layouts, oldest first
    past: VecDeque<LayoutSnapshot>,
    /// Layout of the last record, undo or redo
    present: Option<LayoutSnapshot>,
    /// Undone layouts, next redo last
    future: Vec<LayoutSnapshot>,
    /// Maximum number of undo steps kept
    max_depth: usize,
}

impl UndoStack {
    /// Create a history keeping at most `max_depth` undo steps
    pub fn new(max_depth: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present: None,
            future: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record the graph's current layout
    ///
    /// Drops the redo history. Returns `Ok(false)` without touching the
    /// history when the layout equals the last recorded one.
    pub fn record(&mut self, graph: &JobGraph) -> Result<bool> {
        let snapshot = LayoutSnapshot::capture(graph)?;
        if self.present.as_ref() == Some(&snapshot) {
            return Ok(false);
        }

        self.future.clear();
        if let Some(previous) = self.present.replace(snapshot) {
            self.past.push_back(previous);
            if self.past.len() > self.max_depth {
                self.past.pop_front();
            }
        }
        Ok(true)
    }

    /// Restore the layout recorded before the current one
    ///
    /// Returns `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self, graph: &mut JobGraph) -> Result<bool> {
        let Some(previous) = self.past.pop_back() else {
            return Ok(false);
        };
        if let Err(e) = previous.apply(graph) {
            self.past.push_back(previous);
            return Err(e);
        }
        if let Some(current) = self.present.replace(previous) {
            self.future.push(current);
        }
        log::debug!("Undid layout change ({} more undo steps)", self.past.len());
        Ok(true)
    }

    /// Re-apply the layout most recently undone
    ///
    /// Returns `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self, graph: &mut JobGraph) -> Result<bool> {
        let Some(next) = self.future.pop() else {
            return Ok(false);
        };
        if let Err(e) = next.apply(graph) {
            self.future.push(next);
            return Err(e);
        }
        if let Some(current) = self.present.replace(next) {
            self.past.push_back(current);
        }
        log::debug!("Redid layout change ({} more redo steps)", self.future.len());
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo steps available
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Forget the whole history, e.g. after loading another job
    pub fn clear(&mut self) {
        self.past.clear();
        self.present = None;
        self.future.clear();
    }

    /// Total compressed size of all kept snapshots, in bytes
    pub fn compressed_size(&self) -> usize {
        self.past
            .iter()
            .chain(self.present.iter())
            .chain(self.future.iter())
            .map(|s| s.0.len())
            .sum()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO)
    }
}
