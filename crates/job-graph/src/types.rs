//! Core types for job graphs
//!
//! These types define the pieces a job design is made of: entry nodes,
//! the hops connecting them, free-floating notes, and canvas geometry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entry::JobEntry;

/// Stable handle of an entry inside one job graph
///
/// Handles are never reused within a graph, so a removed entry's handle
/// keeps failing lookups instead of silently naming another entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub(crate) u64);

impl EntryId {
    /// Raw numeric value of the handle
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point on the design canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The canvas origin
    pub fn origin() -> Self {
        Self::default()
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A placed copy of a work unit in the job graph
///
/// Several nodes may share one work unit (copies of the same logical entry);
/// they are told apart by `copy_nr` and by the handle the graph assigns.
#[derive(Debug, Clone)]
pub struct JobEntryNode {
    /// Display name of this copy
    pub name: String,
    /// Copy number among nodes sharing the same name
    pub copy_nr: u32,
    /// Position on the canvas
    pub location: Point,
    /// The underlying work unit
    pub entry: Arc<dyn JobEntry>,
}

impl JobEntryNode {
    /// Create the first copy of a work unit, named after it
    pub fn new(entry: Arc<dyn JobEntry>) -> Self {
        Self {
            name: entry.name().to_string(),
            copy_nr: 0,
            location: Point::origin(),
            entry,
        }
    }

    /// Place this node at the given canvas position
    pub fn at(mut self, location: impl Into<Point>) -> Self {
        self.location = location.into();
        self
    }

    /// Give this node an explicit copy number
    pub fn with_copy_nr(mut self, copy_nr: u32) -> Self {
        self.copy_nr = copy_nr;
        self
    }

    /// Give this node a display name different from its work unit
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether the underlying work unit is the START entry
    pub fn is_start(&self) -> bool {
        self.entry.is_start()
    }
}

/// When a hop is followed at run time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HopEvaluation {
    /// Followed when the source entry succeeds
    Success,
    /// Followed when the source entry fails
    Failure,
}

/// A directed transition between two entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hop {
    /// Source entry
    pub from: EntryId,
    /// Target entry
    pub to: EntryId,
    /// Disabled hops are kept in the design but never followed at run time
    pub enabled: bool,
    /// Result of the source entry that triggers this hop
    pub evaluation: HopEvaluation,
    /// Followed regardless of the source entry's result
    pub unconditional: bool,
}

impl Hop {
    /// Create an enabled hop followed on success
    pub fn new(from: EntryId, to: EntryId) -> Self {
        Self {
            from,
            to,
            enabled: true,
            evaluation: HopEvaluation::Success,
            unconditional: false,
        }
    }

    /// Follow this hop on failure of the source entry
    pub fn on_failure(mut self) -> Self {
        self.evaluation = HopEvaluation::Failure;
        self
    }

    /// Follow this hop whatever the result of the source entry
    pub fn unconditional(mut self) -> Self {
        self.unconditional = true;
        self
    }

    /// Set the enabled flag
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// A positioned annotation on the canvas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub text: String,
    pub location: Point,
    pub width: i32,
    pub height: i32,
}

impl Note {
    pub fn new(text: impl Into<String>, location: impl Into<Point>) -> Self {
        Self {
            text: text.into(),
            location: location.into(),
            width: 0,
            height: 0,
        }
    }

    /// Set the note's rendered size
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hop_defaults() {
        let hop = Hop::new(EntryId(1), EntryId(2));
        assert!(hop.enabled);
        assert!(!hop.unconditional);
        assert_eq!(hop.evaluation, HopEvaluation::Success);

        let hop = hop.on_failure().with_enabled(false);
        assert_eq!(hop.evaluation, HopEvaluation::Failure);
        assert!(!hop.enabled);
    }

    #[test]
    fn test_hop_serializes_camel_case() {
        let hop = Hop::new(EntryId(3), EntryId(4)).unconditional();
        let json = serde_json::to_value(hop).unwrap();
        assert_eq!(json["from"], 3);
        assert_eq!(json["to"], 4);
        assert_eq!(json["unconditional"], true);
        assert_eq!(json["evaluation"], "success");
    }

    #[test]
    fn test_point_from_tuple() {
        let point: Point = (5, -7).into();
        assert_eq!(point, Point::new(5, -7));
        assert_eq!(Point::origin(), Point::new(0, 0));
    }
}
