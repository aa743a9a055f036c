//! Job design validation
//!
//! Checks that a job has exactly one START entry, that every entry can be
//! reached from it, and detects loops.

use std::collections::{HashMap, VecDeque};

use crate::graph::JobGraph;
use crate::types::EntryId;

/// Validation error with location context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Job has no START entry
    MissingStartEntry,
    /// Job has more than one START entry
    MultipleStartEntries { count: usize },
    /// Cycle detected among the hops
    CycleDetected,
    /// Entry cannot be reached from START
    UnreachableEntry { entry: EntryId, name: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingStartEntry => write!(f, "Job has no START entry"),
            Self::MultipleStartEntries { count } => {
                write!(f, "Job has {} START entries, expected one", count)
            }
            Self::CycleDetected => write!(f, "Cycle detected in job hops"),
            Self::UnreachableEntry { entry, name } => {
                write!(f, "Entry '{}' ({}) is not reachable from START", name, entry)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a job design
///
/// Returns all validation errors found (not just the first).
pub fn validate_job(graph: &JobGraph) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_start_presence(graph, &mut errors);
    detect_cycles(graph, &mut errors);
    validate_reachability(graph, &mut errors);

    errors
}

/// Check START entry presence
fn validate_start_presence(graph: &JobGraph, errors: &mut Vec<ValidationError>) {
    let count = graph.entries().filter(|(_, node)| node.is_start()).count();
    if count == 0 {
        errors.push(ValidationError::MissingStartEntry);
    } else if count > 1 {
        errors.push(ValidationError::MultipleStartEntries { count });
    }
}

/// Detect cycles using Kahn's algorithm (topological sort)
fn detect_cycles(graph: &JobGraph, errors: &mut Vec<ValidationError>) {
    let mut in_degree: HashMap<EntryId, usize> = graph.entries().map(|(id, _)| (id, 0)).collect();
    for hop in graph.hops() {
        *in_degree.entry(hop.to).or_insert(0) += 1;
    }

    let mut queue: VecDeque<EntryId> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(&id, _)| id)
        .collect();

    let mut visited = 0;
    while let Some(id) = queue.pop_front() {
        visited += 1;
        for hop in graph.outgoing_hops(id) {
            if let Some(deg) = in_degree.get_mut(&hop.to) {
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(hop.to);
                }
            }
        }
    }

    if visited < graph.nr_entries() {
        errors.push(ValidationError::CycleDetected);
    }
}

/// Check that every entry hangs off the START entry
fn validate_reachability(graph: &JobGraph, errors: &mut Vec<ValidationError>) {
    let Some(start) = graph.find_start() else {
        return;
    };
    let reachable = graph.reachable_from(start);

    for (id, node) in graph.entries() {
        if id != start && !node.is_start() && !reachable.contains(&id) {
            errors.push(ValidationError::UnreachableEntry {
                entry: id,
                name: node.name.clone(),
            });
        }
    }
}
