//! Error types for the job graph

use thiserror::Error;

use crate::types::EntryId;

/// Result type alias using JobGraphError
pub type Result<T> = std::result::Result<T, JobGraphError>;

/// Errors that can occur while editing or resolving a job graph
#[derive(Debug, Error)]
pub enum JobGraphError {
    /// A handle does not name an entry of this graph
    #[error("Unknown job entry: {0}")]
    UnknownEntry(EntryId),

    /// No entry carries the given name
    #[error("No job entry named '{0}'")]
    UnknownEntryName(String),

    /// Hop index outside the hop sequence
    #[error("Hop index {index} out of range ({len} hops)")]
    HopIndexOutOfRange { index: usize, len: usize },

    /// Note index outside the note list
    #[error("Note index {index} out of range ({len} notes)")]
    NoteIndexOutOfRange { index: usize, len: usize },

    /// Adding the hop would close a cycle
    #[error("Hop from {from} to {to} would create a loop")]
    HopCreatesCycle { from: EntryId, to: EntryId },

    /// One or more entries failed to resolve their repository references
    #[error("Lookup of repository references failed ({} failing entries)", .failures.len())]
    LookupReferences { failures: Vec<ReferenceFailure> },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Compression error
    #[error("Compression error: {0}")]
    Compression(String),
}

/// Failure raised by a single work unit while resolving its references
#[derive(Debug, Clone, Error)]
pub enum ReferenceError {
    /// The referenced object does not exist in the repository
    #[error("{object_type} '{name}' not found in '{path}'")]
    IdNotFound {
        object_type: String,
        name: String,
        path: String,
    },

    /// The repository could not answer the lookup
    #[error("Repository error: {0}")]
    Repository(String),
}

/// One entry's failed reference lookup, kept for the aggregate error
#[derive(Debug, Clone)]
pub struct ReferenceFailure {
    /// Handle of the failing entry
    pub entry: EntryId,
    /// Name of the failing entry at the time of the lookup
    pub entry_name: String,
    /// Underlying cause
    pub cause: ReferenceError,
}

impl std::fmt::Display for ReferenceFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.entry_name, self.entry, self.cause)
    }
}

impl JobGraphError {
    /// Per-entry causes carried by an aggregate lookup failure
    pub fn reference_failures(&self) -> &[ReferenceFailure] {
        match self {
            Self::LookupReferences { failures } => failures,
            _ => &[],
        }
    }
}
