//! Job Graph - design-time model of data-integration jobs
//!
//! A job is a directed graph of work units (entries) connected by hops,
//! plus free-floating notes. This crate provides:
//!
//! - Entry/hop/note storage with stable entry handles
//! - Directed reachability, used to keep designs free of loops
//! - Repository reference resolution that reports every failing entry
//! - Dirty/clean change tracking with content listeners
//! - Job identity (filename first, then name/directory/revision)
//! - Compressed snapshot-based layout undo/redo
//!
//! # Example
//!
//! ```ignore
//! use job_graph::JobBuilder;
//!
//! let graph = JobBuilder::new("nightly")
//!     .add_start((0, 0))
//!     .add_dummy("load", (100, 0))
//!     .add_hop("START", "load")
//!     .build()?;
//! ```

pub mod builder;
pub mod changes;
pub mod constants;
pub mod entry;
pub mod error;
pub mod events;
pub mod graph;
pub mod reachability;
pub mod references;
pub mod repository;
pub mod types;
pub mod undo;
pub mod validation;

// Re-export key types
pub use builder::JobBuilder;
pub use changes::ChangeTracker;
pub use entry::{JobEntry, SpecialEntry, SpecialKind, TransformationEntry};
pub use error::{JobGraphError, ReferenceError, ReferenceFailure, Result};
pub use events::{ContentEvent, ContentListener, NullContentListener, VecContentListener};
pub use graph::JobGraph;
pub use repository::{ObjectId, ObjectRevision, Repository, RepositoryDirectory};
pub use types::{EntryId, Hop, HopEvaluation, JobEntryNode, Note, Point};
pub use undo::{JobLayout, UndoStack};
pub use validation::{validate_job, ValidationError};
