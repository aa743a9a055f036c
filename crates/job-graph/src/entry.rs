//! Work units behind job entry nodes
//!
//! A `JobEntry` is the capability a graph node delegates to. The graph only
//! asks whether a unit holds repository references and, if so, tells it to
//! resolve them; everything else about a unit is its own business.

use parking_lot::RwLock;

use crate::constants::{DUMMY_ENTRY_NAME, START_ENTRY_NAME};
use crate::error::ReferenceError;
use crate::repository::{ObjectId, Repository, RepositoryDirectory};

/// Capability every work unit exposes to the job graph
pub trait JobEntry: std::fmt::Debug + Send + Sync {
    /// Name of the work unit
    fn name(&self) -> &str;

    /// Type identifier (e.g. "SPECIAL", "TRANS")
    fn type_id(&self) -> &str;

    /// Whether this unit is the START entry of a job
    fn is_start(&self) -> bool {
        false
    }

    /// Whether this unit refers to objects stored in a repository
    fn has_repository_references(&self) -> bool {
        false
    }

    /// Resolve the unit's repository references against `repository`
    fn lookup_repository_references(
        &self,
        _repository: &dyn Repository,
    ) -> Result<(), ReferenceError> {
        Ok(())
    }
}

/// Kind of a special entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKind {
    Start,
    Dummy,
}

/// START and DUMMY entries: control points with no work of their own
#[derive(Debug, Clone)]
pub struct SpecialEntry {
    name: String,
    kind: SpecialKind,
}

impl SpecialEntry {
    pub fn start() -> Self {
        Self {
            name: START_ENTRY_NAME.to_string(),
            kind: SpecialKind::Start,
        }
    }

    pub fn dummy() -> Self {
        Self {
            name: DUMMY_ENTRY_NAME.to_string(),
            kind: SpecialKind::Dummy,
        }
    }

    /// A dummy entry with a custom name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SpecialKind::Dummy,
        }
    }

    pub fn kind(&self) -> SpecialKind {
        self.kind
    }
}

impl JobEntry for SpecialEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_id(&self) -> &str {
        "SPECIAL"
    }

    fn is_start(&self) -> bool {
        self.kind == SpecialKind::Start
    }
}

/// Runs a transformation stored in a repository
///
/// The transformation is referenced by directory and name; resolving the
/// reference pins it to the repository's object id.
#[derive(Debug)]
pub struct TransformationEntry {
    name: String,
    directory: RepositoryDirectory,
    transformation: String,
    object_id: RwLock<Option<ObjectId>>,
}

impl TransformationEntry {
    pub fn new(
        name: impl Into<String>,
        directory: RepositoryDirectory,
        transformation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            directory,
            transformation: transformation.into(),
            object_id: RwLock::new(None),
        }
    }

    /// Repository directory holding the transformation
    pub fn directory(&self) -> &RepositoryDirectory {
        &self.directory
    }

    /// Name of the referenced transformation
    pub fn transformation(&self) -> &str {
        &self.transformation
    }

    /// Object id found by the last successful lookup
    pub fn object_id(&self) -> Option<ObjectId> {
        self.object_id.read().clone()
    }
}

impl JobEntry for TransformationEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_id(&self) -> &str {
        "TRANS"
    }

    fn has_repository_references(&self) -> bool {
        true
    }

    fn lookup_repository_references(
        &self,
        repository: &dyn Repository,
    ) -> Result<(), ReferenceError> {
        let id = repository
            .transformation_id(&self.directory, &self.transformation)?
            .ok_or_else(|| ReferenceError::IdNotFound {
                object_type: "transformation".to_string(),
                name: self.transformation.clone(),
                path: self.directory.path.clone(),
            })?;
        *self.object_id.write() = Some(id);
        Ok(())
    }
}
