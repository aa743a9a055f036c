//! Repository boundary
//!
//! The job graph never looks inside a repository. Work units that hold
//! references into one receive it as `&dyn Repository` during reference
//! lookup and ask it for whatever they need.

use serde::{Deserialize, Serialize};

use crate::error::ReferenceError;

/// Identifier of an object stored in a repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directory-like storage location of a job inside a repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryDirectory {
    pub path: String,
}

impl RepositoryDirectory {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// The repository root
    pub fn root() -> Self {
        Self::new("/")
    }
}

/// Version stamp of a stored job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRevision {
    /// Revision name, the part that takes part in job identity
    pub name: String,
    /// Free-form commit comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Who created the revision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

impl ObjectRevision {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            login: None,
        }
    }
}

/// Repository handle passed to work units during reference lookup
pub trait Repository: Send + Sync {
    /// Human-readable repository name, used in log output
    fn name(&self) -> &str;

    /// Look up the object id of a transformation stored at `directory`
    ///
    /// Returns `Ok(None)` when no such transformation exists.
    fn transformation_id(
        &self,
        directory: &RepositoryDirectory,
        name: &str,
    ) -> Result<Option<ObjectId>, ReferenceError>;
}
