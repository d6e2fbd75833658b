//! Git operations abstraction layer
//!
//! The bump workflow only needs three things from a repository: the raw tag
//! listing, creating a tag, and publishing it to a remote. Each is a separate
//! trait so tests can fail any single step.
//!
//! Implementations:
//!
//! - [repository::Git2Repository]: in-process, using the `git2` crate
//! - [command::CommandRepository]: spawns the `git` executable through a
//!   [command::GitCmd] runner with a timeout
//! - [mock::MockRepository]: scripted responses for testing
//!
//! ```rust
//! # use taggit::git::TagLister;
//! # use taggit::domain::Taxonomy;
//! # fn example<L: TagLister>(lister: &L) -> taggit::Result<()> {
//! let taxonomy = Taxonomy::parse(&lister.list_tags()?);
//! println!("{} semver tags", taxonomy.len());
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod mock;
pub mod repository;

pub use command::{CommandRepository, GitCmd, ProcessCmd};
pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::Version;
use crate::error::Result;

/// Source of the repository's tag names.
pub trait TagLister {
    /// Return every tag name, one per line.
    ///
    /// Non-semver tags are included; callers skip them while parsing.
    fn list_tags(&self) -> Result<String>;
}

/// Creates tags in the local repository.
pub trait TagCreator {
    /// Create a lightweight tag named by `version`'s canonical form at HEAD.
    ///
    /// Fails if the tag already exists or the repository cannot be written.
    fn create_tag(&self, version: &Version) -> Result<()>;
}

/// Pushes created tags to a remote.
pub trait TagPublisher {
    /// Push the tag named by `version` to the configured remote.
    fn publish(&self, version: &Version) -> Result<()>;
}
