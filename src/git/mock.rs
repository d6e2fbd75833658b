use std::cell::RefCell;

use crate::domain::Version;
use crate::error::{Result, TaggitError};
use crate::git::{TagCreator, TagLister, TagPublisher};

/// Mock repository for testing without actual git operations
///
/// Each step can be scripted to fail; successful creates and publishes are
/// recorded so tests can assert which collaborators ran.
#[derive(Debug, Default)]
pub struct MockRepository {
    tags: Vec<String>,
    list_error: Option<String>,
    create_error: Option<String>,
    publish_error: Option<String>,
    created: RefCell<Vec<Version>>,
    published: RefCell<Vec<Version>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock repository that already carries `tags`
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockRepository {
            tags: tags.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn fail_list(mut self, msg: impl Into<String>) -> Self {
        self.list_error = Some(msg.into());
        self
    }

    pub fn fail_create(mut self, msg: impl Into<String>) -> Self {
        self.create_error = Some(msg.into());
        self
    }

    pub fn fail_publish(mut self, msg: impl Into<String>) -> Self {
        self.publish_error = Some(msg.into());
        self
    }

    /// Tags passed to `create_tag`, including failed attempts
    pub fn created(&self) -> Vec<Version> {
        self.created.borrow().clone()
    }

    /// Tags passed to `publish`, including failed attempts
    pub fn published(&self) -> Vec<Version> {
        self.published.borrow().clone()
    }
}

impl TagLister for MockRepository {
    fn list_tags(&self) -> Result<String> {
        match &self.list_error {
            Some(msg) => Err(TaggitError::list(msg.clone())),
            None => Ok(self.tags.join("\n")),
        }
    }
}

impl TagCreator for MockRepository {
    fn create_tag(&self, version: &Version) -> Result<()> {
        self.created.borrow_mut().push(version.clone());
        match &self.create_error {
            Some(msg) => Err(TaggitError::tag(msg.clone())),
            None => Ok(()),
        }
    }
}

impl TagPublisher for MockRepository {
    fn publish(&self, version: &Version) -> Result<()> {
        self.published.borrow_mut().push(version.clone());
        match &self.publish_error {
            Some(msg) => Err(TaggitError::remote(msg.clone())),
            None => Ok(()),
        }
    }
}
