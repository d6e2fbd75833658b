//! Bump and list workflows
//!
//! Sequences list -> decide -> create -> publish and reports each step's
//! failure. Kept apart from main.rs so the workflows run against any
//! collaborator, including [`crate::git::MockRepository`].

use std::io::Write;
use std::process::ExitCode;

use crate::domain::{decide, BumpKind, Taxonomy, Version};
use crate::error::Result;
use crate::git::{TagCreator, TagLister, TagPublisher};
use crate::ui::{self, Console};

/// Collaborators a workflow runs against
#[derive(Clone, Copy)]
pub struct Kit<'a> {
    lister: &'a dyn TagLister,
    creator: &'a dyn TagCreator,
    publisher: &'a dyn TagPublisher,
}

/// Result of a successful bump workflow
#[derive(Debug, Clone, PartialEq)]
pub struct BumpOutcome {
    /// The tag that was (or in a dry run, would have been) created
    pub tag: Version,

    /// Whether the tag was created and pushed
    pub published: bool,
}

/// Completion status of a workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => ExitCode::SUCCESS,
            Status::Failure => ExitCode::FAILURE,
        }
    }
}

impl<'a> Kit<'a> {
    pub fn new(
        lister: &'a dyn TagLister,
        creator: &'a dyn TagCreator,
        publisher: &'a dyn TagPublisher,
    ) -> Self {
        Kit {
            lister,
            creator,
            publisher,
        }
    }

    /// Kit whose three collaborators are the same repository.
    pub fn from_repo<R>(repo: &'a R) -> Self
    where
        R: TagLister + TagCreator + TagPublisher,
    {
        Kit::new(repo, repo, repo)
    }

    /// Fresh taxonomy of the repository's current tags.
    pub fn taxonomy(&self) -> Result<Taxonomy> {
        let listing = self.lister.list_tags()?;
        let taxonomy = Taxonomy::parse(&listing);
        tracing::debug!(
            tags = taxonomy.len(),
            bases = taxonomy.bases().len(),
            "parsed tag listing"
        );
        Ok(taxonomy)
    }

    /// Decide, create and publish the next tag for `kind`.
    ///
    /// Stops at the first failing step: a refusal or listing error creates
    /// nothing, a create error skips publishing, and a publish error leaves
    /// the local tag in place.
    pub fn bump(&self, kind: BumpKind, dry_run: bool) -> Result<BumpOutcome> {
        let taxonomy = self.taxonomy()?;
        let tag = decide(kind, &taxonomy)?;
        tracing::info!(
            %kind,
            %tag,
            latest = ?taxonomy.latest().map(ToString::to_string),
            "decided next tag"
        );

        if dry_run {
            return Ok(BumpOutcome {
                tag,
                published: false,
            });
        }

        self.creator.create_tag(&tag)?;
        self.publisher.publish(&tag)?;

        Ok(BumpOutcome {
            tag,
            published: true,
        })
    }
}

/// Run a bump and report it on `console`.
pub fn run_bump<O: Write, E: Write>(
    kit: &Kit<'_>,
    kind: BumpKind,
    dry_run: bool,
    console: &mut Console<O, E>,
) -> Status {
    let outcome = match kit.bump(kind, dry_run) {
        Ok(outcome) => outcome,
        Err(e) => {
            if e.is_refusal() {
                tracing::debug!(%kind, "bump refused");
            }
            console.failure(&e.to_string());
            return Status::Failure;
        }
    };

    let line = if outcome.published {
        ui::created_line(&outcome.tag)
    } else {
        ui::would_create_line(&outcome.tag)
    };
    report(console, &[line])
}

/// Print the repository's semver tags, one group per line in ascending base
/// order, or just the latest tag when `latest_only` is set.
///
/// The listing goes out in a single write. A stream that fails part way
/// through that write may still have received a prefix of it.
pub fn run_list<O: Write, E: Write>(
    kit: &Kit<'_>,
    latest_only: bool,
    console: &mut Console<O, E>,
) -> Status {
    let taxonomy = match kit.taxonomy() {
        Ok(taxonomy) => taxonomy,
        Err(e) => {
            console.failure(&e.to_string());
            return Status::Failure;
        }
    };

    let lines: Vec<String> = if latest_only {
        taxonomy.latest().map(ToString::to_string).into_iter().collect()
    } else {
        taxonomy.groups().map(|(_, group)| ui::group_line(group)).collect()
    };
    report(console, &lines)
}

fn report<O: Write, E: Write>(console: &mut Console<O, E>, lines: &[String]) -> Status {
    match console.lines(lines) {
        Ok(()) => Status::Success,
        Err(e) => {
            console.failure(&format!("cannot write output: {}", e));
            Status::Failure
        }
    }
}
