use std::fmt;

use thiserror::Error;

use crate::domain::taxonomy::Taxonomy;
use crate::domain::version::{Version, VersionBump};

/// Kind of tag a caller asks to create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Zero,
    Patch,
    Minor,
    Major,
}

impl BumpKind {
    /// Component incremented by this kind; `None` for [`BumpKind::Zero`].
    pub fn increment(self) -> Option<VersionBump> {
        match self {
            BumpKind::Zero => None,
            BumpKind::Patch => Some(VersionBump::Patch),
            BumpKind::Minor => Some(VersionBump::Minor),
            BumpKind::Major => Some(VersionBump::Major),
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.increment() {
            Some(bump) => write!(f, "{}", bump),
            None => write!(f, "zero"),
        }
    }
}

/// Business-rule rejection of a bump request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Refusal {
    #[error("refusing to generate zero tag (v0.0.0) when other semver tags already exist")]
    ZeroWithExistingTags,

    #[error("refusing to bump {0} with no pre-existing tag")]
    NoPreviousTag(VersionBump),

    #[error("refusing to bump {bump}: {latest} would overflow")]
    Overflow { bump: VersionBump, latest: Version },
}

/// Decide which tag a `kind` bump creates given the current tags.
///
/// Patch, minor and major bumps start from [`Taxonomy::latest`], so a
/// repository whose newest triple only has pre-release tags still bumps from
/// that triple.
pub fn decide(kind: BumpKind, taxonomy: &Taxonomy) -> Result<Version, Refusal> {
    let Some(bump) = kind.increment() else {
        return if taxonomy.is_empty() {
            Ok(Version::ZERO)
        } else {
            Err(Refusal::ZeroWithExistingTags)
        };
    };

    let latest = taxonomy.latest().ok_or(Refusal::NoPreviousTag(bump))?;
    latest.bump(bump).ok_or_else(|| Refusal::Overflow {
        bump,
        latest: latest.clone(),
    })
}
