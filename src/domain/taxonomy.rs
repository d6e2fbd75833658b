//! Grouping of repository tags by their base version.
//!
//! A repository may carry a release tag (`v1.2.3`) next to pre-release tags
//! at the same triple (`v1.2.3-rc1`, `v1.2.3-beta`). Bump decisions follow the
//! release lineage (the ordered triples) while listing still needs the single
//! highest tag, pre-releases included.

use std::collections::BTreeMap;
use std::io::BufRead;

use crate::domain::tag::parse_tag;
use crate::domain::version::{compare_precedence, Triple, Version};

/// Mapping from base triple to every tag sharing that triple.
///
/// After [`Taxonomy::finalize`] each group is sorted descending by
/// precedence, so index 0 is the group's highest-ranked member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Taxonomy {
    groups: BTreeMap<Triple, Vec<Version>>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a taxonomy from the full output of a tag listing.
    ///
    /// Lines that are not semver tags are skipped.
    pub fn parse(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    /// Like [`Taxonomy::parse`], reading lines from `reader`.
    ///
    /// Fails only if reading fails, never because of an unparseable line.
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
        Ok(Self::from_lines(lines.iter().map(String::as_str)))
    }

    fn from_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Self {
        let mut taxonomy = Taxonomy::new();
        for version in lines.filter_map(parse_tag) {
            taxonomy.add(version);
        }
        taxonomy.finalize();
        taxonomy
    }

    /// Append `version` to the group of its triple.
    pub fn add(&mut self, version: Version) {
        self.groups.entry(version.triple()).or_default().push(version);
    }

    /// Sort every group descending by precedence.
    pub fn finalize(&mut self) {
        for group in self.groups.values_mut() {
            group.sort_by(|a, b| compare_precedence(b, a));
        }
    }

    /// All base triples, ascending.
    pub fn bases(&self) -> Vec<Triple> {
        self.groups.keys().copied().collect()
    }

    /// The tags sharing `base`, highest-ranked first.
    pub fn group(&self, base: &Triple) -> Option<&[Version]> {
        self.groups.get(base).map(Vec::as_slice)
    }

    /// Iterate over `(base, group)` pairs in ascending base order.
    pub fn groups(&self) -> impl Iterator<Item = (&Triple, &[Version])> + '_ {
        self.groups.iter().map(|(base, tags)| (base, tags.as_slice()))
    }

    /// Highest-ranked tag of the greatest base, or `None` when no semver tags
    /// exist.
    pub fn latest(&self) -> Option<&Version> {
        self.groups
            .values()
            .next_back()
            .and_then(|group| group.first())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of tags across all groups.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}
