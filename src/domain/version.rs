use std::cmp::Ordering;
use std::fmt;

/// The `(major, minor, patch)` projection of a [`Version`].
///
/// Used as the grouping key of the tag taxonomy: every tag sharing a triple
/// belongs to the same release lineage entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Triple {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Triple {
    /// Create a new triple
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Triple {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Semantic version tag with an optional extension label (e.g. `rc1`).
///
/// A version without an extension is a "base" (release) version. Ordering is
/// defined by [`compare_precedence`], not by field order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub extension: Option<String>,
}

impl Version {
    /// The tag created when a repository has no semver tags yet.
    pub const ZERO: Version = Version {
        major: 0,
        minor: 0,
        patch: 0,
        extension: None,
    };

    /// Create a new base version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
            extension: None,
        }
    }

    /// Create a version carrying an extension label
    pub fn with_extension(
        major: u32,
        minor: u32,
        patch: u32,
        extension: impl Into<String>,
    ) -> Self {
        Version {
            major,
            minor,
            patch,
            extension: Some(extension.into()),
        }
    }

    pub fn triple(&self) -> Triple {
        Triple::new(self.major, self.minor, self.patch)
    }

    /// True when the version has no extension label.
    pub fn is_base(&self) -> bool {
        self.extension.is_none()
    }

    /// Bump version according to bump type.
    ///
    /// Lower components reset to zero and the extension is cleared. Returns
    /// `None` if the incremented component would overflow.
    pub fn bump(&self, bump_type: VersionBump) -> Option<Self> {
        let bumped = match bump_type {
            VersionBump::Major => Version::new(self.major.checked_add(1)?, 0, 0),
            VersionBump::Minor => Version::new(self.major, self.minor.checked_add(1)?, 0),
            VersionBump::Patch => Version::new(self.major, self.minor, self.patch.checked_add(1)?),
        };
        Some(bumped)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(extension) = &self.extension {
            write!(f, "-{}", extension)?;
        }
        Ok(())
    }
}

/// Precedence comparator for tags.
///
/// Triples compare numerically. At the same triple the release tag outranks
/// every extension tag, and extension tags compare lexically among themselves.
pub fn compare_precedence(a: &Version, b: &Version) -> Ordering {
    a.triple()
        .cmp(&b.triple())
        .then_with(|| match (&a.extension, &b.extension) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => x.cmp(y),
        })
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_precedence(self, other)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Component incremented by a version bump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "major"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Patch => write!(f, "patch"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "v1.2.3");
        assert_eq!(Version::with_extension(1, 2, 3, "rc1").to_string(), "v1.2.3-rc1");
        assert_eq!(Version::ZERO.to_string(), "v0.0.0");
    }

    #[test]
    fn test_version_bump_major() {
        let v = Version::with_extension(1, 2, 3, "rc1");
        assert_eq!(v.bump(VersionBump::Major), Some(Version::new(2, 0, 0)));
    }

    #[test]
    fn test_version_bump_minor() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(VersionBump::Minor), Some(Version::new(1, 3, 0)));
    }

    #[test]
    fn test_version_bump_patch() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(VersionBump::Patch), Some(Version::new(1, 2, 4)));
    }

    #[test]
    fn test_version_bump_overflow() {
        let v = Version::new(1, 2, u32::MAX);
        assert_eq!(v.bump(VersionBump::Patch), None);
        assert_eq!(v.bump(VersionBump::Minor), Some(Version::new(1, 3, 0)));
    }

    #[test]
    fn test_release_outranks_extensions_at_same_triple() {
        let release = Version::new(1, 2, 3);
        let rc = Version::with_extension(1, 2, 3, "rc1");
        assert!(release > rc);
        assert!(Version::new(1, 2, 2) < rc);
    }

    #[test]
    fn test_extensions_compare_lexically() {
        let beta = Version::with_extension(1, 0, 0, "beta");
        let rc = Version::with_extension(1, 0, 0, "rc1");
        assert_eq!(compare_precedence(&beta, &rc), Ordering::Less);
        assert_eq!(compare_precedence(&rc, &rc.clone()), Ordering::Equal);
    }

    #[test]
    fn test_numeric_not_lexical_components() {
        assert!(Version::new(1, 10, 0) > Version::new(1, 9, 0));
    }

    #[test]
    fn test_equality_includes_extension() {
        assert_ne!(Version::new(1, 2, 3), Version::with_extension(1, 2, 3, "rc1"));
        assert_eq!(
            Version::new(1, 2, 3).triple(),
            Version::with_extension(1, 2, 3, "rc1").triple()
        );
    }
}
