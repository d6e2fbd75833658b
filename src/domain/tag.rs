use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::version::Version;
use crate::error::{Result, TaggitError};

fn tag_regex() -> &'static Regex {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    TAG_RE.get_or_init(|| {
        Regex::new(r"^v?(\d+)\.(\d+)\.(\d+)(?:-([0-9A-Za-z][0-9A-Za-z.+\-]*))?$")
            .expect("tag pattern is a valid regex")
    })
}

/// Interpret one line of `git tag --list` output as a semver tag.
///
/// Accepts `v1.2.3`, `1.2.3` and `v1.2.3-<extension>`; surrounding whitespace
/// is ignored. Returns `None` for anything else so callers can skip
/// unrelated tags.
///
/// # Example
/// ```
/// use taggit::domain::{parse_tag, Version};
/// assert_eq!(parse_tag("v1.2.3"), Some(Version::new(1, 2, 3)));
/// assert_eq!(parse_tag("release-candidate"), None);
/// ```
pub fn parse_tag(line: &str) -> Option<Version> {
    let captures = tag_regex().captures(line.trim())?;

    let major = captures[1].parse::<u32>().ok()?;
    let minor = captures[2].parse::<u32>().ok()?;
    let patch = captures[3].parse::<u32>().ok()?;
    let extension = captures.get(4).map(|m| m.as_str().to_string());

    Some(Version {
        major,
        minor,
        patch,
        extension,
    })
}

impl FromStr for Version {
    type Err = TaggitError;

    fn from_str(s: &str) -> Result<Self> {
        parse_tag(s).ok_or_else(|| {
            TaggitError::version(format!(
                "Invalid version format: '{}' - expected vX.Y.Z[-extension]",
                s
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_tag() {
        let v = parse_tag("v1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
        assert!(v.is_base());
    }

    #[test]
    fn test_parse_without_v() {
        assert_eq!(parse_tag("1.2.3"), Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn test_parse_extension() {
        assert_eq!(
            parse_tag("v1.2.3-rc1"),
            Some(Version::with_extension(1, 2, 3, "rc1"))
        );
        assert_eq!(
            parse_tag("v0.1.0-beta.2"),
            Some(Version::with_extension(0, 1, 0, "beta.2"))
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_tag("  v2.0.0\r"), Some(Version::new(2, 0, 0)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for line in [
            "",
            "v1.2",
            "v1.2.3.4",
            "V1.2.3",
            "release-1.2.3",
            "v1.2.3-",
            "v1.2.x",
            "vv1.2.3",
            "latest",
            "v1.2.3 v1.2.4",
        ] {
            assert_eq!(parse_tag(line), None, "expected {:?} to be rejected", line);
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert_eq!(parse_tag("v99999999999.0.0"), None);
    }

    #[test]
    fn test_from_str_error() {
        let err = "nope".parse::<Version>().unwrap_err();
        assert!(err.to_string().contains("nope"));
        assert_eq!("v3.1.4".parse::<Version>().unwrap(), Version::new(3, 1, 4));
    }

    #[test]
    fn test_canonical_form_reparses() {
        let v = Version::with_extension(4, 5, 6, "alpha");
        assert_eq!(parse_tag(&v.to_string()), Some(v));
    }
}
