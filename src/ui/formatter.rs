//! Pure formatting functions for UI output.
//!
//! Every function returns the text of one output line (without the trailing
//! newline) so the exact wording can be tested without a terminal.

use crate::domain::Version;

const PREFIX: &str = "taggit";

/// Confirmation printed after a tag was created and published.
pub fn created_line(tag: &Version) -> String {
    format!("{}: created tag {}", PREFIX, tag)
}

/// Printed by `--dry-run` in place of creating the tag.
pub fn would_create_line(tag: &Version) -> String {
    format!("{}: would create tag {}", PREFIX, tag)
}

/// Failure report; `message` is passed through verbatim.
pub fn failure_line(message: &str) -> String {
    format!("{}: failure: {}", PREFIX, message)
}

/// One group of the tag listing: the highest-ranked tag followed by the
/// rest of its group after `|=`.
///
/// ```
/// use taggit::domain::Version;
/// use taggit::ui::formatter::group_line;
///
/// let group = [Version::new(1, 2, 3), Version::with_extension(1, 2, 3, "rc1")];
/// assert_eq!(group_line(&group), "v1.2.3 |= v1.2.3-rc1");
/// ```
pub fn group_line(group: &[Version]) -> String {
    let mut tags = group.iter().map(Version::to_string);
    let mut line = tags.next().unwrap_or_default();
    let rest: Vec<String> = tags.collect();
    if !rest.is_empty() {
        line.push_str(" |= ");
        line.push_str(&rest.join(" "));
    }
    line
}
