//! Domain logic - pure tag taxonomy and bump rules independent of git operations

pub mod bump;
pub mod tag;
pub mod taxonomy;
pub mod version;

pub use bump::{decide, BumpKind, Refusal};
pub use tag::parse_tag;
pub use taxonomy::Taxonomy;
pub use version::{compare_precedence, Triple, Version, VersionBump};
