//! MDX post model: frontmatter codec and markdown renderers.
//!
//! This crate holds the editor's data model (frontmatter plus raw body),
//! the exact serialized-document wire form persisted by the save gateway,
//! and the two preview renderers (a minimal line-classifier variant and an
//! engine-backed rich variant).

pub mod document;
pub mod frontmatter;
pub mod preview;
pub mod render;

pub use document::{slugify, DocumentError, PostDocument};
pub use frontmatter::{Category, Frontmatter, FrontmatterError, Status};
pub use preview::render_rich;
pub use render::render;
