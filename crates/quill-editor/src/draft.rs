//! The in-memory, unsaved representation of a post being edited.

use quill_gateways::Attachment;
use quill_mdx::{Frontmatter, PostDocument};

/// Everything the editor holds for the post in progress.
///
/// A draft lives only for the editor session: it is created empty at
/// session start, mutated field-by-field, and destroyed on navigation
/// away. Saving serializes a snapshot but does not clear the draft, so
/// repeated save/edit cycles work on the same state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Structured metadata, dated today on creation.
    pub frontmatter: Frontmatter,

    /// Raw Markdown/MDX body.
    pub body: String,

    /// Target file name, without extension.
    pub file_name: String,

    /// Image selected for upload, committed together with the next save.
    pub pending_image: Option<Attachment>,
}

impl Draft {
    /// An empty draft dated today.
    pub fn new() -> Self {
        Self {
            frontmatter: Frontmatter::new(),
            body: String::new(),
            file_name: String::new(),
            pending_image: None,
        }
    }

    /// Serialize to the wire form sent to the save gateway.
    pub fn to_mdx(&self) -> String {
        PostDocument::new(self.frontmatter.clone(), self.body.clone()).to_mdx()
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}
