//! The serialized post document: frontmatter block plus raw body.

use crate::frontmatter::{Frontmatter, FrontmatterError};

/// A complete post: structured frontmatter and the raw Markdown/MDX body.
///
/// The serialized form is the exact contract persisted by the save gateway:
/// the delimited metadata block, one blank line, then the body verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostDocument {
    /// Structured metadata block.
    pub frontmatter: Frontmatter,

    /// Raw Markdown/MDX body, stored without any normalization.
    pub body: String,
}

impl PostDocument {
    /// Assemble a document from its parts.
    pub fn new(frontmatter: Frontmatter, body: impl Into<String>) -> Self {
        Self {
            frontmatter,
            body: body.into(),
        }
    }

    /// Serialize to the wire form sent to the save gateway.
    pub fn to_mdx(&self) -> String {
        format!("{}\n\n{}", self.frontmatter.to_block(), self.body)
    }

    /// Parse the wire form back into frontmatter and body.
    ///
    /// Inverse of [`PostDocument::to_mdx`] for any frontmatter free of
    /// embedded double quotes in its string fields.
    pub fn from_mdx(source: &str) -> Result<Self, DocumentError> {
        let rest = source
            .strip_prefix("---")
            .and_then(|r| r.strip_prefix('\n'))
            .ok_or(DocumentError::MissingFrontmatter)?;

        let close = rest.find("\n---").ok_or(DocumentError::Unclosed)?;
        let block = &rest[..close];

        // Skip the closing fence, its newline, and the single blank
        // separator line the serializer emits.
        let mut body = &rest[close + 4..];
        body = body.strip_prefix('\n').unwrap_or(body);
        body = body.strip_prefix('\n').unwrap_or(body);

        let frontmatter = Frontmatter::parse_lines(block.lines())?;

        Ok(Self {
            frontmatter,
            body: body.to_string(),
        })
    }
}

/// Derive a post file name from a title: lowercased, with whitespace runs
/// collapsed to single hyphens.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Errors that can occur when parsing a serialized document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Document does not start with a frontmatter block")]
    MissingFrontmatter,

    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}
