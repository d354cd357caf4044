//! Trait definitions for the external collaborator gateways.

use std::future::Future;

/// An uploaded image carried alongside a post until save time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Original file name of the upload.
    pub name: String,

    /// Raw bytes, passed through to the store without processing.
    pub bytes: Vec<u8>,
}

/// A fully-assembled save submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    /// Target file name, without the `.mdx` extension.
    pub file_name: String,

    /// Serialized document text (frontmatter block plus body).
    pub document: String,

    /// Optional image to commit next to the post.
    pub image: Option<Attachment>,
}

/// What the store reports back after a successful save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReceipt {
    /// Content blob identifier of the committed file.
    pub sha: Option<String>,

    /// Browser URL of the committed file.
    pub url: Option<String>,

    /// Commit identifier.
    pub commit: Option<String>,

    /// Browser URL of the committed image, when one was attached.
    pub image_url: Option<String>,
}

/// Errors surfaced by either gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A required credential is absent; checked before any network call.
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    /// The upstream rejected our credential.
    #[error("Upstream auth failure ({status}): {message}")]
    Auth { status: u16, message: String },

    /// Target repository or path does not exist upstream.
    #[error("Upstream target not found: {0}")]
    NotFound(String),

    /// Any other non-success upstream response.
    #[error("Upstream failure ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Network-level failure; never retried automatically.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// File name failed validation; checked before any network call.
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),
}

/// An external store that persists fully-assembled documents.
pub trait SaveGateway: Send + Sync {
    /// Commit a post (and its optional image) under the store's post
    /// layout.
    fn save_post(
        &self,
        request: &SaveRequest,
    ) -> impl Future<Output = Result<SaveReceipt, GatewayError>> + Send;

    /// Commit a raw markdown file at an explicit repository path (the
    /// create-post alternate flow).
    fn commit_markdown(
        &self,
        path: &str,
        content: &str,
        message: &str,
    ) -> impl Future<Output = Result<SaveReceipt, GatewayError>> + Send;
}

/// An external text-completion service.
pub trait GenerateGateway: Send + Sync {
    /// Produce free-text completion output for a topic prompt.
    ///
    /// The output format is a prompt-engineering convention, not a schema;
    /// callers parse it with
    /// [`crate::generation::GeneratedArticle::from_completion`], which
    /// tolerates any shape.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, GatewayError>> + Send;
}
