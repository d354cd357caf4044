//! External collaborator gateways.
//!
//! The editor and server never talk to GitHub or the completion API
//! directly; they go through the [`SaveGateway`] and [`GenerateGateway`]
//! trait seams so tests can substitute fakes without process-wide state.

pub mod completion;
pub mod generation;
pub mod github;
pub mod traits;

pub use completion::{CompletionClient, CompletionConfig};
pub use generation::GeneratedArticle;
pub use github::{validate_file_name, GitHubConfig, GitHubContentStore};
pub use traits::{
    Attachment, GatewayError, GenerateGateway, SaveGateway, SaveReceipt, SaveRequest,
};
