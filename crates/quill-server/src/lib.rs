//! HTTP endpoints and embedded editor page for the quill CMS.
//!
//! Three thin endpoints over the injected gateways (save-mdx,
//! gen-article, create-post), a preview endpoint backing the editor's
//! preview pane, and the embedded editor page itself.

pub mod decode;
pub mod error;
pub mod page;
pub mod routes;

pub use decode::{decode_save_request, SaveSubmission};
pub use error::ApiError;
pub use routes::{router, AppState};
