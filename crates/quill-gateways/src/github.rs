//! GitHub contents-API implementation of the save gateway.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;

use crate::traits::{GatewayError, SaveGateway, SaveReceipt, SaveRequest};

/// Where posts are committed.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub repo: String,

    /// Target branch.
    pub branch: String,

    /// Directory that receives `<file_name>.mdx` posts.
    pub posts_dir: String,

    /// Directory that receives `<file_name>-<image_name>` uploads.
    pub images_dir: String,

    /// Access token; read from `GITHUB_TOKEN`. Its absence is reported as
    /// a credential error on first use, before any network call.
    pub token: Option<String>,
}

impl GitHubConfig {
    /// Read the access token from the conventional environment variable.
    pub fn token_from_env() -> Option<String> {
        std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty())
    }
}

/// Save gateway that commits files through the GitHub contents API.
///
/// Each commit looks up the existing blob sha first so updates succeed as
/// well as creates. When a request carries an image, the image is
/// committed before the document; if the document commit then fails, the
/// already-committed image is NOT rolled back. That partial state is a
/// known limitation of the save contract.
pub struct GitHubContentStore {
    config: GitHubConfig,
    client: reqwest::Client,
    api_base: String,
}

impl GitHubContentStore {
    /// Create a store over the public GitHub API.
    pub fn new(config: GitHubConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            api_base: "https://api.github.com".to_string(),
        }
    }

    /// Point the store at a different API host (GitHub Enterprise).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn token(&self) -> Result<&str, GatewayError> {
        self.config
            .token
            .as_deref()
            .ok_or(GatewayError::MissingCredential("GITHUB_TOKEN"))
    }

    /// Contents-API URL for a repository path, with every segment escaped.
    fn contents_url(&self, path: &str) -> String {
        let escaped = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, self.config.owner, self.config.repo, escaped
        )
    }

    /// Look up the sha of an existing file, if any.
    async fn existing_sha(&self, url: &str) -> Result<Option<String>, GatewayError> {
        let token = self.token()?;

        let response = self
            .client
            .get(url)
            .query(&[("ref", self.config.branch.as_str())])
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "quill-cms")
            .send()
            .await?;

        match response.status().as_u16() {
            200 => {
                let body: ExistingContent = response.json().await?;
                Ok(Some(body.sha))
            }
            404 => Ok(None),
            status => Err(upstream_error(status, response.text().await.ok())),
        }
    }

    /// Create or update one file and return what GitHub reports back.
    async fn put_contents(
        &self,
        path: &str,
        bytes: &[u8],
        message: &str,
    ) -> Result<CommitOutcome, GatewayError> {
        let token = self.token()?;
        let url = self.contents_url(path);
        let sha = self.existing_sha(&url).await?;

        tracing::debug!(path, update = sha.is_some(), "committing file");

        let mut body = serde_json::json!({
            "message": message,
            "content": BASE64.encode(bytes),
            "branch": self.config.branch,
        });
        if let Some(sha) = sha {
            body["sha"] = serde_json::Value::String(sha);
        }

        let response = self
            .client
            .put(&url)
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "quill-cms")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status == 200 || status == 201 {
            Ok(response.json().await?)
        } else {
            tracing::warn!(path, status, "commit rejected upstream");
            Err(upstream_error(status, response.text().await.ok()))
        }
    }

    fn post_path(&self, file_name: &str) -> String {
        format!("{}/{}.mdx", self.config.posts_dir, file_name)
    }

    fn image_path(&self, file_name: &str, image_name: &str) -> String {
        format!("{}/{}-{}", self.config.images_dir, file_name, image_name)
    }
}

impl SaveGateway for GitHubContentStore {
    async fn save_post(&self, request: &SaveRequest) -> Result<SaveReceipt, GatewayError> {
        validate_file_name(&request.file_name)?;

        let mut image_url = None;
        if let Some(image) = &request.image {
            validate_file_name(&image.name)?;
            let path = self.image_path(&request.file_name, &image.name);
            let outcome = self
                .put_contents(&path, &image.bytes, &format!("Add image: {}", image.name))
                .await?;
            image_url = outcome.content.and_then(|c| c.html_url);
        }

        let path = self.post_path(&request.file_name);
        let outcome = self
            .put_contents(
                &path,
                request.document.as_bytes(),
                &format!("Save post: {}", request.file_name),
            )
            .await?;

        Ok(receipt(outcome, image_url))
    }

    async fn commit_markdown(
        &self,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<SaveReceipt, GatewayError> {
        validate_path(path)?;
        let outcome = self.put_contents(path, content.as_bytes(), message).await?;
        Ok(receipt(outcome, None))
    }
}

/// Reject file names that could escape the configured directories.
///
/// A file name is a single path component: no separators, no `..`, no
/// absolute or drive prefixes, no hidden-file dot prefix.
pub fn validate_file_name(name: &str) -> Result<(), GatewayError> {
    if name.is_empty() {
        return Err(GatewayError::InvalidFileName("empty".to_string()));
    }
    if name.contains("..")
        || name.contains('/')
        || name.contains('\\')
        || name.contains(':')
        || name.starts_with('.')
    {
        return Err(GatewayError::InvalidFileName(name.to_string()));
    }
    Ok(())
}

/// Reject repository paths containing traversal sequences or absolute
/// prefixes; forward slashes between segments are allowed.
pub fn validate_path(path: &str) -> Result<(), GatewayError> {
    if path.is_empty() || path.starts_with('/') {
        return Err(GatewayError::InvalidFileName(path.to_string()));
    }
    if path.split('/').any(|segment| {
        segment.is_empty() || segment == ".." || segment.contains('\\') || segment.contains(':')
    }) {
        return Err(GatewayError::InvalidFileName(path.to_string()));
    }
    Ok(())
}

fn upstream_error(status: u16, body: Option<String>) -> GatewayError {
    let message = body.unwrap_or_default();
    match status {
        401 | 403 => GatewayError::Auth { status, message },
        404 => GatewayError::NotFound(message),
        _ => GatewayError::Upstream { status, message },
    }
}

fn receipt(outcome: CommitOutcome, image_url: Option<String>) -> SaveReceipt {
    SaveReceipt {
        sha: outcome.content.as_ref().map(|c| c.sha.clone()),
        url: outcome.content.and_then(|c| c.html_url),
        commit: outcome.commit.map(|c| c.sha),
        image_url,
    }
}

#[derive(Debug, Deserialize)]
struct ExistingContent {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CommitOutcome {
    content: Option<ContentInfo>,
    commit: Option<CommitInfo>,
}

#[derive(Debug, Deserialize)]
struct ContentInfo {
    sha: String,
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitInfo {
    sha: String,
}
