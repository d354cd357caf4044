//! Configuration file (quill.toml) with serde defaults.
//!
//! Secrets never live here: the GitHub token and completion API key are
//! read from `GITHUB_TOKEN` / `OPENAI_API_KEY` at startup.

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

/// Configuration file structure (quill.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub github: GitHubSection,
    #[serde(default)]
    pub generation: GenerationSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Deserialize)]
pub struct GitHubSection {
    /// Repository owner (user or organization).
    #[serde(default)]
    pub owner: String,
    /// Repository name.
    #[serde(default)]
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Directory receiving `<fileName>.mdx` posts.
    #[serde(default = "default_posts_dir")]
    pub posts_dir: String,
    /// Directory receiving image uploads.
    #[serde(default = "default_images_dir")]
    pub images_dir: String,
    /// Directory receiving create-post markdown files.
    #[serde(default = "default_markdown_dir")]
    pub markdown_dir: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerationSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GitHubSection {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            branch: default_branch(),
            posts_dir: default_posts_dir(),
            images_dir: default_images_dir(),
            markdown_dir: default_markdown_dir(),
        }
    }
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_branch() -> String {
    "main".to_string()
}
fn default_posts_dir() -> String {
    "src/app/blogs".to_string()
}
fn default_images_dir() -> String {
    "images".to_string()
}
fn default_markdown_dir() -> String {
    "src/app/posts".to_string()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_model() -> String {
    "gpt-3.5-turbo-instruct".to_string()
}
fn default_max_tokens() -> u32 {
    1000
}
fn default_temperature() -> f32 {
    0.7
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    7878
}

/// Load configuration from the given path if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_gets_defaults() {
        let config: ConfigFile = toml::from_str("").unwrap();

        assert_eq!(config.github.branch, "main");
        assert_eq!(config.github.posts_dir, "src/app/blogs");
        assert_eq!(config.generation.max_tokens, 1000);
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: ConfigFile = toml::from_str(
            "[github]\nowner = \"acme\"\nrepo = \"blog\"\n\n[server]\nport = 9000\n",
        )
        .unwrap();

        assert_eq!(config.github.owner, "acme");
        assert_eq!(config.github.branch, "main");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
