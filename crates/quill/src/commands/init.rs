//! Starter-config command.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

const DEFAULT_CONFIG: &str = r#"# quill configuration
#
# Secrets are NOT read from this file. Export them instead:
#   GITHUB_TOKEN    - token with contents write access to the repository
#   OPENAI_API_KEY  - completion API key for article generation

[github]
owner = "your-github-user"
repo = "your-blog-repo"
branch = "main"
posts_dir = "src/app/blogs"
images_dir = "images"
markdown_dir = "src/app/posts"

[generation]
model = "gpt-3.5-turbo-instruct"
max_tokens = 1000
temperature = 0.7

[server]
host = "127.0.0.1"
port = 7878
"#;

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());
    tracing::info!("Edit the [github] section, export GITHUB_TOKEN, then run: quill serve");

    Ok(())
}
