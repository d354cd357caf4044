//! Editor server command.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use quill_gateways::{
    CompletionClient, CompletionConfig, GitHubConfig, GitHubContentStore,
};
use quill_server::{router, AppState};

use crate::config::load_config;

/// Run the serve command.
pub async fn run(config_path: &Path, port: Option<u16>, open_browser: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let port = port.unwrap_or(config.server.port);

    if config.github.owner.is_empty() || config.github.repo.is_empty() {
        anyhow::bail!(
            "No target repository configured. Run 'quill init' and fill in the [github] section."
        );
    }

    let github_token = GitHubConfig::token_from_env();
    if github_token.is_none() {
        // The server still starts; the save endpoints answer 500 until the
        // token is provided.
        tracing::warn!("GITHUB_TOKEN is not set; saving posts will fail");
    }
    let api_key = CompletionConfig::key_from_env();
    if api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; article generation will fail");
    }

    let store = GitHubContentStore::new(GitHubConfig {
        owner: config.github.owner,
        repo: config.github.repo,
        branch: config.github.branch,
        posts_dir: config.github.posts_dir,
        images_dir: config.github.images_dir,
        token: github_token,
    });

    let completion = CompletionClient::new(CompletionConfig {
        base_url: config.generation.base_url,
        model: config.generation.model,
        max_tokens: config.generation.max_tokens,
        temperature: config.generation.temperature,
        api_key,
    });

    let state = AppState {
        save: store,
        generate: completion,
        markdown_dir: config.github.markdown_dir,
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Starting editor at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    if open_browser {
        let url = format!("http://{addr}");
        let _ = open::that(&url);
    }

    axum::serve(listener, router(state)).await?;

    Ok(())
}
