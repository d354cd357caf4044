//! Router and endpoint handlers.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Request, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use quill_gateways::{GeneratedArticle, GenerateGateway, SaveGateway, SaveRequest};
use quill_mdx::{render_rich, slugify};

use crate::decode::decode_save_request;
use crate::error::ApiError;
use crate::page::EDITOR_PAGE;

/// Uploads (multipart image included) are capped at this body size.
const MAX_BODY: usize = 8 * 1024 * 1024;

/// Injected collaborators and target layout for the endpoints.
#[derive(Debug, Clone)]
pub struct AppState<S, G> {
    /// Save gateway (the GitHub content store in production).
    pub save: S,

    /// Generation gateway (the completion client in production).
    pub generate: G,

    /// Directory receiving create-post markdown files.
    pub markdown_dir: String,
}

impl<S, G> AppState<S, G> {
    pub fn new(save: S, generate: G) -> Self {
        Self {
            save,
            generate,
            markdown_dir: "src/app/posts".to_string(),
        }
    }
}

/// Build the CMS router over the given gateways.
pub fn router<S, G>(state: AppState<S, G>) -> Router
where
    S: SaveGateway + 'static,
    G: GenerateGateway + 'static,
{
    Router::new()
        .route("/", get(editor_page))
        .route("/api/save-mdx", post(save_mdx::<S, G>))
        .route("/api/gen-article", post(gen_article::<S, G>))
        .route("/api/create-post", post(create_post::<S, G>))
        .route("/api/preview", post(preview))
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(MAX_BODY))
        .with_state(Arc::new(state))
}

/// Success body for the save and create-post endpoints.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,

    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

async fn editor_page() -> Html<&'static str> {
    Html(EDITOR_PAGE)
}

/// Save a fully-assembled document (JSON or multipart with image).
async fn save_mdx<S, G>(
    State(state): State<Arc<AppState<S, G>>>,
    request: Request,
) -> Result<Json<SaveResponse>, ApiError>
where
    S: SaveGateway,
    G: GenerateGateway,
{
    let submission = decode_save_request(request).await?;

    if submission.file_name.trim().is_empty() {
        return Err(ApiError::validation("Please enter a file name"));
    }

    tracing::info!(file_name = %submission.file_name, "saving post");

    let receipt = state
        .save
        .save_post(&SaveRequest {
            file_name: submission.file_name.clone(),
            document: submission.content,
            image: submission.image,
        })
        .await?;

    Ok(Json(SaveResponse {
        message: format!("File {}.mdx saved successfully", submission.file_name),
        sha: receipt.sha,
        url: receipt.url,
        commit: receipt.commit,
        image_url: receipt.image_url,
    }))
}

#[derive(Debug, Deserialize)]
struct GenerateBody {
    prompt: String,
}

/// Response body for the generate endpoint: the parsed article fields.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub title: String,
    pub description: String,
    pub content: String,
}

/// Generate draft article text for a topic prompt.
async fn gen_article<S, G>(
    State(state): State<Arc<AppState<S, G>>>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, ApiError>
where
    S: SaveGateway,
    G: GenerateGateway,
{
    if body.prompt.trim().is_empty() {
        return Err(ApiError::validation("Prompt is required"));
    }

    tracing::info!("generating article draft");

    let completion = state.generate.generate(&body.prompt).await?;
    let article = GeneratedArticle::from_completion(&completion);

    Ok(Json(GenerateResponse {
        title: article.title,
        description: article.description,
        content: article.content,
    }))
}

#[derive(Debug, Deserialize)]
struct CreateBody {
    title: String,
    content: String,
}

/// Alternate flow: commit raw markdown under a title-derived slug.
async fn create_post<S, G>(
    State(state): State<Arc<AppState<S, G>>>,
    Json(body): Json<CreateBody>,
) -> Result<Json<SaveResponse>, ApiError>
where
    S: SaveGateway,
    G: GenerateGateway,
{
    let slug = slugify(&body.title);
    if slug.is_empty() {
        return Err(ApiError::validation("Title is required"));
    }

    let path = format!("{}/{}.md", state.markdown_dir, slug);
    let message = format!("Add new post: {}", body.title);

    tracing::info!(%path, "creating post");

    let receipt = state
        .save
        .commit_markdown(&path, &body.content, &message)
        .await?;

    Ok(Json(SaveResponse {
        message: format!("Post created: {slug}"),
        sha: receipt.sha,
        url: receipt.url,
        commit: receipt.commit,
        image_url: None,
    }))
}

#[derive(Debug, Deserialize)]
struct PreviewBody {
    content: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub html: String,
}

/// Render a body for the preview pane with the rich renderer.
async fn preview(Json(body): Json<PreviewBody>) -> Json<PreviewResponse> {
    Json(PreviewResponse {
        html: render_rich(&body.content),
    })
}
