//! HTTP routes and listener

use crate::protocol::{event, ContentBody, DoneBody, ErrorBody, ReformRequest};
use anyhow::Result;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::StreamExt;
use reform_core::{FragmentStream, Pipeline, PipelineOutput};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Bind host when none is given
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Bind port when none is given
pub const DEFAULT_PORT: u16 = 5000;

type SharedPipeline = Arc<Pipeline>;

/// Build the router with `/api/reform-description` and `/health`
pub fn router(pipeline: SharedPipeline) -> Router {
    Router::new()
        .route("/api/reform-description", post(reform_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(pipeline)
}

/// Serve the router on `host:port` until the process is stopped
pub async fn serve(pipeline: SharedPipeline, host: &str, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(pipeline)).await?;
    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

async fn reform_handler(State(pipeline): State<SharedPipeline>, body: Bytes) -> Response {
    let request: ReformRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("Rejected request body: {}", e);
            return no_prompt();
        }
    };
    let Some(prompt) = request.prompt() else {
        return no_prompt();
    };

    match pipeline.run(prompt, request.run_options()).await {
        PipelineOutput::Stream(fragments) => event_stream(fragments),
        // Validation errors arrive as text even when streaming was asked for
        PipelineOutput::Text(text) if request.use_streaming => {
            event_stream(futures::stream::once(async move { text }).boxed())
        }
        PipelineOutput::Text(text) => Json(ContentBody { content: &text }).into_response(),
    }
}

fn no_prompt() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody::new("No prompt provided")),
    )
        .into_response()
}

fn event_stream(fragments: FragmentStream) -> Response {
    let events = fragments
        .filter(|fragment| futures::future::ready(!fragment.trim().is_empty()))
        .map(|fragment| event(&ContentBody { content: &fragment }))
        .chain(futures::stream::once(async {
            event(&DoneBody { done: true })
        }))
        .map(Ok::<_, Infallible>);

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(events),
    )
        .into_response()
}
