//! LLM integration
//!
//! Provides traits and HTTP implementations for:
//! - Query embedding
//! - Blocking and streamed chat generation

mod client;
mod http_embedder;
mod stream;
mod traits;

pub use client::{ChatMessage, GenerationOptions, OllamaClient};
pub use http_embedder::HttpEmbedder;
pub use stream::{content_stream, NdjsonDecoder};
pub use traits::*;
