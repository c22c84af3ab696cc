//! Newline-delimited JSON decoding for streamed chat replies

use super::ContentStream;
use crate::error::ReformError;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    message: Option<ChunkMessage>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ChunkMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Splits a byte stream into lines and extracts `message.content`
///
/// Each line is decoded on its own; lines that are not valid JSON or carry
/// no `message.content` field are skipped. Empty content is passed through.
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buffer: Vec<u8>,
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning content from every completed line
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut contents = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(content) = decode_line(&line) {
                contents.push(content);
            }
        }
        contents
    }

    /// Decode whatever remains once the byte stream has ended
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        decode_line(&rest)
    }
}

fn decode_line(line: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    match serde_json::from_str::<StreamChunk>(text) {
        Ok(chunk) => {
            if let Some(error) = chunk.error {
                tracing::warn!("Generation backend reported: {}", error);
            }
            chunk.message.and_then(|m| m.content)
        }
        Err(e) => {
            tracing::debug!("Skipping malformed stream line: {}", e);
            None
        }
    }
}

struct DecodeState<S> {
    bytes: Pin<Box<S>>,
    decoder: NdjsonDecoder,
    pending: VecDeque<String>,
    read_timeout: Duration,
    done: bool,
}

/// Turn a response byte stream into a pulled stream of content pieces
///
/// Nothing is read from `bytes` until the consumer polls, and dropping the
/// returned stream stops all further reads.
pub fn content_stream<S, B, E>(bytes: S, read_timeout: Duration) -> ContentStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<ReformError> + Send + 'static,
{
    let state = DecodeState {
        bytes: Box::pin(bytes),
        decoder: NdjsonDecoder::new(),
        pending: VecDeque::new(),
        read_timeout,
        done: false,
    };

    futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(content) = state.pending.pop_front() {
                return Some((Ok(content), state));
            }
            if state.done {
                return None;
            }

            match tokio::time::timeout(state.read_timeout, state.bytes.next()).await {
                Ok(Some(Ok(chunk))) => {
                    let contents = state.decoder.push(chunk.as_ref());
                    state.pending.extend(contents);
                }
                Ok(Some(Err(e))) => {
                    state.done = true;
                    return Some((Err(e.into()), state));
                }
                Ok(None) => {
                    state.done = true;
                    state.pending.extend(state.decoder.finish());
                }
                Err(_) => {
                    state.done = true;
                    let error = ReformError::Generation(format!(
                        "no data from generation backend for {}s",
                        state.read_timeout.as_secs()
                    ));
                    return Some((Err(error), state));
                }
            }
        }
    })
    .boxed()
}
