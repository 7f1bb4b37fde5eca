//! Server-sent event stream handling for `streamGenerateContent?alt=sse`

use futures::{
    future,
    stream::{self, StreamExt},
};
use reqwest::Response;
use tracing::trace;

use crate::{
    error::GenerationError,
    ports::{StreamingChunk, StreamingResponse},
    types::GenerateContentResponse,
};

/// Create a streaming response from an HTTP response
///
/// Network chunks do not align with event boundaries, so bytes are buffered
/// until a full line is available.
pub fn create_stream(response: Response) -> StreamingResponse {
    let byte_stream = response.bytes_stream();

    let chunk_stream = byte_stream
        .scan(Vec::<u8>::new(), |buffer, result| {
            let items = match result {
                Ok(bytes) => {
                    buffer.extend_from_slice(&bytes);
                    drain_complete_lines(buffer)
                },
                Err(e) => vec![Err(GenerationError::StreamError(e.to_string()))],
            };
            future::ready(Some(items))
        })
        .flat_map(stream::iter);

    Box::pin(chunk_stream)
}

/// Parse every complete line in `buffer`, leaving a trailing partial line
fn drain_complete_lines(buffer: &mut Vec<u8>) -> Vec<Result<StreamingChunk, GenerationError>> {
    let Some(last_newline) = buffer.iter().rposition(|b| *b == b'\n') else {
        return Vec::new();
    };
    let complete: Vec<u8> = buffer.drain(..=last_newline).collect();

    match std::str::from_utf8(&complete) {
        Ok(text) => text.lines().filter_map(parse_event_line).collect(),
        Err(e) => vec![Err(GenerationError::InvalidResponse(format!(
            "Invalid UTF-8: {e}"
        )))],
    }
}

/// Parse one SSE line; only `data:` lines carry payloads
fn parse_event_line(line: &str) -> Option<Result<StreamingChunk, GenerationError>> {
    let payload = line.trim_end_matches('\r').strip_prefix("data:")?.trim();
    if payload.is_empty() {
        return None;
    }
    trace!(payload = %payload, "Parsing stream event");

    Some(
        serde_json::from_str::<GenerateContentResponse>(payload)
            .map_err(|e| GenerationError::InvalidResponse(format!("JSON parse error: {e}")))
            .and_then(|event| {
                if let Some(reason) = event.block_reason() {
                    return Err(GenerationError::Blocked(reason.to_string()));
                }
                Ok(StreamingChunk {
                    content: event.text(),
                    done: event.finish_reason().is_some(),
                })
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(text: &str, finish: Option<&str>) -> String {
        let mut candidate = serde_json::json!({
            "content": {"role": "model", "parts": [{"text": text}]}
        });
        if let Some(reason) = finish {
            candidate["finishReason"] = serde_json::json!(reason);
        }
        format!("data: {}\r\n\r\n", serde_json::json!({"candidates": [candidate]}))
    }

    #[test]
    fn parses_single_event() {
        let mut buffer = event("Hello", None).into_bytes();
        let chunks = drain_complete_lines(&mut buffer);

        assert_eq!(chunks.len(), 1);
        let chunk = chunks[0].as_ref().unwrap();
        assert_eq!(chunk.content, "Hello");
        assert!(!chunk.done);
        assert!(buffer.is_empty());
    }

    #[test]
    fn final_event_is_done() {
        let mut buffer = event("!", Some("STOP")).into_bytes();
        let chunks = drain_complete_lines(&mut buffer);
        assert!(chunks[0].as_ref().unwrap().done);
    }

    #[test]
    fn partial_lines_wait_for_more_bytes() {
        let full = format!("{}{}", event("Hello", None), event(" world", Some("STOP")));
        let split_at = full.len() / 2 + 3;
        let (first, second) = full.split_at(split_at);

        let mut buffer = first.as_bytes().to_vec();
        let mut chunks = drain_complete_lines(&mut buffer);
        assert!(!buffer.is_empty());

        buffer.extend_from_slice(second.as_bytes());
        chunks.extend(drain_complete_lines(&mut buffer));

        let text: String = chunks
            .iter()
            .map(|c| c.as_ref().unwrap().content.clone())
            .collect();
        assert_eq!(text, "Hello world");
        assert!(chunks.last().unwrap().as_ref().unwrap().done);
    }

    #[test]
    fn ignores_comments_and_blank_lines() {
        assert!(parse_event_line(": keep-alive").is_none());
        assert!(parse_event_line("").is_none());
        assert!(parse_event_line("event: message").is_none());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let result = parse_event_line("data: {not json").unwrap();
        assert!(matches!(result, Err(GenerationError::InvalidResponse(_))));
    }

    #[test]
    fn blocked_prompt_is_an_error() {
        let line = r#"data: {"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let result = parse_event_line(line).unwrap();
        assert!(matches!(result, Err(GenerationError::Blocked(_))));
    }
}
