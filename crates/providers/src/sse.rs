//! SSE plumbing shared by provider adapters.
//!
//! The adapter receives a `reqwest::Response`, buffers body chunks,
//! splits on `\n\n`, extracts `data:` payloads, and hands each payload
//! to an adapter-specific parser that returns zero or more stream
//! events.  [`response_stream`] packages that loop as a [`BoxStream`],
//! flushing the trailing partial event when the body closes and
//! guaranteeing a final `Done` event even when the upstream never sent
//! an explicit one.

use crate::util::from_reqwest;
use sp_domain::error::Result;
use sp_domain::stream::{BoxStream, StreamEvent};

/// Drain complete `data:` payloads from an SSE buffer.
///
/// Events are delimited by `\n\n`; only `data:` lines matter here
/// (`event:`/`id:`/`retry:` lines are skipped).  Consumed bytes are
/// removed in place and a trailing partial event stays buffered for
/// the next chunk.
pub(crate) fn drain_data_payloads(buffer: &mut String) -> Vec<String> {
    let mut payloads = Vec::new();

    while let Some(pos) = buffer.find("\n\n") {
        let block: String = buffer.drain(..pos).collect();
        buffer.drain(..2); // the \n\n delimiter

        for line in block.lines() {
            if let Some(data) = line.trim().strip_prefix("data:") {
                let data = data.trim();
                if !data.is_empty() {
                    payloads.push(data.to_string());
                }
            }
        }
    }

    payloads
}

/// Turn an SSE `reqwest::Response` into a [`BoxStream`] of events using
/// an adapter-specific payload parser.
pub(crate) fn response_stream<F>(
    response: reqwest::Response,
    parse_payload: F,
) -> BoxStream<'static, Result<StreamEvent>>
where
    F: Fn(&str) -> Vec<Result<StreamEvent>> + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut response = response;
        let mut buffer = String::new();
        let mut done_emitted = false;

        loop {
            match response.chunk().await {
                Ok(Some(bytes)) => {
                    buffer.push_str(&String::from_utf8_lossy(&bytes));
                    for payload in drain_data_payloads(&mut buffer) {
                        for event in parse_payload(&payload) {
                            if matches!(&event, Ok(StreamEvent::Done { .. })) {
                                done_emitted = true;
                            }
                            yield event;
                        }
                    }
                }
                Ok(None) => {
                    // Body closed — flush any trailing partial event.
                    if !buffer.trim().is_empty() {
                        buffer.push_str("\n\n");
                        for payload in drain_data_payloads(&mut buffer) {
                            for event in parse_payload(&payload) {
                                if matches!(&event, Ok(StreamEvent::Done { .. })) {
                                    done_emitted = true;
                                }
                                yield event;
                            }
                        }
                    }
                    break;
                }
                Err(e) => {
                    yield Err(from_reqwest(e));
                    break;
                }
            }
        }

        if !done_emitted {
            yield Ok(StreamEvent::Done {
                usage: None,
                finish_reason: Some("stop".into()),
            });
        }
    };

    Box::pin(stream)
}
