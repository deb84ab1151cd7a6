//! Streaming relay: forwards a Drive file as a lazy sequence of byte chunks.
//!
//! Each chunk is one ranged `alt=media` request. The stream is finite and
//! non-restartable; nothing is buffered beyond the chunk in flight.
//!
//! Failure policy: a fetch error mid-stream (client gone, transient
//! transport problem) ends the stream cleanly -- no partial chunk, no error
//! past the stream boundary, no retry, no length verification. Truncated
//! delivery is accepted behavior.

use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{self, Stream};

use crate::client::DriveClient;

/// Default download granularity: 1 MiB per request.
pub const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;

struct RelayState {
    client: Arc<DriveClient>,
    file_id: String,
    offset: u64,
    done: bool,
}

/// Produce the file's bytes as chunks of (at most) `chunk_size`.
///
/// A short chunk means the file ended; a following request would get HTTP
/// 416, which also ends the stream cleanly when the file length is an exact
/// multiple of the chunk size.
pub fn stream_file(
    client: Arc<DriveClient>,
    file_id: String,
    chunk_size: u64,
) -> impl Stream<Item = Bytes> + Send {
    let state = RelayState {
        client,
        file_id,
        offset: 0,
        done: false,
    };

    stream::unfold(state, move |mut state| async move {
        if state.done || chunk_size == 0 {
            return None;
        }

        match state
            .client
            .fetch_range(&state.file_id, state.offset, chunk_size)
            .await
        {
            Ok(Some(bytes)) if !bytes.is_empty() => {
                let len = bytes.len() as u64;
                state.offset += len;
                state.done = len < chunk_size;
                Some((bytes, state))
            }
            Ok(_) => None,
            Err(e) => {
                // Most often the client closed the connection mid-stream;
                // stop relaying and let the response end.
                tracing::warn!("Drive streaming error for file {}: {e}", state.file_id);
                None
            }
        }
    })
}
