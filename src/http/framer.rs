// Copyright 2023 Strixpyrr
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::buffered::BufferedStream;
use crate::chunked::ChunkedStream;
use crate::error::{Error, ErrorKind, Operation, Result};
use crate::filter::FilterStream;
use crate::limited::LimitedStream;
use crate::notify::{NotifyStream, OnDone};
use crate::stream::Stream;

use super::headers::{EntityHeaders, GeneralHeaders, Method};

/// Whether a message with these headers carries a body, per RFC 2616 §4.4.
/// `status` is `None` on the request side and `Some(status)` on the
/// response side, mirroring the original's `Status status == INVALID`
/// branch.
pub fn has_message_body(
    general: &GeneralHeaders,
    entity: &EntityHeaders,
    method: &Method,
    status: Option<u16>,
) -> bool {
    match status {
        None => {
            if matches!(method, Method::Get | Method::Head | Method::Trace) {
                return false;
            }
            if let Some(len) = entity.content_length {
                if len > 0 {
                    return true;
                }
            }
            general.transfer_encoding.iter().any(|t| t.token != "identity")
        }
        Some(status) => {
            if matches!(method, Method::Head | Method::Trace) {
                return false;
            }
            if (100..=199).contains(&status) || status == 204 || status == 304 {
                return false;
            }
            if general.transfer_encoding.iter().any(|t| t.token != "identity") {
                return true;
            }
            // A `multipart` content type also implies a body in the
            // original, but content-type parsing is an external
            // collaborator here (see module docs); callers that need that
            // rule can special-case it on top of this function.
            !matches!(entity.content_length, Some(0))
        }
    }
}

/// Wraps `stream` in a [`BufferedStream`] if it can't search for a
/// delimiter on its own, mirroring `HTTP::Connection`'s constructor, which
/// does exactly this before ever calling `getStream`.
pub fn ensure_searchable(stream: &mut dyn Stream) -> Box<dyn Stream + '_> {
    if stream.can_find_delimited() {
        Box::new(FilterStream::borrowed(stream))
    } else {
        Box::new(BufferedStream::new(FilterStream::borrowed(stream)).allow_partial_reads(true))
    }
}

/// Assembles the stream chain that reads (or writes) exactly one message
/// body, per the `Transfer-Encoding`/`Content-Length`/connection-close
/// framing rules. `on_done` fires exactly once, whenever the body is fully
/// consumed or the stream is closed, whichever happens first.
///
/// Precondition: `has_message_body(general, entity, method, status)` must
/// be `true`; calling this otherwise is a programmer error.
pub fn get_stream<'a>(
    conn: &'a mut dyn Stream,
    general: &GeneralHeaders,
    entity: &EntityHeaders,
    method: &Method,
    status: Option<u16>,
    on_done: OnDone,
) -> Result<Box<dyn Stream + 'a>> {
    debug_assert!(
        has_message_body(general, entity, method, status),
        "get_stream called for a message with no body"
    );

    let mut stream: Box<dyn Stream + 'a> = ensure_searchable(conn);
    let mut wrapped = false;

    for coding in &general.transfer_encoding {
        match coding.token.as_str() {
            "chunked" => {
                let chunked = ChunkedStream::new(stream);
                let done = on_done.clone();
                let done2 = on_done.clone();
                let notify = NotifyStream::new(chunked)
                    .on_eof(move || done.fire())
                    .on_close(move || done2.fire());
                stream = Box::new(notify);
                wrapped = true;
            }
            "identity" => {}
            "deflate" | "gzip" | "x-gzip" | "compress" | "x-compress" => {
                return Err(Error::new(
                    Operation::Frame,
                    ErrorKind::UnsupportedTransferCoding(coding.token.clone()),
                ));
            }
            other => {
                return Err(Error::new(
                    Operation::Frame,
                    ErrorKind::UnknownTransferCoding(other.to_string()),
                ));
            }
        }
    }

    if wrapped {
        return Ok(stream);
    }

    if let Some(len) = entity.content_length {
        let limited = LimitedStream::new(stream, len);
        let done = on_done.clone();
        let done2 = on_done.clone();
        let notify = NotifyStream::new(limited)
            .on_eof(move || done.fire())
            .on_close(move || done2.fire());
        Ok(Box::new(notify))
    } else {
        if !general.connection.contains("close") {
            return Err(Error::new(Operation::Frame, ErrorKind::MissingCloseForDelimitedBody));
        }
        let notify = NotifyStream::new(stream).on_eof(move || on_done.fire());
        Ok(Box::new(notify))
    }
}
