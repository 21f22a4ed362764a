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

//! ## How it works
//!
//! Bytes live in reusable chunks of memory called *segments*, arranged in a
//! ring ([`Buffer`]). When a segment is fully drained it's returned to a
//! [`Pool`](pool::Pool); new segments are claimed from the pool as the
//! buffer grows, falling back to a fresh allocation once the pool is
//! empty. Segments can be shared copy-on-write between two buffers (see
//! `Buffer::copy_in`), so moving bytes from one buffer to another never
//! copies memory, only reference-counts.
//!
//! ### Streams
//!
//! A [`Stream`] advertises the operations it supports through boolean
//! queries and implements only those. Most of this crate is small wrappers
//! around a parent `Stream` — [`FilterStream`] forwards everything,
//! [`BufferedStream`] adds read-ahead and synthesized delimiter search,
//! [`NotifyStream`] fires callbacks on EOF/close/error,
//! [`chunked::ChunkedStream`] and [`limited::LimitedStream`] implement the
//! two ways an HTTP/1.x message body can be framed. [`http::get_stream`]
//! assembles the right chain of these for a given set of headers.

pub mod buffer;
pub mod buffered;
pub mod cache;
pub mod chunked;
pub mod error;
pub mod filter;
pub mod http;
pub mod limited;
pub mod notify;
pub mod pool;
pub mod segment;
pub mod stream;

pub use buffer::Buffer;
pub use buffered::BufferedStream;
pub use cache::{Cache, CacheKey};
pub use chunked::ChunkedStream;
pub use error::{Context, Error, ErrorKind, Operation, Result};
pub use filter::FilterStream;
pub use limited::LimitedStream;
pub use notify::{NotifyStream, OnDone};
pub use pool::Pool;
pub use segment::{Segment, SEGMENT_SIZE};
pub use stream::{Stream, Whence};
