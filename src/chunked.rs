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

use crate::buffer::Buffer;
use crate::error::{Error, ErrorKind, Operation, Result};
use crate::stream::{Stream, Whence};

/// Bytes of a chunk-size line we'll scan before giving up on finding its
/// terminating `\n`, and the largest chunk size we'll accept, reusing one
/// constant for both the way the distilled spec describes an "oversize
/// chunk (> SANITY)" check.
const SANITY_LIMIT: usize = 1 << 20;

enum ReadState {
    AwaitingSize,
    InChunk(u64),
    AwaitingTrailer,
    Exhausted,
}

enum WriteState {
    Open,
    Closed,
}

/// Decodes or encodes the HTTP/1.1 chunked transfer coding over a parent
/// stream that already supports delimited search (see
/// `http::framer::ensure_searchable`).
pub struct ChunkedStream<S> {
    parent: S,
    read_state: ReadState,
    write_state: WriteState,
}

impl<S: Stream> ChunkedStream<S> {
    pub fn new(parent: S) -> Self {
        Self { parent, read_state: ReadState::AwaitingSize, write_state: WriteState::Open }
    }

    pub fn into_parent(self) -> S {
        self.parent
    }

    fn malformed(msg: impl Into<String>) -> Error {
        Error::new(Operation::Chunk, ErrorKind::MalformedChunk(msg.into()))
    }

    fn truncated() -> Error {
        Error::new(Operation::Chunk, ErrorKind::TruncatedBody)
    }

    /// Reads exactly `len` bytes from the parent into a scratch `Vec`.
    fn read_exact_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut staging = Buffer::default();
        let got = self.parent.read(&mut staging, len)?;
        if got < len {
            return Err(Self::truncated());
        }
        let mut out = vec![0u8; len];
        staging.copy_out(&mut out);
        Ok(out)
    }

    /// Reads and parses the next chunk-size line (hex size, optional
    /// `;ext` chunk-extensions, CRLF).
    fn read_size_line(&mut self) -> Result<u64> {
        let len = self
            .parent
            .find(b'\n', SANITY_LIMIT, true)? as usize;
        let line = self.read_exact_bytes(len)?;
        let line = strip_crlf(&line);
        let hex_part = line.split(|&b| b == b';').next().unwrap_or(line);
        let hex_str = std::str::from_utf8(hex_part)
            .map_err(|_| Self::malformed("non-UTF-8 chunk size line"))?
            .trim();
        if hex_str.is_empty() {
            return Err(Self::malformed("empty chunk size line"));
        }
        let size = u64::from_str_radix(hex_str, 16)
            .map_err(|_| Self::malformed(format!("invalid chunk size {hex_str:?}")))?;
        if size > SANITY_LIMIT as u64 {
            return Err(Self::malformed(format!("oversize chunk {size}")));
        }
        Ok(size)
    }

    /// Consumes the mandatory CRLF terminating a chunk's data.
    fn consume_chunk_crlf(&mut self) -> Result {
        let bytes = self.read_exact_bytes(2)?;
        if bytes != b"\r\n" {
            return Err(Self::malformed("missing CRLF after chunk data"));
        }
        Ok(())
    }

    /// Consumes trailer header lines (kept unparsed) until the terminating
    /// empty line.
    fn consume_trailer(&mut self) -> Result {
        loop {
            let len = self.parent.find(b'\n', SANITY_LIMIT, true)? as usize;
            let line = self.read_exact_bytes(len)?;
            if strip_crlf(&line).is_empty() {
                break;
            }
        }
        Ok(())
    }
}

fn strip_crlf(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\n")
        .map(|l| l.strip_suffix(b"\r").unwrap_or(l))
        .unwrap_or(line)
}

impl<S: Stream> Stream for ChunkedStream<S> {
    fn can_read(&self) -> bool {
        self.parent.can_read()
    }

    fn can_write(&self) -> bool {
        self.parent.can_write()
    }

    fn read(&mut self, out: &mut Buffer, mut n: usize) -> Result<usize> {
        let mut total = 0;
        while n > 0 {
            match self.read_state {
                ReadState::Exhausted => break,
                ReadState::AwaitingSize => {
                    let size = self.read_size_line()?;
                    self.read_state = if size == 0 {
                        ReadState::AwaitingTrailer
                    } else {
                        ReadState::InChunk(size)
                    };
                }
                ReadState::InChunk(remaining) => {
                    let want = n.min(remaining as usize);
                    let got = self.parent.read(out, want)?;
                    if got == 0 {
                        return Err(Self::truncated());
                    }
                    total += got;
                    n -= got;
                    let remaining = remaining - got as u64;
                    self.read_state = if remaining == 0 {
                        self.consume_chunk_crlf()?;
                        ReadState::AwaitingSize
                    } else {
                        ReadState::InChunk(remaining)
                    };
                    if n == 0 {
                        break;
                    }
                }
                ReadState::AwaitingTrailer => {
                    self.consume_trailer()?;
                    self.read_state = ReadState::Exhausted;
                    break;
                }
            }
        }
        Ok(total)
    }

    fn write(&mut self, buf: &mut Buffer, n: usize) -> Result<usize> {
        if matches!(self.write_state, WriteState::Closed) {
            return Err(Error::closed(Operation::Write));
        }
        if n == 0 {
            return Ok(0);
        }
        self.parent.write_bytes(format!("{n:x}\r\n").as_bytes())?;
        let wrote = self.parent.write(buf, n)?;
        self.parent.write_bytes(b"\r\n")?;
        Ok(wrote)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        let _ = (offset, whence);
        Err(Error::unsupported(Operation::Seek))
    }

    fn close(&mut self) -> Result {
        if let WriteState::Closed = self.write_state {
            return Ok(());
        }
        self.write_state = WriteState::Closed;
        if self.parent.can_write() {
            self.parent.write_bytes(b"0\r\n\r\n")?;
        }
        self.parent.close()
    }
}
