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
use crate::segment::SEGMENT_SIZE;
use crate::stream::{Stream, Whence};

/// Wraps a parent stream with a read-ahead buffer, synthesizing
/// `find_delimited` support for parents that don't have it of their own.
pub struct BufferedStream<S> {
    parent: S,
    buf: Buffer,
    read_ahead: usize,
    allow_partial_reads: bool,
    closed: bool,
}

impl<S: Stream> BufferedStream<S> {
    pub fn new(parent: S) -> Self {
        Self {
            parent,
            buf: Buffer::default(),
            read_ahead: SEGMENT_SIZE,
            allow_partial_reads: false,
            closed: false,
        }
    }

    pub fn with_read_ahead(mut self, n: usize) -> Self {
        self.read_ahead = n;
        self
    }

    /// When set, `read` may return fewer bytes than requested as soon as it
    /// has at least one, rather than blocking the parent for more. Mirrors
    /// `BufferedStream::allowPartialReads` in the original, which
    /// `HTTP::Connection`'s constructor sets whenever it has to synthesize
    /// delimiter search over a parent that can't do it natively.
    pub fn allow_partial_reads(mut self, yes: bool) -> Self {
        self.allow_partial_reads = yes;
        self
    }

    /// Tops up the internal buffer by reading at least `want` bytes (but
    /// never less than the configured read-ahead) from the parent.
    fn fill(&mut self, want: usize) -> Result<usize> {
        let target = want.max(self.read_ahead);
        self.parent.read(&mut self.buf, target)
    }
}

impl<S: Stream> Stream for BufferedStream<S> {
    fn can_read(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        self.parent.can_write()
    }

    fn can_seek(&self) -> bool {
        self.parent.can_seek()
    }

    fn can_size(&self) -> bool {
        self.parent.can_size()
    }

    fn can_truncate(&self) -> bool {
        self.parent.can_truncate()
    }

    fn can_find_delimited(&self) -> bool {
        true
    }

    fn read(&mut self, out: &mut Buffer, n: usize) -> Result<usize> {
        if self.closed {
            return Err(Error::closed(Operation::Read));
        }
        let mut got = 0;
        loop {
            if self.buf.read_available() > 0 {
                let take = (n - got).min(self.buf.read_available());
                got += out.copy_in(&mut self.buf, take);
            }
            if got >= n || (self.allow_partial_reads && got > 0) {
                break;
            }
            if self.fill(n - got)? == 0 {
                break;
            }
        }
        Ok(got)
    }

    fn write(&mut self, buf: &mut Buffer, n: usize) -> Result<usize> {
        self.parent.write(buf, n)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.buf.clear();
        self.parent.seek(offset, whence)
    }

    fn size(&self) -> Result<u64> {
        self.parent.size()
    }

    fn truncate(&mut self, n: u64) -> Result {
        self.parent.truncate(n)
    }

    fn find(&mut self, byte: u8, sanity_limit: usize, throw_if_missing: bool) -> Result<i64> {
        loop {
            if let Some(pos) = self.buf.find_delimited(byte, Some(sanity_limit)) {
                return Ok(pos as i64);
            }
            if self.buf.read_available() >= sanity_limit {
                return if throw_if_missing {
                    Err(Error::new(Operation::Find, ErrorKind::DelimiterNotFound))
                } else {
                    Ok(-1)
                };
            }
            let before = self.buf.read_available();
            if self.fill(sanity_limit - before)? == 0 {
                return if throw_if_missing {
                    Err(Error::new(Operation::Find, ErrorKind::DelimiterNotFound))
                } else {
                    Ok(-1)
                };
            }
        }
    }

    fn close(&mut self) -> Result {
        if !self.closed {
            self.closed = true;
            self.buf.clear();
            self.parent.close()?;
        }
        Ok(())
    }
}
