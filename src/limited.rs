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

/// Bounds a parent stream to exactly `limit` bytes, reporting end-of-stream
/// once that many have passed through and an error if the parent runs dry
/// first. Used for `Content-Length`-framed bodies; the original left this
/// as a `// TODO: LimitedStream` stub.
pub struct LimitedStream<S> {
    parent: S,
    remaining: u64,
}

impl<S: Stream> LimitedStream<S> {
    pub fn new(parent: S, limit: u64) -> Self {
        Self { parent, remaining: limit }
    }
}

impl<S: Stream> Stream for LimitedStream<S> {
    fn can_read(&self) -> bool {
        self.parent.can_read()
    }

    fn can_write(&self) -> bool {
        self.parent.can_write()
    }

    fn can_seek(&self) -> bool {
        self.parent.can_seek()
    }

    fn read(&mut self, out: &mut Buffer, n: usize) -> Result<usize> {
        if self.remaining == 0 {
            return Ok(0);
        }
        let want = (n as u64).min(self.remaining) as usize;
        let got = self.parent.read(out, want)?;
        if got == 0 {
            return Err(Error::new(Operation::Frame, ErrorKind::TruncatedBody));
        }
        self.remaining -= got as u64;
        Ok(got)
    }

    fn write(&mut self, buf: &mut Buffer, n: usize) -> Result<usize> {
        let want = (n as u64).min(self.remaining) as usize;
        let wrote = self.parent.write(buf, want)?;
        self.remaining -= wrote as u64;
        Ok(wrote)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.parent.seek(offset, whence)
    }

    fn close(&mut self) -> Result {
        self.parent.close()
    }
}
