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
use crate::error::Result;
use crate::stream::{Stream, Whence};

/// A stream that forwards every operation to a parent stream unchanged.
/// Exists on its own (not just as a base for other wrappers) to isolate a
/// borrowed stream's lifetime: wrapping a `&mut dyn Stream` in a
/// `FilterStream` lets the rest of a stream chain be built, used, and
/// dropped as an owned value without dropping the thing it borrows from.
///
/// Ownership is expressed through the type parameter rather than a runtime
/// flag: `FilterStream::owned` produces a `FilterStream<Box<dyn Stream>>`,
/// whose `Drop` closes and discards the parent; `FilterStream::borrowed`
/// produces a `FilterStream<&mut dyn Stream>`, which never touches the
/// parent's ownership at all.
pub struct FilterStream<S> {
    parent: S,
}

impl<'a> FilterStream<Box<dyn Stream + 'a>> {
    pub fn owned(parent: impl Stream + 'a) -> Self {
        Self { parent: Box::new(parent) }
    }
}

impl<'a> FilterStream<&'a mut dyn Stream> {
    pub fn borrowed(parent: &'a mut dyn Stream) -> Self {
        Self { parent }
    }
}

impl<S> FilterStream<S> {
    pub fn into_parent(self) -> S {
        self.parent
    }
}

impl<S: Stream> Stream for FilterStream<S> {
    fn can_read(&self) -> bool {
        self.parent.can_read()
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
        self.parent.can_find_delimited()
    }

    fn read(&mut self, buf: &mut Buffer, n: usize) -> Result<usize> {
        self.parent.read(buf, n)
    }

    fn write(&mut self, buf: &mut Buffer, n: usize) -> Result<usize> {
        self.parent.write(buf, n)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.parent.seek(offset, whence)
    }

    fn size(&self) -> Result<u64> {
        self.parent.size()
    }

    fn truncate(&mut self, n: u64) -> Result {
        self.parent.truncate(n)
    }

    fn find(&mut self, byte: u8, sanity_limit: usize, throw_if_missing: bool) -> Result<i64> {
        self.parent.find(byte, sanity_limit, throw_if_missing)
    }

    fn close(&mut self) -> Result {
        self.parent.close()
    }
}
