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
use crate::error::{Error, Operation, Result};

/// A seek origin, mirroring `std::io::SeekFrom` but usable without pulling
/// in the whole `std::io` stream model.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Whence {
    Begin,
    Current,
    End,
}

impl From<std::io::SeekFrom> for Whence {
    fn from(from: std::io::SeekFrom) -> Self {
        match from {
            std::io::SeekFrom::Start(_) => Whence::Begin,
            std::io::SeekFrom::Current(_) => Whence::Current,
            std::io::SeekFrom::End(_) => Whence::End,
        }
    }
}

/// A stream advertises which capabilities it supports through boolean
/// queries, and implements only the operations it claims. Every operation
/// defaults to `Unsupported`, so a stream need only override what it
/// actually does.
pub trait Stream {
    fn can_read(&self) -> bool {
        false
    }

    fn can_write(&self) -> bool {
        false
    }

    fn can_seek(&self) -> bool {
        false
    }

    fn can_size(&self) -> bool {
        false
    }

    fn can_truncate(&self) -> bool {
        false
    }

    fn can_find_delimited(&self) -> bool {
        false
    }

    /// Reads up to `n` bytes into `buf`, returning the number actually
    /// read. `0` signals an orderly end of stream, not an error.
    fn read(&mut self, buf: &mut Buffer, n: usize) -> Result<usize> {
        let _ = (buf, n);
        Err(Error::unsupported(Operation::Read))
    }

    /// Writes up to `n` bytes from `buf`, returning the number actually
    /// written.
    fn write(&mut self, buf: &mut Buffer, n: usize) -> Result<usize> {
        let _ = (buf, n);
        Err(Error::unsupported(Operation::Write))
    }

    /// Convenience wrapper writing a byte slice directly, for streams that
    /// need to emit a small fixed payload (a chunk-size line, a trailer)
    /// without a caller-managed `Buffer`.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize> {
        let mut buf = Buffer::default();
        buf.copy_in_bytes(bytes);
        self.write(&mut buf, bytes.len())
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        let _ = (offset, whence);
        Err(Error::unsupported(Operation::Seek))
    }

    fn size(&self) -> Result<u64> {
        Err(Error::unsupported(Operation::Size))
    }

    fn truncate(&mut self, n: u64) -> Result {
        let _ = n;
        Err(Error::unsupported(Operation::Truncate))
    }

    /// Searches for `byte` within the first `sanity_limit` unread bytes,
    /// returning the length of the span up to and including the delimiter.
    /// If the delimiter isn't found within the limit: returns `Ok(-1)` when
    /// `throw_if_missing` is `false`, else an error.
    fn find(&mut self, byte: u8, sanity_limit: usize, throw_if_missing: bool) -> Result<i64> {
        let _ = (byte, sanity_limit, throw_if_missing);
        Err(Error::unsupported(Operation::Find))
    }

    /// Closes the stream. Idempotent: a stream that's already closed
    /// returns `Ok(())` on a second call instead of erroring.
    fn close(&mut self) -> Result {
        Ok(())
    }
}

impl<S: Stream + ?Sized> Stream for Box<S> {
    fn can_read(&self) -> bool {
        (**self).can_read()
    }

    fn can_write(&self) -> bool {
        (**self).can_write()
    }

    fn can_seek(&self) -> bool {
        (**self).can_seek()
    }

    fn can_size(&self) -> bool {
        (**self).can_size()
    }

    fn can_truncate(&self) -> bool {
        (**self).can_truncate()
    }

    fn can_find_delimited(&self) -> bool {
        (**self).can_find_delimited()
    }

    fn read(&mut self, buf: &mut Buffer, n: usize) -> Result<usize> {
        (**self).read(buf, n)
    }

    fn write(&mut self, buf: &mut Buffer, n: usize) -> Result<usize> {
        (**self).write(buf, n)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        (**self).seek(offset, whence)
    }

    fn size(&self) -> Result<u64> {
        (**self).size()
    }

    fn truncate(&mut self, n: u64) -> Result {
        (**self).truncate(n)
    }

    fn find(&mut self, byte: u8, sanity_limit: usize, throw_if_missing: bool) -> Result<i64> {
        (**self).find(byte, sanity_limit, throw_if_missing)
    }

    fn close(&mut self) -> Result {
        (**self).close()
    }
}

impl<S: Stream + ?Sized> Stream for &mut S {
    fn can_read(&self) -> bool {
        (**self).can_read()
    }

    fn can_write(&self) -> bool {
        (**self).can_write()
    }

    fn can_seek(&self) -> bool {
        (**self).can_seek()
    }

    fn can_size(&self) -> bool {
        (**self).can_size()
    }

    fn can_truncate(&self) -> bool {
        (**self).can_truncate()
    }

    fn can_find_delimited(&self) -> bool {
        (**self).can_find_delimited()
    }

    fn read(&mut self, buf: &mut Buffer, n: usize) -> Result<usize> {
        (**self).read(buf, n)
    }

    fn write(&mut self, buf: &mut Buffer, n: usize) -> Result<usize> {
        (**self).write(buf, n)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        (**self).seek(offset, whence)
    }

    fn size(&self) -> Result<u64> {
        (**self).size()
    }

    fn truncate(&mut self, n: u64) -> Result {
        (**self).truncate(n)
    }

    fn find(&mut self, byte: u8, sanity_limit: usize, throw_if_missing: bool) -> Result<i64> {
        (**self).find(byte, sanity_limit, throw_if_missing)
    }

    fn close(&mut self) -> Result {
        (**self).close()
    }
}
