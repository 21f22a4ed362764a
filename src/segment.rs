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

use std::cell::{Ref, RefCell, RefMut};
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use all_asserts::debug_assert_le;

/// Default capacity of a freshly allocated [`Segment`], in bytes.
pub const SEGMENT_SIZE: usize = 8192;

type Region = Rc<RefCell<Box<[u8]>>>;

/// A contiguous, reference-counted byte region with a write cursor
/// separating readable bytes `[start, write)` from writable bytes
/// `[write, cap)`.
///
/// Sharing a prefix of a segment (see [`Segment::share`]) clones the `Rc`
/// onto the same backing region with its own, frozen `(start, write, cap)`
/// window. The two handles never alias a cursor, only the allocation, so
/// splitting off a shared read-only slice of a still-writable segment needs
/// no extra bookkeeping beyond advancing the source's own `start`.
#[derive(Clone)]
pub struct Segment {
    region: Region,
    start: usize,
    write: usize,
    cap: usize,
}

impl Segment {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            region: Rc::new(RefCell::new(vec![0u8; cap].into_boxed_slice())),
            start: 0,
            write: 0,
            cap,
        }
    }

    /// Bytes available to read, `[start, write)`.
    pub fn readable(&self) -> usize {
        self.write - self.start
    }

    /// Bytes available to write, `[write, cap)`.
    pub fn writable(&self) -> usize {
        self.cap - self.write
    }

    pub fn is_empty(&self) -> bool {
        self.readable() == 0
    }

    /// The backing region's true size, which may exceed `cap` if this
    /// segment shares a region with another that was frozen early.
    pub fn capacity(&self) -> usize {
        self.region.borrow().len()
    }

    /// Whether another handle shares this segment's backing region.
    pub fn is_shared(&self) -> bool {
        Rc::strong_count(&self.region) > 1
    }

    /// Advances the write cursor by `n`, exposing `n` more readable bytes.
    pub fn produce(&mut self, n: usize) {
        debug_assert_le!(n, self.writable());
        self.write += n;
    }

    /// Retires `n` readable bytes from the front.
    pub fn consume(&mut self, n: usize) {
        debug_assert_le!(n, self.readable());
        self.start += n;
    }

    /// Discards this segment's writable capacity in place, freezing it as
    /// read-only. Used by `Buffer::compact` on the straddling segment.
    pub fn freeze(&mut self) {
        self.cap = self.write;
    }

    /// Resets cursors to reuse the whole backing allocation fresh. Only
    /// sound when no other handle can still observe the old cursors, which
    /// the pool enforces by refusing to recycle a shared segment.
    pub fn reset(&mut self) {
        self.start = 0;
        self.write = 0;
        self.cap = self.capacity();
    }

    /// A read-only copy of this handle covering just its first `len`
    /// readable bytes, sharing the backing allocation rather than copying
    /// it.
    pub fn share(&self, len: usize) -> Self {
        debug_assert_le!(len, self.readable());
        Self {
            region: Rc::clone(&self.region),
            start: self.start,
            write: self.start + len,
            cap: self.start + len,
        }
    }

    /// Borrows up to `len` readable bytes starting at `start`.
    pub fn read_slice(&self, len: usize) -> ReadSlice<'_> {
        debug_assert_le!(len, self.readable());
        ReadSlice {
            guard: self.region.borrow(),
            start: self.start,
            end: self.start + len,
        }
    }

    /// Borrows `len` writable bytes starting at the write cursor. Does not
    /// itself advance the cursor; the caller must follow up with a matching
    /// `produce` once the bytes are filled in.
    pub fn write_slice(&self, len: usize) -> WriteSlice<'_> {
        debug_assert_le!(len, self.writable());
        WriteSlice {
            guard: self.region.borrow_mut(),
            start: self.write,
            end: self.write + len,
        }
    }

    pub fn copy_out(&self, dst: &mut [u8]) {
        debug_assert!(dst.len() <= self.readable());
        let src = self.region.borrow();
        dst.copy_from_slice(&src[self.start..self.start + dst.len()]);
    }

    /// Copies as many bytes of `src` as fit in the writable region, in
    /// order, advancing the write cursor. Returns the number copied.
    pub fn copy_in(&mut self, src: &[u8]) -> usize {
        let n = src.len().min(self.writable());
        self.region.borrow_mut()[self.write..self.write + n].copy_from_slice(&src[..n]);
        self.write += n;
        n
    }

    /// Index of `byte` within the first `limit` readable bytes, relative to
    /// the start of the readable region.
    pub fn find(&self, byte: u8, limit: usize) -> Option<usize> {
        let region = self.region.borrow();
        let scan = limit.min(self.readable());
        region[self.start..self.start + scan].iter().position(|&b| b == byte)
    }
}

/// A borrowed, read-only window into a [`Segment`]'s backing region.
pub struct ReadSlice<'a> {
    guard: Ref<'a, Box<[u8]>>,
    start: usize,
    end: usize,
}

impl Deref for ReadSlice<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.guard[self.start..self.end]
    }
}

/// A borrowed, mutable window into a [`Segment`]'s backing region.
pub struct WriteSlice<'a> {
    guard: RefMut<'a, Box<[u8]>>,
    start: usize,
    end: usize,
}

impl Deref for WriteSlice<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.guard[self.start..self.end]
    }
}

impl DerefMut for WriteSlice<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.guard[self.start..self.end]
    }
}
