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

use std::collections::VecDeque;

use all_asserts::debug_assert_le;

use crate::pool::{default_pool, Pool};
use crate::segment::{ReadSlice, Segment, WriteSlice};

/// A segmented byte buffer. Bytes are appended at the back and consumed
/// from the front; segments are claimed from and returned to a [`Pool`] as
/// the buffer grows and shrinks, avoiding a reallocate-and-copy on every
/// resize.
///
/// Segments are always ordered readable-before-writable: every segment with
/// `readable() > 0` precedes every segment with `readable() == 0`. The
/// first segment with `writable() > 0` is the "straddling" segment, which
/// may itself have both readable and writable bytes.
pub struct Buffer {
	segments: VecDeque<Segment>,
	read_available: usize,
	write_available: usize,
	pool: Pool,
}

impl Default for Buffer {
	fn default() -> Self {
		Self::new(default_pool())
	}
}

impl Clone for Buffer {
	/// Clones the segment list, sharing backing regions copy-on-write
	/// rather than duplicating memory.
	fn clone(&self) -> Self {
		Self {
			segments: self.segments.clone(),
			read_available: self.read_available,
			write_available: self.write_available,
			pool: self.pool.clone(),
		}
	}
}

impl Buffer {
	pub fn new(pool: Pool) -> Self {
		Self {
			segments: VecDeque::new(),
			read_available: 0,
			write_available: 0,
			pool,
		}
	}

	pub fn read_available(&self) -> usize {
		self.read_available
	}

	pub fn write_available(&self) -> usize {
		self.write_available
	}

	pub fn count(&self) -> usize {
		self.segments.len()
	}

	fn first_writable_index(&self) -> usize {
		self.segments
			.iter()
			.position(|s| s.writable() > 0)
			.unwrap_or(self.segments.len())
	}

	/// Inserts a purely-readable segment (`writable() == 0`) just before
	/// the first writable segment, preserving the readable-before-writable
	/// invariant.
	fn push_readable(&mut self, seg: Segment) {
		debug_assert_eq!(seg.writable(), 0, "push_readable: segment still has writable space");
		self.read_available += seg.readable();
		let idx = self.first_writable_index();
		self.segments.insert(idx, seg);
	}

	/// Ensures at least `n` bytes of writable space are available,
	/// over-allocating to `2n - writeAvailable` like `Buffer::reserve` in
	/// the original implementation, to amortize the cost of repeated small
	/// writes.
	pub fn reserve(&mut self, n: usize) {
		if self.write_available >= n {
			return;
		}
		let size = 2 * n - self.write_available;
		let seg = self.pool.claim(size);
		self.write_available += seg.writable();
		if self.read_available == 0 {
			self.segments.push_front(seg);
		} else {
			self.segments.push_back(seg);
		}
	}

	/// Advances the write cursor by `n`, exposing `n` more readable bytes.
	/// Requires `n <= write_available`.
	pub fn produce(&mut self, mut n: usize) {
		debug_assert_le!(n, self.write_available);
		self.read_available += n;
		self.write_available -= n;
		let mut i = self.first_writable_index();
		while n > 0 {
			let seg = &mut self.segments[i];
			let take = n.min(seg.writable());
			seg.produce(take);
			n -= take;
			if seg.writable() == 0 {
				i += 1;
			}
		}
	}

	/// Retires `n` readable bytes from the front, freeing any segment whose
	/// readable and writable space have both reached zero back to the
	/// pool. Requires `n <= read_available`.
	pub fn consume(&mut self, mut n: usize) {
		debug_assert_le!(n, self.read_available);
		self.read_available -= n;
		while n > 0 {
			let seg = self.segments.front_mut().expect("segment available to consume");
			let take = n.min(seg.readable());
			seg.consume(take);
			n -= take;
			if seg.is_empty() && seg.writable() == 0 {
				let seg = self.segments.pop_front().unwrap();
				self.pool.recycle(seg);
			}
		}
	}

	/// Discards all bytes, readable and writable, returning every segment
	/// to the pool.
	pub fn clear(&mut self) {
		self.pool.recycle_all(self.segments.drain(..));
		self.read_available = 0;
		self.write_available = 0;
	}

	/// Drops all writable capacity, shrinking the buffer to exactly its
	/// readable bytes. After this call `write_available() == 0`.
	pub fn compact(&mut self) {
		let idx = self.first_writable_index();
		if idx >= self.segments.len() {
			return;
		}
		self.write_available -= self.segments[idx].writable();
		self.segments[idx].freeze();
		if idx + 1 < self.segments.len() {
			let drained: Vec<_> = self.segments.drain(idx + 1..).collect();
			self.write_available -= drained.iter().map(Segment::writable).sum::<usize>();
			self.pool.recycle_all(drained);
		}
	}

	/// Borrows `n` readable bytes (or all of them, if `n` is `None`) as a
	/// list of slices, one per segment spanned, without copying.
	pub fn read_bufs(&self, n: Option<usize>) -> Vec<ReadSlice<'_>> {
		let mut remaining = n.unwrap_or(self.read_available);
		debug_assert_le!(remaining, self.read_available);
		let mut out = Vec::new();
		for seg in &self.segments {
			if remaining == 0 {
				break;
			}
			let take = remaining.min(seg.readable());
			if take == 0 {
				continue;
			}
			out.push(seg.read_slice(take));
			remaining -= take;
		}
		out
	}

	/// Borrows exactly `n` readable bytes as a single contiguous slice,
	/// coalescing segments into one fresh allocation if the bytes don't
	/// already live in one segment.
	pub fn read_buf(&mut self, n: usize) -> ReadSlice<'_> {
		debug_assert!(n > 0, "read_buf: n must be nonzero");
		debug_assert_le!(n, self.read_available);
		if self.segments.front().map_or(false, |s| s.readable() >= n) {
			return self.segments[0].read_slice(n);
		}
		self.coalesce();
		self.segments[0].read_slice(n)
	}

	/// Gathers every readable byte into a single fresh segment, in order.
	/// Used to satisfy `read_buf` when the requested span straddles more
	/// than one segment.
	fn coalesce(&mut self) {
		let total = self.read_available;
		let mut bytes = vec![0u8; total];
		let mut off = 0;
		for seg in &self.segments {
			let len = seg.readable();
			if len == 0 {
				continue;
			}
			seg.copy_out(&mut bytes[off..off + len]);
			off += len;
		}
		let old: Vec<_> = self.segments.drain(..).collect();
		self.write_available -= old.iter().map(Segment::writable).sum::<usize>();
		self.pool.recycle_all(old);
		let mut dest = self.pool.claim(total);
		dest.copy_in(&bytes);
		self.write_available += dest.writable();
		self.segments.push_back(dest);
	}

	/// Reserves `n` writable bytes and borrows them as a list of slices to
	/// fill in. The caller must follow up with [`Buffer::produce`] once the
	/// slices have been written to.
	pub fn write_bufs(&mut self, n: usize) -> Vec<WriteSlice<'_>> {
		self.reserve(n);
		let mut remaining = n;
		let mut out = Vec::new();
		for seg in &self.segments {
			if remaining == 0 {
				break;
			}
			let take = remaining.min(seg.writable());
			if take == 0 {
				continue;
			}
			out.push(seg.write_slice(take));
			remaining -= take;
		}
		out
	}

	/// Reserves and borrows `n` writable bytes as a single contiguous
	/// slice, compacting first if the current straddling segment doesn't
	/// have enough room. Unlike the original `writeBuf`, this reserves
	/// exactly once; the original calls `reserve` twice back-to-back, which
	/// is a harmless but pointless duplicate.
	pub fn write_buf(&mut self, n: usize) -> WriteSlice<'_> {
		let idx = self.first_writable_index();
		if idx >= self.segments.len() || self.segments[idx].writable() < n {
			self.compact();
			self.reserve(n);
		}
		let idx = self.first_writable_index();
		self.segments[idx].write_slice(n)
	}

	/// Moves up to `n` readable bytes out of `src` and into `self`,
	/// zero-copy: whole segments are handed over outright, and a
	/// partially-consumed segment is split by sharing a frozen read-only
	/// prefix while `src` keeps the remainder by simply advancing its own
	/// cursor. Returns the number of bytes moved.
	pub fn copy_in(&mut self, src: &mut Buffer, n: usize) -> usize {
		debug_assert_le!(n, src.read_available);
		let mut remaining = n;
		let mut moved = 0;
		while remaining > 0 {
			let Some(front) = src.segments.front() else { break };
			let avail = front.readable();
			if avail == 0 {
				break;
			}
			let take = avail.min(remaining);
			// A whole segment can only be handed over outright when it has no
			// writable space left; a straddling segment (readable > 0 *and*
			// writable > 0) still owns write-available capacity that belongs
			// to `src`, so it must be split by sharing a frozen read-only
			// prefix instead, same as a partial take.
			let handed_over = if take == avail && front.writable() == 0 {
				src.segments.pop_front().unwrap()
			} else {
				let seg = src.segments.front_mut().unwrap();
				let shared = seg.share(take);
				seg.consume(take);
				shared
			};
			src.read_available -= take;
			remaining -= take;
			moved += take;
			self.push_readable(handed_over);
		}
		moved
	}

	/// Copies `bytes` into a single fresh segment and appends it, leaving
	/// the source untouched (unlike [`Buffer::copy_in`], which consumes
	/// it).
	pub fn copy_in_bytes(&mut self, bytes: impl AsRef<[u8]>) {
		let bytes = bytes.as_ref();
		if bytes.is_empty() {
			return;
		}
		let mut seg = self.pool.claim(bytes.len());
		seg.copy_in(bytes);
		seg.freeze();
		self.push_readable(seg);
	}

	/// Copies exactly `dst.len()` readable bytes out, without consuming
	/// them.
	pub fn copy_out(&self, dst: &mut [u8]) {
		debug_assert_le!(dst.len(), self.read_available);
		let mut off = 0;
		for seg in &self.segments {
			if off >= dst.len() {
				break;
			}
			let len = seg.readable().min(dst.len() - off);
			if len == 0 {
				continue;
			}
			seg.copy_out(&mut dst[off..off + len]);
			off += len;
		}
	}

	/// Searches the first `limit` readable bytes (or all of them, if
	/// `limit` is `None`) for `byte`, returning the length of the span
	/// including the delimiter (so `1 + the delimiter's index`), or `None`
	/// if it wasn't found within the scanned range.
	pub fn find_delimited(&self, byte: u8, limit: Option<usize>) -> Option<usize> {
		let mut limit = limit.unwrap_or(self.read_available).min(self.read_available);
		let mut total = 0;
		for seg in &self.segments {
			if limit == 0 {
				break;
			}
			let scan = seg.readable().min(limit);
			if let Some(pos) = seg.find(byte, scan) {
				return Some(total + pos + 1);
			}
			total += scan;
			limit -= scan;
		}
		None
	}
}

