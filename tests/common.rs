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

#![allow(dead_code)]

use std::fmt::{Arguments, Debug};

use estuary::error::{Error, ErrorKind, Operation};
use estuary::{Buffer, Result, Stream};

/// An in-memory stream backed by one buffer of bytes to read and a `Vec`
/// collecting whatever gets written, standing in for a socket in stream
/// chain tests.
pub struct MemoryStream {
	input: Buffer,
	pub written: Vec<u8>,
	closed: bool,
}

impl MemoryStream {
	pub fn new(input: impl AsRef<[u8]>) -> Self {
		let mut buf = Buffer::default();
		buf.copy_in_bytes(input);
		Self { input: buf, written: Vec::new(), closed: false }
	}

	pub fn is_closed(&self) -> bool {
		self.closed
	}
}

impl Stream for MemoryStream {
	fn can_read(&self) -> bool {
		true
	}

	fn can_write(&self) -> bool {
		true
	}

	fn can_find_delimited(&self) -> bool {
		true
	}

	fn read(&mut self, out: &mut Buffer, n: usize) -> Result<usize> {
		if self.closed {
			return Err(Error::closed(Operation::Read));
		}
		let want = n.min(self.input.read_available());
		Ok(out.copy_in(&mut self.input, want))
	}

	fn write(&mut self, buf: &mut Buffer, n: usize) -> Result<usize> {
		if self.closed {
			return Err(Error::closed(Operation::Write));
		}
		let want = n.min(buf.read_available());
		let mut tmp = vec![0u8; want];
		buf.copy_out(&mut tmp);
		buf.consume(want);
		self.written.extend_from_slice(&tmp);
		Ok(want)
	}

	fn find(&mut self, byte: u8, sanity_limit: usize, throw_if_missing: bool) -> Result<i64> {
		match self.input.find_delimited(byte, Some(sanity_limit)) {
			Some(pos) => Ok(pos as i64),
			None if throw_if_missing => {
				Err(Error::new(Operation::Find, ErrorKind::DelimiterNotFound))
			}
			None => Ok(-1),
		}
	}

	fn close(&mut self) -> Result {
		self.closed = true;
		Ok(())
	}
}

#[macro_export]
macro_rules! qc_assert_eq {
	($left:expr,$right:expr) => {{
		let left = $left;
		let right = $right;
		if left == right {
			TestResult::passed()
		} else {
			TestResult::error(
				common::format_qc_assert_error(&left, &right, None)
			)
		}
	}};
    ($left:expr,$right:expr,$($arg:tt)+) => {{
		let left = $left;
		let right = $right;
		if left == right {
			TestResult::passed()
		} else {
			TestResult::error(
				common::format_qc_assert_error(&left, &right, Some(format_args!($($arg)+)))
			)
		}
	}};
}

pub fn format_qc_assert_error<L: Debug, R: Debug>(left: &L, right: &R, msg: Option<Arguments>) -> String {
	if let Some(msg) = msg {
		format!(
			"assertion failed `(left == right)`: {msg}\n \
			left: `{left:?}`,\nright: `{right:?}`",
		)
	} else {
		format!(
			"assertion failed `(left == right)`:\n \
			left: `{left:?}`,\nright: `{right:?}`",
		)
	}
}
