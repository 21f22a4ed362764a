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

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::MemoryStream;
use estuary::{Buffer, BufferedStream, FilterStream, LimitedStream, NotifyStream, Stream};

#[test]
fn filter_stream_forwards_reads_and_writes_unchanged() {
	let mut parent = MemoryStream::new(b"hello");
	let mut filter = FilterStream::borrowed(&mut parent);

	let mut out = Buffer::default();
	let got = filter.read(&mut out, 5).unwrap();
	assert_eq!(got, 5);

	let mut bytes = vec![0u8; 5];
	out.copy_out(&mut bytes);
	assert_eq!(&bytes, b"hello");
}

#[test]
fn filter_stream_owned_forwards_close_to_its_parent() {
	let parent = MemoryStream::new(b"");
	let mut owned = FilterStream::owned(parent);
	owned.close().unwrap();

	let mut parent = owned.into_parent();
	// Closing a `MemoryStream` twice is a no-op success, not an error, so
	// this only proves the close actually reached the parent: a stream
	// that rejects reads once closed would error here if it hadn't.
	assert!(matches!(
		parent.read(&mut Buffer::default(), 1).unwrap_err().kind(),
		estuary::ErrorKind::Closed
	));
}

#[test]
fn buffered_stream_synthesizes_find_delimited() {
	let parent = MemoryStream::new(b"line one\nline two\n");
	// `MemoryStream` already supports `find`, but `BufferedStream` should
	// work identically whether or not the parent can.
	let mut buffered = BufferedStream::new(parent);

	assert!(buffered.can_find_delimited());
	let len = buffered.find(b'\n', 1 << 16, true).unwrap();
	assert_eq!(len, 9);

	let mut out = Buffer::default();
	let got = buffered.read(&mut out, len as usize).unwrap();
	assert_eq!(got, 9);
	let mut bytes = vec![0u8; got];
	out.copy_out(&mut bytes);
	assert_eq!(&bytes, b"line one\n");
}

#[test]
fn buffered_stream_allows_partial_reads_when_configured() {
	let parent = MemoryStream::new(b"abc");
	let mut buffered = BufferedStream::new(parent)
		.with_read_ahead(1)
		.allow_partial_reads(true);

	let mut out = Buffer::default();
	let got = buffered.read(&mut out, 100).unwrap();
	assert!(got > 0 && got <= 3);
}

#[test]
fn limited_stream_reports_eof_after_its_limit() {
	let parent = MemoryStream::new(b"hello world");
	let mut limited = LimitedStream::new(parent, 5);

	let mut out = Buffer::default();
	let got = limited.read(&mut out, 100).unwrap();
	assert_eq!(got, 5);

	let got = limited.read(&mut out, 100).unwrap();
	assert_eq!(got, 0);
}

#[test]
fn limited_stream_errors_if_parent_runs_dry_early() {
	let parent = MemoryStream::new(b"hi");
	let mut limited = LimitedStream::new(parent, 5);

	let mut out = Buffer::default();
	let got = limited.read(&mut out, 5).unwrap();
	assert_eq!(got, 2, "first read drains everything the parent actually has");

	let err = limited.read(&mut out, 5).unwrap_err();
	assert!(matches!(err.kind(), estuary::ErrorKind::TruncatedBody));
}

#[test]
fn notify_stream_fires_on_eof_exactly_once() {
	let parent = MemoryStream::new(b"hi");
	let fired = Rc::new(RefCell::new(0));
	let fired2 = Rc::clone(&fired);
	let mut notify = NotifyStream::new(parent).on_eof(move || *fired2.borrow_mut() += 1);

	let mut out = Buffer::default();
	notify.read(&mut out, 2).unwrap();
	assert_eq!(*fired.borrow(), 0);

	notify.read(&mut out, 2).unwrap();
	assert_eq!(*fired.borrow(), 1);

	notify.read(&mut out, 2).unwrap();
	assert_eq!(*fired.borrow(), 1);
}

#[test]
fn notify_stream_shares_a_callback_between_eof_and_close() {
	use estuary::OnDone;

	let parent = MemoryStream::new(b"");
	let fired = Rc::new(RefCell::new(0));
	let fired_eof = Rc::clone(&fired);
	let done = OnDone::new(move || *fired_eof.borrow_mut() += 1);
	let done2 = done.clone();

	let mut notify = NotifyStream::new(parent)
		.on_eof(move || done.fire())
		.on_close(move || done2.fire());

	let mut out = Buffer::default();
	notify.read(&mut out, 1).unwrap();
	assert_eq!(*fired.borrow(), 1);

	notify.close().unwrap();
	assert_eq!(*fired.borrow(), 1, "on_close must not fire the shared callback twice");
}
