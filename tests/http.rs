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
use estuary::http::{get_stream, has_message_body, EntityHeaders, GeneralHeaders, Method, TransferCoding};
use estuary::{Buffer, Cache, CacheKey, OnDone, Stream};

fn headers() -> (GeneralHeaders, EntityHeaders) {
	(GeneralHeaders::default(), EntityHeaders::default())
}

#[test]
fn get_request_has_no_body() {
	let (general, entity) = headers();
	assert!(!has_message_body(&general, &entity, &Method::Get, None));
}

#[test]
fn post_with_content_length_has_a_body() {
	let (general, mut entity) = headers();
	entity.content_length = Some(5);
	assert!(has_message_body(&general, &entity, &Method::Post, None));
}

#[test]
fn a_204_response_never_has_a_body_even_with_content_length() {
	let (general, mut entity) = headers();
	entity.content_length = Some(5);
	assert!(!has_message_body(&general, &entity, &Method::Get, Some(204)));
}

#[test]
fn reading_a_content_length_framed_body_stops_exactly_at_the_limit_and_fires_on_done() {
	let (mut general, mut entity) = headers();
	general.transfer_encoding.push(TransferCoding::identity("identity"));
	entity.content_length = Some(5);

	let mut conn = MemoryStream::new(b"helloXXXXX");
	let fired = Rc::new(RefCell::new(false));
	let fired2 = Rc::clone(&fired);
	let on_done = OnDone::new(move || *fired2.borrow_mut() = true);

	let mut stream = get_stream(&mut conn, &general, &entity, &Method::Post, None, on_done).unwrap();

	let mut out = Buffer::default();
	let got = stream.read(&mut out, 1024).unwrap();
	assert_eq!(got, 5);
	let mut bytes = vec![0u8; 5];
	out.copy_out(&mut bytes);
	assert_eq!(&bytes, b"hello");

	let got = stream.read(&mut out, 1024).unwrap();
	assert_eq!(got, 0);
	assert!(*fired.borrow(), "on_done must fire once the body is fully read");
}

#[test]
fn reading_a_chunked_response_body_decodes_every_chunk_and_fires_on_done() {
	let (mut general, entity) = headers();
	general.transfer_encoding.push(TransferCoding::identity("chunked"));

	let mut conn = MemoryStream::new(b"5\r\nhello\r\n0\r\n\r\n");
	let fired = Rc::new(RefCell::new(false));
	let fired2 = Rc::clone(&fired);
	let on_done = OnDone::new(move || *fired2.borrow_mut() = true);

	let mut stream = get_stream(&mut conn, &general, &entity, &Method::Get, Some(200), on_done).unwrap();

	let mut out = Buffer::default();
	let got = stream.read(&mut out, 1024).unwrap();
	assert_eq!(got, 5);
	let mut bytes = vec![0u8; 5];
	out.copy_out(&mut bytes);
	assert_eq!(&bytes, b"hello");

	let got = stream.read(&mut out, 1024).unwrap();
	assert_eq!(got, 0, "the trailer and terminating chunk were already consumed above");
	assert!(*fired.borrow());
}

#[test]
fn reading_a_close_delimited_body_reads_until_eof_and_requires_connection_close() {
	let (mut general, entity) = headers();
	general.connection.insert("close".to_string());

	let mut conn = MemoryStream::new(b"the rest of the connection");
	let fired = Rc::new(RefCell::new(false));
	let fired2 = Rc::clone(&fired);
	let on_done = OnDone::new(move || *fired2.borrow_mut() = true);

	let mut stream = get_stream(&mut conn, &general, &entity, &Method::Get, Some(200), on_done).unwrap();

	let mut out = Buffer::default();
	let got = stream.read(&mut out, 1024).unwrap();
	assert_eq!(got, 26);
	assert_eq!(stream.read(&mut out, 1024).unwrap(), 0);
	assert!(*fired.borrow());
}

#[test]
fn a_close_delimited_body_without_connection_close_is_rejected() {
	let (general, entity) = headers();
	// No "close" token and no Content-Length/Transfer-Encoding: framing is
	// ambiguous, which the original treats as a caller error.
	let mut conn = MemoryStream::new(b"anything");
	let on_done = OnDone::new(|| {});

	let err = get_stream(&mut conn, &general, &entity, &Method::Get, Some(200), on_done).unwrap_err();
	assert!(matches!(err.kind(), estuary::ErrorKind::MissingCloseForDelimitedBody));
}

#[test]
fn an_unknown_transfer_coding_is_rejected() {
	let (mut general, entity) = headers();
	general.transfer_encoding.push(TransferCoding::identity("bogus"));
	let mut conn = MemoryStream::new(b"");
	let on_done = OnDone::new(|| {});

	let err = get_stream(&mut conn, &general, &entity, &Method::Get, Some(200), on_done).unwrap_err();
	assert!(matches!(err.kind(), estuary::ErrorKind::UnknownTransferCoding(_)));
}

struct NegotiatedKeepAlive;

impl CacheKey for NegotiatedKeepAlive {
	type Value = bool;
}

#[test]
fn cache_round_trips_a_typed_value_per_connection() {
	let cache = Cache::new();
	assert_eq!(cache.get::<NegotiatedKeepAlive>(), None);

	cache.set::<NegotiatedKeepAlive>(true);
	assert_eq!(cache.get::<NegotiatedKeepAlive>(), Some(true));

	cache.remove::<NegotiatedKeepAlive>();
	assert_eq!(cache.get::<NegotiatedKeepAlive>(), None);
}
