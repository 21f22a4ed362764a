// SPDX-License-Identifier: Apache-2.0

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Bencher, Criterion};
use estuary::Buffer;

const DATA_LEN: usize = 256 * 1024;

fn data() -> Vec<u8> {
	(0..DATA_LEN).map(|i| (i % 251) as u8).collect()
}

fn write_bytes(c: &mut Criterion) {
	let data = data();
	c.bench_function("write_bytes", |b| {
		b.iter(|| {
			let mut buf = Buffer::default();
			buf.copy_in_bytes(black_box(&data));
			buf
		})
	});
}

#[inline(always)]
fn read_loop<R>(b: &mut Bencher, buf: &Buffer, read: impl FnMut(&mut Buffer) -> R) {
	b.iter_batched_ref(|| buf.clone(), read, BatchSize::SmallInput)
}

fn read_buf(c: &mut Criterion) {
	let mut buffer = Buffer::default();
	buffer.copy_in_bytes(data());
	c.bench_function("read_buf", |b| {
		read_loop(b, &buffer, |buf| buf.read_buf(DATA_LEN).len())
	});
}

fn consume(c: &mut Criterion) {
	let mut group = c.benchmark_group("consume");
	let mut buffer = Buffer::default();
	buffer.copy_in_bytes(data());

	group.bench_function("consume all", |b| read_loop(b, &buffer, |buf| buf.consume(DATA_LEN)));
	group.bench_function("consume partial", |b| read_loop(b, &buffer, |buf| buf.consume(4096)));
	group.finish();
}

fn copy_in(c: &mut Criterion) {
	let mut group = c.benchmark_group("copy_in");
	let mut buffer = Buffer::default();
	buffer.copy_in_bytes(data());

	group.bench_function("whole buffer", |b| {
		b.iter_batched_ref(
			|| (buffer.clone(), Buffer::default()),
			|(src, dst)| dst.copy_in(src, DATA_LEN),
			BatchSize::SmallInput,
		)
	});
	group.bench_function("half buffer", |b| {
		b.iter_batched_ref(
			|| (buffer.clone(), Buffer::default()),
			|(src, dst)| dst.copy_in(src, DATA_LEN / 2),
			BatchSize::SmallInput,
		)
	});
	group.finish();
}

fn find_delimited(c: &mut Criterion) {
	let mut buffer = Buffer::default();
	let mut data = data();
	data[DATA_LEN / 2] = b'\n';
	buffer.copy_in_bytes(data);

	c.bench_function("find_delimited", |b| b.iter(|| buffer.find_delimited(b'\n', None)));
}

criterion_group!(write, write_bytes);
criterion_group!(read, read_buf, consume, copy_in, find_delimited);
criterion_main!(write, read);
