//! Performance benchmarks for nett.
//!
//! Run with: `cargo bench`

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use nett::{Connection, DataHandler, Framer, LineFramer};
use std::io::Cursor;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

// =============================================================================
// Line Framing Benchmarks
// =============================================================================

fn create_lines(count: usize, line_len: usize) -> Vec<u8> {
    let mut line = vec![b'a'; line_len - 1];
    line.push(b'\n');
    line.repeat(count)
}

fn bench_line_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_framing");
    let rt = Runtime::new().unwrap();

    let sizes = [
        ("short_16b", 16),
        ("medium_1kb", 1024),
        ("long_16kb", 16 * 1024),
    ];
    for (name, line_len) in sizes {
        let count = 64;
        let data = create_lines(count, line_len);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                rt.block_on(async {
                    let mut reader = Cursor::new(black_box(&data[..]));
                    let mut framer = LineFramer::new();
                    for _ in 0..count {
                        black_box(framer.read_frame(&mut reader).await.unwrap());
                    }
                })
            })
        });
    }

    group.finish();
}

// =============================================================================
// Connection Round-Trip Benchmarks
// =============================================================================

fn bench_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_trip");
    let rt = Runtime::new().unwrap();

    let (a, b, mut rx) = rt.block_on(async {
        let (left, right) = tokio::io::duplex(64 * 1024);
        let a = Connection::wrap(left, LineFramer::new());
        let b = Connection::wrap(right, LineFramer::new());

        let (tx, rx) = mpsc::unbounded_channel();
        b.on_data(DataHandler::new(move |_conn, data| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(data);
            }
        }));
        (a, b, rx)
    });

    for (name, line_len) in [("send_64b", 64), ("send_4kb", 4096)] {
        let message = create_lines(1, line_len);

        group.throughput(Throughput::Bytes(line_len as u64));
        group.bench_function(name, |bench| {
            bench.iter(|| {
                rt.block_on(async {
                    a.send(black_box(&message)).await.unwrap();
                    black_box(rx.recv().await.unwrap());
                })
            })
        });
    }

    group.bench_function("send_async_64b", |bench| {
        let message = bytes::Bytes::from(create_lines(1, 64));
        bench.iter(|| {
            rt.block_on(async {
                a.send_async(message.clone());
                black_box(rx.recv().await.unwrap());
            })
        })
    });

    rt.block_on(async {
        a.close().await;
        b.close().await;
    });
    group.finish();
}

criterion_group!(benches, bench_line_framing, bench_round_trip);
criterion_main!(benches);
