use circular_deque::CircularBuffer;
use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use std::collections::VecDeque;

const SIZES: [usize; 3] = [1_000, 100_000, 1_000_000];

pub fn run(c: &mut Criterion) {
    let mut group = c.benchmark_group("growth");
    group.warm_up_time(std::time::Duration::from_millis(500));
    group.sample_size(20);

    for &n in &SIZES {
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("CircularBuffer/push_back", n), &n, |b, &n| {
            b.iter(|| {
                let mut buf = CircularBuffer::new();
                for i in 0..n {
                    buf.push_back(black_box(i));
                }
                black_box(buf);
            })
        });

        group.bench_with_input(BenchmarkId::new("VecDeque/push_back", n), &n, |b, &n| {
            b.iter(|| {
                let mut deque = VecDeque::new();
                for i in 0..n {
                    deque.push_back(black_box(i));
                }
                black_box(deque);
            })
        });

        // Alternating ends keeps the live region wrapped through every doubling.
        group.bench_with_input(BenchmarkId::new("CircularBuffer/alternating", n), &n, |b, &n| {
            b.iter(|| {
                let mut buf = CircularBuffer::new();
                for i in 0..n {
                    if i % 2 == 0 {
                        buf.push_back(black_box(i));
                    } else {
                        buf.push_front(black_box(i));
                    }
                }
                black_box(buf);
            })
        });
    }

    group.finish();
}
