use super::XorShift64;
use circular_deque::CircularBuffer;
use criterion::{black_box, BatchSize, Criterion};
use std::collections::VecDeque;

const LEN: usize = 10_000;
const OPS: usize = 1_000;

pub fn run(c: &mut Criterion) {
    let mut group = c.benchmark_group("shift");

    group.bench_function("CircularBuffer/insert_erase_random", |b| {
        b.iter_batched(
            || {
                let mut buf = CircularBuffer::with_capacity(LEN * 2);
                buf.extend(0..LEN);
                (buf, XorShift64::new(0x5eed))
            },
            |(mut buf, mut rng)| {
                for _ in 0..OPS {
                    let pos = rng.gen_range(0, buf.len() + 1);
                    buf.insert(pos, pos);
                    let pos = rng.gen_range(0, buf.len());
                    black_box(buf.erase(pos).get().copied());
                }
                buf
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("VecDeque/insert_remove_random", |b| {
        b.iter_batched(
            || {
                let mut deque = VecDeque::with_capacity(LEN * 2);
                deque.extend(0..LEN);
                (deque, XorShift64::new(0x5eed))
            },
            |(mut deque, mut rng)| {
                for _ in 0..OPS {
                    let pos = rng.gen_range(0, deque.len() + 1);
                    deque.insert(pos, pos);
                    let pos = rng.gen_range(0, deque.len());
                    black_box(deque.remove(pos));
                }
                deque
            },
            BatchSize::SmallInput,
        )
    });

    // Positions near the front take the short path on every operation.
    group.bench_function("CircularBuffer/insert_near_front", |b| {
        b.iter_batched(
            || {
                let mut buf = CircularBuffer::with_capacity(LEN * 2);
                buf.extend(0..LEN);
                buf
            },
            |mut buf| {
                for i in 0..OPS {
                    buf.insert(i % 8, i);
                }
                buf
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}
