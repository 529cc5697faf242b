use super::XorShift64;
use circular_deque::CircularBuffer;
use criterion::{black_box, Criterion, Throughput};
use std::thread;

const OPS_PER_THREAD: usize = 50_000;
const QUEUES_PER_THREAD: usize = 64;

/// Many small queues per thread that repeatedly fill, drain and clear, so
/// every block is allocated and released under the global allocator.
pub fn run(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    group.measurement_time(std::time::Duration::from_secs(2));
    group.sample_size(10);

    let threads = [1, 2, 4, 8];

    for &t in &threads {
        group.throughput(Throughput::Elements((OPS_PER_THREAD * t) as u64));
        group.bench_function(format!("churn_{t}_threads"), |b| {
            b.iter(|| {
                let mut handles = Vec::with_capacity(t);
                for i in 0..t {
                    handles.push(thread::spawn(move || {
                        let mut rng = XorShift64::new((i as u64 + 1) * 0xdead_beef);
                        let mut queues: Vec<CircularBuffer<u64>> =
                            (0..QUEUES_PER_THREAD).map(|_| CircularBuffer::new()).collect();

                        for _ in 0..OPS_PER_THREAD {
                            let q = &mut queues[rng.gen_range(0, QUEUES_PER_THREAD)];
                            match rng.next() % 8 {
                                0 => q.clear(),
                                1..=3 => {
                                    black_box(q.pop_front());
                                }
                                4 => q.push_front(rng.next()),
                                _ => q.push_back(rng.next()),
                            }
                        }
                        black_box(queues.iter().map(CircularBuffer::len).sum::<usize>())
                    }));
                }
                for h in handles {
                    black_box(h.join().unwrap());
                }
            })
        });
    }

    group.finish();
}
