use std::{collections::VecDeque, hint::black_box, time::Duration};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use packedcore::{CompressDepth, Direction, FillPolicy, QuickList};
use rand::{rngs::StdRng, Rng, SeedableRng};

const SIZES: [usize; 3] = [1_000usize, 10_000usize, 100_000usize];
const RANDOM_ACCESSES: usize = 1_000;

fn elem(i: i32) -> Vec<u8> {
    i.to_le_bytes().to_vec()
}

fn fill_vec(n: usize) -> Vec<i32> {
    (0..n as i32).collect()
}

fn fill_vecdeque(n: usize) -> VecDeque<i32> {
    (0..n as i32).collect::<Vec<_>>().into()
}

fn fill_quicklist(
    n: usize,
    fill: u16,
) -> QuickList {
    let mut q = QuickList::new(FillPolicy::Count(fill), CompressDepth(0));
    for i in 0..n as i32 {
        q.push_tail(&elem(i));
    }
    q
}

fn bench_push_tail(c: &mut Criterion) {
    let mut g = c.benchmark_group("push_tail_bulk");
    g.measurement_time(Duration::from_secs(5));
    for &size in SIZES.iter() {
        g.throughput(Throughput::Elements(size as u64));
        g.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &n| {
            b.iter(|| {
                let mut q = QuickList::new(FillPolicy::Count(256), CompressDepth(0));
                for i in 0..n as i32 {
                    q.push_tail(black_box(&elem(i)));
                }
                black_box(q);
            })
        });
        g.bench_with_input(BenchmarkId::new("VecDeque", size), &size, |b, &n| {
            b.iter(|| {
                let mut d = VecDeque::with_capacity(n);
                for i in 0..n as i32 {
                    black_box(d.push_back(i));
                }
                black_box(d);
            })
        });
        g.bench_with_input(BenchmarkId::new("Vec", size), &size, |b, &n| {
            b.iter(|| {
                let mut v = Vec::with_capacity(n);
                for i in 0..n as i32 {
                    black_box(v.push(i));
                }
                black_box(v);
            })
        });
    }
    g.finish();
}

fn bench_push_head(c: &mut Criterion) {
    let mut g = c.benchmark_group("push_head_bulk");
    g.measurement_time(Duration::from_secs(5));
    for &size in SIZES.iter() {
        g.throughput(Throughput::Elements(size as u64));
        g.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &n| {
            b.iter(|| {
                let mut q = QuickList::new(FillPolicy::Count(256), CompressDepth(0));
                for i in 0..n as i32 {
                    q.push_head(black_box(&elem(i)));
                }
                black_box(q);
            })
        });

        g.bench_with_input(BenchmarkId::new("VecDeque", size), &size, |b, &n| {
            b.iter(|| {
                let mut d = VecDeque::with_capacity(n);
                for i in 0..n as i32 {
                    black_box(d.push_front(i));
                }
                black_box(d);
            })
        });

        g.bench_with_input(
            BenchmarkId::new("Vec_push_front_ref", size),
            &size,
            |b, &n| {
                b.iter(|| {
                    let mut v = Vec::with_capacity(n);
                    for i in 0..n as i32 {
                        v.insert(0, i);
                    }
                    black_box(v);
                })
            },
        );
    }
    g.finish();
}

fn bench_pop_drain(c: &mut Criterion) {
    let mut g = c.benchmark_group("pop_drain");
    g.measurement_time(Duration::from_secs(5));
    for &size in SIZES.iter() {
        g.throughput(Throughput::Elements(size as u64));

        g.bench_with_input(
            BenchmarkId::new("QuickList_pop_tail", size),
            &size,
            |b, &n| {
                b.iter_batched(
                    || fill_quicklist(n, 256),
                    |mut q| {
                        while q.pop(Direction::Reverse).is_some() {}
                        black_box(q);
                    },
                    criterion::BatchSize::LargeInput,
                )
            },
        );

        g.bench_with_input(
            BenchmarkId::new("VecDeque_pop_back", size),
            &size,
            |b, &n| {
                b.iter(|| {
                    let mut d = fill_vecdeque(n);
                    while d.pop_back().is_some() {}
                    black_box(d);
                })
            },
        );

        g.bench_with_input(BenchmarkId::new("Vec_pop_back", size), &size, |b, &n| {
            b.iter(|| {
                let mut v = fill_vec(n);
                while v.pop().is_some() {}
                black_box(v);
            })
        });

        g.bench_with_input(
            BenchmarkId::new("QuickList_pop_head", size),
            &size,
            |b, &n| {
                b.iter_batched(
                    || fill_quicklist(n, 256),
                    |mut q| {
                        while q.pop(Direction::Forward).is_some() {}
                        black_box(q);
                    },
                    criterion::BatchSize::LargeInput,
                )
            },
        );

        g.bench_with_input(
            BenchmarkId::new("VecDeque_pop_front", size),
            &size,
            |b, &n| {
                b.iter(|| {
                    let mut d = fill_vecdeque(n);
                    while d.pop_front().is_some() {}
                    black_box(d);
                })
            },
        );

        g.bench_with_input(
            BenchmarkId::new("Vec_pop_front_ref", size),
            &size,
            |b, &n| {
                b.iter(|| {
                    let mut v = fill_vec(n);
                    while !v.is_empty() {
                        v.remove(0);
                    }
                    black_box(v);
                })
            },
        );
    }
    g.finish();
}

fn bench_random_get(c: &mut Criterion) {
    let mut g = c.benchmark_group("random_get_1k");
    g.measurement_time(Duration::from_secs(5));
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);

    for &size in SIZES.iter() {
        let indices: Vec<usize> = (0..RANDOM_ACCESSES)
            .map(|_| rng.gen_range(0..size))
            .collect();

        let v = fill_vec(size);
        let d = fill_vecdeque(size);

        g.throughput(Throughput::Elements(RANDOM_ACCESSES as u64));

        g.bench_with_input(
            BenchmarkId::new("Vec_random_get", size),
            &indices,
            |b, idxs| {
                b.iter(|| {
                    for &i in idxs.iter() {
                        black_box(black_box(&v).get(i));
                    }
                })
            },
        );

        g.bench_with_input(
            BenchmarkId::new("VecDeque_random_get", size),
            &indices,
            |b, idxs| {
                b.iter(|| {
                    for &i in idxs.iter() {
                        black_box(black_box(&d).get(i));
                    }
                })
            },
        );

        g.bench_with_input(
            BenchmarkId::new("QuickList_random_get", size),
            &indices,
            |b, idxs| {
                b.iter_batched(
                    || fill_quicklist(size, 256),
                    |mut q| {
                        for &i in idxs.iter() {
                            black_box(q.get(black_box(i as i64)));
                        }
                        black_box(q);
                    },
                    criterion::BatchSize::LargeInput,
                )
            },
        );
    }
    g.finish();
}

fn bench_sequential_iter(c: &mut Criterion) {
    let mut g = c.benchmark_group("sequential_iter");
    g.measurement_time(Duration::from_secs(5));

    for &size in SIZES.iter() {
        let v = fill_vec(size);
        let d = fill_vecdeque(size);

        g.throughput(Throughput::Elements(size as u64));

        g.bench_with_input(BenchmarkId::new("Vec_iter", size), &v, |b, v| {
            b.iter(|| {
                for x in v.iter() {
                    black_box(x);
                }
            })
        });

        g.bench_with_input(BenchmarkId::new("VecDeque_iter", size), &d, |b, d| {
            b.iter(|| {
                for x in d.iter() {
                    black_box(x);
                }
            })
        });

        g.bench_with_input(BenchmarkId::new("QuickList_iter", size), &size, |b, &n| {
            b.iter_batched(
                || fill_quicklist(n, 256),
                |mut q| {
                    let mut it = q.iter(Direction::Forward);
                    while let Some(v) = it.next() {
                        black_box(v);
                    }
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
    g.finish();
}

fn bench_dup(c: &mut Criterion) {
    let mut g = c.benchmark_group("dup_deep_copy");
    g.measurement_time(Duration::from_secs(5));
    for &size in SIZES.iter() {
        g.throughput(Throughput::Elements(size as u64));

        g.bench_with_input(BenchmarkId::new("QuickList_dup", size), &size, |b, &n| {
            b.iter_batched(
                || fill_quicklist(n, 128),
                |q| {
                    black_box(q.dup());
                },
                criterion::BatchSize::LargeInput,
            )
        });

        let vec_of_chunks: Vec<Vec<i32>> = (0..(size / 128 + 1))
            .map(|chunk| ((chunk * 128) as i32..((chunk + 1) * 128) as i32).collect())
            .collect();

        g.bench_with_input(
            BenchmarkId::new("Vec_chunks_clone_flatten", size),
            &vec_of_chunks,
            |b, chunks| {
                b.iter(|| {
                    let mut out = Vec::with_capacity(size);
                    for ch in chunks.iter() {
                        out.extend(ch.iter().cloned());
                    }
                    black_box(out);
                });
            },
        );
    }
    g.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_push_tail(c);
    bench_push_head(c);
    bench_pop_drain(c);
    bench_random_get(c);
    bench_sequential_iter(c);
    bench_dup(c);
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(100);
    targets = criterion_benchmark
}
criterion_main!(benches);
