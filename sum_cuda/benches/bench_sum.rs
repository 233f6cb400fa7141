use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode};
use cust::stream::{Stream, StreamFlags};
use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_hc::Hc128Rng;
use rayon::prelude::*;
use sum_cuda::{host, DeviceSum};

const SEED: &[u8; 32] = b"e3P0ZDvVgq2mY7nGxSwWJObFu1cHdKrA";

pub fn sum_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("Reduction comparison");
    group.sample_size(10);
    group.sampling_mode(SamplingMode::Flat);

    for values_count in [500_000u64, 1_000_000u64, 5_000_000u64, 10_000_000u64] {
        let _ctx = cust::quick_init().unwrap();
        let mut rng = Hc128Rng::from_seed(*SEED);
        let values = (0..values_count).map(|_| rng.gen::<i32>()).collect_vec();

        let device_sum = DeviceSum::new().unwrap();

        group.bench_with_input(
            BenchmarkId::new("DeviceSweeps", values_count),
            &values_count,
            |b, _| {
                b.iter(|| {
                    let stream = Stream::new(StreamFlags::NON_BLOCKING, None).unwrap();
                    let _ = device_sum.reduce(&stream, &values).unwrap();
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("HostSweeps", values_count),
            &values_count,
            |b, _| b.iter(|| host::reduce(&values)),
        );

        group.bench_with_input(
            BenchmarkId::new("RayonFold", values_count),
            &values_count,
            |b, _| {
                b.iter(|| {
                    values
                        .par_iter()
                        .fold(|| 0i32, |acc, &x| acc.wrapping_add(x))
                        .reduce(|| 0i32, |a, b| a.wrapping_add(b))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, sum_comparison);
criterion_main!(benches);
