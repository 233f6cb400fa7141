use cust::stream::{Stream, StreamFlags};
use itertools::Itertools;
use std::time::Instant;
use sum_cuda::{host, DeviceSum};

pub fn main() {
    let n: usize = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(8);
    let values = (1..=n).map(|i| i as i32).collect_vec();
    println!("The array: [{}]", values.iter().join(" "));

    let started = Instant::now();
    let sum = match cust::quick_init() {
        Ok(_ctx) => {
            let stream = Stream::new(StreamFlags::NON_BLOCKING, None).unwrap();
            let device_sum = DeviceSum::new().unwrap();
            device_sum.reduce(&stream, &values).unwrap()
        }
        Err(_) => {
            println!("No CUDA device available, summing on the host.");
            host::reduce(&values)
        }
    };
    let elapsed = started.elapsed();

    println!("The Sum: {}", sum);
    println!("Time it took: {} microseconds", elapsed.as_micros());
}
