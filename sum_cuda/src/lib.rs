mod buffer;
mod device;
pub mod host;

pub use buffer::SumBuffer;
pub use device::{block_size_for, DeviceSum, InvalidBlockSize};
pub use sum_gpu::sum::BLOCK_SIZE;
