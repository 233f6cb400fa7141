use crate::buffer::SumBuffer;
use cust::prelude::*;
use std::{error::Error, fmt};
use sum_gpu::sum::BLOCK_SIZE;

static PTX: &str = include_str!("../../resources/sum_gpu.ptx");

/// Rejected launch geometry. Block sizes must be powers of two no greater
/// than the kernel's shared scratch capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidBlockSize(pub usize);

impl fmt::Display for InvalidBlockSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "block size {} is not a power of two in 1..={}",
            self.0, BLOCK_SIZE
        )
    }
}

impl Error for InvalidBlockSize {}

/// Host-side driver for the parallel sum. Submits one sweep at a time and
/// waits for each to complete before the next, since every sweep consumes the
/// partial sums the previous one wrote.
pub struct DeviceSum {
    module: Module,
}

impl DeviceSum {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let module = Module::from_ptx(PTX, &[])?;
        Ok(Self { module })
    }

    /// Returns the wrapping sum of `values`, shrinking the block size as the
    /// active prefix shrinks. The empty sequence sums to `0`.
    pub fn reduce(&self, stream: &Stream, values: &[i32]) -> Result<i32, Box<dyn Error>> {
        self.run_sweeps(stream, values, None)
    }

    /// Returns the wrapping sum of `values` using the same block size for
    /// every sweep.
    pub fn reduce_with_block_size(
        &self,
        stream: &Stream,
        values: &[i32],
        block_size: usize,
    ) -> Result<i32, Box<dyn Error>> {
        if !is_admissible(block_size) {
            return Err(Box::new(InvalidBlockSize(block_size)));
        }
        self.run_sweeps(stream, values, Some(block_size))
    }

    fn run_sweeps(
        &self,
        stream: &Stream,
        values: &[i32],
        block_size: Option<usize>,
    ) -> Result<i32, Box<dyn Error>> {
        if values.is_empty() {
            return Ok(0);
        }
        if let [only] = values {
            return Ok(*only);
        }

        let mut front = SumBuffer::new(values)?;
        // A sweep emits at most ceil(len / 2) partials (one block per pair at
        // block size 1), so this capacity covers every sweep.
        let mut back = SumBuffer::zeroed((values.len() + 1) / 2)?;
        let kernel = self.module.get_function("partial_block_sums")?;

        // Each sweep reads the active prefix from one buffer and writes one
        // partial sum per block into the other; blocks are unordered within a
        // launch, so the split is what keeps a block's write out of input
        // another block has not read yet. The synchronize orders a sweep's
        // writes before the next sweep's reads.
        let mut len = values.len();
        while len > 1 {
            let g = block_size.unwrap_or_else(|| block_size_for(len));
            let blocks = (len + 2 * g - 1) / (2 * g);
            unsafe {
                launch!(
                    kernel<<<blocks as u32, g as u32, 0, stream>>>(
                        front.as_device_ptr(),
                        len,
                        back.as_device_ptr()
                    )
                )?;
            }
            stream.synchronize()?;
            len = blocks;
            std::mem::swap(&mut front, &mut back);
        }

        front.read_first(stream)
    }
}

/// Smallest admissible block size whose pair-loading lanes cover `len`
/// elements, clamped to the scratch capacity. Shrinking with the prefix keeps
/// late sweeps from launching mostly-idle blocks.
pub fn block_size_for(len: usize) -> usize {
    ((len + 1) / 2).next_power_of_two().min(BLOCK_SIZE)
}

pub(crate) fn is_admissible(block_size: usize) -> bool {
    block_size.is_power_of_two() && block_size <= BLOCK_SIZE
}

#[cfg(test)]
mod tests {
    use super::{block_size_for, is_admissible};
    use sum_gpu::sum::BLOCK_SIZE;

    #[test]
    fn shrinks_block_size_with_the_prefix() {
        assert_eq!(block_size_for(2), 1);
        assert_eq!(block_size_for(5), 4);
        assert_eq!(block_size_for(7), 4);
        assert_eq!(block_size_for(1024), BLOCK_SIZE);
        assert_eq!(block_size_for(1_000_000), BLOCK_SIZE);
    }

    #[test]
    fn rejects_inadmissible_block_sizes() {
        assert!(is_admissible(1));
        assert!(is_admissible(BLOCK_SIZE));
        assert!(!is_admissible(0));
        assert!(!is_admissible(3));
        assert!(!is_admissible(BLOCK_SIZE * 2));
    }
}
