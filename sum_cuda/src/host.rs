//! Sequential rendition of the device reduction, used when no CUDA device is
//! available. It mirrors the kernel sweep for sweep (pair-load into a group
//! scratch, strided tree, one partial per group into a separate output
//! buffer), which also makes every kernel-level behavior testable without a
//! device.

use crate::device::{block_size_for, is_admissible, InvalidBlockSize};

/// Returns the wrapping sum of `values`, shrinking the group size as the
/// active prefix shrinks. The empty sequence sums to `0`.
pub fn reduce(values: &[i32]) -> i32 {
    reduce_inner(values, None)
}

/// Returns the wrapping sum of `values` using the same group size for every
/// sweep. The size must be a power of two no greater than the kernel's
/// scratch capacity.
pub fn reduce_with_block_size(values: &[i32], block_size: usize) -> Result<i32, InvalidBlockSize> {
    if !is_admissible(block_size) {
        return Err(InvalidBlockSize(block_size));
    }
    Ok(reduce_inner(values, Some(block_size)))
}

fn reduce_inner(values: &[i32], block_size: Option<usize>) -> i32 {
    if values.len() <= 1 {
        return values.first().copied().unwrap_or(0);
    }

    let mut front = values.to_vec();
    let mut back = vec![0i32; (values.len() + 1) / 2];
    let mut len = front.len();
    while len > 1 {
        let g = block_size.unwrap_or_else(|| block_size_for(len));
        len = sweep(&front[..len], g, &mut back);
        std::mem::swap(&mut front, &mut back);
    }
    front[0]
}

/// One sweep: each group of `2 * block_size` adjacent elements of `sums`
/// collapses to a single partial sum at the front of `partials`. Returns the
/// number of partials written.
///
/// `block_size` must be a power of two no greater than the kernel's scratch
/// capacity, and `partials` must hold one element per group.
pub fn sweep(sums: &[i32], block_size: usize, partials: &mut [i32]) -> usize {
    assert!(
        is_admissible(block_size),
        "block size {} is not a power of two in the kernel's scratch capacity",
        block_size
    );

    let len = sums.len();
    let groups = (len + 2 * block_size - 1) / (2 * block_size);
    let mut scratch = vec![0i32; block_size];

    for b in 0..groups {
        // Pair-load with identity padding past the live prefix, exactly as
        // the kernel's lanes do.
        for t in 0..block_size {
            let first = 2 * (b * block_size + t);
            scratch[t] = if first + 1 < len {
                sums[first].wrapping_add(sums[first + 1])
            } else if first + 1 == len {
                sums[first]
            } else {
                0
            };
        }

        // The same strided left-gathering tree the kernel runs, lanes in
        // sequence instead of lockstep.
        let mut stride = 1;
        while stride < block_size {
            let mut idx = 0;
            while idx < block_size {
                scratch[idx] = scratch[idx].wrapping_add(scratch[idx + stride]);
                idx += 2 * stride;
            }
            stride *= 2;
        }

        partials[b] = scratch[0];
    }

    groups
}
