use cuda_std::{kernel, shared_array, thread};

/// Maximum number of threads per block, and the size of the shared scratch
/// array. A launch may use any power-of-two block size up to this.
pub const BLOCK_SIZE: usize = 512;

/// Reduces `sums` to one partial sum per block, written to the front of
/// `partials`.
///
/// Each thread folds two adjacent elements into shared memory, so the launch
/// should use `ceil(sums.len() / (2 * block_size))` blocks. Lanes whose pair
/// starts past the end of `sums` contribute the additive identity, which
/// makes the kernel safe for any length, not just multiples of the block
/// geometry.
///
/// `partials` must not alias `sums` and must hold at least one element per
/// block. Blocks give no ordering guarantees within a launch, so writing the
/// partials to a separate buffer is what keeps one block's output from
/// landing in input another block has not read yet.
#[kernel]
#[allow(improper_ctypes_definitions, clippy::missing_safety_doc)]
pub unsafe fn partial_block_sums(sums: &[i32], partials: *mut i32) {
    let t_idx = thread::thread_idx_x() as usize;
    let b_idx = thread::block_idx_x() as usize;
    let b_dim = thread::block_dim_x() as usize;

    let scratch = shared_array![i32; BLOCK_SIZE];

    // Fold a pair of adjacent elements from global memory into shared memory.
    // An odd tail contributes its single element.
    let len = sums.len();
    let first = 2 * (b_idx * b_dim + t_idx);
    let mut pair = 0i32;
    if first + 1 < len {
        pair = sums[first].wrapping_add(sums[first + 1]);
    } else if first + 1 == len {
        pair = sums[first];
    }
    *(&mut *scratch.add(t_idx)) = pair;
    thread::sync_threads();

    // Strided tree reduction over the block's scratch. Survivors gather at
    // indices that are multiples of the doubled stride, and the barrier after
    // each stride publishes the writes the next stride reads.
    let mut stride: usize = 1;
    while stride < b_dim {
        let idx = 2 * stride * t_idx;
        if idx < b_dim {
            let folded = (*scratch.add(idx)).wrapping_add(*scratch.add(idx + stride));
            *(&mut *scratch.add(idx)) = folded;
        }

        stride *= 2;
        thread::sync_threads();
    }

    if t_idx == 0 {
        *(&mut *partials.add(b_idx)) = *scratch.add(0);
    }
}
