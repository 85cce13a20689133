use rayon::prelude::*;
use tb_core::{BlasError, Context, Result};

/// Tuning parameters for the two-phase reduction engine.
///
/// `tile_size` is the work-group lane count and must be a power of two so
/// the in-group tree collapse halves cleanly; `max_tiles` bounds the number
/// of work-groups (and therefore the partial buffer) on very large inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceConfig {
    tile_size: usize,
    max_tiles: usize,
}

impl ReduceConfig {
    pub fn new(tile_size: usize, max_tiles: usize) -> Result<Self> {
        if tile_size == 0 || !tile_size.is_power_of_two() {
            return Err(BlasError::invalid_argument("reduce", 1));
        }
        if max_tiles == 0 {
            return Err(BlasError::invalid_argument("reduce", 2));
        }
        Ok(ReduceConfig {
            tile_size,
            max_tiles,
        })
    }

    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    pub fn max_tiles(&self) -> usize {
        self.max_tiles
    }
}

impl Default for ReduceConfig {
    /// The tuning the vector-aggregate routines ship with.
    fn default() -> Self {
        ReduceConfig {
            tile_size: 128,
            max_tiles: 64,
        }
    }
}

/// In-group binary-tree collapse of a work-group's scratch buffer.
///
/// Halves the active lane count each step: lane `l < active` combines slot
/// `l + active` into slot `l`, then a barrier separates the step from the
/// next halving so no lane reads a slot while another still writes it. On
/// this target the barrier is the step boundary itself: a step's writes all
/// land before the next step reads. `buf.len()` must be a power of two.
pub fn tile_tree_reduce<A: Copy, F>(buf: &mut [A], combine: &F)
where
    F: Fn(A, A) -> A + ?Sized,
{
    debug_assert!(buf.len().is_power_of_two());
    let mut active = buf.len() / 2;
    while active > 0 {
        for lane in 0..active {
            buf[lane] = combine(buf[lane], buf[lane + active]);
        }
        // barrier between halvings
        active /= 2;
    }
}

/// Two-phase reduction of `n` logical elements to one accumulator value.
///
/// Phase one partitions the index range over at most `max_tiles` work-groups
/// of `tile_size` lanes. Each lane grid-strides over its share of indices,
/// folding into a private accumulator seeded with `identity`; a barrier,
/// then the group's lane accumulators tree-collapse to a single partial.
/// Phase two folds the partials sequentially, seeded with `identity`; the
/// group count is small, so no second parallel pass is worth its launch.
///
/// `local_fold` captures whatever source views it reads; every index in
/// `0..n` is folded exactly once. Summation order depends on the
/// configuration, so floating results are reproducible for a fixed
/// `ReduceConfig` but not bit-stable across configurations. `n == 0`
/// returns `identity` without dispatching anything.
pub fn reduce<A>(
    ctx: &Context,
    n: usize,
    identity: A,
    local_fold: impl Fn(A, usize) -> A + Sync,
    combine: impl Fn(A, A) -> A + Sync,
    cfg: ReduceConfig,
) -> A
where
    A: Copy + Send + Sync,
{
    if n == 0 {
        return identity;
    }

    let tile_size = cfg.tile_size;
    let tile_count = n.div_ceil(tile_size).min(cfg.max_tiles);

    // simultaneous live lanes across the launch
    let thread_count = tile_count * tile_size;

    let partials: Vec<A> = ctx.run(|| {
        (0..tile_count)
            .into_par_iter()
            .map(|tile| {
                // group-local scratch, one slot per lane
                let mut buf = vec![identity; tile_size];
                for (lane, slot) in buf.iter_mut().enumerate() {
                    let mut acc = identity;
                    let mut idx = tile * tile_size + lane;
                    while idx < n {
                        acc = local_fold(acc, idx);
                        idx += thread_count;
                    }
                    *slot = acc;
                }
                // barrier: every lane's fold lands before the collapse reads
                tile_tree_reduce(&mut buf, &combine);
                buf[0]
            })
            .collect()
    });

    partials.into_iter().fold(identity, |a, b| combine(a, b))
}
