use crate::scalar::Scalar;
use crate::types::Uplo;

/// Launch geometry for a square tiled kernel: the problem size rounded up
/// to a whole number of `tile_size x tile_size` work-groups.
///
/// The padded extent may overhang the true problem size; kernels rely on
/// guarded access so the overhang never perturbs a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    n: usize,
    tile_size: usize,
    tiles: usize,
}

impl TileGrid {
    /// Grid for a logical dimension `n` with a fixed tile edge length.
    ///
    /// # Panics
    /// Panics if `tile_size` is zero.
    pub fn new(n: usize, tile_size: usize) -> Self {
        assert!(tile_size > 0);
        TileGrid {
            n,
            tile_size,
            tiles: n.div_ceil(tile_size),
        }
    }

    /// The true (unpadded) problem size.
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Number of tiles along one edge of the grid.
    pub fn tiles(&self) -> usize {
        self.tiles
    }

    /// The padded extent, always an exact multiple of the tile size.
    pub fn padded_extent(&self) -> usize {
        self.tiles * self.tile_size
    }

    /// Work-group coordinates surviving coarse triangular pruning.
    ///
    /// Pruning is evaluated on *tile* indices: a tile entirely on the
    /// excluded side of the diagonal is skipped, while a tile that
    /// straddles the diagonal (tile_row == tile_col) always runs in full
    /// and leaves the fine-grained masking to the kernel's write phase.
    pub fn triangle_tiles(&self, uplo: Uplo) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for tile_col in 0..self.tiles {
            for tile_row in 0..self.tiles {
                let keep = match uplo {
                    Uplo::Upper => tile_col >= tile_row,
                    Uplo::Lower => tile_row >= tile_col,
                };
                if keep {
                    out.push((tile_row, tile_col));
                }
            }
        }
        out
    }
}

/// Per-work-group scratch tile.
///
/// A `(tile_size + 1) x tile_size` buffer; the extra row is layout padding
/// carried over from the accelerator formulation, where it staggers the
/// access pattern across memory banks. Allocated per work-group invocation
/// and dropped at the end of it; the buffer never escapes its group.
#[derive(Debug)]
pub struct TileScratch<T> {
    data: Vec<T>,
    size: usize,
}

impl<T: Scalar> TileScratch<T> {
    /// Zero-initialized scratch for a `tile_size`-edge work-group.
    pub fn new(tile_size: usize) -> Self {
        TileScratch {
            data: vec![T::ZERO; (tile_size + 1) * tile_size],
            size: tile_size,
        }
    }

    /// Value at row `r`, column `c` with `r <= tile_size`, `c < tile_size`.
    pub fn get(&self, r: usize, c: usize) -> T {
        debug_assert!(r <= self.size && c < self.size);
        self.data[r * self.size + c]
    }

    /// Store `v` at row `r`, column `c`.
    pub fn set(&mut self, r: usize, c: usize, v: T) {
        debug_assert!(r <= self.size && c < self.size);
        self.data[r * self.size + c] = v;
    }
}
