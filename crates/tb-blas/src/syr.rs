use rayon::prelude::*;
use tb_core::{BlasError, Context, Result, Scalar, Uplo, VectorView};

use crate::elementwise::triangle_rows;

/// Symmetric rank-1 update: A := alpha * x * x^T + A on the selected
/// triangle of an `n x n` column-major matrix.
///
/// A plain data-parallel map: one work item per column, a per-element
/// triangle predicate, no scratch and no barrier.
pub fn syr<T: Scalar>(
    ctx: &Context,
    uplo: Uplo,
    n: usize,
    alpha: T,
    x: &[T],
    incx: usize,
    a: &mut [T],
    lda: usize,
) -> Result<()> {
    // quick return
    if n == 0 || alpha == T::ZERO {
        return Ok(());
    }

    // argument check
    if incx == 0 {
        return Err(BlasError::invalid_argument("syr", 5));
    }
    if x.len() < (n - 1) * incx + 1 {
        return Err(BlasError::invalid_argument("syr", 4));
    }
    if lda < n {
        return Err(BlasError::invalid_argument("syr", 7));
    }
    if a.len() < (n - 1) * lda + n {
        return Err(BlasError::invalid_argument("syr", 6));
    }

    let x = VectorView::new(n, x, incx)?;

    ctx.run(|| {
        a.par_chunks_mut(lda)
            .take(n)
            .enumerate()
            .for_each(|(j, col)| {
                let xj = x.get(j);
                let (lo, hi) = triangle_rows(uplo, j, n);
                for i in lo..hi {
                    col[i] += alpha * x.get(i) * xj;
                }
            })
    });
    Ok(())
}
