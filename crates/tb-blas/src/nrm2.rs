use tb_core::{Context, Result, Scalar, VectorView};

use crate::reduce::{reduce, ReduceConfig};

/// Euclidean norm of an `n`-element strided vector.
///
/// Accumulates the plain sum of squares in the element type and takes the
/// square root at the end; no overflow-rescaling pass is performed.
pub fn nrm2<T: Scalar>(ctx: &Context, n: usize, x: &[T], incx: usize) -> Result<T> {
    // quick return
    if n == 0 || incx == 0 {
        return Ok(T::ZERO);
    }

    let x = VectorView::new(n, x, incx)?;

    let sumsq = reduce(
        ctx,
        n,
        T::ZERO,
        |acc, i| {
            let v = x.get(i);
            acc + v * v
        },
        |a, b| a + b,
        ReduceConfig::default(),
    );
    Ok(sumsq.sqrt())
}
