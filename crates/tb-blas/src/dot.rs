use tb_core::{BlasError, Context, Result, Scalar, VectorView};

use crate::reduce::{reduce, ReduceConfig};

/// Inner product of two `n`-element strided vectors.
///
/// The local fold captures both source views, one multiply-accumulate per
/// logical index.
pub fn dot<T: Scalar>(
    ctx: &Context,
    n: usize,
    x: &[T],
    incx: usize,
    y: &[T],
    incy: usize,
) -> Result<T> {
    // quick return
    if n == 0 {
        return Ok(T::ZERO);
    }

    // argument check
    if incx == 0 {
        return Err(BlasError::invalid_argument("dot", 3));
    }
    if incy == 0 {
        return Err(BlasError::invalid_argument("dot", 5));
    }

    let x = VectorView::new(n, x, incx)?;
    let y = VectorView::new(n, y, incy)?;

    Ok(reduce(
        ctx,
        n,
        T::ZERO,
        |acc, i| acc + x.get(i) * y.get(i),
        |a, b| a + b,
        ReduceConfig::default(),
    ))
}
