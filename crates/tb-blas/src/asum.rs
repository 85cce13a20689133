use tb_core::{Context, Result, Scalar, VectorView};

use crate::reduce::{reduce, ReduceConfig};

/// Sum of the absolute values of an `n`-element strided vector.
///
/// `n == 0` or `incx == 0` returns the additive identity without
/// dispatching anything.
pub fn asum<T: Scalar>(ctx: &Context, n: usize, x: &[T], incx: usize) -> Result<T> {
    // quick return
    if n == 0 || incx == 0 {
        return Ok(T::ZERO);
    }

    let x = VectorView::new(n, x, incx)?;

    Ok(reduce(
        ctx,
        n,
        T::ZERO,
        |acc, i| acc + x.get(i).abs(),
        |a, b| a + b,
        ReduceConfig::default(),
    ))
}
