use rayon::prelude::*;
use tb_core::{BlasError, Context, Result, Scalar};

/// x := alpha * x over `n` strided elements.
pub fn scal<T: Scalar>(ctx: &Context, n: usize, alpha: T, x: &mut [T], incx: usize) -> Result<()> {
    // quick return
    if n == 0 {
        return Ok(());
    }

    // argument check
    if incx == 0 {
        return Err(BlasError::invalid_argument("scal", 4));
    }
    if x.len() < (n - 1) * incx + 1 {
        return Err(BlasError::invalid_argument("scal", 3));
    }

    if incx == 1 {
        ctx.run(|| x[..n].par_iter_mut().for_each(|v| *v = alpha * *v));
    } else {
        for i in 0..n {
            x[i * incx] = alpha * x[i * incx];
        }
    }
    Ok(())
}
