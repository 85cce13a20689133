use rayon::prelude::*;
use tb_core::{BlasError, Context, Result, Scalar};

/// y := alpha * x + y over `n` strided elements.
///
/// The unit-stride case maps in parallel over the two slices; strided
/// updates run serially, one lane's worth of work not being worth a
/// scatter-capable dispatch.
pub fn axpy<T: Scalar>(
    ctx: &Context,
    n: usize,
    alpha: T,
    x: &[T],
    incx: usize,
    y: &mut [T],
    incy: usize,
) -> Result<()> {
    // quick return
    if n == 0 || alpha == T::ZERO {
        return Ok(());
    }

    // argument check
    if incx == 0 {
        return Err(BlasError::invalid_argument("axpy", 4));
    }
    if incy == 0 {
        return Err(BlasError::invalid_argument("axpy", 6));
    }
    if x.len() < (n - 1) * incx + 1 {
        return Err(BlasError::invalid_argument("axpy", 3));
    }
    if y.len() < (n - 1) * incy + 1 {
        return Err(BlasError::invalid_argument("axpy", 5));
    }

    if incx == 1 && incy == 1 {
        ctx.run(|| {
            y[..n]
                .par_iter_mut()
                .zip(x[..n].par_iter())
                .for_each(|(y, &x)| *y += alpha * x)
        });
    } else {
        for i in 0..n {
            y[i * incy] += alpha * x[i * incx];
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axpy_unit_stride() {
        let ctx = Context::new();
        let x = [1.0f32, 2.0, 3.0];
        let mut y = [10.0f32, 20.0, 30.0];
        axpy(&ctx, 3, 2.0, &x, 1, &mut y, 1).unwrap();
        assert_eq!(y, [12.0, 24.0, 36.0]);
    }

    #[test]
    fn test_axpy_strided() {
        let ctx = Context::new();
        let x = [1.0f64, 0.0, 2.0];
        let mut y = [5.0f64, 9.0, 6.0, 9.0];
        axpy(&ctx, 2, 3.0, &x, 2, &mut y, 2).unwrap();
        assert_eq!(y, [8.0, 9.0, 12.0, 9.0]);
    }

    #[test]
    fn test_axpy_alpha_zero_is_noop() {
        let ctx = Context::new();
        let mut y = [1.0f32, 2.0];
        axpy(&ctx, 2, 0.0, &[9.0, 9.0], 1, &mut y, 1).unwrap();
        assert_eq!(y, [1.0, 2.0]);
    }

    #[test]
    fn test_axpy_length_checks() {
        let ctx = Context::new();
        let x = [1.0f32; 2];
        let mut y = [1.0f32; 4];
        assert!(matches!(
            axpy(&ctx, 4, 1.0, &x, 1, &mut y, 1),
            Err(BlasError::InvalidArgument { index: 3, .. })
        ));
        let x = [1.0f32; 4];
        let mut y = [1.0f32; 2];
        assert!(matches!(
            axpy(&ctx, 4, 1.0, &x, 1, &mut y, 1),
            Err(BlasError::InvalidArgument { index: 5, .. })
        ));
    }
}
