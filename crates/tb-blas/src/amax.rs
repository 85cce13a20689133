use tb_core::{Context, Result, Scalar, VectorView};

use crate::reduce::{reduce, ReduceConfig};

/// Zero-based index of the first element with the largest absolute value.
///
/// The accumulator is an index/value pair; ties resolve to the lower
/// index, both within a lane's fold (ascending indices, strict compare)
/// and across lanes (explicit tie-break in the combine). `n == 0` or
/// `incx == 0` returns 0 without dispatching anything.
pub fn amax<T: Scalar>(ctx: &Context, n: usize, x: &[T], incx: usize) -> Result<usize> {
    // quick return
    if n == 0 || incx == 0 {
        return Ok(0);
    }

    let x = VectorView::new(n, x, incx)?;

    let best = reduce(
        ctx,
        n,
        None::<(usize, T)>,
        |acc, i| {
            let v = x.get(i).abs();
            match acc {
                None => Some((i, v)),
                Some((_, best)) if v > best => Some((i, v)),
                Some(_) => acc,
            }
        },
        |a, b| match (a, b) {
            (None, r) => r,
            (l, None) => l,
            (Some((ai, av)), Some((bi, bv))) => {
                if av > bv || (av == bv && ai < bi) {
                    a
                } else {
                    b
                }
            }
        },
        ReduceConfig::default(),
    );

    Ok(best.map(|(i, _)| i).unwrap_or(0))
}
