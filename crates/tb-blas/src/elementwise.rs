//! Parallel elementwise maps over matrix views.
//!
//! Column-major storage makes the per-column slice the natural disjoint
//! unit of work, so every map here dispatches one work item per column.
//! The triangle-restricted variants are the beta-only paths of the
//! matrix-update routines.

use rayon::prelude::*;
use tb_core::{BlasError, Context, MatrixView, MatrixViewMut, Result, Scalar, Uplo};

/// Row range of column `j` that lies inside the selected triangle of a
/// matrix with `rows` rows, as a half-open interval.
pub(crate) fn triangle_rows(uplo: Uplo, j: usize, rows: usize) -> (usize, usize) {
    match uplo {
        Uplo::Upper => (0, rows.min(j + 1)),
        Uplo::Lower => (j.min(rows), rows),
    }
}

/// a := value, every element.
pub fn fill<T: Scalar>(ctx: &Context, value: T, a: &mut MatrixViewMut<'_, T>) {
    let rows = a.rows();
    let cols = a.cols();
    let ld = a.ld();
    let data = a.raw_mut();
    ctx.run(|| {
        data.par_chunks_mut(ld).take(cols).for_each(|col| {
            for v in &mut col[..rows] {
                *v = value;
            }
        })
    });
}

/// a := value * a, every element.
pub fn scale<T: Scalar>(ctx: &Context, value: T, a: &mut MatrixViewMut<'_, T>) {
    let rows = a.rows();
    let cols = a.cols();
    let ld = a.ld();
    let data = a.raw_mut();
    ctx.run(|| {
        data.par_chunks_mut(ld).take(cols).for_each(|col| {
            for v in &mut col[..rows] {
                *v = value * *v;
            }
        })
    });
}

/// dst := src, element by element. Extents must match.
pub fn copy<T: Scalar>(
    ctx: &Context,
    src: MatrixView<'_, T>,
    dst: &mut MatrixViewMut<'_, T>,
) -> Result<()> {
    if src.rows() != dst.rows() || src.cols() != dst.cols() {
        return Err(BlasError::invalid_argument("copy", 1));
    }
    let rows = dst.rows();
    let cols = dst.cols();
    let src_ld = src.ld();
    let dst_ld = dst.ld();
    let src_data = src.raw();
    let dst_data = dst.raw_mut();
    ctx.run(|| {
        dst_data
            .par_chunks_mut(dst_ld)
            .take(cols)
            .zip(src_data.par_chunks(src_ld))
            .for_each(|(d, s)| d[..rows].copy_from_slice(&s[..rows]))
    });
    Ok(())
}

/// a := value on the selected triangle only, diagonal inclusive.
pub fn fill_triangle<T: Scalar>(ctx: &Context, uplo: Uplo, value: T, a: &mut MatrixViewMut<'_, T>) {
    let rows = a.rows();
    let cols = a.cols();
    let ld = a.ld();
    let data = a.raw_mut();
    ctx.run(|| {
        data.par_chunks_mut(ld)
            .take(cols)
            .enumerate()
            .for_each(|(j, col)| {
                let (lo, hi) = triangle_rows(uplo, j, rows);
                for v in &mut col[lo..hi] {
                    *v = value;
                }
            })
    });
}

/// a := value * a on the selected triangle only, diagonal inclusive.
pub fn scale_triangle<T: Scalar>(ctx: &Context, uplo: Uplo, value: T, a: &mut MatrixViewMut<'_, T>) {
    let rows = a.rows();
    let cols = a.cols();
    let ld = a.ld();
    let data = a.raw_mut();
    ctx.run(|| {
        data.par_chunks_mut(ld)
            .take(cols)
            .enumerate()
            .for_each(|(j, col)| {
                let (lo, hi) = triangle_rows(uplo, j, rows);
                for v in &mut col[lo..hi] {
                    *v = value * *v;
                }
            })
    });
}
