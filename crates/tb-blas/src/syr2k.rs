use rayon::prelude::*;
use tb_core::{
    BlasError, Context, MatrixView, MatrixViewMut, Result, Scalar, TileGrid, TileScratch,
    Transpose, Uplo,
};

use crate::elementwise;

/// Tile edge length for the blocked kernel (tuning parameter).
const TILE_SIZE: usize = 16;

/// Operator applied to the second operand tile's value as it is loaded.
///
/// Selected as a type parameter so the accumulation loop carries no
/// runtime branch. The real-arithmetic routines use [`Noop`]; a
/// conjugating operator would slot in here for a complex element type.
pub trait TransformOp<T: Scalar>: Send + Sync {
    fn apply(v: T) -> T;
}

/// The identity transform.
pub struct Noop;

impl<T: Scalar> TransformOp<T> for Noop {
    fn apply(v: T) -> T {
        v
    }
}

/// Symmetric rank-2k update on the selected triangle of a column-major
/// `n x n` matrix:
///
/// - `NoTrans`:  C := alpha * (A * B^T + B * A^T) + beta * C, A and B `n x k`
/// - `Trans`:    C := alpha * (A^T * B + B^T * A) + beta * C, A and B `k x n`
///
/// `ConjTrans` behaves as `Trans` for the real element types implemented
/// here. Elements of C outside the selected triangle are never read or
/// written. When `alpha == 0` or `k == 0` no blocked kernel is launched:
/// `beta == 1` returns immediately, `beta == 0` zero-fills the selected
/// triangle, and any other `beta` scales it.
#[allow(clippy::too_many_arguments)]
pub fn syr2k<T: Scalar>(
    ctx: &Context,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) -> Result<()> {
    // quick return
    if n == 0 {
        return Ok(());
    }

    // operand extents depend on orientation
    let (rows, cols) = if trans.is_trans() { (k, n) } else { (n, k) };

    // argument check
    if lda < rows.max(1) {
        return Err(BlasError::invalid_argument("syr2k", 7));
    }
    if ldb < rows.max(1) {
        return Err(BlasError::invalid_argument("syr2k", 9));
    }
    if ldc < n {
        return Err(BlasError::invalid_argument("syr2k", 12));
    }
    if c.len() < (n - 1) * ldc + n {
        return Err(BlasError::invalid_argument("syr2k", 11));
    }

    let mut c = MatrixViewMut::new(n, n, c, ldc)?;

    // coefficient-zero paths never launch the blocked kernel
    if alpha == T::ZERO || k == 0 {
        if beta == T::ZERO {
            elementwise::fill_triangle(ctx, uplo, T::ZERO, &mut c);
        } else if beta != T::ONE {
            elementwise::scale_triangle(ctx, uplo, beta, &mut c);
        }
        return Ok(());
    }

    if a.len() < (cols - 1) * lda + rows {
        return Err(BlasError::invalid_argument("syr2k", 6));
    }
    if b.len() < (cols - 1) * ldb + rows {
        return Err(BlasError::invalid_argument("syr2k", 8));
    }

    let a = MatrixView::new(rows, cols, a, lda)?;
    let b = MatrixView::new(rows, cols, b, ldb)?;

    syr2k_tiled::<T, Noop>(ctx, uplo, trans, n, k, alpha, a, b, beta, &mut c, TILE_SIZE, true);
    Ok(())
}

/// Launch the blocked kernel over the coarse-pruned tile grid.
///
/// Each surviving work-group accumulates its output block into private
/// storage (groups never observe each other's intermediate state), and
/// the launch retires with a masked write-back evaluated on global
/// coordinates against the true `n x n` extent, independent of which
/// tiles were pruned.
#[allow(clippy::too_many_arguments)]
fn syr2k_tiled<T: Scalar, Op: TransformOp<T>>(
    ctx: &Context,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: T,
    a: MatrixView<'_, T>,
    b: MatrixView<'_, T>,
    beta: T,
    c: &mut MatrixViewMut<'_, T>,
    tile_size: usize,
    diagonal_shortcut: bool,
) {
    let grid = TileGrid::new(n, tile_size);
    let tiles = grid.triangle_tiles(uplo);

    let blocks: Vec<(usize, usize, Vec<T>)> = ctx.run(|| {
        tiles
            .par_iter()
            .map(|&(tile_row, tile_col)| {
                let out = syr2k_group::<T, Op>(
                    trans,
                    k,
                    alpha,
                    a,
                    b,
                    tile_row,
                    tile_col,
                    tile_size,
                    diagonal_shortcut,
                );
                (tile_row, tile_col, out)
            })
            .collect()
    });

    let ts = tile_size;
    for (tile_row, tile_col, block) in blocks {
        for j in 0..ts {
            let global_j = tile_col * ts + j;
            for i in 0..ts {
                let global_i = tile_row * ts + i;
                if global_i < n && global_j < n && uplo.contains(global_i, global_j) {
                    let mut out = block[i + j * ts];
                    if beta != T::ZERO {
                        out += beta * c.at(global_i, global_j);
                    }
                    c.set(global_i, global_j, out);
                }
            }
        }
    }
}

/// One work-group's pass over all k-blocks for output tile
/// `(tile_row, tile_col)`.
///
/// Touches only its operand views and its own scratch; the scratch tiles
/// live for exactly this invocation. Lane phases are separated by
/// barriers: within a phase every lane does one unit of work, and no lane
/// enters the next phase until all have finished. On this target the
/// phase loop boundary itself provides that ordering and visibility.
#[allow(clippy::too_many_arguments)]
fn syr2k_group<T: Scalar, Op: TransformOp<T>>(
    trans: Transpose,
    k: usize,
    alpha: T,
    a: MatrixView<'_, T>,
    b: MatrixView<'_, T>,
    tile_row: usize,
    tile_col: usize,
    ts: usize,
    diagonal_shortcut: bool,
) -> Vec<T> {
    let mut at = TileScratch::new(ts); // straight operand tile
    let mut att = TileScratch::new(ts); // transposed operand tile

    // one accumulator per lane, alive for the whole pass over k
    let mut out = vec![T::ZERO; ts * ts];

    let row_origin = tile_row * ts;
    let col_origin = tile_col * ts;
    let notrans = !trans.is_trans();

    // source coordinates for the element lane (i, j) loads; reads past
    // the true extent are guarded and contribute the additive identity,
    // which is what lets n and k be non-multiples of the tile size
    let src = |origin: usize, kb: usize, i: usize, j: usize| -> (usize, usize) {
        if notrans {
            (origin + i, kb + j)
        } else {
            (kb + j, origin + i)
        }
    };

    let mut kb = 0;
    while kb < k {
        // cooperative load: each lane pulls one element of each operand,
        // the transpose operator applying to the second tile's value as
        // it lands
        for j in 0..ts {
            for i in 0..ts {
                let (ar, ac) = src(row_origin, kb, i, j);
                let (br, bc) = src(col_origin, kb, i, j);
                at.set(j, i, a.guarded_read(ar, ac));
                att.set(j, i, Op::apply(b.guarded_read(br, bc)));
            }
        }
        // barrier: all loads land before any lane reads the tiles

        let end = ts.min(k - kb);
        if diagonal_shortcut && tile_row == tile_col {
            // a diagonal tile already sees both operand roles, so both
            // rank-2k terms fold in this single pass; off-diagonal tiles
            // must not take this path
            for j in 0..ts {
                for i in 0..ts {
                    for kk in 0..end {
                        out[i + j * ts] += alpha
                            * (at.get(kk, i) * att.get(kk, j) + at.get(kk, j) * att.get(kk, i));
                    }
                }
            }
            // barrier: reads finish before the next load overwrites scratch
            kb += ts;
            continue;
        }

        for j in 0..ts {
            for i in 0..ts {
                for kk in 0..end {
                    out[i + j * ts] += alpha * at.get(kk, i) * att.get(kk, j);
                }
            }
        }
        // barrier: reads finish before the swapped load overwrites scratch

        // swap the operands and repeat to pick up the second rank-2k term
        for j in 0..ts {
            for i in 0..ts {
                let (ar, ac) = src(row_origin, kb, i, j);
                let (br, bc) = src(col_origin, kb, i, j);
                at.set(j, i, b.guarded_read(ar, ac));
                att.set(j, i, Op::apply(a.guarded_read(br, bc)));
            }
        }
        // barrier: swapped loads land before any lane reads them

        for j in 0..ts {
            for i in 0..ts {
                for kk in 0..end {
                    out[i + j * ts] += alpha * at.get(kk, i) * att.get(kk, j);
                }
            }
        }
        // barrier: reads finish before the next k-block's load

        kb += ts;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Triple-loop reference: alpha*(A*B^T + B*A^T) + beta*C (or the
    /// transposed-operand variant) on the selected triangle only.
    #[allow(clippy::too_many_arguments)]
    fn syr2k_reference(
        uplo: Uplo,
        trans: Transpose,
        n: usize,
        k: usize,
        alpha: f64,
        a: &[f64],
        lda: usize,
        b: &[f64],
        ldb: usize,
        beta: f64,
        c: &mut [f64],
        ldc: usize,
    ) {
        let get = |m: &[f64], ld: usize, i: usize, j: usize| m[i + j * ld];
        for j in 0..n {
            for i in 0..n {
                if !uplo.contains(i, j) {
                    continue;
                }
                let mut acc = 0.0;
                for p in 0..k {
                    let (a_ip, b_jp, b_ip, a_jp) = if trans.is_trans() {
                        (
                            get(a, lda, p, i),
                            get(b, ldb, p, j),
                            get(b, ldb, p, i),
                            get(a, lda, p, j),
                        )
                    } else {
                        (
                            get(a, lda, i, p),
                            get(b, ldb, j, p),
                            get(b, ldb, i, p),
                            get(a, lda, j, p),
                        )
                    };
                    acc += a_ip * b_jp + b_ip * a_jp;
                }
                let idx = i + j * ldc;
                c[idx] = if beta == 0.0 {
                    alpha * acc
                } else {
                    alpha * acc + beta * c[idx]
                };
            }
        }
    }

    fn random_matrix(rng: &mut StdRng, len: usize) -> Vec<f64> {
        (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect()
    }

    fn operand_len(trans: Transpose, n: usize, k: usize, ld: usize) -> usize {
        let (rows, cols) = if trans.is_trans() { (k, n) } else { (n, k) };
        if cols == 0 {
            0
        } else {
            (cols - 1) * ld + rows
        }
    }

    #[test]
    fn test_syr2k_matches_reference_across_shapes() {
        let ctx = Context::new();
        let mut rng = StdRng::seed_from_u64(0x5_2_4B);
        for &n in &[0usize, 1, 15, 16, 17, 33] {
            for &k in &[0usize, 1, 15, 16, 17, 33] {
                for uplo in [Uplo::Upper, Uplo::Lower] {
                    for trans in [Transpose::NoTrans, Transpose::Trans] {
                        for &beta in &[0.0f64, 1.0, 2.5] {
                            let (rows, _) = if trans.is_trans() { (k, n) } else { (n, k) };
                            let lda = rows.max(1);
                            let a = random_matrix(&mut rng, operand_len(trans, n, k, lda));
                            let b = random_matrix(&mut rng, operand_len(trans, n, k, lda));
                            let base = random_matrix(&mut rng, n * n.max(1));

                            let mut got = base.clone();
                            syr2k(
                                &ctx, uplo, trans, n, k, 1.2, &a, lda, &b, lda, beta, &mut got,
                                n.max(1),
                            )
                            .unwrap();

                            let mut expect = base.clone();
                            syr2k_reference(
                                uplo, trans, n, k, 1.2, &a, lda, &b, lda, beta, &mut expect,
                                n.max(1),
                            );

                            for (g, e) in got.iter().zip(&expect) {
                                assert_relative_eq!(
                                    *g,
                                    *e,
                                    max_relative = 1e-10,
                                    epsilon = 1e-10
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_syr2k_f32_matches_reference() {
        let ctx = Context::new();
        let mut rng = StdRng::seed_from_u64(7);
        let (n, k) = (33, 17);
        let a64 = random_matrix(&mut rng, n * k);
        let b64 = random_matrix(&mut rng, n * k);
        let c64 = random_matrix(&mut rng, n * n);

        let a: Vec<f32> = a64.iter().map(|&v| v as f32).collect();
        let b: Vec<f32> = b64.iter().map(|&v| v as f32).collect();
        let mut c: Vec<f32> = c64.iter().map(|&v| v as f32).collect();
        syr2k(
            &ctx,
            Uplo::Lower,
            Transpose::NoTrans,
            n,
            k,
            0.75f32,
            &a,
            n,
            &b,
            n,
            1.0,
            &mut c,
            n,
        )
        .unwrap();

        let mut expect = c64.clone();
        syr2k_reference(
            Uplo::Lower,
            Transpose::NoTrans,
            n,
            k,
            0.75,
            &a64,
            n,
            &b64,
            n,
            1.0,
            &mut expect,
            n,
        );
        for (g, e) in c.iter().zip(&expect) {
            assert_relative_eq!(*g as f64, *e, max_relative = 1e-4, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_syr2k_excluded_triangle_bit_identical() {
        let ctx = Context::new();
        let mut rng = StdRng::seed_from_u64(99);
        for &n in &[1usize, 15, 16, 17, 33] {
            for uplo in [Uplo::Upper, Uplo::Lower] {
                for &beta in &[0.0f64, 1.0, 2.5] {
                    let k = 9;
                    let a = random_matrix(&mut rng, n * k);
                    let b = random_matrix(&mut rng, n * k);
                    let base = random_matrix(&mut rng, n * n);
                    let mut c = base.clone();
                    syr2k(
                        &ctx,
                        uplo,
                        Transpose::NoTrans,
                        n,
                        k,
                        1.1,
                        &a,
                        n,
                        &b,
                        n,
                        beta,
                        &mut c,
                        n,
                    )
                    .unwrap();
                    for j in 0..n {
                        for i in 0..n {
                            if !uplo.contains(i, j) {
                                assert_eq!(
                                    c[i + j * n].to_bits(),
                                    base[i + j * n].to_bits(),
                                    "n={} uplo={:?} beta={} i={} j={}",
                                    n,
                                    uplo,
                                    beta,
                                    i,
                                    j
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_syr2k_beta_zero_never_reads_c() {
        let ctx = Context::new();
        let mut rng = StdRng::seed_from_u64(3);
        let (n, k) = (17, 5);
        let a = random_matrix(&mut rng, n * k);
        let b = random_matrix(&mut rng, n * k);
        // poison the destination triangle: beta == 0 must overwrite
        // without the poison leaking into any sum
        let mut c = vec![f64::NAN; n * n];
        syr2k(
            &ctx,
            Uplo::Upper,
            Transpose::NoTrans,
            n,
            k,
            2.0,
            &a,
            n,
            &b,
            n,
            0.0,
            &mut c,
            n,
        )
        .unwrap();
        for j in 0..n {
            for i in 0..=j {
                assert!(c[i + j * n].is_finite(), "i={} j={}", i, j);
            }
        }
    }

    #[test]
    fn test_syr2k_degenerate_shapes() {
        let ctx = Context::new();
        // n == 0: nothing to touch, any beta
        syr2k::<f64>(
            &ctx,
            Uplo::Upper,
            Transpose::NoTrans,
            0,
            5,
            1.0,
            &[],
            1,
            &[],
            1,
            0.0,
            &mut [],
            1,
        )
        .unwrap();

        // k == 0, beta == 1: C unchanged
        let base: Vec<f64> = (0..9).map(|v| v as f64).collect();
        let mut c = base.clone();
        syr2k::<f64>(
            &ctx,
            Uplo::Lower,
            Transpose::NoTrans,
            3,
            0,
            1.0,
            &[],
            3,
            &[],
            3,
            1.0,
            &mut c,
            3,
        )
        .unwrap();
        assert_eq!(c, base);

        // k == 0, beta == 0: selected triangle zeroed, rest untouched
        let mut c = base.clone();
        syr2k::<f64>(
            &ctx,
            Uplo::Lower,
            Transpose::NoTrans,
            3,
            0,
            1.0,
            &[],
            3,
            &[],
            3,
            0.0,
            &mut c,
            3,
        )
        .unwrap();
        for j in 0..3 {
            for i in 0..3 {
                let expect = if i >= j { 0.0 } else { base[i + j * 3] };
                assert_eq!(c[i + j * 3], expect);
            }
        }

        // alpha == 0 with beta == 2.5: triangle scaled, no kernel launch
        let mut c = base.clone();
        syr2k(
            &ctx,
            Uplo::Upper,
            Transpose::NoTrans,
            3,
            4,
            0.0,
            &[1.0; 12],
            3,
            &[1.0; 12],
            3,
            2.5,
            &mut c,
            3,
        )
        .unwrap();
        for j in 0..3 {
            for i in 0..3 {
                let expect = if j >= i {
                    2.5 * base[i + j * 3]
                } else {
                    base[i + j * 3]
                };
                assert_eq!(c[i + j * 3], expect);
            }
        }
    }

    #[test]
    fn test_syr2k_conj_trans_equals_trans() {
        let ctx = Context::new();
        let mut rng = StdRng::seed_from_u64(21);
        let (n, k) = (17, 16);
        let a = random_matrix(&mut rng, k * n);
        let b = random_matrix(&mut rng, k * n);
        let base = random_matrix(&mut rng, n * n);

        let mut c1 = base.clone();
        syr2k(
            &ctx,
            Uplo::Upper,
            Transpose::Trans,
            n,
            k,
            1.3,
            &a,
            k,
            &b,
            k,
            0.5,
            &mut c1,
            n,
        )
        .unwrap();
        let mut c2 = base.clone();
        syr2k(
            &ctx,
            Uplo::Upper,
            Transpose::ConjTrans,
            n,
            k,
            1.3,
            &a,
            k,
            &b,
            k,
            0.5,
            &mut c2,
            n,
        )
        .unwrap();
        assert_eq!(c1, c2);
    }

    #[test]
    fn test_diagonal_shortcut_equivalence() {
        // the fused diagonal pass and the brute-force double pass must
        // agree on diagonal-straddling problems; guards against both
        // double-counting and under-counting
        let ctx = Context::new();
        let mut rng = StdRng::seed_from_u64(0xD1A6);
        for &(n, k, ts) in &[(24usize, 10usize, 16usize), (16, 16, 16), (7, 5, 4), (33, 17, 16)] {
            for uplo in [Uplo::Upper, Uplo::Lower] {
                for trans in [Transpose::NoTrans, Transpose::Trans] {
                    let (rows, cols) = if trans.is_trans() { (k, n) } else { (n, k) };
                    let a_data = random_matrix(&mut rng, rows.max(1) * cols.max(1));
                    let b_data = random_matrix(&mut rng, rows.max(1) * cols.max(1));
                    let base = random_matrix(&mut rng, n * n);
                    let lda = rows.max(1);

                    let a = MatrixView::new(rows, cols, &a_data, lda).unwrap();
                    let b = MatrixView::new(rows, cols, &b_data, lda).unwrap();

                    let mut c_fast = base.clone();
                    let mut view = MatrixViewMut::new(n, n, &mut c_fast, n).unwrap();
                    syr2k_tiled::<f64, Noop>(
                        &ctx, uplo, trans, n, k, 0.9, a, b, 1.0, &mut view, ts, true,
                    );

                    let mut c_brute = base.clone();
                    let mut view = MatrixViewMut::new(n, n, &mut c_brute, n).unwrap();
                    syr2k_tiled::<f64, Noop>(
                        &ctx, uplo, trans, n, k, 0.9, a, b, 1.0, &mut view, ts, false,
                    );

                    for (f, s) in c_fast.iter().zip(&c_brute) {
                        assert_relative_eq!(*f, *s, max_relative = 1e-12, epsilon = 1e-12);
                    }
                }
            }
        }
    }

    #[test]
    fn test_syr2k_argument_errors() {
        let ctx = Context::new();
        let a = [0.0f64; 8];
        let b = [0.0f64; 8];
        let mut c = [0.0f64; 16];
        // lda too small for a 4 x 2 operand
        assert!(matches!(
            syr2k(&ctx, Uplo::Upper, Transpose::NoTrans, 4, 2, 1.0, &a, 3, &b, 4, 1.0, &mut c, 4),
            Err(BlasError::InvalidArgument { index: 7, .. })
        ));
        // ldc too small
        assert!(matches!(
            syr2k(&ctx, Uplo::Upper, Transpose::NoTrans, 4, 2, 1.0, &a, 4, &b, 4, 1.0, &mut c, 3),
            Err(BlasError::InvalidArgument { index: 12, .. })
        ));
        // c storage too short
        let mut short = [0.0f64; 15];
        assert!(matches!(
            syr2k(&ctx, Uplo::Upper, Transpose::NoTrans, 4, 2, 1.0, &a, 4, &b, 4, 1.0, &mut short, 4),
            Err(BlasError::InvalidArgument { index: 11, .. })
        ));
    }
}
