//! C calling-convention boundary for tileblas.
//!
//! Every function returns its own `TbStatus`; scalar results are written
//! through out-pointers. Panics are caught here and mapped to
//! `TbStatus::ErrorInternal`, so no unwind ever crosses the boundary.
//! Pointer and dimension preconditions are enforced before any kernel is
//! entered; the compute layer never sees a null pointer or a negative
//! extent.

mod context;
mod error;
mod types;

pub use context::*;
pub use error::*;
pub use types::*;

use std::ffi::c_char;
use std::panic::AssertUnwindSafe;
use std::slice;

use tb_core::{BlasError, Scalar};

/// Execute a closure that returns a `TbStatus`, catching any panics and
/// converting them into `TbStatus::ErrorInternal`.
fn catch_panic<F: FnOnce() -> TbStatus>(f: F) -> TbStatus {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(status) => status,
        Err(_) => {
            set_last_error("internal panic".to_string());
            TbStatus::ErrorInternal
        }
    }
}

/// Record `e` as the calling thread's last error and map it to a status.
fn fail(e: &BlasError) -> TbStatus {
    set_last_error(e.to_string());
    TbStatus::from(e)
}

fn fail_null(what: &str) -> TbStatus {
    set_last_error(format!("{} is null", what));
    TbStatus::ErrorInvalidArgument
}

/// Create a new execution context.
///
/// `threads == 0` selects the shared worker pool; a positive count builds
/// a dedicated pool. On success writes a heap-allocated `TbContext`
/// pointer into `*ctx_out`; the caller must later release it with
/// `tb_context_destroy`.
#[no_mangle]
pub extern "C" fn tb_context_create(
    backend: TbBackend,
    threads: i32,
    ctx_out: *mut *mut TbContext,
) -> TbStatus {
    catch_panic(|| {
        if ctx_out.is_null() {
            return fail_null("ctx_out");
        }
        if threads < 0 {
            return fail(&BlasError::invalid_argument("context", 2));
        }
        if backend != TbBackend::Cpu {
            return fail(&BlasError::unsupported(
                "context",
                "no accelerator backend is built into this library",
            ));
        }
        match TbContext::new(threads as usize) {
            Ok(ctx) => {
                unsafe {
                    *ctx_out = Box::into_raw(Box::new(ctx));
                }
                TbStatus::Ok
            }
            Err(e) => fail(&e),
        }
    })
}

/// Destroy a context previously created by `tb_context_create`.
///
/// Passing a null pointer is a no-op and returns `TbStatus::Ok`.
#[no_mangle]
pub unsafe extern "C" fn tb_context_destroy(ctx: *mut TbContext) -> TbStatus {
    if ctx.is_null() {
        return TbStatus::Ok;
    }
    drop(unsafe { Box::from_raw(ctx) });
    TbStatus::Ok
}

fn asum_impl<T: Scalar>(
    ctx: *const TbContext,
    n: i32,
    x: *const T,
    incx: i32,
    out: *mut T,
) -> TbStatus {
    if out.is_null() {
        return fail_null("out");
    }
    if n < 0 {
        return fail(&BlasError::invalid_argument("asum", 1));
    }
    // quick return
    if n == 0 || incx <= 0 {
        unsafe { *out = T::ZERO };
        return TbStatus::Ok;
    }
    if ctx.is_null() || x.is_null() {
        return fail_null("argument");
    }
    let (n, incx) = (n as usize, incx as usize);
    let x = unsafe { slice::from_raw_parts(x, (n - 1) * incx + 1) };
    let ctx = unsafe { &(*ctx).ctx };
    match tb_blas::asum(ctx, n, x, incx) {
        Ok(v) => {
            unsafe { *out = v };
            TbStatus::Ok
        }
        Err(e) => fail(&e),
    }
}

/// Sum of absolute values, single precision.
#[no_mangle]
pub unsafe extern "C" fn tb_sasum(
    ctx: *const TbContext,
    n: i32,
    x: *const f32,
    incx: i32,
    out: *mut f32,
) -> TbStatus {
    catch_panic(|| asum_impl(ctx, n, x, incx, out))
}

/// Sum of absolute values, double precision.
#[no_mangle]
pub unsafe extern "C" fn tb_dasum(
    ctx: *const TbContext,
    n: i32,
    x: *const f64,
    incx: i32,
    out: *mut f64,
) -> TbStatus {
    catch_panic(|| asum_impl(ctx, n, x, incx, out))
}

fn nrm2_impl<T: Scalar>(
    ctx: *const TbContext,
    n: i32,
    x: *const T,
    incx: i32,
    out: *mut T,
) -> TbStatus {
    if out.is_null() {
        return fail_null("out");
    }
    if n < 0 {
        return fail(&BlasError::invalid_argument("nrm2", 1));
    }
    // quick return
    if n == 0 || incx <= 0 {
        unsafe { *out = T::ZERO };
        return TbStatus::Ok;
    }
    if ctx.is_null() || x.is_null() {
        return fail_null("argument");
    }
    let (n, incx) = (n as usize, incx as usize);
    let x = unsafe { slice::from_raw_parts(x, (n - 1) * incx + 1) };
    let ctx = unsafe { &(*ctx).ctx };
    match tb_blas::nrm2(ctx, n, x, incx) {
        Ok(v) => {
            unsafe { *out = v };
            TbStatus::Ok
        }
        Err(e) => fail(&e),
    }
}

/// Euclidean norm, single precision.
#[no_mangle]
pub unsafe extern "C" fn tb_snrm2(
    ctx: *const TbContext,
    n: i32,
    x: *const f32,
    incx: i32,
    out: *mut f32,
) -> TbStatus {
    catch_panic(|| nrm2_impl(ctx, n, x, incx, out))
}

/// Euclidean norm, double precision.
#[no_mangle]
pub unsafe extern "C" fn tb_dnrm2(
    ctx: *const TbContext,
    n: i32,
    x: *const f64,
    incx: i32,
    out: *mut f64,
) -> TbStatus {
    catch_panic(|| nrm2_impl(ctx, n, x, incx, out))
}

#[allow(clippy::too_many_arguments)]
fn dot_impl<T: Scalar>(
    ctx: *const TbContext,
    n: i32,
    x: *const T,
    incx: i32,
    y: *const T,
    incy: i32,
    out: *mut T,
) -> TbStatus {
    if out.is_null() {
        return fail_null("out");
    }
    if n < 0 {
        return fail(&BlasError::invalid_argument("dot", 1));
    }
    if n == 0 {
        unsafe { *out = T::ZERO };
        return TbStatus::Ok;
    }
    if incx <= 0 {
        return fail(&BlasError::invalid_argument("dot", 3));
    }
    if incy <= 0 {
        return fail(&BlasError::invalid_argument("dot", 5));
    }
    if ctx.is_null() || x.is_null() || y.is_null() {
        return fail_null("argument");
    }
    let (n, incx, incy) = (n as usize, incx as usize, incy as usize);
    let x = unsafe { slice::from_raw_parts(x, (n - 1) * incx + 1) };
    let y = unsafe { slice::from_raw_parts(y, (n - 1) * incy + 1) };
    let ctx = unsafe { &(*ctx).ctx };
    match tb_blas::dot(ctx, n, x, incx, y, incy) {
        Ok(v) => {
            unsafe { *out = v };
            TbStatus::Ok
        }
        Err(e) => fail(&e),
    }
}

/// Inner product, single precision.
#[no_mangle]
pub unsafe extern "C" fn tb_sdot(
    ctx: *const TbContext,
    n: i32,
    x: *const f32,
    incx: i32,
    y: *const f32,
    incy: i32,
    out: *mut f32,
) -> TbStatus {
    catch_panic(|| dot_impl(ctx, n, x, incx, y, incy, out))
}

/// Inner product, double precision.
#[no_mangle]
pub unsafe extern "C" fn tb_ddot(
    ctx: *const TbContext,
    n: i32,
    x: *const f64,
    incx: i32,
    y: *const f64,
    incy: i32,
    out: *mut f64,
) -> TbStatus {
    catch_panic(|| dot_impl(ctx, n, x, incx, y, incy, out))
}

fn amax_impl<T: Scalar>(
    ctx: *const TbContext,
    n: i32,
    x: *const T,
    incx: i32,
    out: *mut i64,
) -> TbStatus {
    if out.is_null() {
        return fail_null("out");
    }
    if n < 0 {
        return fail(&BlasError::invalid_argument("amax", 1));
    }
    // quick return
    if n == 0 || incx <= 0 {
        unsafe { *out = 0 };
        return TbStatus::Ok;
    }
    if ctx.is_null() || x.is_null() {
        return fail_null("argument");
    }
    let (n, incx) = (n as usize, incx as usize);
    let x = unsafe { slice::from_raw_parts(x, (n - 1) * incx + 1) };
    let ctx = unsafe { &(*ctx).ctx };
    match tb_blas::amax(ctx, n, x, incx) {
        Ok(idx) => {
            unsafe { *out = idx as i64 };
            TbStatus::Ok
        }
        Err(e) => fail(&e),
    }
}

/// Zero-based index of the first element of largest absolute value,
/// single precision.
#[no_mangle]
pub unsafe extern "C" fn tb_isamax(
    ctx: *const TbContext,
    n: i32,
    x: *const f32,
    incx: i32,
    out: *mut i64,
) -> TbStatus {
    catch_panic(|| amax_impl(ctx, n, x, incx, out))
}

/// Zero-based index of the first element of largest absolute value,
/// double precision.
#[no_mangle]
pub unsafe extern "C" fn tb_idamax(
    ctx: *const TbContext,
    n: i32,
    x: *const f64,
    incx: i32,
    out: *mut i64,
) -> TbStatus {
    catch_panic(|| amax_impl(ctx, n, x, incx, out))
}

#[allow(clippy::too_many_arguments)]
fn axpy_impl<T: Scalar>(
    ctx: *const TbContext,
    n: i32,
    alpha: T,
    x: *const T,
    incx: i32,
    y: *mut T,
    incy: i32,
) -> TbStatus {
    if n < 0 {
        return fail(&BlasError::invalid_argument("axpy", 1));
    }
    // quick return
    if n == 0 {
        return TbStatus::Ok;
    }
    if incx <= 0 {
        return fail(&BlasError::invalid_argument("axpy", 4));
    }
    if incy <= 0 {
        return fail(&BlasError::invalid_argument("axpy", 6));
    }
    if ctx.is_null() || x.is_null() || y.is_null() {
        return fail_null("argument");
    }
    let (n, incx, incy) = (n as usize, incx as usize, incy as usize);
    let x = unsafe { slice::from_raw_parts(x, (n - 1) * incx + 1) };
    let y = unsafe { slice::from_raw_parts_mut(y, (n - 1) * incy + 1) };
    let ctx = unsafe { &(*ctx).ctx };
    match tb_blas::axpy(ctx, n, alpha, x, incx, y, incy) {
        Ok(()) => TbStatus::Ok,
        Err(e) => fail(&e),
    }
}

/// y := alpha * x + y, single precision.
#[no_mangle]
pub unsafe extern "C" fn tb_saxpy(
    ctx: *const TbContext,
    n: i32,
    alpha: f32,
    x: *const f32,
    incx: i32,
    y: *mut f32,
    incy: i32,
) -> TbStatus {
    catch_panic(|| axpy_impl(ctx, n, alpha, x, incx, y, incy))
}

/// y := alpha * x + y, double precision.
#[no_mangle]
pub unsafe extern "C" fn tb_daxpy(
    ctx: *const TbContext,
    n: i32,
    alpha: f64,
    x: *const f64,
    incx: i32,
    y: *mut f64,
    incy: i32,
) -> TbStatus {
    catch_panic(|| axpy_impl(ctx, n, alpha, x, incx, y, incy))
}

fn scal_impl<T: Scalar>(
    ctx: *const TbContext,
    n: i32,
    alpha: T,
    x: *mut T,
    incx: i32,
) -> TbStatus {
    if n < 0 {
        return fail(&BlasError::invalid_argument("scal", 1));
    }
    // quick return
    if n == 0 {
        return TbStatus::Ok;
    }
    if incx <= 0 {
        return fail(&BlasError::invalid_argument("scal", 4));
    }
    if ctx.is_null() || x.is_null() {
        return fail_null("argument");
    }
    let (n, incx) = (n as usize, incx as usize);
    let x = unsafe { slice::from_raw_parts_mut(x, (n - 1) * incx + 1) };
    let ctx = unsafe { &(*ctx).ctx };
    match tb_blas::scal(ctx, n, alpha, x, incx) {
        Ok(()) => TbStatus::Ok,
        Err(e) => fail(&e),
    }
}

/// x := alpha * x, single precision.
#[no_mangle]
pub unsafe extern "C" fn tb_sscal(
    ctx: *const TbContext,
    n: i32,
    alpha: f32,
    x: *mut f32,
    incx: i32,
) -> TbStatus {
    catch_panic(|| scal_impl(ctx, n, alpha, x, incx))
}

/// x := alpha * x, double precision.
#[no_mangle]
pub unsafe extern "C" fn tb_dscal(
    ctx: *const TbContext,
    n: i32,
    alpha: f64,
    x: *mut f64,
    incx: i32,
) -> TbStatus {
    catch_panic(|| scal_impl(ctx, n, alpha, x, incx))
}

#[allow(clippy::too_many_arguments)]
fn syr_impl<T: Scalar>(
    ctx: *const TbContext,
    uplo: TbUplo,
    n: i32,
    alpha: T,
    x: *const T,
    incx: i32,
    a: *mut T,
    lda: i32,
) -> TbStatus {
    if n < 0 {
        return fail(&BlasError::invalid_argument("syr", 2));
    }
    // quick return
    if n == 0 {
        return TbStatus::Ok;
    }
    if incx <= 0 {
        return fail(&BlasError::invalid_argument("syr", 5));
    }
    if (lda as i64) < n as i64 {
        return fail(&BlasError::invalid_argument("syr", 7));
    }
    if ctx.is_null() || x.is_null() || a.is_null() {
        return fail_null("argument");
    }
    let (n, incx, lda) = (n as usize, incx as usize, lda as usize);
    let x = unsafe { slice::from_raw_parts(x, (n - 1) * incx + 1) };
    let a = unsafe { slice::from_raw_parts_mut(a, (n - 1) * lda + n) };
    let ctx = unsafe { &(*ctx).ctx };
    match tb_blas::syr(ctx, uplo.into(), n, alpha, x, incx, a, lda) {
        Ok(()) => TbStatus::Ok,
        Err(e) => fail(&e),
    }
}

/// Symmetric rank-1 update A := alpha * x * x^T + A, single precision.
#[no_mangle]
pub unsafe extern "C" fn tb_ssyr(
    ctx: *const TbContext,
    uplo: TbUplo,
    n: i32,
    alpha: f32,
    x: *const f32,
    incx: i32,
    a: *mut f32,
    lda: i32,
) -> TbStatus {
    catch_panic(|| syr_impl(ctx, uplo, n, alpha, x, incx, a, lda))
}

/// Symmetric rank-1 update A := alpha * x * x^T + A, double precision.
#[no_mangle]
pub unsafe extern "C" fn tb_dsyr(
    ctx: *const TbContext,
    uplo: TbUplo,
    n: i32,
    alpha: f64,
    x: *const f64,
    incx: i32,
    a: *mut f64,
    lda: i32,
) -> TbStatus {
    catch_panic(|| syr_impl(ctx, uplo, n, alpha, x, incx, a, lda))
}

#[allow(clippy::too_many_arguments)]
fn syr2k_impl<T: Scalar>(
    ctx: *const TbContext,
    uplo: TbUplo,
    trans: TbTranspose,
    n: i32,
    k: i32,
    alpha: T,
    a: *const T,
    lda: i32,
    b: *const T,
    ldb: i32,
    beta: T,
    c: *mut T,
    ldc: i32,
) -> TbStatus {
    if n < 0 {
        return fail(&BlasError::invalid_argument("syr2k", 3));
    }
    if k < 0 {
        return fail(&BlasError::invalid_argument("syr2k", 4));
    }
    // quick return
    if n == 0 {
        return TbStatus::Ok;
    }

    let trans_sel: tb_core::Transpose = trans.into();
    let (n, k) = (n as usize, k as usize);
    let (rows, cols) = if trans_sel.is_trans() { (k, n) } else { (n, k) };

    if lda <= 0 || (lda as usize) < rows.max(1) {
        return fail(&BlasError::invalid_argument("syr2k", 7));
    }
    if ldb <= 0 || (ldb as usize) < rows.max(1) {
        return fail(&BlasError::invalid_argument("syr2k", 9));
    }
    if ldc <= 0 || (ldc as usize) < n {
        return fail(&BlasError::invalid_argument("syr2k", 12));
    }
    if ctx.is_null() || a.is_null() || b.is_null() || c.is_null() {
        return fail_null("argument");
    }
    let (lda, ldb, ldc) = (lda as usize, ldb as usize, ldc as usize);

    // the coefficient-zero paths never read A or B
    let beta_only = k == 0 || alpha == T::ZERO;
    let a_len = if beta_only { 0 } else { (cols - 1) * lda + rows };
    let b_len = if beta_only { 0 } else { (cols - 1) * ldb + rows };
    let a = unsafe { slice::from_raw_parts(a, a_len) };
    let b = unsafe { slice::from_raw_parts(b, b_len) };
    let c = unsafe { slice::from_raw_parts_mut(c, (n - 1) * ldc + n) };
    let ctx = unsafe { &(*ctx).ctx };
    match tb_blas::syr2k(
        ctx,
        uplo.into(),
        trans_sel,
        n,
        k,
        alpha,
        a,
        lda,
        b,
        ldb,
        beta,
        c,
        ldc,
    ) {
        Ok(()) => TbStatus::Ok,
        Err(e) => fail(&e),
    }
}

/// Symmetric rank-2k update, single precision.
///
/// C := alpha * (A * B^T + B * A^T) + beta * C restricted to the selected
/// triangle; the transposed-operand variant when `trans` is not `NoTrans`.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn tb_ssyr2k(
    ctx: *const TbContext,
    uplo: TbUplo,
    trans: TbTranspose,
    n: i32,
    k: i32,
    alpha: f32,
    a: *const f32,
    lda: i32,
    b: *const f32,
    ldb: i32,
    beta: f32,
    c: *mut f32,
    ldc: i32,
) -> TbStatus {
    catch_panic(|| syr2k_impl(ctx, uplo, trans, n, k, alpha, a, lda, b, ldb, beta, c, ldc))
}

/// Symmetric rank-2k update, double precision.
///
/// C := alpha * (A * B^T + B * A^T) + beta * C restricted to the selected
/// triangle; the transposed-operand variant when `trans` is not `NoTrans`.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn tb_dsyr2k(
    ctx: *const TbContext,
    uplo: TbUplo,
    trans: TbTranspose,
    n: i32,
    k: i32,
    alpha: f64,
    a: *const f64,
    lda: i32,
    b: *const f64,
    ldb: i32,
    beta: f64,
    c: *mut f64,
    ldc: i32,
) -> TbStatus {
    catch_panic(|| syr2k_impl(ctx, uplo, trans, n, k, alpha, a, lda, b, ldb, beta, c, ldc))
}

/// Retrieve the last error message recorded on the calling thread.
///
/// Returns a pointer to a C string describing the most recent error, or
/// null if no error has occurred. The caller must free the returned
/// string with `tb_free_string`.
#[no_mangle]
pub extern "C" fn tb_last_error() -> *const c_char {
    match take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null(),
    }
}

/// Free a string previously returned by `tb_last_error`.
#[no_mangle]
pub unsafe extern "C" fn tb_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { std::ffi::CString::from_raw(s) });
    }
}
