//! `tb-blas` - Tiled BLAS routines over the tileblas execution core.
//!
//! This crate provides:
//! - The two-phase parallel reduction engine backing every vector aggregate
//! - Vector aggregates: `asum`, `nrm2`, `dot`, `amax`
//! - Vector updates: `axpy`, `scal`
//! - The blocked symmetric rank-2k update `syr2k` and rank-1 update `syr`
//! - Elementwise matrix maps, including the triangle-restricted variants
//!
//! Every routine validates its arguments and takes its coefficient-zero
//! quick returns before any kernel is dispatched; the kernels themselves
//! assume validated inputs.

pub mod amax;
pub mod asum;
pub mod axpy;
pub mod dot;
pub mod elementwise;
pub mod nrm2;
pub mod reduce;
pub mod scal;
pub mod syr;
pub mod syr2k;

// Re-export the routine entry points at the crate root for convenience.
pub use amax::amax;
pub use asum::asum;
pub use axpy::axpy;
pub use dot::dot;
pub use nrm2::nrm2;
pub use reduce::{reduce, tile_tree_reduce, ReduceConfig};
pub use scal::scal;
pub use syr::syr;
pub use syr2k::{syr2k, Noop, TransformOp};
