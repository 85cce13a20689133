//! `tb-core` - Execution model, typed views, and tile scheduling for tileblas.
//!
//! This crate provides:
//! - A `Scalar` trait pinning down what kernels need from an element type
//! - `VectorView`, `MatrixView`, and `MatrixViewMut` over caller-owned storage
//! - Guarded (bounds-checked) element access for padded-grid kernels
//! - `TileGrid` launch geometry with coarse triangular pruning
//! - Per-work-group `TileScratch` buffers
//! - An execution `Context` owning the worker pool calls dispatch through
//! - The `BlasError` fault taxonomy shared by every routine

pub mod context;
pub mod error;
pub mod grid;
pub mod scalar;
pub mod types;
pub mod view;

// Re-export primary types at the crate root for convenience.
pub use context::Context;
pub use error::{BlasError, Result};
pub use grid::{TileGrid, TileScratch};
pub use scalar::Scalar;
pub use types::{Transpose, Uplo};
pub use view::{MatrixView, MatrixViewMut, VectorView};
