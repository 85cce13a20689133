use tb_core::{Context, Result};

/// Opaque context handle owning the worker pool calls dispatch through.
pub struct TbContext {
    pub(crate) ctx: Context,
}

impl TbContext {
    /// A context with the default (shared) worker pool, or a dedicated
    /// pool of `threads` workers when `threads > 0`.
    pub fn new(threads: usize) -> Result<Self> {
        let ctx = if threads == 0 {
            Context::new()
        } else {
            Context::with_thread_count(threads)?
        };
        Ok(TbContext { ctx })
    }
}
