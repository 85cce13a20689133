use crate::error::{BlasError, Result};

/// Execution context a call's work-groups are dispatched through.
///
/// The default context schedules work-groups on the process-wide worker
/// pool; a context built with an explicit thread count owns a dedicated
/// pool instead. One context serves one call at a time from the caller's
/// viewpoint: a call is synchronous, and its results are defined only once
/// the whole launch has retired.
#[derive(Debug)]
pub struct Context {
    pool: Option<rayon::ThreadPool>,
}

impl Context {
    /// A context dispatching on the shared worker pool.
    pub fn new() -> Self {
        Context { pool: None }
    }

    /// A context owning a dedicated pool of `threads` workers.
    pub fn with_thread_count(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(BlasError::invalid_argument("context", 1));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| BlasError::ExecutionFault(e.to_string()))?;
        Ok(Context { pool: Some(pool) })
    }

    /// Run `f` inside this context's pool.
    ///
    /// Work-group dispatch (parallel iterators) inside `f` executes on the
    /// context's workers; the call returns once `f` and everything it
    /// spawned have completed.
    pub fn run<R: Send>(&self, f: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    /// Number of workers this context dispatches on.
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_runs() {
        let ctx = Context::new();
        assert_eq!(ctx.run(|| 41 + 1), 42);
        assert!(ctx.threads() >= 1);
    }

    #[test]
    fn test_dedicated_pool() {
        let ctx = Context::with_thread_count(2).unwrap();
        assert_eq!(ctx.threads(), 2);
        assert_eq!(ctx.run(|| rayon::current_num_threads()), 2);
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(matches!(
            Context::with_thread_count(0),
            Err(BlasError::InvalidArgument { .. })
        ));
    }
}
