//! Processor identity and per-thread context installation.
//!
//! Tasklets of many vertices share one thread pool. While a tasklet runs,
//! its [`ProcessorContext`] is installed as the thread's current context
//! and its tracing span is entered, so processor code and anything it calls
//! can find out which vertex instance it is running for. The
//! [`ContextGuard`] restores the previous context on every exit path,
//! including early error returns and unwinding.

use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    static CURRENT: RefCell<Option<Arc<ProcessorContext>>> = const { RefCell::new(None) };
}

/// Identity of one processor instance.
#[derive(Debug)]
pub struct ProcessorContext {
    name: String,
    index: usize,
    span: tracing::Span,
}

impl ProcessorContext {
    /// Creates the context for instance `index` of the vertex `name`.
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        let name = name.into();
        let span = tracing::debug_span!("tasklet", vertex = %name, index);
        Self { name, index, span }
    }

    /// Vertex name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parallel instance index within the vertex.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Span entered while this context is installed.
    #[must_use]
    pub fn span(&self) -> &tracing::Span {
        &self.span
    }

    /// Installs `context` as the current thread's context until the
    /// returned guard is dropped.
    #[must_use = "the context is uninstalled when the guard is dropped"]
    pub fn install(context: &Arc<Self>) -> ContextGuard {
        let previous = CURRENT.with(|c| c.replace(Some(Arc::clone(context))));
        ContextGuard {
            previous,
            _entered: context.span.clone().entered(),
        }
    }

    /// Returns the context installed on the current thread, if any.
    #[must_use]
    pub fn current() -> Option<Arc<Self>> {
        CURRENT.with(|c| c.borrow().clone())
    }
}

/// Restores the previously installed context when dropped.
///
/// Not `Send`: it must be dropped on the thread that created it.
#[derive(Debug)]
pub struct ContextGuard {
    previous: Option<Arc<ProcessorContext>>,
    _entered: tracing::span::EnteredSpan,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|c| *c.borrow_mut() = previous);
    }
}
