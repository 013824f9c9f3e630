//! Request context threaded through hooks and rendering.
//!
//! The context is created by the prehook, may be replaced by the document
//! renderer and mutated by the posthook, and is frozen once a partial render
//! has been produced. Every mutation goes through `update`, which fails after
//! `freeze`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

/// Errors raised by context access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("request context is frozen")]
    Frozen,
}

#[derive(Debug)]
struct Inner<C> {
    value: RwLock<C>,
    frozen: AtomicBool,
}

/// Shared handle to a caller-defined context value.
#[derive(Debug)]
pub struct RequestContext<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for RequestContext<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C> RequestContext<C> {
    pub fn new(value: C) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(value),
                frozen: AtomicBool::new(false),
            }),
        }
    }

    /// Read the value.
    pub fn read<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        let guard = self.inner.value.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Mutate the value. Fails once the context is frozen.
    pub fn update<R>(&self, f: impl FnOnce(&mut C) -> R) -> Result<R, ContextError> {
        let mut guard = self.inner.value.write().unwrap_or_else(PoisonError::into_inner);
        if self.inner.frozen.load(Ordering::Acquire) {
            tracing::warn!("Attempted to mutate a frozen request context");
            return Err(ContextError::Frozen);
        }
        Ok(f(&mut guard))
    }

    /// Make the context permanently read-only.
    pub fn freeze(&self) {
        // Hold the write lock so no update interleaves with the flag change.
        let _guard = self.inner.value.write().unwrap_or_else(PoisonError::into_inner);
        self.inner.frozen.store(true, Ordering::Release);
    }

    pub fn is_frozen(&self) -> bool {
        self.inner.frozen.load(Ordering::Acquire)
    }
}

impl<C: Clone> RequestContext<C> {
    /// Clone of the current value.
    pub fn get(&self) -> C {
        self.read(C::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_then_freeze() {
        let ctx = RequestContext::new(vec![1]);
        ctx.update(|v| v.push(2)).unwrap();
        assert_eq!(ctx.get(), vec![1, 2]);

        ctx.freeze();
        assert!(ctx.is_frozen());
        assert_eq!(ctx.update(|v| v.push(3)), Err(ContextError::Frozen));
        assert_eq!(ctx.read(|v| v.len()), 2);
    }

    #[test]
    fn test_clones_share_state() {
        let ctx = RequestContext::new(0u32);
        let other = ctx.clone();
        other.update(|v| *v = 7).unwrap();
        ctx.freeze();
        assert_eq!(other.get(), 7);
        assert!(other.update(|v| *v = 8).is_err());
    }
}
