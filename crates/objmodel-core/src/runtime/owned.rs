//! Single-owner handle with a pluggable release policy.
//!
//! [`UniqueHandle`] owns at most one boxed value and hands it to its
//! [`ReleasePolicy`] exactly once: on [`reset`](UniqueHandle::reset),
//! on [`replace`](UniqueHandle::replace), or when the handle is dropped.
//! [`take`](UniqueHandle::take) gives ownership back without releasing.
//!
//! The handle owns a `Box<T>`, so no second owner of the same value can
//! exist and releasing twice cannot be expressed.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use objmodel_core::UniqueHandle;
//!
//! let released = Cell::new(0);
//! {
//!     let mut handle = UniqueHandle::with_policy(Box::new(42), |_v: Box<i32>| {
//!         released.set(released.get() + 1);
//!     });
//!     assert_eq!(*handle.get().unwrap(), 42);
//!     handle.reset();
//!     assert!(handle.is_empty());
//! } // nothing left to release on drop
//! assert_eq!(released.get(), 1);
//! ```

use std::fmt;

/// Disposes of a value owned by a [`UniqueHandle`].
pub trait ReleasePolicy<T: ?Sized> {
    /// Release the owned value.
    fn release(&mut self, value: Box<T>);
}

impl<T: ?Sized, F> ReleasePolicy<T> for F
where
    F: FnMut(Box<T>),
{
    fn release(&mut self, value: Box<T>) {
        self(value)
    }
}

/// Release by dropping the box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultRelease;

impl<T: ?Sized> ReleasePolicy<T> for DefaultRelease {
    fn release(&mut self, value: Box<T>) {
        drop(value);
    }
}

/// A move-only owning handle.
pub struct UniqueHandle<T: ?Sized, R: ReleasePolicy<T> = DefaultRelease> {
    value: Option<Box<T>>,
    policy: R,
}

impl<T: ?Sized> UniqueHandle<T, DefaultRelease> {
    /// Own `value`, releasing it by dropping.
    pub fn new(value: Box<T>) -> Self {
        Self::with_policy(value, DefaultRelease)
    }
}

impl<T: ?Sized, R: ReleasePolicy<T>> UniqueHandle<T, R> {
    /// Own `value`, releasing it through `policy`.
    pub fn with_policy(value: Box<T>, policy: R) -> Self {
        Self {
            value: Some(value),
            policy,
        }
    }

    /// A handle that owns nothing yet.
    pub fn empty(policy: R) -> Self {
        Self {
            value: None,
            policy,
        }
    }

    /// Whether the handle owns nothing.
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Borrow the owned value.
    pub fn get(&self) -> Option<&T> {
        self.value.as_deref()
    }

    /// Mutably borrow the owned value.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.value.as_deref_mut()
    }

    /// Release the owned value now. Does nothing when empty.
    pub fn reset(&mut self) {
        if let Some(value) = self.value.take() {
            tracing::trace!("releasing owned value on reset");
            self.policy.release(value);
        }
    }

    /// Release the current value (if any) and own `value` instead.
    pub fn replace(&mut self, value: Box<T>) {
        self.reset();
        self.value = Some(value);
    }

    /// Give up ownership without releasing.
    pub fn take(&mut self) -> Option<Box<T>> {
        self.value.take()
    }

    /// Borrow the release policy.
    pub fn policy(&self) -> &R {
        &self.policy
    }
}

impl<T: ?Sized, R: ReleasePolicy<T>> Drop for UniqueHandle<T, R> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            tracing::trace!("releasing owned value on drop");
            self.policy.release(value);
        }
    }
}

impl<T: ?Sized + fmt::Debug, R: ReleasePolicy<T>> fmt::Debug for UniqueHandle<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniqueHandle")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording(log: Rc<RefCell<Vec<i32>>>) -> impl FnMut(Box<i32>) {
        move |v: Box<i32>| log.borrow_mut().push(*v)
    }

    #[test]
    fn drop_releases_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let _handle = UniqueHandle::with_policy(Box::new(7), recording(Rc::clone(&log)));
        }
        assert_eq!(*log.borrow(), vec![7]);
    }

    #[test]
    fn reset_then_drop_releases_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut handle = UniqueHandle::with_policy(Box::new(1), recording(Rc::clone(&log)));
            handle.reset();
            handle.reset();
        }
        assert_eq!(*log.borrow(), vec![1]);
    }

    #[test]
    fn take_does_not_release() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let taken = {
            let mut handle = UniqueHandle::with_policy(Box::new(3), recording(Rc::clone(&log)));
            handle.take()
        };
        assert_eq!(taken.as_deref(), Some(&3));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn replace_releases_previous() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut handle = UniqueHandle::with_policy(Box::new(1), recording(Rc::clone(&log)));
            handle.replace(Box::new(2));
            assert_eq!(handle.get(), Some(&2));
        }
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn moving_the_handle_moves_ownership() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let handle = UniqueHandle::with_policy(Box::new(5), recording(Rc::clone(&log)));
        let moved = handle;
        assert!(log.borrow().is_empty());
        drop(moved);
        assert_eq!(*log.borrow(), vec![5]);
    }

    #[test]
    fn empty_handle_releases_nothing() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handle: UniqueHandle<i32, _> = UniqueHandle::empty(recording(Rc::clone(&log)));
        assert!(handle.is_empty());
        assert_eq!(handle.get_mut(), None);
        drop(handle);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn default_release_works_for_unsized() {
        let handle: UniqueHandle<[u8]> = UniqueHandle::new(vec![1u8, 2, 3].into_boxed_slice());
        assert_eq!(handle.get().map(<[u8]>::len), Some(3));
    }
}
