//! Values that carry their own forwarding capability.
//!
//! A generic function forwarding its argument to another call must pass an
//! rvalue on as an rvalue and an lvalue on as an lvalue. [`Categorized`]
//! makes that explicit: the value is either owned (the callee may consume
//! it by moving) or borrowed (the callee must copy to keep it).

use std::fmt;

/// Whether a forwarded value may be consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// The caller gave up the value: it is an rvalue and may be moved from.
    Owned,
    /// The caller still owns the value: it is an lvalue and must be copied.
    Borrowed,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Owned => write!(f, "owned"),
            Capability::Borrowed => write!(f, "borrowed"),
        }
    }
}

/// A value together with its forwarding capability.
#[derive(Debug, PartialEq)]
pub enum Categorized<'a, T> {
    /// Moved in by the caller.
    Owned(T),
    /// Lent by the caller.
    Borrowed(&'a T),
}

impl<'a, T> Categorized<'a, T> {
    /// The capability this value was passed with.
    pub fn capability(&self) -> Capability {
        match self {
            Categorized::Owned(_) => Capability::Owned,
            Categorized::Borrowed(_) => Capability::Borrowed,
        }
    }

    /// Borrow the value regardless of capability.
    pub fn get(&self) -> &T {
        match self {
            Categorized::Owned(value) => value,
            Categorized::Borrowed(value) => value,
        }
    }

    /// Pass the value on unchanged: owned stays owned, borrowed stays borrowed.
    pub fn forward(self) -> Self {
        self
    }

    /// Pass the value on as owned, whatever it came in as.
    ///
    /// A borrowed value is copied; an owned one is moved.
    pub fn into_moved(self) -> Categorized<'a, T>
    where
        T: Clone,
    {
        Categorized::Owned(self.into_owned())
    }

    /// Consume the value: move when owned, clone when borrowed.
    pub fn into_owned(self) -> T
    where
        T: Clone,
    {
        match self {
            Categorized::Owned(value) => {
                tracing::trace!("consuming owned value by move");
                value
            }
            Categorized::Borrowed(value) => {
                tracing::trace!("consuming borrowed value by copy");
                value.clone()
            }
        }
    }
}
