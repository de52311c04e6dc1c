//! Runtime counterparts of the ownership rules.
//!
//! - [`UniqueHandle`]: single owner with a release policy
//! - [`Categorized`]: a value forwarded with its capability

mod categorized;
mod owned;

pub use categorized::{Capability, Categorized};
pub use owned::{DefaultRelease, ReleasePolicy, UniqueHandle};
