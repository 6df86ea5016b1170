//! SVM solver implementations
//!
//! Training precomputes the kernel matrix ([`gram`]) and then runs the
//! simplified Sequential Minimal Optimization algorithm ([`smo`]) one sweep
//! at a time.

pub mod gram;
pub mod smo;

pub use self::gram::*;
pub use self::smo::*;
