//! Capture of user-function calls.
//!
//! [crate::Sirang::dstore] returns a [StoreDecorator] configured by
//! [CaptureOptions]. Wrapping a function with it yields a [CapturedFn] whose
//! every call stores the call's kept parameters, optionally with extra fields
//! returned by the function, as one document.

mod capture_options;
mod decorator;

pub use capture_options::*;
pub use decorator::*;
