//! Request middleware.
//!
//! Purpose: cross-cutting request lifecycle concerns such as trace
//! correlation and error disclosure.

pub mod error_detail;
pub mod trace;

pub use error_detail::ErrorDetails;
pub use trace::Trace;
