//! Equality filters for selecting stored documents.
//!
//! A [Filter] is a conjunction of `field == value` conditions. Filters are
//! built from a [crate::collection::Document] (every entry becomes a
//! condition) or with the fluent API:
//!
//! ```rust,ignore
//! use sirang::filter::{all, by_id, field};
//!
//! let filter = field("test").eq("x").and(field("unique").eq(1));
//! let one = by_id("doc-0");
//! let everything = all();
//! ```

mod eq_filter;
mod fluent;

pub use eq_filter::*;
pub use fluent::*;
