//! The reward engine: the tiered point rule, date windows, and per-customer aggregation.
//!
//! Everything here is pure. Nothing reads the clock or performs I/O, so callers that want a
//! default window (such as "this year" or "the last three months") compute it and pass it in.

mod aggregate;
mod points;
mod window;

pub use aggregate::summarize;
pub use points::points;
pub use window::DateWindow;
