//! The build-watch engine: revision matching, status classification, poll
//! scheduling and failure diagnostics.

pub mod clock;
pub mod cost;
mod failures;
pub mod revision;
pub mod schedule;
pub mod status;
mod waiter;

pub use clock::SystemClock;
pub use waiter::{Resolution, WatchTarget, Waiter};
