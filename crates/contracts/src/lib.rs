//! # Contracts
//!
//! Frozen interface contracts shared by the sink, its stream clients and
//! the binaries. Business crates depend on this crate, never the reverse.
//!
//! ## Delivery Model
//! - A sink receives an ordered batch of `PublishedMessage`s per invocation
//! - Non-retryable failures are reported through `RetryContext::bail`
//! - Everything else is returned to the caller's retry controller

mod config;
mod context;
mod error;
mod lifecycle;
mod message;
mod retry;
mod sink;

pub use config::*;
pub use context::*;
pub use error::*;
pub use lifecycle::*;
pub use message::*;
pub use retry::*;
pub use sink::*;
