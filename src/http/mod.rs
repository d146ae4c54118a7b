//! HTTP transport adapter
//!
//! Feeds inbound (method, raw target) pairs into the dispatcher and
//! translates its results into HTTP responses.

pub mod handlers;
