//! Route registration, lookup and dispatch
//!
//! Registration populates the [`table::RouteTable`] during setup, with
//! targets validated eagerly against the component registry. At request
//! time the [`dispatcher::Dispatcher`] normalizes the inbound path, looks
//! up the (verb, path) key and invokes the matched controller operation.

pub mod dispatcher;
pub mod path;
pub mod table;

pub use dispatcher::Dispatcher;
pub use table::{HandlerReference, RouteTable, Verb};
