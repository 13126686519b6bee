//! Adapter between a message-driven host and the filter core.
//!
//! The host delivers textual messages; this layer turns them into
//! [`Command`]s, routes them to instances held by a [`FilterRegistry`], and
//! hands back [`OutletEvent`]s for the host to emit.

mod command;
mod registry;

pub use command::{Command, Outlet, OutletEvent};
pub use registry::{FilterRegistry, InstanceId};
