//! # ck-app
//!
//! Application services for clipkeep: the clipboards manager reconciling
//! the OS selection buffers with the history, the bus facade, the
//! keybinder dispatch table, and the single-threaded service loop.

pub mod builder;
pub mod bus;
pub mod keybinder;
pub mod manager;
pub mod service;

pub use builder::ServiceBuilder;
pub use bus::{ItemSummary, Reply, Request, Signal, SignalHub};
pub use keybinder::KeyTrigger;
pub use manager::ClipboardsManager;
pub use service::{AppEvent, Service, ServiceHandle};

#[cfg(test)]
mod service_tests;
#[cfg(test)]
mod testutil;
