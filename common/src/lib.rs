//! # svcmap common
//!
//! Shared vocabulary for every `svcmap` crate.
//!
//! * **[`discovery`]**: host names and the [`discovery::HostBrowser`] port.
//! * **[`services`]**: live service bindings and the [`services::ServiceManager`] port.
//! * **[`snapshot`]**: the flat output record and its declared column order.
//! * **[`config`]**: run-wide knobs built by the CLI.
//! * **[`error`]**: the error taxonomy shared by adapters and the mapper.

pub mod config;
pub mod discovery;
pub mod error;
pub mod log;
pub mod services;
pub mod snapshot;
