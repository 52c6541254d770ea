//! Parsers for the text the host-discovery and service-control collaborators print.
//!
//! Nothing here spawns processes; the adapters in `svcmap-core` feed these
//! functions the captured output.

pub mod netview;
pub mod sc;
