//! Error taxonomy shared across the workspace.
//!
//! Only [`DiscoveryError`] and [`ExportError`] end a run. Every [`ProbeError`]
//! is scoped to one host or one service and is recovered by the caller.

use std::error::Error;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::services::ServiceStatus;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to launch host discovery `{command}`")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read host discovery output: {0}")]
    Read(#[from] io::Error),

    #[error("host discovery did not complete: {0}")]
    Aborted(String),
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("service manager on {host} is unreachable or denied access: {reason}")]
    HostUnreachable { host: String, reason: String },

    #[error("service {host}.{service} not found")]
    ServiceNotFound { host: String, service: String },

    #[error("unable to snapshot {host}.{service}")]
    Snapshot {
        host: String,
        service: String,
        #[source]
        source: Box<ProbeError>,
    },

    #[error("{operation} failed on {host}.{service}: {reason}")]
    Control {
        host: String,
        service: String,
        operation: String,
        reason: String,
    },

    #[error("{host}.{service} did not reach {target} within {waited_ms}ms")]
    TransitionTimeout {
        host: String,
        service: String,
        target: ServiceStatus,
        waited_ms: u128,
    },

    #[error("{operation} on {host} exceeded the {waited_ms}ms probe deadline")]
    Timeout {
        host: String,
        operation: String,
        waited_ms: u128,
    },
}

impl ProbeError {
    pub fn unreachable(host: &str, reason: impl ToString) -> Self {
        Self::HostUnreachable {
            host: host.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn not_found(host: &str, service: &str) -> Self {
        Self::ServiceNotFound {
            host: host.to_string(),
            service: service.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize {}: {reason}", path.display())]
    Xml { path: PathBuf, reason: String },
}

/// Renders an error and at most `limit` of its causes on one line.
pub fn error_trace(err: &dyn Error, limit: usize) -> String {
    let mut trace = err.to_string();
    let mut source = err.source();
    let mut depth = 0;

    while let Some(cause) = source {
        if depth == limit {
            trace.push_str(" <- ...");
            break;
        }
        trace.push_str(" <- ");
        trace.push_str(&cause.to_string());
        source = cause.source();
        depth += 1;
    }

    trace
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
