//! # Service Management Port
//!
//! Models a service as the remote service-control manager exposes it, and the
//! [`ServiceManager`] trait the probes talk to.

use std::fmt;

use async_trait::async_trait;
use serde::{Serialize, Serializer};

use crate::error::ProbeError;

/// Machine name used for the local service-control manager.
pub const LOCAL_MACHINE: &str = ".";

/// Current state of a service, mirroring the service-control manager codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceStatus {
    Stopped,
    StartPending,
    StopPending,
    Running,
    ContinuePending,
    PausePending,
    Paused,
    /// A state code the manager reported but this crate does not know.
    Unknown(u32),
}

impl ServiceStatus {
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Stopped,
            2 => Self::StartPending,
            3 => Self::StopPending,
            4 => Self::Running,
            5 => Self::ContinuePending,
            6 => Self::PausePending,
            7 => Self::Paused,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            Self::Stopped => 1,
            Self::StartPending => 2,
            Self::StopPending => 3,
            Self::Running => 4,
            Self::ContinuePending => 5,
            Self::PausePending => 6,
            Self::Paused => 7,
            Self::Unknown(code) => *code,
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => f.write_str("Stopped"),
            Self::StartPending => f.write_str("StartPending"),
            Self::StopPending => f.write_str("StopPending"),
            Self::Running => f.write_str("Running"),
            Self::ContinuePending => f.write_str("ContinuePending"),
            Self::PausePending => f.write_str("PausePending"),
            Self::Paused => f.write_str("Paused"),
            Self::Unknown(code) => write!(f, "{code}"),
        }
    }
}

impl Serialize for ServiceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Service type flags as reported by the service-control manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ServiceType(pub u32);

impl ServiceType {
    pub const KERNEL_DRIVER: ServiceType = ServiceType(0x1);
    pub const FILE_SYSTEM_DRIVER: ServiceType = ServiceType(0x2);
    pub const ADAPTER: ServiceType = ServiceType(0x4);
    pub const RECOGNIZER_DRIVER: ServiceType = ServiceType(0x8);
    pub const WIN32_OWN_PROCESS: ServiceType = ServiceType(0x10);
    pub const WIN32_SHARE_PROCESS: ServiceType = ServiceType(0x20);
    pub const INTERACTIVE_PROCESS: ServiceType = ServiceType(0x100);

    const NAMED_FLAGS: [(u32, &'static str); 7] = [
        (0x1, "KernelDriver"),
        (0x2, "FileSystemDriver"),
        (0x4, "Adapter"),
        (0x8, "RecognizerDriver"),
        (0x10, "Win32OwnProcess"),
        (0x20, "Win32ShareProcess"),
        (0x100, "InteractiveProcess"),
    ];

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: ServiceType) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

impl fmt::Display for ServiceType {
    /// Flag names joined by `|`; falls back to the raw number when any bit is unnamed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: u32 = Self::NAMED_FLAGS.iter().fold(0, |acc, (bit, _)| acc | bit);
        if self.0 == 0 || self.0 & !known != 0 {
            return write!(f, "{}", self.0);
        }

        let names: Vec<&str> = Self::NAMED_FLAGS
            .iter()
            .filter(|(bit, _)| self.0 & bit != 0)
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&names.join("|"))
    }
}

impl Serialize for ServiceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A live binding: one service as currently exposed by a host's service manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveService {
    pub machine_name: String,
    pub name: String,
    pub display_name: String,
    pub service_type: ServiceType,
    pub status: ServiceStatus,
}

/// Talks to the service-control manager of a given host.
///
/// Every remote failure is reported as a [`ProbeError`]; the probes decide
/// whether that failure is recovered or surfaced.
#[async_trait]
pub trait ServiceManager: Send + Sync {
    /// All services the host reports.
    async fn list_services(&self, machine: &str) -> Result<Vec<LiveService>, ProbeError>;

    /// The service whose name matches `service` exactly, if any.
    async fn query(&self, machine: &str, service: &str) -> Result<Option<LiveService>, ProbeError> {
        let services = self.list_services(machine).await?;
        Ok(services.into_iter().find(|svc| svc.name == service))
    }

    /// Services that depend on `service`.
    async fn dependents(&self, machine: &str, service: &str) -> Result<Vec<LiveService>, ProbeError>;

    async fn start(&self, machine: &str, service: &str) -> Result<(), ProbeError>;

    async fn stop(&self, machine: &str, service: &str) -> Result<(), ProbeError>;

    /// Sends an opaque custom control code to the service.
    async fn control(&self, machine: &str, service: &str, code: u32) -> Result<(), ProbeError>;
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
