//! # Service Snapshot
//!
//! The immutable output record and its column contract. Column order is
//! declared once in [`SNAPSHOT_FIELDS`] and shared by every sink.

use std::net::IpAddr;

use serde::{Serialize, Serializer};

use crate::services::{LiveService, ServiceStatus, ServiceType};

/// Separator between dependent-service display names.
pub const DEPENDENT_SEPARATOR: char = '|';

/// A point-in-time record of one service on one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSnapshot {
    #[serde(rename = "ServiceName")]
    pub service_name: String,
    #[serde(rename = "MachineName")]
    pub machine_name: String,
    #[serde(rename = "DisplayName")]
    pub display_name: String,
    #[serde(
        rename = "IPAddress",
        skip_serializing_if = "Option::is_none",
        serialize_with = "display_opt"
    )]
    pub ip_address: Option<IpAddr>,
    #[serde(rename = "Type")]
    pub service_type: ServiceType,
    #[serde(rename = "State")]
    pub status: ServiceStatus,
    /// Never populated by the probes; kept so the column layout stays stable.
    #[serde(rename = "StartMode", skip_serializing_if = "Option::is_none")]
    pub start_mode: Option<String>,
    #[serde(rename = "DependentServices")]
    pub dependent_services: String,
}

impl ServiceSnapshot {
    /// Builds a record from a resolved binding and its dependents.
    ///
    /// `machine_name` and `service_name` come from the probe handle rather than
    /// the binding so the record names what was asked for.
    pub fn capture(
        machine_name: &str,
        service_name: &str,
        ip_address: Option<IpAddr>,
        binding: &LiveService,
        dependents: &[LiveService],
    ) -> Self {
        let dependent_services: String = dependents
            .iter()
            .map(|dep| dep.display_name.as_str())
            .collect::<Vec<&str>>()
            .join(&DEPENDENT_SEPARATOR.to_string());

        Self {
            service_name: service_name.to_string(),
            machine_name: machine_name.to_string(),
            display_name: binding.display_name.clone(),
            ip_address,
            service_type: binding.service_type,
            status: binding.status,
            start_mode: None,
            dependent_services,
        }
    }

    /// Text value of one column.
    pub fn field(&self, field: SnapshotField) -> String {
        match field {
            SnapshotField::ServiceName => self.service_name.clone(),
            SnapshotField::MachineName => self.machine_name.clone(),
            SnapshotField::DisplayName => self.display_name.clone(),
            SnapshotField::IpAddress => self
                .ip_address
                .map(|ip| ip.to_string())
                .unwrap_or_default(),
            SnapshotField::Type => self.service_type.to_string(),
            SnapshotField::State => self.status.to_string(),
            SnapshotField::StartMode => self.start_mode.clone().unwrap_or_default(),
            SnapshotField::DependentServices => self.dependent_services.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotField {
    ServiceName,
    MachineName,
    DisplayName,
    IpAddress,
    Type,
    State,
    StartMode,
    DependentServices,
}

impl SnapshotField {
    pub fn header(&self) -> &'static str {
        match self {
            Self::ServiceName => "ServiceName",
            Self::MachineName => "MachineName",
            Self::DisplayName => "DisplayName",
            Self::IpAddress => "IPAddress",
            Self::Type => "Type",
            Self::State => "State",
            Self::StartMode => "StartMode",
            Self::DependentServices => "DependentServices",
        }
    }
}

/// Column order of every exported inventory.
pub const SNAPSHOT_FIELDS: [SnapshotField; 8] = [
    SnapshotField::ServiceName,
    SnapshotField::MachineName,
    SnapshotField::DisplayName,
    SnapshotField::IpAddress,
    SnapshotField::Type,
    SnapshotField::State,
    SnapshotField::StartMode,
    SnapshotField::DependentServices,
];

/// Header row for `delimiter`-separated output.
pub fn delimited_header(delimiter: char) -> String {
    SNAPSHOT_FIELDS
        .iter()
        .map(|field| field.header())
        .collect::<Vec<&str>>()
        .join(&delimiter.to_string())
}

/// One `delimiter`-separated row. Values are written as-is, without quoting.
pub fn delimited_row(snapshot: &ServiceSnapshot, delimiter: char) -> String {
    SNAPSHOT_FIELDS
        .iter()
        .map(|field| snapshot.field(*field))
        .collect::<Vec<String>>()
        .join(&delimiter.to_string())
}

/// Stable ascending sort by machine name; equal names keep their relative order.
pub fn sort_by_machine(snapshots: &mut [ServiceSnapshot]) {
    snapshots.sort_by(|a, b| a.machine_name.cmp(&b.machine_name));
}

fn display_opt<S: Serializer>(value: &Option<IpAddr>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(ip) => serializer.collect_str(ip),
        None => serializer.serialize_none(),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
