use colored::*;

use svcmap_common::services::{LiveService, ServiceStatus};
use svcmap_common::snapshot::ServiceSnapshot;

use crate::terminal::colors;

type Detail = (String, ColoredString);

pub fn status_color(status: ServiceStatus) -> Color {
    match status {
        ServiceStatus::Running => colors::RUNNING,
        ServiceStatus::Stopped => colors::STOPPED,
        ServiceStatus::Paused => colors::PAUSED,
        ServiceStatus::Unknown(_) => colors::SEPARATOR,
        _ => colors::PENDING,
    }
}

pub fn colored_status(status: ServiceStatus) -> ColoredString {
    status.to_string().color(status_color(status))
}

/// Tree branches for one inventoried service: status, address, dependents.
pub fn snapshot_to_details(snapshot: &ServiceSnapshot) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![
        ("Display".to_string(), snapshot.display_name.normal()),
        ("State".to_string(), colored_status(snapshot.status)),
        ("Type".to_string(), snapshot.service_type.to_string().normal()),
    ];

    if let Some(ip) = snapshot.ip_address {
        details.push(("IP".to_string(), ip.to_string().color(colors::IP_ADDR)));
    }

    if !snapshot.dependent_services.is_empty() {
        details.push((
            "Deps".to_string(),
            snapshot.dependent_services.replace('|', ", ").normal(),
        ));
    }

    details
}

/// One-line listing of a live service, status column padded for alignment.
pub fn live_service_line(service: &LiveService, name_width: usize) -> String {
    let status = format!("{:<15}", service.status.to_string());
    format!(
        "{:<name_width$}  {}  {}",
        service.name,
        status.color(status_color(service.status)),
        service.display_name.color(colors::SEPARATOR),
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
