#![cfg(test)]
use std::sync::Arc;

use svcmap_common::config::Config;
use svcmap_common::error::DiscoveryError;
use svcmap_common::services::ServiceStatus;
use svcmap_common::snapshot::ServiceSnapshot;
use svcmap_core::export::{CSV_FILE_NAME, XML_FILE_NAME};
use svcmap_core::{CsvSink, InventorySink, NetworkServiceMapper, XmlSink};

use crate::fakes::{ScriptedBrowser, ScriptedServiceManager};

const CSV_HEADER: &str =
    "ServiceName,MachineName,DisplayName,IPAddress,Type,State,StartMode,DependentServices";

fn cfg() -> Arc<Config> {
    Arc::new(Config {
        no_dns: true,
        ..Config::default()
    })
}

fn mapper(browser: ScriptedBrowser, manager: ScriptedServiceManager) -> NetworkServiceMapper {
    NetworkServiceMapper::new(Arc::new(browser), Arc::new(manager), cfg())
}

fn machine_service(inventory: &[ServiceSnapshot]) -> Vec<(&str, &str)> {
    inventory
        .iter()
        .map(|s| (s.machine_name.as_str(), s.service_name.as_str()))
        .collect()
}

/// Two healthy hosts, one unreachable, one failing snapshot: the run finishes
/// with everything that could be read.
#[tokio::test]
async fn faults_are_isolated_per_host_and_service() {
    let manager = ScriptedServiceManager::new()
        .service("WS02", "Spooler", ServiceStatus::Running)
        .service("WS02", "Fax", ServiceStatus::Stopped)
        .service("DC01", "Netlogon", ServiceStatus::Running)
        .service("DC01", "Dns", ServiceStatus::Running)
        .broken("DC01", "Dns")
        .unreachable("LAPTOP9");

    let inventory = mapper(ScriptedBrowser::hosts(&["WS02", "LAPTOP9", "DC01"]), manager)
        .build_inventory()
        .await
        .unwrap();

    assert_eq!(
        machine_service(&inventory),
        vec![("DC01", "Netlogon"), ("WS02", "Spooler"), ("WS02", "Fax")]
    );
}

#[tokio::test]
async fn snapshots_carry_dependents_in_order() {
    let manager = ScriptedServiceManager::new()
        .service("SRV01", "RpcSs", ServiceStatus::Running)
        .depended_on_by("SRV01", "RpcSs", &["Spooler", "Winmgmt"]);

    let inventory = mapper(ScriptedBrowser::hosts(&["SRV01"]), manager)
        .build_inventory()
        .await
        .unwrap();

    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory[0].dependent_services, "Spooler Service|Winmgmt Service");
    assert_eq!(inventory[0].status, ServiceStatus::Running);
    assert!(inventory[0].ip_address.is_none());
}

#[tokio::test]
async fn discovery_launch_failure_is_fatal() {
    let err = mapper(ScriptedBrowser::unlaunchable(), ScriptedServiceManager::new())
        .build_inventory()
        .await
        .unwrap_err();

    assert!(matches!(err, DiscoveryError::Launch { .. }));
}

/// An empty neighborhood still produces both files: a header-only CSV and an
/// XML document with an empty collection.
#[tokio::test]
async fn empty_neighborhood_writes_empty_files() {
    let dir = tempfile::tempdir().unwrap();
    let csv = CsvSink::in_dir(dir.path());
    let xml = XmlSink::in_dir(dir.path());

    let inventory = mapper(ScriptedBrowser::hosts(&[]), ScriptedServiceManager::new())
        .map(&[&csv as &dyn InventorySink, &xml])
        .await
        .unwrap();
    assert!(inventory.is_empty());

    let csv_text = std::fs::read_to_string(dir.path().join(CSV_FILE_NAME)).unwrap();
    assert_eq!(csv_text.lines().collect::<Vec<_>>(), vec![CSV_HEADER]);

    let xml_text = std::fs::read_to_string(dir.path().join(XML_FILE_NAME)).unwrap();
    assert!(xml_text.contains("ArrayOfServiceSnapshot"));
    assert!(!xml_text.contains("<ServiceSnapshot>"));
}

#[tokio::test]
async fn csv_lines_match_sorted_inventory() {
    let dir = tempfile::tempdir().unwrap();
    let csv = CsvSink::in_dir(dir.path());
    let manager = ScriptedServiceManager::new()
        .service("beta", "W32Time", ServiceStatus::Running)
        .service("alpha", "Spooler", ServiceStatus::Stopped)
        .service("alpha", "Fax", ServiceStatus::Paused);

    let inventory = mapper(ScriptedBrowser::hosts(&["beta", "alpha"]), manager)
        .map(&[&csv as &dyn InventorySink])
        .await
        .unwrap();

    let text = std::fs::read_to_string(csv.path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), inventory.len() + 1);
    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(
        lines[1],
        "Spooler,alpha,Spooler Service,,Win32ShareProcess,Stopped,,"
    );
    assert!(lines[2].starts_with("Fax,alpha,"));
    assert!(lines[3].starts_with("W32Time,beta,"));
}
