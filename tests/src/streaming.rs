#![cfg(test)]
use std::sync::Arc;
use std::time::Duration;

use svcmap_common::config::Config;
use svcmap_common::services::ServiceStatus;
use svcmap_core::{ServiceProbe, discovery};

use crate::fakes::{ScriptedBrowser, ScriptedServiceManager};

fn cfg() -> Arc<Config> {
    Arc::new(Config {
        no_dns: true,
        ..Config::default()
    })
}

#[tokio::test]
async fn discoverable_probes_skip_unreachable_hosts() {
    let manager = ScriptedServiceManager::new()
        .service("SRV01", "Spooler", ServiceStatus::Running)
        .service("SRV03", "Dhcp", ServiceStatus::Running)
        .service("SRV03", "Dnscache", ServiceStatus::Running)
        .unreachable("SRV02");

    let mut rx = ServiceProbe::enumerate_discoverable(
        Arc::new(ScriptedBrowser::hosts(&["SRV01", "SRV02", "SRV03"])),
        Arc::new(manager),
        cfg(),
    )
    .await
    .unwrap();

    let mut seen = Vec::new();
    while let Some(probe) = rx.recv().await {
        seen.push(format!("{}.{}", probe.machine_name(), probe.service_name()));
    }
    assert_eq!(seen, vec!["SRV01.Spooler", "SRV03.Dhcp", "SRV03.Dnscache"]);
}

#[tokio::test]
async fn discoverable_probes_fail_on_launch_error() {
    let result = ServiceProbe::enumerate_discoverable(
        Arc::new(ScriptedBrowser::unlaunchable()),
        Arc::new(ScriptedServiceManager::new()),
        cfg(),
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn discovery_signals_completion_once() {
    let handle = discovery::spawn(Arc::new(
        ScriptedBrowser::hosts(&["SRV01", "SRV02"]).after(Duration::from_millis(30)),
    ));
    assert!(!handle.is_finished());

    let mut completion = handle.completion();
    completion
        .wait_for(|state| !matches!(state, discovery::DiscoveryState::Running))
        .await
        .unwrap();

    assert_eq!(handle.wait().await.unwrap(), vec!["SRV01", "SRV02"]);
}

#[tokio::test]
async fn local_enumeration_uses_local_machine() {
    let manager = ScriptedServiceManager::new().service(".", "EventLog", ServiceStatus::Running);

    let probes: Vec<ServiceProbe> = ServiceProbe::enumerate_local(Arc::new(manager), cfg())
        .await
        .collect();

    assert_eq!(probes.len(), 1);
    assert_eq!(probes[0].machine_name(), ".");
    assert!(probes[0].is_running().await);
}
