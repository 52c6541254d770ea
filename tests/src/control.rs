#![cfg(test)]
use std::sync::Arc;
use std::time::Duration;

use svcmap_common::config::Config;
use svcmap_common::error::ProbeError;
use svcmap_common::services::ServiceStatus;
use svcmap_core::ServiceProbe;

use crate::fakes::{Call, ScriptedServiceManager};

fn cfg() -> Arc<Config> {
    Arc::new(Config {
        no_dns: true,
        poll_interval: Duration::from_millis(5),
        transition_timeout: Duration::from_millis(100),
        ..Config::default()
    })
}

#[tokio::test]
async fn restart_cycles_a_running_service() {
    let manager = Arc::new(
        ScriptedServiceManager::new().service("SRV01", "Spooler", ServiceStatus::Running),
    );
    let probe = ServiceProbe::new(manager.clone(), cfg(), "SRV01", "Spooler").await;

    assert!(probe.restart().await.unwrap());
    assert_eq!(manager.status_of("SRV01", "Spooler"), Some(ServiceStatus::Running));

    let controls: Vec<Call> = manager
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::Start(..) | Call::Stop(..)))
        .collect();
    assert_eq!(
        controls,
        vec![
            Call::Stop("SRV01".to_string(), "Spooler".to_string()),
            Call::Start("SRV01".to_string(), "Spooler".to_string()),
        ]
    );
}

#[tokio::test]
async fn start_and_stop_only_act_on_settled_states() {
    let manager = Arc::new(
        ScriptedServiceManager::new()
            .service("SRV01", "Fax", ServiceStatus::Paused)
            .service("SRV01", "W32Time", ServiceStatus::Stopped),
    );
    let fax = ServiceProbe::new(manager.clone(), cfg(), "SRV01", "Fax").await;
    let time = ServiceProbe::new(manager.clone(), cfg(), "SRV01", "W32Time").await;

    assert!(!fax.start().await.unwrap());
    assert!(!fax.stop().await.unwrap());
    assert!(!time.stop().await.unwrap());
    assert!(time.start().await.unwrap());
    assert!(time.is_running().await);
}

#[tokio::test]
async fn missing_service_is_reported_not_found() {
    let manager = Arc::new(ScriptedServiceManager::new().service("SRV01", "Spooler", ServiceStatus::Running));
    let probe = ServiceProbe::new(manager.clone(), cfg(), "SRV01", "Spool").await;

    assert!(!probe.exists().await);
    assert!(!probe.start().await.unwrap());
    assert!(!probe.restart().await.unwrap());
    assert!(matches!(
        probe.send_command(200).await,
        Err(ProbeError::ServiceNotFound { .. })
    ));
    assert!(!manager.calls().iter().any(|call| matches!(call, Call::Control(..))));
}

#[tokio::test]
async fn custom_command_reaches_the_service() {
    let manager = Arc::new(ScriptedServiceManager::new().service("SRV01", "Agent", ServiceStatus::Running));
    let probe = ServiceProbe::new(manager.clone(), cfg(), "SRV01", "Agent").await;

    probe.send_command(129).await.unwrap();
    assert!(manager
        .calls()
        .contains(&Call::Control("SRV01".to_string(), "Agent".to_string(), 129)));
}
