use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use svcmap_common::discovery::{HostBrowser, HostName};
use svcmap_common::error::{DiscoveryError, ProbeError};
use svcmap_common::services::{LiveService, ServiceManager, ServiceStatus, ServiceType};

/// Host browser replaying a fixed outcome, optionally after a delay.
pub struct ScriptedBrowser {
    hosts: Option<Vec<HostName>>,
    delay: Duration,
}

impl ScriptedBrowser {
    pub fn hosts(hosts: &[&str]) -> Self {
        Self {
            hosts: Some(hosts.iter().map(|h| h.to_string()).collect()),
            delay: Duration::ZERO,
        }
    }

    /// Browser whose launch fails, as when `net` is not installed.
    pub fn unlaunchable() -> Self {
        Self {
            hosts: None,
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl HostBrowser for ScriptedBrowser {
    async fn browse(&self) -> Result<Vec<HostName>, DiscoveryError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.hosts.clone().ok_or_else(|| DiscoveryError::Launch {
            command: "net view".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "net: not found"),
        })
    }
}

/// Every call the scripted manager received, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(String),
    Dependents(String, String),
    Start(String, String),
    Stop(String, String),
    Control(String, String, u32),
}

/// In-memory fleet of hosts and services.
///
/// Start and stop flip the stored status immediately. Hosts marked
/// unreachable refuse every call; services marked broken fail their
/// dependents lookup, which breaks their snapshot.
#[derive(Default)]
pub struct ScriptedServiceManager {
    fleet: Mutex<HashMap<String, Vec<LiveService>>>,
    dependents: HashMap<(String, String), Vec<String>>,
    unreachable: HashSet<String>,
    broken: HashSet<(String, String)>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedServiceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn service(self, host: &str, name: &str, status: ServiceStatus) -> Self {
        if let Ok(mut fleet) = self.fleet.lock() {
            fleet.entry(host.to_string()).or_default().push(LiveService {
                machine_name: host.to_string(),
                name: name.to_string(),
                display_name: format!("{name} Service"),
                service_type: ServiceType::WIN32_SHARE_PROCESS,
                status,
            });
        }
        self
    }

    pub fn depended_on_by(mut self, host: &str, name: &str, dependents: &[&str]) -> Self {
        self.dependents.insert(
            (host.to_string(), name.to_string()),
            dependents.iter().map(|d| d.to_string()).collect(),
        );
        self
    }

    pub fn unreachable(mut self, host: &str) -> Self {
        self.unreachable.insert(host.to_string());
        self
    }

    pub fn broken(mut self, host: &str, name: &str) -> Self {
        self.broken.insert((host.to_string(), name.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn status_of(&self, host: &str, name: &str) -> Option<ServiceStatus> {
        let fleet = self.fleet.lock().ok()?;
        fleet
            .get(host)?
            .iter()
            .find(|svc| svc.name == name)
            .map(|svc| svc.status)
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn reach(&self, host: &str) -> Result<(), ProbeError> {
        if self.unreachable.contains(host) {
            return Err(ProbeError::unreachable(host, "The RPC server is unavailable."));
        }
        Ok(())
    }

    fn set_status(&self, host: &str, name: &str, status: ServiceStatus) -> Result<(), ProbeError> {
        let mut fleet = self
            .fleet
            .lock()
            .map_err(|_| ProbeError::unreachable(host, "fleet lock poisoned"))?;
        let service = fleet
            .get_mut(host)
            .and_then(|services| services.iter_mut().find(|svc| svc.name == name))
            .ok_or_else(|| ProbeError::not_found(host, name))?;
        service.status = status;
        Ok(())
    }
}

#[async_trait]
impl ServiceManager for ScriptedServiceManager {
    async fn list_services(&self, machine: &str) -> Result<Vec<LiveService>, ProbeError> {
        self.record(Call::List(machine.to_string()));
        self.reach(machine)?;
        let fleet = self
            .fleet
            .lock()
            .map_err(|_| ProbeError::unreachable(machine, "fleet lock poisoned"))?;
        Ok(fleet.get(machine).cloned().unwrap_or_default())
    }

    async fn dependents(&self, machine: &str, service: &str) -> Result<Vec<LiveService>, ProbeError> {
        self.record(Call::Dependents(machine.to_string(), service.to_string()));
        self.reach(machine)?;
        if self.broken.contains(&(machine.to_string(), service.to_string())) {
            return Err(ProbeError::unreachable(machine, "Access is denied."));
        }

        let names = self
            .dependents
            .get(&(machine.to_string(), service.to_string()))
            .cloned()
            .unwrap_or_default();
        Ok(names
            .into_iter()
            .map(|name| LiveService {
                machine_name: machine.to_string(),
                display_name: format!("{name} Service"),
                name,
                service_type: ServiceType::WIN32_OWN_PROCESS,
                status: ServiceStatus::Running,
            })
            .collect())
    }

    async fn start(&self, machine: &str, service: &str) -> Result<(), ProbeError> {
        self.record(Call::Start(machine.to_string(), service.to_string()));
        self.reach(machine)?;
        self.set_status(machine, service, ServiceStatus::Running)
    }

    async fn stop(&self, machine: &str, service: &str) -> Result<(), ProbeError> {
        self.record(Call::Stop(machine.to_string(), service.to_string()));
        self.reach(machine)?;
        self.set_status(machine, service, ServiceStatus::Stopped)
    }

    async fn control(&self, machine: &str, service: &str, code: u32) -> Result<(), ProbeError> {
        self.record(Call::Control(machine.to_string(), service.to_string(), code));
        self.reach(machine)
    }
}
