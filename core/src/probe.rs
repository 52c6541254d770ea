//! # Service Probe
//!
//! A [`ServiceProbe`] names one service on one host and talks to that host's
//! service manager on demand.
//!
//! ## Binding cache
//! The live binding is resolved at most once per probe and then reused for
//! identity and snapshot fields. Status-sensitive operations (`is_running`,
//! `start`, `stop`, `restart`) always read the current state again, so a
//! cached binding never drives a control decision.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{OnceCell, mpsc};
use tracing::{debug, warn};

use svcmap_common::config::Config;
use svcmap_common::discovery::{HostBrowser, dedup_hosts};
use svcmap_common::error::{DiscoveryError, ProbeError};
use svcmap_common::services::{LOCAL_MACHINE, LiveService, ServiceManager, ServiceStatus};
use svcmap_common::snapshot::ServiceSnapshot;

use crate::discovery;
use crate::resolver::resolve_address;

const DISCOVERABLE_BUFFER: usize = 64;

pub struct ServiceProbe {
    machine_name: String,
    service_name: String,
    ip_address: Option<IpAddr>,
    binding: OnceCell<Option<LiveService>>,
    manager: Arc<dyn ServiceManager>,
    cfg: Arc<Config>,
}

impl ServiceProbe {
    /// Probe for `service_name` on `machine_name`. The host address is looked up
    /// on a best-effort basis; a failed lookup leaves it unset.
    pub async fn new(
        manager: Arc<dyn ServiceManager>,
        cfg: Arc<Config>,
        machine_name: &str,
        service_name: &str,
    ) -> Self {
        let ip_address = resolve_address(machine_name, &cfg).await;
        Self {
            machine_name: machine_name.to_string(),
            service_name: service_name.to_string(),
            ip_address,
            binding: OnceCell::new(),
            manager,
            cfg,
        }
    }

    /// Probe for an already resolved binding.
    pub async fn from_binding(
        manager: Arc<dyn ServiceManager>,
        cfg: Arc<Config>,
        binding: LiveService,
    ) -> Self {
        let ip_address = resolve_address(&binding.machine_name, &cfg).await;
        Self::bound(manager, cfg, binding.machine_name.clone(), binding, ip_address)
    }

    fn bound(
        manager: Arc<dyn ServiceManager>,
        cfg: Arc<Config>,
        machine_name: String,
        binding: LiveService,
        ip_address: Option<IpAddr>,
    ) -> Self {
        Self {
            machine_name,
            service_name: binding.name.clone(),
            ip_address,
            binding: OnceCell::new_with(Some(Some(binding))),
            manager,
            cfg,
        }
    }

    pub fn machine_name(&self) -> &str {
        &self.machine_name
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn ip_address(&self) -> Option<IpAddr> {
        self.ip_address
    }

    /// The cached live binding, resolving it on first use.
    ///
    /// Remote failures are treated as "not found" and cached as such.
    pub async fn resolve(&self) -> Option<&LiveService> {
        self.binding.get_or_init(|| self.refresh()).await.as_ref()
    }

    /// A fresh read of the live binding, bypassing the cache.
    pub async fn refresh(&self) -> Option<LiveService> {
        match self.manager.query(&self.machine_name, &self.service_name).await {
            Ok(found) => found.filter(|svc| svc.name == self.service_name),
            Err(err) => {
                debug!("lookup of {}.{} failed: {err}", self.machine_name, self.service_name);
                None
            }
        }
    }

    pub async fn exists(&self) -> bool {
        self.resolve().await.is_some()
    }

    pub async fn is_running(&self) -> bool {
        self.refresh()
            .await
            .is_some_and(|svc| svc.status == ServiceStatus::Running)
    }

    /// Current status, read fresh.
    pub async fn status(&self) -> Result<ServiceStatus, ProbeError> {
        self.refresh()
            .await
            .map(|svc| svc.status)
            .ok_or_else(|| ProbeError::not_found(&self.machine_name, &self.service_name))
    }

    /// Starts the service if it is exactly `Stopped`. Returns whether a start was issued.
    pub async fn start(&self) -> Result<bool, ProbeError> {
        match self.refresh().await {
            Some(svc) if svc.status == ServiceStatus::Stopped => {
                self.manager.start(&self.machine_name, &self.service_name).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Stops the service if it is exactly `Running`. Returns whether a stop was issued.
    pub async fn stop(&self) -> Result<bool, ProbeError> {
        match self.refresh().await {
            Some(svc) if svc.status == ServiceStatus::Running => {
                self.manager.stop(&self.machine_name, &self.service_name).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Stops (unless already stopped or stopping), waits for `Stopped`, starts,
    /// and waits for `Running`. Returns `false` only when the service is not found.
    pub async fn restart(&self) -> Result<bool, ProbeError> {
        let Some(current) = self.refresh().await else {
            return Ok(false);
        };

        if !matches!(current.status, ServiceStatus::Stopped | ServiceStatus::StopPending) {
            self.manager.stop(&self.machine_name, &self.service_name).await?;
        }
        self.wait_for_status(ServiceStatus::Stopped).await?;

        self.manager.start(&self.machine_name, &self.service_name).await?;
        self.wait_for_status(ServiceStatus::Running).await?;

        Ok(true)
    }

    /// Polls until the service reports `target` or the transition timeout passes.
    pub async fn wait_for_status(&self, target: ServiceStatus) -> Result<(), ProbeError> {
        let started = Instant::now();

        loop {
            let current = self.manager.query(&self.machine_name, &self.service_name).await?;
            if current.is_some_and(|svc| svc.status == target) {
                return Ok(());
            }

            let waited = started.elapsed();
            if waited >= self.cfg.transition_timeout {
                return Err(ProbeError::TransitionTimeout {
                    host: self.machine_name.clone(),
                    service: self.service_name.clone(),
                    target,
                    waited_ms: waited.as_millis(),
                });
            }

            tokio::time::sleep(self.cfg.poll_interval).await;
        }
    }

    /// Forwards a custom control code to the live service.
    pub async fn send_command(&self, code: u32) -> Result<(), ProbeError> {
        if self.resolve().await.is_none() {
            return Err(ProbeError::not_found(&self.machine_name, &self.service_name));
        }
        self.manager
            .control(&self.machine_name, &self.service_name, code)
            .await
    }

    /// Captures a [`ServiceSnapshot`]. Fails as a whole if any part cannot be read.
    pub async fn snapshot(&self) -> Result<ServiceSnapshot, ProbeError> {
        let snapshot_error = |cause: ProbeError| ProbeError::Snapshot {
            host: self.machine_name.clone(),
            service: self.service_name.clone(),
            source: Box::new(cause),
        };

        let binding = self
            .resolve()
            .await
            .ok_or_else(|| snapshot_error(ProbeError::not_found(&self.machine_name, &self.service_name)))?;
        let dependents = self
            .manager
            .dependents(&self.machine_name, &self.service_name)
            .await
            .map_err(snapshot_error)?;

        Ok(ServiceSnapshot::capture(
            &self.machine_name,
            &self.service_name,
            self.ip_address,
            binding,
            &dependents,
        ))
    }

    /// Every service `machine` reports. Remote failures are logged and yield nothing.
    pub async fn enumerate_all_on_host(
        manager: Arc<dyn ServiceManager>,
        cfg: Arc<Config>,
        machine: &str,
    ) -> ServiceProbes {
        match Self::try_enumerate_host(manager, cfg, machine).await {
            Ok(probes) => probes,
            Err(err) => {
                warn!("Unable to access service manager on {machine}: {err}");
                ServiceProbes::empty()
            }
        }
    }

    /// Like [`Self::enumerate_all_on_host`] but hands the failure to the caller.
    pub async fn try_enumerate_host(
        manager: Arc<dyn ServiceManager>,
        cfg: Arc<Config>,
        machine: &str,
    ) -> Result<ServiceProbes, ProbeError> {
        let services = manager.list_services(machine).await?;
        let ip_address = resolve_address(machine, &cfg).await;

        Ok(ServiceProbes {
            machine_name: machine.to_string(),
            ip_address,
            bindings: services.into_iter(),
            manager: Some(manager),
            cfg,
        })
    }

    /// Services of the local machine.
    pub async fn enumerate_local(manager: Arc<dyn ServiceManager>, cfg: Arc<Config>) -> ServiceProbes {
        Self::enumerate_all_on_host(manager, cfg, LOCAL_MACHINE).await
    }

    /// Runs host discovery, waits for the final host list, then streams probes
    /// host by host. Hosts whose service manager cannot be read are skipped.
    pub async fn enumerate_discoverable(
        browser: Arc<dyn HostBrowser>,
        manager: Arc<dyn ServiceManager>,
        cfg: Arc<Config>,
    ) -> Result<mpsc::Receiver<ServiceProbe>, DiscoveryError> {
        let hosts = discovery::spawn(browser).wait().await?;
        let hosts = if cfg.dedup_hosts { dedup_hosts(hosts) } else { hosts };

        let (tx, rx) = mpsc::channel(DISCOVERABLE_BUFFER);
        tokio::spawn(async move {
            for host in hosts {
                let probes =
                    match Self::try_enumerate_host(manager.clone(), cfg.clone(), &host).await {
                        Ok(probes) => probes,
                        Err(err) => {
                            warn!("Unable to access service manager on {host}: {err}");
                            continue;
                        }
                    };
                for probe in probes {
                    if tx.send(probe).await.is_err() {
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }
}

/// Lazily builds one [`ServiceProbe`] per service a host reported.
pub struct ServiceProbes {
    machine_name: String,
    ip_address: Option<IpAddr>,
    bindings: std::vec::IntoIter<LiveService>,
    manager: Option<Arc<dyn ServiceManager>>,
    cfg: Arc<Config>,
}

impl ServiceProbes {
    fn empty() -> Self {
        Self {
            machine_name: String::new(),
            ip_address: None,
            bindings: Vec::new().into_iter(),
            manager: None,
            cfg: Arc::new(Config::default()),
        }
    }

    pub fn machine_name(&self) -> &str {
        &self.machine_name
    }
}

impl Iterator for ServiceProbes {
    type Item = ServiceProbe;

    fn next(&mut self) -> Option<Self::Item> {
        let manager = self.manager.clone()?;
        let binding = self.bindings.next()?;
        Some(ServiceProbe::bound(
            manager,
            self.cfg.clone(),
            self.machine_name.clone(),
            binding,
            self.ip_address,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.bindings.size_hint()
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
