//! # Network Service Mapper
//!
//! Builds the service inventory of every host visible on the segment.
//!
//! The run is split in three phases:
//! 1. **Discovery**: one background browse, awaited to completion.
//! 2. **Fan-out**: hosts are probed concurrently (bounded by
//!    [`Config::host_limit`]), and within each host its services are
//!    snapshotted concurrently (bounded by [`Config::service_limit`]).
//!    Workers publish snapshots into a channel drained by a single collector.
//! 3. **Aggregation**: once every worker joined, records are put back in
//!    discovery order and stably sorted by machine name.
//!
//! A failure on one host or one service is logged and skipped; only a failed
//! discovery launch ends the run.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use svcmap_common::config::Config;
use svcmap_common::discovery::{HostBrowser, HostName, dedup_hosts};
use svcmap_common::error::{DiscoveryError, ProbeError, error_trace};
use svcmap_common::services::ServiceManager;
use svcmap_common::snapshot::{ServiceSnapshot, sort_by_machine};
use svcmap_common::success;

use crate::discovery;
use crate::export::{InventorySink, export};
use crate::probe::ServiceProbe;

const TRACE_DEPTH: usize = 5;

/// Milestones reported while an inventory is being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapperEvent {
    HostsDiscovered(usize),
    ServiceProbed { host: String, service: String },
    HostFinished { host: String, snapshots: usize },
}

pub type ProgressCallback = Arc<dyn Fn(MapperEvent) + Send + Sync>;

/// Position of a record in discovery order: (host index, service index).
type Ordinal = (usize, usize);

pub struct NetworkServiceMapper {
    browser: Arc<dyn HostBrowser>,
    manager: Arc<dyn ServiceManager>,
    cfg: Arc<Config>,
    on_progress: Option<ProgressCallback>,
}

impl NetworkServiceMapper {
    pub fn new(
        browser: Arc<dyn HostBrowser>,
        manager: Arc<dyn ServiceManager>,
        cfg: Arc<Config>,
    ) -> Self {
        Self {
            browser,
            manager,
            cfg,
            on_progress: None,
        }
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    /// Discovers hosts, probes all of their services and returns the sorted inventory.
    pub async fn build_inventory(&self) -> Result<Vec<ServiceSnapshot>, DiscoveryError> {
        let hosts: Vec<HostName> = discovery::spawn(self.browser.clone()).wait().await?;
        let hosts = if self.cfg.dedup_hosts {
            dedup_hosts(hosts)
        } else {
            hosts
        };

        info!("Found {} computers in local network neighborhood", hosts.len());
        report(&self.on_progress, MapperEvent::HostsDiscovered(hosts.len()));

        let (tx, rx) = mpsc::unbounded_channel::<(Ordinal, ServiceSnapshot)>();
        let collector = tokio::spawn(collect(rx));

        let host_slots = Arc::new(Semaphore::new(self.cfg.host_limit()));
        let mut workers: JoinSet<()> = JoinSet::new();

        for (host_idx, host) in hosts.into_iter().enumerate() {
            let Ok(permit) = host_slots.clone().acquire_owned().await else {
                break;
            };
            workers.spawn(map_host(
                HostJob {
                    host_idx,
                    host,
                    manager: self.manager.clone(),
                    cfg: self.cfg.clone(),
                    on_progress: self.on_progress.clone(),
                    tx: tx.clone(),
                },
                permit,
            ));
        }
        drop(tx);

        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                error!("host worker crashed: {err}");
            }
        }

        let mut records = collector
            .await
            .map_err(|err| DiscoveryError::Aborted(format!("inventory collector failed: {err}")))?;

        records.sort_by_key(|(ordinal, _)| *ordinal);
        let mut snapshots: Vec<ServiceSnapshot> =
            records.into_iter().map(|(_, snapshot)| snapshot).collect();
        sort_by_machine(&mut snapshots);

        success!("{} services inventoried", snapshots.len());
        Ok(snapshots)
    }

    /// Builds the inventory and hands it to every sink in turn.
    pub async fn map(
        &self,
        sinks: &[&dyn InventorySink],
    ) -> anyhow::Result<Vec<ServiceSnapshot>> {
        let inventory = self.build_inventory().await?;
        export(&inventory, sinks)?;
        Ok(inventory)
    }
}

struct HostJob {
    host_idx: usize,
    host: HostName,
    manager: Arc<dyn ServiceManager>,
    cfg: Arc<Config>,
    on_progress: Option<ProgressCallback>,
    tx: mpsc::UnboundedSender<(Ordinal, ServiceSnapshot)>,
}

async fn map_host(job: HostJob, _permit: OwnedSemaphorePermit) {
    let HostJob {
        host_idx,
        host,
        manager,
        cfg,
        on_progress,
        tx,
    } = job;

    let enumeration = ServiceProbe::try_enumerate_host(manager, cfg.clone(), &host);
    let probes = match within(cfg.probe_timeout, &host, "service enumeration", enumeration).await {
        Ok(probes) => probes,
        Err(err) => {
            warn!("Unable to access service manager on {host}: {err}");
            report(&on_progress, MapperEvent::HostFinished { host, snapshots: 0 });
            return;
        }
    };

    let service_slots = Arc::new(Semaphore::new(cfg.service_limit()));
    let mut workers: JoinSet<bool> = JoinSet::new();

    for (service_idx, probe) in probes.enumerate() {
        let Ok(permit) = service_slots.clone().acquire_owned().await else {
            break;
        };
        let tx = tx.clone();
        let on_progress = on_progress.clone();
        let probe_timeout = cfg.probe_timeout;

        workers.spawn(async move {
            let _permit = permit;
            let host = probe.machine_name().to_string();
            let service = probe.service_name().to_string();
            debug!("{host}.{service}");
            report(
                &on_progress,
                MapperEvent::ServiceProbed {
                    host: host.clone(),
                    service: service.clone(),
                },
            );

            match within(probe_timeout, &host, "snapshot", probe.snapshot()).await {
                Ok(snapshot) => tx.send(((host_idx, service_idx), snapshot)).is_ok(),
                Err(err) => {
                    error!(
                        "Error accessing {service} on {host}: {}",
                        error_trace(&err, TRACE_DEPTH)
                    );
                    false
                }
            }
        });
    }

    let mut captured = 0;
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(true) => captured += 1,
            Ok(false) => {}
            Err(err) => error!("service worker on {host} crashed: {err}"),
        }
    }

    report(&on_progress, MapperEvent::HostFinished { host, snapshots: captured });
}

async fn collect(
    mut rx: mpsc::UnboundedReceiver<(Ordinal, ServiceSnapshot)>,
) -> Vec<(Ordinal, ServiceSnapshot)> {
    let mut records = Vec::new();
    while let Some(record) = rx.recv().await {
        records.push(record);
    }
    records
}

/// Applies the optional probe deadline to `work`.
async fn within<T, F>(
    deadline: Option<Duration>,
    host: &str,
    operation: &str,
    work: F,
) -> Result<T, ProbeError>
where
    F: Future<Output = Result<T, ProbeError>>,
{
    let Some(limit) = deadline else {
        return work.await;
    };

    match tokio::time::timeout(limit, work).await {
        Ok(result) => result,
        Err(_elapsed) => Err(ProbeError::Timeout {
            host: host.to_string(),
            operation: operation.to_string(),
            waited_ms: limit.as_millis(),
        }),
    }
}

fn report(callback: &Option<ProgressCallback>, event: MapperEvent) {
    if let Some(callback) = callback {
        callback(event);
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
