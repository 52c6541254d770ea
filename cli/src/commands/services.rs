use std::sync::Arc;

use colored::*;

use crate::terminal::{format, print};
use svcmap_common::config::Config;
use svcmap_common::services::{LiveService, ServiceManager, ServiceStatus};
use svcmap_common::success;
use svcmap_core::ScServiceManager;

pub async fn services(host: &str, cfg: &Config) -> anyhow::Result<()> {
    let manager: Arc<dyn ServiceManager> = Arc::new(ScServiceManager::default());
    let mut services: Vec<LiveService> = manager.list_services(host).await?;
    services.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    if services.is_empty() {
        print::header("ZERO SERVICES FOUND", cfg.quiet);
        print::no_results();
        return Ok(());
    }

    print::header(&format!("Services on {host}"), cfg.quiet);
    let name_width = services.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for service in &services {
        print::print_status(format::live_service_line(service, name_width));
    }

    let running = services
        .iter()
        .filter(|s| s.status == ServiceStatus::Running)
        .count();
    let summary: ColoredString = format!("{running}/{} running", services.len()).bold().green();
    success!("{host}: {summary}");
    Ok(())
}
