use std::sync::Arc;

use anyhow::bail;
use colored::*;
use tracing::warn;

use crate::commands::ControlAction;
use crate::terminal::{format, print};
use svcmap_common::{config::Config, success};
use svcmap_core::{ScServiceManager, ServiceProbe};

const CUSTOM_CODES: std::ops::RangeInclusive<u32> = 128..=255;

pub async fn control(host: &str, service: &str, action: ControlAction, cfg: Config) -> anyhow::Result<()> {
    let probe = ServiceProbe::new(
        Arc::new(ScServiceManager::default()),
        Arc::new(cfg),
        host,
        service,
    )
    .await;
    let target = format!("{host}.{service}");

    match action {
        ControlAction::Status => {
            let status = probe.status().await?;
            let display_name = probe
                .resolve()
                .await
                .map(|svc| svc.display_name.clone())
                .unwrap_or_default();
            print::aligned_lines(&[
                ("Host".to_string(), host.normal()),
                ("Service".to_string(), service.bold()),
                ("Display".to_string(), display_name.normal()),
                ("State".to_string(), format::colored_status(status)),
            ]);
        }
        ControlAction::Start => {
            if !probe.exists().await {
                bail!("service {target} not found");
            }
            if probe.start().await? {
                success!("start requested for {target}");
            } else {
                warn!("{target} is not stopped, nothing to start");
            }
        }
        ControlAction::Stop => {
            if !probe.exists().await {
                bail!("service {target} not found");
            }
            if probe.stop().await? {
                success!("stop requested for {target}");
            } else {
                warn!("{target} is not running, nothing to stop");
            }
        }
        ControlAction::Restart => {
            if !probe.restart().await? {
                bail!("service {target} not found");
            }
            success!("{target} restarted");
        }
        ControlAction::Command { code } => {
            if !CUSTOM_CODES.contains(&code) {
                bail!("custom control codes range from 128 to 255, got {code}");
            }
            probe.send_command(code).await?;
            success!("control code {code} sent to {target}");
        }
    }

    Ok(())
}
