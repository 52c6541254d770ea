use std::sync::Arc;
use std::time::Instant;

use colored::*;

use crate::terminal::{print, spinner};
use svcmap_common::{config::Config, discovery::dedup_hosts, success};
use svcmap_core::{NetViewBrowser, discovery};

pub async fn hosts(cfg: &Config) -> anyhow::Result<()> {
    if cfg.quiet < 2 {
        spinner::report_discovery_progress("Browsing the network neighborhood...".to_string());
    }

    let start_time = Instant::now();
    let found = discovery::spawn(Arc::new(NetViewBrowser::default())).wait().await;
    spinner::finish();

    let mut found = found?;
    if cfg.dedup_hosts {
        found = dedup_hosts(found);
    }

    if found.is_empty() {
        print::header("ZERO HOSTS DETECTED", cfg.quiet);
        print::no_results();
        return Ok(());
    }

    print::header("Network Neighborhood", cfg.quiet);
    for (idx, host) in found.iter().enumerate() {
        print::tree_head(idx, host);
    }

    let count: ColoredString = format!("{} computers", found.len()).bold().green();
    let elapsed: ColoredString = format!("{:.2}s", start_time.elapsed().as_secs_f64()).bold().yellow();
    success!("Discovery Complete: {count} found in {elapsed}");
    Ok(())
}
