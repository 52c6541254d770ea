use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use colored::*;

use crate::{mprint, terminal::{colors, format, print, spinner}};
use svcmap_common::{config::Config, snapshot::ServiceSnapshot, success};
use svcmap_core::export::{self, CsvSink, InventorySink, XmlSink};
use svcmap_core::{MapperEvent, NetViewBrowser, NetworkServiceMapper, ScServiceManager};

use crate::terminal::spinner::MapProgress;

pub async fn map(xml: bool, cfg: Config) -> anyhow::Result<()> {
    let cfg = Arc::new(cfg);
    let progress = Arc::new(Mutex::new(MapProgress::default()));
    let observer = progress.clone();

    if cfg.quiet < 2 {
        spinner::report_discovery_progress("Browsing the network neighborhood...".to_string());
    }

    let mapper = NetworkServiceMapper::new(
        Arc::new(NetViewBrowser::default()),
        Arc::new(ScServiceManager::default()),
        cfg.clone(),
    )
    .with_progress(Arc::new(move |event: MapperEvent| {
        if let Ok(mut progress) = observer.lock() {
            let line = progress.observe(&event);
            if spinner::SPINNER.get().is_some() {
                spinner::report_discovery_progress(line);
            }
        }
    }));

    let start_time = Instant::now();
    let inventory = mapper.build_inventory().await;
    spinner::finish();
    let inventory = inventory?;

    let csv = CsvSink::in_dir(&cfg.output_dir);
    let xml_sink = XmlSink::in_dir(&cfg.output_dir);
    let mut sinks: Vec<&dyn InventorySink> = vec![&csv];
    if xml {
        sinks.push(&xml_sink);
    }
    export::export(&inventory, &sinks)?;

    let probed = progress.lock().map(|p| p.services_probed()).unwrap_or(inventory.len());
    map_ends(&inventory, probed, start_time.elapsed(), &cfg);
    Ok(())
}

fn map_ends(inventory: &[ServiceSnapshot], probed: usize, total_time: Duration, cfg: &Config) {
    if inventory.is_empty() {
        print::header("ZERO SERVICES MAPPED", cfg.quiet);
        print::no_results();
        return;
    }

    if cfg.quiet == 0 {
        print::header("Service Map", cfg.quiet);
        print_inventory(inventory);
    }
    print_summary(inventory, probed, total_time, cfg);
}

/// One tree per machine, services listed in inventory order.
fn print_inventory(inventory: &[ServiceSnapshot]) {
    let mut idx = 0;
    let mut start = 0;
    while start < inventory.len() {
        let machine = &inventory[start].machine_name;
        let end = inventory[start..]
            .iter()
            .position(|s| &s.machine_name != machine)
            .map_or(inventory.len(), |offset| start + offset);

        print::tree_head(idx, machine);
        for snapshot in &inventory[start..end] {
            print::print_status(snapshot.service_name.color(colors::PRIMARY).to_string());
            print::as_tree_one_level(format::snapshot_to_details(snapshot));
        }
        if end != inventory.len() {
            mprint!();
        }

        idx += 1;
        start = end;
    }
}

fn print_summary(inventory: &[ServiceSnapshot], probed: usize, total_time: Duration, cfg: &Config) {
    let mut machines: Vec<&str> = inventory.iter().map(|s| s.machine_name.as_str()).collect();
    machines.dedup();

    let services: ColoredString = format!("{} services", inventory.len()).bold().green();
    let hosts: ColoredString = format!("{} hosts", machines.len()).bold().green();
    let skipped = probed.saturating_sub(inventory.len());
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString =
        format!("Mapping Complete: {services} on {hosts} in {total_time} ({skipped} skipped)")
            .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
        }
        _ => success!("{}", output),
    }
}
