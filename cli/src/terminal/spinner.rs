use std::sync::OnceLock;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use colored::*;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};

use svcmap_core::MapperEvent;

const TIP_DURATION: Duration = Duration::from_secs(1);
const MESSAGE_READ_TIME: Duration = Duration::from_secs(1);
const MIN_TIP_VISIBILITY: Duration = Duration::from_millis(750);
const TIPS: &[&str] = &[
    "Raise --host-limit to probe more computers at once",
    "Use --timeout to skip hosts that hang",
    "Pass --xml to also write serviceMap.xml",
];

pub struct SpinnerHandle {
    pub spinner: ProgressBar,
    tx: Sender<String>,
}

impl SpinnerHandle {
    pub fn send_to_queue(&self, message: String) {
        let _ = self.tx.send(message);
    }

    pub fn println(&self, msg: &str) {
        self.spinner.println(msg);
    }

    pub fn finish_and_clear(&self) {
        self.spinner.finish_and_clear();
    }

    fn is_active(&self) -> bool {
        !self.spinner.is_finished()
    }
}

pub(crate) static SPINNER: OnceLock<SpinnerHandle> = OnceLock::new();

/// Starts the spinner, or returns the one already running.
pub fn get_spinner() -> &'static SpinnerHandle {
    SPINNER.get_or_init(init_spinner)
}

/// Stops the spinner if it was ever started.
pub fn finish() {
    if let Some(handle) = SPINNER.get() {
        handle.finish_and_clear();
    }
}

fn init_spinner() -> SpinnerHandle {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));

    let (tx, rx) = mpsc::channel::<String>();
    let pb_clone = pb.clone();

    thread::spawn(move || {
        let mut tip_index = 0;
        let mut next_action_time = Instant::now() + TIP_DURATION;
        let mut is_showing_tip = false;
        let mut last_tip_time = Instant::now();

        loop {
            if pb_clone.is_finished() {
                break;
            }

            let wait_time = next_action_time.saturating_duration_since(Instant::now());

            match rx.recv_timeout(wait_time) {
                Ok(mut msg) => {
                    if is_showing_tip {
                        let elapsed = last_tip_time.elapsed();
                        if elapsed < MIN_TIP_VISIBILITY {
                            thread::sleep(MIN_TIP_VISIBILITY - elapsed);
                        }
                        is_showing_tip = false;
                    }
                    while let Ok(newer_msg) = rx.try_recv() {
                        msg = newer_msg;
                    }
                    pb_clone.set_message(msg);
                    next_action_time = Instant::now() + MESSAGE_READ_TIME;
                }
                Err(RecvTimeoutError::Timeout) => {
                    let tip = TIPS[tip_index % TIPS.len()];
                    pb_clone.set_message(format!("{}", tip.italic().white()));

                    tip_index += 1;
                    is_showing_tip = true;
                    last_tip_time = Instant::now();

                    next_action_time = Instant::now() + TIP_DURATION;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    break;
                }
            }
        }
    });

    SpinnerHandle { spinner: pb, tx }
}

/// Tracks mapper milestones and turns them into spinner messages.
#[derive(Debug, Default)]
pub struct MapProgress {
    hosts_total: usize,
    hosts_done: usize,
    services_probed: usize,
}

impl MapProgress {
    pub fn observe(&mut self, event: &MapperEvent) -> String {
        match event {
            MapperEvent::HostsDiscovered(total) => {
                self.hosts_total = *total;
                format!("Found {} computers, probing services...", total.to_string().green().bold())
            }
            MapperEvent::ServiceProbed { host, service } => {
                self.services_probed += 1;
                format!(
                    "[{}/{}] {}.{}",
                    self.hosts_done,
                    self.hosts_total,
                    host,
                    service.bold()
                )
            }
            MapperEvent::HostFinished { host, snapshots } => {
                self.hosts_done += 1;
                format!(
                    "[{}/{}] {} done with {} services",
                    self.hosts_done,
                    self.hosts_total,
                    host,
                    snapshots.to_string().green().bold()
                )
            }
        }
    }

    pub fn services_probed(&self) -> usize {
        self.services_probed
    }
}

pub fn report_discovery_progress(message: String) {
    get_spinner().send_to_queue(message);
}

/// Routes log lines above the spinner while it runs, straight to stdout otherwise.
pub struct SpinnerWriter;

impl std::io::Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        let msg = msg.trim_end();
        match SPINNER.get() {
            Some(handle) if handle.is_active() => handle.println(msg),
            _ => Term::stdout().write_line(msg)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_counts_hosts_and_services() {
        colored::control::set_override(false);
        let mut progress = MapProgress::default();

        progress.observe(&MapperEvent::HostsDiscovered(2));
        let line = progress.observe(&MapperEvent::ServiceProbed {
            host: "SRV01".to_string(),
            service: "Spooler".to_string(),
        });
        assert_eq!(line, "[0/2] SRV01.Spooler");

        let line = progress.observe(&MapperEvent::HostFinished {
            host: "SRV01".to_string(),
            snapshots: 1,
        });
        assert_eq!(line, "[1/2] SRV01 done with 1 services");
        assert_eq!(progress.services_probed(), 1);
    }
}
