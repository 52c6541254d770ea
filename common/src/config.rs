use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_HOST_LIMIT: usize = 16;
pub const DEFAULT_SERVICE_LIMIT: usize = 32;
pub const DEFAULT_TRANSITION_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct Config {
    /// Skips the best-effort name-to-address lookup done for every probed host.
    pub no_dns: bool,
    /// Drops repeated host names reported by discovery before probing.
    pub dedup_hosts: bool,
    /// Upper bound of hosts probed at the same time.
    pub max_concurrent_hosts: usize,
    /// Upper bound of services snapshotted at the same time, per host.
    pub max_concurrent_services: usize,
    /// Deadline for one host enumeration or one snapshot. `None` waits forever.
    pub probe_timeout: Option<Duration>,
    /// How long start/stop/restart wait for the target status.
    pub transition_timeout: Duration,
    pub poll_interval: Duration,
    /// Directory the inventory files are written to.
    pub output_dir: PathBuf,
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            no_dns: false,
            dedup_hosts: true,
            max_concurrent_hosts: DEFAULT_HOST_LIMIT,
            max_concurrent_services: DEFAULT_SERVICE_LIMIT,
            probe_timeout: None,
            transition_timeout: DEFAULT_TRANSITION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            output_dir: PathBuf::from("."),
            quiet: 0,
        }
    }
}

impl Config {
    /// Host concurrency, never below one.
    pub fn host_limit(&self) -> usize {
        self.max_concurrent_hosts.max(1)
    }

    /// Per-host service concurrency, never below one.
    pub fn service_limit(&self) -> usize {
        self.max_concurrent_services.max(1)
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
