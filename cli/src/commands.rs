pub mod control;
pub mod hosts;
pub mod map;
pub mod services;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use svcmap_common::config::{Config, DEFAULT_HOST_LIMIT, DEFAULT_SERVICE_LIMIT};

#[derive(Parser)]
#[command(name = "svcmap")]
#[command(version, about = "Maps the Windows services running across the network neighborhood.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Skip resolving host names to IP addresses
    #[arg(long, global = true)]
    pub no_dns: bool,

    /// Probe repeated host names as many times as discovery reports them
    #[arg(long, global = true)]
    pub keep_duplicates: bool,

    /// Number of hosts probed at the same time
    #[arg(long, global = true, value_name = "N", default_value_t = DEFAULT_HOST_LIMIT)]
    pub host_limit: usize,

    /// Number of services probed at the same time on one host
    #[arg(long, global = true, value_name = "N", default_value_t = DEFAULT_SERVICE_LIMIT)]
    pub service_limit: usize,

    /// Give up on a host enumeration or a snapshot after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// How long start, stop and restart wait for the service to settle
    #[arg(long, global = true, value_name = "SECS", default_value_t = 30)]
    pub transition_timeout: u64,

    /// Directory receiving the inventory files
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Less output; repeat for even less
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// More log detail; repeat for trace output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inventory every service on every discoverable host
    #[command(alias = "m")]
    Map {
        /// Also write serviceMap.xml
        #[arg(long)]
        xml: bool,
    },
    /// List the hosts visible in the network neighborhood
    #[command(alias = "h")]
    Hosts,
    /// List the services of one host
    #[command(alias = "s")]
    Services { host: String },
    /// Query or change the state of one service
    #[command(alias = "c")]
    Control {
        host: String,
        service: String,
        #[command(subcommand)]
        action: ControlAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Start,
    Stop,
    Restart,
    Status,
    /// Send a custom control code (128-255)
    Command { code: u32 },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl GlobalArgs {
    pub fn to_config(&self) -> Config {
        Config {
            no_dns: self.no_dns,
            dedup_hosts: !self.keep_duplicates,
            max_concurrent_hosts: self.host_limit,
            max_concurrent_services: self.service_limit,
            probe_timeout: self.timeout.map(Duration::from_secs),
            transition_timeout: Duration::from_secs(self.transition_timeout),
            output_dir: self.output_dir.clone(),
            quiet: self.quiet,
            ..Config::default()
        }
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
