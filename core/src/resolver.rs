use std::net::IpAddr;

use tokio::net::lookup_host;
use tracing::debug;

use svcmap_common::config::Config;
use svcmap_common::services::LOCAL_MACHINE;

/// Best-effort name-to-address lookup. Prefers IPv4; any failure yields `None`.
pub async fn resolve_address(machine: &str, cfg: &Config) -> Option<IpAddr> {
    if cfg.no_dns || machine.is_empty() || machine == LOCAL_MACHINE {
        return None;
    }

    match lookup_host((machine, 0)).await {
        Ok(addrs) => {
            let ips: Vec<IpAddr> = addrs.map(|addr| addr.ip()).collect();
            ips.iter()
                .find(|ip| ip.is_ipv4())
                .or_else(|| ips.first())
                .copied()
        }
        Err(err) => {
            debug!("could not resolve {machine}: {err}");
            None
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
