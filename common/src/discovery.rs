//! # Host Discovery Port
//!
//! Host names come from a legacy network-browsing collaborator. The core only
//! depends on [`HostBrowser`]; the concrete process-backed browser lives in
//! `svcmap-core`.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::DiscoveryError;

/// A machine name as announced on the local network segment.
pub type HostName = String;

/// Lists the host names visible on the local broadcast domain.
///
/// Implementations return names in the order the collaborator reported them.
/// Duplicates are allowed; an empty list is a normal outcome.
#[async_trait]
pub trait HostBrowser: Send + Sync {
    async fn browse(&self) -> Result<Vec<HostName>, DiscoveryError>;
}

/// Removes repeated host names, keeping the first occurrence of each.
pub fn dedup_hosts(hosts: Vec<HostName>) -> Vec<HostName> {
    let mut seen: HashSet<String> = HashSet::new();
    hosts
        .into_iter()
        .filter(|host| seen.insert(host.to_ascii_uppercase()))
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
