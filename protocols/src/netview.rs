//! `net view` output.
//!
//! Host announcements look like `\\NAME        Remark text`. Headers, footers
//! and error text never start with the network-path prefix.

use tracing::trace;

/// Prefix that marks a host announcement line.
pub const HOST_PREFIX: &str = r"\\";

/// Returns the host name announced by `line`, if it is a host announcement.
pub fn parse_host_line(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(HOST_PREFIX)?;
    rest.split_whitespace().next()
}

/// Extracts every announced host in the order the lines appear.
pub fn parse_hosts(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let host = parse_host_line(line);
            if host.is_none() {
                trace!("ignoring net view line: {line:?}");
            }
            host
        })
        .map(str::to_string)
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
