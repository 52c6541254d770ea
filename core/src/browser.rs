//! A [`HostBrowser`] backed by the `net view` command.
//!
//! Output is parsed while the process is still running; the host list is only
//! returned once the stream hit end-of-file **and** the process exited.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use svcmap_common::discovery::{HostBrowser, HostName};
use svcmap_common::error::DiscoveryError;
use svcmap_protocols::netview;

const NET_PROGRAM: &str = "net";
const NET_VIEW_ARGS: [&str; 1] = ["view"];

pub struct NetViewBrowser {
    program: String,
    args: Vec<String>,
}

impl Default for NetViewBrowser {
    fn default() -> Self {
        Self::with_command(NET_PROGRAM, NET_VIEW_ARGS)
    }
}

impl NetViewBrowser {
    /// Uses `program args..` instead of `net view`. The output must follow the
    /// same line format.
    pub fn with_command<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<&str>>()
            .join(" ")
    }
}

#[async_trait]
impl HostBrowser for NetViewBrowser {
    async fn browse(&self) -> Result<Vec<HostName>, DiscoveryError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| DiscoveryError::Launch {
                command: self.command_line(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DiscoveryError::Aborted("stdout was not captured".to_string()))?;

        let mut hosts: Vec<HostName> = Vec::new();
        let mut lines = BufReader::new(stdout).split(b'\n');

        while let Some(raw) = lines.next_segment().await? {
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches('\r');
            if let Some(host) = netview::parse_host_line(line) {
                debug!("announced host {host}");
                hosts.push(host.to_string());
            }
        }

        let status = child.wait().await?;
        if !status.success() {
            warn!("`{}` exited with {status}", self.command_line());
        }

        Ok(hosts)
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
