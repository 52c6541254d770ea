//! A [`ServiceManager`] backed by `sc.exe`.
//!
//! Each call runs one `sc` invocation against `\\HOST` (or the local machine)
//! and parses the printed blocks. Any `[SC] ... FAILED` announcement becomes a
//! [`ProbeError`].

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::trace;

use svcmap_common::error::ProbeError;
use svcmap_common::services::{LOCAL_MACHINE, LiveService, ServiceManager, ServiceStatus, ServiceType};
use svcmap_protocols::sc::{self, ScRecord};

const SC_PROGRAM: &str = "sc.exe";
const ENUM_BUFFER_SIZE: &str = "262144";

pub struct ScServiceManager {
    program: String,
    leading_args: Vec<String>,
}

impl Default for ScServiceManager {
    fn default() -> Self {
        Self::with_program(SC_PROGRAM)
    }
}

impl ScServiceManager {
    pub fn with_program(program: &str) -> Self {
        Self::with_command(program, Vec::<String>::new())
    }

    /// Uses `program leading_args..` in place of `sc.exe`; the host and the
    /// `sc` arguments are appended after `leading_args`.
    pub fn with_command<I, S>(program: &str, leading_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            leading_args: leading_args.into_iter().map(Into::into).collect(),
        }
    }

    /// Runs `sc [\\machine] args..` and returns its standard output.
    async fn run(&self, machine: &str, service: Option<&str>, args: &[&str]) -> Result<String, ProbeError> {
        let mut command = Command::new(&self.program);
        command.args(&self.leading_args);
        if !is_local(machine) {
            command.arg(format!(r"\\{machine}"));
        }
        command.args(args);
        trace!("running {} {:?} against {machine}", self.program, args);

        let output = command
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|err| ProbeError::unreachable(machine, err))?;

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        if let Some(failure) = sc::parse_failure(&text) {
            return Err(match service {
                Some(service) if failure.is_service_missing() => ProbeError::not_found(machine, service),
                _ => ProbeError::unreachable(machine, failure),
            });
        }
        if !output.status.success() {
            return Err(ProbeError::unreachable(
                machine,
                format!("{} exited with {}", self.program, output.status),
            ));
        }

        Ok(text)
    }

    async fn run_control(&self, machine: &str, service: &str, operation: &str, args: &[&str]) -> Result<(), ProbeError> {
        match self.run(machine, Some(service), args).await {
            Ok(_) => Ok(()),
            Err(ProbeError::HostUnreachable { reason, .. }) => Err(ProbeError::Control {
                host: machine.to_string(),
                service: service.to_string(),
                operation: operation.to_string(),
                reason,
            }),
            Err(other) => Err(other),
        }
    }
}

#[async_trait]
impl ServiceManager for ScServiceManager {
    async fn list_services(&self, machine: &str) -> Result<Vec<LiveService>, ProbeError> {
        let text = self
            .run(
                machine,
                None,
                &["query", "type=", "service", "state=", "all", "bufsize=", ENUM_BUFFER_SIZE],
            )
            .await?;
        Ok(to_live_services(machine, sc::parse_records(&text)))
    }

    async fn query(&self, machine: &str, service: &str) -> Result<Option<LiveService>, ProbeError> {
        match self.run(machine, Some(service), &["query", service]).await {
            Ok(text) => Ok(to_live_services(machine, sc::parse_records(&text))
                .into_iter()
                .find(|svc| svc.name == service)),
            Err(ProbeError::ServiceNotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn dependents(&self, machine: &str, service: &str) -> Result<Vec<LiveService>, ProbeError> {
        let text = self
            .run(machine, Some(service), &["enumdepend", service, ENUM_BUFFER_SIZE])
            .await?;
        Ok(to_live_services(machine, sc::parse_records(&text)))
    }

    async fn start(&self, machine: &str, service: &str) -> Result<(), ProbeError> {
        self.run_control(machine, service, "start", &["start", service]).await
    }

    async fn stop(&self, machine: &str, service: &str) -> Result<(), ProbeError> {
        self.run_control(machine, service, "stop", &["stop", service]).await
    }

    async fn control(&self, machine: &str, service: &str, code: u32) -> Result<(), ProbeError> {
        let code = code.to_string();
        self.run_control(machine, service, "control", &["control", service, &code])
            .await
    }
}

fn is_local(machine: &str) -> bool {
    machine.is_empty() || machine == LOCAL_MACHINE
}

fn to_live_services(machine: &str, records: Vec<ScRecord>) -> Vec<LiveService> {
    records
        .into_iter()
        .map(|record| LiveService {
            machine_name: machine.to_string(),
            name: record.name,
            display_name: record.display_name,
            service_type: ServiceType(record.type_code),
            status: ServiceStatus::from_code(record.state_code),
        })
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
