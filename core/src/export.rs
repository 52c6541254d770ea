//! # Inventory Export
//!
//! Sinks persisting a finished inventory. Each sink owns one file in its
//! output directory and rewrites it from scratch on every run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use svcmap_common::error::ExportError;
use svcmap_common::snapshot::{ServiceSnapshot, delimited_header, delimited_row};
use svcmap_common::success;

pub const CSV_FILE_NAME: &str = "windowsNetworkServices.csv";
pub const XML_FILE_NAME: &str = "serviceMap.xml";

const CSV_DELIMITER: char = ',';
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

pub trait InventorySink: Send + Sync {
    /// Persists `inventory` and returns the path written.
    fn write(&self, inventory: &[ServiceSnapshot]) -> Result<PathBuf, ExportError>;
}

/// Writes `inventory` to every sink, stopping at the first failure.
pub fn export(inventory: &[ServiceSnapshot], sinks: &[&dyn InventorySink]) -> Result<(), ExportError> {
    for sink in sinks {
        let path = sink.write(inventory)?;
        success!("{} records written to {}", inventory.len(), path.display());
    }
    Ok(())
}

/// Comma separated table, one header line then one line per snapshot.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CSV_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InventorySink for CsvSink {
    fn write(&self, inventory: &[ServiceSnapshot]) -> Result<PathBuf, ExportError> {
        let io_error = |source| ExportError::Io {
            path: self.path.clone(),
            source,
        };

        let file = File::create(&self.path).map_err(io_error)?;
        let mut out = BufWriter::new(file);

        writeln!(out, "{}", delimited_header(CSV_DELIMITER)).map_err(io_error)?;
        for snapshot in inventory {
            writeln!(out, "{}", delimited_row(snapshot, CSV_DELIMITER)).map_err(io_error)?;
        }
        out.flush().map_err(io_error)?;

        debug!("wrote {} csv rows to {}", inventory.len(), self.path.display());
        Ok(self.path.clone())
    }
}

/// Element-per-field XML document rooted at `ArrayOfServiceSnapshot`.
#[derive(Debug, Clone)]
pub struct XmlSink {
    path: PathBuf,
}

#[derive(Serialize)]
#[serde(rename = "ArrayOfServiceSnapshot")]
struct XmlInventory<'a> {
    #[serde(rename = "ServiceSnapshot")]
    snapshots: &'a [ServiceSnapshot],
}

impl XmlSink {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(XML_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, inventory: &[ServiceSnapshot]) -> Result<String, ExportError> {
        let mut body = String::new();
        let mut serializer = quick_xml::se::Serializer::new(&mut body);
        serializer.indent(' ', 2);

        XmlInventory {
            snapshots: inventory,
        }
        .serialize(serializer)
        .map_err(|err| ExportError::Xml {
            path: self.path.clone(),
            reason: err.to_string(),
        })?;

        Ok(format!("{XML_DECLARATION}\n{body}\n"))
    }
}

impl InventorySink for XmlSink {
    fn write(&self, inventory: &[ServiceSnapshot]) -> Result<PathBuf, ExportError> {
        let document = self.render(inventory)?;
        std::fs::write(&self.path, document).map_err(|source| ExportError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!("wrote {} xml records to {}", inventory.len(), self.path.display());
        Ok(self.path.clone())
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
    use std::net::{IpAddr, Ipv4Addr};
    use svcmap_common::services::{ServiceStatus, ServiceType};

    fn snapshot(machine: &str, service: &str) -> ServiceSnapshot {
        ServiceSnapshot {
            service_name: service.to_string(),
            machine_name: machine.to_string(),
            display_name: format!("{service} display"),
            ip_address: Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7))),
            service_type: ServiceType::WIN32_SHARE_PROCESS,
            status: ServiceStatus::Running,
            start_mode: None,
            dependent_services: "Fax|Print Notify".to_string(),
        }
    }

    #[test]
    fn csv_without_records_is_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = CsvSink::in_dir(dir.path()).write(&[]).unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["ServiceName,MachineName,DisplayName,IPAddress,Type,State,StartMode,DependentServices"]
        );
    }

    #[test]
    fn csv_rows_follow_header() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![snapshot("SRV01", "Spooler"), snapshot("SRV02", "W32Time")];
        CsvSink::in_dir(dir.path()).write(&records).unwrap();

        let text = std::fs::read_to_string(dir.path().join(CSV_FILE_NAME)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "Spooler,SRV01,Spooler display,10.0.0.7,Win32ShareProcess,Running,,Fax|Print Notify"
        );
        assert!(lines[2].starts_with("W32Time,SRV02,"));
    }

    #[test]
    fn csv_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::in_dir(dir.path());
        sink.write(&[snapshot("SRV01", "Spooler"), snapshot("SRV01", "Fax")])
            .unwrap();
        sink.write(&[]).unwrap();

        let text = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn csv_into_missing_directory_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::in_dir(dir.path().join("absent"));

        let err = sink.write(&[]).unwrap_err();
        assert!(matches!(err, ExportError::Io { ref path, .. } if path == sink.path()));
    }

    #[test]
    fn export_writes_every_sink() {
        let dir = tempfile::tempdir().unwrap();
        let csv = CsvSink::in_dir(dir.path());
        let xml = XmlSink::in_dir(dir.path());

        export(&[snapshot("SRV01", "Spooler")], &[&csv as &dyn InventorySink, &xml]).unwrap();

        assert_eq!(std::fs::read_to_string(csv.path()).unwrap().lines().count(), 2);
        assert!(std::fs::read_to_string(xml.path()).unwrap().contains("<ServiceName>Spooler</ServiceName>"));
    }

    #[test]
    fn export_stops_at_first_failing_sink() {
        let dir = tempfile::tempdir().unwrap();
        let broken = CsvSink::in_dir(dir.path().join("absent"));
        let xml = XmlSink::in_dir(dir.path());

        let err = export(&[], &[&broken as &dyn InventorySink, &xml]).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
        assert!(!xml.path().exists());
    }

    #[test]
    fn xml_without_records_keeps_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = XmlSink::in_dir(dir.path()).write(&[]).unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("<?xml"));
        assert!(text.contains("ArrayOfServiceSnapshot"));
        assert!(!text.contains("<ServiceSnapshot>"));
    }

    #[test]
    fn xml_writes_one_element_per_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![snapshot("SRV01", "Spooler"), snapshot("SRV02", "W32Time")];
        XmlSink::in_dir(dir.path()).write(&records).unwrap();

        let text = std::fs::read_to_string(dir.path().join(XML_FILE_NAME)).unwrap();
        assert_eq!(text.matches("<ServiceSnapshot>").count(), 2);
        assert!(text.contains("<ServiceName>Spooler</ServiceName>"));
        assert!(text.contains("<IPAddress>10.0.0.7</IPAddress>"));
        assert!(text.contains("<State>Running</State>"));
        assert!(!text.contains("<StartMode>"));
    }
}
