//! `sc.exe` output.
//!
//! `query` and `enumdepend` print one block per service:
//!
//! ```text
//! SERVICE_NAME: Spooler
//! DISPLAY_NAME: Print Spooler
//!         TYPE               : 110  WIN32_OWN_PROCESS  (interactive)
//!         STATE              : 4  RUNNING
//!                                 (STOPPABLE, NOT_PAUSABLE, IGNORES_SHUTDOWN)
//!         WIN32_EXIT_CODE    : 0  (0x0)
//! ```
//!
//! Failures are announced by a `[SC] <operation> FAILED <code>:` line followed
//! by the system message.

use thiserror::Error;

/// Win32 error raised when the named service is not installed.
pub const ERROR_SERVICE_DOES_NOT_EXIST: u32 = 1060;

const SERVICE_NAME_KEY: &str = "SERVICE_NAME";
const DISPLAY_NAME_KEY: &str = "DISPLAY_NAME";
const TYPE_KEY: &str = "TYPE";
const STATE_KEY: &str = "STATE";

/// One service block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScRecord {
    pub name: String,
    pub display_name: String,
    /// Type flags; `sc` prints them in hexadecimal without a prefix.
    pub type_code: u32,
    /// State code; `sc` prints it in decimal.
    pub state_code: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} FAILED {code}: {message}")]
pub struct ScFailure {
    pub operation: String,
    pub code: u32,
    pub message: String,
}

impl ScFailure {
    pub fn is_service_missing(&self) -> bool {
        self.code == ERROR_SERVICE_DOES_NOT_EXIST
    }
}

/// Parses every service block in `output`, in order.
pub fn parse_records(output: &str) -> Vec<ScRecord> {
    let mut records: Vec<ScRecord> = Vec::new();
    let mut current: Option<ScRecord> = None;

    for line in output.lines() {
        let Some((key, value)) = split_key_value(line) else {
            continue;
        };

        match key {
            SERVICE_NAME_KEY => {
                if let Some(done) = current.take() {
                    records.push(done);
                }
                current = Some(ScRecord {
                    name: value.to_string(),
                    ..ScRecord::default()
                });
            }
            DISPLAY_NAME_KEY => {
                if let Some(record) = current.as_mut() {
                    record.display_name = value.to_string();
                }
            }
            TYPE_KEY => {
                if let Some(record) = current.as_mut() {
                    record.type_code = leading_number(value, 16).unwrap_or_default();
                }
            }
            STATE_KEY => {
                if let Some(record) = current.as_mut() {
                    record.state_code = leading_number(value, 10).unwrap_or_default();
                }
            }
            _ => {}
        }
    }

    if let Some(done) = current {
        records.push(done);
    }

    records
}

/// Finds the `[SC] ... FAILED <code>:` announcement, if `output` has one.
pub fn parse_failure(output: &str) -> Option<ScFailure> {
    let mut lines = output.lines();

    while let Some(line) = lines.next() {
        let Some(rest) = line.trim().strip_prefix("[SC]") else {
            continue;
        };
        let Some((operation, tail)) = rest.split_once("FAILED") else {
            continue;
        };

        let code: u32 = tail
            .trim()
            .trim_end_matches(':')
            .trim()
            .parse()
            .unwrap_or_default();
        let message: String = lines
            .by_ref()
            .map(str::trim)
            .find(|candidate| !candidate.is_empty())
            .unwrap_or_default()
            .to_string();

        return Some(ScFailure {
            operation: operation.trim().to_string(),
            code,
            message,
        });
    }

    None
}

/// Splits `KEY : value`, trimming both sides. Only the first colon separates.
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, value.trim()))
}

fn leading_number(value: &str, radix: u32) -> Option<u32> {
    let token = value.split_whitespace().next()?;
    u32::from_str_radix(token, radix).ok()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
