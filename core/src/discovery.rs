//! # Discovery Runs
//!
//! Starts one host-discovery run in the background and hands back a
//! [`Discovery`] handle. The run's lifecycle belongs to the handle: callers
//! can wait for the final host list, watch for completion, or abort it.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use svcmap_common::discovery::{HostBrowser, HostName};
use svcmap_common::error::{DiscoveryError, error_trace};

/// Progress of a discovery run as seen through [`Discovery::completion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    Running,
    Completed { hosts: usize },
    Failed,
    Aborted,
}

pub struct Discovery {
    task: JoinHandle<Result<Vec<HostName>, DiscoveryError>>,
    state: watch::Receiver<DiscoveryState>,
    state_tx: watch::Sender<DiscoveryState>,
}

/// Moves `state` out of `Running`; later outcomes are ignored.
fn settle(state: &watch::Sender<DiscoveryState>, outcome: DiscoveryState) {
    state.send_if_modified(|current| {
        if *current != DiscoveryState::Running {
            return false;
        }
        *current = outcome;
        true
    });
}

/// Launches `browser` on a background task.
pub fn spawn(browser: Arc<dyn HostBrowser>) -> Discovery {
    let (state_tx, state_rx) = watch::channel(DiscoveryState::Running);
    let task_state = state_tx.clone();

    let task = tokio::spawn(async move {
        let result = browser.browse().await;
        let final_state = match &result {
            Ok(hosts) => {
                debug!("discovery finished with {} hosts", hosts.len());
                DiscoveryState::Completed { hosts: hosts.len() }
            }
            Err(err) => {
                error!("discovery failed: {}", error_trace(err, 5));
                DiscoveryState::Failed
            }
        };
        settle(&task_state, final_state);
        result
    });

    Discovery {
        task,
        state: state_rx,
        state_tx,
    }
}

impl Discovery {
    /// Waits for the run to finish and returns the final host list.
    pub async fn wait(self) -> Result<Vec<HostName>, DiscoveryError> {
        match self.task.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_cancelled() => {
                Err(DiscoveryError::Aborted("discovery was cancelled".to_string()))
            }
            Err(join_err) => Err(DiscoveryError::Aborted(join_err.to_string())),
        }
    }

    /// Receiver that changes exactly once, when the run completes or fails.
    pub fn completion(&self) -> watch::Receiver<DiscoveryState> {
        self.state.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancels the run. Watchers see [`DiscoveryState::Aborted`] unless it already finished.
    pub fn abort(&self) {
        self.task.abort();
        settle(&self.state_tx, DiscoveryState::Aborted);
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
