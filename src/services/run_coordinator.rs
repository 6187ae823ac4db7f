//! Single-flight coordination for aggregation runs
//!
//! At most one aggregation runs at a time. The HTTP trigger and the startup
//! run both go through [`RunCoordinator::try_begin`]; a second request
//! while one is active gets `AppError::OperationInProgress`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::AggregationReport;

pub const AGGREGATION_OPERATION: &str = "aggregation";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running {
        run_id: Uuid,
        started_at: DateTime<Utc>,
    },
}

/// Outcome of the most recent finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RunStatus {
    Success {
        timestamp: DateTime<Utc>,
        channel_count: usize,
        stream_count: usize,
    },
    Failure {
        timestamp: DateTime<Utc>,
        message: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSnapshot {
    pub state: RunState,
    pub last_update: Option<DateTime<Utc>>,
    pub last_status: Option<RunStatus>,
}

impl RunSnapshot {
    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running { .. })
    }
}

#[derive(Debug)]
struct Inner {
    state: RunState,
    last_update: Option<DateTime<Utc>>,
    last_status: Option<RunStatus>,
}

/// Cloneable handle shared between the web layer and background tasks
#[derive(Debug, Clone)]
pub struct RunCoordinator {
    inner: Arc<RwLock<Inner>>,
}

impl Default for RunCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl RunCoordinator {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                state: RunState::Idle,
                last_update: None,
                last_status: None,
            })),
        }
    }

    /// Claim the single run slot
    pub fn try_begin(&self) -> AppResult<RunGuard> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| AppError::internal("run state lock poisoned"))?;

        if let RunState::Running { run_id, .. } = inner.state {
            warn!("Aggregation {} is already running", run_id);
            return Err(AppError::operation_in_progress(AGGREGATION_OPERATION));
        }

        let run_id = Uuid::new_v4();
        inner.state = RunState::Running {
            run_id,
            started_at: Utc::now(),
        };
        info!("Aggregation {} started", run_id);

        Ok(RunGuard {
            coordinator: self.clone(),
            run_id,
            finished: false,
        })
    }

    pub fn snapshot(&self) -> RunSnapshot {
        match self.inner.read() {
            Ok(inner) => RunSnapshot {
                state: inner.state.clone(),
                last_update: inner.last_update,
                last_status: inner.last_status.clone(),
            },
            Err(poisoned) => {
                let inner = poisoned.into_inner();
                RunSnapshot {
                    state: inner.state.clone(),
                    last_update: inner.last_update,
                    last_status: inner.last_status.clone(),
                }
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.snapshot().is_running()
    }

    fn complete(&self, run_id: Uuid, status: RunStatus) {
        let mut inner = match self.inner.write() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };

        match &status {
            RunStatus::Success { timestamp, .. } => {
                inner.last_update = Some(*timestamp);
                info!("Aggregation {} finished", run_id);
            }
            RunStatus::Failure { message, .. } => {
                warn!("Aggregation {} failed: {}", run_id, message);
            }
        }
        inner.last_status = Some(status);
        inner.state = RunState::Idle;
    }
}

/// Proof of holding the run slot
///
/// Call [`RunGuard::finish`] with the run outcome. A guard dropped without
/// finishing (panic, cancelled task) releases the slot and records a
/// failure.
#[derive(Debug)]
pub struct RunGuard {
    coordinator: RunCoordinator,
    run_id: Uuid,
    finished: bool,
}

impl RunGuard {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn finish(mut self, result: &AppResult<AggregationReport>) {
        let status = match result {
            Ok(report) => RunStatus::Success {
                timestamp: report.finished_at,
                channel_count: report.channel_count,
                stream_count: report.stream_count,
            },
            Err(e) => RunStatus::Failure {
                timestamp: Utc::now(),
                message: e.to_string(),
            },
        };
        self.finished = true;
        self.coordinator.complete(self.run_id, status);
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.coordinator.complete(
                self.run_id,
                RunStatus::Failure {
                    timestamp: Utc::now(),
                    message: "aggregation was interrupted".to_string(),
                },
            );
        }
    }
}
