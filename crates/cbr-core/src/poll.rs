//! Resource state snapshots and the probing seam.
//!
//! A prober answers one question per call: where is this resource now?
//! The wait loop in [`crate::retry`] drives a prober until the answer is a
//! terminal state. Probers never retry; a failed read surfaces immediately.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::client::{BackupService, OperationStatus, ResourceStatus, TransportError};

/// Lifecycle state of a backup or restore resource.
///
/// Unknown wire values decode as `Unspecified` so new service states do not
/// break older clients mid-wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceState {
    Creating,
    InProgress,
    Succeeded,
    Failed,
    Deleting,
    #[default]
    #[serde(other)]
    Unspecified,
}

impl ResourceState {
    /// True once no further transitions will occur.
    pub fn is_terminal(self) -> bool {
        matches!(self, ResourceState::Succeeded | ResourceState::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceState::Unspecified => "UNSPECIFIED",
            ResourceState::Creating => "CREATING",
            ResourceState::InProgress => "IN_PROGRESS",
            ResourceState::Succeeded => "SUCCEEDED",
            ResourceState::Failed => "FAILED",
            ResourceState::Deleting => "DELETING",
        }
    }
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One probe's snapshot of a watched entity. Each probe yields a fresh
/// value; nothing is mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollResult {
    /// Full resource name of the watched entity.
    pub name: String,
    pub state: ResourceState,
    /// Service-provided explanation of the state, when there is one
    /// (FAILED mostly).
    pub state_reason: Option<String>,
}

impl From<ResourceStatus> for PollResult {
    fn from(status: ResourceStatus) -> Self {
        PollResult {
            name: status.name,
            state: status.state,
            state_reason: status.state_reason,
        }
    }
}

impl From<OperationStatus> for PollResult {
    fn from(op: OperationStatus) -> Self {
        let (state, state_reason) = match (op.done, op.error) {
            (false, _) => (ResourceState::InProgress, None),
            (true, Some(e)) => {
                let reason = if e.message.is_empty() {
                    format!("operation error code {}", e.code)
                } else {
                    e.message
                };
                (ResourceState::Failed, Some(reason))
            }
            (true, None) => (ResourceState::Succeeded, None),
        };
        PollResult {
            name: op.name,
            state,
            state_reason,
        }
    }
}

/// Fetches the current snapshot of a watched entity.
pub trait StatusProber {
    /// One idempotent remote read. A transport failure here is fatal to the
    /// wait call that issued it.
    fn poll(&self, reference: &str) -> Result<PollResult, TransportError>;

    /// True while the wait loop should keep probing.
    fn is_not_done(&self, result: &PollResult) -> bool {
        !result.state.is_terminal()
    }
}

/// Probes a backup resource by name.
pub struct BackupProber<'a, S: BackupService> {
    service: &'a S,
}

impl<'a, S: BackupService> BackupProber<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }
}

impl<S: BackupService> StatusProber for BackupProber<'_, S> {
    fn poll(&self, reference: &str) -> Result<PollResult, TransportError> {
        Ok(self.service.get_backup(reference)?.into())
    }
}

/// Probes a restore resource by name.
pub struct RestoreProber<'a, S: BackupService> {
    service: &'a S,
}

impl<'a, S: BackupService> RestoreProber<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }
}

impl<S: BackupService> StatusProber for RestoreProber<'_, S> {
    fn poll(&self, reference: &str) -> Result<PollResult, TransportError> {
        Ok(self.service.get_restore(reference)?.into())
    }
}

/// Probes a long-running operation, folding its done/error fields into the
/// shared state model.
pub struct OperationProber<'a, S: BackupService> {
    service: &'a S,
}

impl<'a, S: BackupService> OperationProber<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }
}

impl<S: BackupService> StatusProber for OperationProber<'_, S> {
    fn poll(&self, reference: &str) -> Result<PollResult, TransportError> {
        Ok(self.service.get_operation(reference)?.into())
    }
}
