//! Service interface and wire types.
//!
//! [`BackupService`] is the narrow seam the probers and operations sit on;
//! [`RestClient`] is the production implementation. Wire types carry only
//! the fields this tool reads or writes; everything else passes through
//! the service untouched.

mod rest;

pub use rest::RestClient;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::poll::ResourceState;

/// Remote call failure. Fatal to the wait call that issued it; this layer
/// never retries.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be completed (connect, send, read).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// The service answered with a non-success status.
    #[error("{url} returned HTTP {status}: {detail}")]
    Status {
        url: String,
        status: u32,
        detail: String,
    },
    /// The response body was not the expected JSON.
    #[error("undecodable response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    /// The endpoint or resource path does not form a valid URL.
    #[error("invalid request URL {url}: {source}")]
    Endpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Snapshot of a backup or restore resource as the service returns it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceStatus {
    pub name: String,
    pub state: ResourceState,
    /// Human-readable explanation of the current state, when the service
    /// provides one.
    pub state_reason: Option<String>,
    pub description: Option<String>,
    pub create_time: Option<String>,
    pub complete_time: Option<String>,
}

/// Long-running operation record tracking an accepted create request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationStatus {
    pub name: String,
    pub done: bool,
    pub error: Option<OperationError>,
}

/// Failure detail attached to a finished operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationError {
    pub code: i32,
    pub message: String,
}

/// Fields of a backup create request.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Days the finished backup is retained before automatic deletion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retain_days: Option<i32>,
    /// Days the backup is protected against manual deletion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_lock_days: Option<i32>,
}

/// Fields of a restore create request. `backup` names the source backup.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreParams {
    pub backup: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Per-volume restore policy overrides, passed through untyped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_data_restore_policy_overrides: Option<serde_json::Value>,
    /// Fine-grained resource filter, passed through untyped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<serde_json::Value>,
}

/// Narrow interface to the backup service.
///
/// Reads are idempotent and side-effect free; create calls return the
/// long-running operation tracking the request.
pub trait BackupService {
    fn get_backup(&self, name: &str) -> Result<ResourceStatus, TransportError>;

    fn get_restore(&self, name: &str) -> Result<ResourceStatus, TransportError>;

    fn get_operation(&self, name: &str) -> Result<OperationStatus, TransportError>;

    fn create_backup(
        &self,
        plan: &str,
        backup_id: &str,
        params: &BackupParams,
    ) -> Result<OperationStatus, TransportError>;

    fn create_restore(
        &self,
        plan: &str,
        restore_id: &str,
        params: &RestoreParams,
    ) -> Result<OperationStatus, TransportError>;

    /// Short-lived signed URL for downloading the backup's index.
    fn backup_index_download_url(&self, backup: &str) -> Result<String, TransportError>;
}
