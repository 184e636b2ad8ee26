//! Blocking REST implementation of [`BackupService`].
//!
//! One curl easy handle per request; the response body is captured through
//! the transfer's write callback and decoded with serde_json.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use super::{
    BackupParams, BackupService, OperationStatus, ResourceStatus, RestoreParams, TransportError,
};

/// JSON-over-HTTP client for the backup service.
///
/// Idempotent reads map to `GET {endpoint}/v1/{name}`; creates POST to the
/// parent collection with the new resource id as a query parameter. Runs in
/// the current thread; call from `spawn_blocking` if used from async code.
#[derive(Debug, Clone)]
pub struct RestClient {
    endpoint: Url,
    token: Option<String>,
}

impl RestClient {
    /// `endpoint` is the service base URL, e.g. `https://backup.example.com/`.
    pub fn new(endpoint: &str, token: Option<String>) -> Result<Self, TransportError> {
        let mut parsed = Url::parse(endpoint).map_err(|source| TransportError::Endpoint {
            url: endpoint.to_string(),
            source,
        })?;
        // Without the trailing slash, joining drops the base path's last segment.
        if !parsed.path().ends_with('/') {
            parsed.set_path(&format!("{}/", parsed.path()));
        }
        Ok(Self {
            endpoint: parsed,
            token,
        })
    }

    fn resource_url(&self, name: &str) -> Result<Url, TransportError> {
        self.endpoint
            .join(&format!("v1/{name}"))
            .map_err(|source| TransportError::Endpoint {
                url: format!("{}v1/{name}", self.endpoint),
                source,
            })
    }

    fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, TransportError> {
        self.request(url, None)
    }

    fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        payload: &impl serde::Serialize,
    ) -> Result<T, TransportError> {
        let body = serde_json::to_vec(payload).map_err(|source| TransportError::Decode {
            url: url.to_string(),
            source,
        })?;
        self.request(url, Some(&body))
    }

    fn request<T: DeserializeOwned>(
        &self,
        url: Url,
        post_body: Option<&[u8]>,
    ) -> Result<T, TransportError> {
        let mut body = Vec::new();
        let status = perform(&url, self.token.as_deref(), post_body, &mut body).map_err(
            |source| TransportError::Request {
                url: url.to_string(),
                source,
            },
        )?;
        if !(200..300).contains(&status) {
            return Err(TransportError::Status {
                url: url.to_string(),
                status,
                detail: excerpt(&body),
            });
        }
        serde_json::from_slice(&body).map_err(|source| TransportError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl BackupService for RestClient {
    fn get_backup(&self, name: &str) -> Result<ResourceStatus, TransportError> {
        self.get(self.resource_url(name)?)
    }

    fn get_restore(&self, name: &str) -> Result<ResourceStatus, TransportError> {
        self.get(self.resource_url(name)?)
    }

    fn get_operation(&self, name: &str) -> Result<OperationStatus, TransportError> {
        self.get(self.resource_url(name)?)
    }

    fn create_backup(
        &self,
        plan: &str,
        backup_id: &str,
        params: &BackupParams,
    ) -> Result<OperationStatus, TransportError> {
        let mut url = self.resource_url(&format!("{plan}/backups"))?;
        url.query_pairs_mut().append_pair("backupId", backup_id);
        self.post(url, params)
    }

    fn create_restore(
        &self,
        plan: &str,
        restore_id: &str,
        params: &RestoreParams,
    ) -> Result<OperationStatus, TransportError> {
        let mut url = self.resource_url(&format!("{plan}/restores"))?;
        url.query_pairs_mut().append_pair("restoreId", restore_id);
        self.post(url, params)
    }

    fn backup_index_download_url(&self, backup: &str) -> Result<String, TransportError> {
        let url = self.resource_url(&format!("{backup}:getBackupIndexDownloadUrl"))?;
        let response: IndexDownloadUrl = self.get(url)?;
        Ok(response.signed_url)
    }
}

/// Response of the index download URL method.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct IndexDownloadUrl {
    signed_url: String,
}

/// Runs one request, appending the response body to `body`. Returns the
/// HTTP status code.
fn perform(
    url: &Url,
    token: Option<&str>,
    post_body: Option<&[u8]>,
    body: &mut Vec<u8>,
) -> Result<u32, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url.as_str())?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(60))?;

    let mut list = curl::easy::List::new();
    list.append("Accept: application/json")?;
    if let Some(token) = token {
        list.append(&format!("Authorization: Bearer {}", token))?;
    }
    if post_body.is_some() {
        list.append("Content-Type: application/json")?;
    }
    easy.http_headers(list)?;

    if let Some(payload) = post_body {
        easy.post(true)?;
        easy.post_fields_copy(payload)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    easy.response_code()
}

/// Short body excerpt for error messages.
fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "(empty body)".to_string();
    }
    let mut out: String = trimmed.chars().take(200).collect();
    if out.len() < trimmed.len() {
        out.push_str("...");
    }
    out
}
