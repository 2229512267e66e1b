// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Object storage client used to upload avatars.
//!
//! [`AvatarStorage`] is the seam the submission handler depends on;
//! [`HttpStorage`] talks to a Supabase-compatible Storage REST API.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};

/// Connection and policy settings for [`HttpStorage`].
#[derive(Clone, PartialEq, Eq)]
pub struct StorageSettings {
    pub base_url: Url,
    pub access_key: String,
    pub bucket: String,
    pub cache_control_secs: u32,
    pub upsert: bool,
    pub timeout: Duration,
}

impl std::fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageSettings")
            .field("base_url", &self.base_url.as_str())
            .field("bucket", &self.bucket)
            .field("cache_control_secs", &self.cache_control_secs)
            .field("upsert", &self.upsert)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// One object to store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRequest {
    /// Object key inside the bucket.
    pub key: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Where the service stored the object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Full key as reported by the service, usually `<bucket>/<name>`.
    pub key: String,
}

/// Something that can persist an avatar under a key.
pub trait AvatarStorage: Send + Sync {
    /// Store `request`. Must fail with [`Error::ObjectExists`] rather than
    /// overwrite when overwriting is disabled.
    fn upload(&self, request: UploadRequest) -> Result<UploadReceipt>;
}

/// Storage REST client (`POST /storage/v1/object/{bucket}/{key}`).
pub struct HttpStorage {
    client: Client,
    settings: StorageSettings,
}

impl HttpStorage {
    /// Build a client from settings. No request is made yet.
    pub fn new(settings: StorageSettings) -> Result<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }
}

impl AvatarStorage for HttpStorage {
    fn upload(&self, request: UploadRequest) -> Result<UploadReceipt> {
        let url = object_url(&self.settings.base_url, &self.settings.bucket, &request.key)?;
        tracing::info!(
            bucket = %self.settings.bucket,
            key = %request.key,
            bytes = request.bytes.len(),
            "uploading avatar"
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.settings.access_key)
            .header("apikey", &self.settings.access_key)
            .header(
                CACHE_CONTROL,
                format!("max-age={}", self.settings.cache_control_secs),
            )
            .header("x-upsert", self.settings.upsert.to_string())
            .header(CONTENT_TYPE, request.content_type)
            .body(request.bytes)
            .send()?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|err| {
            tracing::debug!(status, error = %err, "could not read storage response body");
            Error::Http(err)
        })?;
        interpret_response(status, &body, &self.settings.bucket, &request.key)
    }
}

/// Build the object endpoint, percent-encoding bucket and key as path segments.
pub fn object_url(base: &Url, bucket: &str, key: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::ConfigValidation {
            message: format!("storage_url cannot be used as a base: {base}"),
        })?
        .pop_if_empty()
        .extend(["storage", "v1", "object", bucket, key]);
    Ok(url)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UploadBody {
    #[serde(rename = "Key")]
    key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    #[serde(rename = "statusCode")]
    status_code: Option<Value>,
    error: Option<String>,
    message: Option<String>,
}

/// Map a storage response onto a receipt or a typed error.
///
/// The service reports duplicates either as HTTP 409 or as a 400 whose body
/// carries `"statusCode": "409"` / `"error": "Duplicate"`.
pub fn interpret_response(status: u16, body: &str, bucket: &str, key: &str) -> Result<UploadReceipt> {
    if (200..300).contains(&status) {
        let parsed: UploadBody = serde_json::from_str(body).unwrap_or_default();
        return Ok(UploadReceipt {
            key: parsed.key.unwrap_or_else(|| format!("{bucket}/{key}")),
        });
    }

    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let body_status = match &parsed.status_code {
        Some(Value::String(s)) => s.parse::<u16>().ok(),
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        _ => None,
    };
    let duplicate = status == 409
        || body_status == Some(409)
        || parsed.error.as_deref() == Some("Duplicate");
    if duplicate {
        return Err(Error::ObjectExists {
            key: key.to_string(),
        });
    }

    let message = parsed
        .message
        .or(parsed.error)
        .unwrap_or_else(|| body.trim().to_string());
    Err(Error::UploadRejected { status, message })
}
