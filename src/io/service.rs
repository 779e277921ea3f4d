//! The remote compute service seam.
//!
//! [`ComputeService`] is the only place where a serialized graph leaves the
//! process. [`EarthEngineClient`] is the blocking REST binding; failures of
//! the service (auth, quota, job errors) are reported as-is, without local
//! retries.
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub const DEFAULT_ENDPOINT: &str = "https://earthengine.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 600;
/// Single combined GeoTIFF, not one file per band.
const FILE_FORMAT: &str = "GEO_TIFF";

/// A serialized image graph to be computed and returned as raster bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelRequest {
    pub expression: Value,
}

/// Opaque collaborator that evaluates a graph and returns the encoded raster.
pub trait ComputeService {
    fn compute_pixels(&self, request: &PixelRequest) -> Result<Vec<u8>>;
}

/// Connection settings for [`EarthEngineClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub project: String,
    pub access_token: String,
    pub timeout: Duration,
}

impl ServiceConfig {
    /// Read `EE_PROJECT`, `EE_ACCESS_TOKEN` and the optional `EE_ENDPOINT`,
    /// `EE_TIMEOUT_SECS` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(Error::MissingArgument {
                    arg: key.to_string(),
                })
        };
        let timeout = match lookup("EE_TIMEOUT_SECS") {
            Some(v) => v.trim().parse::<u64>().map_err(|_| Error::InvalidArgument {
                arg: "EE_TIMEOUT_SECS",
                value: v.clone(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            endpoint: lookup("EE_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            project: required("EE_PROJECT")?,
            access_token: required("EE_ACCESS_TOKEN")?,
            timeout: Duration::from_secs(timeout),
        })
    }

    fn base(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    pub fn thumbnails_url(&self) -> String {
        format!("{}/v1/projects/{}/thumbnails", self.base(), self.project)
    }

    pub fn pixels_url(&self, name: &str) -> String {
        format!("{}/v1/{}:getPixels", self.base(), name)
    }
}

#[derive(Debug, Deserialize)]
struct DownloadId {
    name: String,
}

/// Blocking REST client for the Earth Engine API.
pub struct EarthEngineClient {
    client: Client,
    config: ServiceConfig,
}

impl EarthEngineClient {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("s2ndvi/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

impl ComputeService for EarthEngineClient {
    fn compute_pixels(&self, request: &PixelRequest) -> Result<Vec<u8>> {
        let url = self.config.thumbnails_url();
        debug!("Requesting download id from {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.access_token)
            .json(&json!({
                "expression": request.expression,
                "fileFormat": FILE_FORMAT,
            }))
            .send()?;
        let id: DownloadId = check_status(response)?.json()?;

        let url = self.config.pixels_url(&id.name);
        info!("Downloading pixels for {}", id.name);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.access_token)
            .send()?;
        let bytes = check_status(response)?.bytes()?;
        debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(Error::Service {
        status: status.as_u16(),
        message: service_message(&body),
    })
}

/// The `error.message` of a service error body, or the raw body.
fn service_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
