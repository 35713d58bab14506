//! Dataverse native API client (blocking)

use std::io::Read;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use tracing::debug;

use super::dataset::FileEntry;
use crate::config::ExportConfig;
use crate::{Error, Result};

const API_KEY_HEADER: &str = "X-Dataverse-key";
const MAX_ERROR_BODY_BYTES: usize = 4 * 1024;

/// Identifiers of a dataset Dataverse has just created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedDataset {
    /// Database id
    pub id: u64,
    /// Persistent identifier, e.g. `doi:10.5072/FK2/ABCDEF`
    pub persistent_id: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    data: Option<T>,
    message: Option<String>,
}

/// Client for one Dataverse installation.
#[derive(Debug, Clone)]
pub struct DataverseClient {
    base_url: String,
    api_token: String,
    http: Client,
}

impl DataverseClient {
    /// Create a client for `base_url` authenticating with `api_token`.
    ///
    /// # Errors
    ///
    /// `Error::Transport` if the HTTP client cannot be initialised (TLS backend).
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("dvc-dataverse/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport)?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
            http,
        })
    }

    /// Create a client from the export configuration.
    ///
    /// # Errors
    ///
    /// `Error::Config` if the server URL or API token is missing.
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        let (url, token) = config.credentials()?;
        Self::new(url, token)
    }

    /// Get the installation base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a dataset in `collection` from a native API payload.
    ///
    /// # Errors
    ///
    /// `Error::Unauthorized`, `Error::Http` or `Error::Transport`.
    pub fn create_dataset(
        &self,
        collection: &str,
        payload: &serde_json::Value,
    ) -> Result<CreatedDataset> {
        let url = format!("{}/api/dataverses/{collection}/datasets", self.base_url);
        debug!(%url, "creating dataset");
        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_token)
            .header("Accept", "application/json")
            .json(payload)
            .send()
            .map_err(transport)?;
        let envelope: Envelope<CreatedDataset> = read_envelope(check_status(response)?)?;
        envelope.data.ok_or_else(|| Error::Http {
            status: StatusCode::OK.as_u16(),
            body: "response carries no dataset".to_string(),
        })
    }

    /// Upload one snapshot file into the dataset `persistent_id`.
    ///
    /// # Errors
    ///
    /// `Error::Io` if the file cannot be read, otherwise as
    /// [`DataverseClient::create_dataset`].
    pub fn add_file(&self, persistent_id: &str, file: &FileEntry) -> Result<()> {
        let content = std::fs::read(&file.source).map_err(|e| Error::from_io(&file.source, e))?;
        let json_data = serde_json::json!({
            "directoryLabel": file.directory_label(),
            "restrict": false,
        });
        let form = Form::new()
            .text("jsonData", json_data.to_string())
            .part("file", Part::bytes(content).file_name(file.upload_name()));

        let url = Url::parse_with_params(
            &format!("{}/api/datasets/:persistentId/add", self.base_url),
            &[("persistentId", persistent_id)],
        )
        .map_err(|e| Error::Transport(format!("invalid upload URL: {e}")))?;

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_token)
            .multipart(form)
            .send()
            .map_err(transport)?;
        let _: Envelope<IgnoredAny> = read_envelope(check_status(response)?)?;
        Ok(())
    }
}

/// GET `url` and return the body as text.
///
/// # Errors
///
/// `Error::Http` on non-success status, `Error::Transport` on network failure.
pub fn fetch_text(url: &str) -> Result<String> {
    let response = reqwest::blocking::get(url).map_err(transport)?;
    check_status(response)?.text().map_err(transport)
}

fn transport(err: reqwest::Error) -> Error {
    Error::Transport(err.to_string())
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Error::Unauthorized);
    }
    if !status.is_success() {
        return Err(Error::Http {
            status: status.as_u16(),
            body: read_body_limited(response),
        });
    }
    Ok(response)
}

// Dataverse answers 200 with `"status": "ERROR"` for some rejected requests.
fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>> {
    let status = response.status().as_u16();
    let body = response.text().map_err(transport)?;
    let envelope: Envelope<T> = serde_json::from_str(&body)?;
    if envelope.status != "OK" {
        return Err(Error::Http {
            status,
            body: envelope
                .message
                .unwrap_or_else(|| format!("status {}", envelope.status)),
        });
    }
    Ok(envelope)
}

fn read_body_limited(response: Response) -> String {
    let mut bytes = Vec::new();
    match response
        .take(MAX_ERROR_BODY_BYTES as u64)
        .read_to_end(&mut bytes)
    {
        Ok(_) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => format!("<unreadable body: {err}>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = DataverseClient::new("https://demo.dataverse.org/", "token").unwrap();
        assert_eq!(client.base_url(), "https://demo.dataverse.org");
    }

    #[test]
    fn test_created_dataset_wire_format() {
        let envelope: Envelope<CreatedDataset> = serde_json::from_str(
            r#"{"status":"OK","data":{"id":42,"persistentId":"doi:10.5072/FK2/ABC"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.status, "OK");
        assert_eq!(
            envelope.data.unwrap(),
            CreatedDataset {
                id: 42,
                persistent_id: "doi:10.5072/FK2/ABC".to_string()
            }
        );
    }
}
