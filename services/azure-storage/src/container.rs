use blobprep_core::time::{parse_http_date, DateTime};
use blobprep_core::{Error, Result, Signer};
use bytes::Bytes;
use http::{header, HeaderMap, Request, Response, StatusCode};
use log::debug;
use percent_encoding::utf8_percent_encode;
use quick_xml::de;
use serde::Deserialize;

use crate::constants::*;
use crate::Credential;

/// ContainerClient manages containers under one blob service endpoint.
///
/// The endpoint includes the account path for path style services, for
/// example `http://localhost:10000/devstoreaccount1`.
#[derive(Clone, Debug)]
pub struct ContainerClient {
    endpoint: String,
    signer: Signer<Credential>,
}

/// Response of a successful create container call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateContainerResponse {
    /// Request id assigned by the service (`x-ms-request-id`).
    pub request_id: String,
    /// ETag of the new container.
    pub etag: Option<String>,
    /// Last modified time of the new container.
    pub last_modified: Option<DateTime>,
}

impl ContainerClient {
    /// Create a client for the given endpoint.
    pub fn new(endpoint: impl Into<String>, signer: Signer<Credential>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            signer,
        }
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the url of the given container.
    pub fn container_url(&self, name: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint,
            utf8_percent_encode(name, &AZURE_QUERY_ENCODE_SET)
        )
    }

    /// Create a new container.
    ///
    /// Fails with [`blobprep_core::ErrorKind::ContainerAlreadyExists`] if
    /// the container is already there.
    ///
    /// - [Create Container](https://learn.microsoft.com/en-us/rest/api/storageservices/create-container)
    pub async fn create_container(&self, name: &str) -> Result<CreateContainerResponse> {
        let url = format!("{}?restype=container", self.container_url(name));

        let mut parts = Request::put(&url)
            .header(X_MS_VERSION, AZURE_VERSION)
            .header(header::CONTENT_LENGTH, "0")
            .body(())?
            .into_parts()
            .0;
        self.signer.sign(&mut parts).await?;

        let req = Request::from_parts(parts, Bytes::new());
        let resp = self.signer.context().http_send(req).await?;
        debug!("create container {name} got response: {:?}", resp.status());

        match resp.status() {
            StatusCode::CREATED => Ok(parse_create_response(resp.headers())),
            _ => Err(parse_error_response(resp)),
        }
    }
}

fn parse_create_response(headers: &HeaderMap) -> CreateContainerResponse {
    let get = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    };

    CreateContainerResponse {
        request_id: get(X_MS_REQUEST_ID).unwrap_or_default(),
        etag: get(header::ETAG.as_str()),
        last_modified: get(header::LAST_MODIFIED.as_str()).and_then(|v| parse_http_date(&v).ok()),
    }
}

/// Error body returned by Azure Storage.
///
/// ```xml
/// <?xml version="1.0" encoding="utf-8"?>
/// <Error>
///   <Code>ContainerAlreadyExists</Code>
///   <Message>The specified container already exists.</Message>
/// </Error>
/// ```
#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct StorageErrorBody {
    code: String,
    message: String,
}

fn parse_error_response(resp: Response<Bytes>) -> Error {
    let (parts, body) = resp.into_parts();
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    };

    let text = String::from_utf8_lossy(&body);
    let parsed: StorageErrorBody = match de::from_str(text.trim_start_matches('\u{feff}')) {
        Ok(v) => v,
        Err(e) => {
            debug!("error body is not a storage error: {e}");
            StorageErrorBody::default()
        }
    };

    let code = header(X_MS_ERROR_CODE)
        .filter(|v| !v.is_empty())
        .unwrap_or(parsed.code);
    let code = if code.is_empty() {
        "Unknown".to_string()
    } else {
        code
    };
    // Service messages carry RequestId and Time on the following lines.
    let message = parsed.message.lines().next().unwrap_or_default().trim();
    let request_id = header(X_MS_REQUEST_ID).unwrap_or_default();

    let status = parts.status;
    let detail = if message.is_empty() {
        format!("{status} {code} (request id: {request_id})")
    } else {
        format!("{status} {code}: {message} (request id: {request_id})")
    };

    match status {
        StatusCode::CONFLICT if code == "ContainerAlreadyExists" => {
            Error::container_already_exists(detail)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::credential_denied(detail),
        _ => Error::unexpected(detail),
    }
}
