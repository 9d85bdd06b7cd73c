//! [`HttpSend`] implementation backed by [`reqwest`].
//!
//! ```no_run
//! use blobprep_core::Context;
//! use blobprep_http_send_reqwest::ReqwestHttpSend;
//!
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
//! ```

use async_trait::async_trait;
use blobprep_core::{Error, HttpSend, Result};
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use reqwest::{Client, Request};

/// ReqwestHttpSend sends requests with a shared [`reqwest::Client`].
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let url = req.uri().to_string();
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to convert request").with_source(e))?;

        debug!("sending {} {}", req.method(), url);
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::network(format!("failed to reach {url}")).with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::network(format!("failed to read response from {url}")).with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}
