mod create;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use blobprep_core::{HttpSend, Result};
use bytes::Bytes;
use http::{HeaderMap, Method, Response, StatusCode, Uri};

/// Request seen by [`ScriptedHttpSend`].
#[derive(Debug, Clone)]
pub struct SentRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

/// HttpSend that records requests and replies with scripted responses.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHttpSend {
    responses: Arc<Mutex<VecDeque<Result<Response<Bytes>>>>>,
    sent: Arc<Mutex<Vec<SentRequest>>>,
}

impl ScriptedHttpSend {
    pub fn reply(self, resp: Result<Response<Bytes>>) -> Self {
        self.responses.lock().unwrap().push_back(resp);
        self
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpSend for ScriptedHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<Response<Bytes>> {
        self.sent.lock().unwrap().push(SentRequest {
            method: req.method().clone(),
            uri: req.uri().clone(),
            headers: req.headers().clone(),
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left")
    }
}

pub fn created(request_id: &str) -> Result<Response<Bytes>> {
    Ok(Response::builder()
        .status(StatusCode::CREATED)
        .header("x-ms-request-id", request_id)
        .header("etag", "\"0x8DA1A5F1F5E7C40\"")
        .header("last-modified", "Tue, 01 Mar 2022 08:12:34 GMT")
        .body(Bytes::new())
        .unwrap())
}

pub fn storage_error(status: StatusCode, code: &str, message: &str) -> Result<Response<Bytes>> {
    let body = format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?><Error><Code>{code}</Code><Message>{message}</Message></Error>"
    );
    Ok(Response::builder()
        .status(status)
        .header("x-ms-request-id", "failed-request")
        .header("x-ms-error-code", code)
        .body(Bytes::from(body))
        .unwrap())
}
