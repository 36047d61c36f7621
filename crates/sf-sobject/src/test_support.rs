//! In-memory session that records requests and replays queued responses.

use std::collections::VecDeque;
use std::sync::Mutex;

use busbar_sf_client::{ErrorKind, RequestMethod, Result, Session};
use bytes::Bytes;
use serde_json::Value;

pub(crate) const INSTANCE: &str = "https://test.my.salesforce.com";
pub(crate) const BASE: &str = "https://test.my.salesforce.com/services/data/v62.0";

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub method: RequestMethod,
    pub url: String,
    pub body: Option<Value>,
}

#[derive(Default)]
pub(crate) struct MockSession {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<VecDeque<Result<Bytes>>>,
    tooling: bool,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tooling() -> Self {
        Self {
            tooling: true,
            ..Self::default()
        }
    }

    pub fn respond_json(&self, body: Value) {
        self.respond_raw(body.to_string());
    }

    pub fn respond_raw(&self, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(Bytes::from(body.into())));
    }

    pub fn respond_empty(&self) {
        self.responses.lock().unwrap().push_back(Ok(Bytes::new()));
    }

    pub fn respond_error(&self, status: u16, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(busbar_sf_client::Error::new(ErrorKind::Http {
                status,
                message: message.to_string(),
            })));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was made")
    }
}

impl Session for MockSession {
    fn request(&self, method: RequestMethod, url: &str, body: Option<Vec<u8>>) -> Result<Bytes> {
        let body = body.map(|bytes| serde_json::from_slice(&bytes).expect("request body is JSON"));
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            url: url.to_string(),
            body,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(busbar_sf_client::Error::new(ErrorKind::Other(
                    "no response queued".to_string(),
                )))
            })
    }

    fn base_url(&self, path: &str) -> String {
        format!("{BASE}/{}", path.trim_start_matches('/'))
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{INSTANCE}/{}", path.trim_start_matches('/'))
        }
    }

    fn uses_tooling_api(&self) -> bool {
        self.tooling
    }
}
