use crate::errors::PageError;
use crate::models::FormPayload;
use crate::transport::{Response, Transport};
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Form { path: String, payload: FormPayload },
    Json { path: String, body: serde_json::Value },
}

/// In-memory transport that records every request and answers from a queue
/// of canned responses (200 with an empty body once the queue runs dry).
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<VecDeque<Result<Response, PageError>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(Response {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.as_bytes().to_vec(),
        }));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(PageError::transport(message)));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next_reply(&self) -> Result<Response, PageError> {
        self.replies.lock().unwrap().pop_front().unwrap_or(Ok(Response {
            status: StatusCode::OK,
            body: Vec::new(),
        }))
    }
}

impl Transport for RecordingTransport {
    async fn post_form(&self, path: &str, payload: &FormPayload) -> Result<Response, PageError> {
        self.calls.lock().unwrap().push(Call::Form {
            path: path.to_string(),
            payload: payload.clone(),
        });
        self.next_reply()
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Response, PageError> {
        self.calls.lock().unwrap().push(Call::Json {
            path: path.to_string(),
            body: body.clone(),
        });
        self.next_reply()
    }
}
