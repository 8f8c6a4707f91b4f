use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::{
    error::TransportError,
    transport::{HttpMethod, HttpTransport, TransportResponse},
};

pub const API: &str = "http://api.test";

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Value>,
}

type Reply = Result<TransportResponse, TransportError>;

/// Answers requests from a queue and remembers what was asked.
#[derive(Default)]
pub struct ReplayTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ReplayTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl HttpTransport for ReplayTransport {
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Value>,
    ) -> Result<TransportResponse, TransportError> {
        self.requests.lock().await.push(RecordedRequest {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(unavailable(url)))
    }
}

/// Hands every request to the test, which decides when and how it resolves.
pub struct ScriptedTransport {
    calls: mpsc::UnboundedSender<PendingCall>,
}

pub struct PendingCall {
    pub request: RecordedRequest,
    reply: oneshot::Sender<Reply>,
}

impl PendingCall {
    pub fn respond(self, reply: Reply) {
        let _ = self.reply.send(reply);
    }
}

impl ScriptedTransport {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PendingCall>) {
        let (calls, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { calls }), rx)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Value>,
    ) -> Result<TransportResponse, TransportError> {
        let (reply, rx) = oneshot::channel();
        let call = PendingCall {
            request: RecordedRequest {
                method,
                url: url.to_string(),
                body: body.cloned(),
            },
            reply,
        };
        if self.calls.send(call).is_err() {
            return Err(unavailable(url));
        }
        rx.await.unwrap_or_else(|_| Err(unavailable(url)))
    }
}

pub fn unavailable(url: &str) -> TransportError {
    TransportError::Request {
        url: url.to_string(),
        reason: "connection refused".to_string(),
    }
}

/// A list response as the backend sends it.
pub fn page_response(page: u32, last_page: u32, links: &str, body: Value) -> Reply {
    let page = page.to_string();
    let last_page = last_page.to_string();
    Ok(TransportResponse::new(
        200,
        [
            ("Links", links.to_string()),
            ("X-Page", page),
            ("X-Last-Page", last_page),
            ("Content-Type", "application/json".to_string()),
        ],
        body.to_string(),
    ))
}

pub fn status_response(status: u16) -> Reply {
    Ok(TransportResponse::new(
        status,
        Vec::<(String, String)>::new(),
        Vec::<u8>::new(),
    ))
}

pub fn query_param(url: &str, name: &str) -> Option<String> {
    let url = url::Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
