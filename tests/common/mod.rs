#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use resty::{Api, Request, Response, RestyError, Result, Transport};
use serde_json::{json, Value};

/// Transport that records every request it is asked to send.
pub struct RecordingTransport {
    requests: Mutex<Vec<Request>>,
    outcome: Outcome,
}

enum Outcome {
    Respond(Response),
    Fail(u16),
}

impl RecordingTransport {
    pub fn responding(body: Value) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            outcome: Outcome::Respond(Response::new(200, body)),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            outcome: Outcome::Fail(status),
        })
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().expect("lock").clone()
    }

    pub fn last(&self) -> Request {
        self.requests().pop().expect("at least one request")
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: Request) -> BoxFuture<'static, Result<Response>> {
        self.requests.lock().expect("lock").push(request);
        let result = match &self.outcome {
            Outcome::Respond(response) => Ok(response.clone()),
            Outcome::Fail(status) => Err(RestyError::Status {
                status: *status,
                body: "failed".to_string(),
            }),
        };
        Box::pin(async move { result })
    }
}

/// Root builder over a transport answering `{"name": "GioVa"}`.
pub fn recording_api() -> (Api, Arc<RecordingTransport>) {
    let transport = RecordingTransport::responding(json!({ "name": "GioVa" }));
    (Api::with_transport(transport.clone()), transport)
}

pub fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}
