//! Flow - one intercepted request/response exchange
//!
//! Created by an `add_flow` action, then updated in place by zero or more
//! `update_flow` actions as response data arrives.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::FlowId;

/// Client request half of a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub scheme: String,
    pub host: String,
    pub path: String,
    /// Wall-clock start of the request (seconds since epoch).
    pub timestamp_start: f64,
    /// Request body, if captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Bytes>,
}

impl Request {
    /// The URL as the console renders it.
    pub fn url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.path)
    }
}

/// Server response half of a flow, absent until the response arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status_code: u16,
    pub reason: String,
    /// Wall-clock end of the response (seconds since epoch).
    pub timestamp_end: f64,
    /// Response body, if captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Bytes>,
}

/// One intercepted exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    /// Identity key for upserts, assigned at flow creation.
    pub id: FlowId,
    pub request: Request,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Response>,
    /// Transport-level failure description, if the exchange broke.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Flow {
    /// Start a new flow for a just-seen request.
    pub fn new(request: Request) -> Self {
        Self {
            id: FlowId::new(),
            request,
            response: None,
            error: None,
        }
    }

    /// Round-trip time in milliseconds, once the response has landed.
    pub fn elapsed_ms(&self) -> Option<u64> {
        self.response.as_ref().map(|resp| {
            let secs = (resp.timestamp_end - self.request.timestamp_start).max(0.0);
            (secs * 1000.0).round() as u64
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(ts: f64) -> Request {
        Request {
            method: "GET".into(),
            scheme: "https".into(),
            host: "example.com".into(),
            path: "/index.html".into(),
            timestamp_start: ts,
            content: None,
        }
    }

    #[test]
    fn test_url_rendering() {
        let flow = Flow::new(request(1.0));
        assert_eq!(flow.request.url(), "https://example.com/index.html");
    }

    #[test]
    fn test_elapsed_requires_response() {
        let mut flow = Flow::new(request(10.0));
        assert_eq!(flow.elapsed_ms(), None);

        flow.response = Some(Response {
            status_code: 200,
            reason: "OK".into(),
            timestamp_end: 10.25,
            content: None,
        });
        assert_eq!(flow.elapsed_ms(), Some(250));
    }

    #[test]
    fn test_wire_roundtrip_preserves_id() {
        let flow = Flow::new(request(5.0));
        let json = serde_json::to_string(&flow).unwrap();
        let back: Flow = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, flow.id);
        assert_eq!(back, flow);
    }
}
