//! Outbound request construction and execution.
//!
//! # Responsibilities
//! - Assemble the outbound request from a resolved base URL and the
//!   inbound request (method, path+query, headers, body)
//! - Apply the body-forwarding policy per method
//! - Execute the exchange against the backend
//!
//! # Design Decisions
//! - A `ProxyRequest` lives for exactly one exchange; it is built after
//!   resolution succeeds, so holding one implies a known target
//! - Bodies are streamed end to end, never buffered
//! - Transport failures are returned to the caller untouched; mapping
//!   them to a caller-facing status is the hosting handler's job

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, Response, Uri};
use hyper::body::Incoming;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use thiserror::Error;

use crate::http::headers::HeaderRelay;

/// Shared outbound HTTP client type.
pub type ProxyClient = Client<HttpConnector, Body>;

/// Failures while executing the outbound exchange.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The resolved base URL plus request path did not form a valid URI.
    #[error("outbound target `{0}` is not a valid URI")]
    InvalidTarget(String),

    /// Connecting to, writing to, or reading from the backend failed.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    /// The configured upstream deadline elapsed.
    #[error("upstream did not respond within {0:?}")]
    DeadlineExceeded(Duration),
}

/// Whether the inbound body is forwarded for this method.
fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::DELETE)
}

/// One outbound exchange toward a machine's extension API.
pub struct ProxyRequest {
    target_base_url: String,
    method: Method,
    path_and_query: String,
    headers: HeaderMap,
    body: Body,
}

impl ProxyRequest {
    /// Assemble the outbound request.
    ///
    /// Method and path+query are taken verbatim from the inbound request;
    /// headers are copied through `relay`; the inbound body is attached
    /// only for POST, PUT and DELETE. When the body is dropped, its
    /// framing headers go with it — an outbound request without a body
    /// must not advertise one.
    pub fn assemble(
        target_base_url: String,
        inbound: Request<Body>,
        relay: &dyn HeaderRelay,
    ) -> Self {
        let (parts, inbound_body) = inbound.into_parts();

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        let mut headers = HeaderMap::new();
        relay.relay(&parts.headers, &mut headers);

        let body = if carries_body(&parts.method) {
            inbound_body
        } else {
            headers.remove(header::CONTENT_LENGTH);
            headers.remove(header::TRANSFER_ENCODING);
            Body::empty()
        };

        Self {
            target_base_url,
            method: parts.method,
            path_and_query,
            headers,
            body,
        }
    }

    /// The full outbound URI: base URL with path+query appended.
    fn outbound_uri(&self) -> Result<Uri, ProxyError> {
        let target = format!("{}{}", self.target_base_url, self.path_and_query);
        target
            .parse()
            .map_err(|_| ProxyError::InvalidTarget(target))
    }

    /// Execute the exchange and return the backend's response.
    ///
    /// With a deadline configured the whole call is bounded; without one
    /// the proxy waits as long as the backend takes.
    pub async fn execute(
        self,
        client: &ProxyClient,
        deadline: Option<Duration>,
    ) -> Result<Response<Incoming>, ProxyError> {
        let uri = self.outbound_uri()?;

        let mut outbound = Request::builder()
            .method(self.method)
            .uri(uri)
            .body(self.body)
            .map_err(|e| ProxyError::InvalidTarget(e.to_string()))?;
        *outbound.headers_mut() = self.headers;

        let exchange = client.request(outbound);
        match deadline {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| ProxyError::DeadlineExceeded(limit))?
                .map_err(ProxyError::Upstream),
            None => exchange.await.map_err(ProxyError::Upstream),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::headers::PassthroughRelay;
    use axum::http::HeaderValue;

    fn inbound(method: Method, uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_bytes(body: Body) -> Vec<u8> {
        axum::body::to_bytes(body, usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[test]
    fn body_policy_by_method() {
        assert!(carries_body(&Method::POST));
        assert!(carries_body(&Method::PUT));
        assert!(carries_body(&Method::DELETE));
        assert!(!carries_body(&Method::GET));
        assert!(!carries_body(&Method::OPTIONS));
        assert!(!carries_body(&Method::HEAD));
    }

    #[test]
    fn outbound_uri_appends_path_and_query() {
        let request = ProxyRequest::assemble(
            "http://localhost:9001".to_string(),
            inbound(Method::GET, "/api/ext/machine123/status?x=1", ""),
            &PassthroughRelay,
        );

        assert_eq!(
            request.outbound_uri().unwrap().to_string(),
            "http://localhost:9001/api/ext/machine123/status?x=1"
        );
    }

    #[test]
    fn invalid_target_is_an_error() {
        let request = ProxyRequest::assemble(
            "http://bad host".to_string(),
            inbound(Method::GET, "/api/ext/m1/x", ""),
            &PassthroughRelay,
        );

        assert!(matches!(
            request.outbound_uri(),
            Err(ProxyError::InvalidTarget(_))
        ));
    }

    #[tokio::test]
    async fn post_keeps_the_inbound_body() {
        let request = ProxyRequest::assemble(
            "http://localhost:9001".to_string(),
            inbound(Method::POST, "/api/ext/m1/x", "payload-bytes"),
            &PassthroughRelay,
        );

        assert_eq!(body_bytes(request.body).await, b"payload-bytes");
    }

    #[tokio::test]
    async fn get_drops_the_inbound_body_and_its_framing() {
        let mut req = inbound(Method::GET, "/api/ext/m1/x", "should-not-forward");
        req.headers_mut()
            .insert(header::CONTENT_LENGTH, HeaderValue::from_static("18"));

        let request = ProxyRequest::assemble(
            "http://localhost:9001".to_string(),
            req,
            &PassthroughRelay,
        );

        assert!(request.headers.get(header::CONTENT_LENGTH).is_none());
        assert!(body_bytes(request.body).await.is_empty());
    }

    #[test]
    fn headers_are_copied_with_multiplicity() {
        let mut req = inbound(Method::GET, "/api/ext/m1/x", "");
        req.headers_mut()
            .append("x-tag", HeaderValue::from_static("one"));
        req.headers_mut()
            .append("x-tag", HeaderValue::from_static("two"));

        let request = ProxyRequest::assemble(
            "http://localhost:9001".to_string(),
            req,
            &PassthroughRelay,
        );

        let tags: Vec<_> = request.headers.get_all("x-tag").iter().collect();
        assert_eq!(tags, vec!["one", "two"]);
    }
}
