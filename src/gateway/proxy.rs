// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Reverse proxy: forwards a request to a backend and relays its response.
//!
//! - Method, path, query and body are forwarded verbatim
//! - Hop-by-hop headers and `Host` are dropped; `Host` becomes the backend
//! - `X-Forwarded-For`, `X-Forwarded-Proto` and `X-Forwarded-Host` are added
//! - Connection failures and timeouts become 502, without retry
//! - Backend status codes are relayed unchanged

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, Request},
    http::{
        header::{self, HeaderName, HeaderValue},
        HeaderMap, Response,
    },
    response::IntoResponse,
};
use url::Url;

use crate::error::ApiError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");
const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");

const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Failed to read request body: {0}")]
    Body(String),

    #[error("Invalid upstream target: {0}")]
    InvalidTarget(String),

    #[error("Upstream unavailable: {0}")]
    Upstream(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl From<ProxyError> for ApiError {
    fn from(e: ProxyError) -> Self {
        match e {
            ProxyError::PayloadTooLarge { .. } => ApiError::payload_too_large(e.to_string()),
            ProxyError::Body(_) => ApiError::validation(e.to_string()),
            ProxyError::InvalidTarget(detail) | ProxyError::Client(detail) => {
                tracing::error!(error = %detail, "proxy misconfigured");
                ApiError::internal()
            }
            ProxyError::Upstream(_) => ApiError::upstream_unavailable("Service unavailable"),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> axum::response::Response {
        ApiError::from(self).into_response()
    }
}

/// Shared outbound client and limits.
#[derive(Clone)]
pub struct Proxy {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl Proxy {
    pub fn new(timeout: Duration, max_body_bytes: usize) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ProxyError::Client(e.to_string()))?;
        Ok(Self {
            client,
            max_body_bytes,
        })
    }

    /// Forward `request` to `upstream` and relay the response.
    pub async fn forward(&self, upstream: &Url, request: Request) -> Result<Response<Body>, ProxyError> {
        let (parts, body) = request.into_parts();

        enforce_body_limit(&parts.headers, self.max_body_bytes)?;
        let body = to_bytes(body, self.max_body_bytes).await.map_err(|e| {
            if e.to_string().contains("length limit") {
                ProxyError::PayloadTooLarge {
                    limit: self.max_body_bytes,
                }
            } else {
                ProxyError::Body(e.to_string())
            }
        })?;

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let target = target_url(upstream, path_and_query)?;

        let client_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());
        let headers = forwarded_headers(&parts.headers, client_ip.as_deref());

        tracing::debug!(method = %parts.method, target = %target, "proxying request");

        let response = self
            .client
            .request(parts.method.clone(), target.clone())
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(target = %target, error = %e, "upstream request failed");
                ProxyError::Upstream(e.to_string())
            })?;

        let status = response.status();
        let mut response_headers = response.headers().clone();
        strip_hop_by_hop(&mut response_headers);
        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!(target = %target, error = %e, "upstream response body failed");
            ProxyError::Upstream(e.to_string())
        })?;

        let mut relayed = Response::new(Body::from(bytes));
        *relayed.status_mut() = status;
        *relayed.headers_mut() = response_headers;
        Ok(relayed)
    }
}

/// Reject early when `Content-Length` already exceeds the limit.
fn enforce_body_limit(headers: &HeaderMap, max_body_bytes: usize) -> Result<(), ProxyError> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());

    match declared {
        Some(length) if length > max_body_bytes => Err(ProxyError::PayloadTooLarge {
            limit: max_body_bytes,
        }),
        _ => Ok(()),
    }
}

/// Backend origin joined with the original path and query.
fn target_url(upstream: &Url, path_and_query: &str) -> Result<Url, ProxyError> {
    let origin = upstream.origin().ascii_serialization();
    Url::parse(&format!("{origin}{path_and_query}"))
        .map_err(|e| ProxyError::InvalidTarget(format!("{origin}{path_and_query}: {e}")))
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    // Headers named in `Connection` are hop-by-hop too.
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}

/// Headers to send upstream.
fn forwarded_headers(incoming: &HeaderMap, client_ip: Option<&str>) -> HeaderMap {
    let mut headers = incoming.clone();
    strip_hop_by_hop(&mut headers);
    let original_host = headers.remove(header::HOST);
    // Recomputed by the client for the buffered body.
    headers.remove(header::CONTENT_LENGTH);

    if let Some(ip) = client_ip {
        let value = match incoming.get(&X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
            Some(existing) if !existing.is_empty() => format!("{existing}, {ip}"),
            _ => ip.to_string(),
        };
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(X_FORWARDED_FOR, value);
        }
    }
    headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));
    if let Some(host) = original_host {
        headers.insert(X_FORWARDED_HOST, host);
    }

    headers
}
