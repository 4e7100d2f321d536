//! Executes request descriptors over the network.
//!
//! # Design
//! A `Transport` hands back every HTTP status as data; interpreting it is the
//! inbound phase's job. It only fails when there is no response at all, and
//! says whether the request went out (`NoResponse`) or not (`NotSent`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        base_url: &str,
        request: &HttpRequest,
    ) -> Result<HttpResponse, TransportError>;
}

/// `reqwest`-backed transport with a fixed per-call timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::NotSent(e.to_string()))?;
        Ok(Self { client })
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::NotSent(err.to_string())
    } else {
        TransportError::NoResponse(err.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(
        &self,
        base_url: &str,
        request: &HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        let url = Url::parse(&request.url(base_url))
            .map_err(|e| TransportError::NotSent(format!("invalid URL: {e}")))?;

        let mut builder = self.client.request(method(request.method), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(classify)?;

        Ok(HttpResponse { status, headers, body })
    }
}
