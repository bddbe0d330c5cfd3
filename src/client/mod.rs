// This file is part of the terraform-provider-azmonitor project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::Rng;
use reqwest::{Method, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub mod auth;
pub mod http;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::Authorizer;
pub use http::HttpTransport;

pub const DEFAULT_BASE_URI: &str = "https://management.azure.com";

/// Characters left untouched when a value is placed in a path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[async_trait]
pub trait Transport: Send + Sync + 'static + Debug {
    /// send a single request, without any retry
    async fn send(&self, request: Request) -> Result<Response>;
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{client}#{operation}: Invalid input: {source}")]
    Validation {
        client: &'static str,
        operation: &'static str,
        #[source]
        source: validation::ValidationError,
    },
    #[error("{client}#{operation}: Failure preparing request: {source}")]
    Prepare {
        client: &'static str,
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("{client}#{operation}: Failure sending request: {source}")]
    Send {
        client: &'static str,
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("{client}#{operation}: Failure responding to request: StatusCode={status} Code=\"{code}\" Message=\"{message}\"")]
    Status {
        client: &'static str,
        operation: &'static str,
        status: u16,
        code: String,
        message: String,
    },
    #[error("{client}#{operation}: Failure decoding response: {source}")]
    Decode {
        client: &'static str,
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status returned by the service, if the request reached it
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn was_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Name of a client operation, used to annotate errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub client: &'static str,
    pub operation: &'static str,
}

impl Operation {
    pub const fn new(client: &'static str, operation: &'static str) -> Self {
        Self { client, operation }
    }

    pub(crate) fn validation(self, source: validation::ValidationError) -> ApiError {
        ApiError::Validation {
            client: self.client,
            operation: self.operation,
            source,
        }
    }

    pub(crate) fn prepare(self, source: anyhow::Error) -> ApiError {
        ApiError::Prepare {
            client: self.client,
            operation: self.operation,
            source,
        }
    }

    pub(crate) fn send(self, source: anyhow::Error) -> ApiError {
        ApiError::Send {
            client: self.client,
            operation: self.operation,
            source,
        }
    }

    pub(crate) fn decode(self, source: serde_json::Error) -> ApiError {
        ApiError::Decode {
            client: self.client,
            operation: self.operation,
            source,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: ErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of attempts after the first one
    pub attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let exponential = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay);
        let jitter = rand::thread_rng().gen_range(0..=250);
        exponential + Duration::from_millis(jitter)
    }
}

fn is_retryable(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .header("Retry-After")?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Shared plumbing of every service client: request preparation,
/// authorization, retries and response decoding.
#[derive(Debug)]
pub struct BaseClient<T> {
    pub base_uri: String,
    pub subscription_id: String,
    pub retry: RetryPolicy,
    transport: Arc<T>,
    authorizer: Arc<Authorizer>,
}

impl<T> Clone for BaseClient<T> {
    fn clone(&self) -> Self {
        Self {
            base_uri: self.base_uri.clone(),
            subscription_id: self.subscription_id.clone(),
            retry: self.retry,
            transport: self.transport.clone(),
            authorizer: self.authorizer.clone(),
        }
    }
}

impl<T: Transport> BaseClient<T> {
    pub fn new(
        base_uri: impl Into<String>,
        subscription_id: impl Into<String>,
        transport: Arc<T>,
        authorizer: Arc<Authorizer>,
    ) -> Self {
        Self {
            base_uri: base_uri.into(),
            subscription_id: subscription_id.into(),
            retry: Default::default(),
            transport,
            authorizer,
        }
    }

    /// Build a request against `base_uri` from a path template
    pub(crate) fn prepare<B: Serialize>(
        &self,
        method: Method,
        template: &str,
        path_parameters: &[(&str, &str)],
        query_parameters: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<Request> {
        let mut path = template.to_owned();
        for (name, value) in path_parameters {
            let encoded = utf8_percent_encode(value, PATH_SEGMENT).to_string();
            path = path.replace(&format!("{{{name}}}"), &encoded);
        }
        if let Some(start) = path.find('{') {
            let end = path[start..]
                .find('}')
                .map_or(path.len(), |end| start + end + 1);
            return Err(anyhow!("missing path parameter {}", &path[start..end]));
        }

        let mut url = Url::parse(&format!("{}{}", self.base_uri.trim_end_matches('/'), path))?;
        if !query_parameters.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in query_parameters {
                query.append_pair(name, value);
            }
        }

        let mut request = Request {
            method,
            url,
            headers: Vec::new(),
            body: None,
        };
        if let Some(body) = body {
            request.headers.push((
                "Content-Type".to_owned(),
                "application/json; charset=utf-8".to_owned(),
            ));
            request.body = Some(Bytes::from(serde_json::to_vec(body)?));
        }
        Ok(request)
    }

    /// Build a GET request from an absolute link returned by the service
    pub(crate) fn prepare_link(&self, link: &str) -> Result<Request> {
        Ok(Request {
            method: Method::GET,
            url: Url::parse(link)?,
            headers: Vec::new(),
            body: None,
        })
    }

    /// Authorize and send the request, retrying throttled and failed attempts
    pub(crate) async fn send(&self, mut request: Request) -> Result<Response> {
        let token = self.authorizer.token(self.transport.as_ref()).await?;
        request
            .headers
            .push(("Authorization".to_owned(), format!("Bearer {token}")));

        let mut attempt = 0;
        loop {
            let result = self.transport.send(request.clone()).await;
            let retryable = match &result {
                Ok(response) => is_retryable(response.status),
                Err(_) => true,
            };
            if !retryable || attempt >= self.retry.attempts {
                return result;
            }

            let delay = result
                .as_ref()
                .ok()
                .and_then(retry_after)
                .unwrap_or_else(|| self.retry.backoff(attempt));
            match &result {
                Ok(response) => log::debug!(
                    "{} {} returned {}, retrying in {:?}",
                    request.method,
                    request.url,
                    response.status,
                    delay
                ),
                Err(err) => log::debug!(
                    "{} {} failed: {err}, retrying in {:?}",
                    request.method,
                    request.url,
                    delay
                ),
            }
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Check the status code of a response against the accepted ones
pub(crate) fn check_status(
    operation: Operation,
    response: &Response,
    accepted: &[u16],
) -> ApiResult<()> {
    if accepted.contains(&response.status) {
        return Ok(());
    }

    let detail = serde_json::from_slice::<ErrorResponse>(&response.body)
        .unwrap_or_default()
        .error;
    let message = if detail.message.is_empty() {
        String::from_utf8_lossy(&response.body).into_owned()
    } else {
        detail.message
    };
    Err(ApiError::Status {
        client: operation.client,
        operation: operation.operation,
        status: response.status,
        code: detail.code,
        message,
    })
}

/// Check the status code and decode the JSON body of a response
pub(crate) fn decode<R: DeserializeOwned>(
    operation: Operation,
    response: &Response,
    accepted: &[u16],
) -> ApiResult<R> {
    check_status(operation, response, accepted)?;
    serde_json::from_slice(&response.body).map_err(|err| operation.decode(err))
}
