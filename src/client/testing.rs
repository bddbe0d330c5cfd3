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

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;

use super::{Authorizer, BaseClient, Request, Response, Transport};

pub(crate) const TEST_BASE_URI: &str = "https://management.example.com";
pub(crate) const TEST_SUBSCRIPTION: &str = "00000000-0000-0000-0000-000000000000";

/// Transport replaying queued responses and recording sent requests
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    responses: Mutex<VecDeque<Result<Response, String>>>,
    requests: Mutex<Vec<Request>>,
}

impl FakeTransport {
    pub(crate) fn push(&self, status: u16, body: serde_json::Value) {
        self.push_with_headers(status, body, &[]);
    }

    pub(crate) fn push_with_headers(
        &self,
        status: u16,
        body: serde_json::Value,
        headers: &[(&str, &str)],
    ) {
        let body = if body.is_null() {
            Bytes::new()
        } else {
            Bytes::from(body.to_string())
        };
        self.responses.lock().unwrap().push_back(Ok(Response {
            status,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body,
        }));
    }

    pub(crate) fn push_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_owned()));
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn pending(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        let description = format!("{} {}", request.method, request.url);
        self.requests.lock().unwrap().push(request);
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no response queued for {description}")),
        }
    }
}

pub(crate) fn test_client(
    transport: FakeTransport,
) -> (BaseClient<FakeTransport>, Arc<FakeTransport>) {
    let transport = Arc::new(transport);
    let client = BaseClient::new(
        TEST_BASE_URI,
        TEST_SUBSCRIPTION,
        transport.clone(),
        Arc::new(Authorizer::Token("test-token".to_owned())),
    );
    (client, transport)
}
