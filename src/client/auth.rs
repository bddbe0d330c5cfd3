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

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use reqwest::{Method, Url};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use url::form_urlencoded;

use super::{Request, Transport};

pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Tokens are renewed this long before they expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(300);

/// Source of the bearer tokens sent to the resource manager
#[derive(Debug)]
pub enum Authorizer {
    /// Pre-acquired access token
    Token(String),
    ClientSecret(ClientSecretCredential),
}

impl Authorizer {
    pub async fn token<T: Transport + ?Sized>(&self, transport: &T) -> Result<String> {
        match self {
            Authorizer::Token(token) => Ok(token.clone()),
            Authorizer::ClientSecret(credential) => credential.token(transport).await,
        }
    }
}

pub struct ClientSecretCredential {
    authority_host: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    scope: String,
    cache: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("authority_host", &self.authority_host)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    // v1 endpoints return a string, v2 endpoints a number
    #[serde(default)]
    expires_in: Option<serde_json::Value>,
}

impl ClientSecretCredential {
    pub fn new(
        authority_host: impl Into<String>,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        resource_manager_endpoint: &str,
    ) -> Self {
        Self {
            authority_host: authority_host.into(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: format!(
                "{}/.default",
                resource_manager_endpoint.trim_end_matches('/')
            ),
            cache: Mutex::new(None),
        }
    }

    async fn token<T: Transport + ?Sized>(&self, transport: &T) -> Result<String> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if Instant::now() + EXPIRY_MARGIN < cached.expires_at {
                return Ok(cached.value.clone());
            }
        }

        log::debug!(
            "acquiring token for client {} in tenant {}",
            self.client_id,
            self.tenant_id
        );
        let response = transport.send(self.token_request()?).await?;
        if response.status != 200 {
            return Err(anyhow!(
                "token request for client {} failed with status {}: {}",
                self.client_id,
                response.status,
                String::from_utf8_lossy(&response.body)
            ));
        }
        let token: TokenResponse =
            serde_json::from_slice(&response.body).context("decoding token response")?;

        let expires_in = token
            .expires_in
            .as_ref()
            .and_then(|value| match value {
                serde_json::Value::Number(n) => n.as_u64(),
                serde_json::Value::String(s) => s.parse().ok(),
                _ => None,
            })
            .unwrap_or(3600);
        *cache = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(expires_in),
        });

        Ok(token.access_token)
    }

    fn token_request(&self) -> Result<Request> {
        let url = Url::parse(&format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            self.tenant_id
        ))?;
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "client_credentials")
            .append_pair("client_id", &self.client_id)
            .append_pair("client_secret", &self.client_secret)
            .append_pair("scope", &self.scope)
            .finish();

        Ok(Request {
            method: Method::POST,
            url,
            headers: vec![(
                "Content-Type".to_owned(),
                "application/x-www-form-urlencoded".to_owned(),
            )],
            body: Some(Bytes::from(body)),
        })
    }
}
