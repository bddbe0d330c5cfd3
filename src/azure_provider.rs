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

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use tf_provider::{
    map,
    schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema},
    value::{ValueEmpty, ValueString},
    AttributePath, Diagnostics, Provider,
};

use crate::client::auth::{ClientSecretCredential, DEFAULT_AUTHORITY_HOST};
use crate::client::{Authorizer, HttpTransport, DEFAULT_BASE_URI};
use crate::clients::{AzureClients, ClientHandle};
use crate::monitor::SubscriptionDiagnosticSettingResource;
use crate::sentinel::WatchlistDataSource;
use crate::utils::known_str;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig<'a> {
    #[serde(borrow = "'a")]
    pub subscription_id: ValueString<'a>,
    pub tenant_id: ValueString<'a>,
    pub client_id: ValueString<'a>,
    pub client_secret: ValueString<'a>,
    pub access_token: ValueString<'a>,
    pub resource_manager_endpoint: ValueString<'a>,
    pub authority_host: ValueString<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Credentials {
    AccessToken(String),
    ClientSecret {
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
}

/// Provider settings once the environment fallbacks are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedConfig {
    pub subscription_id: String,
    pub resource_manager_endpoint: String,
    pub authority_host: String,
    pub credentials: Credentials,
}

fn check_url(diags: &mut Diagnostics, attribute: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => (),
        Ok(url) => diags.error(
            format!("Invalid `{attribute}`"),
            format!(
                "{value:?} must be an http or https URL, got scheme {:?}",
                url.scheme()
            ),
            AttributePath::new(attribute),
        ),
        Err(err) => diags.error(
            format!("Invalid `{attribute}`"),
            format!("{value:?} is not a valid URL: {err}"),
            AttributePath::new(attribute),
        ),
    }
}

impl<'a> ProviderConfig<'a> {
    /// Apply the `ARM_*` fallbacks and check the settings are complete
    pub(crate) fn resolve<F>(&self, diags: &mut Diagnostics, env: F) -> Option<ResolvedConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let setting = |value: &ValueString, var: &str| {
            known_str(value)
                .map(str::to_owned)
                .or_else(|| env(var).filter(|value| !value.is_empty()))
        };

        let subscription_id = setting(&self.subscription_id, "ARM_SUBSCRIPTION_ID");
        let resource_manager_endpoint = setting(
            &self.resource_manager_endpoint,
            "ARM_RESOURCE_MANAGER_ENDPOINT",
        )
        .unwrap_or_else(|| DEFAULT_BASE_URI.to_owned());
        let authority_host = setting(&self.authority_host, "ARM_AUTHORITY_HOST")
            .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_owned());

        check_url(
            diags,
            "resource_manager_endpoint",
            &resource_manager_endpoint,
        );
        check_url(diags, "authority_host", &authority_host);

        let credentials = match (
            setting(&self.access_token, "ARM_ACCESS_TOKEN"),
            setting(&self.tenant_id, "ARM_TENANT_ID"),
            setting(&self.client_id, "ARM_CLIENT_ID"),
            setting(&self.client_secret, "ARM_CLIENT_SECRET"),
        ) {
            (Some(token), _, _, _) => Some(Credentials::AccessToken(token)),
            (None, Some(tenant_id), Some(client_id), Some(client_secret)) => {
                Some(Credentials::ClientSecret {
                    tenant_id,
                    client_id,
                    client_secret,
                })
            }
            (None, tenant_id, client_id, client_secret) => {
                let missing = [
                    ("tenant_id", tenant_id.is_none()),
                    ("client_id", client_id.is_none()),
                    ("client_secret", client_secret.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(format!("`{name}`")))
                .collect::<Vec<_>>()
                .join(", ");
                diags.root_error(
                    "Missing credentials",
                    format!("Either `access_token` (ARM_ACCESS_TOKEN) or the client credentials must be set; missing {missing}"),
                );
                None
            }
        };

        if subscription_id.is_none() {
            diags.error(
                "Missing subscription",
                "`subscription_id` must be set, either in the provider block or with ARM_SUBSCRIPTION_ID",
                AttributePath::new("subscription_id"),
            );
        }

        if !diags.errors.is_empty() {
            return None;
        }

        Some(ResolvedConfig {
            subscription_id: subscription_id?,
            resource_manager_endpoint: resource_manager_endpoint.trim_end_matches('/').to_owned(),
            authority_host: authority_host.trim_end_matches('/').to_owned(),
            credentials: credentials?,
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct AzureProvider {
    clients: ClientHandle<HttpTransport>,
}

#[async_trait]
impl Provider for AzureProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        let setting = |description: &str, sensitive: bool| Attribute {
            attr_type: AttributeType::String,
            description: Description::plain(description),
            constraint: AttributeConstraint::Optional,
            sensitive,
            ..Default::default()
        };

        Some(Schema {
            version: 1,
            block: Block {
                description: Description::plain(
                    "Azure Monitor diagnostic settings and Sentinel watchlists",
                ),
                attributes: map! {
                    "subscription_id" => setting("Subscription used by the provider. Defaults to ARM_SUBSCRIPTION_ID", false),
                    "tenant_id" => setting("Tenant of the service principal. Defaults to ARM_TENANT_ID", false),
                    "client_id" => setting("Client ID of the service principal. Defaults to ARM_CLIENT_ID", false),
                    "client_secret" => setting("Client secret of the service principal. Defaults to ARM_CLIENT_SECRET", true),
                    "access_token" => setting("Pre-acquired access token for the resource manager. Defaults to ARM_ACCESS_TOKEN", true),
                    "resource_manager_endpoint" => setting("Resource manager endpoint. Defaults to ARM_RESOURCE_MANAGER_ENDPOINT, or the public cloud", false),
                    "authority_host" => setting("Authority used to acquire tokens. Defaults to ARM_AUTHORITY_HOST, or the public cloud", false),
                },
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::Config<'a>) -> Option<()> {
        for (attribute, value) in [
            (
                "resource_manager_endpoint",
                &config.resource_manager_endpoint,
            ),
            ("authority_host", &config.authority_host),
        ] {
            if let Some(value) = known_str(value) {
                check_url(diags, attribute, value);
            }
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        let resolved = config.resolve(diags, |name| std::env::var(name).ok())?;

        let transport = match HttpTransport::new() {
            Ok(transport) => Arc::new(transport),
            Err(err) => {
                diags.root_error("Failed to build the HTTP client", err.to_string());
                return None;
            }
        };
        let authorizer = match resolved.credentials {
            Credentials::AccessToken(token) => Authorizer::Token(token),
            Credentials::ClientSecret {
                tenant_id,
                client_id,
                client_secret,
            } => Authorizer::ClientSecret(ClientSecretCredential::new(
                resolved.authority_host,
                tenant_id,
                client_id,
                client_secret,
                &resolved.resource_manager_endpoint,
            )),
        };

        log::info!(
            "configuring provider for subscription {} (terraform {terraform_version})",
            resolved.subscription_id
        );
        self.clients
            .set(AzureClients::new(
                &resolved.resource_manager_endpoint,
                &resolved.subscription_id,
                transport,
                Arc::new(authorizer),
            ))
            .await;
        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<std::collections::HashMap<String, Box<dyn tf_provider::DynamicResource>>> {
        Some(map! {
            "subscription_diagnostic_setting" => SubscriptionDiagnosticSettingResource::new(self.clients.clone()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<std::collections::HashMap<String, Box<dyn tf_provider::DynamicDataSource>>> {
        Some(map! {
            "sentinel_watchlist" => WatchlistDataSource::new(self.clients.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::collections::HashMap;

    use tf_provider::value::Value;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |name| vars.get(name).cloned()
    }

    fn string(value: &'static str) -> ValueString<'static> {
        Value::Value(Cow::Borrowed(value))
    }

    #[test]
    fn environment_fallbacks() {
        let mut diags = Diagnostics::default();
        let resolved = ProviderConfig::default()
            .resolve(
                &mut diags,
                env(&[
                    ("ARM_SUBSCRIPTION_ID", "sub"),
                    ("ARM_TENANT_ID", "tenant"),
                    ("ARM_CLIENT_ID", "client"),
                    ("ARM_CLIENT_SECRET", "secret"),
                ]),
            )
            .unwrap();

        assert!(diags.errors.is_empty());
        assert_eq!(resolved.subscription_id, "sub");
        assert_eq!(resolved.resource_manager_endpoint, DEFAULT_BASE_URI);
        assert_eq!(resolved.authority_host, DEFAULT_AUTHORITY_HOST);
        assert_eq!(
            resolved.credentials,
            Credentials::ClientSecret {
                tenant_id: "tenant".into(),
                client_id: "client".into(),
                client_secret: "secret".into(),
            }
        );
    }

    #[test]
    fn provider_block_wins_over_environment() {
        let config = ProviderConfig {
            subscription_id: string("from-config"),
            access_token: string("token"),
            resource_manager_endpoint: string("https://management.usgovcloudapi.net/"),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        let resolved = config
            .resolve(&mut diags, env(&[("ARM_SUBSCRIPTION_ID", "from-env")]))
            .unwrap();

        assert_eq!(resolved.subscription_id, "from-config");
        assert_eq!(
            resolved.credentials,
            Credentials::AccessToken("token".into())
        );
        assert_eq!(
            resolved.resource_manager_endpoint,
            "https://management.usgovcloudapi.net"
        );
    }

    #[test]
    fn incomplete_settings_are_reported() {
        let config = ProviderConfig {
            client_id: string("client"),
            authority_host: string("not a url"),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        assert!(config.resolve(&mut diags, env(&[])).is_none());
        // authority host, credentials and subscription
        assert_eq!(diags.errors.len(), 3);
    }

    #[tokio::test]
    async fn validate_checks_endpoints() {
        let provider = AzureProvider::default();
        let mut diags = Diagnostics::default();
        let config = ProviderConfig {
            resource_manager_endpoint: string("ftp://management.azure.com"),
            authority_host: Value::Unknown,
            ..Default::default()
        };
        assert!(provider.validate(&mut diags, config).await.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn registers_resources() {
        let provider = AzureProvider::default();
        let mut diags = Diagnostics::default();
        let resources = provider.get_resources(&mut diags).unwrap();
        let data_sources = provider.get_data_sources(&mut diags).unwrap();
        assert!(resources.contains_key("subscription_diagnostic_setting"));
        assert!(data_sources.contains_key("sentinel_watchlist"));
    }
}
