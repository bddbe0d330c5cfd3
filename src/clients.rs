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

use tf_provider::Diagnostics;
use tokio::sync::RwLock;

use crate::client::{Authorizer, BaseClient, Transport};
use crate::insights::SubscriptionDiagnosticSettingsClient;
use crate::securityinsight::WatchlistsClient;

/// Service clients sharing one transport and one authorizer
#[derive(Debug)]
pub struct AzureClients<T> {
    pub diagnostic_settings: SubscriptionDiagnosticSettingsClient<T>,
    pub watchlists: WatchlistsClient<T>,
}

impl<T: Transport> AzureClients<T> {
    pub fn new(
        base_uri: &str,
        subscription_id: &str,
        transport: Arc<T>,
        authorizer: Arc<Authorizer>,
    ) -> Self {
        let base = BaseClient::new(base_uri, subscription_id, transport, authorizer);
        Self {
            diagnostic_settings: SubscriptionDiagnosticSettingsClient::new(base.clone()),
            watchlists: WatchlistsClient::new(base),
        }
    }
}

/// Slot filled when the provider is configured.
///
/// Resources and data sources are instantiated before the provider block is
/// known, so they hold a handle and fetch the clients on each operation.
#[derive(Debug)]
pub struct ClientHandle<T> {
    inner: Arc<RwLock<Option<Arc<AzureClients<T>>>>>,
}

impl<T> Clone for ClientHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for ClientHandle<T> {
    fn default() -> Self {
        Self {
            inner: Default::default(),
        }
    }
}

impl<T: Transport> ClientHandle<T> {
    pub fn configured(clients: AzureClients<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(Arc::new(clients)))),
        }
    }

    pub async fn set(&self, clients: AzureClients<T>) {
        *self.inner.write().await = Some(Arc::new(clients));
    }

    /// Clients of the configured provider, or an error diagnostic
    pub async fn get(&self, diags: &mut Diagnostics) -> Option<Arc<AzureClients<T>>> {
        let clients = self.inner.read().await.clone();
        if clients.is_none() {
            diags.root_error(
                "Provider is not configured",
                "The azmonitor provider must be configured before its resources and data sources are used.",
            );
        }
        clients
    }
}
