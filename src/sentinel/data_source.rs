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

use async_trait::async_trait;

use tf_provider::{schema::Schema, value::ValueEmpty, AttributePath, DataSource, Diagnostics};

use crate::client::Transport;
use crate::clients::ClientHandle;
use crate::utils::{WithSchema, WithValidate};

use super::state::WatchlistState;

#[derive(Debug, Default)]
pub struct WatchlistDataSource<T> {
    clients: ClientHandle<T>,
}

impl<T: Transport> WatchlistDataSource<T> {
    pub fn new(clients: ClientHandle<T>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl<T: Transport> DataSource for WatchlistDataSource<T> {
    type State<'a> = WatchlistState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(WatchlistState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        config.validate(diags, AttributePath::default());

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let clients = self.clients.get(diags).await?;
        let resource_group_name = config.resource_group_name.as_str();
        let workspace_name = config.workspace_name.as_str();
        let alias = config.alias.as_str();

        log::debug!("reading watchlist {alias:?} of workspace {workspace_name:?}");
        match clients
            .watchlists
            .get(resource_group_name, workspace_name, alias)
            .await
        {
            Ok(watchlist) => {
                let mut state = config.clone();
                state.fill(watchlist);
                Some(state)
            }
            Err(err) if err.was_not_found() => {
                diags.error(
                    "Watchlist not found",
                    format!(
                        "Watchlist {alias:?} was not found in workspace {workspace_name:?} (resource group {resource_group_name:?})"
                    ),
                    AttributePath::new("alias"),
                );
                None
            }
            Err(err) => {
                diags.root_error(
                    format!("Failed to read watchlist {alias:?}"),
                    err.to_string(),
                );
                None
            }
        }
    }
}
