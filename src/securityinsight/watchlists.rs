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

use futures::{stream, Stream, TryStreamExt};
use reqwest::Method;

use crate::client::validation::{name_length, validate, Constraint, Rule, Target};
use crate::client::{check_status, decode, ApiError, ApiResult, BaseClient, Operation, Transport};

use super::models::{Watchlist, WatchlistList};

pub const API_VERSION: &str = "2022-01-01-preview";

const CLIENT: &str = "securityinsight.WatchlistsClient";
const WATCHLIST_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.OperationalInsights/workspaces/{workspaceName}/providers/Microsoft.SecurityInsights/watchlists/{watchlistAlias}";
const COLLECTION_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.OperationalInsights/workspaces/{workspaceName}/providers/Microsoft.SecurityInsights/watchlists";

/// Client for the watchlists of a Sentinel workspace
#[derive(Debug, Clone)]
pub struct WatchlistsClient<T> {
    base: BaseClient<T>,
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

impl<T: Transport> WatchlistsClient<T> {
    pub fn new(base: BaseClient<T>) -> Self {
        Self { base }
    }

    fn scope_constraints<'a>(
        &'a self,
        resource_group_name: &'a str,
        workspace_name: &'a str,
    ) -> Vec<Constraint<'a>> {
        let mut constraints = vec![Constraint::new(
            "client.SubscriptionID",
            Target::Str(&self.base.subscription_id),
            Rule::MinLength(1),
        )];
        constraints.extend(name_length("resourceGroupName", resource_group_name));
        constraints.extend(name_length("workspaceName", workspace_name));
        constraints
    }

    /// Create or update a watchlist and its items.
    ///
    /// Items are bulk loaded from `rawContent` for small lists, or from a SAS
    /// URI for large ones.
    pub async fn create_or_update(
        &self,
        resource_group_name: &str,
        workspace_name: &str,
        watchlist_alias: &str,
        watchlist: &Watchlist,
    ) -> ApiResult<Watchlist> {
        let op = Operation::new(CLIENT, "CreateOrUpdate");

        let properties = watchlist.properties.as_ref();
        let mut constraints = self.scope_constraints(resource_group_name, workspace_name);
        constraints.push(Constraint::new(
            "watchlist.WatchlistProperties",
            Target::Presence(properties.is_some()),
            Rule::Nullable(vec![
                Constraint::new(
                    "watchlist.WatchlistProperties.DisplayName",
                    Target::Presence(properties.map_or(false, |p| p.display_name.is_some())),
                    Rule::NotNull,
                ),
                Constraint::new(
                    "watchlist.WatchlistProperties.Provider",
                    Target::Presence(properties.map_or(false, |p| p.provider.is_some())),
                    Rule::NotNull,
                ),
                Constraint::new(
                    "watchlist.WatchlistProperties.ItemsSearchKey",
                    Target::Presence(properties.map_or(false, |p| p.items_search_key.is_some())),
                    Rule::NotNull,
                ),
            ]),
        ));
        validate(&constraints).map_err(|err| op.validation(err))?;

        let request = self
            .base
            .prepare(
                Method::PUT,
                WATCHLIST_PATH,
                &[
                    ("resourceGroupName", resource_group_name),
                    ("subscriptionId", self.base.subscription_id.as_str()),
                    ("watchlistAlias", watchlist_alias),
                    ("workspaceName", workspace_name),
                ],
                &[("api-version", API_VERSION)],
                Some(watchlist),
            )
            .map_err(|err| op.prepare(err))?;
        let response = self.base.send(request).await.map_err(|err| op.send(err))?;
        decode(op, &response, &[200, 201])
    }

    pub async fn delete(
        &self,
        resource_group_name: &str,
        workspace_name: &str,
        watchlist_alias: &str,
    ) -> ApiResult<()> {
        let op = Operation::new(CLIENT, "Delete");
        validate(&self.scope_constraints(resource_group_name, workspace_name))
            .map_err(|err| op.validation(err))?;

        let request = self
            .base
            .prepare::<()>(
                Method::DELETE,
                WATCHLIST_PATH,
                &[
                    ("resourceGroupName", resource_group_name),
                    ("subscriptionId", self.base.subscription_id.as_str()),
                    ("watchlistAlias", watchlist_alias),
                    ("workspaceName", workspace_name),
                ],
                &[("api-version", API_VERSION)],
                None,
            )
            .map_err(|err| op.prepare(err))?;
        let response = self.base.send(request).await.map_err(|err| op.send(err))?;
        check_status(op, &response, &[200, 204])
    }

    pub async fn get(
        &self,
        resource_group_name: &str,
        workspace_name: &str,
        watchlist_alias: &str,
    ) -> ApiResult<Watchlist> {
        let op = Operation::new(CLIENT, "Get");
        validate(&self.scope_constraints(resource_group_name, workspace_name))
            .map_err(|err| op.validation(err))?;

        let request = self
            .base
            .prepare::<()>(
                Method::GET,
                WATCHLIST_PATH,
                &[
                    ("resourceGroupName", resource_group_name),
                    ("subscriptionId", self.base.subscription_id.as_str()),
                    ("watchlistAlias", watchlist_alias),
                    ("workspaceName", workspace_name),
                ],
                &[("api-version", API_VERSION)],
                None,
            )
            .map_err(|err| op.prepare(err))?;
        let response = self.base.send(request).await.map_err(|err| op.send(err))?;
        decode(op, &response, &[200])
    }

    /// First page of the watchlists of a workspace.
    ///
    /// `skip_token` is forwarded as `$skipToken` when non-empty.
    pub async fn list(
        &self,
        resource_group_name: &str,
        workspace_name: &str,
        skip_token: &str,
    ) -> ApiResult<WatchlistList> {
        let op = Operation::new(CLIENT, "List");
        validate(&self.scope_constraints(resource_group_name, workspace_name))
            .map_err(|err| op.validation(err))?;

        let mut query = vec![("api-version", API_VERSION)];
        if !skip_token.is_empty() {
            query.push(("$skipToken", skip_token));
        }
        let request = self
            .base
            .prepare::<()>(
                Method::GET,
                COLLECTION_PATH,
                &[
                    ("resourceGroupName", resource_group_name),
                    ("subscriptionId", self.base.subscription_id.as_str()),
                    ("workspaceName", workspace_name),
                ],
                &query,
                None,
            )
            .map_err(|err| op.prepare(err))?;
        let response = self.base.send(request).await.map_err(|err| op.send(err))?;
        decode(op, &response, &[200])
    }

    /// Page following `page`, or `None` on the last page
    pub async fn list_next(&self, page: &WatchlistList) -> ApiResult<Option<WatchlistList>> {
        match page.next_link() {
            Some(link) => self.fetch_page(link).await.map(Some),
            None => Ok(None),
        }
    }

    async fn fetch_page(&self, link: &str) -> ApiResult<WatchlistList> {
        let op = Operation::new(CLIENT, "listNextResults");
        let request = self
            .base
            .prepare_link(link)
            .map_err(|err| op.prepare(err))?;
        let response = self.base.send(request).await.map_err(|err| op.send(err))?;
        decode(op, &response, &[200])
    }

    /// All the watchlists of a workspace, crossing page boundaries as required
    pub fn list_complete<'a>(
        &'a self,
        resource_group_name: &'a str,
        workspace_name: &'a str,
        skip_token: &'a str,
    ) -> impl Stream<Item = ApiResult<Watchlist>> + 'a {
        stream::try_unfold(Cursor::Start, move |cursor| async move {
            let page = match cursor {
                Cursor::Start => {
                    self.list(resource_group_name, workspace_name, skip_token)
                        .await?
                }
                Cursor::Next(link) => self.fetch_page(&link).await?,
                Cursor::Done => return Ok(None),
            };
            let next = match page.next_link() {
                Some(link) => Cursor::Next(link.to_owned()),
                None => Cursor::Done,
            };
            let items = stream::iter(page.value.into_iter().map(Ok::<_, ApiError>));
            Ok::<_, ApiError>(Some((items, next)))
        })
        .try_flatten()
    }
}
