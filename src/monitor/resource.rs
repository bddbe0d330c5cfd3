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

use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{timeout, timeout_at, Instant};

use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{schema::Schema, AttributePath, Diagnostics, Resource};

use crate::client::Transport;
use crate::clients::ClientHandle;
use crate::insights::{
    DiagnosticSettingId, SubscriptionDiagnosticSettingsClient,
    SubscriptionDiagnosticSettingsResource,
};
use crate::utils::{WithNormalize, WithSchema, WithValidate};

use super::expand::{expand_properties, flatten_setting, ExpandError};
use super::state::{ResourceState, FORCE_NEW};
use super::wait::StateChangeConf;
use super::{
    format_setting_id, parse_setting_id, CREATE_TIMEOUT, DELETE_TIMEOUT, READ_TIMEOUT,
    UPDATE_TIMEOUT,
};

const DELETE_POLL_INTERVAL: Duration = Duration::from_secs(15);
const DELETE_CONFIRMATIONS: usize = 5;

#[derive(Debug, Default)]
pub struct SubscriptionDiagnosticSettingResource<T> {
    clients: ClientHandle<T>,
}

impl<T: Transport> SubscriptionDiagnosticSettingResource<T> {
    pub fn new(clients: ClientHandle<T>) -> Self {
        Self { clients }
    }
}

fn timed_out(diags: &mut Diagnostics, action: &str, id: &DiagnosticSettingId, duration: Duration) {
    diags.root_error(
        format!("Timeout while {action} {id}"),
        format!(
            "The operation did not complete within {} minutes",
            duration.as_secs() / 60
        ),
    );
}

/// Current state of a setting, `Some(None)` when it does not exist anymore
async fn read_setting<T: Transport>(
    diags: &mut Diagnostics,
    client: &SubscriptionDiagnosticSettingsClient<T>,
    id: &DiagnosticSettingId,
) -> Option<Option<ResourceState<'static>>> {
    match client.get(id).await {
        Ok(resource) => match flatten_setting(id, resource) {
            Ok(state) => Some(Some(state)),
            Err(err) => {
                diags.root_error(format!("Failed to read {id}"), err.to_string());
                None
            }
        },
        Err(err) if err.was_not_found() => {
            log::warn!("{id} was not found - removing from state");
            Some(None)
        }
        Err(err) => {
            diags.root_error(format!("Failed to retrieve {id}"), err.to_string());
            None
        }
    }
}

async fn apply_setting<T: Transport>(
    diags: &mut Diagnostics,
    client: &SubscriptionDiagnosticSettingsClient<T>,
    id: &DiagnosticSettingId,
    planned: &ResourceState<'_>,
    is_new: bool,
) -> Option<ResourceState<'static>> {
    if is_new {
        match client.get(id).await {
            Ok(existing) if existing.id.as_deref().is_some_and(|id| !id.is_empty()) => {
                diags.root_error(
                    "Resource already exists",
                    format!(
                        "A resource with the ID {:?} already exists - to be managed via Terraform this resource needs to be imported into the State. Please see the resource documentation for \"azmonitor_subscription_diagnostic_setting\" for more information.",
                        format_setting_id(id)
                    ),
                );
                return None;
            }
            Ok(_) => (),
            Err(err) if err.was_not_found() => (),
            Err(err) => {
                diags.root_error(
                    format!("Failed to check for presence of existing {id}"),
                    err.to_string(),
                );
                return None;
            }
        }
    }

    let properties = match expand_properties(planned) {
        Ok(properties) => properties,
        Err(err @ ExpandError::Logs(_)) => {
            diags.error_short(err.to_string(), AttributePath::new("log"));
            return None;
        }
        Err(err) => {
            diags.root_error("Missing log destination", err.to_string());
            return None;
        }
    };
    let parameters = SubscriptionDiagnosticSettingsResource {
        properties: Some(properties),
        ..Default::default()
    };

    let action = if is_new { "create" } else { "update" };
    log::info!("{action} {id}");
    if let Err(err) = client.create_or_update(id, &parameters).await {
        diags.root_error(format!("Failed to {action} {id}"), err.to_string());
        return None;
    }

    match read_setting(diags, client, id).await? {
        Some(state) => Some(state),
        None => {
            diags.root_error(
                format!("Failed to {action} {id}"),
                "The diagnostic setting was not found after being written",
            );
            None
        }
    }
}

async fn delete_setting<T: Transport>(
    diags: &mut Diagnostics,
    client: &SubscriptionDiagnosticSettingsClient<T>,
    id: &DiagnosticSettingId,
) -> Option<()> {
    let deadline = Instant::now() + DELETE_TIMEOUT;

    log::info!("delete {id}");
    match timeout_at(deadline, client.delete(id)).await {
        Ok(Ok(())) => (),
        Ok(Err(err)) if err.was_not_found() => (),
        Ok(Err(err)) => {
            diags.root_error(format!("Failed to delete {id}"), err.to_string());
            return None;
        }
        Err(_) => {
            timed_out(diags, "deleting", id, DELETE_TIMEOUT);
            return None;
        }
    }

    // Deletion is eventually consistent: wait for several consecutive 404
    let conf = StateChangeConf {
        pending: &["Exists"],
        target: &["NotFound"],
        poll_interval: DELETE_POLL_INTERVAL,
        continuous_target_occurence: DELETE_CONFIRMATIONS,
        timeout: deadline.saturating_duration_since(Instant::now()),
    };
    let result = conf
        .wait_for_state(move || async move {
            match client.get(id).await {
                Ok(_) => Ok("Exists".to_owned()),
                Err(err) if err.was_not_found() => Ok("NotFound".to_owned()),
                Err(err) => Err(anyhow::Error::from(err)),
            }
        })
        .await;

    match result {
        Ok(_) => Some(()),
        Err(err) => {
            diags.root_error(
                format!("Failed waiting for {id} to be deleted"),
                err.to_string(),
            );
            None
        }
    }
}

fn planned_id(diags: &mut Diagnostics, state: &ResourceState) -> Option<DiagnosticSettingId> {
    match (
        state.target_subscription_id.as_deref_option(),
        state.name.as_deref_option(),
    ) {
        (Some(subscription_id), Some(name)) => {
            Some(DiagnosticSettingId::new(subscription_id, name))
        }
        _ => {
            diags.root_error(
                "Incomplete plan",
                "`name` and `target_subscription_id` must be known to apply the diagnostic setting",
            );
            None
        }
    }
}

fn state_id(diags: &mut Diagnostics, raw_id: &str) -> Option<DiagnosticSettingId> {
    match parse_setting_id(raw_id) {
        Ok(id) => Some(id),
        Err(detail) => {
            diags.error(
                "Invalid diagnostic setting ID",
                detail,
                AttributePath::new("id"),
            );
            None
        }
    }
}

#[async_trait]
impl<T: Transport> Resource for SubscriptionDiagnosticSettingResource<T> {
    type State<'a> = Value<ResourceState<'a>>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ResourceState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        if let Value::Value(config) = &config {
            config.validate(diags, Default::default());
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Some(raw_id) = state
            .as_ref_option()
            .map(|state| state.id.as_str().to_owned())
        else {
            return Some((state, private_state));
        };
        let id = state_id(diags, &raw_id)?;
        let clients = self.clients.get(diags).await?;

        let result = timeout(
            READ_TIMEOUT,
            read_setting(diags, &clients.diagnostic_settings, &id),
        )
        .await;
        match result {
            Ok(Some(Some(state))) => Some((Value::Value(state), private_state)),
            Ok(Some(None)) => Some((Value::Null, private_state)),
            Ok(None) => None,
            Err(_) => {
                timed_out(diags, "reading", &id, READ_TIMEOUT);
                None
            }
        }
    }

    async fn plan_create<'a>(
        &self,
        diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = match proposed_state {
            Value::Value(state) => state,
            other => return Some((other, Default::default())),
        };
        state.id = Value::Unknown;
        state.normalize(diags);

        Some((Value::Value(state), Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>, Vec<AttributePath>)> {
        let mut state = match proposed_state {
            Value::Value(state) => state,
            other => return Some((other, prior_private_state, Vec::new())),
        };
        state.normalize(diags);

        let trigger_replace = match &prior_state {
            Value::Value(prior) => FORCE_NEW
                .iter()
                .filter(|name| prior.attribute(name) != state.attribute(name))
                .map(|name| AttributePath::new(*name))
                .collect(),
            _ => Vec::new(),
        };

        Some((Value::Value(state), prior_private_state, trigger_replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Value::Value(mut planned) = planned_state else {
            diags.root_error(
                "Incomplete plan",
                "Cannot create a diagnostic setting from an empty plan",
            );
            return None;
        };
        planned.normalize(diags);
        let id = planned_id(diags, &planned)?;
        let clients = self.clients.get(diags).await?;

        let apply = apply_setting(diags, &clients.diagnostic_settings, &id, &planned, true);
        let result = timeout(CREATE_TIMEOUT, apply).await;
        match result {
            Ok(state) => Some((Value::Value(state?), private_state)),
            Err(_) => {
                timed_out(diags, "creating", &id, CREATE_TIMEOUT);
                None
            }
        }
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Value::Value(mut planned) = planned_state else {
            diags.root_error(
                "Incomplete plan",
                "Cannot update a diagnostic setting from an empty plan",
            );
            return None;
        };
        planned.normalize(diags);
        let id = planned_id(diags, &planned)?;
        let clients = self.clients.get(diags).await?;

        let apply = apply_setting(diags, &clients.diagnostic_settings, &id, &planned, false);
        let result = timeout(UPDATE_TIMEOUT, apply).await;
        match result {
            Ok(state) => Some((Value::Value(state?), private_state)),
            Err(_) => {
                timed_out(diags, "updating", &id, UPDATE_TIMEOUT);
                None
            }
        }
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let Value::Value(state) = state else {
            return Some(());
        };
        let id = state_id(diags, state.id.as_str())?;
        let clients = self.clients.get(diags).await?;

        delete_setting(diags, &clients.diagnostic_settings, &id).await
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let setting = match parse_setting_id(&id) {
            Ok(setting) => setting,
            Err(detail) => {
                diags.root_error("Invalid import ID", detail);
                return None;
            }
        };

        let state = ResourceState {
            id: Value::Value(Cow::Owned(id)),
            name: Value::Value(Cow::Owned(setting.name)),
            target_subscription_id: Value::Value(Cow::Owned(setting.subscription_id)),
            ..Default::default()
        };
        Some((Value::Value(state), Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use reqwest::Method;
    use serde_json::json;

    use crate::client::testing::{FakeTransport, TEST_BASE_URI, TEST_SUBSCRIPTION};
    use crate::client::Authorizer;
    use crate::clients::AzureClients;

    use super::super::state::LogState;
    use super::*;

    const WORKSPACE_ID: &str = "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg/providers/Microsoft.OperationalInsights/workspaces/ws";
    const SETTING_URL: &str = "https://management.example.com/subscriptions/00000000-0000-0000-0000-000000000000/providers/Microsoft.Insights/diagnosticSettings/ds1?api-version=2021-05-01-preview";

    fn resource() -> (
        SubscriptionDiagnosticSettingResource<FakeTransport>,
        Arc<FakeTransport>,
    ) {
        let transport = Arc::new(FakeTransport::default());
        let clients = AzureClients::new(
            TEST_BASE_URI,
            TEST_SUBSCRIPTION,
            transport.clone(),
            Arc::new(Authorizer::Token("test-token".to_owned())),
        );
        (
            SubscriptionDiagnosticSettingResource::new(ClientHandle::configured(clients)),
            transport,
        )
    }

    fn planned() -> ResourceState<'static> {
        ResourceState {
            id: Value::Unknown,
            name: Value::Value(Cow::Borrowed("ds1")),
            target_subscription_id: Value::Value(Cow::Borrowed(TEST_SUBSCRIPTION)),
            log_analytics_workspace_id: Value::Value(Cow::Borrowed(WORKSPACE_ID)),
            log: Value::Value(
                [Value::Value(LogState {
                    category: Value::Value(Cow::Borrowed("Administrative")),
                    category_group: Value::Null,
                    enabled: Value::Null,
                })]
                .into_iter()
                .collect::<BTreeSet<_>>(),
            ),
            ..Default::default()
        }
    }

    fn setting_json() -> serde_json::Value {
        json!({
            "id": "/subscriptions/00000000-0000-0000-0000-000000000000/providers/microsoft.insights/diagnosticSettings/ds1",
            "name": "ds1",
            "type": "Microsoft.Insights/diagnosticSettings",
            "properties": {
                "workspaceId": WORKSPACE_ID.to_lowercase(),
                "logs": [{"category": "Administrative", "enabled": true}]
            }
        })
    }

    fn not_found() -> serde_json::Value {
        json!({"error": {"code": "ResourceNotFound", "message": "The diagnostic setting doesn't exist."}})
    }

    #[tokio::test]
    async fn create_writes_then_reads_back() {
        let (resource, transport) = resource();
        transport.push(404, not_found());
        transport.push(200, setting_json());
        transport.push(200, setting_json());

        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .create(
                &mut diags,
                Value::Value(planned()),
                Value::Value(planned()),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());

        let state = state.as_ref_option().unwrap();
        assert_eq!(
            state.id.as_str(),
            "00000000-0000-0000-0000-000000000000|ds1"
        );
        assert_eq!(state.log_analytics_workspace_id.as_str(), WORKSPACE_ID);

        let requests = transport.requests();
        let methods = requests
            .iter()
            .map(|r| r.method.clone())
            .collect::<Vec<_>>();
        assert_eq!(methods, [Method::GET, Method::PUT, Method::GET]);
        assert!(requests.iter().all(|r| r.url.as_str() == SETTING_URL));

        let body: serde_json::Value =
            serde_json::from_slice(requests[1].body.as_ref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "properties": {
                    "workspaceId": WORKSPACE_ID,
                    "logs": [{"category": "Administrative", "enabled": true}]
                }
            })
        );
    }

    #[tokio::test]
    async fn create_refuses_existing_setting() {
        let (resource, transport) = resource();
        transport.push(200, setting_json());

        let mut diags = Diagnostics::default();
        let result = resource
            .create(
                &mut diags,
                Value::Value(planned()),
                Value::Value(planned()),
                Default::default(),
                Default::default(),
            )
            .await;
        assert!(result.is_none());
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(transport.pending(), 0);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn create_requires_a_destination() {
        let (resource, transport) = resource();
        transport.push(404, not_found());

        let mut diags = Diagnostics::default();
        let planned = ResourceState {
            log_analytics_workspace_id: Value::Null,
            ..planned()
        };
        let result = resource
            .create(
                &mut diags,
                Value::Value(planned.clone()),
                Value::Value(planned),
                Default::default(),
                Default::default(),
            )
            .await;
        assert!(result.is_none());
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn read_removes_missing_setting() {
        let (resource, transport) = resource();
        transport.push(404, not_found());

        let state = ResourceState {
            id: Value::Value(Cow::Borrowed("00000000-0000-0000-0000-000000000000|ds1")),
            ..planned()
        };
        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .read(
                &mut diags,
                Value::Value(state),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(state.is_null());
        assert!(diags.errors.is_empty());
    }

    #[tokio::test]
    async fn read_rejects_malformed_id() {
        let (resource, transport) = resource();

        let state = ResourceState {
            id: Value::Value(Cow::Borrowed("ds1")),
            ..planned()
        };
        let mut diags = Diagnostics::default();
        let result = resource
            .read(
                &mut diags,
                Value::Value(state),
                Default::default(),
                Default::default(),
            )
            .await;
        assert!(result.is_none());
        assert_eq!(diags.errors.len(), 1);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn destroy_waits_for_consistent_absence() {
        let (resource, transport) = resource();
        transport.push(200, serde_json::Value::Null);
        transport.push(200, setting_json());
        for _ in 0..DELETE_CONFIRMATIONS {
            transport.push(404, not_found());
        }

        let state = ResourceState {
            id: Value::Value(Cow::Borrowed("00000000-0000-0000-0000-000000000000|ds1")),
            ..planned()
        };
        let start = Instant::now();
        let mut diags = Diagnostics::default();
        let result = resource
            .destroy(
                &mut diags,
                Value::Value(state),
                Default::default(),
                Default::default(),
            )
            .await;

        assert_eq!(result, Some(()));
        assert!(diags.errors.is_empty());
        assert_eq!(transport.pending(), 0);
        assert_eq!(transport.requests()[0].method, Method::DELETE);
        assert_eq!(
            start.elapsed(),
            DELETE_POLL_INTERVAL * DELETE_CONFIRMATIONS as u32
        );
    }

    #[tokio::test]
    async fn update_does_not_check_existence() {
        let (resource, transport) = resource();
        transport.push(200, setting_json());
        transport.push(200, setting_json());

        let prior = ResourceState {
            id: Value::Value(Cow::Borrowed("00000000-0000-0000-0000-000000000000|ds1")),
            ..planned()
        };
        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .update(
                &mut diags,
                Value::Value(prior.clone()),
                Value::Value(prior.clone()),
                Value::Value(prior),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        assert_eq!(
            state.as_ref_option().unwrap().id.as_str(),
            "00000000-0000-0000-0000-000000000000|ds1"
        );

        let methods = transport
            .requests()
            .iter()
            .map(|r| r.method.clone())
            .collect::<Vec<_>>();
        assert_eq!(methods, [Method::PUT, Method::GET]);
        assert_eq!(transport.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn destroy_tolerates_missing_setting() {
        let (resource, transport) = resource();
        transport.push(404, not_found());
        for _ in 0..DELETE_CONFIRMATIONS {
            transport.push(404, not_found());
        }

        let state = ResourceState {
            id: Value::Value(Cow::Borrowed("00000000-0000-0000-0000-000000000000|ds1")),
            ..planned()
        };
        let mut diags = Diagnostics::default();
        let result = resource
            .destroy(
                &mut diags,
                Value::Value(state),
                Default::default(),
                Default::default(),
            )
            .await;

        assert_eq!(result, Some(()));
        assert!(diags.errors.is_empty());
        assert_eq!(transport.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn destroy_aborts_on_refresh_error() {
        let (resource, transport) = resource();
        transport.push(200, serde_json::Value::Null);
        transport.push(
            403,
            json!({"error": {"code": "AuthorizationFailed", "message": "The client does not have authorization."}}),
        );

        let state = ResourceState {
            id: Value::Value(Cow::Borrowed("00000000-0000-0000-0000-000000000000|ds1")),
            ..planned()
        };
        let mut diags = Diagnostics::default();
        let result = resource
            .destroy(
                &mut diags,
                Value::Value(state),
                Default::default(),
                Default::default(),
            )
            .await;

        assert_eq!(result, None);
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn plan_marks_force_new_changes() {
        let (resource, _) = resource();
        let prior = ResourceState {
            id: Value::Value(Cow::Borrowed("00000000-0000-0000-0000-000000000000|ds1")),
            ..planned()
        };
        let proposed = ResourceState {
            name: Value::Value(Cow::Borrowed("ds2")),
            log_analytics_workspace_id: Value::Null,
            storage_account_id: Value::Value(Cow::Borrowed(
                "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/sa",
            )),
            ..prior.clone()
        };

        let mut diags = Diagnostics::default();
        let (state, _, replace) = resource
            .plan_update(
                &mut diags,
                Value::Value(prior),
                Value::Value(proposed.clone()),
                Value::Value(proposed),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();

        // name and storage_account_id force a new setting, the workspace does not
        assert_eq!(replace.len(), 2);
        let state = state.as_ref_option().unwrap();
        assert!(state
            .log
            .iter()
            .flatten()
            .flat_map(|log| log.as_ref_option())
            .all(|log| log.enabled == Value::Value(true)));
    }

    #[tokio::test]
    async fn workspace_change_updates_in_place() {
        let (resource, _) = resource();
        let prior = ResourceState {
            id: Value::Value(Cow::Borrowed("00000000-0000-0000-0000-000000000000|ds1")),
            ..planned()
        };
        let proposed = ResourceState {
            log_analytics_workspace_id: Value::Value(Cow::Borrowed(
                "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg/providers/Microsoft.OperationalInsights/workspaces/other",
            )),
            ..prior.clone()
        };

        let mut diags = Diagnostics::default();
        let (_, _, replace) = resource
            .plan_update(
                &mut diags,
                Value::Value(prior),
                Value::Value(proposed.clone()),
                Value::Value(proposed),
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(replace.is_empty());
    }

    #[tokio::test]
    async fn plan_create_leaves_id_unknown() {
        let (resource, _) = resource();
        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .plan_create(
                &mut diags,
                Value::Value(ResourceState {
                    id: Value::Null,
                    ..planned()
                }),
                Value::Value(planned()),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(state.as_ref_option().unwrap().id.is_unknown());
    }

    #[tokio::test]
    async fn import_parses_id() {
        let (resource, _) = resource();
        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .import(&mut diags, "sub|ds1".to_owned())
            .await
            .unwrap();
        let state = state.as_ref_option().unwrap();
        assert_eq!(state.name.as_str(), "ds1");
        assert_eq!(state.target_subscription_id.as_str(), "sub");

        assert!(resource
            .import(&mut diags, "sub/ds1".to_owned())
            .await
            .is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn unconfigured_provider_is_reported() {
        let resource = SubscriptionDiagnosticSettingResource::<FakeTransport>::default();
        let state = ResourceState {
            id: Value::Value(Cow::Borrowed("sub|ds1")),
            ..planned()
        };
        let mut diags = Diagnostics::default();
        let result = resource
            .read(
                &mut diags,
                Value::Value(state),
                Default::default(),
                Default::default(),
            )
            .await;
        assert!(result.is_none());
        assert_eq!(diags.errors.len(), 1);
    }
}
