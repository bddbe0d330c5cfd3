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

use std::fmt;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::validation::{validate, Constraint, Rule, Target};
use crate::client::{check_status, decode, ApiResult, BaseClient, Operation, Transport};

pub const API_VERSION: &str = "2021-05-01-preview";

const CLIENT: &str = "subscriptiondiagnosticsettings.SubscriptionDiagnosticSettingsClient";
const SETTING_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.Insights/diagnosticSettings/{name}";
const COLLECTION_PATH: &str =
    "/subscriptions/{subscriptionId}/providers/Microsoft.Insights/diagnosticSettings";

/// Identifies a diagnostic setting attached to a subscription
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiagnosticSettingId {
    pub subscription_id: String,
    pub name: String,
}

impl DiagnosticSettingId {
    pub fn new(subscription_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            name: name.into(),
        }
    }

    /// Resource manager id of the setting
    pub fn id(&self) -> String {
        format!(
            "/subscriptions/{}/providers/Microsoft.Insights/diagnosticSettings/{}",
            self.subscription_id, self.name
        )
    }
}

impl fmt::Display for DiagnosticSettingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Diagnostic Setting (Subscription: {:?} / Diagnostic Setting Name: {:?})",
            self.subscription_id, self.name
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDiagnosticSettingsResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<SubscriptionDiagnosticSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDiagnosticSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_bus_rule_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_hub_authorization_rule_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_hub_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<SubscriptionLogSettings>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketplace_partner_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionLogSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_group: Option<String>,
    pub enabled: bool,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsList {
    #[serde(default)]
    value: Vec<SubscriptionDiagnosticSettingsResource>,
}

#[derive(Debug, Clone)]
pub struct SubscriptionDiagnosticSettingsClient<T> {
    base: BaseClient<T>,
}

impl<T: Transport> SubscriptionDiagnosticSettingsClient<T> {
    pub fn new(base: BaseClient<T>) -> Self {
        Self { base }
    }

    fn check_id(operation: Operation, id: &DiagnosticSettingId) -> ApiResult<()> {
        validate(&[
            Constraint::new(
                "id.SubscriptionId",
                Target::Str(&id.subscription_id),
                Rule::MinLength(1),
            ),
            Constraint::new("id.Name", Target::Str(&id.name), Rule::MinLength(1)),
        ])
        .map_err(|err| operation.validation(err))
    }

    pub async fn get(
        &self,
        id: &DiagnosticSettingId,
    ) -> ApiResult<SubscriptionDiagnosticSettingsResource> {
        let op = Operation::new(CLIENT, "Get");
        Self::check_id(op, id)?;

        let request = self
            .base
            .prepare::<()>(
                Method::GET,
                SETTING_PATH,
                &[
                    ("subscriptionId", id.subscription_id.as_str()),
                    ("name", id.name.as_str()),
                ],
                &[("api-version", API_VERSION)],
                None,
            )
            .map_err(|err| op.prepare(err))?;
        let response = self.base.send(request).await.map_err(|err| op.send(err))?;
        decode(op, &response, &[200])
    }

    pub async fn create_or_update(
        &self,
        id: &DiagnosticSettingId,
        parameters: &SubscriptionDiagnosticSettingsResource,
    ) -> ApiResult<SubscriptionDiagnosticSettingsResource> {
        let op = Operation::new(CLIENT, "CreateOrUpdate");
        Self::check_id(op, id)?;

        let request = self
            .base
            .prepare(
                Method::PUT,
                SETTING_PATH,
                &[
                    ("subscriptionId", id.subscription_id.as_str()),
                    ("name", id.name.as_str()),
                ],
                &[("api-version", API_VERSION)],
                Some(parameters),
            )
            .map_err(|err| op.prepare(err))?;
        let response = self.base.send(request).await.map_err(|err| op.send(err))?;
        decode(op, &response, &[200])
    }

    pub async fn delete(&self, id: &DiagnosticSettingId) -> ApiResult<()> {
        let op = Operation::new(CLIENT, "Delete");
        Self::check_id(op, id)?;

        let request = self
            .base
            .prepare::<()>(
                Method::DELETE,
                SETTING_PATH,
                &[
                    ("subscriptionId", id.subscription_id.as_str()),
                    ("name", id.name.as_str()),
                ],
                &[("api-version", API_VERSION)],
                None,
            )
            .map_err(|err| op.prepare(err))?;
        let response = self.base.send(request).await.map_err(|err| op.send(err))?;
        check_status(op, &response, &[200, 204])
    }

    pub async fn list(
        &self,
        subscription_id: &str,
    ) -> ApiResult<Vec<SubscriptionDiagnosticSettingsResource>> {
        let op = Operation::new(CLIENT, "List");
        validate(&[Constraint::new(
            "subscriptionId",
            Target::Str(subscription_id),
            Rule::MinLength(1),
        )])
        .map_err(|err| op.validation(err))?;

        let request = self
            .base
            .prepare::<()>(
                Method::GET,
                COLLECTION_PATH,
                &[("subscriptionId", subscription_id)],
                &[("api-version", API_VERSION)],
                None,
            )
            .map_err(|err| op.prepare(err))?;
        let response = self.base.send(request).await.map_err(|err| op.send(err))?;
        let list: SettingsList = decode(op, &response, &[200])?;
        Ok(list.value)
    }
}
