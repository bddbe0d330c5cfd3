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

//! Conversion between the Terraform state and the API models.

use std::borrow::Cow;

use tf_provider::value::{Value, ValueString};

use crate::insights::{
    DiagnosticSettingId, SubscriptionDiagnosticSettings, SubscriptionDiagnosticSettingsResource,
    SubscriptionLogSettings,
};
use crate::resource_id::{
    ResourceIdError, EVENTHUB_AUTHORIZATION_RULE, LOG_ANALYTICS_WORKSPACE, STORAGE_ACCOUNT,
};
use crate::utils::known_str;

use super::format_setting_id;
use super::state::{LogSet, LogState, ResourceState};

pub(super) fn expand_logs(logs: &LogSet) -> Vec<SubscriptionLogSettings> {
    logs.iter()
        .flatten()
        .filter_map(|log| log.as_ref_option())
        .map(|log| {
            let mut setting = SubscriptionLogSettings {
                enabled: !matches!(log.enabled, Value::Value(false)),
                ..Default::default()
            };
            match known_str(&log.category) {
                Some(category) => setting.category = Some(category.to_owned()),
                None => setting.category_group = known_str(&log.category_group).map(str::to_owned),
            }
            setting
        })
        .collect()
}

pub(super) fn check_logs(logs: &[SubscriptionLogSettings]) -> Result<(), &'static str> {
    if logs.is_empty() {
        Err("At least one `log` block must be specified")
    } else if !logs.iter().any(|log| log.enabled) {
        Err("At least one `log` must be enabled")
    } else {
        Ok(())
    }
}

/// Reasons the configured state cannot be sent to the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ExpandError {
    Logs(&'static str),
    NoDestination,
}

impl std::fmt::Display for ExpandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpandError::Logs(detail) => f.write_str(detail),
            ExpandError::NoDestination => f.write_str(
                "Either a `eventhub_authorization_rule_id`, `log_analytics_workspace_id` or `storage_account_id` must be set",
            ),
        }
    }
}

pub(super) fn expand_properties(
    state: &ResourceState,
) -> Result<SubscriptionDiagnosticSettings, ExpandError> {
    let logs = expand_logs(&state.log);
    check_logs(&logs).map_err(ExpandError::Logs)?;

    let mut properties = SubscriptionDiagnosticSettings {
        logs: Some(logs),
        ..Default::default()
    };
    let mut destination = false;

    if let Some(rule_id) = known_str(&state.eventhub_authorization_rule_id) {
        properties.event_hub_authorization_rule_id = Some(rule_id.to_owned());
        properties.event_hub_name = known_str(&state.eventhub_name).map(str::to_owned);
        destination = true;
    }
    if let Some(workspace_id) = known_str(&state.log_analytics_workspace_id) {
        properties.workspace_id = Some(workspace_id.to_owned());
        destination = true;
    }
    if let Some(storage_id) = known_str(&state.storage_account_id) {
        properties.storage_account_id = Some(storage_id.to_owned());
        destination = true;
    }

    if destination {
        Ok(properties)
    } else {
        Err(ExpandError::NoDestination)
    }
}

fn owned(value: Option<String>) -> ValueString<'static> {
    match value {
        Some(value) if !value.is_empty() => Value::Value(Cow::Owned(value)),
        _ => Value::Null,
    }
}

/// Canonical form of a returned id, null when absent
fn canonical(
    value: Option<&str>,
    parse: impl FnOnce(&str) -> Result<String, ResourceIdError>,
) -> Result<ValueString<'static>, ResourceIdError> {
    match value.filter(|value| !value.is_empty()) {
        Some(value) => Ok(Value::Value(Cow::Owned(parse(value)?))),
        None => Ok(Value::Null),
    }
}

pub(super) fn flatten_setting(
    id: &DiagnosticSettingId,
    resource: SubscriptionDiagnosticSettingsResource,
) -> Result<ResourceState<'static>, ResourceIdError> {
    let properties = resource.properties.unwrap_or_default();

    let log = properties
        .logs
        .unwrap_or_default()
        .into_iter()
        .map(|log| {
            Value::Value(LogState {
                category: owned(log.category),
                category_group: owned(log.category_group),
                enabled: Value::Value(log.enabled),
            })
        })
        .collect();

    Ok(ResourceState {
        id: Value::Value(Cow::Owned(format_setting_id(id))),
        name: Value::Value(Cow::Owned(id.name.clone())),
        target_subscription_id: Value::Value(Cow::Owned(id.subscription_id.clone())),
        eventhub_name: owned(properties.event_hub_name),
        eventhub_authorization_rule_id: canonical(
            properties.event_hub_authorization_rule_id.as_deref(),
            |value| Ok(EVENTHUB_AUTHORIZATION_RULE.parse_insensitively(value)?.id()),
        )?,
        log_analytics_workspace_id: canonical(properties.workspace_id.as_deref(), |value| {
            Ok(LOG_ANALYTICS_WORKSPACE.parse_insensitively(value)?.id())
        })?,
        storage_account_id: canonical(properties.storage_account_id.as_deref(), |value| {
            Ok(STORAGE_ACCOUNT.parse_insensitively(value)?.id())
        })?,
        log: Value::Value(log),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    const RULE_ID: &str = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.EventHub/namespaces/ns/authorizationRules/RootManageSharedAccessKey";
    const WORKSPACE_ID: &str =
        "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.OperationalInsights/workspaces/ws";

    fn log(
        category: Option<&'static str>,
        group: Option<&'static str>,
        enabled: Value<bool>,
    ) -> Value<LogState<'static>> {
        let string = |value: Option<&'static str>| {
            value.map_or(Value::Null, |v| Value::Value(Cow::Borrowed(v)))
        };
        Value::Value(LogState {
            category: string(category),
            category_group: string(group),
            enabled,
        })
    }

    fn logs(items: impl IntoIterator<Item = Value<LogState<'static>>>) -> LogSet<'static> {
        Value::Value(items.into_iter().collect::<BTreeSet<_>>())
    }

    #[test]
    fn category_takes_precedence_over_group() {
        let expanded = expand_logs(&logs([
            log(Some("Administrative"), Some("allLogs"), Value::Value(true)),
            log(Some(""), Some("audit"), Value::Null),
            log(None, Some("allLogs"), Value::Value(false)),
        ]));

        assert_eq!(expanded.len(), 3);
        assert!(expanded.contains(&SubscriptionLogSettings {
            category: Some("Administrative".into()),
            category_group: None,
            enabled: true,
        }));
        assert!(expanded.contains(&SubscriptionLogSettings {
            category: None,
            category_group: Some("audit".into()),
            enabled: true,
        }));
        assert!(expanded.contains(&SubscriptionLogSettings {
            category: None,
            category_group: Some("allLogs".into()),
            enabled: false,
        }));
    }

    #[test]
    fn log_rules_are_checked() {
        assert_eq!(
            check_logs(&[]),
            Err("At least one `log` block must be specified")
        );

        let disabled = expand_logs(&logs([log(Some("Security"), None, Value::Value(false))]));
        assert_eq!(
            check_logs(&disabled),
            Err("At least one `log` must be enabled")
        );

        let enabled = expand_logs(&logs([
            log(Some("Security"), None, Value::Value(false)),
            log(Some("Policy"), None, Value::Value(true)),
        ]));
        assert_eq!(check_logs(&enabled), Ok(()));
    }

    fn config() -> ResourceState<'static> {
        ResourceState {
            name: Value::Value(Cow::Borrowed("ds")),
            target_subscription_id: Value::Value(Cow::Borrowed("sub")),
            log: logs([log(Some("Administrative"), None, Value::Value(true))]),
            ..Default::default()
        }
    }

    #[test]
    fn destination_is_required() {
        assert_eq!(
            expand_properties(&config()),
            Err(ExpandError::NoDestination)
        );
        assert_eq!(
            ExpandError::NoDestination.to_string(),
            "Either a `eventhub_authorization_rule_id`, `log_analytics_workspace_id` or `storage_account_id` must be set"
        );

        // An event hub name alone is not a destination
        let state = ResourceState {
            eventhub_name: Value::Value(Cow::Borrowed("hub")),
            ..config()
        };
        assert_eq!(expand_properties(&state), Err(ExpandError::NoDestination));
    }

    #[test]
    fn event_hub_fields_follow_the_rule() {
        let state = ResourceState {
            eventhub_name: Value::Value(Cow::Borrowed("hub")),
            eventhub_authorization_rule_id: Value::Value(Cow::Borrowed(RULE_ID)),
            log_analytics_workspace_id: Value::Value(Cow::Borrowed(WORKSPACE_ID)),
            ..config()
        };
        let properties = expand_properties(&state).unwrap();
        assert_eq!(
            properties.event_hub_authorization_rule_id.as_deref(),
            Some(RULE_ID)
        );
        assert_eq!(properties.event_hub_name.as_deref(), Some("hub"));
        assert_eq!(properties.workspace_id.as_deref(), Some(WORKSPACE_ID));
        assert_eq!(properties.storage_account_id, None);
        assert_eq!(properties.logs.map(|logs| logs.len()), Some(1));
    }

    #[test]
    fn empty_logs_are_rejected_first() {
        let state = ResourceState {
            log: Value::Value(Default::default()),
            log_analytics_workspace_id: Value::Value(Cow::Borrowed(WORKSPACE_ID)),
            ..config()
        };
        assert_eq!(
            expand_properties(&state),
            Err(ExpandError::Logs(
                "At least one `log` block must be specified"
            ))
        );
    }

    #[test]
    fn flatten_canonicalizes_ids() {
        let id = DiagnosticSettingId::new("sub", "ds");
        let resource = SubscriptionDiagnosticSettingsResource {
            properties: Some(SubscriptionDiagnosticSettings {
                event_hub_authorization_rule_id: Some(
                    RULE_ID
                        .replace("resourceGroups", "resourcegroups")
                        .replace("authorizationRules", "authorizationrules"),
                ),
                event_hub_name: Some("hub".into()),
                workspace_id: Some(WORKSPACE_ID.to_lowercase()),
                logs: Some(vec![SubscriptionLogSettings {
                    category: Some("Administrative".into()),
                    category_group: None,
                    enabled: true,
                }]),
                ..Default::default()
            }),
            ..Default::default()
        };

        let state = flatten_setting(&id, resource).unwrap();
        assert_eq!(state.id.as_str(), "sub|ds");
        assert_eq!(state.name.as_str(), "ds");
        assert_eq!(state.target_subscription_id.as_str(), "sub");
        assert_eq!(state.eventhub_name.as_str(), "hub");
        assert_eq!(state.eventhub_authorization_rule_id.as_str(), RULE_ID);
        assert_eq!(
            state.log_analytics_workspace_id.as_str(),
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.OperationalInsights/workspaces/ws"
        );
        assert!(state.storage_account_id.is_null());
        assert_eq!(
            state.log,
            logs([log(Some("Administrative"), None, Value::Value(true))])
        );
    }

    #[test]
    fn flatten_rejects_foreign_ids() {
        let id = DiagnosticSettingId::new("sub", "ds");
        let resource = SubscriptionDiagnosticSettingsResource {
            properties: Some(SubscriptionDiagnosticSettings {
                storage_account_id: Some(WORKSPACE_ID.into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(flatten_setting(&id, resource).is_err());
    }
}
