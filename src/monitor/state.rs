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

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tf_provider::schema::NestedBlock;
use tf_provider::{
    map,
    schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema},
    value::{Value, ValueString},
};

use crate::utils::WithSchema;

pub type LogSet<'a> = Value<BTreeSet<Value<LogState<'a>>>>;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub target_subscription_id: ValueString<'a>,
    pub eventhub_name: ValueString<'a>,
    pub eventhub_authorization_rule_id: ValueString<'a>,
    pub log_analytics_workspace_id: ValueString<'a>,
    pub storage_account_id: ValueString<'a>,
    pub log: LogSet<'a>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogState<'a> {
    pub category: ValueString<'a>,
    pub category_group: ValueString<'a>,
    pub enabled: Value<bool>,
}

/// Attributes whose change requires the setting to be recreated
pub(super) const FORCE_NEW: &[&str] = &[
    "name",
    "target_subscription_id",
    "eventhub_name",
    "eventhub_authorization_rule_id",
    "storage_account_id",
];

impl<'a> ResourceState<'a> {
    /// Value of a top level string attribute
    pub(super) fn attribute(&self, name: &str) -> Option<&ValueString<'a>> {
        Some(match name {
            "id" => &self.id,
            "name" => &self.name,
            "target_subscription_id" => &self.target_subscription_id,
            "eventhub_name" => &self.eventhub_name,
            "eventhub_authorization_rule_id" => &self.eventhub_authorization_rule_id,
            "log_analytics_workspace_id" => &self.log_analytics_workspace_id,
            "storage_account_id" => &self.storage_account_id,
            _ => return None,
        })
    }
}

impl<'a> WithSchema for ResourceState<'a> {
    fn schema() -> Schema {
        let string = |description: &str, constraint: AttributeConstraint| Attribute {
            attr_type: AttributeType::String,
            description: Description::plain(description),
            constraint,
            ..Default::default()
        };

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain(
                    "Manages a diagnostic setting routing the activity logs of a subscription",
                ),
                attributes: map! {
                    "id" => string(
                        "Identifier of the diagnostic setting, in the form `{subscriptionId}|{name}`",
                        AttributeConstraint::Computed,
                    ),
                    "name" => string(
                        "Name of the diagnostic setting. Changing this forces a new resource to be created",
                        AttributeConstraint::Required,
                    ),
                    "target_subscription_id" => string(
                        "ID of the subscription whose logs are routed. Changing this forces a new resource to be created",
                        AttributeConstraint::Required,
                    ),
                    "eventhub_name" => string(
                        "Name of the event hub receiving the logs. Changing this forces a new resource to be created",
                        AttributeConstraint::Optional,
                    ),
                    "eventhub_authorization_rule_id" => string(
                        "ID of the event hub namespace authorization rule used to send the logs. Changing this forces a new resource to be created",
                        AttributeConstraint::Optional,
                    ),
                    "log_analytics_workspace_id" => string(
                        "ID of the log analytics workspace receiving the logs",
                        AttributeConstraint::Optional,
                    ),
                    "storage_account_id" => string(
                        "ID of the storage account receiving the logs. Changing this forces a new resource to be created",
                        AttributeConstraint::Optional,
                    ),
                },
                blocks: map! {
                    "log" => NestedBlock::Set(Block {
                        description: Description::plain("Log category or category group to route"),
                        attributes: map! {
                            "category" => string(
                                "Log category, e.g. `Administrative` or `Security`",
                                AttributeConstraint::Optional,
                            ),
                            "category_group" => string(
                                "Log category group, e.g. `allLogs`",
                                AttributeConstraint::Optional,
                            ),
                            "enabled" => Attribute {
                                attr_type: AttributeType::Bool,
                                description: Description::plain("Whether the logs are routed. Defaults to `true`"),
                                constraint: AttributeConstraint::OptionalComputed,
                                ..Default::default()
                            },
                        },
                        ..Default::default()
                    }),
                },
                ..Default::default()
            },
        }
    }
}
