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

use serde::{Deserialize, Serialize};
use tf_provider::{
    map,
    schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema},
    value::{Value, ValueList, ValueString},
    AttributePath, Diagnostics,
};

use crate::client::validation::{name_length, validate};
use crate::securityinsight::Watchlist;
use crate::utils::{WithSchema, WithValidate};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistState<'a> {
    #[serde(borrow = "'a")]
    pub resource_group_name: ValueString<'a>,
    pub workspace_name: ValueString<'a>,
    pub alias: ValueString<'a>,
    pub id: ValueString<'a>,
    pub watchlist_id: ValueString<'a>,
    pub display_name: ValueString<'a>,
    pub provider: ValueString<'a>,
    pub description: ValueString<'a>,
    pub items_search_key: ValueString<'a>,
    pub default_duration: ValueString<'a>,
    pub labels: ValueList<ValueString<'a>>,
}

fn owned(value: Option<String>) -> ValueString<'static> {
    value.map_or(Value::Null, |value| Value::Value(Cow::Owned(value)))
}

impl<'a> WatchlistState<'a> {
    /// Fill the computed attributes from a fetched watchlist
    pub(super) fn fill(&mut self, watchlist: Watchlist) {
        let properties = watchlist.properties.unwrap_or_default();

        self.id = owned(watchlist.id);
        self.watchlist_id = owned(properties.watchlist_id);
        self.display_name = owned(properties.display_name);
        self.provider = owned(properties.provider);
        self.description = owned(properties.description);
        self.items_search_key = owned(properties.items_search_key);
        self.default_duration = owned(properties.default_duration);
        self.labels = Value::Value(
            properties
                .labels
                .unwrap_or_default()
                .into_iter()
                .map(|label| Value::Value(Cow::Owned(label)))
                .collect(),
        );
    }
}

impl<'a> WithValidate for WatchlistState<'a> {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        for (attribute, target, value) in [
            (
                "resource_group_name",
                "resourceGroupName",
                &self.resource_group_name,
            ),
            ("workspace_name", "workspaceName", &self.workspace_name),
        ] {
            if let Value::Value(value) = value {
                if let Err(err) = validate(&name_length(target, value)) {
                    diags.error(
                        format!("Invalid `{attribute}`"),
                        err.to_string(),
                        attr_path.clone().attribute(attribute),
                    );
                }
            }
        }

        if let Value::Value(alias) = &self.alias {
            if alias.is_empty() {
                diags.error_short("`alias` must not be empty", attr_path.attribute("alias"));
            }
        }
    }
}

impl<'a> WithSchema for WatchlistState<'a> {
    fn schema() -> Schema {
        let input = |description: &str| Attribute {
            attr_type: AttributeType::String,
            description: Description::plain(description),
            constraint: AttributeConstraint::Required,
            ..Default::default()
        };
        let computed = |description: &str| Attribute {
            attr_type: AttributeType::String,
            description: Description::plain(description),
            constraint: AttributeConstraint::Computed,
            ..Default::default()
        };

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Reads a watchlist of a Sentinel workspace"),
                attributes: map! {
                    "resource_group_name" => input("Resource group of the log analytics workspace"),
                    "workspace_name" => input("Name of the log analytics workspace"),
                    "alias" => input("Alias of the watchlist"),
                    "id" => computed("Resource manager ID of the watchlist"),
                    "watchlist_id" => computed("Unique identifier of the watchlist"),
                    "display_name" => computed("Display name of the watchlist"),
                    "provider" => computed("Provider of the watchlist"),
                    "description" => computed("Description of the watchlist"),
                    "items_search_key" => computed("Column used to index and query the items"),
                    "default_duration" => computed("Default time-to-live of the items, as an ISO 8601 duration"),
                    "labels" => Attribute {
                        attr_type: AttributeType::List(AttributeType::String.into()),
                        description: Description::plain("Labels of the watchlist"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                },
                ..Default::default()
            },
        }
    }
}
