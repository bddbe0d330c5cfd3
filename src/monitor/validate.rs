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

use lazy_static::lazy_static;
use regex::Regex;
use tf_provider::{value::Value, AttributePath, Diagnostics};

use crate::resource_id::{EVENTHUB_AUTHORIZATION_RULE, LOG_ANALYTICS_WORKSPACE, STORAGE_ACCOUNT};
use crate::utils::{DisplayJoinable, WithValidate};

use super::expand::{check_logs, expand_logs};
use super::state::ResourceState;

const FORBIDDEN_NAME_CHARS: &[char] = &['<', '>', '*', '%', '&', ':', '\\', '?', '+', '/'];

lazy_static! {
    static ref EVENTHUB_NAME: Regex =
        Regex::new(r"^[a-zA-Z0-9]([-._a-zA-Z0-9]{0,48}[a-zA-Z0-9])?$").unwrap();
}

pub(super) fn validate_setting_name(name: &str) -> Result<(), String> {
    if name.contains(FORBIDDEN_NAME_CHARS) {
        Err(format!(
            "characters {} are not allowed in the name",
            FORBIDDEN_NAME_CHARS.iter().join_with(", ")
        ))
    } else {
        Ok(())
    }
}

pub(super) fn validate_eventhub_name(name: &str) -> Result<(), String> {
    if EVENTHUB_NAME.is_match(name) {
        Ok(())
    } else {
        Err(format!(
            "the event hub name {name:?} can contain only letters, numbers, periods, hyphens and underscores, must start and end with a letter or number, and must be between 1 and 50 characters long"
        ))
    }
}

impl<'a> WithValidate for ResourceState<'a> {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Value::Value(name) = &self.name {
            if let Err(detail) = validate_setting_name(name) {
                diags.error(
                    "Invalid diagnostic setting name",
                    detail,
                    attr_path.clone().attribute("name"),
                );
            }
        }

        if let Value::Value(name) = &self.eventhub_name {
            if let Err(detail) = validate_eventhub_name(name) {
                diags.error(
                    "Invalid event hub name",
                    detail,
                    attr_path.clone().attribute("eventhub_name"),
                );
            }
        }

        let ids = [
            (
                "eventhub_authorization_rule_id",
                &self.eventhub_authorization_rule_id,
                &EVENTHUB_AUTHORIZATION_RULE,
            ),
            (
                "log_analytics_workspace_id",
                &self.log_analytics_workspace_id,
                &LOG_ANALYTICS_WORKSPACE,
            ),
            (
                "storage_account_id",
                &self.storage_account_id,
                &STORAGE_ACCOUNT,
            ),
        ];
        for (attribute, value, template) in ids {
            if let Value::Value(id) = value {
                if let Err(err) = template.parse(id) {
                    diags.error(
                        format!("Invalid {} ID", template.kind),
                        err.to_string(),
                        attr_path.clone().attribute(attribute),
                    );
                }
            }
        }

        // Unknown rules are only checked once they are known, at apply time
        if let Value::Value(logs) = &self.log {
            if logs.iter().all(|log| !log.is_unknown()) {
                if let Err(detail) = check_logs(&expand_logs(&self.log)) {
                    diags.error_short(detail, attr_path.attribute("log"));
                }
            }
        }
    }
}
