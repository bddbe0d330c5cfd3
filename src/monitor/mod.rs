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

use std::time::Duration;

use crate::insights::DiagnosticSettingId;

mod expand;
mod normalize;
mod resource;
mod state;
mod validate;
pub mod wait;

pub use resource::SubscriptionDiagnosticSettingResource;
pub use state::{LogState, ResourceState};

pub(crate) const CREATE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub(crate) const READ_TIMEOUT: Duration = Duration::from_secs(5 * 60);
pub(crate) const UPDATE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub(crate) const DELETE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Terraform id of a setting: `{subscriptionId}|{name}`
pub fn format_setting_id(id: &DiagnosticSettingId) -> String {
    format!("{}|{}", id.subscription_id, id.name)
}

/// Parse a Terraform id of the form `{subscriptionId}|{name}`
pub fn parse_setting_id(input: &str) -> Result<DiagnosticSettingId, String> {
    let segments = input.split('|').collect::<Vec<_>>();
    match segments.as_slice() {
        [subscription_id, name] => Ok(DiagnosticSettingId::new(*subscription_id, *name)),
        _ => Err(format!(
            "Expected the Monitor Subscription Diagnostics ID to be in the format `{{subscriptionId}}|{{name}}` but got {} segments",
            segments.len()
        )),
    }
}
