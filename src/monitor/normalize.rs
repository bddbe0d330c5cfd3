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

use tf_provider::{value::Value, Diagnostics};

use crate::utils::WithNormalize;

use super::state::ResourceState;

impl<'a> WithNormalize for ResourceState<'a> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        if let Value::Value(logs) = &mut self.log {
            *logs = std::mem::take(logs)
                .into_iter()
                .map(|log| match log {
                    Value::Value(mut log) => {
                        if log.enabled.is_null() {
                            log.enabled = Value::Value(true);
                        }
                        Value::Value(log)
                    }
                    log => log,
                })
                .collect();
        }
    }
}
