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

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout_at, Instant};

#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    #[error("timeout while waiting for state to become {target:?} (last state: {last_state:?}, timeout: {timeout:?})")]
    Timeout {
        last_state: String,
        target: &'static [&'static str],
        timeout: Duration,
    },
    #[error("unexpected state {state:?}, wanted target {target:?}")]
    Unexpected {
        state: String,
        target: &'static [&'static str],
    },
    #[error("error refreshing state: {0}")]
    Refresh(#[source] anyhow::Error),
}

/// Poll a refresh function until it reports one of the target states
#[derive(Debug, Clone)]
pub struct StateChangeConf {
    pub pending: &'static [&'static str],
    pub target: &'static [&'static str],
    /// Delay between two refreshes
    pub poll_interval: Duration,
    /// Number of consecutive refreshes that must report a target state
    pub continuous_target_occurence: usize,
    pub timeout: Duration,
}

impl StateChangeConf {
    pub async fn wait_for_state<F, Fut>(&self, mut refresh: F) -> Result<String, WaitError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<String>>,
    {
        let deadline = Instant::now() + self.timeout;
        let mut last_state = String::new();
        let mut occurences = 0;

        loop {
            let state = match timeout_at(deadline, refresh()).await {
                Ok(result) => result.map_err(WaitError::Refresh)?,
                Err(_) => break,
            };

            if self.target.contains(&state.as_str()) {
                occurences += 1;
                if occurences >= self.continuous_target_occurence.max(1) {
                    return Ok(state);
                }
            } else if self.pending.contains(&state.as_str()) {
                occurences = 0;
            } else {
                return Err(WaitError::Unexpected {
                    state,
                    target: self.target,
                });
            }
            last_state = state;

            if Instant::now() + self.poll_interval > deadline {
                break;
            }
            sleep(self.poll_interval).await;
        }

        Err(WaitError::Timeout {
            last_state,
            target: self.target,
            timeout: self.timeout,
        })
    }
}
