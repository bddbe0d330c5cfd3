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

//! Terraform provider for Azure subscription diagnostic settings and
//! Sentinel watchlists.

mod azure_provider;
pub mod client;
mod clients;
pub mod insights;
pub mod monitor;
pub mod resource_id;
pub mod securityinsight;
pub mod sentinel;
mod utils;

pub use azure_provider::{AzureProvider, ProviderConfig};
pub use clients::{AzureClients, ClientHandle};
