// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Lambda client.

pub use reqapi_lambda::*;

#[cfg(feature = "default-context")]
use crate::{aws::EnvCredentialProvider, default_context, Config, Result};

/// Create a Lambda client on the [`default_context`](crate::default_context),
/// reading credentials from `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY`.
#[cfg(feature = "default-context")]
pub fn default_client(config: &Config) -> Result<Client> {
    Client::new(default_context(), config, EnvCredentialProvider::new())
}
