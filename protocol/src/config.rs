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

use reqapi_core::{Context, Error, Result};
use std::time::Duration;

/// Env value of the region.
pub const AWS_REGION: &str = "AWS_REGION";
/// Env value of the region, read when [`AWS_REGION`] is not set.
pub const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
/// Env value of an endpoint used instead of the public one.
pub const AWS_ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";

/// Config shared by every service client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// `region` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_REGION`]
    /// - env value: [`AWS_DEFAULT_REGION`]
    pub region: Option<String>,
    /// `endpoint` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ENDPOINT_URL`]
    /// - default to the public endpoint of the service in `region`
    pub endpoint: Option<String>,
    /// Timeout of every call, unset means no timeout beyond what the
    /// transport enforces.
    pub timeout: Option<Duration>,
}

impl Config {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load the fields that are still unset from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let var = |key: &str| ctx.env_var(key).filter(|v| !v.is_empty());

        if self.region.is_none() {
            self.region = var(AWS_REGION).or_else(|| var(AWS_DEFAULT_REGION));
        }
        if self.endpoint.is_none() {
            self.endpoint = var(AWS_ENDPOINT_URL);
        }
        self
    }

    /// The region, which every client requires.
    pub fn region(&self) -> Result<&str> {
        match self.region.as_deref() {
            Some(region) if !region.is_empty() => Ok(region),
            _ => Err(Error::config_invalid(
                "region is required, set it in config or through AWS_REGION",
            )),
        }
    }
}
