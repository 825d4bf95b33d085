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

use crate::Credential;
use async_trait::async_trait;
use log::{debug, warn};
use reqapi_core::{Context, Error, ProvideCredential, Result};

type BoxedProvider = Box<dyn ProvideCredential<Credential = Credential>>;

/// Try providers in order until one of them has a credential.
///
/// A failing provider doesn't stop the chain. If no provider had a
/// credential, the first failure is returned so callers can tell "nothing
/// configured" apart from "configured but broken".
///
/// ```
/// use reqapi_aws_v4::{EnvCredentialProvider, ProvideCredentialChain, StaticCredentialProvider};
///
/// let chain = ProvideCredentialChain::new()
///     .push(EnvCredentialProvider::new())
///     .push(StaticCredentialProvider::new("AKIDEXAMPLE", "secret"));
/// ```
#[derive(Debug, Default)]
pub struct ProvideCredentialChain {
    providers: Vec<BoxedProvider>,
}

impl ProvideCredentialChain {
    /// An empty chain, which never has a credential.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `provider` to the end of the chain.
    pub fn push(mut self, provider: impl ProvideCredential<Credential = Credential>) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

#[async_trait]
impl ProvideCredential for ProvideCredentialChain {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Credential>> {
        let mut failure: Option<Error> = None;

        for provider in &self.providers {
            match provider.provide_credential(ctx).await {
                Ok(Some(cred)) => {
                    debug!("credential loaded by {provider:?}");
                    return Ok(Some(cred));
                }
                Ok(None) => debug!("{provider:?} has no credential"),
                Err(err) => {
                    warn!("{provider:?} failed to load credential: {err}");
                    failure.get_or_insert(err);
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }
}
