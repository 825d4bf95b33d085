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
use reqapi_core::{Context, ProvideCredential, Result};

mod chain;
pub use chain::ProvideCredentialChain;

mod env;
pub use env::EnvCredentialProvider;

/// Keys handed over by the caller, returned as they are on every call.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider(Credential);

impl StaticCredentialProvider {
    /// Use a long-term access key pair.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self(Credential {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
            expires_in: None,
        })
    }

    /// Attach the session token of temporary keys.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.0.session_token = Some(token.into());
        self
    }
}

impl From<Credential> for StaticCredentialProvider {
    fn from(cred: Credential) -> Self {
        Self(cred)
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Credential>> {
        Ok(Some(self.0.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_static_keys() -> anyhow::Result<()> {
        let provider = StaticCredentialProvider::new("AKIDEXAMPLE", "wJalrXUtnFEMI")
            .with_session_token("IQoJb3JpZ2luX2Vj");

        let cred = provider
            .provide_credential(&Context::new())
            .await?
            .expect("static keys are always there");
        assert_eq!(cred.access_key_id, "AKIDEXAMPLE");
        assert_eq!(cred.secret_access_key, "wJalrXUtnFEMI");
        assert_eq!(cred.session_token.as_deref(), Some("IQoJb3JpZ2luX2Vj"));
        Ok(())
    }
}
