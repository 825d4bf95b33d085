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

const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Keys from `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY`, plus
/// `AWS_SESSION_TOKEN` when set.
///
/// Empty variables count as unset. Having only one of the two keys means
/// there is no credential here.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Read keys from the env of the [`Context`].
    pub fn new() -> Self {
        Self
    }
}

fn non_empty(ctx: &Context, key: &str) -> Option<String> {
    ctx.env_var(key).filter(|v| !v.is_empty())
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Credential>> {
        let (Some(access_key_id), Some(secret_access_key)) = (
            non_empty(ctx, AWS_ACCESS_KEY_ID),
            non_empty(ctx, AWS_SECRET_ACCESS_KEY),
        ) else {
            return Ok(None);
        };

        Ok(Some(Credential {
            access_key_id,
            secret_access_key,
            session_token: non_empty(ctx, AWS_SESSION_TOKEN),
            expires_in: None,
        }))
    }
}
