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

use async_trait::async_trait;
use bytes::Bytes;
use reqapi_core::{Context, Env, HttpSend, OsEnv, Result};
use reqapi_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;
use std::collections::HashMap;

/// Transport and env used when nothing else is configured: requests go
/// through a shared `reqwest` client and env is read from the process.
#[derive(Debug, Default, Clone)]
pub struct DefaultContext {
    http: ReqwestHttpSend,
}

impl DefaultContext {
    /// Create a context with a fresh `reqwest` client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context sending through `client`, to share its connection
    /// pool or settings such as proxies.
    pub fn with_client(client: Client) -> Self {
        Self {
            http: ReqwestHttpSend::new(client),
        }
    }
}

#[async_trait]
impl HttpSend for DefaultContext {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.http.http_send(req).await
    }
}

impl Env for DefaultContext {
    fn var(&self, key: &str) -> Option<String> {
        OsEnv.var(key)
    }

    fn vars(&self) -> HashMap<String, String> {
        OsEnv.vars()
    }
}

/// Build a [`Context`] on top of [`DefaultContext`].
pub fn default_context() -> Context {
    let ctx = DefaultContext::new();
    Context::new()
        .with_http_send(ctx.clone())
        .with_env(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_env_reads_process() {
        let ctx = default_context();
        assert_eq!(ctx.env_var("PATH"), std::env::var("PATH").ok());
        assert_eq!(ctx.env_var("REQAPI_SURELY_UNSET_VARIABLE"), None);
    }
}
