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

use crate::{Error, Result};
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// Context is what a client needs from the outside world: a way to send
/// HTTP requests and a way to read env.
///
/// A fresh context has neither. Sending through it fails with a
/// `ConfigInvalid` error and every env lookup misses, so tests only need
/// to configure the parts they touch.
///
/// ```
/// use reqapi_core::{Context, OsEnv};
///
/// let ctx = Context::new().with_env(OsEnv);
/// assert_eq!(ctx.env_var("REQAPI_SURELY_UNSET"), None);
/// ```
#[derive(Clone, Debug)]
pub struct Context {
    http: Arc<dyn HttpSend>,
    env: Arc<dyn Env>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a context without transport and env.
    pub fn new() -> Self {
        Self {
            http: Arc::new(Unconfigured),
            env: Arc::new(Unconfigured),
        }
    }

    /// Send requests through `http`.
    pub fn with_http_send(mut self, http: impl HttpSend) -> Self {
        self.http = Arc::new(http);
        self
    }

    /// Read env from `env`.
    pub fn with_env(mut self, env: impl Env) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Send a request and collect the response.
    #[inline]
    pub async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.http.http_send(req).await
    }

    /// Look up one env var. Unset and non utf-8 values are both `None`.
    #[inline]
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.var(key)
    }

    /// Every env var visible to this context.
    #[inline]
    pub fn env_vars(&self) -> HashMap<String, String> {
        self.env.vars()
    }
}

/// HttpSend is used to send the signed requests of a client.
///
/// Implementations own the connection pool; one instance is shared by every
/// call a client makes.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send http request and return the response.
    ///
    /// A [`RequestTimeout`] found in the request extensions should be honored.
    /// Failures to reach the service should be `ErrorKind::Transport`.
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>>;
}

/// Per-request timeout carried in `http::Request` extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeout(pub Duration);

/// Env is where region, endpoint and credentials are looked up.
pub trait Env: Debug + Send + Sync + 'static {
    /// Get one variable, `None` if unset or not valid utf-8.
    fn var(&self, key: &str) -> Option<String>;

    /// Get every variable.
    fn vars(&self) -> HashMap<String, String>;
}

/// Env of the running process.
#[derive(Debug, Copy, Clone)]
pub struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key)?.into_string().ok()
    }

    fn vars(&self) -> HashMap<String, String> {
        std::env::vars().collect()
    }
}

/// A fixed set of variables, mostly for tests.
///
/// ```
/// use reqapi_core::{Context, StaticEnv};
///
/// let ctx = Context::new().with_env(StaticEnv::from_iter([("AWS_REGION", "eu-west-1")]));
/// assert_eq!(ctx.env_var("AWS_REGION").as_deref(), Some("eu-west-1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    /// The variables.
    pub envs: HashMap<String, String>,
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            envs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Env for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.envs.get(key).cloned()
    }

    fn vars(&self) -> HashMap<String, String> {
        self.envs.clone()
    }
}

/// Stands in for whatever a [`Context`] wasn't given.
#[derive(Debug, Clone, Copy)]
struct Unconfigured;

#[async_trait::async_trait]
impl HttpSend for Unconfigured {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(Error::config_invalid(format!(
            "no http client configured, can't send {} {}",
            req.method(),
            req.uri()
        )))
    }
}

impl Env for Unconfigured {
    fn var(&self, _: &str) -> Option<String> {
        None
    }

    fn vars(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}
