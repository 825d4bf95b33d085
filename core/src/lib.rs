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

//! Shared building blocks of the reqapi service clients.
//!
//! Every client is built from the same three pieces:
//!
//! - [`Context`] gives access to the outside world: an [`HttpSend`] to
//!   reach the service and an [`Env`] to look up configuration.
//! - [`ProvideCredential`] loads a credential and [`SignRequest`] applies
//!   it to an outgoing request.
//! - [`Signer`] ties both together for one service scope and caches the
//!   credential while it's valid.
//!
//! Failures of any piece are reported as [`Error`], classified by
//! [`ErrorKind`].
//!
//! ```no_run
//! use async_trait::async_trait;
//! use http::request::Parts;
//! use reqapi_core::{Context, ProvideCredential, Result, SignRequest, Signer, SigningCredential};
//! use std::time::Duration;
//!
//! #[derive(Clone, Debug)]
//! struct ApiKey(String);
//!
//! impl SigningCredential for ApiKey {
//!     fn is_valid(&self) -> bool {
//!         !self.0.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct FromEnv;
//!
//! #[async_trait]
//! impl ProvideCredential for FromEnv {
//!     type Credential = ApiKey;
//!
//!     async fn provide_credential(&self, ctx: &Context) -> Result<Option<ApiKey>> {
//!         Ok(ctx.env_var("MY_API_KEY").map(ApiKey))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct KeyHeader;
//!
//! #[async_trait]
//! impl SignRequest for KeyHeader {
//!     type Credential = ApiKey;
//!
//!     async fn sign_request(
//!         &self,
//!         _: &Context,
//!         req: &mut Parts,
//!         key: Option<&ApiKey>,
//!         _: Option<Duration>,
//!     ) -> Result<()> {
//!         if let Some(key) = key {
//!             req.headers.insert("x-api-key", key.0.parse()?);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(Context::new().with_env(reqapi_core::OsEnv), FromEnv, KeyHeader);
//!
//! let (mut parts, _) = http::Request::get("https://example.com").body(())?.into_parts();
//! signer.sign(&mut parts, None).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::HttpSend;
pub use context::OsEnv;
pub use context::RequestTimeout;
pub use context::StaticEnv;

mod error;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;
