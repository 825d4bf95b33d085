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

//! Wire protocols shared by reqapi service clients.
//!
//! A service client is a thin layer of typed operations on top of a
//! [`Dispatcher`], which signs requests with SigV4, sends them through the
//! [`reqapi_core::Context`] and decodes responses with one of:
//!
//! - [`query`]: form encoded requests, XML responses
//! - [`rest`]: requests built from a URI template, plus the JSON target
//!   flavour used by services like SQS
//! - [`json`]: helpers for JSON response bodies and error payloads
//!
//! Failures surface as [`SdkError`], whose `Service` variant carries the
//! service's own error enum declared with [`service_error!`].

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod macros;

mod error;
pub use error::FromFault;
pub use error::SdkError;
pub use error::ServiceFault;
pub use error::UnknownVariant;

mod config;
pub use config::Config;
pub use config::AWS_DEFAULT_REGION;
pub use config::AWS_ENDPOINT_URL;
pub use config::AWS_REGION;

pub mod endpoint;
pub use endpoint::ServiceId;

pub mod json;
pub mod query;
pub mod rest;

mod dispatch;
pub use dispatch::Dispatcher;

mod callback;
pub use callback::CallHandle;
pub use callback::CallbackQueue;
pub use callback::SharedQueue;

mod client;
pub use client::ServiceClient;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
