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

//! AWS Lambda client.
//!
//! ```no_run
//! use bytes::Bytes;
//! use reqapi_aws_v4::EnvCredentialProvider;
//! use reqapi_core::{Context, OsEnv};
//! use reqapi_lambda::model::LogType;
//! use reqapi_lambda::operation::InvokeInput;
//! use reqapi_lambda::Client;
//! use reqapi_protocol::Config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = Context::new().with_env(OsEnv);
//! let client = Client::new(ctx, &Config::new(), EnvCredentialProvider::new())?;
//!
//! let out = client
//!     .invoke(InvokeInput {
//!         function_name: "hello".to_string(),
//!         log_type: Some(LogType::Tail),
//!         payload: Bytes::from_static(br#"{"name":"world"}"#),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{}: {:?}", out.status_code, out.payload);
//! # Ok(())
//! # }
//! ```

mod client;
pub use client::Client;

mod error;
pub use error::CallResult;
pub use error::LambdaError;

pub mod model;
pub mod operation;
