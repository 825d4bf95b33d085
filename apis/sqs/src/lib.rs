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

//! Amazon SQS client.
//!
//! Calls speak the JSON protocol: a `POST /` naming the operation in the
//! `X-Amz-Target` header.
//!
//! ```no_run
//! use reqapi_aws_v4::EnvCredentialProvider;
//! use reqapi_core::{Context, OsEnv};
//! use reqapi_protocol::Config;
//! use reqapi_sqs::operation::{GetQueueUrlInput, SendMessageInput};
//! use reqapi_sqs::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = Context::new().with_env(OsEnv);
//! let client = Client::new(ctx, &Config::new(), EnvCredentialProvider::new())?;
//!
//! let queue = client
//!     .get_queue_url(GetQueueUrlInput {
//!         queue_name: "jobs".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! let sent = client
//!     .send_message(SendMessageInput {
//!         queue_url: queue.queue_url.unwrap_or_default(),
//!         message_body: "hello".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("sent {:?}", sent.message_id);
//! # Ok(())
//! # }
//! ```

mod client;
pub use client::Client;

mod error;
pub use error::CallResult;
pub use error::SqsError;

pub mod model;
pub mod operation;
