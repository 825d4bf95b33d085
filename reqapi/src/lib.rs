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

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use reqapi_core::*;
pub use reqapi_protocol::{
    CallHandle, CallbackQueue, Config, SdkError, ServiceClient, ServiceFault,
};

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::default_context;
#[cfg(feature = "default-context")]
pub use context::DefaultContext;

#[cfg(feature = "aws")]
pub mod aws {
    pub use reqapi_aws_v4::*;
}

#[cfg(feature = "cloudformation")]
pub mod cloudformation;

#[cfg(feature = "lambda")]
pub mod lambda;

#[cfg(feature = "sqs")]
pub mod sqs;
