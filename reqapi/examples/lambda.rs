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

use anyhow::Result;
use reqapi::lambda::model::{InvocationType, LogType};
use reqapi::lambda::operation::InvokeInput;
use reqapi::lambda::{Client, LambdaError};
use reqapi::{Config, SdkError};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let function_name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "hello".to_string());

    // Region and endpoint come from AWS_REGION and AWS_ENDPOINT_URL.
    let client: Client = reqapi::lambda::default_client(&Config::new())?;

    let res = client
        .invoke(InvokeInput {
            function_name,
            invocation_type: Some(InvocationType::RequestResponse),
            log_type: Some(LogType::Tail),
            payload: r#"{"name":"reqapi"}"#.into(),
            ..Default::default()
        })
        .await;

    match res {
        Ok(out) => {
            println!("status: {}", out.status_code);
            if let Some(err) = out.function_error {
                println!("function error: {err}");
            }
            println!("payload: {}", String::from_utf8_lossy(&out.payload));
        }
        Err(SdkError::Service {
            error: LambdaError::ResourceNotFound(fault),
            ..
        }) => println!("no such function: {fault}"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
