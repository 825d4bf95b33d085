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
use reqapi::sqs::operation::{
    CreateQueueInput, DeleteMessageInput, ReceiveMessageInput, SendMessageInput,
};
use reqapi::{Config, ServiceClient};
use std::time::Duration;
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let client = reqapi::sqs::default_client(&Config::new().with_timeout(Duration::from_secs(30)))?;

    let queue_url = client
        .create_queue(CreateQueueInput {
            queue_name: "reqapi-example".to_string(),
            ..Default::default()
        })
        .await?
        .queue_url
        .unwrap_or_default();

    // Send without awaiting, the result arrives on the client's callback queue.
    let (tx, rx) = oneshot::channel();
    let url = queue_url.clone();
    client.spawn(
        move |c| async move {
            c.send_message(SendMessageInput {
                queue_url: url,
                message_body: "hello from reqapi".to_string(),
                ..Default::default()
            })
            .await
        },
        move |res| {
            let _ = tx.send(res);
        },
    )?;
    let sent = rx.await??;
    println!("sent: {:?}", sent.message_id);

    let out = client
        .receive_message(ReceiveMessageInput {
            queue_url: queue_url.clone(),
            wait_time_seconds: Some(5),
            ..Default::default()
        })
        .await?;
    for msg in out.messages {
        println!("received: {:?}", msg.body);
        if let Some(receipt_handle) = msg.receipt_handle {
            client
                .delete_message(DeleteMessageInput {
                    queue_url: queue_url.clone(),
                    receipt_handle,
                })
                .await?;
        }
    }

    client.close().await;
    Ok(())
}
