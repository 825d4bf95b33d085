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

use crate::error::CallResult;
use crate::operation::*;
use reqapi_aws_v4::Credential;
use reqapi_core::{Context, ProvideCredential, Result};
use reqapi_protocol::rest::JsonTarget;
use reqapi_protocol::{
    CallbackQueue, Config, Dispatcher, ServiceClient, ServiceId, SharedQueue,
};
use std::time::Duration;

const SERVICE: ServiceId = ServiceId {
    endpoint_prefix: "sqs",
    signing_name: "sqs",
};

const TARGET: JsonTarget = JsonTarget::new("AmazonSQS");

/// Client of Amazon SQS.
///
/// Cloning is cheap, clones share the credential cache and the callback
/// queue.
#[derive(Clone, Debug)]
pub struct Client {
    dispatcher: Dispatcher,
    queue: SharedQueue,
}

impl Client {
    /// Create a client.
    ///
    /// Fields missing from `config` are loaded from the env of `ctx`.
    pub fn new(
        ctx: Context,
        config: &Config,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Result<Self> {
        let config = config.clone().from_env(&ctx);
        Ok(Self {
            dispatcher: Dispatcher::from_config(ctx, &config, SERVICE, provider)?,
            queue: SharedQueue::default(),
        })
    }

    /// Clone this client with a timeout applied to every call.
    ///
    /// Long polling `receive_message` calls need a timeout above their
    /// `wait_time_seconds`.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            dispatcher: self.dispatcher.clone().with_timeout(Some(timeout)),
            queue: self.queue.clone(),
        }
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        self.dispatcher.endpoint()
    }

    /// Shut the callback queue down once queued callbacks ran.
    ///
    /// The client stays usable, the next [`ServiceClient::spawn`] starts a
    /// new queue.
    pub async fn close(&self) {
        self.queue.close().await
    }

    /// Grant other accounts permission to act on a queue.
    pub async fn add_permission(&self, input: AddPermissionInput) -> CallResult<()> {
        self.dispatcher
            .call_json_empty(&TARGET, "AddPermission", &input)
            .await
    }

    /// Change how long a received message stays invisible.
    pub async fn change_message_visibility(
        &self,
        input: ChangeMessageVisibilityInput,
    ) -> CallResult<()> {
        self.dispatcher
            .call_json_empty(&TARGET, "ChangeMessageVisibility", &input)
            .await
    }

    /// Change the visibility of up to 10 messages.
    ///
    /// Entries can fail one by one, check [`ChangeMessageVisibilityBatchOutput::failed`].
    pub async fn change_message_visibility_batch(
        &self,
        input: ChangeMessageVisibilityBatchInput,
    ) -> CallResult<ChangeMessageVisibilityBatchOutput> {
        self.dispatcher
            .call_json(&TARGET, "ChangeMessageVisibilityBatch", &input)
            .await
    }

    /// Create a queue, or return the url of an identical existing one.
    pub async fn create_queue(&self, input: CreateQueueInput) -> CallResult<CreateQueueOutput> {
        self.dispatcher
            .call_json(&TARGET, "CreateQueue", &input)
            .await
    }

    /// Delete a received message.
    pub async fn delete_message(&self, input: DeleteMessageInput) -> CallResult<()> {
        self.dispatcher
            .call_json_empty(&TARGET, "DeleteMessage", &input)
            .await
    }

    /// Delete up to 10 received messages.
    pub async fn delete_message_batch(
        &self,
        input: DeleteMessageBatchInput,
    ) -> CallResult<DeleteMessageBatchOutput> {
        self.dispatcher
            .call_json(&TARGET, "DeleteMessageBatch", &input)
            .await
    }

    /// Delete a queue and its messages.
    pub async fn delete_queue(&self, input: DeleteQueueInput) -> CallResult<()> {
        self.dispatcher
            .call_json_empty(&TARGET, "DeleteQueue", &input)
            .await
    }

    /// Read attributes of a queue.
    pub async fn get_queue_attributes(
        &self,
        input: GetQueueAttributesInput,
    ) -> CallResult<GetQueueAttributesOutput> {
        self.dispatcher
            .call_json(&TARGET, "GetQueueAttributes", &input)
            .await
    }

    /// Look the url of a queue up by name.
    pub async fn get_queue_url(&self, input: GetQueueUrlInput) -> CallResult<GetQueueUrlOutput> {
        self.dispatcher
            .call_json(&TARGET, "GetQueueUrl", &input)
            .await
    }

    /// List queues whose redrive policy points to the given dead letter
    /// queue.
    pub async fn list_dead_letter_source_queues(
        &self,
        input: ListDeadLetterSourceQueuesInput,
    ) -> CallResult<ListDeadLetterSourceQueuesOutput> {
        self.dispatcher
            .call_json(&TARGET, "ListDeadLetterSourceQueues", &input)
            .await
    }

    /// List the tags of a queue.
    pub async fn list_queue_tags(&self, input: ListQueueTagsInput) -> CallResult<ListQueueTagsOutput> {
        self.dispatcher
            .call_json(&TARGET, "ListQueueTags", &input)
            .await
    }

    /// List queues, optionally only those starting with a prefix.
    pub async fn list_queues(&self, input: ListQueuesInput) -> CallResult<ListQueuesOutput> {
        self.dispatcher
            .call_json(&TARGET, "ListQueues", &input)
            .await
    }

    /// Delete every message of a queue.
    pub async fn purge_queue(&self, input: PurgeQueueInput) -> CallResult<()> {
        self.dispatcher
            .call_json_empty(&TARGET, "PurgeQueue", &input)
            .await
    }

    /// Receive up to 10 messages.
    pub async fn receive_message(
        &self,
        input: ReceiveMessageInput,
    ) -> CallResult<ReceiveMessageOutput> {
        self.dispatcher
            .call_json(&TARGET, "ReceiveMessage", &input)
            .await
    }

    /// Revoke a permission added by [`Client::add_permission`].
    pub async fn remove_permission(&self, input: RemovePermissionInput) -> CallResult<()> {
        self.dispatcher
            .call_json_empty(&TARGET, "RemovePermission", &input)
            .await
    }

    /// Send a message.
    pub async fn send_message(&self, input: SendMessageInput) -> CallResult<SendMessageOutput> {
        self.dispatcher
            .call_json(&TARGET, "SendMessage", &input)
            .await
    }

    /// Send up to 10 messages.
    pub async fn send_message_batch(
        &self,
        input: SendMessageBatchInput,
    ) -> CallResult<SendMessageBatchOutput> {
        self.dispatcher
            .call_json(&TARGET, "SendMessageBatch", &input)
            .await
    }

    /// Change attributes of a queue.
    pub async fn set_queue_attributes(&self, input: SetQueueAttributesInput) -> CallResult<()> {
        self.dispatcher
            .call_json_empty(&TARGET, "SetQueueAttributes", &input)
            .await
    }

    /// Add or overwrite tags of a queue.
    pub async fn tag_queue(&self, input: TagQueueInput) -> CallResult<()> {
        self.dispatcher
            .call_json_empty(&TARGET, "TagQueue", &input)
            .await
    }

    /// Remove tags from a queue.
    pub async fn untag_queue(&self, input: UntagQueueInput) -> CallResult<()> {
        self.dispatcher
            .call_json_empty(&TARGET, "UntagQueue", &input)
            .await
    }
}

impl ServiceClient for Client {
    fn callback_queue(&self) -> Result<CallbackQueue> {
        self.queue.get()
    }
}
