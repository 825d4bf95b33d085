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
use reqapi_protocol::query::{ListStyle, QueryProtocol};
use reqapi_protocol::{
    CallbackQueue, Config, Dispatcher, ServiceClient, ServiceId, SharedQueue,
};
use std::time::Duration;

const SERVICE: ServiceId = ServiceId {
    endpoint_prefix: "cloudformation",
    signing_name: "cloudformation",
};

const PROTOCOL: QueryProtocol = QueryProtocol {
    version: "2010-05-15",
    list_style: ListStyle::Member,
};

/// Client of AWS CloudFormation.
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

    /// Cancel an update on the specified stack.
    pub async fn cancel_update_stack(&self, input: CancelUpdateStackInput) -> CallResult<()> {
        self.dispatcher
            .call_query_empty(&PROTOCOL, "CancelUpdateStack", &input)
            .await
    }

    /// Continue rolling back a stack in `UPDATE_ROLLBACK_FAILED` state.
    pub async fn continue_update_rollback(
        &self,
        input: ContinueUpdateRollbackInput,
    ) -> CallResult<()> {
        self.dispatcher
            .call_query_empty(&PROTOCOL, "ContinueUpdateRollback", &input)
            .await
    }

    /// Create a list of changes that will be applied to a stack.
    pub async fn create_change_set(
        &self,
        input: CreateChangeSetInput,
    ) -> CallResult<CreateChangeSetOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "CreateChangeSet", &input)
            .await
    }

    /// Create a stack.
    pub async fn create_stack(&self, input: CreateStackInput) -> CallResult<CreateStackOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "CreateStack", &input)
            .await
    }

    /// Delete a change set.
    pub async fn delete_change_set(&self, input: DeleteChangeSetInput) -> CallResult<()> {
        self.dispatcher
            .call_query_empty(&PROTOCOL, "DeleteChangeSet", &input)
            .await
    }

    /// Delete a stack.
    pub async fn delete_stack(&self, input: DeleteStackInput) -> CallResult<()> {
        self.dispatcher
            .call_query_empty(&PROTOCOL, "DeleteStack", &input)
            .await
    }

    /// Describe the quotas of the account.
    pub async fn describe_account_limits(
        &self,
        input: DescribeAccountLimitsInput,
    ) -> CallResult<DescribeAccountLimitsOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "DescribeAccountLimits", &input)
            .await
    }

    /// Describe a change set and the changes it contains.
    pub async fn describe_change_set(
        &self,
        input: DescribeChangeSetInput,
    ) -> CallResult<DescribeChangeSetOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "DescribeChangeSet", &input)
            .await
    }

    /// List the events of a stack, most recent first.
    pub async fn describe_stack_events(
        &self,
        input: DescribeStackEventsInput,
    ) -> CallResult<DescribeStackEventsOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "DescribeStackEvents", &input)
            .await
    }

    /// Describe one resource of a stack.
    pub async fn describe_stack_resource(
        &self,
        input: DescribeStackResourceInput,
    ) -> CallResult<DescribeStackResourceOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "DescribeStackResource", &input)
            .await
    }

    /// Describe the resources of a stack.
    pub async fn describe_stack_resources(
        &self,
        input: DescribeStackResourcesInput,
    ) -> CallResult<DescribeStackResourcesOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "DescribeStackResources", &input)
            .await
    }

    /// Describe one stack, or every running stack.
    pub async fn describe_stacks(
        &self,
        input: DescribeStacksInput,
    ) -> CallResult<DescribeStacksOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "DescribeStacks", &input)
            .await
    }

    /// Get a calculator link estimating the monthly cost of a template.
    pub async fn estimate_template_cost(
        &self,
        input: EstimateTemplateCostInput,
    ) -> CallResult<EstimateTemplateCostOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "EstimateTemplateCost", &input)
            .await
    }

    /// Apply a change set to its stack.
    pub async fn execute_change_set(&self, input: ExecuteChangeSetInput) -> CallResult<()> {
        self.dispatcher
            .call_query_empty(&PROTOCOL, "ExecuteChangeSet", &input)
            .await
    }

    /// Get the policy of a stack.
    pub async fn get_stack_policy(
        &self,
        input: GetStackPolicyInput,
    ) -> CallResult<GetStackPolicyOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "GetStackPolicy", &input)
            .await
    }

    /// Get the template of a stack or change set.
    pub async fn get_template(&self, input: GetTemplateInput) -> CallResult<GetTemplateOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "GetTemplate", &input)
            .await
    }

    /// Describe a template without creating a stack from it.
    pub async fn get_template_summary(
        &self,
        input: GetTemplateSummaryInput,
    ) -> CallResult<GetTemplateSummaryOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "GetTemplateSummary", &input)
            .await
    }

    /// List the change sets of a stack.
    pub async fn list_change_sets(
        &self,
        input: ListChangeSetsInput,
    ) -> CallResult<ListChangeSetsOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "ListChangeSets", &input)
            .await
    }

    /// List the values exported by stacks of the region.
    pub async fn list_exports(&self, input: ListExportsInput) -> CallResult<ListExportsOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "ListExports", &input)
            .await
    }

    /// List the resources of a stack.
    pub async fn list_stack_resources(
        &self,
        input: ListStackResourcesInput,
    ) -> CallResult<ListStackResourcesOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "ListStackResources", &input)
            .await
    }

    /// List stacks, including the ones deleted within the last 90 days.
    pub async fn list_stacks(&self, input: ListStacksInput) -> CallResult<ListStacksOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "ListStacks", &input)
            .await
    }

    /// Set the policy of a stack.
    pub async fn set_stack_policy(&self, input: SetStackPolicyInput) -> CallResult<()> {
        self.dispatcher
            .call_query_empty(&PROTOCOL, "SetStackPolicy", &input)
            .await
    }

    /// Send a signal to a resource waiting on a creation policy or wait
    /// condition.
    pub async fn signal_resource(&self, input: SignalResourceInput) -> CallResult<()> {
        self.dispatcher
            .call_query_empty(&PROTOCOL, "SignalResource", &input)
            .await
    }

    /// Update a stack.
    pub async fn update_stack(&self, input: UpdateStackInput) -> CallResult<UpdateStackOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "UpdateStack", &input)
            .await
    }

    /// Validate a template.
    pub async fn validate_template(
        &self,
        input: ValidateTemplateInput,
    ) -> CallResult<ValidateTemplateOutput> {
        self.dispatcher
            .call_query(&PROTOCOL, "ValidateTemplate", &input)
            .await
    }
}

impl ServiceClient for Client {
    fn callback_queue(&self) -> Result<CallbackQueue> {
        self.queue.get()
    }
}
