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
use crate::model::*;
use crate::operation::*;
use http::{Method, StatusCode};
use reqapi_aws_v4::Credential;
use reqapi_core::{Context, ProvideCredential, Result};
use reqapi_protocol::json;
use reqapi_protocol::rest::RestRequest;
use reqapi_protocol::{
    CallbackQueue, Config, Dispatcher, SdkError, ServiceClient, ServiceId, SharedQueue,
};
use serde::de::DeserializeOwned;
use std::time::Duration;

const SERVICE: ServiceId = ServiceId {
    endpoint_prefix: "lambda",
    signing_name: "lambda",
};

const FUNCTIONS: &str = "/2015-03-31/functions";
const FUNCTIONS_LIST: &str = "/2015-03-31/functions/";
const FUNCTION: &str = "/2015-03-31/functions/{FunctionName}";
const FUNCTION_CONFIGURATION: &str = "/2015-03-31/functions/{FunctionName}/configuration";
const FUNCTION_CODE: &str = "/2015-03-31/functions/{FunctionName}/code";
const FUNCTION_POLICY: &str = "/2015-03-31/functions/{FunctionName}/policy";
const FUNCTION_STATEMENT: &str = "/2015-03-31/functions/{FunctionName}/policy/{StatementId}";
const FUNCTION_INVOCATIONS: &str = "/2015-03-31/functions/{FunctionName}/invocations";
const FUNCTION_VERSIONS: &str = "/2015-03-31/functions/{FunctionName}/versions";
const ALIASES: &str = "/2015-03-31/functions/{FunctionName}/aliases";
const ALIAS: &str = "/2015-03-31/functions/{FunctionName}/aliases/{Name}";
const EVENT_SOURCE_MAPPINGS: &str = "/2015-03-31/event-source-mappings/";
const EVENT_SOURCE_MAPPING: &str = "/2015-03-31/event-source-mappings/{UUID}";
const ACCOUNT_SETTINGS: &str = "/2016-08-19/account-settings/";

/// Client of AWS Lambda.
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

    async fn call<O: DeserializeOwned>(
        &self,
        operation: &str,
        req: RestRequest,
        expected: StatusCode,
    ) -> CallResult<O> {
        self.dispatcher
            .call_rest(operation, req, Some(expected), |_, body| {
                json::from_slice(&body)
            })
            .await
    }

    async fn call_empty(
        &self,
        operation: &str,
        req: RestRequest,
        expected: StatusCode,
    ) -> CallResult<()> {
        self.dispatcher
            .call_rest(operation, req, Some(expected), |_, _| Ok(()))
            .await
    }

    /// Grant a service or account permission to use a function.
    pub async fn add_permission(&self, input: AddPermissionInput) -> CallResult<AddPermissionOutput> {
        let req = RestRequest::new(Method::POST, FUNCTION_POLICY)
            .path_param("FunctionName", &input.function_name)
            .query_opt("Qualifier", input.qualifier.as_deref())
            .json_body(&input)
            .map_err(SdkError::Request)?;
        self.call("AddPermission", req, StatusCode::CREATED).await
    }

    /// Create an alias pointing to a function version.
    pub async fn create_alias(&self, input: CreateAliasInput) -> CallResult<AliasConfiguration> {
        let req = RestRequest::new(Method::POST, ALIASES)
            .path_param("FunctionName", &input.function_name)
            .json_body(&input)
            .map_err(SdkError::Request)?;
        self.call("CreateAlias", req, StatusCode::CREATED).await
    }

    /// Map an event source to a function.
    pub async fn create_event_source_mapping(
        &self,
        input: CreateEventSourceMappingInput,
    ) -> CallResult<EventSourceMappingConfiguration> {
        let req = RestRequest::new(Method::POST, EVENT_SOURCE_MAPPINGS)
            .json_body(&input)
            .map_err(SdkError::Request)?;
        self.call("CreateEventSourceMapping", req, StatusCode::ACCEPTED)
            .await
    }

    /// Create a function.
    pub async fn create_function(
        &self,
        input: CreateFunctionInput,
    ) -> CallResult<FunctionConfiguration> {
        let req = RestRequest::new(Method::POST, FUNCTIONS)
            .json_body(&input)
            .map_err(SdkError::Request)?;
        self.call("CreateFunction", req, StatusCode::CREATED).await
    }

    /// Delete an alias.
    pub async fn delete_alias(&self, input: DeleteAliasInput) -> CallResult<()> {
        let req = RestRequest::new(Method::DELETE, ALIAS)
            .path_param("FunctionName", input.function_name)
            .path_param("Name", input.name);
        self.call_empty("DeleteAlias", req, StatusCode::NO_CONTENT)
            .await
    }

    /// Delete an event source mapping.
    pub async fn delete_event_source_mapping(
        &self,
        input: DeleteEventSourceMappingInput,
    ) -> CallResult<EventSourceMappingConfiguration> {
        let req = RestRequest::new(Method::DELETE, EVENT_SOURCE_MAPPING)
            .path_param("UUID", input.uuid);
        self.call("DeleteEventSourceMapping", req, StatusCode::ACCEPTED)
            .await
    }

    /// Delete a function, or one version of it with `qualifier`.
    pub async fn delete_function(&self, input: DeleteFunctionInput) -> CallResult<()> {
        let req = RestRequest::new(Method::DELETE, FUNCTION)
            .path_param("FunctionName", input.function_name)
            .query_opt("Qualifier", input.qualifier);
        self.call_empty("DeleteFunction", req, StatusCode::NO_CONTENT)
            .await
    }

    /// Get the quotas and usage of the account in the region.
    pub async fn get_account_settings(&self) -> CallResult<GetAccountSettingsOutput> {
        let req = RestRequest::new(Method::GET, ACCOUNT_SETTINGS);
        self.call("GetAccountSettings", req, StatusCode::OK).await
    }

    /// Get an alias.
    pub async fn get_alias(&self, input: GetAliasInput) -> CallResult<AliasConfiguration> {
        let req = RestRequest::new(Method::GET, ALIAS)
            .path_param("FunctionName", input.function_name)
            .path_param("Name", input.name);
        self.call("GetAlias", req, StatusCode::OK).await
    }

    /// Get an event source mapping.
    pub async fn get_event_source_mapping(
        &self,
        input: GetEventSourceMappingInput,
    ) -> CallResult<EventSourceMappingConfiguration> {
        let req = RestRequest::new(Method::GET, EVENT_SOURCE_MAPPING).path_param("UUID", input.uuid);
        self.call("GetEventSourceMapping", req, StatusCode::OK).await
    }

    /// Get a function, with a link to download its code.
    pub async fn get_function(&self, input: GetFunctionInput) -> CallResult<GetFunctionOutput> {
        let req = RestRequest::new(Method::GET, FUNCTION)
            .path_param("FunctionName", input.function_name)
            .query_opt("Qualifier", input.qualifier);
        self.call("GetFunction", req, StatusCode::OK).await
    }

    /// Get the config of a function version.
    pub async fn get_function_configuration(
        &self,
        input: GetFunctionConfigurationInput,
    ) -> CallResult<FunctionConfiguration> {
        let req = RestRequest::new(Method::GET, FUNCTION_CONFIGURATION)
            .path_param("FunctionName", input.function_name)
            .query_opt("Qualifier", input.qualifier);
        self.call("GetFunctionConfiguration", req, StatusCode::OK)
            .await
    }

    /// Get the resource policy of a function.
    pub async fn get_policy(&self, input: GetPolicyInput) -> CallResult<GetPolicyOutput> {
        let req = RestRequest::new(Method::GET, FUNCTION_POLICY)
            .path_param("FunctionName", input.function_name)
            .query_opt("Qualifier", input.qualifier);
        self.call("GetPolicy", req, StatusCode::OK).await
    }

    /// Invoke a function.
    ///
    /// Any 2xx status is a success, the status tells which kind of
    /// invocation happened.
    pub async fn invoke(&self, input: InvokeInput) -> CallResult<InvokeOutput> {
        let req = RestRequest::new(Method::POST, FUNCTION_INVOCATIONS)
            .path_param("FunctionName", input.function_name)
            .query_opt("Qualifier", input.qualifier)
            .header_opt("X-Amz-Invocation-Type", input.invocation_type)
            .header_opt("X-Amz-Log-Type", input.log_type)
            .header_opt("X-Amz-Client-Context", input.client_context)
            .raw_body(input.payload);

        self.dispatcher
            .call_rest("Invoke", req, None, |parts, body| {
                Ok(InvokeOutput {
                    status_code: i32::from(parts.status().as_u16()),
                    function_error: parts.header_string("x-amz-function-error")?,
                    log_result: parts.header_string("x-amz-log-result")?,
                    payload: body,
                })
            })
            .await
    }

    /// List the aliases of a function.
    pub async fn list_aliases(&self, input: ListAliasesInput) -> CallResult<ListAliasesOutput> {
        let req = RestRequest::new(Method::GET, ALIASES)
            .path_param("FunctionName", input.function_name)
            .query_opt("FunctionVersion", input.function_version)
            .query_opt("Marker", input.marker)
            .query_opt("MaxItems", input.max_items);
        self.call("ListAliases", req, StatusCode::OK).await
    }

    /// List event source mappings, optionally of one source or function.
    pub async fn list_event_source_mappings(
        &self,
        input: ListEventSourceMappingsInput,
    ) -> CallResult<ListEventSourceMappingsOutput> {
        let req = RestRequest::new(Method::GET, EVENT_SOURCE_MAPPINGS)
            .query_opt("EventSourceArn", input.event_source_arn)
            .query_opt("FunctionName", input.function_name)
            .query_opt("Marker", input.marker)
            .query_opt("MaxItems", input.max_items);
        self.call("ListEventSourceMappings", req, StatusCode::OK)
            .await
    }

    /// List functions.
    pub async fn list_functions(&self, input: ListFunctionsInput) -> CallResult<ListFunctionsOutput> {
        let req = RestRequest::new(Method::GET, FUNCTIONS_LIST)
            .query_opt("Marker", input.marker)
            .query_opt("MaxItems", input.max_items);
        self.call("ListFunctions", req, StatusCode::OK).await
    }

    /// List the versions of a function.
    pub async fn list_versions_by_function(
        &self,
        input: ListVersionsByFunctionInput,
    ) -> CallResult<ListVersionsByFunctionOutput> {
        let req = RestRequest::new(Method::GET, FUNCTION_VERSIONS)
            .path_param("FunctionName", input.function_name)
            .query_opt("Marker", input.marker)
            .query_opt("MaxItems", input.max_items);
        self.call("ListVersionsByFunction", req, StatusCode::OK)
            .await
    }

    /// Publish a version from the current code and config of a function.
    pub async fn publish_version(
        &self,
        input: PublishVersionInput,
    ) -> CallResult<FunctionConfiguration> {
        let req = RestRequest::new(Method::POST, FUNCTION_VERSIONS)
            .path_param("FunctionName", &input.function_name)
            .json_body(&input)
            .map_err(SdkError::Request)?;
        self.call("PublishVersion", req, StatusCode::CREATED).await
    }

    /// Remove a statement from the resource policy of a function.
    pub async fn remove_permission(&self, input: RemovePermissionInput) -> CallResult<()> {
        let req = RestRequest::new(Method::DELETE, FUNCTION_STATEMENT)
            .path_param("FunctionName", input.function_name)
            .path_param("StatementId", input.statement_id)
            .query_opt("Qualifier", input.qualifier);
        self.call_empty("RemovePermission", req, StatusCode::NO_CONTENT)
            .await
    }

    /// Update an alias.
    pub async fn update_alias(&self, input: UpdateAliasInput) -> CallResult<AliasConfiguration> {
        let req = RestRequest::new(Method::PUT, ALIAS)
            .path_param("FunctionName", &input.function_name)
            .path_param("Name", &input.name)
            .json_body(&input)
            .map_err(SdkError::Request)?;
        self.call("UpdateAlias", req, StatusCode::OK).await
    }

    /// Update an event source mapping.
    pub async fn update_event_source_mapping(
        &self,
        input: UpdateEventSourceMappingInput,
    ) -> CallResult<EventSourceMappingConfiguration> {
        let req = RestRequest::new(Method::PUT, EVENT_SOURCE_MAPPING)
            .path_param("UUID", &input.uuid)
            .json_body(&input)
            .map_err(SdkError::Request)?;
        self.call("UpdateEventSourceMapping", req, StatusCode::ACCEPTED)
            .await
    }

    /// Replace the code of a function.
    pub async fn update_function_code(
        &self,
        input: UpdateFunctionCodeInput,
    ) -> CallResult<FunctionConfiguration> {
        let req = RestRequest::new(Method::PUT, FUNCTION_CODE)
            .path_param("FunctionName", &input.function_name)
            .json_body(&input)
            .map_err(SdkError::Request)?;
        self.call("UpdateFunctionCode", req, StatusCode::OK).await
    }

    /// Update the config of a function.
    pub async fn update_function_configuration(
        &self,
        input: UpdateFunctionConfigurationInput,
    ) -> CallResult<FunctionConfiguration> {
        let req = RestRequest::new(Method::PUT, FUNCTION_CONFIGURATION)
            .path_param("FunctionName", &input.function_name)
            .json_body(&input)
            .map_err(SdkError::Request)?;
        self.call("UpdateFunctionConfiguration", req, StatusCode::OK)
            .await
    }
}

impl ServiceClient for Client {
    fn callback_queue(&self) -> Result<CallbackQueue> {
        self.queue.get()
    }
}
