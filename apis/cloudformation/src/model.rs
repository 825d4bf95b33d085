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

//! Data types shared by several CloudFormation operations.

use chrono::{DateTime, Utc};
use reqapi_protocol::query::xml::optional_members;
use reqapi_protocol::wire_enum;
use serde::{Deserialize, Serialize};

wire_enum! {
    /// Capabilities a template may require.
    pub enum Capability {
        Iam = "CAPABILITY_IAM",
        NamedIam = "CAPABILITY_NAMED_IAM",
        AutoExpand = "CAPABILITY_AUTO_EXPAND",
    }
}

wire_enum! {
    /// What to do when stack creation fails.
    pub enum OnFailure {
        DoNothing = "DO_NOTHING",
        Rollback = "ROLLBACK",
        Delete = "DELETE",
    }
}

wire_enum! {
    /// Status of a stack.
    pub enum StackStatus {
        CreateInProgress = "CREATE_IN_PROGRESS",
        CreateFailed = "CREATE_FAILED",
        CreateComplete = "CREATE_COMPLETE",
        RollbackInProgress = "ROLLBACK_IN_PROGRESS",
        RollbackFailed = "ROLLBACK_FAILED",
        RollbackComplete = "ROLLBACK_COMPLETE",
        DeleteInProgress = "DELETE_IN_PROGRESS",
        DeleteFailed = "DELETE_FAILED",
        DeleteComplete = "DELETE_COMPLETE",
        UpdateInProgress = "UPDATE_IN_PROGRESS",
        UpdateCompleteCleanupInProgress = "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
        UpdateComplete = "UPDATE_COMPLETE",
        UpdateRollbackInProgress = "UPDATE_ROLLBACK_IN_PROGRESS",
        UpdateRollbackFailed = "UPDATE_ROLLBACK_FAILED",
        UpdateRollbackCompleteCleanupInProgress = "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS",
        UpdateRollbackComplete = "UPDATE_ROLLBACK_COMPLETE",
        ReviewInProgress = "REVIEW_IN_PROGRESS",
    }
}

wire_enum! {
    /// Status of a stack resource.
    pub enum ResourceStatus {
        CreateInProgress = "CREATE_IN_PROGRESS",
        CreateFailed = "CREATE_FAILED",
        CreateComplete = "CREATE_COMPLETE",
        DeleteInProgress = "DELETE_IN_PROGRESS",
        DeleteFailed = "DELETE_FAILED",
        DeleteComplete = "DELETE_COMPLETE",
        DeleteSkipped = "DELETE_SKIPPED",
        UpdateInProgress = "UPDATE_IN_PROGRESS",
        UpdateFailed = "UPDATE_FAILED",
        UpdateComplete = "UPDATE_COMPLETE",
    }
}

wire_enum! {
    /// Status of a change set.
    pub enum ChangeSetStatus {
        CreatePending = "CREATE_PENDING",
        CreateInProgress = "CREATE_IN_PROGRESS",
        CreateComplete = "CREATE_COMPLETE",
        DeleteComplete = "DELETE_COMPLETE",
        Failed = "FAILED",
    }
}

wire_enum! {
    /// Kind of change set to create.
    pub enum ChangeSetType {
        Create = "CREATE",
        Update = "UPDATE",
    }
}

wire_enum! {
    /// Whether a change set can be executed.
    pub enum ExecutionStatus {
        Unavailable = "UNAVAILABLE",
        Available = "AVAILABLE",
        ExecuteInProgress = "EXECUTE_IN_PROGRESS",
        ExecuteComplete = "EXECUTE_COMPLETE",
        ExecuteFailed = "EXECUTE_FAILED",
        Obsolete = "OBSOLETE",
    }
}

wire_enum! {
    /// Kind of a change.
    pub enum ChangeType {
        Resource = "Resource",
    }
}

wire_enum! {
    /// What a change does to a resource.
    pub enum ChangeAction {
        Add = "Add",
        Modify = "Modify",
        Remove = "Remove",
    }
}

wire_enum! {
    /// Whether a change replaces the resource.
    pub enum Replacement {
        True = "True",
        False = "False",
        Conditional = "Conditional",
    }
}

wire_enum! {
    /// Part of a resource touched by a change.
    pub enum ResourceAttribute {
        Properties = "Properties",
        Metadata = "Metadata",
        CreationPolicy = "CreationPolicy",
        UpdatePolicy = "UpdatePolicy",
        DeletionPolicy = "DeletionPolicy",
        Tags = "Tags",
    }
}

wire_enum! {
    /// Whether changing a property recreates the resource.
    pub enum RequiresRecreation {
        Never = "Never",
        Conditionally = "Conditionally",
        Always = "Always",
    }
}

wire_enum! {
    /// Whether the change is known before execution.
    pub enum EvaluationType {
        Static = "Static",
        Dynamic = "Dynamic",
    }
}

wire_enum! {
    /// What caused a change.
    pub enum ChangeSource {
        ResourceReference = "ResourceReference",
        ParameterReference = "ParameterReference",
        ResourceAttribute = "ResourceAttribute",
        DirectModification = "DirectModification",
        Automatic = "Automatic",
    }
}

wire_enum! {
    /// Signal sent to a resource.
    pub enum ResourceSignalStatus {
        Success = "SUCCESS",
        Failure = "FAILURE",
    }
}

wire_enum! {
    /// Stage of a template.
    pub enum TemplateStage {
        Original = "Original",
        Processed = "Processed",
    }
}

/// Input parameter of a stack.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    pub parameter_key: Option<String>,
    pub parameter_value: Option<String>,
    pub use_previous_value: Option<bool>,
    pub resolved_value: Option<String>,
}

impl Parameter {
    /// Create a parameter setting `key` to `value`.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            parameter_key: Some(key.into()),
            parameter_value: Some(value.into()),
            ..Default::default()
        }
    }
}

/// Key-value pair attached to a stack.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Alarm watched while a stack is created or updated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RollbackTrigger {
    pub arn: String,
    pub r#type: String,
}

/// Rollback triggers of a stack.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RollbackConfiguration {
    #[serde(default, deserialize_with = "optional_members::deserialize")]
    pub rollback_triggers: Option<Vec<RollbackTrigger>>,
    pub monitoring_time_in_minutes: Option<i32>,
}

/// Output value of a stack.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackOutput {
    pub output_key: Option<String>,
    pub output_value: Option<String>,
    pub description: Option<String>,
    pub export_name: Option<String>,
}

/// A stack as returned by `DescribeStacks`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Stack {
    pub stack_id: Option<String>,
    pub stack_name: String,
    pub change_set_id: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "optional_members::deserialize")]
    pub parameters: Option<Vec<Parameter>>,
    pub creation_time: DateTime<Utc>,
    pub deletion_time: Option<DateTime<Utc>>,
    pub last_updated_time: Option<DateTime<Utc>>,
    pub rollback_configuration: Option<RollbackConfiguration>,
    pub stack_status: StackStatus,
    pub stack_status_reason: Option<String>,
    pub disable_rollback: Option<bool>,
    #[serde(
        rename = "NotificationARNs",
        default,
        deserialize_with = "optional_members::deserialize"
    )]
    pub notification_arns: Option<Vec<String>>,
    pub timeout_in_minutes: Option<i32>,
    #[serde(default, deserialize_with = "optional_members::deserialize")]
    pub capabilities: Option<Vec<Capability>>,
    #[serde(default, deserialize_with = "optional_members::deserialize")]
    pub outputs: Option<Vec<StackOutput>>,
    #[serde(rename = "RoleARN")]
    pub role_arn: Option<String>,
    #[serde(default, deserialize_with = "optional_members::deserialize")]
    pub tags: Option<Vec<Tag>>,
    pub enable_termination_protection: Option<bool>,
    pub parent_id: Option<String>,
    pub root_id: Option<String>,
}

/// Summary of a stack as returned by `ListStacks`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackSummary {
    pub stack_id: Option<String>,
    pub stack_name: String,
    pub template_description: Option<String>,
    pub creation_time: DateTime<Utc>,
    pub last_updated_time: Option<DateTime<Utc>>,
    pub deletion_time: Option<DateTime<Utc>>,
    pub stack_status: StackStatus,
    pub stack_status_reason: Option<String>,
    pub parent_id: Option<String>,
    pub root_id: Option<String>,
}

/// An event of a stack.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackEvent {
    pub stack_id: String,
    pub event_id: String,
    pub stack_name: String,
    pub logical_resource_id: Option<String>,
    pub physical_resource_id: Option<String>,
    pub resource_type: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub resource_status: Option<ResourceStatus>,
    pub resource_status_reason: Option<String>,
    pub resource_properties: Option<String>,
    pub client_request_token: Option<String>,
}

/// A resource of a stack.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackResource {
    pub stack_name: Option<String>,
    pub stack_id: Option<String>,
    pub logical_resource_id: String,
    pub physical_resource_id: Option<String>,
    pub resource_type: String,
    pub timestamp: DateTime<Utc>,
    pub resource_status: ResourceStatus,
    pub resource_status_reason: Option<String>,
    pub description: Option<String>,
}

/// A resource of a stack, with its metadata.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackResourceDetail {
    pub stack_name: Option<String>,
    pub stack_id: Option<String>,
    pub logical_resource_id: String,
    pub physical_resource_id: Option<String>,
    pub resource_type: String,
    pub last_updated_timestamp: DateTime<Utc>,
    pub resource_status: ResourceStatus,
    pub resource_status_reason: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<String>,
}

/// Summary of a resource as returned by `ListStackResources`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackResourceSummary {
    pub logical_resource_id: String,
    pub physical_resource_id: Option<String>,
    pub resource_type: String,
    pub last_updated_timestamp: DateTime<Utc>,
    pub resource_status: ResourceStatus,
    pub resource_status_reason: Option<String>,
}

/// A quota of the account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountLimit {
    pub name: Option<String>,
    pub value: Option<i32>,
}

/// Summary of a change set as returned by `ListChangeSets`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeSetSummary {
    pub stack_id: Option<String>,
    pub stack_name: Option<String>,
    pub change_set_id: Option<String>,
    pub change_set_name: Option<String>,
    pub execution_status: Option<ExecutionStatus>,
    pub status: Option<ChangeSetStatus>,
    pub status_reason: Option<String>,
    pub creation_time: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// A change a change set would make.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Change {
    pub r#type: Option<ChangeType>,
    pub resource_change: Option<ResourceChange>,
}

/// The change of one resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceChange {
    pub action: Option<ChangeAction>,
    pub logical_resource_id: Option<String>,
    pub physical_resource_id: Option<String>,
    pub resource_type: Option<String>,
    pub replacement: Option<Replacement>,
    #[serde(default, deserialize_with = "optional_members::deserialize")]
    pub scope: Option<Vec<ResourceAttribute>>,
    #[serde(default, deserialize_with = "optional_members::deserialize")]
    pub details: Option<Vec<ResourceChangeDetail>>,
}

/// Why and how a resource changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceChangeDetail {
    pub target: Option<ResourceTargetDefinition>,
    pub evaluation: Option<EvaluationType>,
    pub change_source: Option<ChangeSource>,
    pub causing_entity: Option<String>,
}

/// The part of a resource that changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceTargetDefinition {
    pub attribute: Option<ResourceAttribute>,
    pub name: Option<String>,
    pub requires_recreation: Option<RequiresRecreation>,
}

/// A value exported by a stack.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Export {
    pub exporting_stack_id: Option<String>,
    pub name: Option<String>,
    pub value: Option<String>,
}

/// Values a parameter may take.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterConstraints {
    #[serde(default, deserialize_with = "optional_members::deserialize")]
    pub allowed_values: Option<Vec<String>>,
}

/// A parameter declared by a template, as returned by
/// `GetTemplateSummary`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterDeclaration {
    pub parameter_key: Option<String>,
    pub default_value: Option<String>,
    pub parameter_type: Option<String>,
    pub no_echo: Option<bool>,
    pub description: Option<String>,
    pub parameter_constraints: Option<ParameterConstraints>,
}

/// A parameter declared by a template, as returned by `ValidateTemplate`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateParameter {
    pub parameter_key: Option<String>,
    pub default_value: Option<String>,
    pub no_echo: Option<bool>,
    pub description: Option<String>,
}
