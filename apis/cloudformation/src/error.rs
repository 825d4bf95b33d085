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

use reqapi_protocol::SdkError;

reqapi_protocol::service_error! {
    /// Errors returned by CloudFormation.
    pub enum CloudFormationError {
        /// The resource with the name requested already exists.
        AlreadyExists = "AlreadyExistsException",
        /// The specified change set name or ID doesn't exist.
        ChangeSetNotFound = "ChangeSetNotFound",
        /// The template contains resources with capabilities that weren't
        /// specified in the `Capabilities` parameter.
        InsufficientCapabilities = "InsufficientCapabilitiesException",
        /// The change set can't be executed in its current status.
        InvalidChangeSetStatus = "InvalidChangeSetStatus",
        /// The quota for the resource has already been reached.
        LimitExceeded = "LimitExceededException",
        /// A client request token was already used by another request.
        TokenAlreadyExists = "TokenAlreadyExistsException",
        /// The input failed to satisfy the constraints of the service.
        Validation = "ValidationError",
    }
}

/// Result of a CloudFormation call.
pub type CallResult<T> = std::result::Result<T, SdkError<CloudFormationError>>;
