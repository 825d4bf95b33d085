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
    /// Errors returned by Lambda.
    pub enum LambdaError {
        /// The code storage quota of the account was exceeded.
        CodeStorageExceeded = "CodeStorageExceededException",
        /// Lambda was not permitted to create an elastic network interface.
        Ec2AccessDenied = "EC2AccessDeniedException",
        /// Amazon EC2 throttled Lambda while it set the function up.
        Ec2Throttled = "EC2ThrottledException",
        /// Amazon EC2 returned an unexpected error to Lambda.
        Ec2Unexpected = "EC2UnexpectedException",
        /// No more elastic network interfaces can be created for the VPC.
        EniLimitReached = "ENILimitReachedException",
        /// One of the parameters isn't valid.
        InvalidParameterValue = "InvalidParameterValueException",
        /// The request body couldn't be parsed as JSON.
        InvalidRequestContent = "InvalidRequestContentException",
        /// The runtime or its version isn't supported.
        InvalidRuntime = "InvalidRuntimeException",
        /// A security group in the VPC config isn't valid.
        InvalidSecurityGroupId = "InvalidSecurityGroupIDException",
        /// A subnet in the VPC config isn't valid.
        InvalidSubnetId = "InvalidSubnetIDException",
        /// The deployment package couldn't be unzipped.
        InvalidZipFile = "InvalidZipFileException",
        /// The resulting permissions policy would be too large.
        PolicyLengthExceeded = "PolicyLengthExceededException",
        /// The request payload exceeded the size limit.
        RequestTooLarge = "RequestTooLargeException",
        /// The resource already exists, or another operation is in
        /// progress.
        ResourceConflict = "ResourceConflictException",
        /// The resource specified in the request doesn't exist.
        ResourceNotFound = "ResourceNotFoundException",
        /// The service encountered an internal error.
        Service = "ServiceException",
        /// No more IP addresses are left in the subnets of the VPC.
        SubnetIpAddressLimitReached = "SubnetIPAddressLimitReachedException",
        /// The request throughput limit was exceeded, see
        /// [`LambdaError::retry_after`].
        TooManyRequests = "TooManyRequestsException",
        /// The content type of the `Invoke` payload isn't JSON.
        UnsupportedMediaType = "UnsupportedMediaTypeException",
    }
}

/// Result of a Lambda call.
pub type CallResult<T> = std::result::Result<T, SdkError<LambdaError>>;
