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
    /// Errors returned by SQS.
    pub enum SqsError {
        /// Two entries of a batch share the same id.
        BatchEntryIdsNotDistinct = "BatchEntryIdsNotDistinct",
        /// The messages of a batch are larger than allowed in total.
        BatchRequestTooLong = "BatchRequestTooLong",
        /// The batch has no entries.
        EmptyBatchRequest = "EmptyBatchRequest",
        /// An attribute name isn't valid.
        InvalidAttributeName = "InvalidAttributeName",
        /// A batch entry id doesn't follow the allowed format.
        InvalidBatchEntryId = "InvalidBatchEntryId",
        /// The receipt handle isn't valid for this queue.
        InvalidIdFormat = "InvalidIdFormat",
        /// The message contains characters outside the allowed set.
        InvalidMessageContents = "InvalidMessageContents",
        /// The message isn't in flight.
        MessageNotInflight = "MessageNotInflight",
        /// A limit was reached, such as the number of in flight messages.
        OverLimit = "OverLimit",
        /// The queue was purged less than 60 seconds ago.
        PurgeQueueInProgress = "PurgeQueueInProgress",
        /// A queue with this name was deleted less than 60 seconds ago.
        QueueDeletedRecently = "QueueDeletedRecently",
        /// The queue doesn't exist.
        QueueDoesNotExist = "QueueDoesNotExist",
        /// A queue with this name exists with different attributes.
        QueueNameExists = "QueueNameExists",
        /// The receipt handle isn't valid.
        ReceiptHandleIsInvalid = "ReceiptHandleIsInvalid",
        /// The batch has more than 10 entries.
        TooManyEntriesInBatchRequest = "TooManyEntriesInBatchRequest",
        /// The operation isn't supported.
        UnsupportedOperation = "UnsupportedOperation",
    }
}

/// Result of an SQS call.
pub type CallResult<T> = std::result::Result<T, SdkError<SqsError>>;
