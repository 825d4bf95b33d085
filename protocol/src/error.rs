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

use bytes::Bytes;
use http::StatusCode;
use reqapi_core::Error;
use std::fmt;
use std::time::Duration;

/// The error returned by every service operation.
///
/// `E` is the error enum of the service the operation belongs to.
#[derive(Debug, thiserror::Error)]
pub enum SdkError<E> {
    /// The request could not be delivered or the response could not be read.
    #[error("failed to send request")]
    Transport(#[source] Error),
    /// The request could not be built, authorized or signed.
    #[error("failed to build request")]
    Request(#[source] Error),
    /// The service answered with a body that doesn't match the expected shape.
    #[error("failed to decode response")]
    Decode(#[source] Error),
    /// The service answered with a status outside the operation's success
    /// set and a body that isn't a recognizable error document.
    #[error("unexpected response status {status}")]
    UnexpectedStatus {
        /// Status of the response.
        status: StatusCode,
        /// Raw body of the response.
        body: Bytes,
    },
    /// The service answered with one of its documented errors.
    #[error("service error ({status}): {error}")]
    Service {
        /// Status of the response.
        status: StatusCode,
        /// Request id reported by the service, if any.
        request_id: Option<String>,
        /// The typed error.
        #[source]
        error: E,
    },
}

impl<E> SdkError<E> {
    /// Returns the typed service error if this is one.
    pub fn service_error(&self) -> Option<&E> {
        match self {
            SdkError::Service { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Consumes self and returns the typed service error if this is one.
    pub fn into_service_error(self) -> Option<E> {
        match self {
            SdkError::Service { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Check if the request never got a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, SdkError::Transport(_))
    }

    /// Check if the response couldn't be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, SdkError::Decode(_))
    }

    /// Status code of the response, if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SdkError::UnexpectedStatus { status, .. } | SdkError::Service { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Request id reported by the service, if any.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            SdkError::Service { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }
}

/// An error document returned by a service, before it's mapped to a typed
/// error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceFault {
    /// Error code, such as `ResourceNotFoundException`.
    pub code: String,
    /// Human readable message.
    pub message: Option<String>,
    /// Request id.
    pub request_id: Option<String>,
    /// How long the service asked the caller to wait before trying again.
    pub retry_after: Option<Duration>,
}

impl ServiceFault {
    /// Create a fault with the given code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    /// Set the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for ServiceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

/// Builds a typed service error out of a [`ServiceFault`].
///
/// Implemented by every service error enum through [`service_error!`](crate::service_error).
pub trait FromFault: Sized {
    /// Map the fault to the matching variant. Unknown codes must still
    /// produce a value.
    fn from_fault(fault: ServiceFault) -> Self;
}

/// A wire token that doesn't belong to a closed enum.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    /// Create a new error for the enum `kind`.
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Name of the enum.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The token that wasn't recognized.
    pub fn value(&self) -> &str {
        &self.value
    }
}
