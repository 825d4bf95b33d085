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

//! The AWS Query protocol.
//!
//! Requests are form encoded `POST` bodies made of an `Action`, a
//! `Version` and the input flattened into dotted keys:
//!
//! ```text
//! Action=CreateStack&Version=2010-05-15&StackName=demo
//!     &Parameters.member.1.ParameterKey=Env
//!     &Parameters.member.1.ParameterValue=prod
//! ```
//!
//! Responses are XML, see [`xml`].

mod ser;
pub use ser::to_value;
pub use ser::QueryValue;
pub use ser::SerializeError;

pub mod xml;

use reqapi_core::{Error, Result};
use serde::Serialize;

/// How lists are flattened into keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListStyle {
    /// `Foo.1`, `Foo.2`, ...
    Flat,
    /// `Foo.member.1`, `Foo.member.2`, ...
    Member,
}

/// The fixed parts of a Query service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryProtocol {
    /// API version sent with every action, such as `2010-05-15`.
    pub version: &'static str,
    /// How the service expects lists to be flattened.
    pub list_style: ListStyle,
}

/// The parameters of one Query request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryParams {
    action: String,
    version: String,
    params: Vec<(String, String)>,
}

impl QueryParams {
    /// Create params for `action` of the given API `version`.
    pub fn new(action: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            version: version.into(),
            params: Vec::new(),
        }
    }

    /// Flatten `input` into the params.
    ///
    /// `input` must serialize as a struct (or `()` for actions without
    /// input). Absent optional fields produce no key at all.
    pub fn with_input<T: Serialize + ?Sized>(mut self, input: &T, style: ListStyle) -> Result<Self> {
        let value = to_value(input).map_err(|e| {
            Error::request_invalid("failed to serialize query input")
                .with_source(e)
                .with_context(format!("action: {}", self.action))
        })?;

        match value {
            None => {}
            Some(QueryValue::Object(fields)) => {
                for (name, value) in fields {
                    flatten(name, value, style, &mut self.params);
                }
            }
            Some(_) => {
                return Err(Error::request_invalid("query input must be a struct")
                    .with_context(format!("action: {}", self.action)))
            }
        }
        Ok(self)
    }

    /// Append one raw key pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.push((key.into(), value.into()));
    }

    /// The action name.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The flattened params, without `Action` and `Version`.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Look up the value of a flattened key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Encode as an `application/x-www-form-urlencoded` body, `Action` and
    /// `Version` first.
    pub fn to_form_body(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("Action", &self.action)
            .append_pair("Version", &self.version)
            .extend_pairs(self.params.iter())
            .finish()
    }
}

fn flatten(prefix: String, value: QueryValue, style: ListStyle, out: &mut Vec<(String, String)>) {
    match value {
        QueryValue::String(v) => out.push((prefix, v)),
        QueryValue::Object(fields) => {
            for (name, value) in fields {
                flatten(format!("{prefix}.{name}"), value, style, out);
            }
        }
        // An empty list that is present clears the field: `Foo=`.
        QueryValue::Array(items) if items.is_empty() => out.push((prefix, String::new())),
        QueryValue::Array(items) => {
            for (idx, value) in items.into_iter().enumerate() {
                let key = match style {
                    ListStyle::Flat => format!("{prefix}.{}", idx + 1),
                    ListStyle::Member => format!("{prefix}.member.{}", idx + 1),
                };
                flatten(key, value, style, out);
            }
        }
        QueryValue::Map(entries) => {
            for (idx, (key, value)) in entries.into_iter().enumerate() {
                let entry = format!("{prefix}.entry.{}", idx + 1);
                out.push((format!("{entry}.key"), key));
                flatten(format!("{entry}.value"), value, style, out);
            }
        }
    }
}
