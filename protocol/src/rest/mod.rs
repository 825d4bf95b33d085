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

//! Requests of the REST-JSON and JSON protocols.
//!
//! Every input field goes to exactly one place: a path placeholder, a
//! query parameter, a header or the JSON body. Fields that go anywhere but
//! the body are marked `#[serde(skip)]` on the input type and passed to
//! [`RestRequest`] by hand.

mod template;
pub use template::UriTemplate;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::Method;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqapi_core::{Error, Result};
use serde::Serialize;

const QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Builder of one REST request.
#[derive(Clone, Debug)]
pub struct RestRequest {
    method: Method,
    template: &'static str,
    path_params: Vec<(&'static str, String)>,
    query: Vec<(&'static str, String)>,
    headers: Vec<(&'static str, String)>,
    content_type: Option<&'static str>,
    body: Bytes,
}

impl RestRequest {
    /// Start a request for `method` on the uri `template`.
    pub fn new(method: Method, template: &'static str) -> Self {
        Self {
            method,
            template,
            path_params: Vec::new(),
            query: Vec::new(),
            headers: Vec::new(),
            content_type: None,
            body: Bytes::new(),
        }
    }

    /// Value of the `{name}` placeholder.
    pub fn path_param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.path_params.push((name, value.into()));
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, name: &'static str, value: impl ToString) -> Self {
        self.query.push((name, value.to_string()));
        self
    }

    /// Add a query parameter if `value` is set.
    pub fn query_opt<T: ToString>(self, name: &'static str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.query(name, v),
            None => self,
        }
    }

    /// Add a header.
    pub fn header(mut self, name: &'static str, value: impl ToString) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }

    /// Add a header if `value` is set.
    pub fn header_opt<T: ToString>(self, name: &'static str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.header(name, v),
            None => self,
        }
    }

    /// Use the JSON encoding of `input` as body.
    pub fn json_body<T: Serialize + ?Sized>(mut self, input: &T) -> Result<Self> {
        let body = serde_json::to_vec(input)
            .map_err(|e| Error::request_invalid("failed to serialize json body").with_source(e))?;
        self.body = Bytes::from(body);
        self.content_type.get_or_insert("application/json");
        Ok(self)
    }

    /// Use `body` as it is.
    pub fn raw_body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Override the `content-type` header.
    pub fn content_type(mut self, content_type: &'static str) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The body as it will be sent.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The expanded path and query, such as
    /// `/2015-03-31/functions/demo/aliases?MaxItems=10`.
    pub fn path_and_query(&self) -> Result<String> {
        let params = self
            .path_params
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect::<Vec<_>>();
        let mut paq = UriTemplate::new(self.template).expand(&params)?;

        for (idx, (k, v)) in self.query.iter().enumerate() {
            paq.push(if idx == 0 { '?' } else { '&' });
            paq.extend(utf8_percent_encode(k, &QUERY_ENCODE_SET));
            paq.push('=');
            paq.extend(utf8_percent_encode(v, &QUERY_ENCODE_SET));
        }
        Ok(paq)
    }

    /// Build the request against `endpoint`, such as
    /// `https://lambda.us-east-1.amazonaws.com`.
    pub fn build(self, endpoint: &str) -> Result<http::Request<Bytes>> {
        let uri = format!("{}{}", endpoint.trim_end_matches('/'), self.path_and_query()?);

        let mut req = http::Request::builder().method(self.method).uri(uri);
        if let Some(content_type) = self.content_type {
            req = req.header(CONTENT_TYPE, content_type);
        }
        for (name, value) in self.headers {
            req = req.header(name, value);
        }
        Ok(req.body(self.body)?)
    }
}

/// The fixed parts of a JSON protocol service.
///
/// Every call is a `POST /` whose `X-Amz-Target` header names the
/// operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JsonTarget {
    prefix: &'static str,
    content_type: &'static str,
}

impl JsonTarget {
    /// Create a target with the given prefix, such as `AmazonSQS`, speaking
    /// `application/x-amz-json-1.0`.
    pub const fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            content_type: "application/x-amz-json-1.0",
        }
    }

    /// Use `application/x-amz-json-1.1` instead.
    pub const fn with_json_1_1(mut self) -> Self {
        self.content_type = "application/x-amz-json-1.1";
        self
    }

    /// The `X-Amz-Target` value of `operation`.
    pub fn target(&self, operation: &str) -> String {
        format!("{}.{operation}", self.prefix)
    }

    /// Build the request of `operation` carrying `input`.
    pub fn request<T: Serialize + ?Sized>(&self, operation: &str, input: &T) -> Result<RestRequest> {
        RestRequest::new(Method::POST, "/")
            .header("X-Amz-Target", self.target(operation))
            .content_type(self.content_type)
            .json_body(input)
    }
}
