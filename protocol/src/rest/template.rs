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

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqapi_core::{Error, Result};

/// Characters kept as they are inside a path segment.
const PATH_SEGMENT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Same as [`PATH_SEGMENT_ENCODE_SET`] but `/` is kept for greedy labels.
const GREEDY_ENCODE_SET: AsciiSet = PATH_SEGMENT_ENCODE_SET.remove(b'/');

/// A request path with `{Name}` placeholders, such as
/// `/2015-03-31/functions/{FunctionName}/aliases/{Name}`.
///
/// `{Name+}` is a greedy label: `/` in its value is kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UriTemplate<'a>(&'a str);

impl<'a> UriTemplate<'a> {
    /// Wrap a template.
    pub fn new(template: &'a str) -> Self {
        Self(template)
    }

    /// The raw template.
    pub fn as_str(&self) -> &'a str {
        self.0
    }

    /// Names of every placeholder, in order.
    pub fn placeholders(&self) -> Vec<&'a str> {
        let mut names = Vec::new();
        let mut rest = self.0;
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            names.push(rest[start + 1..start + len].trim_end_matches('+'));
            rest = &rest[start + len + 1..];
        }
        names
    }

    /// Replace every placeholder with its percent encoded value.
    ///
    /// Text outside the placeholders is copied as it is. A placeholder
    /// without a value is an error.
    pub fn expand(&self, params: &[(&str, &str)]) -> Result<String> {
        let mut out = String::with_capacity(self.0.len() + 32);
        let mut rest = self.0;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);

            let Some(len) = rest[start..].find('}') else {
                return Err(Error::request_invalid(format!(
                    "unterminated placeholder in uri template {}",
                    self.0
                )));
            };
            let label = &rest[start + 1..start + len];
            let (name, greedy) = match label.strip_suffix('+') {
                Some(name) => (name, true),
                None => (label, false),
            };

            let Some((_, value)) = params.iter().find(|(k, _)| *k == name) else {
                return Err(Error::request_invalid(format!(
                    "missing value for uri placeholder {name}"
                ))
                .with_context(format!("template: {}", self.0)));
            };
            if value.is_empty() {
                return Err(Error::request_invalid(format!(
                    "empty value for uri placeholder {name}"
                ))
                .with_context(format!("template: {}", self.0)));
            }

            let set = if greedy {
                &GREEDY_ENCODE_SET
            } else {
                &PATH_SEGMENT_ENCODE_SET
            };
            out.extend(utf8_percent_encode(value, set));

            rest = &rest[start + len + 1..];
        }
        out.push_str(rest);

        Ok(out)
    }
}
