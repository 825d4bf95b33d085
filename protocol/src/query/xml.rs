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

//! XML responses of Query services.
//!
//! A successful response looks like:
//!
//! ```xml
//! <DescribeStacksResponse xmlns="http://cloudformation.amazonaws.com/doc/2010-05-15/">
//!   <DescribeStacksResult>
//!     <Stacks>
//!       <member>...</member>
//!     </Stacks>
//!   </DescribeStacksResult>
//!   <ResponseMetadata>
//!     <RequestId>b9b4b068-3a41-11e5-94eb-example</RequestId>
//!   </ResponseMetadata>
//! </DescribeStacksResponse>
//! ```
//!
//! and a failed one like:
//!
//! ```xml
//! <ErrorResponse>
//!   <Error>
//!     <Type>Sender</Type>
//!     <Code>ValidationError</Code>
//!     <Message>Stack with id demo does not exist</Message>
//!   </Error>
//!   <RequestId>42d5b0c1-3a41-11e5-94eb-example</RequestId>
//! </ErrorResponse>
//! ```

use crate::ServiceFault;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqapi_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Find the `{action}Result` element among the children of the root and
/// return it as a standalone document.
///
/// Returns `None` when the response has no such element, which is how
/// actions without output answer.
pub fn extract_result(body: &[u8], action: &str) -> Result<Option<String>> {
    let wanted = format!("{action}Result");
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => {
                if depth == 1 {
                    let name = e.name();
                    if name.local_name().as_ref() == wanted.as_bytes() {
                        let inner = reader.read_text(name).map_err(malformed)?;
                        return Ok(Some(format!("<{wanted}>{inner}</{wanted}>")));
                    }
                    reader.read_to_end(name).map_err(malformed)?;
                } else {
                    depth += 1;
                }
            }
            Event::Empty(e) => {
                if depth == 1 && e.name().local_name().as_ref() == wanted.as_bytes() {
                    return Ok(Some(format!("<{wanted}/>")));
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Decode the `{action}Result` element of a response into `T`.
pub fn from_result<T: DeserializeOwned>(body: &[u8], action: &str) -> Result<T> {
    let Some(xml) = extract_result(body, action)? else {
        return Err(Error::decode(format!(
            "response has no {action}Result element"
        )));
    };

    quick_xml::de::from_str(&xml).map_err(|e| {
        Error::decode("failed to decode xml response")
            .with_source(e)
            .with_context(format!("action: {action}"))
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorResponse {
    error: ErrorDetail,
    request_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorDetail {
    code: String,
    message: Option<String>,
}

/// Parse an `ErrorResponse` document.
///
/// Returns `None` when the body isn't one.
pub fn parse_error(body: &[u8]) -> Option<ServiceFault> {
    let resp: ErrorResponse = quick_xml::de::from_reader(body).ok()?;
    Some(ServiceFault {
        code: resp.error.code,
        message: resp.error.message,
        request_id: resp.request_id,
        retry_after: None,
    })
}

fn malformed(err: quick_xml::Error) -> Error {
    Error::decode("malformed xml response").with_source(err)
}

#[derive(Deserialize)]
struct Members<T> {
    #[serde(default = "Vec::new")]
    member: Vec<T>,
}

/// Deserialize `<Foo><member>..</member>..</Foo>` into `Vec<T>`.
///
/// Use with `#[serde(default, deserialize_with = "members::deserialize")]`.
pub mod members {
    use super::Members;
    use serde::{Deserialize, Deserializer};

    /// See the module docs.
    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Members::<T>::deserialize(deserializer)?.member)
    }
}

/// Deserialize `<Foo><member>..</member>..</Foo>` into `Option<Vec<T>>`,
/// keeping an absent element apart from an empty one.
pub mod optional_members {
    use super::Members;
    use serde::{Deserialize, Deserializer};

    /// See the module docs.
    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Some(Members::<T>::deserialize(deserializer)?.member))
    }
}

/// Deserialize `<Foo><entry><key/><value/></entry>..</Foo>` into a map.
pub mod entries {
    use serde::{Deserialize, Deserializer};
    use std::collections::HashMap;

    #[derive(Deserialize)]
    struct Entries<V> {
        #[serde(default = "Vec::new")]
        entry: Vec<Entry<V>>,
    }

    #[derive(Deserialize)]
    struct Entry<V> {
        key: String,
        value: V,
    }

    /// See the module docs.
    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<HashMap<String, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        Ok(Entries::<V>::deserialize(deserializer)?
            .entry
            .into_iter()
            .map(|e| (e.key, e.value))
            .collect())
    }
}
