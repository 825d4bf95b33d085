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

//! JSON responses of REST-JSON and JSON services.

use crate::ServiceFault;
use http::header::RETRY_AFTER;
use http::response::Parts;
use http::StatusCode;
use reqapi_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;

/// Decode a JSON body.
///
/// An empty body decodes like `{}`.
pub fn from_slice<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };

    serde_json::from_slice(body)
        .map_err(|e| Error::decode("failed to decode json response").with_source(e))
}

/// The transport side of a response: status and headers.
///
/// Some outputs take fields from here instead of the body.
#[derive(Clone, Copy, Debug)]
pub struct ResponseParts<'a>(&'a Parts);

impl<'a> ResponseParts<'a> {
    /// Wrap response parts.
    pub fn new(parts: &'a Parts) -> Self {
        Self(parts)
    }

    /// The status code.
    pub fn status(&self) -> StatusCode {
        self.0.status
    }

    /// Read a header as string.
    pub fn header_string(&self, name: &str) -> Result<Option<String>> {
        let Some(value) = self.0.headers.get(name) else {
            return Ok(None);
        };
        let value = value
            .to_str()
            .map_err(|e| Error::decode(format!("header {name} is not valid text")).with_source(e))?;
        Ok(Some(value.to_string()))
    }

    /// Read a header and parse it.
    pub fn header_parse<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let Some(value) = self.header_string(name)? else {
            return Ok(None);
        };
        value
            .parse()
            .map(Some)
            .map_err(|e| Error::decode(format!("invalid value of header {name}: {value}")).with_source(e))
    }
}

/// Parse the error document of a failed response.
///
/// The code comes from the `x-amzn-ErrorType` header, or from `__type`,
/// `code` or `Type` in the body. Returns `None` when no code can be found.
pub fn parse_error(parts: &Parts, body: &[u8]) -> Option<ServiceFault> {
    let doc = serde_json::from_slice::<Value>(body).ok();
    let doc = doc.as_ref().and_then(Value::as_object);
    let field = |names: &[&str]| -> Option<String> {
        let doc = doc?;
        names
            .iter()
            .find_map(|name| doc.get(*name).and_then(Value::as_str))
            .map(str::to_string)
    };

    let code = parts
        .headers
        .get("x-amzn-errortype")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| field(&["__type", "code", "Type"]))
        .map(|code| sanitize_error_code(&code).to_string())
        .filter(|code| !code.is_empty())?;

    let request_id = ["x-amzn-requestid", "x-amz-request-id"]
        .iter()
        .find_map(|name| parts.headers.get(*name))
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let retry_after = parts
        .headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .or_else(|| {
            let v = doc?.get("retryAfterSeconds")?;
            v.as_u64().or_else(|| v.as_str()?.trim().parse().ok())
        })
        .map(Duration::from_secs);

    Some(ServiceFault {
        code,
        message: field(&["message", "Message", "errorMessage"]),
        request_id,
        retry_after,
    })
}

/// Strip the decorations services put around error codes:
/// `aws.protocoltests#FooError:http://internal.amazon.com/` is `FooError`.
fn sanitize_error_code(code: &str) -> &str {
    let code = code.split(':').next().unwrap_or_default();
    code.rsplit('#').next().unwrap_or_default().trim()
}

/// Base64 encoded blobs as [`bytes::Bytes`].
///
/// Use with `#[serde(with = "blob")]`, `blob::option` for `Option<Bytes>`
/// or `blob::option_list` for `Option<Vec<Bytes>>`.
pub mod blob {
    use bytes::Bytes;
    use reqapi_core::hash::{base64_decode, base64_encode};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serialize as base64 string.
    pub fn serialize<S: Serializer>(v: &Bytes, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&base64_encode(v))
    }

    /// Deserialize from base64 string.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Bytes, D::Error> {
        let s = String::deserialize(d)?;
        base64_decode(&s).map(Bytes::from).map_err(de::Error::custom)
    }

    /// `Option<Bytes>` flavor, use with `#[serde(default, with = "blob::option")]`.
    pub mod option {
        use bytes::Bytes;
        use serde::{Deserialize, Deserializer, Serializer};

        /// Serialize as base64 string.
        pub fn serialize<S: Serializer>(v: &Option<Bytes>, s: S) -> Result<S::Ok, S::Error> {
            match v {
                Some(v) => super::serialize(v, s),
                None => s.serialize_none(),
            }
        }

        /// Deserialize from base64 string or null.
        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Bytes>, D::Error> {
            #[derive(Deserialize)]
            struct Wrapper(#[serde(with = "super")] Bytes);

            Ok(Option::<Wrapper>::deserialize(d)?.map(|w| w.0))
        }
    }

    /// `Option<Vec<Bytes>>` flavor for lists of blobs, use with
    /// `#[serde(default, with = "blob::option_list")]`.
    pub mod option_list {
        use bytes::Bytes;
        use serde::ser::SerializeSeq;
        use serde::{Deserialize, Deserializer, Serializer};

        /// Serialize as a list of base64 strings.
        pub fn serialize<S: Serializer>(v: &Option<Vec<Bytes>>, s: S) -> Result<S::Ok, S::Error> {
            let Some(items) = v else {
                return s.serialize_none();
            };

            let mut seq = s.serialize_seq(Some(items.len()))?;
            for item in items {
                seq.serialize_element(&reqapi_core::hash::base64_encode(item))?;
            }
            seq.end()
        }

        /// Deserialize from a list of base64 strings or null.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<Vec<Bytes>>, D::Error> {
            #[derive(Deserialize)]
            struct Wrapper(#[serde(with = "super")] Bytes);

            Ok(Option::<Vec<Wrapper>>::deserialize(d)?
                .map(|items| items.into_iter().map(|w| w.0).collect()))
        }
    }
}

/// Timestamps sent as (fractional) seconds since the unix epoch.
///
/// Use with `#[serde(with = "epoch_seconds")]`, or `epoch_seconds::option`
/// for `Option<DateTime>`.
pub mod epoch_seconds {
    use reqapi_core::time::{from_epoch_seconds, DateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serialize as number of seconds.
    pub fn serialize<S: Serializer>(v: &DateTime, s: S) -> Result<S::Ok, S::Error> {
        let millis = v.timestamp_millis();
        if millis % 1000 == 0 {
            s.serialize_i64(millis / 1000)
        } else {
            s.serialize_f64(millis as f64 / 1000.0)
        }
    }

    /// Deserialize from number of seconds.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime, D::Error> {
        let secs = f64::deserialize(d)?;
        from_epoch_seconds(secs).map_err(de::Error::custom)
    }

    /// `Option<DateTime>` flavor.
    pub mod option {
        use reqapi_core::time::DateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        /// Serialize as number of seconds.
        pub fn serialize<S: Serializer>(v: &Option<DateTime>, s: S) -> Result<S::Ok, S::Error> {
            match v {
                Some(v) => super::serialize(v, s),
                None => s.serialize_none(),
            }
        }

        /// Deserialize from number of seconds or null.
        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime>, D::Error> {
            #[derive(Deserialize)]
            struct Wrapper(#[serde(with = "super")] DateTime);

            Ok(Option::<Wrapper>::deserialize(d)?.map(|w| w.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use reqapi_core::time::DateTime;
    use reqapi_core::ErrorKind;
    use serde::{Deserialize, Serialize};
    use test_case::test_case;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Config {
        function_name: String,
        description: Option<String>,
        #[serde(default, with = "blob::option", skip_serializing_if = "Option::is_none")]
        zip_file: Option<Bytes>,
        #[serde(default, with = "epoch_seconds::option", skip_serializing_if = "Option::is_none")]
        last_modified: Option<DateTime>,
    }

    fn parts(status: u16, headers: &[(&str, &str)]) -> Parts {
        let mut resp = http::Response::builder().status(status);
        for (k, v) in headers {
            resp = resp.header(*k, *v);
        }
        resp.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_from_slice() {
        let v: Config = from_slice(
            br#"{"FunctionName":"demo","Description":null,"ZipFile":"aGVsbG8=","LastModified":1647156004.5}"#,
        )
        .unwrap();
        assert_eq!(v.function_name, "demo");
        assert_eq!(v.description, None);
        assert_eq!(v.zip_file, Some(Bytes::from_static(b"hello")));
        assert_eq!(
            v.last_modified.map(|t| t.timestamp_millis()),
            Some(1647156004500)
        );

        let out = serde_json::to_value(&v).unwrap();
        assert_eq!(out["ZipFile"], "aGVsbG8=");
        assert_eq!(out["LastModified"], 1647156004.5);
    }

    #[test_case(r#"{"FunctionName":"f","LastModified":1569284520.333}"#; "millis")]
    #[test_case(r#"{"FunctionName":"f","LastModified":1569284520}"#; "whole seconds")]
    #[test_case(r#"{"FunctionName":"f"}"#; "absent")]
    fn test_epoch_seconds_keeps_wire_value(body: &str) {
        let v: Config = from_slice(body.as_bytes()).unwrap();
        let wire: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(
            serde_json::to_value(&v).unwrap()["LastModified"],
            wire["LastModified"]
        );
    }

    #[test]
    fn test_from_slice_errors() {
        let err = from_slice::<Config>(br#"{"Description":"x"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        let err = from_slice::<Config>(b"<html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        let err = from_slice::<Config>(br#"{"FunctionName":"x","ZipFile":"!!"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_empty_body() {
        #[derive(Debug, Deserialize)]
        struct Empty {}

        assert!(from_slice::<Empty>(b"").is_ok());
        assert!(from_slice::<Empty>(b"  \n").is_ok());
    }

    #[test]
    fn test_response_parts() {
        let p = parts(
            200,
            &[("x-amz-function-error", "Unhandled"), ("x-amz-executed-version", "7")],
        );
        let resp = ResponseParts::new(&p);

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.header_string("X-Amz-Function-Error").unwrap().as_deref(),
            Some("Unhandled")
        );
        assert_eq!(resp.header_parse::<u32>("x-amz-executed-version").unwrap(), Some(7));
        assert_eq!(resp.header_string("x-amz-log-result").unwrap(), None);
        assert!(resp.header_parse::<u32>("x-amz-function-error").is_err());
    }

    #[test_case(&[("x-amzn-ErrorType", "ResourceNotFoundException:http://internal.amazon.com/")], "{}", "ResourceNotFoundException"; "header")]
    #[test_case(&[], r#"{"__type":"com.amazonaws.sqs#QueueDoesNotExist","message":"m"}"#, "QueueDoesNotExist"; "type with namespace")]
    #[test_case(&[], r#"{"Type":"User","code":"ServiceException"}"#, "ServiceException"; "code")]
    #[test_case(&[], r#"{"Type":"InvalidParameterValueException"}"#, "InvalidParameterValueException"; "type")]
    fn test_parse_error_code(headers: &[(&str, &str)], body: &str, expected: &str) {
        let fault = parse_error(&parts(400, headers), body.as_bytes()).unwrap();
        assert_eq!(fault.code, expected);
    }

    #[test]
    fn test_parse_error_details() {
        let p = parts(
            429,
            &[("x-amzn-RequestId", "req-1"), ("Retry-After", "7")],
        );
        let fault = parse_error(
            &p,
            br#"{"Type":"User","message":"Rate exceeded","__type":"TooManyRequestsException"}"#,
        )
        .unwrap();
        assert_eq!(fault.code, "TooManyRequestsException");
        assert_eq!(fault.message.as_deref(), Some("Rate exceeded"));
        assert_eq!(fault.request_id.as_deref(), Some("req-1"));
        assert_eq!(fault.retry_after, Some(Duration::from_secs(7)));

        let fault = parse_error(
            &parts(429, &[]),
            br#"{"__type":"TooManyRequestsException","retryAfterSeconds":"2"}"#,
        )
        .unwrap();
        assert_eq!(fault.retry_after, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_parse_error_without_code() {
        assert_eq!(parse_error(&parts(502, &[]), b"Bad Gateway"), None);
        assert_eq!(parse_error(&parts(500, &[]), br#"{"message":"x"}"#), None);
    }
}
