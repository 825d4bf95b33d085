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

use crate::{Error, Result};
use http::uri::{Authority, PathAndQuery, Scheme};
use http::{HeaderMap, HeaderValue, Method, Uri};
use std::mem;
use std::str::FromStr;

/// A request taken apart for signing.
///
/// `build` moves the headers out of the request parts and `apply` moves
/// them back, so no header is copied along the way.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, still percent encoded.
    pub path: String,
    /// HTTP query parameters, percent decoded.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing request from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing request back to http::request::Parts.
    ///
    /// Query pairs are written as they are, so callers must encode them first.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;

        let mut paq = self.path;
        for (i, (k, v)) in self.query.iter().enumerate() {
            paq.push(if i == 0 { '?' } else { '&' });
            paq.push_str(k);
            if !v.is_empty() {
                paq.push('=');
                paq.push_str(v);
            }
        }

        let mut uri_parts = mem::take(&mut parts.uri).into_parts();
        uri_parts.scheme = Some(self.scheme);
        uri_parts.authority = Some(self.authority);
        uri_parts.path_and_query = Some(PathAndQuery::from_str(&paq)?);
        parts.uri = Uri::from_parts(uri_parts)?;

        Ok(())
    }

    /// Trim the leading and trailing spaces of a header value.
    pub fn header_value_normalize(v: &mut HeaderValue) {
        let bs = v.as_bytes();

        let start = bs.iter().position(|b| *b != b' ').unwrap_or(bs.len());
        let end = bs.len() - bs.iter().rev().position(|b| *b != b' ').unwrap_or(0);
        if start == 0 && end == bs.len() {
            return;
        }

        let trimmed = if start < end { &bs[start..end] } else { &[][..] };
        if let Ok(value) = HeaderValue::from_bytes(trimmed) {
            let sensitive = v.is_sensitive();
            *v = value;
            v.set_sensitive(sensitive);
        }
    }

    /// Get header names as sorted vector.
    pub fn header_name_to_vec_sorted(&self) -> Vec<&str> {
        let mut h = self
            .headers
            .keys()
            .map(|k| k.as_str())
            .collect::<Vec<&str>>();
        h.sort_unstable();

        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parts(uri: &str) -> http::request::Parts {
        http::Request::builder()
            .method("POST")
            .uri(uri)
            .header("x-amz-target", "  AmazonSQS.SendMessage ")
            .body(())
            .expect("request must be valid")
            .into_parts()
            .0
    }

    #[test]
    fn test_build_and_apply() -> Result<()> {
        let mut p = parts("https://lambda.us-east-1.amazonaws.com/2015-03-31/functions/?Marker=a%2Fb&MaxItems=10");
        let mut req = SigningRequest::build(&mut p)?;

        assert_eq!(req.path, "/2015-03-31/functions/");
        assert_eq!(
            req.query,
            vec![
                ("Marker".to_string(), "a/b".to_string()),
                ("MaxItems".to_string(), "10".to_string())
            ]
        );
        assert!(p.headers.is_empty());

        req.query = vec![("MaxItems".to_string(), "10".to_string())];
        req.apply(&mut p)?;

        assert_eq!(
            p.uri.to_string(),
            "https://lambda.us-east-1.amazonaws.com/2015-03-31/functions/?MaxItems=10"
        );
        assert_eq!(p.headers.len(), 1);
        Ok(())
    }

    #[test]
    fn test_header_value_normalize() {
        let mut p = parts("https://sqs.us-east-1.amazonaws.com/");
        let v = p.headers.get_mut("x-amz-target").expect("header must exist");
        SigningRequest::header_value_normalize(v);
        assert_eq!(*v, "AmazonSQS.SendMessage");

        let mut blank = HeaderValue::from_static("   ");
        SigningRequest::header_value_normalize(&mut blank);
        assert_eq!(blank, "");
    }

    #[test]
    fn test_build_without_authority() {
        let mut p = parts("/relative");
        let err = SigningRequest::build(&mut p).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::RequestInvalid);
    }
}
