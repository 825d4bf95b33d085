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

//! Endpoint resolution.

/// Identity of a service: where it lives and which name it signs with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServiceId {
    /// First label of the public hostname, such as `cloudformation`.
    pub endpoint_prefix: &'static str,
    /// Service name in the signing scope.
    pub signing_name: &'static str,
}

/// Resolve the endpoint of a service.
///
/// An explicit `endpoint` is used as it is, otherwise the public endpoint
/// of the region: `https://{prefix}.{region}.amazonaws.com`, with
/// `.com.cn` for the China regions.
pub fn resolve(prefix: &str, region: &str, endpoint: Option<&str>) -> String {
    if let Some(endpoint) = endpoint {
        return endpoint.trim_end_matches('/').to_string();
    }

    let suffix = if region.starts_with("cn-") {
        "amazonaws.com.cn"
    } else {
        "amazonaws.com"
    };
    format!("https://{prefix}.{region}.{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("lambda", "us-east-1", None, "https://lambda.us-east-1.amazonaws.com"; "public")]
    #[test_case("sqs", "cn-north-1", None, "https://sqs.cn-north-1.amazonaws.com.cn"; "china")]
    #[test_case("sqs", "us-east-1", Some("http://localhost:4566/"), "http://localhost:4566"; "override")]
    fn test_resolve(prefix: &str, region: &str, endpoint: Option<&str>, expected: &str) {
        assert_eq!(resolve(prefix, region, endpoint), expected);
    }
}
