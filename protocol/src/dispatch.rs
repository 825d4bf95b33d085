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

use crate::endpoint::{self, ServiceId};
use crate::json::{self, ResponseParts};
use crate::query::{xml, QueryParams, QueryProtocol};
use crate::rest::{JsonTarget, RestRequest};
use crate::{Config, FromFault, SdkError, ServiceFault};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::response::Parts;
use http::{HeaderValue, Method, StatusCode};
use log::debug;
use reqapi_aws_v4::{Credential, RequestSigner, X_AMZ_CONTENT_SHA_256};
use reqapi_core::hash::hex_sha256;
use reqapi_core::{Context, ErrorKind, ProvideCredential, RequestTimeout, Result, Signer};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Sends signed requests to one service endpoint and turns responses into
/// typed outputs or typed errors.
///
/// Cloning is cheap, clones share the signer and its cached credential.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    signer: Signer<Credential>,
    endpoint: Arc<str>,
    timeout: Option<Duration>,
}

impl Dispatcher {
    /// Create a dispatcher sending to `endpoint`.
    pub fn new(signer: Signer<Credential>, endpoint: impl Into<String>) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            signer,
            endpoint: Arc::from(endpoint.trim_end_matches('/')),
            timeout: None,
        }
    }

    /// Create a dispatcher for `service` as described by `config`.
    pub fn from_config(
        ctx: Context,
        config: &Config,
        service: ServiceId,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Result<Self> {
        let region = config.region()?;
        let endpoint = endpoint::resolve(
            service.endpoint_prefix,
            region,
            config.endpoint.as_deref(),
        );
        debug!("resolved endpoint of {}: {endpoint}", service.signing_name);

        let signer = Signer::new(ctx, provider, RequestSigner::new(service.signing_name, region));
        Ok(Self::new(signer, endpoint).with_timeout(config.timeout))
    }

    /// Set the timeout of every call, `None` removes it.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The timeout of every call.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Sign and send a request.
    ///
    /// The body digest is set as `x-amz-content-sha256` before signing so
    /// the payload is covered by the signature.
    pub async fn send<E>(
        &self,
        req: http::Request<Bytes>,
    ) -> std::result::Result<(Parts, Bytes), SdkError<E>> {
        let (mut parts, body) = req.into_parts();

        let digest = HeaderValue::from_str(&hex_sha256(&body))
            .map_err(|e| SdkError::Request(e.into()))?;
        parts.headers.insert(X_AMZ_CONTENT_SHA_256, digest);
        self.signer
            .sign(&mut parts, None)
            .await
            .map_err(SdkError::Request)?;
        if let Some(timeout) = self.timeout {
            parts.extensions.insert(RequestTimeout(timeout));
        }

        debug!("sending request: {} {}", parts.method, parts.uri);
        let resp = self
            .signer
            .context()
            .http_send(http::Request::from_parts(parts, body))
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::Transport => SdkError::Transport(err),
                _ => SdkError::Request(err),
            })?;

        let (parts, body) = resp.into_parts();
        debug!("got response: {}", parts.status);
        Ok((parts, body))
    }

    /// Call a Query `action` and decode its `{action}Result` into `O`.
    pub async fn call_query<T, O, E>(
        &self,
        protocol: &QueryProtocol,
        action: &str,
        input: &T,
    ) -> std::result::Result<O, SdkError<E>>
    where
        T: Serialize + ?Sized,
        O: DeserializeOwned,
        E: FromFault,
    {
        let body = self.exchange_query(protocol, action, input).await?;
        xml::from_result(&body, action).map_err(SdkError::Decode)
    }

    /// Call a Query `action` that returns no output.
    pub async fn call_query_empty<T, E>(
        &self,
        protocol: &QueryProtocol,
        action: &str,
        input: &T,
    ) -> std::result::Result<(), SdkError<E>>
    where
        T: Serialize + ?Sized,
        E: FromFault,
    {
        self.exchange_query(protocol, action, input).await?;
        Ok(())
    }

    async fn exchange_query<T, E>(
        &self,
        protocol: &QueryProtocol,
        action: &str,
        input: &T,
    ) -> std::result::Result<Bytes, SdkError<E>>
    where
        T: Serialize + ?Sized,
        E: FromFault,
    {
        let params = QueryParams::new(action, protocol.version)
            .with_input(input, protocol.list_style)
            .map_err(SdkError::Request)?;
        let req = http::Request::builder()
            .method(Method::POST)
            .uri(format!("{}/", self.endpoint))
            .header(
                CONTENT_TYPE,
                "application/x-www-form-urlencoded; charset=utf-8",
            )
            .body(Bytes::from(params.to_form_body()))
            .map_err(|e| SdkError::Request(e.into()))?;

        debug!("calling {action}");
        let (parts, body) = self.send(req).await?;
        if parts.status.is_success() {
            return Ok(body);
        }

        match xml::parse_error(&body) {
            Some(fault) => Err(service_error(&parts, fault)),
            None => Err(SdkError::UnexpectedStatus {
                status: parts.status,
                body,
            }),
        }
    }

    /// Call a REST operation.
    ///
    /// A response with the `expected` status (any 2xx when `None`) is
    /// passed to `decode`, anything else is turned into an error.
    pub async fn call_rest<O, E, F>(
        &self,
        operation: &str,
        req: RestRequest,
        expected: Option<StatusCode>,
        decode: F,
    ) -> std::result::Result<O, SdkError<E>>
    where
        E: FromFault,
        F: FnOnce(ResponseParts<'_>, Bytes) -> Result<O>,
    {
        let req = req.build(&self.endpoint).map_err(SdkError::Request)?;

        debug!("calling {operation}");
        let (parts, body) = self.send(req).await?;
        let ok = match expected {
            Some(status) => parts.status == status,
            None => parts.status.is_success(),
        };
        if ok {
            return decode(ResponseParts::new(&parts), body).map_err(|err| {
                SdkError::Decode(err.with_context(format!("operation: {operation}")))
            });
        }

        match json::parse_error(&parts, &body) {
            Some(fault) => Err(service_error(&parts, fault)),
            None => Err(SdkError::UnexpectedStatus {
                status: parts.status,
                body,
            }),
        }
    }

    /// Call a JSON protocol operation and decode its body into `O`.
    pub async fn call_json<T, O, E>(
        &self,
        target: &JsonTarget,
        operation: &str,
        input: &T,
    ) -> std::result::Result<O, SdkError<E>>
    where
        T: Serialize + ?Sized,
        O: DeserializeOwned,
        E: FromFault,
    {
        let req = target.request(operation, input).map_err(SdkError::Request)?;
        self.call_rest(operation, req, Some(StatusCode::OK), |_, body| {
            json::from_slice(&body)
        })
        .await
    }

    /// Call a JSON protocol operation that returns no output.
    pub async fn call_json_empty<T, E>(
        &self,
        target: &JsonTarget,
        operation: &str,
        input: &T,
    ) -> std::result::Result<(), SdkError<E>>
    where
        T: Serialize + ?Sized,
        E: FromFault,
    {
        let req = target.request(operation, input).map_err(SdkError::Request)?;
        self.call_rest(operation, req, Some(StatusCode::OK), |_, _| Ok(()))
            .await
    }
}

fn service_error<E: FromFault>(parts: &Parts, mut fault: ServiceFault) -> SdkError<E> {
    if fault.request_id.is_none() {
        fault.request_id = parts
            .headers
            .get("x-amzn-requestid")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
    }
    debug!("service returned {} ({})", fault.code, parts.status);

    SdkError::Service {
        status: parts.status,
        request_id: fault.request_id.clone(),
        error: E::from_fault(fault),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ListStyle;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use reqapi_aws_v4::StaticCredentialProvider;
    use reqapi_core::{Error, HttpSend};
    use serde::Deserialize;
    use std::sync::Mutex;

    crate::service_error! {
        enum TestError {
            NotFound = "ResourceNotFoundException",
            Validation = "ValidationError",
        }
    }

    #[derive(Debug)]
    struct MockHttpSend {
        status: u16,
        headers: Vec<(&'static str, &'static str)>,
        body: &'static str,
        requests: Arc<Mutex<Vec<http::Request<Bytes>>>>,
    }

    impl MockHttpSend {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                headers: Vec::new(),
                body,
                requests: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl HttpSend for MockHttpSend {
        async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            self.requests.lock().unwrap().push(req);
            let mut resp = http::Response::builder().status(self.status);
            for (k, v) in &self.headers {
                resp = resp.header(*k, *v);
            }
            Ok(resp.body(Bytes::from_static(self.body.as_bytes()))?)
        }
    }

    #[derive(Debug)]
    struct BrokenHttpSend;

    #[async_trait]
    impl HttpSend for BrokenHttpSend {
        async fn http_send(&self, _: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            Err(Error::transport("connection reset by peer"))
        }
    }

    fn dispatcher(http: impl HttpSend) -> Dispatcher {
        let _ = env_logger::builder().is_test(true).try_init();

        let ctx = Context::new().with_http_send(http);
        Dispatcher::from_config(
            ctx,
            &Config::new()
                .with_region("us-east-1")
                .with_timeout(Duration::from_secs(5)),
            ServiceId {
                endpoint_prefix: "cloudformation",
                signing_name: "cloudformation",
            },
            StaticCredentialProvider::new("access_key_id", "secret_access_key"),
        )
        .unwrap()
    }

    const PROTOCOL: QueryProtocol = QueryProtocol {
        version: "2010-05-15",
        list_style: ListStyle::Member,
    };

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Input {
        stack_name: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Output {
        stack_id: String,
    }

    #[tokio::test]
    async fn test_call_query() {
        let http = MockHttpSend::new(
            200,
            "<CreateStackResponse><CreateStackResult><StackId>arn:demo</StackId></CreateStackResult></CreateStackResponse>",
        );
        let requests = http.requests.clone();

        let out: Output = dispatcher(http)
            .call_query::<_, _, TestError>(
                &PROTOCOL,
                "CreateStack",
                &Input {
                    stack_name: "demo".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(out.stack_id, "arn:demo");

        let requests = requests.lock().unwrap();
        let req = &requests[0];
        assert_eq!(req.method(), Method::POST);
        assert_eq!(
            req.uri().to_string(),
            "https://cloudformation.us-east-1.amazonaws.com/"
        );
        assert_eq!(
            req.body().as_ref(),
            b"Action=CreateStack&Version=2010-05-15&StackName=demo"
        );
        assert_eq!(
            req.headers()[X_AMZ_CONTENT_SHA_256],
            hex_sha256(req.body()).as_str()
        );
        assert!(req.headers()["authorization"]
            .to_str()
            .unwrap()
            .contains("/us-east-1/cloudformation/aws4_request"));
        assert_eq!(
            req.extensions().get::<RequestTimeout>(),
            Some(&RequestTimeout(Duration::from_secs(5)))
        );
    }

    #[tokio::test]
    async fn test_call_query_service_error() {
        let http = MockHttpSend::new(
            400,
            "<ErrorResponse><Error><Type>Sender</Type><Code>ValidationError</Code><Message>bad</Message></Error><RequestId>r-1</RequestId></ErrorResponse>",
        );

        let err = dispatcher(http)
            .call_query_empty::<_, TestError>(&PROTOCOL, "DeleteStack", &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(err.request_id(), Some("r-1"));
        assert!(matches!(err.service_error(), Some(TestError::Validation(_))));
    }

    #[tokio::test]
    async fn test_call_query_unexpected_status() {
        let http = MockHttpSend::new(503, "<html>unavailable</html>");

        let err = dispatcher(http)
            .call_query_empty::<_, TestError>(&PROTOCOL, "DeleteStack", &())
            .await
            .unwrap_err();
        match err {
            SdkError::UnexpectedStatus { status, body } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body.as_ref(), b"<html>unavailable</html>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_query_decode_error() {
        let http = MockHttpSend::new(200, "<CreateStackResponse><CreateStackResult>");

        let err = dispatcher(http)
            .call_query::<_, Output, TestError>(
                &PROTOCOL,
                "CreateStack",
                &Input {
                    stack_name: "demo".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn test_transport_error() {
        let err = dispatcher(BrokenHttpSend)
            .call_query_empty::<_, TestError>(&PROTOCOL, "DeleteStack", &())
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_call_rest_expected_status() {
        let http = MockHttpSend {
            headers: vec![("x-amzn-ErrorType", "ResourceNotFoundException")],
            ..MockHttpSend::new(404, r#"{"Type":"User","Message":"Function not found"}"#)
        };

        let err = dispatcher(http)
            .call_rest::<(), TestError, _>(
                "GetFunction",
                RestRequest::new(Method::GET, "/2015-03-31/functions/{FunctionName}")
                    .path_param("FunctionName", "demo"),
                Some(StatusCode::OK),
                |_, _| Ok(()),
            )
            .await
            .unwrap_err();
        let TestError::NotFound(fault) = err.service_error().unwrap() else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(fault.message.as_deref(), Some("Function not found"));

        // A success status that isn't the declared one is not accepted.
        let err = dispatcher(MockHttpSend::new(200, ""))
            .call_rest::<(), TestError, _>(
                "DeleteFunction",
                RestRequest::new(Method::DELETE, "/2015-03-31/functions/demo"),
                Some(StatusCode::NO_CONTENT),
                |_, _| Ok(()),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_missing_credential() {
        #[derive(Debug)]
        struct Nothing;

        #[async_trait]
        impl ProvideCredential for Nothing {
            type Credential = Credential;

            async fn provide_credential(&self, _: &Context) -> Result<Option<Credential>> {
                Ok(None)
            }
        }

        let http = MockHttpSend::new(200, "");
        let requests = http.requests.clone();
        let d = Dispatcher::from_config(
            Context::new().with_http_send(http),
            &Config::new().with_region("us-east-1"),
            ServiceId {
                endpoint_prefix: "sqs",
                signing_name: "sqs",
            },
            Nothing,
        )
        .unwrap();

        let err = d
            .call_json_empty::<_, TestError>(&JsonTarget::new("AmazonSQS"), "ListQueues", &())
            .await
            .unwrap_err();
        let SdkError::Request(err) = err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
        assert!(requests.lock().unwrap().is_empty());
    }
}
