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

use crate::Credential;
use async_trait::async_trait;
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqapi_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use reqapi_core::time::{format_date, format_iso8601, now, DateTime};
use reqapi_core::{Context, Error, Result, SignRequest, SigningRequest};
use std::fmt::Write;
use std::time::Duration;

/// Hex digest of the payload, or `UNSIGNED-PAYLOAD`.
pub const X_AMZ_CONTENT_SHA_256: &str = "x-amz-content-sha256";
/// Signing time in ISO 8601 basic format.
pub const X_AMZ_DATE: &str = "x-amz-date";
/// Session token of temporary credentials.
pub const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Unreserved characters of [AWS UriEncode](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html)
/// stay as they are, so does `/` in paths.
const AWS_URI_ENCODE_SET: AsciiSet = AWS_QUERY_ENCODE_SET.remove(b'/');
const AWS_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// RequestSigner that implements AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// The payload hash is read from the `x-amz-content-sha256` header. Callers
/// that want the body covered by the signature set that header before
/// signing; requests without it are signed as `UNSIGNED-PAYLOAD`.
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,
    double_encode_path: bool,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer bound to the `service` and `region` scope.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            double_encode_path: true,

            time: None,
        }
    }

    /// Encode the already encoded path once more when building the
    /// canonical request.
    ///
    /// Every service except S3 expects this, so it's enabled by default.
    pub fn with_double_encode_path(mut self, enabled: bool) -> Self {
        self.double_encode_path = enabled;
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// The credential scope for the given signing time.
    ///
    /// Looks like `20220313/<region>/<service>/aws4_request`.
    pub fn scope(&self, time: DateTime) -> String {
        format!(
            "{}/{}/{}/aws4_request",
            format_date(time),
            self.region,
            self.service
        )
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Ok(());
        };

        let now = self.time.unwrap_or_else(now);
        let scope = self.scope(now);
        debug!("calculated scope: {scope}");
        let mut signed_req = SigningRequest::build(req)?;

        canonicalize_header(&mut signed_req, cred, expires_in, now)?;
        canonicalize_query(&mut signed_req, cred, expires_in, now, &scope);

        let creq = canonical_request(&signed_req, self.double_encode_path)?;
        debug!("calculated canonical request: {creq}");

        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "{ALGORITHM}")?;
            writeln!(f, "{}", format_iso8601(now))?;
            writeln!(f, "{scope}")?;
            write!(f, "{}", hex_sha256(creq.as_bytes()))?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = signing_key(&cred.secret_access_key, now, &self.region, &self.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        if expires_in.is_some() {
            signed_req
                .query
                .push(("X-Amz-Signature".to_string(), signature));
        } else {
            let mut authorization = HeaderValue::from_str(&format!(
                "{ALGORITHM} Credential={}/{scope}, SignedHeaders={}, Signature={signature}",
                cred.access_key_id,
                signed_req.header_name_to_vec_sorted().join(";"),
            ))?;
            authorization.set_sensitive(true);

            signed_req
                .headers
                .insert(header::AUTHORIZATION, authorization);
        }

        signed_req.apply(req)
    }
}

/// Build the canonical request.
///
/// ```text
/// <method>
/// <canonical path>
/// <canonical query>
/// <header>:<value>\n...
///
/// <signed headers>
/// <payload hash>
/// ```
fn canonical_request(req: &SigningRequest, double_encode_path: bool) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    writeln!(f, "{}", req.method)?;
    if double_encode_path {
        writeln!(f, "{}", utf8_percent_encode(&req.path, &AWS_URI_ENCODE_SET))?;
    } else {
        let path = percent_decode_str(&req.path)
            .decode_utf8()
            .map_err(|e| Error::request_invalid("request path is not valid utf-8").with_source(e))?;
        writeln!(f, "{}", utf8_percent_encode(&path, &AWS_URI_ENCODE_SET))?;
    }
    writeln!(
        f,
        "{}",
        req.query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    )?;

    let signed_headers = req.header_name_to_vec_sorted();
    for name in signed_headers.iter() {
        let values = req
            .headers
            .get_all(*name)
            .iter()
            .map(|v| v.to_str())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        writeln!(f, "{name}:{}", values.join(","))?;
    }
    writeln!(f)?;
    writeln!(f, "{}", signed_headers.join(";"))?;

    match req.headers.get(X_AMZ_CONTENT_SHA_256) {
        Some(v) => write!(f, "{}", v.to_str()?)?,
        None => write!(f, "{UNSIGNED_PAYLOAD}")?,
    }

    Ok(f)
}

fn canonicalize_header(
    req: &mut SigningRequest,
    cred: &Credential,
    expires_in: Option<Duration>,
    now: DateTime,
) -> Result<()> {
    // Header names and values need to be normalized according to Step 4 of https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html
    for (_, value) in req.headers.iter_mut() {
        SigningRequest::header_value_normalize(value)
    }

    if req.headers.get(header::HOST).is_none() {
        let host = HeaderValue::from_str(req.authority.as_str())?;
        req.headers.insert(header::HOST, host);
    }

    // Presigned requests carry these values in the query instead.
    if expires_in.is_some() {
        return Ok(());
    }

    req.headers
        .insert(X_AMZ_DATE, HeaderValue::from_str(&format_iso8601(now))?);

    if let Some(token) = &cred.session_token {
        let mut value = HeaderValue::from_str(token)?;
        value.set_sensitive(true);
        req.headers.insert(X_AMZ_SECURITY_TOKEN, value);
    }

    Ok(())
}

fn canonicalize_query(
    req: &mut SigningRequest,
    cred: &Credential,
    expires_in: Option<Duration>,
    now: DateTime,
    scope: &str,
) {
    if let Some(expire) = expires_in {
        let signed_headers = req.header_name_to_vec_sorted().join(";");
        req.query.push(("X-Amz-Algorithm".into(), ALGORITHM.into()));
        req.query.push((
            "X-Amz-Credential".into(),
            format!("{}/{scope}", cred.access_key_id),
        ));
        req.query.push(("X-Amz-Date".into(), format_iso8601(now)));
        req.query
            .push(("X-Amz-Expires".into(), expire.as_secs().to_string()));
        req.query.push(("X-Amz-SignedHeaders".into(), signed_headers));

        if let Some(token) = &cred.session_token {
            req.query
                .push(("X-Amz-Security-Token".into(), token.into()));
        }
    }

    let mut query = req
        .query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    query.sort();
    req.query = query;
}

fn signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    let secret = format!("AWS4{secret}");
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    let sign_region = hmac_sha256(&sign_date, region.as_bytes());
    let sign_service = hmac_sha256(&sign_region, service.as_bytes());
    hmac_sha256(&sign_service, b"aws4_request")
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_credential_types::Credentials;
    use aws_sigv4::http_request::{
        PayloadChecksumKind, PercentEncodingMode, SignableBody, SignableRequest,
        SignatureLocation, SigningSettings,
    };
    use aws_sigv4::sign::v4;
    use http::Request;
    use pretty_assertions::assert_eq;
    use std::time::SystemTime;
    use test_case::test_case;

    fn query_request() -> Request<&'static str> {
        Request::builder()
            .method("POST")
            .uri("https://cloudformation.us-east-1.amazonaws.com/")
            .header(
                header::CONTENT_TYPE,
                "application/x-www-form-urlencoded; charset=utf-8",
            )
            .body("Action=DescribeStacks&Version=2010-05-15")
            .expect("request must be valid")
    }

    fn rest_request() -> Request<&'static str> {
        Request::builder()
            .method("GET")
            .uri("https://lambda.us-east-1.amazonaws.com/2015-03-31/functions/arn%3Aaws%3Alambda%3Aus-east-1%3A123456789012%3Afunction%3Ademo/configuration?Qualifier=%24LATEST")
            .body("")
            .expect("request must be valid")
    }

    fn json_request() -> Request<&'static str> {
        Request::builder()
            .method("POST")
            .uri("https://sqs.us-east-1.amazonaws.com/")
            .header(header::CONTENT_TYPE, "application/x-amz-json-1.0")
            .header("x-amz-target", "AmazonSQS.CreateQueue")
            .body(r#"{"QueueName":"demo"}"#)
            .expect("request must be valid")
    }

    fn with_payload_hash(mut req: Request<&'static str>) -> Request<&'static str> {
        let digest = hex_sha256(req.body().as_bytes());
        req.headers_mut().insert(
            X_AMZ_CONTENT_SHA_256,
            HeaderValue::from_str(&digest).expect("digest must be valid"),
        );
        req
    }

    fn reference_sign(
        req: &mut Request<&'static str>,
        service: &str,
        token: Option<&str>,
        expires_in: Option<Duration>,
        now: DateTime,
    ) {
        let mut ss = SigningSettings::default();
        ss.percent_encoding_mode = PercentEncodingMode::Double;
        ss.payload_checksum_kind = PayloadChecksumKind::XAmzSha256;
        if let Some(expires_in) = expires_in {
            ss.signature_location = SignatureLocation::QueryParams;
            ss.expires_in = Some(expires_in);
        }
        let id = Credentials::new(
            "access_key_id",
            "secret_access_key",
            token.map(|v| v.to_string()),
            None,
            "hardcoded-credentials",
        )
        .into();
        let sp = v4::SigningParams::builder()
            .identity(&id)
            .region("us-east-1")
            .name(service)
            .time(SystemTime::from(now))
            .settings(ss)
            .build()
            .expect("signing params must be valid");

        let mut body = SignableBody::UnsignedPayload;
        if req.headers().get(X_AMZ_CONTENT_SHA_256).is_some() {
            body = SignableBody::Bytes(req.body().as_bytes());
        }

        let output = aws_sigv4::http_request::sign(
            SignableRequest::new(
                req.method().as_str(),
                req.uri().to_string(),
                req.headers()
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.to_str().expect("header must be valid"))),
                body,
            )
            .expect("signable request must be valid"),
            &sp.into(),
        )
        .expect("signing must succeed");
        let (instructions, _) = output.into_parts();
        instructions.apply_to_request_http1x(req);
    }

    #[track_caller]
    fn compare_request(name: &str, l: &Request<&str>, r: &Request<&str>) {
        fn format_headers(req: &Request<&str>) -> Vec<String> {
            let mut hs = req
                .headers()
                .iter()
                .filter(|(k, _)| *k != header::HOST)
                .map(|(k, v)| format!("{}:{}", k, v.to_str().expect("must be valid")))
                .collect::<Vec<_>>();
            hs.sort();
            hs
        }

        assert_eq!(
            format_headers(l),
            format_headers(r),
            "{name} header mismatch"
        );

        fn format_query(req: &Request<&str>) -> Vec<String> {
            let query = req.uri().query().unwrap_or_default();
            let mut query = form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| format!("{}={}", &k, &v))
                .collect::<Vec<_>>();
            query.sort();
            query
        }

        assert_eq!(format_query(l), format_query(r), "{name} query mismatch");
    }

    #[test_case("cloudformation", query_request, None; "query")]
    #[test_case("lambda", rest_request, None; "rest")]
    #[test_case("sqs", json_request, None; "json")]
    #[test_case("sqs", json_request, Some("security_token"); "json_with_token")]
    #[test_case("lambda", rest_request, Some("security_token"); "rest_with_token")]
    #[tokio::test]
    async fn test_sign_matches_reference(
        service: &str,
        req_fn: fn() -> Request<&'static str>,
        token: Option<&str>,
    ) -> anyhow::Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();
        let now = now();

        let mut expected = with_payload_hash(req_fn());
        reference_sign(&mut expected, service, token, None, now);

        let (mut parts, body) = with_payload_hash(req_fn()).into_parts();
        let cred = Credential {
            access_key_id: "access_key_id".to_string(),
            secret_access_key: "secret_access_key".to_string(),
            session_token: token.map(|v| v.to_string()),
            expires_in: None,
        };
        RequestSigner::new(service, "us-east-1")
            .with_time(now)
            .sign_request(&Context::new(), &mut parts, Some(&cred), None)
            .await?;
        let actual = Request::from_parts(parts, body);

        compare_request(service, &expected, &actual);
        Ok(())
    }

    #[tokio::test]
    async fn test_presign_matches_reference() -> anyhow::Result<()> {
        let now = now();
        let expires_in = Duration::from_secs(3600);

        let mut expected = rest_request();
        reference_sign(&mut expected, "lambda", None, Some(expires_in), now);

        let (mut parts, body) = rest_request().into_parts();
        let cred = Credential {
            access_key_id: "access_key_id".to_string(),
            secret_access_key: "secret_access_key".to_string(),
            ..Default::default()
        };
        RequestSigner::new("lambda", "us-east-1")
            .with_time(now)
            .sign_request(&Context::new(), &mut parts, Some(&cred), Some(expires_in))
            .await?;
        let actual = Request::from_parts(parts, body);

        compare_request("presign", &expected, &actual);
        Ok(())
    }

    #[tokio::test]
    async fn test_anonymous_request_is_untouched() -> anyhow::Result<()> {
        let (mut parts, _) = query_request().into_parts();
        RequestSigner::new("cloudformation", "us-east-1")
            .sign_request(&Context::new(), &mut parts, None, None)
            .await?;

        assert!(parts.headers.get(header::AUTHORIZATION).is_none());
        assert!(parts.headers.get(X_AMZ_DATE).is_none());
        Ok(())
    }

    #[test]
    fn test_scope() {
        let time = chrono::DateTime::parse_from_rfc3339("2015-08-30T12:36:00Z")
            .expect("time must be valid")
            .with_timezone(&chrono::Utc);
        let signer = RequestSigner::new("sqs", "eu-west-1");
        assert_eq!(signer.scope(time), "20150830/eu-west-1/sqs/aws4_request");
    }
}
