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

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response, StatusCode};
use log::warn;
use pretty_assertions::assert_eq;
use reqapi_aws_v4::{EnvCredentialProvider, StaticCredentialProvider};
use reqapi_cloudformation::model::*;
use reqapi_cloudformation::operation::*;
use reqapi_cloudformation::{Client, CloudFormationError};
use reqapi_core::{Context, ErrorKind, HttpSend, OsEnv, Result};
use reqapi_http_send_reqwest::ReqwestHttpSend;
use reqapi_protocol::query::xml::from_result;
use reqapi_protocol::query::{to_value, QueryValue};
use reqapi_protocol::{Config, SdkError, ServiceClient};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex};
use test_case::test_case;
use tokio::sync::oneshot;

#[derive(Debug, Clone)]
struct MockHttpSend {
    status: StatusCode,
    body: &'static str,
    requests: Arc<Mutex<Vec<Request<Bytes>>>>,
}

impl MockHttpSend {
    fn new(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            body,
            requests: Arc::default(),
        }
    }

    fn form(&self) -> HashMap<String, String> {
        let requests = self.requests.lock().unwrap();
        let req = requests.last().expect("a request must be sent");
        form_urlencoded::parse(req.body()).into_owned().collect()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        self.requests.lock().unwrap().push(req);
        Ok(Response::builder()
            .status(self.status)
            .header("x-amzn-requestid", "c4f1d3a0-example")
            .body(Bytes::from_static(self.body.as_bytes()))?)
    }
}

fn client(http: &MockHttpSend) -> Client {
    let _ = env_logger::builder().is_test(true).try_init();

    Client::new(
        Context::new().with_http_send(http.clone()),
        &Config::new().with_region("us-east-1"),
        StaticCredentialProvider::new("access_key_id", "secret_access_key"),
    )
    .expect("client must be created")
}

const DESCRIBE_STACKS: &str = r#"<DescribeStacksResponse xmlns="http://cloudformation.amazonaws.com/doc/2010-05-15/">
  <DescribeStacksResult>
    <Stacks>
      <member>
        <StackName>network</StackName>
        <StackId>arn:aws:cloudformation:us-east-1:123456789012:stack/network/1</StackId>
        <CreationTime>2010-07-27T22:28:28Z</CreationTime>
        <StackStatus>CREATE_COMPLETE</StackStatus>
        <DisableRollback>false</DisableRollback>
        <Parameters>
          <member>
            <ParameterKey>CidrBlock</ParameterKey>
            <ParameterValue>10.0.0.0/16</ParameterValue>
          </member>
        </Parameters>
        <Outputs>
          <member>
            <OutputKey>VpcId</OutputKey>
            <OutputValue>vpc-0123</OutputValue>
          </member>
        </Outputs>
      </member>
      <member>
        <StackName>app</StackName>
        <CreationTime>2010-07-28T10:00:00.123Z</CreationTime>
        <StackStatus>UPDATE_ROLLBACK_COMPLETE</StackStatus>
        <NotificationARNs>
          <member>arn:aws:sns:us-east-1:123456789012:topic</member>
        </NotificationARNs>
        <Capabilities>
          <member>CAPABILITY_IAM</member>
          <member>CAPABILITY_AUTO_EXPAND</member>
        </Capabilities>
      </member>
    </Stacks>
  </DescribeStacksResult>
  <ResponseMetadata>
    <RequestId>b9b4b068-3a41-11e5-94eb-example</RequestId>
  </ResponseMetadata>
</DescribeStacksResponse>"#;

#[tokio::test]
async fn test_describe_stacks() {
    let http = MockHttpSend::new(StatusCode::OK, DESCRIBE_STACKS);

    let out = client(&http)
        .describe_stacks(DescribeStacksInput::default())
        .await
        .unwrap();

    assert_eq!(out.stacks.len(), 2);
    assert_eq!(out.next_token, None);

    let network = &out.stacks[0];
    assert_eq!(network.stack_name, "network");
    assert_eq!(network.stack_status, StackStatus::CreateComplete);
    assert_eq!(network.disable_rollback, Some(false));
    assert_eq!(
        network.parameters,
        Some(vec![Parameter::new("CidrBlock", "10.0.0.0/16")])
    );
    assert_eq!(
        network.outputs.as_ref().unwrap()[0].output_value.as_deref(),
        Some("vpc-0123")
    );
    assert_eq!(network.creation_time.to_rfc3339(), "2010-07-27T22:28:28+00:00");

    let app = &out.stacks[1];
    assert_eq!(app.stack_name, "app");
    assert_eq!(app.stack_status, StackStatus::UpdateRollbackComplete);
    assert_eq!(app.parameters, None);
    assert_eq!(
        app.capabilities,
        Some(vec![Capability::Iam, Capability::AutoExpand])
    );
    assert_eq!(
        app.notification_arns,
        Some(vec!["arn:aws:sns:us-east-1:123456789012:topic".to_string()])
    );

    assert_eq!(
        http.form(),
        HashMap::from([
            ("Action".to_string(), "DescribeStacks".to_string()),
            ("Version".to_string(), "2010-05-15".to_string()),
        ])
    );
}

#[tokio::test]
async fn test_create_stack_encoding() {
    let http = MockHttpSend::new(
        StatusCode::OK,
        r#"<CreateStackResponse><CreateStackResult><StackId>arn:aws:cloudformation:us-east-1:123456789012:stack/app/2</StackId></CreateStackResult></CreateStackResponse>"#,
    );

    let out = client(&http)
        .create_stack(CreateStackInput {
            stack_name: "app".to_string(),
            template_url: Some("https://s3.amazonaws.com/bucket/app.json".to_string()),
            parameters: Some(vec![
                Parameter::new("Env", "prod"),
                Parameter {
                    parameter_key: Some("Size".to_string()),
                    use_previous_value: Some(true),
                    ..Default::default()
                },
            ]),
            capabilities: Some(vec![Capability::Iam, Capability::NamedIam]),
            on_failure: Some(OnFailure::Delete),
            tags: Some(vec![Tag {
                key: "team".to_string(),
                value: "infra".to_string(),
            }]),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(
        out.stack_id.as_deref(),
        Some("arn:aws:cloudformation:us-east-1:123456789012:stack/app/2")
    );

    let form = http.form();
    let expected = [
        ("Action", "CreateStack"),
        ("Version", "2010-05-15"),
        ("StackName", "app"),
        ("TemplateURL", "https://s3.amazonaws.com/bucket/app.json"),
        ("Parameters.member.1.ParameterKey", "Env"),
        ("Parameters.member.1.ParameterValue", "prod"),
        ("Parameters.member.2.ParameterKey", "Size"),
        ("Parameters.member.2.UsePreviousValue", "true"),
        ("Capabilities.member.1", "CAPABILITY_IAM"),
        ("Capabilities.member.2", "CAPABILITY_NAMED_IAM"),
        ("OnFailure", "DELETE"),
        ("Tags.member.1.Key", "team"),
        ("Tags.member.1.Value", "infra"),
    ];
    assert_eq!(
        form,
        expected
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
    );
}

#[test_case(vec![StackStatus::CreateComplete], &["StackStatusFilter.member.1"]; "one")]
#[test_case(vec![StackStatus::CreateComplete, StackStatus::DeleteFailed, StackStatus::ReviewInProgress], &["StackStatusFilter.member.1", "StackStatusFilter.member.2", "StackStatusFilter.member.3"]; "three")]
#[tokio::test]
async fn test_list_flattening(filter: Vec<StackStatus>, keys: &[&str]) {
    let http = MockHttpSend::new(
        StatusCode::OK,
        r#"<ListStacksResponse><ListStacksResult><StackSummaries/></ListStacksResult></ListStacksResponse>"#,
    );

    let out = client(&http)
        .list_stacks(ListStacksInput {
            stack_status_filter: Some(filter.clone()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(out.stack_summaries.is_empty());

    let form = http.form();
    assert!(!form.contains_key("StackStatusFilter"));
    for (key, status) in keys.iter().zip(&filter) {
        assert_eq!(form[*key], status.as_str());
    }
    assert_eq!(form.len(), keys.len() + 2);
}

#[tokio::test]
async fn test_unknown_enum_is_decode_error() {
    let http = MockHttpSend::new(
        StatusCode::OK,
        r#"<DescribeStacksResponse><DescribeStacksResult><Stacks><member>
<StackName>app</StackName>
<CreationTime>2010-07-27T22:28:28Z</CreationTime>
<StackStatus>SOMETHING_NEW</StackStatus>
</member></Stacks></DescribeStacksResult></DescribeStacksResponse>"#,
    );

    let err = client(&http)
        .describe_stacks(DescribeStacksInput::default())
        .await
        .unwrap_err();
    let SdkError::Decode(err) = err else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn test_empty_output() {
    let http = MockHttpSend::new(
        StatusCode::OK,
        r#"<DeleteStackResponse><ResponseMetadata><RequestId>r-1</RequestId></ResponseMetadata></DeleteStackResponse>"#,
    );

    client(&http)
        .delete_stack(DeleteStackInput {
            stack_name: "app".to_string(),
            retain_resources: Some(vec!["Bucket".to_string()]),
            ..Default::default()
        })
        .await
        .unwrap();

    let form = http.form();
    assert_eq!(form["Action"], "DeleteStack");
    assert_eq!(form["RetainResources.member.1"], "Bucket");
    assert!(!form.contains_key("RoleARN"));
}

#[tokio::test]
async fn test_signal_resource() {
    let http = MockHttpSend::new(
        StatusCode::OK,
        r#"<SignalResourceResponse><ResponseMetadata><RequestId>r-2</RequestId></ResponseMetadata></SignalResourceResponse>"#,
    );

    client(&http)
        .signal_resource(SignalResourceInput {
            stack_name: "app".to_string(),
            logical_resource_id: "WaitCondition".to_string(),
            unique_id: "i-1234".to_string(),
            status: ResourceSignalStatus::Success,
        })
        .await
        .unwrap();

    assert_eq!(http.form()["Status"], "SUCCESS");
}

#[tokio::test]
async fn test_service_error() {
    let http = MockHttpSend::new(
        StatusCode::BAD_REQUEST,
        r#"<ErrorResponse xmlns="http://cloudformation.amazonaws.com/doc/2010-05-15/">
  <Error>
    <Type>Sender</Type>
    <Code>ValidationError</Code>
    <Message>Stack with id missing does not exist</Message>
  </Error>
  <RequestId>42d5b0c1-example</RequestId>
</ErrorResponse>"#,
    );

    let err = client(&http)
        .describe_stacks(DescribeStacksInput {
            stack_name: Some("missing".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(!err.is_transport());
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(err.request_id(), Some("42d5b0c1-example"));
    match err.into_service_error() {
        Some(CloudFormationError::Validation(fault)) => assert_eq!(
            fault.message.as_deref(),
            Some("Stack with id missing does not exist")
        ),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_error_code() {
    let http = MockHttpSend::new(
        StatusCode::BAD_REQUEST,
        r#"<ErrorResponse><Error><Code>StackSetNotFoundException</Code></Error></ErrorResponse>"#,
    );

    let err = client(&http)
        .list_exports(ListExportsInput::default())
        .await
        .unwrap_err();
    let service = err.service_error().unwrap();
    assert!(matches!(service, CloudFormationError::Unknown(_)));
    assert_eq!(service.code(), "StackSetNotFoundException");
    // The request id falls back to the response header.
    assert_eq!(err.request_id(), Some("c4f1d3a0-example"));
}

#[tokio::test]
async fn test_spawn_delivers_result() {
    let http = MockHttpSend::new(StatusCode::OK, DESCRIBE_STACKS);
    let client = client(&http);
    let (tx, rx) = oneshot::channel();

    client
        .spawn(
            |c| async move { c.describe_stacks(DescribeStacksInput::default()).await },
            move |res| {
                let _ = tx.send(res.map(|out| out.stacks.len()));
            },
        )
        .unwrap();

    assert_eq!(rx.await.unwrap().unwrap(), 2);
    client.close().await;
}

/// Render an encoded value the way the service echoes it back in XML.
fn to_xml(value: &QueryValue, out: &mut String) {
    match value {
        QueryValue::String(v) => out.push_str(&quick_xml::escape::escape(v.as_str())),
        QueryValue::Object(fields) => {
            for (name, value) in fields {
                out.push_str(&format!("<{name}>"));
                to_xml(value, out);
                out.push_str(&format!("</{name}>"));
            }
        }
        QueryValue::Array(items) => {
            for item in items {
                out.push_str("<member>");
                to_xml(item, out);
                out.push_str("</member>");
            }
        }
        QueryValue::Map(entries) => {
            for (key, value) in entries {
                out.push_str(&format!("<entry><key>{key}</key><value>"));
                to_xml(value, out);
                out.push_str("</value></entry>");
            }
        }
    }
}

fn query_round_trip<T>(v: &T) -> T
where
    T: Serialize + DeserializeOwned + Default,
{
    #[derive(Deserialize)]
    struct Holder<T> {
        #[serde(rename = "Item", default)]
        item: T,
    }

    let mut body = String::from("<EchoResponse><EchoResult>");
    if let Some(value) = to_value(v).unwrap() {
        body.push_str("<Item>");
        to_xml(&value, &mut body);
        body.push_str("</Item>");
    }
    body.push_str("</EchoResult></EchoResponse>");

    from_result::<Holder<T>>(body.as_bytes(), "Echo").unwrap().item
}

#[test_case(Parameter::default(); "parameter without fields")]
#[test_case(Parameter {
    parameter_key: Some("DbPassword".to_string()),
    parameter_value: Some("p&ss<word>".to_string()),
    use_previous_value: Some(false),
    resolved_value: Some("resolved".to_string()),
}; "parameter with every field")]
fn test_parameter_round_trip(v: Parameter) {
    assert_eq!(query_round_trip(&v), v);
}

#[test]
fn test_tag_round_trip() {
    let v = Tag {
        key: "cost-center".to_string(),
        value: "42 & more".to_string(),
    };
    assert_eq!(query_round_trip(&v), v);
}

#[test_case(RollbackConfiguration::default(); "rollback configuration without fields")]
#[test_case(RollbackConfiguration {
    rollback_triggers: Some(vec![
        RollbackTrigger {
            arn: "arn:aws:cloudwatch:us-east-1:123456789012:alarm:errors".to_string(),
            r#type: "AWS::CloudWatch::Alarm".to_string(),
        },
        RollbackTrigger {
            arn: "arn:aws:cloudwatch:us-east-1:123456789012:alarm:latency".to_string(),
            r#type: "AWS::CloudWatch::Alarm".to_string(),
        },
    ]),
    monitoring_time_in_minutes: Some(30),
}; "rollback configuration with every field")]
fn test_rollback_configuration_round_trip(v: RollbackConfiguration) {
    assert_eq!(query_round_trip(&v), v);
}

#[tokio::test]
async fn test_update_stack_clears_notification_arns() {
    let http = MockHttpSend::new(
        StatusCode::OK,
        r#"<UpdateStackResponse><UpdateStackResult><StackId>arn:aws:cloudformation:us-east-1:123456789012:stack/app/2</StackId></UpdateStackResult></UpdateStackResponse>"#,
    );
    let client = client(&http);

    client
        .update_stack(UpdateStackInput {
            stack_name: "app".to_string(),
            use_previous_template: Some(true),
            notification_arns: Some(vec![]),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(http.form().get("NotificationARNs").map(String::as_str), Some(""));

    client
        .update_stack(UpdateStackInput {
            stack_name: "app".to_string(),
            use_previous_template: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(http.form().get("NotificationARNs"), None);
}

#[test]
fn test_missing_region() {
    let err = Client::new(
        Context::new(),
        &Config::new(),
        StaticCredentialProvider::new("access_key_id", "secret_access_key"),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[tokio::test]
async fn test_list_exports_live() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("REQAPI_CLOUDFORMATION_TEST").unwrap_or_default() != "on" {
        warn!("REQAPI_CLOUDFORMATION_TEST is not set, skipped");
        return Ok(());
    }

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let client = Client::new(ctx, &Config::new(), EnvCredentialProvider::new())?;

    let out = client.list_exports(ListExportsInput::default()).await?;
    for export in out.exports.unwrap_or_default() {
        log::debug!("export: {export:?}");
    }
    Ok(())
}
