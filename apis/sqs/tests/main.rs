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
use http::{Method, Request, Response, StatusCode};
use log::warn;
use pretty_assertions::assert_eq;
use reqapi_aws_v4::{EnvCredentialProvider, StaticCredentialProvider};
use reqapi_core::{Context, HttpSend, OsEnv, Result};
use reqapi_http_send_reqwest::ReqwestHttpSend;
use reqapi_protocol::{Config, SdkError, ServiceClient};
use reqapi_sqs::model::*;
use reqapi_sqs::operation::*;
use reqapi_sqs::{Client, SqsError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex};
use test_case::test_case;
use tokio::sync::oneshot;

const QUEUE_URL: &str = "https://sqs.us-east-1.amazonaws.com/123456789012/jobs";

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

    fn last_request(&self) -> Request<Bytes> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("a request must be sent")
    }

    fn last_json(&self) -> Value {
        serde_json::from_slice(self.last_request().body()).expect("body must be json")
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        self.requests.lock().unwrap().push(req);
        Ok(Response::builder()
            .status(self.status)
            .header("x-amzn-RequestId", "5d8e1a2b-example")
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

#[tokio::test]
async fn test_create_queue_without_attributes() {
    let http = MockHttpSend::new(StatusCode::OK, r#"{"QueueUrl": "https://sqs.us-east-1.amazonaws.com/123456789012/jobs"}"#);

    let out = client(&http)
        .create_queue(CreateQueueInput {
            queue_name: "jobs".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(out.queue_url.as_deref(), Some(QUEUE_URL));

    let req = http.last_request();
    assert_eq!(req.method(), Method::POST);
    assert_eq!(req.uri().to_string(), "https://sqs.us-east-1.amazonaws.com/");
    assert_eq!(req.headers()["x-amz-target"], "AmazonSQS.CreateQueue");
    assert_eq!(req.headers()["content-type"], "application/x-amz-json-1.0");
    assert!(req.headers()["authorization"]
        .to_str()
        .unwrap()
        .contains("/us-east-1/sqs/aws4_request"));
    assert_eq!(http.last_json(), json!({"QueueName": "jobs"}));
}

#[tokio::test]
async fn test_create_queue_with_attributes() {
    let http = MockHttpSend::new(StatusCode::OK, r#"{"QueueUrl": "https://sqs.us-east-1.amazonaws.com/123456789012/jobs.fifo"}"#);

    client(&http)
        .create_queue(CreateQueueInput {
            queue_name: "jobs.fifo".to_string(),
            attributes: Some(HashMap::from([
                (QueueAttributeName::FifoQueue, "true".to_string()),
                (QueueAttributeName::VisibilityTimeout, "60".to_string()),
            ])),
            tags: Some(HashMap::from([("team".to_string(), "infra".to_string())])),
        })
        .await
        .unwrap();

    assert_eq!(
        http.last_json(),
        json!({
            "QueueName": "jobs.fifo",
            "Attributes": {"FifoQueue": "true", "VisibilityTimeout": "60"},
            "tags": {"team": "infra"},
        })
    );
}

#[test_case(None, json!({"QueueUrl": QUEUE_URL, "MessageBody": "hello"}); "without delay")]
#[test_case(Some(15), json!({"QueueUrl": QUEUE_URL, "MessageBody": "hello", "DelaySeconds": 15}); "with delay")]
#[tokio::test]
async fn test_send_message(delay_seconds: Option<i32>, expected: Value) {
    let http = MockHttpSend::new(
        StatusCode::OK,
        r#"{"MD5OfMessageBody": "5d41402abc4b2a76b9719d911017c592", "MessageId": "219f8380-5770-4cc2-8c3e-5c715e145f5e"}"#,
    );

    let out = client(&http)
        .send_message(SendMessageInput {
            queue_url: QUEUE_URL.to_string(),
            message_body: "hello".to_string(),
            delay_seconds,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(
        out.md5_of_message_body.as_deref(),
        Some("5d41402abc4b2a76b9719d911017c592")
    );
    assert_eq!(out.sequence_number, None);
    assert_eq!(http.last_request().headers()["x-amz-target"], "AmazonSQS.SendMessage");
    assert_eq!(http.last_json(), expected);
}

#[tokio::test]
async fn test_send_message_attributes() {
    let http = MockHttpSend::new(StatusCode::OK, r#"{"MessageId": "m-1"}"#);

    client(&http)
        .send_message(SendMessageInput {
            queue_url: QUEUE_URL.to_string(),
            message_body: "resize".to_string(),
            message_attributes: Some(HashMap::from([
                ("width".to_string(), MessageAttributeValue::number(640)),
                ("thumb".to_string(), MessageAttributeValue::binary(&b"\x89PNG"[..])),
            ])),
            message_system_attributes: Some(HashMap::from([(
                MessageSystemAttributeNameForSends::AwsTraceHeader,
                MessageAttributeValue::string("Root=1-5759e988-bd862e3fe1be46a994272793"),
            )])),
            message_group_id: Some("images".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(
        http.last_json(),
        json!({
            "QueueUrl": QUEUE_URL,
            "MessageBody": "resize",
            "MessageAttributes": {
                "width": {"DataType": "Number", "StringValue": "640"},
                "thumb": {"DataType": "Binary", "BinaryValue": "iVBORw=="},
            },
            "MessageSystemAttributes": {
                "AWSTraceHeader": {
                    "DataType": "String",
                    "StringValue": "Root=1-5759e988-bd862e3fe1be46a994272793",
                },
            },
            "MessageGroupId": "images",
        })
    );
}

#[tokio::test]
async fn test_receive_message() {
    let http = MockHttpSend::new(
        StatusCode::OK,
        r#"{
  "Messages": [
    {
      "MessageId": "219f8380-5770-4cc2-8c3e-5c715e145f5e",
      "ReceiptHandle": "AQEBzWwaftRI0KuVm4tP+/7q1rGgNqicHq",
      "MD5OfBody": "5d41402abc4b2a76b9719d911017c592",
      "Body": "hello",
      "Attributes": {"SentTimestamp": "1586452813245", "ApproximateReceiveCount": "1"},
      "MessageAttributes": {"thumb": {"DataType": "Binary", "BinaryValue": "iVBORw=="}}
    },
    {
      "MessageId": "7f6a1b2c-1111-2222-3333-444455556666",
      "ReceiptHandle": "AQEBwJnKyrHigUMZj6rYigCgxlaS3SLy0a",
      "MD5OfBody": "7d793037a0760186574b0282f2f435e7",
      "Body": "world"
    }
  ]
}"#,
    );

    let out = client(&http)
        .receive_message(ReceiveMessageInput {
            queue_url: QUEUE_URL.to_string(),
            attribute_names: Some(vec![
                MessageSystemAttributeName::SentTimestamp,
                MessageSystemAttributeName::ApproximateReceiveCount,
            ]),
            max_number_of_messages: Some(2),
            wait_time_seconds: Some(0),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(out.messages.len(), 2);
    let first = &out.messages[0];
    assert_eq!(first.body.as_deref(), Some("hello"));
    assert_eq!(
        first.attributes.as_ref().unwrap()["ApproximateReceiveCount"],
        "1"
    );
    assert_eq!(
        first.message_attributes.as_ref().unwrap()["thumb"].binary_value,
        Some(Bytes::from_static(b"\x89PNG"))
    );
    assert_eq!(out.messages[1].body.as_deref(), Some("world"));
    assert_eq!(out.messages[1].attributes, None);

    assert_eq!(
        http.last_json(),
        json!({
            "QueueUrl": QUEUE_URL,
            "AttributeNames": ["SentTimestamp", "ApproximateReceiveCount"],
            "MaxNumberOfMessages": 2,
            "WaitTimeSeconds": 0,
        })
    );
}

#[tokio::test]
async fn test_receive_no_messages() {
    let http = MockHttpSend::new(StatusCode::OK, "{}");

    let out = client(&http)
        .receive_message(ReceiveMessageInput {
            queue_url: QUEUE_URL.to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(out.messages.is_empty());
}

#[tokio::test]
async fn test_batch_partial_failure() {
    let http = MockHttpSend::new(
        StatusCode::OK,
        r#"{
  "Successful": [{"Id": "a"}],
  "Failed": [{"Id": "b", "SenderFault": true, "Code": "ReceiptHandleIsInvalid", "Message": "The input receipt handle is invalid."}]
}"#,
    );

    let out = client(&http)
        .delete_message_batch(DeleteMessageBatchInput {
            queue_url: QUEUE_URL.to_string(),
            entries: vec![
                DeleteMessageBatchRequestEntry {
                    id: "a".to_string(),
                    receipt_handle: "handle-a".to_string(),
                },
                DeleteMessageBatchRequestEntry {
                    id: "b".to_string(),
                    receipt_handle: "handle-b".to_string(),
                },
            ],
        })
        .await
        .unwrap();

    assert_eq!(out.successful, vec![BatchResultEntry { id: "a".to_string() }]);
    assert_eq!(out.failed.len(), 1);
    assert!(out.failed[0].sender_fault);
    assert_eq!(out.failed[0].code, "ReceiptHandleIsInvalid");
    assert_eq!(
        http.last_json(),
        json!({
            "QueueUrl": QUEUE_URL,
            "Entries": [
                {"Id": "a", "ReceiptHandle": "handle-a"},
                {"Id": "b", "ReceiptHandle": "handle-b"},
            ],
        })
    );
}

#[tokio::test]
async fn test_get_queue_attributes() {
    let http = MockHttpSend::new(
        StatusCode::OK,
        r#"{"Attributes": {"QueueArn": "arn:aws:sqs:us-east-1:123456789012:jobs", "ApproximateNumberOfMessages": "3", "SqsManagedSseEnabled": "true"}}"#,
    );

    let out = client(&http)
        .get_queue_attributes(GetQueueAttributesInput {
            queue_url: QUEUE_URL.to_string(),
            attribute_names: Some(vec![QueueAttributeName::All]),
        })
        .await
        .unwrap();

    let attrs = out.attributes.unwrap();
    assert_eq!(
        attrs[QueueAttributeName::ApproximateNumberOfMessages.as_str()],
        "3"
    );
    // Attributes newer than this client are kept as they are.
    assert_eq!(attrs["SqsManagedSseEnabled"], "true");
    assert_eq!(
        http.last_json(),
        json!({"QueueUrl": QUEUE_URL, "AttributeNames": ["All"]})
    );
}

#[tokio::test]
async fn test_list_dead_letter_source_queues() {
    let http = MockHttpSend::new(
        StatusCode::OK,
        r#"{"queueUrls": ["https://sqs.us-east-1.amazonaws.com/123456789012/jobs"], "NextToken": "t-2"}"#,
    );

    let out = client(&http)
        .list_dead_letter_source_queues(ListDeadLetterSourceQueuesInput {
            queue_url: "https://sqs.us-east-1.amazonaws.com/123456789012/jobs-dlq".to_string(),
            max_results: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(out.queue_urls, vec![QUEUE_URL.to_string()]);
    assert_eq!(out.next_token.as_deref(), Some("t-2"));
}

#[test_case(
    r#"{"__type": "com.amazonaws.sqs#QueueDoesNotExist", "message": "The specified queue does not exist."}"#,
    "QueueDoesNotExist";
    "namespaced"
)]
#[test_case(
    r#"{"__type": "PurgeQueueInProgress", "message": "Only one PurgeQueue operation is allowed every 60 seconds."}"#,
    "PurgeQueueInProgress";
    "plain"
)]
#[tokio::test]
async fn test_service_error(body: &'static str, code: &str) {
    let http = MockHttpSend::new(StatusCode::BAD_REQUEST, body);

    let err = client(&http)
        .purge_queue(PurgeQueueInput {
            queue_url: QUEUE_URL.to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(err.request_id(), Some("5d8e1a2b-example"));
    let err = err.into_service_error().unwrap();
    assert_eq!(err.code(), code);
    assert!(!matches!(err, SqsError::Unknown(_)));
}

#[tokio::test]
async fn test_unknown_error_code() {
    let http = MockHttpSend::new(
        StatusCode::FORBIDDEN,
        r#"{"__type": "com.amazon.coral.service#AccessDeniedException", "Message": "denied"}"#,
    );

    let err = client(&http)
        .list_queues(ListQueuesInput::default())
        .await
        .unwrap_err();

    let Some(SqsError::Unknown(fault)) = err.service_error() else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(fault.code, "AccessDeniedException");
    assert_eq!(fault.message.as_deref(), Some("denied"));
}

#[tokio::test]
async fn test_non_json_failure() {
    let http = MockHttpSend::new(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>");

    let err = client(&http)
        .delete_queue(DeleteQueueInput {
            queue_url: QUEUE_URL.to_string(),
        })
        .await
        .unwrap_err();

    match err {
        SdkError::UnexpectedStatus { status, body } => {
            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(body.as_ref(), b"<html>Bad Gateway</html>");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_output() {
    let http = MockHttpSend::new(StatusCode::OK, "");

    client(&http)
        .untag_queue(UntagQueueInput {
            queue_url: QUEUE_URL.to_string(),
            tag_keys: vec!["team".to_string()],
        })
        .await
        .unwrap();

    assert_eq!(http.last_request().headers()["x-amz-target"], "AmazonSQS.UntagQueue");
    assert_eq!(
        http.last_json(),
        json!({"QueueUrl": QUEUE_URL, "TagKeys": ["team"]})
    );
}

#[tokio::test]
async fn test_endpoint_override() {
    let _ = env_logger::builder().is_test(true).try_init();
    let http = MockHttpSend::new(StatusCode::OK, r#"{"QueueUrls": []}"#);

    let client = Client::new(
        Context::new().with_http_send(http.clone()),
        &Config::new()
            .with_region("us-east-1")
            .with_endpoint("http://localhost:4566/"),
        StaticCredentialProvider::new("access_key_id", "secret_access_key"),
    )
    .unwrap();
    assert_eq!(client.endpoint(), "http://localhost:4566");

    let out = client.list_queues(ListQueuesInput::default()).await.unwrap();
    assert_eq!(out.queue_urls, Some(vec![]));
    assert_eq!(http.last_request().uri().to_string(), "http://localhost:4566/");
    assert_eq!(http.last_json(), json!({}));
}

#[tokio::test]
async fn test_spawn_delivers_every_result() {
    let http = MockHttpSend::new(StatusCode::OK, r#"{"MessageId": "m-1"}"#);
    let client = client(&http);
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let mut handles = Vec::new();
    for i in 0..4 {
        let tx = tx.clone();
        let handle = client
            .spawn(
                move |c| async move {
                    c.send_message(SendMessageInput {
                        queue_url: QUEUE_URL.to_string(),
                        message_body: format!("message {i}"),
                        ..Default::default()
                    })
                    .await
                },
                move |res| {
                    let _ = tx.send(res.map(|out| out.message_id));
                },
            )
            .unwrap();
        handles.push(handle);
    }
    drop(tx);
    for handle in handles {
        handle.wait().await;
    }

    let mut delivered = 0;
    while let Some(res) = rx.recv().await {
        assert_eq!(res.unwrap().as_deref(), Some("m-1"));
        delivered += 1;
    }
    assert_eq!(delivered, 4);
    assert_eq!(http.requests.lock().unwrap().len(), 4);

    client.close().await;
    let (tx, rx) = oneshot::channel();
    client
        .spawn(
            |c| async move { c.list_queues(ListQueuesInput::default()).await },
            move |res| {
                let _ = tx.send(res.is_ok());
            },
        )
        .unwrap();
    assert!(rx.await.unwrap());
}

#[test_case(MessageAttributeValue {
    data_type: "String".to_string(),
    ..Default::default()
}, json!({"DataType": "String"}); "only data type")]
#[test_case(MessageAttributeValue {
    data_type: "Binary.png".to_string(),
    string_value: Some("thumbnail".to_string()),
    binary_value: Some(Bytes::from_static(b"\x89PNG")),
    string_list_values: Some(vec!["a".to_string(), "b".to_string()]),
    binary_list_values: Some(vec![Bytes::from_static(b"hi"), Bytes::new()]),
}, json!({
    "DataType": "Binary.png",
    "StringValue": "thumbnail",
    "BinaryValue": "iVBORw==",
    "StringListValues": ["a", "b"],
    "BinaryListValues": ["aGk=", ""],
}); "every field")]
fn test_message_attribute_value_round_trip(v: MessageAttributeValue, wire: Value) {
    assert_eq!(serde_json::to_value(&v).unwrap(), wire);

    let body = serde_json::to_vec(&v).unwrap();
    let decoded: MessageAttributeValue = reqapi_protocol::json::from_slice(&body).unwrap();
    assert_eq!(decoded, v);
}

#[tokio::test]
async fn test_list_queues_live() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("REQAPI_SQS_TEST").unwrap_or_default() != "on" {
        warn!("REQAPI_SQS_TEST is not set, skipped");
        return Ok(());
    }

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let client = Client::new(ctx, &Config::new(), EnvCredentialProvider::new())?;

    let out = client
        .list_queues(ListQueuesInput {
            max_results: Some(5),
            ..Default::default()
        })
        .await?;
    for url in out.queue_urls.unwrap_or_default() {
        log::debug!("queue: {url}");
    }
    Ok(())
}
