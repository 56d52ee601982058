use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::future::BoxFuture;
use reqwest::{Request, Response};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kraken_rest_client::auth::StaticCredentials;
use kraken_rest_client::context::RequestContext;
use kraken_rest_client::error::{ContextExpiry, JsonErrorKind, KrakenError};
use kraken_rest_client::rest::endpoints::public;
use kraken_rest_client::rest::private::RetrieveExportRequest;
use kraken_rest_client::rest::{Decoded, FormParams, HttpTransport, SpotRestClient};

const REPORT_BYTES: &[u8] = b"PK\x03\x04report-body\x00\x01\x02\xff";

#[derive(Clone)]
struct CountingTransport {
    inner: reqwest::Client,
    calls: Arc<AtomicUsize>,
}

impl HttpTransport for CountingTransport {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response, reqwest_middleware::Error>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            self.inner
                .execute(request)
                .await
                .map_err(reqwest_middleware::Error::Reqwest)
        })
    }
}

fn build_client(server: &MockServer) -> SpotRestClient {
    SpotRestClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(StaticCredentials::new("test_key", "c2VjcmV0")))
        .max_retries(0)
        .build()
        .unwrap()
}

async fn mount_time(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/0/public/Time"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_json_success_is_decoded() {
    let server = MockServer::start().await;
    mount_time(
        &server,
        ResponseTemplate::new(200).set_body_raw(
            r#"{"error":[],"result":{"unixtime":1700000000,"rfc1123":"x"}}"#,
            "application/json; charset=utf-8",
        ),
    )
    .await;

    let client = build_client(&server);
    let envelope = client
        .get_server_time(&RequestContext::background())
        .await
        .unwrap();
    assert!(envelope.is_ok());
    assert_eq!(envelope.result.unwrap().unixtime, 1_700_000_000);
}

#[tokio::test]
async fn test_non_200_status_is_an_error_with_metadata() {
    let server = MockServer::start().await;
    mount_time(
        &server,
        ResponseTemplate::new(503)
            .insert_header("x-request-id", "abc")
            .set_body_string("unavailable"),
    )
    .await;

    let client = build_client(&server);
    let err = client
        .get_server_time(&RequestContext::background())
        .await
        .unwrap_err();
    match err {
        KrakenError::UnexpectedStatus { meta } => {
            assert_eq!(meta.status.as_u16(), 503);
            assert_eq!(meta.headers["x-request-id"], "abc");
            assert_eq!(meta.url.path(), "/0/public/Time");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_200_status_ignores_well_formed_envelope() {
    for status in [201_u16, 400] {
        let server = MockServer::start().await;
        mount_time(
            &server,
            ResponseTemplate::new(status).set_body_json(serde_json::json!({
                "error": [],
                "result": { "unixtime": 1_700_000_000, "rfc1123": "x" }
            })),
        )
        .await;

        let client = build_client(&server);
        let err = client
            .get_server_time(&RequestContext::background())
            .await
            .unwrap_err();
        match err {
            KrakenError::UnexpectedStatus { meta } => {
                assert_eq!(meta.status.as_u16(), status);
                assert_eq!(meta.headers["content-type"], "application/json");
            }
            other => panic!("unexpected error for {status}: {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_empty_content_type_fails_to_parse() {
    let server = MockServer::start().await;
    mount_time(
        &server,
        ResponseTemplate::new(200)
            .insert_header("content-type", "")
            .set_body_bytes(br#"{"error":[],"result":{"unixtime":1,"rfc1123":"x"}}"#.to_vec()),
    )
    .await;

    let client = build_client(&server);
    let err = client
        .get_server_time(&RequestContext::background())
        .await
        .unwrap_err();
    match err {
        KrakenError::ContentTypeParse { value, meta, .. } => {
            assert!(value.is_empty());
            assert!(meta.headers.contains_key("content-type"));
            assert_eq!(meta.status.as_u16(), 200);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_content_type_fails_to_parse() {
    let server = MockServer::start().await;
    mount_time(
        &server,
        ResponseTemplate::new(200).set_body_bytes(br#"{"error":[]}"#.to_vec()),
    )
    .await;

    let client = build_client(&server);
    let err = client
        .get_server_time(&RequestContext::background())
        .await
        .unwrap_err();
    match err {
        KrakenError::ContentTypeParse { value, .. } => assert!(value.is_empty()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_media_type_is_rejected() {
    let server = MockServer::start().await;
    mount_time(
        &server,
        ResponseTemplate::new(200).set_body_raw("hello", "text/plain"),
    )
    .await;

    let client = build_client(&server);
    let err = client
        .get_server_time(&RequestContext::background())
        .await
        .unwrap_err();
    match err {
        KrakenError::UnexpectedContentType { content_type, meta } => {
            assert_eq!(content_type, "text/plain");
            assert_eq!(meta.status.as_u16(), 200);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_json_reports_kind() {
    let server = MockServer::start().await;
    mount_time(
        &server,
        ResponseTemplate::new(200).set_body_raw(r#"{"error":[],"result":{"unixtime":"#, "application/json"),
    )
    .await;

    let client = build_client(&server);
    let err = client
        .get_server_time(&RequestContext::background())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        KrakenError::JsonDecode {
            kind: JsonErrorKind::UnexpectedEof,
            ..
        }
    ));
    assert_eq!(err.kind(), "json_decode");
}

#[tokio::test]
async fn test_zip_export_is_streamed_byte_for_byte() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/0/private/RetrieveExport"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(REPORT_BYTES.to_vec(), "application/zip"))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let executed = client
        .retrieve_export(
            &RequestContext::background(),
            &RetrieveExportRequest::new("TCJA"),
            None,
        )
        .await
        .unwrap();
    let Decoded::Stream(stream) = executed.body else {
        panic!("expected a binary stream");
    };
    assert_eq!(stream.media_type().essence(), "application/zip");

    let mut chunks = Box::pin(stream.into_stream());
    let mut received = Vec::new();
    while let Some(chunk) = chunks.next().await {
        received.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(received, REPORT_BYTES);
}

#[tokio::test]
async fn test_octet_stream_outlives_its_context() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/0/private/RetrieveExport"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(REPORT_BYTES.to_vec(), "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let client = build_client(&server);
    let ctx = RequestContext::background();
    let executed = client
        .retrieve_export(&ctx, &RetrieveExportRequest::new("TCJA"), None)
        .await
        .unwrap();
    ctx.cancel();

    let Decoded::Stream(stream) = executed.body else {
        panic!("expected a binary stream");
    };
    let body = stream.bytes().await.unwrap();
    assert_eq!(body.as_ref(), REPORT_BYTES);
}

#[tokio::test]
async fn test_json_endpoint_rejects_binary_body() {
    let server = MockServer::start().await;
    mount_time(
        &server,
        ResponseTemplate::new(200).set_body_raw(REPORT_BYTES.to_vec(), "application/zip"),
    )
    .await;

    let client = build_client(&server);
    let err = client
        .get_server_time(&RequestContext::background())
        .await
        .unwrap_err();
    assert!(matches!(err, KrakenError::UnexpectedContentType { .. }));
}

#[tokio::test]
async fn test_call_raw_returns_json_envelope() {
    let server = MockServer::start().await;
    mount_time(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": ["EGeneral:Temporary lockout"]
        })),
    )
    .await;

    let client = build_client(&server);
    let executed = client
        .call_raw::<serde_json::Value>(
            &RequestContext::background(),
            &public::TIME,
            FormParams::empty(),
            None,
        )
        .await
        .unwrap();
    let envelope = executed.into_json().unwrap();
    assert_eq!(envelope.error, vec!["EGeneral:Temporary lockout".to_string()]);
}

#[tokio::test]
async fn test_cancelled_context_never_reaches_transport() {
    let server = MockServer::start().await;
    let calls = Arc::new(AtomicUsize::new(0));
    let client = SpotRestClient::builder()
        .base_url(server.uri())
        .transport(CountingTransport {
            inner: reqwest::Client::new(),
            calls: Arc::clone(&calls),
        })
        .build()
        .unwrap();

    let ctx = RequestContext::background();
    ctx.cancel();
    let err = client.get_server_time(&ctx).await.unwrap_err();

    assert!(matches!(
        err,
        KrakenError::ContextExpired {
            reason: ContextExpiry::Cancelled
        }
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_custom_transport_is_used() {
    let server = MockServer::start().await;
    mount_time(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": [],
            "result": { "unixtime": 1, "rfc1123": "x" }
        })),
    )
    .await;

    let calls = Arc::new(AtomicUsize::new(0));
    let client = SpotRestClient::builder()
        .base_url(server.uri())
        .transport(CountingTransport {
            inner: reqwest::Client::new(),
            calls: Arc::clone(&calls),
        })
        .build()
        .unwrap();

    client
        .get_server_time(&RequestContext::background())
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_deadline_stops_waiting_for_slow_server() {
    let server = MockServer::start().await;
    mount_time(
        &server,
        ResponseTemplate::new(200)
            .set_delay(Duration::from_secs(5))
            .set_body_json(serde_json::json!({ "error": [], "result": {} })),
    )
    .await;

    let client = build_client(&server);
    let ctx = RequestContext::with_timeout(Duration::from_millis(100));
    let err = client.get_server_time(&ctx).await.unwrap_err();

    assert!(matches!(
        err,
        KrakenError::ContextExpired {
            reason: ContextExpiry::DeadlineExceeded
        }
    ));
}
