use quotebot_http::{Auth, HttpClient, HttpError, RequestOpts};
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::borrow::Cow;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    HttpClient::new(&format!("{}/", server.uri())).expect("mock base url")
}

#[tokio::test]
async fn get_json_sends_bearer_and_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [1, 2]})))
        .expect(1)
        .mount(&server)
        .await;

    let got: Value = client_for(&server)
        .get_json(
            "v1/items",
            RequestOpts {
                auth: Some(Auth::Bearer(" tok-123\n")),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(got["items"], json!([1, 2]));
}

#[tokio::test]
async fn query_auth_is_appended() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/values"))
        .and(query_param("key", "k1"))
        .and(query_param("majorDimension", "ROWS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let got: Value = client_for(&server)
        .get_json(
            "v1/values",
            RequestOpts {
                auth: Some(Auth::Query {
                    name: "key",
                    value: Cow::Borrowed("k1"),
                }),
                query: Some(vec![("majorDimension", "ROWS".into())]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(got["ok"], json!(true));
}

#[tokio::test]
async fn put_json_sends_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/cell"))
        .and(body_json(json!({"values": [["Yes"]]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updatedCells": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let got: Value = client_for(&server)
        .put_json("v1/cell", &json!({"values": [["Yes"]]}), RequestOpts::default())
        .await
        .unwrap();

    assert_eq!(got["updatedCells"], json!(1));
}

#[tokio::test]
async fn server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let got: Value = client_for(&server)
        .with_retries(1)
        .get_json("flaky", RequestOpts::default())
        .await
        .unwrap();

    assert_eq!(got["ok"], json!(true));
}

#[tokio::test]
async fn client_errors_surface_message_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errors": [{"message": "duplicate content"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .post_json::<_, Value>("2/tweets", &json!({"text": "hi"}), RequestOpts::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    match err {
        HttpError::Api { message, .. } => assert_eq!(message, "duplicate content"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn undecodable_success_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/text"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_json::<Value>("text", RequestOpts::default())
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::Decode(_, ref snip) if snip == "not json"));
}
