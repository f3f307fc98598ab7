mod common;

use common::can_bind_localhost;
use resty::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, body_string, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_json_body_sent() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gangs"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({ "name": "KDS", "members": 3 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let gangs = Api::new().expect("api should build").base_url(server.uri()).resource("/gangs");
    let created = gangs
        .create(Some(json!({ "name": "KDS", "members": 3 }).into()))
        .await
        .expect("request should succeed");
    assert_eq!(created, json!({ "id": 1 }));
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_form_urlencoded_body_sent() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string("user=Gio+Va"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let api = Api::new()
        .expect("api should build")
        .base_url(server.uri())
        .headers([("Content-Type", "application/x-www-form-urlencoded")]);
    api.post("/login", Some(json!({ "user": "Gio Va" }).into()))
        .await
        .expect("request should succeed");
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_text_body_sent() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/body"))
        .and(body_string("payload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let api = Api::new().expect("api should build").base_url(server.uri());
    api.put("/body", Some("payload".into())).await.expect("request should succeed");
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_multipart_body_sent() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("name=\"title\""))
        .and(body_string_contains("Gio"))
        .and(body_string_contains("filename=\"a.txt\""))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let form = FormData::new()
        .text("title", "Gio")
        .file("avatar", "a.txt", b"hello".to_vec(), Some("text/plain"));
    let api = Api::new().expect("api should build").base_url(server.uri());
    api.post("/upload", Some(form.into())).await.expect("request should succeed");

    let requests = server.received_requests().await.expect("requests");
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
}
