mod common;

use common::can_bind_localhost;
use resty::prelude::*;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_basic_auth_header_sent() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let api = Api::new()
        .expect("api should build")
        .base_url(server.uri())
        .auth(Auth::basic_auth("user", "pass"));
    api.get("/auth", None).await.expect("request should succeed");
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_token_scheme_injector() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zecrets"))
        .and(header("Authorization", "Token Jonny"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let api = Api::new()
        .expect("api should build")
        .base_url(server.uri())
        .auth_headers(Auth::scheme("Token"));
    api.auth("Jonny").get("/zecrets", None).await.expect("request should succeed");
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_curried_auth_over_the_wire() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/foo"))
        .and(query_param("hello", "Giova"))
        .and(header("Authorization", "Secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let api = Api::new().expect("api should build").base_url(server.uri());
    let get = api.url("/foo").curry_auth().get("Secret");
    get(Some(Query::from([("hello", "Giova")])))
        .await
        .expect("request should succeed");
}
