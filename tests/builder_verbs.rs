mod common;

use std::collections::HashMap;

use common::recording_api;
use resty::config::HttpMethod;
use resty::prelude::*;
use serde_json::json;

fn header_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn root_verbs_use_explicit_paths() {
    let (api, _) = recording_api();

    let request = api.get("/bau", None).request().clone();
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.url, "/bau");
    assert!(request.headers.is_empty());
    assert!(request.body.is_none());

    let request = api.get("/bau", Some(Query::from([("name", "Gyanny")]))).request().clone();
    assert_eq!(request.url, "/bau?name=Gyanny");

    let request = api.post("/hello", None).request().clone();
    assert_eq!(request.method, HttpMethod::Post);
    assert!(request.headers.is_empty());

    let request = api.patch("/x", None).request().clone();
    assert_eq!(request.method, HttpMethod::Patch);

    let request = api.delete("/kill", Some(Query::from([("ids", vec![1, 2, 3])]))).request().clone();
    assert_eq!(request.method, HttpMethod::Delete);
    assert_eq!(request.url, "/kill?ids=1&ids=2&ids=3");
}

#[test]
fn json_body_gets_inferred_content_type() {
    let (api, _) = recording_api();
    let request = api
        .post("/hello", Some(json!({ "name": "Gio Va" }).into()))
        .request()
        .clone();
    assert_eq!(request.headers, header_map(&[("Content-Type", "application/json")]));
    assert_eq!(request.body, Some(Body::Json(json!({ "name": "Gio Va" }))));
}

#[test]
fn form_body_gets_no_content_type() {
    let (api, _) = recording_api();
    let form = FormData::new().text("name", "Gio");
    let request = api.put("/hello", Some(form.clone().into())).request().clone();
    assert!(request.headers.is_empty());
    assert_eq!(request.body, Some(Body::Multipart(form)));
}

#[test]
fn explicit_content_type_wins_over_inferred() {
    let (api, _) = recording_api();
    let request = api
        .headers([("Content-Type", "application/x-www-form-urlencoded; charset=UTF-8")])
        .patch("/x", Some(json!({ "name": "Rinne" }).into()))
        .request()
        .clone();
    assert_eq!(
        request.headers,
        header_map(&[("Content-Type", "application/x-www-form-urlencoded; charset=UTF-8")])
    );
}

#[test]
fn header_merges_keep_unrelated_keys() {
    let (api, _) = recording_api();
    let request = api
        .headers([("A", "1")])
        .headers([("B", "2")])
        .headers([("A", "3")])
        .put("/h", Some(json!({ "x": 1 }).into()))
        .request()
        .clone();
    assert_eq!(
        request.headers,
        header_map(&[("A", "3"), ("B", "2"), ("Content-Type", "application/json")])
    );
}

#[test]
fn base_url_is_prefixed_and_replaceable() {
    let (api, _) = recording_api();
    let v1 = api.base_url("/v1");

    assert_eq!(v1.get("/bau", None).request().url, "/v1/bau");
    assert_eq!(v1.put("/bau", None).request().url, "/v1/bau");
    assert_eq!(v1.base_url("/awesome").delete("/bau", None).request().url, "/awesome/bau");
    assert_eq!(v1.post("/d", None).request().url, "/v1/d");
}

#[test]
fn query_precedence_and_ordering() {
    let (api, _) = recording_api();
    let request = api
        .query([("name", "GioVa"), ("age", "23")])
        .get("/foo?name=Ringo&age=99&gang=KDS", Some(Query::from([("age", "27")])))
        .request()
        .clone();
    assert_eq!(request.url, "/foo?age=27&gang=KDS&name=Ringo");
}

#[test]
fn stored_query_merges_by_key() {
    let (api, _) = recording_api();
    let request = api
        .query([("a", "1"), ("b", "1")])
        .query([("b", "2")])
        .get("/q", None)
        .request()
        .clone();
    assert_eq!(request.url, "/q?a=1&b=2");
}

#[test]
fn trailing_slash_is_added_once_and_keeps_query() {
    let (api, _) = recording_api();
    let api = api.trailing_slash(true);
    assert_eq!(api.get("/woo", None).request().url, "/woo/");
    assert_eq!(api.get("/woo/", None).request().url, "/woo/");
    assert_eq!(api.get("/woo?name=Giova", None).request().url, "/woo/?name=Giova");
    assert_eq!(api.trailing_slash(false).get("/woo", None).request().url, "/woo");
}

#[test]
fn configuration_never_leaks_back_into_templates() {
    let (api, _) = recording_api();
    let base = api.headers([("X-Base", "1")]);
    let _derived = base
        .headers([("H", "1")])
        .query([("q", "1")])
        .auth("token")
        .base_url("/v9")
        .trailing_slash(true);

    let request = base.get("/plain", None).request().clone();
    assert_eq!(request.url, "/plain");
    assert_eq!(request.headers, header_map(&[("X-Base", "1")]));
}

#[test]
fn request_options_merge_shallowly() {
    let (api, _) = recording_api();
    let api = api
        .timeout(std::time::Duration::from_secs(2))
        .request(RequestConfig::new().with_response_type(ResponseType::Text));
    let request = api.get("/opts", None).request().clone();
    assert_eq!(request.timeout, Some(std::time::Duration::from_secs(2)));
    assert_eq!(request.response_type, Some(ResponseType::Text));
}

#[test]
fn chained_urls_concatenate() {
    let (api, _) = recording_api();
    let request = api.url("/a").url("/b").url("/c").get(None).request().clone();
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.url, "/a/b/c");
}

#[test]
fn url_builder_verbs_target_curried_url() {
    let (api, _) = recording_api();
    let messages = api.base_url("/v2").url("/messages");

    assert_eq!(messages.get(Some(Query::from([("page", 2)]))).request().url, "/v2/messages?page=2");
    let request = messages.post(Some(json!({ "text": "hi" }).into())).request().clone();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, "/v2/messages");
    assert_eq!(request.header("Content-Type"), Some("application/json"));
    assert_eq!(messages.put(None).request().method, HttpMethod::Put);
    assert_eq!(messages.patch(None).request().method, HttpMethod::Patch);
    assert_eq!(messages.delete(None).request().method, HttpMethod::Delete);
}

#[test]
fn url_builder_keeps_configuration_operations() {
    let (api, _) = recording_api();
    let inbox = api.url("/inbox").headers([("X-A", "1")]).query([("box", "main")]);
    let request = inbox.get(None).request().clone();
    assert_eq!(request.url, "/inbox?box=main");
    assert_eq!(request.header("X-A"), Some("1"));
}

#[test]
fn embedded_bare_query_keys_are_preserved() {
    let (api, _) = recording_api();
    assert_eq!(api.get("/foo?flag&x=1", None).request().url, "/foo?flag&x=1");
}
