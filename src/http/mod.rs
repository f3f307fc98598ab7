//! HTTP client module
//!
//! This module holds the request pipeline: request assembly, auth injection,
//! the [`Transport`] seam and the default reqwest-backed transport.

use std::collections::HashMap;

use futures_util::future::BoxFuture;
use reqwest::{Client, ClientBuilder, Method};
use serde_json::Value;
use url::Url;

use crate::config::{HttpMethod, TransportConfig};
use crate::error::{Result, RestyError};
use crate::utils::UrlUtils;

pub mod auth;
pub mod call;
pub mod request;
pub mod response;

use request::{find_header, Body, FormData, FormPart, Request, CONTENT_TYPE};
use response::Response;

/// Executes resolved requests.
///
/// Non-success statuses are reported as errors by convention.
pub trait Transport: Send + Sync {
    fn send(&self, request: Request) -> BoxFuture<'static, Result<Response>>;
}

/// Transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    config: TransportConfig,
}

impl ReqwestTransport {
    /// Create a new transport with the given configuration
    pub fn new(config: TransportConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }

        if config.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(RestyError::Http)?;

        Ok(Self { client, config })
    }

    /// Resolve a composed URL against the configured origin.
    fn resolve_url(&self, url: &str) -> Result<Url> {
        let full = if UrlUtils::is_absolute(url) {
            url.to_string()
        } else if let Some(origin) = &self.config.origin {
            let origin = origin.trim_end_matches('/');
            if url.starts_with('/') {
                format!("{}{}", origin, url)
            } else {
                format!("{}/{}", origin, url)
            }
        } else {
            return Err(RestyError::InvalidUrl(format!(
                "Relative URL '{}' needs an origin or an absolute base url",
                url
            )));
        };

        Url::parse(&full).map_err(|e| RestyError::InvalidUrl(format!("Invalid URL '{}': {}", full, e)))
    }

    fn build(&self, request: Request) -> Result<reqwest::Request> {
        let url = self.resolve_url(&request.url)?;
        let mut builder = self.client.request(to_reqwest_method(request.method), url);

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match request.body {
            Some(Body::Multipart(form)) => builder.multipart(to_multipart(form)?),
            Some(Body::Json(value)) => {
                builder.body(serialize_json_body(&value, find_header(&request.headers, CONTENT_TYPE))?)
            }
            Some(Body::Text(text)) => builder.body(text),
            None => builder,
        };

        builder.build().map_err(RestyError::Http)
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: Request) -> BoxFuture<'static, Result<Response>> {
        let client = self.client.clone();
        let response_type = request.response_type;
        let built = self.build(request);

        Box::pin(async move {
            let request = built?;
            log_request(&request);

            let response = client.execute(request).await.map_err(map_send_error)?;

            let status = response.status();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    let value = value.to_str().unwrap_or("<non-utf8>");
                    (name.as_str().to_string(), value.to_string())
                })
                .collect::<HashMap<_, _>>();
            let body = response.text().await.map_err(map_send_error)?;

            if !status.is_success() {
                log::warn!("request failed with status {}", status);
                return Err(RestyError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            Ok(Response {
                status: status.as_u16(),
                headers,
                response: Response::decode(&body, response_type),
            })
        })
    }
}

/// Timeouts surface as [`RestyError::Timeout`] whether they hit while
/// connecting, waiting for headers or reading the body.
fn map_send_error(err: reqwest::Error) -> RestyError {
    if err.is_timeout() {
        RestyError::Timeout
    } else {
        RestyError::Http(err)
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// JSON bodies are url-encoded when the request declares a form content type.
fn serialize_json_body(value: &Value, content_type: Option<&str>) -> Result<Vec<u8>> {
    let form_encoded = content_type
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);

    match value {
        Value::Object(map) if form_encoded => {
            let mut serializer = url::form_urlencoded::Serializer::new(String::new());
            for (key, value) in map {
                match value {
                    Value::String(text) => serializer.append_pair(key, text),
                    other => serializer.append_pair(key, &other.to_string()),
                };
            }
            Ok(serializer.finish().into_bytes())
        }
        _ => Ok(serde_json::to_vec(value)?),
    }
}

fn to_multipart(form: FormData) -> Result<reqwest::multipart::Form> {
    let mut multipart = reqwest::multipart::Form::new();
    for part in form.into_parts() {
        multipart = match part {
            FormPart::Text { name, value } => multipart.text(name, value),
            FormPart::File {
                name,
                file_name,
                bytes,
                mime,
            } => {
                let mut file = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
                if let Some(mime) = mime {
                    file = file.mime_str(&mime).map_err(|e| {
                        RestyError::Transport(format!("Invalid MIME type '{}': {}", mime, e))
                    })?;
                }
                multipart.part(name, file)
            }
        };
    }
    Ok(multipart)
}

fn log_request(request: &reqwest::Request) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    let url = request.url();
    log::debug!("> {} {}", request.method(), request_path(url));
    if let Some(host) = url.host_str() {
        match url.port() {
            Some(port) => log::debug!("> Host: {}:{}", host, port),
            None => log::debug!("> Host: {}", host),
        }
    }
    for (name, value) in request.headers().iter() {
        let value = value.to_str().unwrap_or("<non-utf8>");
        log::debug!("> {}: {}", name, value);
    }
}

fn request_path(url: &Url) -> String {
    match url[url::Position::BeforePath..].trim() {
        "" => "/".to_string(),
        path => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpMethod;
    use serde_json::json;

    fn transport(origin: Option<&str>) -> ReqwestTransport {
        ReqwestTransport::new(TransportConfig {
            origin: origin.map(str::to_string),
            ..TransportConfig::default()
        })
        .expect("transport should build")
    }

    #[test]
    fn resolve_url_joins_origin_and_path() {
        let url = transport(Some("http://localhost:8000/"))
            .resolve_url("/v1/gangs?a=1")
            .expect("resolved");
        assert_eq!(url.as_str(), "http://localhost:8000/v1/gangs?a=1");
    }

    #[test]
    fn resolve_url_keeps_absolute_urls() {
        let url = transport(Some("http://ignored"))
            .resolve_url("https://example.com/x")
            .expect("resolved");
        assert_eq!(url.as_str(), "https://example.com/x");
    }

    #[test]
    fn resolve_url_rejects_relative_without_origin() {
        let err = transport(None).resolve_url("/x").expect_err("relative");
        assert!(matches!(err, RestyError::InvalidUrl(_)));
    }

    #[test]
    fn json_body_is_form_encoded_for_form_content_type() {
        let bytes = serialize_json_body(
            &json!({ "name": "Rinne", "age": 3 }),
            Some("application/x-www-form-urlencoded; charset=UTF-8"),
        )
        .expect("serialized");
        let encoded = String::from_utf8(bytes).expect("utf8");
        let mut pairs: Vec<&str> = encoded.split('&').collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec!["age=3", "name=Rinne"]);
    }

    #[test]
    fn invalid_mime_type_is_a_transport_error() {
        let form = FormData::new().file("avatar", "a.bin", vec![1, 2], Some("not a mime"));
        let err = to_multipart(form).expect_err("mime should be rejected");
        match err {
            RestyError::Transport(message) => assert!(message.contains("not a mime")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn build_sets_method_and_headers() {
        let request = Request {
            method: HttpMethod::Patch,
            url: "http://localhost/x".to_string(),
            headers: HashMap::from([("X-Test".to_string(), "1".to_string())]),
            body: Some(Body::Json(json!({ "a": 1 }))),
            timeout: None,
            response_type: None,
        };
        let built = transport(None).build(request).expect("built");
        assert_eq!(built.method(), Method::PATCH);
        assert_eq!(built.headers()["x-test"], "1");
    }
}
