//! Request descriptors and request assembly

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::{ApiConfig, HttpMethod, RequestConfig, ResponseType};
use crate::error::Result;
use crate::http::auth::inject_auth;
use crate::query::Query;
use crate::utils::UrlUtils;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// One part of a multipart form payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        bytes: Vec<u8>,
        mime: Option<String>,
    },
}

/// Opaque multipart form payload.
///
/// The transport picks the content type (with its boundary) for these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    parts: Vec<FormPart>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        mime: Option<&str>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            bytes,
            mime: mime.map(str::to_string),
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<FormPart> {
        self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Request body
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
    Multipart(FormData),
}

impl Body {
    /// Serialize any value into a JSON body.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Body> {
        Ok(Body::Json(serde_json::to_value(value)?))
    }

    /// Null, `false`, zero and empty strings are sent as no body at all.
    /// An empty multipart form is still a body.
    pub fn is_absent(&self) -> bool {
        match self {
            Body::Json(Value::Null) | Body::Json(Value::Bool(false)) => true,
            Body::Json(Value::String(text)) | Body::Text(text) => text.is_empty(),
            Body::Json(Value::Number(number)) => number.as_f64() == Some(0.0),
            Body::Json(_) | Body::Multipart(_) => false,
        }
    }

    /// Content type implied by the shape of the body.
    pub fn inferred_content_type(&self) -> Option<&'static str> {
        match self {
            Body::Multipart(_) => None,
            Body::Json(_) | Body::Text(_) => Some(APPLICATION_JSON),
        }
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl From<FormData> for Body {
    fn from(form: FormData) -> Self {
        Body::Multipart(form)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

/// Content type to fill in for an outgoing body, if any.
pub fn infer_content_type(body: Option<&Body>) -> Option<&'static str> {
    body.and_then(Body::inferred_content_type)
}

/// Fully resolved request handed to a transport
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Body>,
    pub timeout: Option<Duration>,
    pub response_type: Option<ResponseType>,
}

impl Request {
    /// Header lookup, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Everything but url, method and body, as passed to auth injectors.
    pub fn options(&self) -> RequestConfig {
        RequestConfig {
            headers: Some(self.headers.clone()),
            timeout: self.timeout,
            response_type: self.response_type,
        }
    }
}

pub(crate) fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Assemble the request for one verb call.
///
/// Header precedence, lowest first: inferred content type, configured
/// headers, auth headers.
pub fn build_request(
    config: &ApiConfig,
    method: HttpMethod,
    path: &str,
    query: Option<&Query>,
    body: Option<Body>,
    auth: Option<&str>,
) -> Request {
    let url = UrlUtils::compose(
        config.base_url.as_deref().unwrap_or_default(),
        &config.url,
        path,
        config.query.as_ref(),
        query,
        config.trailing_slash,
    );

    let body = body.filter(|body| !body.is_absent());
    let options = config.request_config.clone().unwrap_or_default();
    let mut headers = options.headers.unwrap_or_default();
    if let Some(content_type) = infer_content_type(body.as_ref()) {
        if find_header(&headers, CONTENT_TYPE).is_none() {
            headers.insert(CONTENT_TYPE.to_string(), content_type.to_string());
        }
    }

    let request = Request {
        method,
        url,
        headers,
        body,
        timeout: options.timeout,
        response_type: options.response_type,
    };

    inject_auth(request, config, auth)
}
