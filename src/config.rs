//! Configuration management for resty
//!
//! [`ApiConfig`] is the record every builder carries. It is never mutated in
//! place: each builder operation produces a fresh record through one of the
//! `with_*` methods below.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::error::RestyError;
use crate::http::response::Response;
use crate::query::Query;

/// HTTP method enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        };
        write!(f, "{}", method)
    }
}

impl FromStr for HttpMethod {
    type Err = RestyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(RestyError::Config(format!("Unknown HTTP method: {}", s))),
        }
    }
}

/// How the transport should decode a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// Parse as JSON, falling back to a JSON string when the body is not JSON.
    Json,
    /// Always keep the body as a string.
    Text,
}

/// Low-level request options passed through to the transport.
///
/// Every field is optional so that [`RequestConfig::merge`] can tell "not set"
/// apart from "set to empty".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestConfig {
    pub headers: Option<HashMap<String, String>>,
    pub timeout: Option<Duration>,
    pub response_type: Option<ResponseType>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    /// Shallow merge: fields present in `other` replace ours, absent ones keep ours.
    ///
    /// `headers` is replaced as a whole; use [`RequestConfig::merge_headers`]
    /// for a per-key merge.
    pub fn merge(&self, other: &RequestConfig) -> RequestConfig {
        RequestConfig {
            headers: other.headers.clone().or_else(|| self.headers.clone()),
            timeout: other.timeout.or(self.timeout),
            response_type: other.response_type.or(self.response_type),
        }
    }

    /// Per-key header merge where `headers` wins.
    pub fn merge_headers(&self, headers: &HashMap<String, String>) -> RequestConfig {
        let mut merged = self.headers.clone().unwrap_or_default();
        merged.extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        RequestConfig {
            headers: Some(merged),
            ..self.clone()
        }
    }
}

/// Converts an auth value into headers to attach to a request.
pub type AuthInjector = Arc<dyn Fn(&str, &RequestConfig) -> HashMap<String, String> + Send + Sync>;

/// Converts a raw transport response into the value handed back to callers.
pub type ResponseMapper = Arc<dyn Fn(Response) -> serde_json::Value + Send + Sync>;

/// Accumulated builder configuration.
#[derive(Clone, Default)]
pub struct ApiConfig {
    /// Curried path, grown by `url(...)` and `resource(...)`.
    pub url: String,
    pub base_url: Option<String>,
    pub trailing_slash: bool,
    pub auth: Option<String>,
    pub auth_injector: Option<AuthInjector>,
    pub request_config: Option<RequestConfig>,
    pub query: Option<Query>,
    pub response_mapper: Option<ResponseMapper>,
}

impl ApiConfig {
    pub fn with_base_url(&self, base_url: impl Into<String>) -> ApiConfig {
        ApiConfig {
            base_url: Some(base_url.into()),
            ..self.clone()
        }
    }

    pub fn with_auth(&self, auth: impl Into<String>) -> ApiConfig {
        ApiConfig {
            auth: Some(auth.into()),
            ..self.clone()
        }
    }

    pub fn with_auth_injector(&self, injector: AuthInjector) -> ApiConfig {
        ApiConfig {
            auth_injector: Some(injector),
            ..self.clone()
        }
    }

    pub fn with_response_mapper(&self, mapper: ResponseMapper) -> ApiConfig {
        ApiConfig {
            response_mapper: Some(mapper),
            ..self.clone()
        }
    }

    pub fn with_trailing_slash(&self, trailing_slash: bool) -> ApiConfig {
        ApiConfig {
            trailing_slash,
            ..self.clone()
        }
    }

    pub fn with_request_config(&self, request_config: &RequestConfig) -> ApiConfig {
        let merged = self
            .request_config
            .clone()
            .unwrap_or_default()
            .merge(request_config);
        ApiConfig {
            request_config: Some(merged),
            ..self.clone()
        }
    }

    pub fn with_headers(&self, headers: &HashMap<String, String>) -> ApiConfig {
        let merged = self
            .request_config
            .clone()
            .unwrap_or_default()
            .merge_headers(headers);
        ApiConfig {
            request_config: Some(merged),
            ..self.clone()
        }
    }

    pub fn with_query(&self, query: &Query) -> ApiConfig {
        let merged = self.query.clone().unwrap_or_default().merge(query);
        ApiConfig {
            query: Some(merged),
            ..self.clone()
        }
    }

    /// Appends `path` to the curried url.
    pub fn with_appended_url(&self, path: &str) -> ApiConfig {
        ApiConfig {
            url: format!("{}{}", self.url, path),
            ..self.clone()
        }
    }

    /// Headers configured through `request(...)` / `headers(...)`.
    pub fn headers(&self) -> HashMap<String, String> {
        self.request_config
            .as_ref()
            .and_then(|config| config.headers.clone())
            .unwrap_or_default()
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("url", &self.url)
            .field("base_url", &self.base_url)
            .field("trailing_slash", &self.trailing_slash)
            .field("auth", &self.auth.as_ref().map(|_| "<redacted>"))
            .field("auth_injector", &self.auth_injector.is_some())
            .field("request_config", &self.request_config)
            .field("query", &self.query)
            .field("response_mapper", &self.response_mapper.is_some())
            .finish()
    }
}

/// Output configuration for the command line tool
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub file: Option<PathBuf>,
    pub verbose: bool,
    pub silent: bool,
    pub pretty: bool,
}

/// Settings for the default reqwest-backed transport
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Origin used to resolve relative request URLs, e.g. `http://localhost:8000`.
    pub origin: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: Option<String>,
    pub insecure: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            origin: None,
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(30),
            user_agent: Some(format!("resty/{}", crate::VERSION)),
            insecure: false,
        }
    }
}
