//! Fluent request builders
//!
//! Every builder owns an [`ApiConfig`] snapshot and a shared transport.
//! Configuration methods return a new builder of the same kind and never
//! touch the receiver, so any builder can be kept around as a template.
//!
//! ```no_run
//! use resty::prelude::*;
//!
//! # async fn run() -> resty::Result<()> {
//! let api = Api::new()?.base_url("http://localhost:8000/v1");
//! let gangs = api.resource("/gangs").auth_headers(|token, _| {
//!     [("Authorization".to_string(), format!("Token {}", token))].into()
//! });
//! let created = gangs.auth("s3cret").create(Some(serde_json::json!({ "name": "KDS" }).into())).await?;
//! # let _ = created;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::config::{ApiConfig, HttpMethod, RequestConfig, TransportConfig};
use crate::error::Result;
use crate::http::call::Call;
use crate::http::request::{build_request, Body};
use crate::http::response::{default_mapper, Response};
use crate::http::{ReqwestTransport, Transport};
use crate::query::Query;

pub mod resource;
pub mod url_api;

pub use resource::{CurriedAuthResourceApi, Pk, ResourceApi};
pub use url_api::{CurriedAuthUrlApi, UrlApi};

/// Configuration operations shared by every builder.
pub trait Configure: Sized {
    fn config(&self) -> &ApiConfig;

    /// Same kind of builder, carrying `config`.
    fn with_config(&self, config: ApiConfig) -> Self;

    /// Prefix prepended to every request url.
    fn base_url(&self, base_url: impl Into<String>) -> Self {
        self.with_config(self.config().with_base_url(base_url))
    }

    /// Default auth value, turned into headers by [`Configure::auth_headers`].
    fn auth(&self, auth: impl Into<String>) -> Self {
        self.with_config(self.config().with_auth(auth))
    }

    /// How an auth value becomes headers. Without one, the value is sent as
    /// the raw `Authorization` header.
    fn auth_headers<F>(&self, injector: F) -> Self
    where
        F: Fn(&str, &RequestConfig) -> HashMap<String, String> + Send + Sync + 'static,
    {
        self.with_config(self.config().with_auth_injector(Arc::new(injector)))
    }

    fn map_response<F>(&self, mapper: F) -> Self
    where
        F: Fn(Response) -> Value + Send + Sync + 'static,
    {
        self.with_config(self.config().with_response_mapper(Arc::new(mapper)))
    }

    fn trailing_slash(&self, enabled: bool) -> Self {
        self.with_config(self.config().with_trailing_slash(enabled))
    }

    /// Shallow-merge low-level request options.
    fn request(&self, request_config: RequestConfig) -> Self {
        self.with_config(self.config().with_request_config(&request_config))
    }

    fn timeout(&self, timeout: Duration) -> Self {
        self.request(RequestConfig::new().with_timeout(timeout))
    }

    /// Merge headers by key; later values win.
    fn headers<I, K, V>(&self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<HashMap<String, String>>();
        self.with_config(self.config().with_headers(&headers))
    }

    /// Merge query parameters by key; later values win.
    fn query(&self, query: impl Into<Query>) -> Self {
        self.with_config(self.config().with_query(&query.into()))
    }
}

/// Verbs taking an explicit path relative to the builder's url.
pub trait Verbs: Configure {
    fn transport(&self) -> &Arc<dyn Transport>;

    fn get(&self, url: &str, query: Option<Query>) -> Call {
        dispatch(self.transport(), self.config(), HttpMethod::Get, url, query.as_ref(), None, None)
    }

    fn post(&self, url: &str, body: Option<Body>) -> Call {
        dispatch(self.transport(), self.config(), HttpMethod::Post, url, None, body, None)
    }

    fn put(&self, url: &str, body: Option<Body>) -> Call {
        dispatch(self.transport(), self.config(), HttpMethod::Put, url, None, body, None)
    }

    fn patch(&self, url: &str, body: Option<Body>) -> Call {
        dispatch(self.transport(), self.config(), HttpMethod::Patch, url, None, body, None)
    }

    fn delete(&self, url: &str, query: Option<Query>) -> Call {
        dispatch(self.transport(), self.config(), HttpMethod::Delete, url, query.as_ref(), None, None)
    }
}

/// Resolve one request and wrap it into a deferred [`Call`].
pub(crate) fn dispatch(
    transport: &Arc<dyn Transport>,
    config: &ApiConfig,
    method: HttpMethod,
    path: &str,
    query: Option<&Query>,
    body: Option<Body>,
    auth: Option<&str>,
) -> Call {
    let request = build_request(config, method, path, query, body, auth);
    let mapper = config
        .response_mapper
        .clone()
        .unwrap_or_else(default_mapper);
    Call::new(Arc::clone(transport), request, mapper)
}

macro_rules! impl_configure {
    ($($builder:ident),*) => {
        $(
            impl $crate::builder::Configure for $builder {
                fn config(&self) -> &$crate::config::ApiConfig {
                    &self.config
                }

                fn with_config(&self, config: $crate::config::ApiConfig) -> Self {
                    Self {
                        config,
                        transport: ::std::sync::Arc::clone(&self.transport),
                    }
                }
            }
        )*
    };
}

pub(crate) use impl_configure;

/// Root builder: every verb takes its own path.
#[derive(Clone)]
pub struct Api {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
}

impl Api {
    /// Root builder over a default reqwest transport.
    pub fn new() -> Result<Self> {
        Self::with_transport_config(TransportConfig::default())
    }

    pub fn with_transport_config(config: TransportConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            config: ApiConfig::default(),
            transport,
        }
    }

    /// Builder bound to `url`; its verbs take no path.
    pub fn url(&self, url: &str) -> UrlApi {
        UrlApi::from_parts(self.config.with_appended_url(url), Arc::clone(&self.transport))
    }

    /// REST resource rooted at `url`.
    pub fn resource(&self, url: &str) -> ResourceApi {
        ResourceApi::from_parts(self.config.with_appended_url(url), Arc::clone(&self.transport))
    }
}

impl_configure!(Api);

impl Verbs for Api {
    fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

impl std::fmt::Debug for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Api").field("config", &self.config).finish_non_exhaustive()
    }
}
