//! Builders bound to a curried url

use std::fmt;
use std::sync::Arc;

use crate::builder::resource::ResourceApi;
use crate::builder::{dispatch, impl_configure};
use crate::config::{ApiConfig, HttpMethod};
use crate::http::call::Call;
use crate::http::request::Body;
use crate::http::Transport;
use crate::query::Query;

/// Builder whose verbs hit its curried url.
#[derive(Clone)]
pub struct UrlApi {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
}

impl UrlApi {
    pub(crate) fn from_parts(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Append `url` to the curried url: `.url("/a").url("/b")` targets `/a/b`.
    pub fn url(&self, url: &str) -> UrlApi {
        UrlApi::from_parts(self.config.with_appended_url(url), Arc::clone(&self.transport))
    }

    /// REST resource rooted below the curried url.
    pub fn resource(&self, url: &str) -> ResourceApi {
        ResourceApi::from_parts(self.config.with_appended_url(url), Arc::clone(&self.transport))
    }

    /// Same configuration, verbs take the auth value first.
    pub fn curry_auth(&self) -> CurriedAuthUrlApi {
        CurriedAuthUrlApi {
            config: self.config.clone(),
            transport: Arc::clone(&self.transport),
        }
    }

    pub fn get(&self, query: Option<Query>) -> Call {
        self.send(HttpMethod::Get, query, None)
    }

    pub fn post(&self, body: Option<Body>) -> Call {
        self.send(HttpMethod::Post, None, body)
    }

    pub fn put(&self, body: Option<Body>) -> Call {
        self.send(HttpMethod::Put, None, body)
    }

    pub fn patch(&self, body: Option<Body>) -> Call {
        self.send(HttpMethod::Patch, None, body)
    }

    pub fn delete(&self, query: Option<Query>) -> Call {
        self.send(HttpMethod::Delete, query, None)
    }

    fn send(&self, method: HttpMethod, query: Option<Query>, body: Option<Body>) -> Call {
        dispatch(&self.transport, &self.config, method, "", query.as_ref(), body, None)
    }
}

impl_configure!(UrlApi);

impl fmt::Debug for UrlApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlApi").field("config", &self.config).finish_non_exhaustive()
    }
}

/// Url builder whose verbs take the auth value first and return a function
/// awaiting the payload.
///
/// ```no_run
/// # use resty::prelude::*;
/// # fn run(api: Api) {
/// let send = api.url("/messages").curry_auth().post("token");
/// let call = send(Some(serde_json::json!({ "text": "hi" }).into()));
/// # let _ = call;
/// # }
/// ```
#[derive(Clone)]
pub struct CurriedAuthUrlApi {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
}

impl CurriedAuthUrlApi {
    pub fn get(&self, auth: &str) -> impl Fn(Option<Query>) -> Call + Send + Sync + 'static {
        let send = self.sender(HttpMethod::Get, auth);
        move |query| send(query, None)
    }

    pub fn post(&self, auth: &str) -> impl Fn(Option<Body>) -> Call + Send + Sync + 'static {
        let send = self.sender(HttpMethod::Post, auth);
        move |body| send(None, body)
    }

    pub fn put(&self, auth: &str) -> impl Fn(Option<Body>) -> Call + Send + Sync + 'static {
        let send = self.sender(HttpMethod::Put, auth);
        move |body| send(None, body)
    }

    pub fn patch(&self, auth: &str) -> impl Fn(Option<Body>) -> Call + Send + Sync + 'static {
        let send = self.sender(HttpMethod::Patch, auth);
        move |body| send(None, body)
    }

    pub fn delete(&self, auth: &str) -> impl Fn(Option<Query>) -> Call + Send + Sync + 'static {
        let send = self.sender(HttpMethod::Delete, auth);
        move |query| send(query, None)
    }

    fn sender(
        &self,
        method: HttpMethod,
        auth: &str,
    ) -> impl Fn(Option<Query>, Option<Body>) -> Call + Send + Sync + 'static {
        let config = self.config.clone();
        let transport = Arc::clone(&self.transport);
        let auth = auth.to_string();
        move |query, body| {
            dispatch(&transport, &config, method, "", query.as_ref(), body, Some(&auth))
        }
    }
}

impl_configure!(CurriedAuthUrlApi);

impl fmt::Debug for CurriedAuthUrlApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurriedAuthUrlApi")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
