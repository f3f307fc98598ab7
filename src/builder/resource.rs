//! REST resource builders
//!
//! A resource treats its curried url as a collection root:
//!
//! | operation        | request                  |
//! |------------------|--------------------------|
//! | `list`           | `GET {url}`              |
//! | `detail`         | `GET {url}/{pk}`         |
//! | `create`         | `POST {url}`             |
//! | `update`         | `PUT {url}/{pk}`         |
//! | `partial_update` | `PATCH {url}/{pk}`       |
//! | `remove`         | `DELETE {url}/{pk}`      |
//! | `remove_id`      | `DELETE {url}/{pk}`, resolves to `{"id": pk}` |

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::builder::{dispatch, impl_configure, Verbs};
use crate::config::{ApiConfig, HttpMethod};
use crate::http::call::Call;
use crate::http::request::Body;
use crate::http::response::Response;
use crate::http::Transport;
use crate::query::Query;

/// Primary key of a resource item
///
/// Unsigned ids land in `Int` whenever they fit, so `Pk::from(5u64) == Pk::from(5)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pk {
    Int(i64),
    UInt(u64),
    Str(String),
}

impl Pk {
    pub fn to_json(&self) -> Value {
        match self {
            Pk::Int(id) => json!(id),
            Pk::UInt(id) => json!(id),
            Pk::Str(id) => json!(id),
        }
    }

    fn path(&self) -> String {
        format!("/{}", self)
    }
}

impl fmt::Display for Pk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pk::Int(id) => write!(f, "{}", id),
            Pk::UInt(id) => write!(f, "{}", id),
            Pk::Str(id) => write!(f, "{}", id),
        }
    }
}

macro_rules! pk_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Pk {
                fn from(id: $ty) -> Self {
                    Pk::Int(i64::from(id))
                }
            }
        )*
    };
}

pk_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! pk_from_wide {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Pk {
                fn from(id: $ty) -> Self {
                    match i64::try_from(id) {
                        Ok(id) => Pk::Int(id),
                        Err(_) => Pk::UInt(id as u64),
                    }
                }
            }
        )*
    };
}

pk_from_wide!(u64, usize);

impl From<&str> for Pk {
    fn from(id: &str) -> Self {
        Pk::Str(id.to_string())
    }
}

impl From<String> for Pk {
    fn from(id: String) -> Self {
        Pk::Str(id)
    }
}

/// The resource operations, parameterized by an optional call-time auth.
struct Operations<'a> {
    transport: &'a Arc<dyn Transport>,
    config: &'a ApiConfig,
    auth: Option<&'a str>,
}

impl Operations<'_> {
    fn list(&self, query: Option<Query>) -> Call {
        self.send(HttpMethod::Get, "", query, None)
    }

    fn detail(&self, pk: &Pk, query: Option<Query>) -> Call {
        self.send(HttpMethod::Get, &pk.path(), query, None)
    }

    fn create(&self, body: Option<Body>) -> Call {
        self.send(HttpMethod::Post, "", None, body)
    }

    fn update(&self, pk: &Pk, body: Option<Body>) -> Call {
        self.send(HttpMethod::Put, &pk.path(), None, body)
    }

    fn partial_update(&self, pk: &Pk, body: Option<Body>) -> Call {
        self.send(HttpMethod::Patch, &pk.path(), None, body)
    }

    fn remove(&self, pk: &Pk, query: Option<Query>) -> Call {
        self.send(HttpMethod::Delete, &pk.path(), query, None)
    }

    /// The mapper override only applies to this call.
    fn remove_id(&self, pk: &Pk, query: Option<Query>) -> Call {
        let id = pk.to_json();
        let config = self
            .config
            .with_response_mapper(Arc::new(move |_: Response| json!({ "id": id.clone() })));
        dispatch(
            self.transport,
            &config,
            HttpMethod::Delete,
            &pk.path(),
            query.as_ref(),
            None,
            self.auth,
        )
    }

    fn send(&self, method: HttpMethod, path: &str, query: Option<Query>, body: Option<Body>) -> Call {
        dispatch(self.transport, self.config, method, path, query.as_ref(), body, self.auth)
    }
}

/// Builder exposing REST conventions over a collection url.
#[derive(Clone)]
pub struct ResourceApi {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
}

impl ResourceApi {
    pub(crate) fn from_parts(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Same configuration, operations take the auth value first.
    pub fn curry_auth(&self) -> CurriedAuthResourceApi {
        CurriedAuthResourceApi {
            config: self.config.clone(),
            transport: Arc::clone(&self.transport),
        }
    }

    pub fn list(&self, query: Option<Query>) -> Call {
        self.operations().list(query)
    }

    pub fn detail(&self, pk: impl Into<Pk>, query: Option<Query>) -> Call {
        self.operations().detail(&pk.into(), query)
    }

    pub fn create(&self, body: Option<Body>) -> Call {
        self.operations().create(body)
    }

    pub fn update(&self, pk: impl Into<Pk>, body: Option<Body>) -> Call {
        self.operations().update(&pk.into(), body)
    }

    pub fn partial_update(&self, pk: impl Into<Pk>, body: Option<Body>) -> Call {
        self.operations().partial_update(&pk.into(), body)
    }

    pub fn remove(&self, pk: impl Into<Pk>, query: Option<Query>) -> Call {
        self.operations().remove(&pk.into(), query)
    }

    /// Delete `{url}/{pk}` and resolve to `{"id": pk}` whatever the body.
    ///
    /// Transport failures still fail the call.
    pub fn remove_id(&self, pk: impl Into<Pk>, query: Option<Query>) -> Call {
        self.operations().remove_id(&pk.into(), query)
    }

    fn operations(&self) -> Operations<'_> {
        Operations {
            transport: &self.transport,
            config: &self.config,
            auth: None,
        }
    }
}

impl_configure!(ResourceApi);

impl Verbs for ResourceApi {
    fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

impl fmt::Debug for ResourceApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceApi")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Resource builder whose operations take the auth value first and return a
/// function awaiting the rest of the arguments.
#[derive(Clone)]
pub struct CurriedAuthResourceApi {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
}

impl CurriedAuthResourceApi {
    pub fn list(&self, auth: &str) -> impl Fn(Option<Query>) -> Call + Send + Sync + 'static {
        let (config, transport, auth) = self.bind(auth);
        move |query| operations(&transport, &config, &auth).list(query)
    }

    pub fn detail(&self, auth: &str) -> impl Fn(Pk, Option<Query>) -> Call + Send + Sync + 'static {
        let (config, transport, auth) = self.bind(auth);
        move |pk, query| operations(&transport, &config, &auth).detail(&pk, query)
    }

    pub fn create(&self, auth: &str) -> impl Fn(Option<Body>) -> Call + Send + Sync + 'static {
        let (config, transport, auth) = self.bind(auth);
        move |body| operations(&transport, &config, &auth).create(body)
    }

    pub fn update(&self, auth: &str) -> impl Fn(Pk, Option<Body>) -> Call + Send + Sync + 'static {
        let (config, transport, auth) = self.bind(auth);
        move |pk, body| operations(&transport, &config, &auth).update(&pk, body)
    }

    pub fn partial_update(
        &self,
        auth: &str,
    ) -> impl Fn(Pk, Option<Body>) -> Call + Send + Sync + 'static {
        let (config, transport, auth) = self.bind(auth);
        move |pk, body| operations(&transport, &config, &auth).partial_update(&pk, body)
    }

    pub fn remove(&self, auth: &str) -> impl Fn(Pk, Option<Query>) -> Call + Send + Sync + 'static {
        let (config, transport, auth) = self.bind(auth);
        move |pk, query| operations(&transport, &config, &auth).remove(&pk, query)
    }

    pub fn remove_id(
        &self,
        auth: &str,
    ) -> impl Fn(Pk, Option<Query>) -> Call + Send + Sync + 'static {
        let (config, transport, auth) = self.bind(auth);
        move |pk, query| operations(&transport, &config, &auth).remove_id(&pk, query)
    }

    fn bind(&self, auth: &str) -> (ApiConfig, Arc<dyn Transport>, String) {
        (self.config.clone(), Arc::clone(&self.transport), auth.to_string())
    }
}

fn operations<'a>(
    transport: &'a Arc<dyn Transport>,
    config: &'a ApiConfig,
    auth: &'a str,
) -> Operations<'a> {
    Operations {
        transport,
        config,
        auth: Some(auth),
    }
}

impl_configure!(CurriedAuthResourceApi);

impl fmt::Debug for CurriedAuthResourceApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurriedAuthResourceApi")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
