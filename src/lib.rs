//! resty - An immutable, fluent HTTP request builder
//!
//! Builders accumulate base url, headers, query parameters, auth and
//! response mapping without ever mutating an earlier configuration. Verbs
//! resolve the request up front and hand back a deferred [`Call`] that hits
//! the network only when awaited.

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod exit_code;
pub mod http;
pub mod logging;
pub mod output;
pub mod query;
pub mod utils;

pub use builder::{
    Api, Configure, CurriedAuthResourceApi, CurriedAuthUrlApi, Pk, ResourceApi, UrlApi, Verbs,
};
pub use error::{Result, RestyError};
pub use http::call::Call;
pub use http::request::{Body, FormData, Request};
pub use http::response::Response;
pub use http::{ReqwestTransport, Transport};
pub use query::{Query, QueryValue};

/// Root builder over the default reqwest transport.
///
/// Shorthand for [`Api::new`]; every other builder derives from the one it returns.
pub fn api() -> Result<Api> {
    Api::new()
}

/// Everything needed to build and send requests.
pub mod prelude {
    pub use crate::api;
    pub use crate::builder::{Api, Configure, Pk, Verbs};
    pub use crate::config::{RequestConfig, ResponseType};
    pub use crate::http::auth::Auth;
    pub use crate::http::call::Call;
    pub use crate::http::request::{Body, FormData};
    pub use crate::http::response::Response;
    pub use crate::query::Query;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
