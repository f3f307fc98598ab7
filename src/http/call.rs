//! Deferred requests
//!
//! A [`Call`] is a description of work: building one never touches the
//! network. Each `send`/`.await` issues exactly one transport call.

use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ResponseMapper;
use crate::error::Result;
use crate::http::request::Request;
use crate::http::Transport;

/// A resolved request waiting to be sent
#[derive(Clone)]
pub struct Call {
    transport: Arc<dyn Transport>,
    request: Request,
    mapper: ResponseMapper,
}

impl Call {
    pub fn new(transport: Arc<dyn Transport>, request: Request, mapper: ResponseMapper) -> Self {
        Self {
            transport,
            request,
            mapper,
        }
    }

    /// The request this call will send.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Send the request and map the response.
    pub async fn send(self) -> Result<Value> {
        let Call {
            transport,
            request,
            mapper,
        } = self;
        log::debug!("{} {}", request.method, request.url);
        let response = transport.send(request).await?;
        Ok(mapper(response))
    }

    /// Send and deserialize the mapped value.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let value = self.send().await?;
        Ok(serde_json::from_value(value)?)
    }
}

impl IntoFuture for Call {
    type Output = Result<Value>;
    type IntoFuture = BoxFuture<'static, Result<Value>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.send())
    }
}

impl fmt::Debug for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}
