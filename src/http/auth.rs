//! HTTP authentication utilities

use std::collections::HashMap;

use base64::Engine;

use crate::config::{ApiConfig, RequestConfig};
use crate::error::{Result, RestyError};
use crate::http::request::Request;

pub const AUTHORIZATION: &str = "Authorization";

/// Authentication helper
pub struct Auth;

impl Auth {
    /// Create basic auth header value
    pub fn basic_auth(username: &str, password: &str) -> String {
        let credentials = format!("{}:{}", username, password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {}", encoded)
    }

    /// Create bearer token header value
    pub fn bearer_token(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Injector sending `Authorization: <prefix> <auth>`
    pub fn scheme(
        prefix: &str,
    ) -> impl Fn(&str, &RequestConfig) -> HashMap<String, String> + Send + Sync + 'static {
        let prefix = prefix.to_string();
        move |auth: &str, _: &RequestConfig| {
            HashMap::from([(AUTHORIZATION.to_string(), format!("{} {}", prefix, auth))])
        }
    }

    /// Parse user:password format
    pub fn parse_user_pass(input: &str) -> Result<(String, String)> {
        match input.split_once(':') {
            Some((user, pass)) if !user.is_empty() => Ok((user.to_string(), pass.to_string())),
            None if !input.is_empty() => Ok((input.to_string(), String::new())),
            _ => Err(RestyError::Auth("Invalid user:password format".to_string())),
        }
    }
}

/// Merge auth headers into `request`.
///
/// The call-time `auth` wins over the configured one. Auth headers override
/// any header of the same name already on the request.
pub fn inject_auth(request: Request, config: &ApiConfig, auth: Option<&str>) -> Request {
    let effective = auth
        .or(config.auth.as_deref())
        .filter(|value| !value.is_empty());
    let Some(effective) = effective else {
        return request;
    };

    let auth_headers = match &config.auth_injector {
        Some(injector) => injector(effective, &request.options()),
        None => HashMap::from([(AUTHORIZATION.to_string(), effective.to_string())]),
    };

    let mut headers = request.headers;
    for (name, value) in auth_headers {
        headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        headers.insert(name, value);
    }
    Request { headers, ..request }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpMethod;
    use std::sync::Arc;

    fn request() -> Request {
        Request {
            method: HttpMethod::Get,
            url: "/ola".to_string(),
            headers: HashMap::from([("X-Trace".to_string(), "1".to_string())]),
            body: None,
            timeout: None,
            response_type: None,
        }
    }

    #[test]
    fn basic_auth_encodes_credentials() {
        assert_eq!(Auth::basic_auth("user", "pass"), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn parse_user_pass_handles_missing_password() {
        assert_eq!(
            Auth::parse_user_pass("user").expect("user only"),
            ("user".to_string(), String::new())
        );
        assert_eq!(
            Auth::parse_user_pass("user:pa:ss").expect("colon in password"),
            ("user".to_string(), "pa:ss".to_string())
        );
        assert!(Auth::parse_user_pass(":x").is_err());
    }

    #[test]
    fn without_auth_request_is_unchanged() {
        let injected = inject_auth(request(), &ApiConfig::default(), None);
        assert_eq!(injected, request());
    }

    #[test]
    fn falls_back_to_raw_authorization_header() {
        let config = ApiConfig::default().with_auth("Jonny");
        let injected = inject_auth(request(), &config, None);
        assert_eq!(injected.header(AUTHORIZATION), Some("Jonny"));
        assert_eq!(injected.header("X-Trace"), Some("1"));
    }

    #[test]
    fn call_time_auth_wins_over_configured() {
        let config = ApiConfig::default().with_auth("Jonny");
        let injected = inject_auth(request(), &config, Some("Secret"));
        assert_eq!(injected.header(AUTHORIZATION), Some("Secret"));
    }

    #[test]
    fn injector_sees_request_options() {
        let config = ApiConfig::default()
            .with_auth("Jonny")
            .with_auth_injector(Arc::new(|auth: &str, options: &RequestConfig| {
                let trace = options
                    .headers
                    .as_ref()
                    .and_then(|h| h.get("X-Trace").cloned())
                    .unwrap_or_default();
                HashMap::from([
                    (AUTHORIZATION.to_string(), format!("Tokenz {}", auth)),
                    ("X-Auth-Trace".to_string(), trace),
                ])
            }));
        let injected = inject_auth(request(), &config, None);
        assert_eq!(injected.header(AUTHORIZATION), Some("Tokenz Jonny"));
        assert_eq!(injected.header("X-Auth-Trace"), Some("1"));
    }

    #[test]
    fn auth_headers_override_existing_ones() {
        let mut base = request();
        base.headers
            .insert(AUTHORIZATION.to_string(), "stale".to_string());
        let config = ApiConfig::default().with_auth_injector(Arc::new(Auth::scheme("Token")));
        let injected = inject_auth(base, &config, Some("fresh"));
        assert_eq!(injected.header(AUTHORIZATION), Some("Token fresh"));
    }

    #[test]
    fn empty_auth_is_ignored() {
        let config = ApiConfig::default().with_auth("");
        let injected = inject_auth(request(), &config, None);
        assert_eq!(injected.header(AUTHORIZATION), None);
    }
}
