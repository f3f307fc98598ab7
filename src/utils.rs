//! Utility functions and helpers

use crate::error::{Result, RestyError};
use crate::query::Query;
use std::path::PathBuf;

/// URL splitting, serialization and composition
pub struct UrlUtils;

impl UrlUtils {
    /// Split a URL string into its path and its parsed query string.
    ///
    /// Any `#fragment` is dropped.
    pub fn split(input: &str) -> (String, Query) {
        let without_fragment = input.split('#').next().unwrap_or_default();
        match without_fragment.split_once('?') {
            Some((path, query)) => (path.to_string(), Query::parse(query)),
            None => (without_fragment.to_string(), Query::new()),
        }
    }

    /// Join a path and a query mapping back into one URL string.
    pub fn stringify(path: &str, query: &Query) -> String {
        if query.is_empty() {
            return path.to_string();
        }
        format!("{}?{}", path, query.to_query_string())
    }

    /// Build the final request URL.
    ///
    /// Query precedence, lowest first: `stored`, the query string embedded in
    /// `base_url + relative_url + path`, then `call`.
    pub fn compose(
        base_url: &str,
        relative_url: &str,
        path: &str,
        stored: Option<&Query>,
        call: Option<&Query>,
        trailing_slash: bool,
    ) -> String {
        let full = format!("{}{}{}", base_url, relative_url, path);
        let (mut clean, embedded) = Self::split(&full);

        let empty = Query::new();
        let query = Query::merge_layers([
            stored.unwrap_or(&empty),
            &embedded,
            call.unwrap_or(&empty),
        ]);

        if trailing_slash && !clean.is_empty() && !clean.ends_with('/') {
            clean.push('/');
        }

        Self::stringify(&clean, &query)
    }

    /// Whether the URL carries a scheme and can be sent as-is.
    pub fn is_absolute(input: &str) -> bool {
        input.contains("://")
    }
}

/// File system utilities
pub struct FileUtils;

impl FileUtils {
    /// Expand tilde (~) in file paths
    pub fn expand_path(path: &str) -> Result<PathBuf> {
        match path.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .ok_or_else(|| RestyError::Config("Cannot determine home directory".to_string())),
            None => Ok(PathBuf::from(path)),
        }
    }
}

/// String utilities
pub struct StringUtils;

impl StringUtils {
    /// Parse `Key: value` header arguments
    pub fn parse_header(input: &str) -> Result<(String, String)> {
        match input.split_once(':') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(RestyError::Config(format!(
                "Invalid header format: '{}'. Expected 'key: value'",
                input
            ))),
        }
    }

    /// Parse `key=value` pairs used for query and form arguments
    pub fn parse_pair(input: &str) -> Result<(String, String)> {
        match input.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(RestyError::Config(format!(
                "Invalid pair format: '{}'. Expected 'key=value'",
                input
            ))),
        }
    }

    /// Parse timeout values (supports suffixes like 's', 'm', 'h')
    pub fn parse_timeout(input: &str) -> Result<std::time::Duration> {
        if let Ok(seconds) = input.parse::<u64>() {
            return Ok(std::time::Duration::from_secs(seconds));
        }

        let (number_part, suffix) = if let Some(stripped) = input.strip_suffix('s') {
            (stripped, 1)
        } else if let Some(stripped) = input.strip_suffix('m') {
            (stripped, 60)
        } else if let Some(stripped) = input.strip_suffix('h') {
            (stripped, 3600)
        } else {
            return Err(RestyError::Config(format!(
                "Invalid timeout format: '{}'. Use number with optional suffix (s/m/h)",
                input
            )));
        };

        let number: u64 = number_part
            .parse()
            .map_err(|_| RestyError::Config(format!("Invalid timeout number: '{}'", number_part)))?;

        Ok(std::time::Duration::from_secs(number * suffix))
    }
}
