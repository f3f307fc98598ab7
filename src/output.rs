//! Rendering call results for the command line

use std::fs;
use std::io::{self, Write};

use serde_json::Value;

use crate::config::OutputConfig;
use crate::error::Result;
use crate::http::request::Request;
use crate::http::response::ResponseFormatter;

/// Sends rendered values to stdout or to the `-o` file
pub struct OutputWriter {
    config: OutputConfig,
    formatter: ResponseFormatter,
}

impl OutputWriter {
    pub fn new(config: OutputConfig) -> Self {
        let formatter = ResponseFormatter::new(config.pretty);
        Self { config, formatter }
    }

    /// Render a mapped call result and write it out.
    pub fn write_value(&self, value: &Value) -> Result<()> {
        let rendered = self.formatter.format(value)?;
        self.write(&rendered)
    }

    /// File output is written as-is; stdout output ends with a newline.
    pub fn write(&self, content: &str) -> Result<()> {
        match &self.config.file {
            Some(path) => Ok(fs::write(path, content)?),
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(content.as_bytes())?;
                if !content.is_empty() && !content.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                Ok(())
            }
        }
    }

    /// One-line description of the request about to be sent, with `-v`.
    pub fn write_summary(&self, request: &Request) {
        if let Some(line) = self.summary(request) {
            eprintln!("{}", line);
        }
    }

    pub fn write_error(&self, message: &str) {
        if !self.config.silent {
            eprintln!("resty: error: {}", message);
        }
    }

    fn summary(&self, request: &Request) -> Option<String> {
        if !self.config.verbose || self.config.silent {
            return None;
        }
        let mut names = request.headers.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        Some(if names.is_empty() {
            format!("* {} {}", request.method, request.url)
        } else {
            format!("* {} {} [{}]", request.method, request.url, names.join(", "))
        })
    }
}
