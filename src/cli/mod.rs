//! CLI argument parsing module
//!
//! A thin command line front end over the builder: every flag becomes one
//! builder operation, and the path becomes one verb call.

use std::path::Path;
use std::str::FromStr;

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::builder::{Api, Configure, Verbs};
use crate::config::{HttpMethod, OutputConfig, RequestConfig, ResponseType, TransportConfig};
use crate::error::{Result, RestyError};
use crate::exit_code::exit_code_for_error;
use crate::http::auth::Auth;
use crate::http::call::Call;
use crate::http::request::{Body, FormData};
use crate::logging;
use crate::output::OutputWriter;
use crate::query::{Query, QueryValue};
use crate::utils::{FileUtils, StringUtils};

/// Main entry point for the CLI application
pub fn run() {
    let matches = create_app().get_matches();
    logging::init(matches.get_flag("verbose"));

    let output = match build_output_config(&matches) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("resty: error: {}", e);
            std::process::exit(exit_code_for_error(&e));
        }
    };
    let writer = OutputWriter::new(output);

    if let Err(e) = run_with_args(&matches, &writer) {
        writer.write_error(&e.to_string());
        std::process::exit(exit_code_for_error(&e));
    }
}

/// Run resty with parsed command line arguments
fn run_with_args(matches: &ArgMatches, writer: &OutputWriter) -> Result<()> {
    let api = build_api(matches)?;
    let call = build_call(&api, matches)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| RestyError::Config(format!("Failed to create async runtime: {}", e)))?;

    writer.write_summary(call.request());
    let value = rt.block_on(call.send())?;
    writer.write_value(&value)
}

/// Create the CLI application structure
pub fn create_app() -> Command {
    Command::new("resty")
        .version(crate::VERSION)
        .about("Send one request through the resty builder")
        .arg(Arg::new("path")
            .help("Request path, appended to --base-url")
            .required(true)
            .index(1))
        .arg(Arg::new("request")
            .short('X')
            .long("request")
            .value_name("METHOD")
            .help("HTTP request method")
            .default_value("GET"))
        .arg(Arg::new("base-url")
            .short('b')
            .long("base-url")
            .value_name("URL")
            .env("RESTY_BASE_URL")
            .help("Prefix for the request path"))
        .arg(Arg::new("header")
            .short('H')
            .long("header")
            .value_name("HEADER")
            .help("Add custom HTTP header")
            .action(ArgAction::Append))
        .arg(Arg::new("query")
            .short('q')
            .long("query")
            .value_name("KEY=VALUE")
            .help("Add a query parameter; repeat a key for a list")
            .action(ArgAction::Append))
        .arg(Arg::new("data")
            .short('d')
            .long("data")
            .value_name("DATA")
            .help("Request body, sent as JSON when it parses as JSON")
            .conflicts_with("form"))
        .arg(Arg::new("form")
            .short('F')
            .long("form")
            .value_name("KEY=VALUE")
            .help("Multipart form field; KEY=@FILE attaches a file")
            .action(ArgAction::Append))
        .arg(Arg::new("auth")
            .short('a')
            .long("auth")
            .value_name("TOKEN")
            .env("RESTY_AUTH")
            .help("Auth value sent with the request"))
        .arg(Arg::new("auth-scheme")
            .long("auth-scheme")
            .value_name("PREFIX")
            .help("Send auth as 'Authorization: PREFIX TOKEN'"))
        .arg(Arg::new("user")
            .short('u')
            .long("user")
            .value_name("USER[:PASSWORD]")
            .help("HTTP basic authentication")
            .conflicts_with("auth"))
        .arg(Arg::new("trailing-slash")
            .long("trailing-slash")
            .help("Force a trailing slash on the request path")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("text")
            .long("text")
            .help("Keep the response body as text")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("pretty")
            .long("pretty")
            .help("Pretty-print JSON responses")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("Verbose output")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("silent")
            .short('s')
            .long("silent")
            .help("Silent mode")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("FILE")
            .help("Write output to file"))
        .arg(Arg::new("insecure")
            .short('k')
            .long("insecure")
            .help("Allow insecure SSL connections")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("user-agent")
            .short('A')
            .long("user-agent")
            .value_name("STRING")
            .help("User-Agent header"))
        .arg(Arg::new("timeout")
            .long("timeout")
            .value_name("SECONDS")
            .help("Maximum time for operation")
            .default_value("300"))
        .arg(Arg::new("connect-timeout")
            .long("connect-timeout")
            .value_name("SECONDS")
            .help("Maximum time for connection")
            .default_value("30"))
}

/// Build the output configuration from command line arguments
pub fn build_output_config(matches: &ArgMatches) -> Result<OutputConfig> {
    let file = matches
        .get_one::<String>("output")
        .map(|path| FileUtils::expand_path(path))
        .transpose()?;

    Ok(OutputConfig {
        file,
        verbose: matches.get_flag("verbose"),
        silent: matches.get_flag("silent"),
        pretty: matches.get_flag("pretty"),
    })
}

/// Build the transport configuration from command line arguments
pub fn build_transport_config(matches: &ArgMatches) -> Result<TransportConfig> {
    let mut config = TransportConfig {
        insecure: matches.get_flag("insecure"),
        ..TransportConfig::default()
    };

    if let Some(timeout) = matches.get_one::<String>("timeout") {
        config.timeout = StringUtils::parse_timeout(timeout)?;
    }

    if let Some(connect_timeout) = matches.get_one::<String>("connect-timeout") {
        config.connect_timeout = StringUtils::parse_timeout(connect_timeout)?;
    }

    if let Some(user_agent) = matches.get_one::<String>("user-agent") {
        config.user_agent = Some(user_agent.clone());
    }

    Ok(config)
}

/// Apply every configuration flag to a fresh root builder
pub fn build_api(matches: &ArgMatches) -> Result<Api> {
    let api = Api::with_transport_config(build_transport_config(matches)?)?;
    configure_api(api, matches)
}

/// Apply the builder-level flags to `api`
pub fn configure_api(mut api: Api, matches: &ArgMatches) -> Result<Api> {
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        api = api.base_url(base_url.as_str());
    }

    if let Some(headers) = matches.get_many::<String>("header") {
        let parsed = headers
            .map(|header| StringUtils::parse_header(header))
            .collect::<Result<Vec<_>>>()?;
        api = api.headers(parsed);
    }

    if let Some(pairs) = matches.get_many::<String>("query") {
        api = api.query(parse_query(pairs)?);
    }

    if let Some(auth) = matches.get_one::<String>("auth") {
        api = api.auth(auth.as_str());
    }

    if let Some(user) = matches.get_one::<String>("user") {
        let (username, password) = Auth::parse_user_pass(user)?;
        api = api.auth(Auth::basic_auth(&username, &password));
    }

    if let Some(prefix) = matches.get_one::<String>("auth-scheme") {
        api = api.auth_headers(Auth::scheme(prefix));
    }

    if matches.get_flag("trailing-slash") {
        api = api.trailing_slash(true);
    }

    if matches.get_flag("text") {
        api = api.request(RequestConfig::new().with_response_type(ResponseType::Text));
    }

    Ok(api)
}

/// Resolve the verb call described by the arguments
pub fn build_call(api: &Api, matches: &ArgMatches) -> Result<Call> {
    let path = matches
        .get_one::<String>("path")
        .ok_or_else(|| RestyError::Config("Missing request path".to_string()))?;
    let method = matches
        .get_one::<String>("request")
        .map(|method| HttpMethod::from_str(method))
        .transpose()?
        .unwrap_or(HttpMethod::Get);
    let body = build_body(matches)?;

    let call = match (method, body) {
        (HttpMethod::Get | HttpMethod::Delete, Some(_)) => {
            return Err(RestyError::Config(format!(
                "{} requests take no body; drop -d/-F or pick POST, PUT or PATCH",
                method
            )));
        }
        (HttpMethod::Get, None) => api.get(path, None),
        (HttpMethod::Delete, None) => api.delete(path, None),
        (HttpMethod::Post, body) => api.post(path, body),
        (HttpMethod::Put, body) => api.put(path, body),
        (HttpMethod::Patch, body) => api.patch(path, body),
    };
    Ok(call)
}

fn parse_query<'a>(pairs: impl Iterator<Item = &'a String>) -> Result<Query> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for pair in pairs {
        let (key, value) = StringUtils::parse_pair(pair)?;
        match grouped.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, values)) => values.push(value),
            None => grouped.push((key, vec![value])),
        }
    }

    Ok(grouped
        .into_iter()
        .map(|(key, mut values)| {
            if values.len() == 1 {
                (key, QueryValue::One(values.remove(0)))
            } else {
                (key, QueryValue::Many(values))
            }
        })
        .collect::<Query>())
}

fn build_body(matches: &ArgMatches) -> Result<Option<Body>> {
    if let Some(data) = matches.get_one::<String>("data") {
        let body = match serde_json::from_str(data) {
            Ok(value) => Body::Json(value),
            Err(_) => Body::Text(data.clone()),
        };
        return Ok(Some(body));
    }

    if let Some(fields) = matches.get_many::<String>("form") {
        let mut form = FormData::new();
        for field in fields {
            let (name, value) = StringUtils::parse_pair(field)?;
            form = match value.strip_prefix('@') {
                Some(file) => {
                    let path = FileUtils::expand_path(file)?;
                    let bytes = std::fs::read(&path)?;
                    form.file(name, file_name(&path), bytes, None)
                }
                None => form.text(name, value),
            };
        }
        return Ok(Some(Body::Multipart(form)));
    }

    Ok(None)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string())
}
