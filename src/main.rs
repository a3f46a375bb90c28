use clap::{Parser, Subcommand};
use serde_json::Value;
use std::error::Error;
use std::io;
use std::process::ExitCode;
use std::time::Duration;

use api_probe::config;
use api_probe::demo::cell;
use api_probe::{ApiClient, Body, Console, Method, Recorder, RequestOptions, RunSummary, demo};

/// api-probe - ad-hoc HTTP API testing
#[derive(Parser, Debug)]
#[command(
    name = "api-probe",
    about = "Ad-hoc HTTP API testing with outcome classification and field extraction",
    after_help = "ENVIRONMENT VARIABLES:\n\
        API_PROBE_TIMEOUT     Per-request timeout (seconds)\n\
        API_PROBE_BASE_URL    Base URL for the demo run\n\
        API_PROBE_TOKEN       Bearer token attached to requests\n\
        API_PROBE_LOG         Log filter (e.g. api_probe=debug)\n\
        NO_COLOR              Disable colored output"
)]
struct Args {
    /// Per-request timeout in seconds [default: API_PROBE_TIMEOUT or 10]
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the CRUD demo against a users/posts service
    Demo {
        /// Base URL of the service [default: API_PROBE_BASE_URL or the public demo service]
        #[arg(long)]
        base_url: Option<String>,

        /// Bearer token attached to every request [default: API_PROBE_TOKEN]
        #[arg(long)]
        token: Option<String>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send one request and report on it
    Request {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE, OPTIONS)
        method: Method,

        /// Target URL
        url: String,

        /// Request body; sent as JSON when it parses as JSON
        #[arg(short, long)]
        body: Option<String>,

        /// Extra header as "Name: value" (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// Bearer token [default: API_PROBE_TOKEN]
        #[arg(long)]
        token: Option<String>,

        /// Expect a non-2xx response or a transport error
        #[arg(long)]
        expect_failure: bool,

        /// Dotted path to extract from the response (repeatable)
        #[arg(short, long)]
        extract: Vec<String>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = Args::parse();
    init_tracing();

    let timeout = request_timeout(args.timeout);
    let color = config::get().output.color && !args.no_color;

    match args.command {
        Some(Commands::Demo {
            base_url,
            token,
            json,
        }) => {
            let api = ApiClient::new()?.timeout(timeout);
            let mut recorder = Recorder::new(console(json, color));
            let base_url = base_url_or_default(base_url);
            let token = token_or_default(token);

            tracing::info!(%base_url, "starting demo run");
            let summary = demo::run(&api, &mut recorder, &base_url, token.as_deref());
            finish(summary, json)
        }

        Some(Commands::Request {
            method,
            url,
            body,
            headers,
            token,
            expect_failure,
            extract,
            json,
        }) => {
            let api = ApiClient::new()?.timeout(timeout);
            let mut recorder = Recorder::new(console(json, color));

            let mut options = RequestOptions::new().should_fail(expect_failure);
            if let Some(body) = body {
                options = options.body(parse_body(body));
            }
            if let Some(token) = token_or_default(token) {
                options = options.bearer(token);
            }
            for (name, value) in headers {
                options = options.header(name, value);
            }

            let description = format!("{} {}", method, url);
            let outcome = api.execute(method, &url, options);
            let paths: Vec<&str> = extract.iter().map(String::as_str).collect();
            let values = recorder.evaluate(&description, &outcome, &paths).values();

            if !paths.is_empty() {
                recorder.print_info(
                    "Extracted",
                    paths.iter().zip(&values).map(|(path, value)| {
                        (path.to_string(), cell(value.as_ref()))
                    }),
                );
            }

            let summary = recorder.summarize("Result");
            finish(summary, json)
        }

        None => {
            println!("api-probe - ad-hoc HTTP API testing");
            println!();
            println!("Usage: api-probe <COMMAND>");
            println!();
            println!("Commands:");
            println!("  demo     Run the CRUD demo against a users/posts service");
            println!("  request  Send one request and report on it");
            println!();
            println!("Run with --help for more information.");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn finish(summary: Option<RunSummary>, json: bool) -> Result<ExitCode, Box<dyn Error>> {
    if json {
        let value = match &summary {
            Some(summary) => serde_json::to_value(summary)?,
            None => Value::Null,
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    }

    let passed = summary.as_ref().is_none_or(RunSummary::all_passed);
    Ok(if passed { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Panels go to stderr when stdout is reserved for JSON
fn console(json: bool, color: bool) -> Console<Box<dyn io::Write>> {
    if json {
        Console::new(Box::new(io::stderr()), false)
    } else {
        Console::new(Box::new(io::stdout()), color)
    }
}

/// `--timeout` when positive, otherwise the configured timeout
fn request_timeout(flag: Option<u64>) -> Duration {
    flag.filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(config::request_timeout)
}

fn base_url_or_default(flag: Option<String>) -> String {
    flag.map(|url| config::normalize_base_url(&url))
        .unwrap_or_else(config::base_url)
}

fn token_or_default(flag: Option<String>) -> Option<String> {
    flag.filter(|token| !token.trim().is_empty())
        .or_else(|| config::get().http.bearer_token.clone())
}

fn parse_body(body: String) -> Body {
    match serde_json::from_str::<Value>(&body) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Body::Json(value),
        _ => Body::Text(body),
    }
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("header '{}' must look like 'Name: value'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("header '{}' has an empty name", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_new(&config::get().output.log_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config::DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("X-Source: demo"),
            Ok(("X-Source".to_string(), "demo".to_string()))
        );
        assert_eq!(
            parse_header("Authorization:Bearer a:b"),
            Ok(("Authorization".to_string(), "Bearer a:b".to_string()))
        );
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(
            parse_body(r#"{"title":"x"}"#.to_string()),
            Body::Json(serde_json::json!({"title": "x"}))
        );
        assert_eq!(parse_body("42".to_string()), Body::Text("42".to_string()));
        assert_eq!(parse_body("a=b".to_string()), Body::Text("a=b".to_string()));
    }

    #[test]
    fn test_timeout_flag_falls_back_to_config() {
        assert_eq!(request_timeout(None), config::request_timeout());
        assert_eq!(request_timeout(Some(0)), config::request_timeout());
        assert_eq!(request_timeout(Some(3)), Duration::from_secs(3));
    }

    #[test]
    fn test_timeout_flag_is_optional() {
        let args = Args::try_parse_from(["api-probe", "demo"]).unwrap();
        assert_eq!(args.timeout, None);

        let args = Args::try_parse_from(["api-probe", "--timeout", "0", "demo"]).unwrap();
        assert_eq!(args.timeout, Some(0));
        assert!(Args::try_parse_from(["api-probe", "--timeout", "abc", "demo"]).is_err());
    }

    #[test]
    fn test_base_url_and_token_fall_back_to_config() {
        assert_eq!(base_url_or_default(None), config::base_url());
        assert_eq!(
            base_url_or_default(Some("http://localhost:3000/".into())),
            "http://localhost:3000"
        );

        let configured = config::get().http.bearer_token.clone();
        assert_eq!(token_or_default(None), configured);
        assert_eq!(token_or_default(Some(" ".into())), configured);
        assert_eq!(token_or_default(Some("secret".into())), Some("secret".to_string()));
    }

    #[test]
    fn test_args_parse_request() {
        let args = Args::try_parse_from([
            "api-probe",
            "request",
            "post",
            "http://localhost/posts",
            "-H",
            "X-Source: demo",
            "--expect-failure",
            "-e",
            "id",
        ])
        .unwrap();

        match args.command {
            Some(Commands::Request {
                method,
                headers,
                expect_failure,
                extract,
                ..
            }) => {
                assert_eq!(method, Method::Post);
                assert_eq!(headers, vec![("X-Source".to_string(), "demo".to_string())]);
                assert!(expect_failure);
                assert_eq!(extract, vec!["id".to_string()]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
