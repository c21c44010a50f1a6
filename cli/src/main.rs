use std::path::Path;
use std::process::ExitCode;

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use common::config::{init_env_from_config, ConfigHandlerImpl};
use common::convert::parse_header_line;
use common::{_error, _info};
use env_logger::{Builder, Env, Target};
use fetcher::{FetchError, Fetcher, FetcherConfig, HostKind, NormalizedResponse, RequestBuilder};

#[derive(Parser)]
#[command(name = "fetcher")]
#[command(about = "A single-shot http request tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands
}

// config arg keys
const CONFIG_ARG_HOST_ENV: &str = "host-env";
const CONFIG_ARG_USER_AGENT: &str = "user-agent";
const CONFIG_ARG_DEFAULT_HEADERS: &str = "default-headers";

#[derive(Subcommand)]
enum Commands {
    /// Send one request and print the normalized response
    Request {
        #[arg(help = "HTTP method, e.g. GET or post")]
        method: String,
        url: String,
        #[arg(short = 'H', long = "header", help = "Request header as `Name: value`")]
        headers: Vec<String>,
        #[arg(short, long, conflicts_with = "json", help = "Raw request body")]
        data: Option<String>,
        #[arg(short, long, help = "JSON request body")]
        json: Option<String>,
        #[arg(short, long, help = "Multipart file part as `field=path`")]
        attach: Vec<String>,
        #[arg(long, help = "Override the configured host environment (native or text)")]
        host: Option<String>,
    },
    SetConfig {
        #[arg(
            name = CONFIG_ARG_HOST_ENV,
            long,
            help = "Host environment used to read response bodies (native or text)"
        )]
        host_env: Option<String>,
        #[arg(
            name = CONFIG_ARG_USER_AGENT,
            long,
            help = "User-Agent sent with every request"
        )]
        user_agent: Option<String>,
        #[arg(
            name = CONFIG_ARG_DEFAULT_HEADERS,
            long,
            help = "Headers sent with every request, as `Name: value; Other: value`"
        )]
        default_headers: Option<String>,
        #[arg(
            long,
            help = "Force apply the config",
        )]
        force: bool,
    }
}

fn print_response(response: &NormalizedResponse) {
    println!("{}", response.status());
    let mut headers: Vec<_> = response.headers().iter().collect();
    headers.sort();
    for (name, value) in headers {
        println!("{}: {}", name, value);
    }
    println!();
    println!("{}", response.text());
}

fn report(outcome: Result<NormalizedResponse, FetchError>) -> ExitCode {
    match outcome {
        Ok(response) => {
            print_response(&response);
            ExitCode::SUCCESS
        },
        Err(FetchError::Status(response)) => {
            print_response(&response);
            ExitCode::FAILURE
        },
        Err(e) => {
            _error!("Request failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

// field=path, filename taken from the path
async fn attach_file(builder: RequestBuilder, attachment: &str) -> Result<RequestBuilder, String> {
    let (field, path) = attachment.split_once('=')
        .ok_or_else(|| format!("attachment `{}` must look like field=path", attachment))?;
    let data = tokio::fs::read(path).await
        .map_err(|e| format!("cannot read {}: {}", path, e))?;
    let filename = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string());
    Ok(builder.attach(field, data, filename.as_deref()))
}

async fn prepare(
    config: &FetcherConfig,
    method: &str,
    url: &str,
    headers: &[String],
    data: Option<String>,
    json: Option<String>,
    attach: &[String]
) -> Result<RequestBuilder, String> {
    let fetcher = Fetcher::from_config(config);
    let mut builder = fetcher.request(method, url).map_err(|e| e.to_string())?;

    for (name, value) in config.base_headers() {
        builder = builder.set(&name, &value);
    }
    for header in headers {
        let (name, value) = parse_header_line(header)
            .ok_or_else(|| format!("header `{}` must look like `Name: value`", header))?;
        builder = builder.set(&name, &value);
    }

    for attachment in attach {
        builder = attach_file(builder, attachment).await?;
    }
    if let Some(text) = data {
        builder = builder.send(text);
    }
    if let Some(text) = json {
        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| format!("--json is not valid JSON: {}", e))?;
        builder = builder.send(value);
    }

    _info!("Sending {} {} using the {} host", builder.method(), builder.url(), fetcher.host_name());
    Ok(builder)
}

async fn set_config(host_env: &Option<String>, user_agent: &Option<String>, default_headers: &Option<String>, force: bool) -> Result<(), FetchError> {
    let handler = ConfigHandlerImpl;
    if let Some(value) = host_env {
        client::config::set_host_env(&handler, value.parse::<HostKind>()?, force).await?;
    }

    if let Some(value) = user_agent {
        client::config::set_user_agent(&handler, value.clone(), force).await?;
    }

    if let Some(value) = default_headers {
        client::config::set_default_headers(&handler, value.clone(), force).await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // init env vars
    init_env_from_config();

    // init logger
    Builder::from_env(Env::default().default_filter_or("info"))
    .target(Target::Stdout)
    .format_timestamp_millis()
    .init();

    // route commands
    let cli = Cli::parse();

    match &cli.command {
        Commands::Request { method, url, headers, data, json, attach, host } => {
            let mut config = match FetcherConfig::from_env() {
                Ok(config) => config,
                Err(e) => {
                    _error!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            if let Some(value) = host {
                match value.parse() {
                    Ok(kind) => config.host_env = kind,
                    Err(e) => {
                        _error!("{}", e);
                        return ExitCode::FAILURE;
                    }
                }
            }

            match prepare(&config, method, url, headers, data.clone(), json.clone(), attach).await {
                Ok(builder) => builder.end(report).await,
                Err(e) => {
                    _error!("{}", e);
                    ExitCode::FAILURE
                }
            }
        },
        Commands::SetConfig { host_env, user_agent, default_headers, force } => {
            if host_env.is_none() && user_agent.is_none() && default_headers.is_none() {
                let mut cmd = Cli::command();
                cmd.error(
                    ErrorKind::MissingRequiredArgument,
                    format!(
                        "At least one of --{}, --{}, or --{} must be provided",
                        CONFIG_ARG_HOST_ENV,
                        CONFIG_ARG_USER_AGENT,
                        CONFIG_ARG_DEFAULT_HEADERS
                    )
                ).exit();
            }

            match set_config(host_env, user_agent, default_headers, *force).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    _error!("{}", e);
                    ExitCode::FAILURE
                }
            }
        },
    }
}
