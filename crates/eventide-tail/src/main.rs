use anyhow::Context;
use futures::StreamExt;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Method;
use std::io::Write;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use eventide::{open_with_retries, retry_idempotent, ResilientExecutor, RetryConfig, ServerSentEvent, StreamOptions};

mod config;

use config::{Config, OutputFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Tailing {} {}", config.source.method, config.source.url);

    let options = build_options(&config)?;
    let executor = build_executor(&config, &options.method);
    let client = reqwest::Client::new();

    let mut events = open_with_retries(&client, &config.source.url, &options, &executor)
        .await
        .with_context(|| format!("Failed to open event stream at {}", config.source.url))?;

    let mut count = 0usize;
    while let Some(item) = events.next().await {
        let event = item.context("Event stream failed")?;
        print_event(&event, config.output.format)?;
        count += 1;
    }

    if config.output.format == OutputFormat::Text {
        println!();
    }
    tracing::info!("Event stream finished after {} events", count);

    Ok(())
}

fn build_options(config: &Config) -> anyhow::Result<StreamOptions> {
    let method = Method::from_bytes(config.source.method.to_uppercase().as_bytes())
        .with_context(|| format!("Invalid request method: {}", config.source.method))?;

    let mut options = StreamOptions::new().method(method);

    if let Some(body) = &config.source.body {
        options = options.body(body.clone());
    }

    if let Some(token) = &config.token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .context("EVENTIDE_TOKEN is not a valid header value")?;
        value.set_sensitive(true);
        options = options.header(AUTHORIZATION, value);
    }

    Ok(options)
}

fn build_executor(config: &Config, method: &Method) -> ResilientExecutor<reqwest::Response> {
    let executor = ResilientExecutor::new(RetryConfig::from(&config.retry));

    if config.retry.retry_idempotent {
        executor.with_predicate(retry_idempotent::<reqwest::Response>(method.clone()))
    } else {
        executor
    }
}

fn print_event(event: &ServerSentEvent, format: OutputFormat) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();

    match format {
        OutputFormat::Text => {
            let rendered = event.to_string();
            if !rendered.is_empty() {
                write!(stdout, "{}", rendered)?;
                stdout.flush()?;
            }
        }
        OutputFormat::Json => {
            writeln!(stdout, "{}", serde_json::to_string(event)?)?;
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so stdout carries only event output
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
