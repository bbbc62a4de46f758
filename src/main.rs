use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use imgroute::config::Config;
use imgroute::constants::DEFAULT_CONFIG_PATH;
use imgroute::{Options, ProxyRequest};

/// Imgroute - resolve image proxy requests into remote URLs and transformation options
#[derive(Parser, Debug)]
#[command(name = "imgroute")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults to imgroute.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Test configuration and exit
    #[arg(long)]
    check: bool,

    /// Inbound request URLs or paths, e.g. /100x200/http://example.com/a.jpg
    requests: Vec<String>,
}

#[derive(Serialize)]
struct Output<'a> {
    url: String,
    options: &'a Options,
    content_type: Option<&'static str>,
    key: String,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::from_file(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("Failed to load configuration from {}", DEFAULT_CONFIG_PATH)),
        None => Ok(Config::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;

    // Initialize logging subsystem
    imgroute::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging subsystem: {}", e))?;

    let registry = config.registry().context("Invalid source configuration")?;

    tracing::info!(
        config_file = %args.config.as_deref().unwrap_or(Path::new(DEFAULT_CONFIG_PATH)).display(),
        sources = registry.len(),
        query_forwarding = ?config.query_forwarding,
        "Configuration loaded successfully"
    );

    if args.check {
        let prefixes: Vec<&str> = registry.prefixes().collect();
        println!(
            "configuration ok: {} source(s) [{}]",
            registry.len(),
            prefixes.join(", ")
        );
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    for raw in &args.requests {
        let inbound = http::Request::get(raw.as_str())
            .body(())
            .with_context(|| format!("Invalid request URL {:?}", raw))?;
        let req = ProxyRequest::with_forwarding(&inbound, &registry, config.query_forwarding)
            .with_context(|| format!("Failed to resolve {:?}", raw))?;

        let output = Output {
            url: req.remote_url(),
            options: &req.options,
            content_type: req.options.format.map(|format| format.content_type()),
            key: req.to_string(),
        };
        serde_json::to_writer(&mut stdout, &output)?;
        writeln!(stdout)?;
    }

    Ok(())
}
