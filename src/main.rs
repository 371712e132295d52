//! toolhost-mcp: capability host serving tools, resources and prompts
//!
//! Registers the builtin capabilities and serves them over either stdio
//! (JSON-RPC 2.0) or HTTP.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use toolhost_mcp::builtin;
use toolhost_mcp::capability::RegistryBuilder;
use toolhost_mcp::config::{self, Config, TransportKind};
use toolhost_mcp::engine::{Engine, ServerInfo};
use toolhost_mcp::http::HttpServer;
use toolhost_mcp::mcp::McpServer;

/// Capability host serving tools, resources and prompts.
///
/// Speaks newline-delimited JSON-RPC 2.0 on stdin/stdout by default, or JSON
/// over HTTP with `--http`.
#[derive(Parser, Debug)]
#[command(name = "toolhost-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,

    /// Serve over HTTP instead of stdio
    #[arg(long, conflicts_with = "stdio")]
    http: bool,

    /// Serve over stdio (the default)
    #[arg(long)]
    stdio: bool,

    /// HTTP port, overriding the configuration file
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,
}

impl Args {
    /// Applies the transport flags on top of the loaded configuration.
    fn apply(&self, cfg: &mut Config) {
        if self.http {
            cfg.transport = TransportKind::Http;
        } else if self.stdio {
            cfg.transport = TransportKind::Stdio;
        }
        if let Some(port) = self.port {
            cfg.http.port = port;
        }
    }
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
///
/// Logs go to stderr; stdout carries protocol frames in stdio mode.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the engine from the builtin capabilities.
fn build_engine(cfg: &Config) -> Result<Engine, toolhost_mcp::error::RegistryError> {
    let mut builder = RegistryBuilder::new();
    builtin::register(&mut builder)?;
    Ok(Engine::with_server_info(
        builder.build(),
        ServerInfo::named(cfg.server.name.clone()),
    ))
}

fn run_stdio(engine: Arc<Engine>) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    let mut server = McpServer::stdio(engine);
    match runtime.block_on(server.run()) {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}

fn run_http(engine: Arc<Engine>, cfg: &Config) -> ExitCode {
    let addr = match cfg.http.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!(error = %e, "Invalid HTTP address");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(HttpServer::new(engine, addr).run()) {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}

/// Entry point for the toolhost-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    let config_path = config::locate_config(args.config.as_deref());
    let loaded = config_path
        .as_deref()
        .map_or_else(|| Ok(Config::default()), config::load_config);
    let mut cfg = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    args.apply(&mut cfg);
    if let Err(e) = cfg.validate() {
        eprintln!("Configuration error: {e}");
        return ExitCode::FAILURE;
    }

    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    // Display GPL license notice (required by GPLv3 Section 5d)
    eprintln!(
        "toolhost-mcp {}  Copyright (C) 2026  The Embedded Society",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("This program comes with ABSOLUTELY NO WARRANTY.");
    eprintln!("This is free software, licensed under GPL-3.0-or-later.");
    eprintln!();

    match &config_path {
        Some(path) => info!(path = %path.display(), "Loaded configuration"),
        None => info!("No configuration file, using defaults"),
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?cfg.transport,
        "Starting toolhost-mcp server"
    );

    let engine = match build_engine(&cfg) {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            error!(code = %e.code(), error = %e, "Capability registration failed");
            return ExitCode::FAILURE;
        }
    };

    info!(
        tools = engine.registry().tools().len(),
        resources = engine.registry().resources().len(),
        prompts = engine.registry().prompts().len(),
        "Registry frozen"
    );

    match cfg.transport {
        TransportKind::Stdio => run_stdio(engine),
        TransportKind::Http => run_http(engine, &cfg),
    }
}
