//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use linkpeek_core::scrape;
use linkpeek_fetcher::{ChromePageProvider, HttpPageProvider};
use linkpeek_shared::{
    AppConfig, ExtractOptions, FetchBackend, init_config, load_config, load_config_from,
};
use tracing::debug;

use crate::server::{self, ServerState};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// linkpeek: link-preview metadata for any URL.
#[derive(Parser)]
#[command(
    name = "linkpeek",
    version,
    about = "Extract link-preview metadata (title, description, images, icon, related links) from web pages.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to load instead of ~/.linkpeek/linkpeek.toml.
    #[arg(long, global = true, env = "LINKPEEK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Page source (overrides [fetch].backend).
    #[arg(long, global = true, env = "LINKPEEK_BACKEND")]
    pub backend: Option<Backend>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Page source selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Backend {
    Browser,
    Http,
}

impl From<Backend> for FetchBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Browser => Self::Browser,
            Backend::Http => Self::Http,
        }
    }
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Scrape one URL and print its preview record as JSON.
    Scrape {
        /// Page URL to scrape.
        url: String,

        /// Fail unless every optional field was found.
        #[arg(long)]
        strict: bool,

        /// Print single-line JSON instead of pretty output.
        #[arg(long)]
        compact: bool,
    },

    /// Serve `GET /scrape?url=...` over HTTP.
    Serve {
        /// Interface to bind (overrides [server].host).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides [server].port).
        #[arg(short, long)]
        port: Option<u16>,

        /// Reject pages with incomplete metadata.
        #[arg(long)]
        strict: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "linkpeek=info",
        1 => "linkpeek=debug",
        _ => "linkpeek=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so `scrape` output stays pipeable.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let backend = cli.backend;

    match cli.command {
        Command::Scrape {
            url,
            strict,
            compact,
        } => cmd_scrape(config_path, backend, &url, strict, compact).await,
        Command::Serve { host, port, strict } => {
            cmd_serve(config_path, backend, host.as_deref(), port, strict).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path, backend),
        },
    }
}

/// Resolve the config file: an explicit path must exist, the default may not.
fn resolve_config(path: Option<&Path>, backend: Option<Backend>) -> Result<AppConfig> {
    let mut config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    apply_backend(&mut config, backend);
    debug!(
        ?path,
        backend = %config.fetch.backend,
        mode = %config.extraction.mode,
        "configuration loaded"
    );
    Ok(config)
}

fn apply_backend(config: &mut AppConfig, backend: Option<Backend>) {
    if let Some(backend) = backend {
        config.fetch.backend = backend.into();
    }
}

fn extract_options(config: &AppConfig, strict: bool) -> ExtractOptions {
    let options = ExtractOptions::from(config);
    if strict { options.strict() } else { options }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_scrape(
    config_path: Option<&Path>,
    backend: Option<Backend>,
    url: &str,
    strict: bool,
    compact: bool,
) -> Result<()> {
    let config = resolve_config(config_path, backend)?;
    let options = extract_options(&config, strict);

    let record = match config.fetch.backend {
        FetchBackend::Browser => {
            scrape(&ChromePageProvider::new(&config.fetch), Some(url), &options).await?
        }
        FetchBackend::Http => {
            scrape(&HttpPageProvider::new(&config.fetch)?, Some(url), &options).await?
        }
    };

    let json = if compact {
        serde_json::to_string(&record)?
    } else {
        serde_json::to_string_pretty(&record)?
    };
    println!("{json}");
    Ok(())
}

async fn cmd_serve(
    config_path: Option<&Path>,
    backend: Option<Backend>,
    host: Option<&str>,
    port: Option<u16>,
    strict: bool,
) -> Result<()> {
    let config = resolve_config(config_path, backend)?;
    let options = extract_options(&config, strict);

    let host = host.unwrap_or(&config.server.host);
    let port = port.unwrap_or(config.server.port);

    match config.fetch.backend {
        FetchBackend::Browser => {
            let provider = ChromePageProvider::new(&config.fetch);
            server::serve(ServerState { provider, options }, host, port).await
        }
        FetchBackend::Http => {
            let provider = HttpPageProvider::new(&config.fetch)?;
            server::serve(ServerState { provider, options }, host, port).await
        }
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>, backend: Option<Backend>) -> Result<()> {
    let config = resolve_config(config_path, backend)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
