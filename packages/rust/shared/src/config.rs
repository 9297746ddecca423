//! Application configuration for linkpeek.
//!
//! User config lives at `~/.linkpeek/linkpeek.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LinkpeekError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "linkpeek.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".linkpeek";

// ---------------------------------------------------------------------------
// Config structs (matching linkpeek.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Page fetching settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Metadata extraction rules.
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    3033
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of redirects followed before navigation fails.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Override for the User-Agent header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Allow loopback/private targets. Off by default (SSRF protection).
    #[serde(default)]
    pub allow_private_hosts: bool,

    /// Page source: a headless browser or a plain HTTP fetch.
    #[serde(default)]
    pub backend: FetchBackend,

    /// Chrome/Chromium binary for the browser backend (auto-detected if unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_executable: Option<PathBuf>,

    /// Extra wait after the load event so late images can report their size.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            user_agent: None,
            allow_private_hosts: false,
            backend: FetchBackend::default(),
            chrome_executable: None,
            settle_ms: default_settle_ms(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_max_redirects() -> usize {
    5
}
fn default_settle_ms() -> u64 {
    500
}

/// Which page provider serves requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchBackend {
    /// Render in headless Chrome; image sizes are the decoded natural sizes.
    #[default]
    Browser,
    /// Fetch raw HTML; image sizes come from `width`/`height` attributes.
    Http,
}

impl std::fmt::Display for FetchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Browser => f.write_str("browser"),
            Self::Http => f.write_str("http"),
        }
    }
}

/// How the orchestrator treats records with null fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Return whatever could be extracted.
    #[default]
    Lenient,
    /// Reject records with any null top-level field.
    Strict,
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lenient => f.write_str("lenient"),
            Self::Strict => f.write_str("strict"),
        }
    }
}

/// `[extraction]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Lenient or strict completeness handling.
    #[serde(default)]
    pub mode: ExtractionMode,

    /// Minimum natural width for a high-quality image.
    #[serde(default = "default_min_image_side")]
    pub min_image_width: u32,

    /// Minimum natural height for a high-quality image.
    #[serde(default = "default_min_image_side")]
    pub min_image_height: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::default(),
            min_image_width: default_min_image_side(),
            min_image_height: default_min_image_side(),
        }
    }
}

fn default_min_image_side() -> u32 {
    600
}

// ---------------------------------------------------------------------------
// Extract options (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime extraction options: merged from config file + CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Completeness handling.
    pub mode: ExtractionMode,
    /// Minimum natural width for a high-quality image.
    pub min_image_width: u32,
    /// Minimum natural height for a high-quality image.
    pub min_image_height: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::from(&ExtractionConfig::default())
    }
}

impl From<&ExtractionConfig> for ExtractOptions {
    fn from(config: &ExtractionConfig) -> Self {
        Self {
            mode: config.mode,
            min_image_width: config.min_image_width,
            min_image_height: config.min_image_height,
        }
    }
}

impl From<&AppConfig> for ExtractOptions {
    fn from(config: &AppConfig) -> Self {
        Self::from(&config.extraction)
    }
}

impl ExtractOptions {
    /// Same options with strict completeness checking.
    pub fn strict(self) -> Self {
        Self {
            mode: ExtractionMode::Strict,
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.linkpeek/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LinkpeekError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.linkpeek/linkpeek.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LinkpeekError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        LinkpeekError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| LinkpeekError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| LinkpeekError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LinkpeekError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject values that would make every request fail.
fn validate(config: &AppConfig) -> Result<()> {
    if config.fetch.timeout_secs == 0 {
        return Err(LinkpeekError::config("fetch.timeout_secs must be greater than 0"));
    }
    if config.extraction.min_image_width == 0 || config.extraction.min_image_height == 0 {
        return Err(LinkpeekError::config(
            "extraction.min_image_width and min_image_height must be greater than 0",
        ));
    }
    Ok(())
}
