use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::error;

const DEFAULT_PORT: u16 = 4680;
const DEFAULT_CHECKLIST_URL: &str = "https://checklists.checkd.io/";
const DEFAULT_CHECKLIST_TIMEOUT_SECS: u64 = 10;

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

// ─── ChecklistConfig ─────────────────────────────────────────────────────────

/// Remote checklist service configuration (`[checklist]` in config.toml).
///
/// The access token can also be set at runtime through the settings endpoint;
/// a token stored there takes precedence over this file. Without a token the
/// checklist-import feature is disabled and everything else keeps working.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChecklistConfig {
    /// Base URL of the predefined-list service.
    pub base_url: String,
    /// Access token sent as `X-Auth-Token` on every outbound request.
    pub api_token: Option<String>,
    /// Outbound request timeout in seconds (default: 10). No retries.
    pub timeout_secs: u64,
}

impl Default for ChecklistConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CHECKLIST_URL.to_string(),
            api_token: None,
            timeout_secs: DEFAULT_CHECKLIST_TIMEOUT_SECS,
        }
    }
}

// ─── TomlConfig ──────────────────────────────────────────────────────────────

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// REST API port (default: 4680).
    port: Option<u16>,
    /// Log level filter string, e.g. "debug", "info,checkd=trace" (default: "info").
    log: Option<String>,
    /// Bind address for the REST server (default: "127.0.0.1"; use "0.0.0.0" for LAN access).
    bind_address: Option<String>,
    /// Remote checklist service configuration (`[checklist]`).
    checklist: Option<ChecklistConfig>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── ServiceConfig ───────────────────────────────────────────────────────────

/// Resolved service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub log: String,
    pub bind_address: String,
    pub checklist: ChecklistConfig,
}

impl ServiceConfig {
    /// Resolve configuration from, in order of priority:
    ///   1. CLI flags / environment variables
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        bind_address: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let bind_address = bind_address
            .or(std::env::var("CHECKD_BIND").ok().filter(|s| !s.is_empty()))
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);

        let mut checklist = toml.checklist.unwrap_or_default();
        if let Some(url) = std::env::var("CHECKD_CHECKLIST_URL")
            .ok()
            .filter(|s| !s.is_empty())
        {
            checklist.base_url = url;
        }
        if let Some(token) = std::env::var("CHECKD_CHECKLIST_TOKEN")
            .ok()
            .filter(|s| !s.is_empty())
        {
            checklist.api_token = Some(token);
        }

        Self {
            port,
            data_dir,
            log,
            bind_address,
            checklist,
        }
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/checkd
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("checkd");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/checkd or ~/.local/share/checkd
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("checkd");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("checkd");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\checkd
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("checkd");
        }
    }
    // Fallback
    PathBuf::from(".checkd")
}
