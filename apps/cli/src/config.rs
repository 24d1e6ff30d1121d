use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use view_counter::{FeatureFlags, RemoteSettings};

const CONFIG_DIR_NAME: &str = "portfolio-analytics";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_BIND: &str = "127.0.0.1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub port: u16,
    pub bind: String,
    pub data_dir: Option<PathBuf>,
    pub seed_defaults: bool,
    pub allowed_origins: Vec<String>,
    pub trust_forwarded_for: bool,
    pub client: ClientConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            data_dir: None,
            seed_defaults: false,
            allowed_origins: Vec::new(),
            trust_forwarded_for: false,
            client: ClientConfig::default(),
        }
    }
}

/// Settings for the local counter tier driven by `display` and `admin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub remote_tracking: bool,
    pub admin_panel: bool,
    pub api_base_url: String,
    pub timeout_ms: u64,
    pub store_file: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let remote = RemoteSettings::default();
        Self {
            remote_tracking: false,
            admin_panel: true,
            api_base_url: remote.base_url,
            timeout_ms: remote.timeout.as_millis() as u64,
            store_file: "view-counts.json".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn flags(&self) -> FeatureFlags {
        FeatureFlags::default()
            .with_remote_tracking(self.remote_tracking)
            .with_admin_panel(self.admin_panel)
    }

    pub fn remote_settings(&self) -> RemoteSettings {
        RemoteSettings {
            base_url: self.api_base_url.clone(),
            timeout: std::time::Duration::from_millis(self.timeout_ms),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: CliConfig,
    pub file: PathBuf,
    pub created: bool,
}

pub fn load_or_create(path: Option<&Path>) -> Result<ConfigLoad, String> {
    let file = match path {
        Some(path) => path.to_path_buf(),
        None => config_dir()?.join(CONFIG_FILE_NAME),
    };
    if let Some(dir) = file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|err| format!("create config dir {}: {}", dir.display(), err))?;
    }

    if file.exists() {
        let contents = fs::read_to_string(&file)
            .map_err(|err| format!("read config {}: {}", file.display(), err))?;
        let config: CliConfig = toml::from_str(&contents)
            .map_err(|err| format!("parse config {}: {}", file.display(), err))?;
        return Ok(ConfigLoad {
            config,
            file,
            created: false,
        });
    }

    let config = CliConfig::default();
    let contents =
        toml::to_string_pretty(&config).map_err(|err| format!("serialize config: {}", err))?;
    fs::write(&file, contents).map_err(|err| format!("write config {}: {}", file.display(), err))?;

    Ok(ConfigLoad {
        config,
        file,
        created: true,
    })
}

fn config_dir() -> Result<PathBuf, String> {
    if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir).join(CONFIG_DIR_NAME));
        }
    }
    let home = std::env::var("HOME").map_err(|err| format!("resolve HOME: {}", err))?;
    Ok(PathBuf::from(home).join(".config").join(CONFIG_DIR_NAME))
}
