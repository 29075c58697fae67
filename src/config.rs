use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::providers::trello::{ClientConfig, DEFAULT_API};

/// Everything a run needs: where Trello lives, who we are, and which
/// board and lists to look at.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default = "default_api")]
    pub api: String,
    pub key: String,
    pub token: String,
    pub relevant_board_id: String,
    pub recurring_list_name: String,
    pub done_list_name: String,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    config: Settings,
}

fn default_api() -> String {
    DEFAULT_API.to_string()
}

impl Settings {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api: self.api.clone(),
            key: self.key.clone(),
            token: self.token.clone(),
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".trello.conf")
}

/// Read settings from `path` (or `~/.trello.conf`), falling back to
/// `TRELLO_*` variables looked up through `lookup` if the file can't be used.
pub fn load_settings(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
    match read_settings_file(&path) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            tracing::warn!("{e:#} -> attempting to load environment variables");
            settings_from_env(lookup)
        }
    }
}

/// Parse a settings file with a `[config]` section. TOML is tried first,
/// then the plain `key = value` INI form with unquoted values.
pub fn read_settings_file(path: &Path) -> Result<Settings> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    if let Ok(file) = toml::from_str::<ConfigFile>(&contents) {
        return Ok(file.config);
    }
    parse_ini(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_ini(contents: &str) -> Result<Settings> {
    let ini = ini::Ini::load_from_str(contents)?;
    let section = ini
        .section(Some("config"))
        .context("No [config] section")?;
    let required = |name: &str| -> Result<String> {
        match section.get(name) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => bail!("Missing `{name}` in [config]"),
        }
    };
    Ok(Settings {
        api: section
            .get("api")
            .filter(|v| !v.is_empty())
            .map_or_else(default_api, str::to_string),
        key: required("key")?,
        token: required("token")?,
        relevant_board_id: required("relevant_board_id")?,
        recurring_list_name: required("recurring_list_name")?,
        done_list_name: required("done_list_name")?,
    })
}

/// Build settings from `TRELLO_*` variables looked up through `lookup`.
pub fn settings_from_env(lookup: impl Fn(&str) -> Option<String>) -> Result<Settings> {
    let required = |name: &str| -> Result<String> {
        match lookup(name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => bail!("Environment variable {name} is not set"),
        }
    };
    Ok(Settings {
        api: lookup("TRELLO_API")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_api),
        key: required("TRELLO_KEY")?,
        token: required("TRELLO_TOKEN")?,
        relevant_board_id: required("TRELLO_RELEVANT_BOARD_ID")?,
        recurring_list_name: required("TRELLO_RECURRING_LIST_NAME")?,
        done_list_name: required("TRELLO_DONE_LIST_NAME")?,
    })
}
