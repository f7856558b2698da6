//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.mchat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! A value that fails validation is skipped with a warning and the next
//! layer down is used instead.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use chrono::format::{Item, StrftimeItems};

use crate::chat::{DEFAULT_CHANNEL, NetworkConfig, validate_channel, validate_nickname};
use crate::core::editor::{DEFAULT_PROMPT, is_printable};
use crate::core::transcript::DEFAULT_TIMESTAMP_FORMAT;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MchatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub network: NetworkSection,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub nickname: Option<String>,
    pub escape: Option<String>,
    pub prompt: Option<String>,
    pub timestamp_format: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NetworkSection {
    pub group: Option<String>,
    pub port: Option<u16>,
    pub default_channel: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ESCAPE: char = '\\';
pub const DEFAULT_GROUP: Ipv4Addr = Ipv4Addr::new(239, 255, 42, 99);
pub const DEFAULT_PORT: u16 = 4299;
pub const DEFAULT_NICKNAME: &str = "anonymous";
/// Longest prompt accepted; it shares the input row with the message.
pub const MAX_PROMPT_LEN: usize = 32;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub nickname: String,
    pub escape: char,
    pub prompt: String,
    pub timestamp_format: String,
    pub group: Ipv4Addr,
    pub port: u16,
    pub default_channel: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            nickname: DEFAULT_NICKNAME.to_string(),
            escape: DEFAULT_ESCAPE,
            prompt: DEFAULT_PROMPT.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            group: DEFAULT_GROUP,
            port: DEFAULT_PORT,
            default_channel: DEFAULT_CHANNEL.to_string(),
        }
    }
}

impl ResolvedConfig {
    pub fn network(&self) -> NetworkConfig {
        NetworkConfig {
            group: self.group,
            port: self.port,
            default_channel: self.default_channel.clone(),
            nickname: self.nickname.clone(),
        }
    }
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub nickname: Option<String>,
    pub port: Option<u16>,
    pub group: Option<String>,
    pub escape: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.mchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".mchat").join("config.toml"))
}

/// Load config from `~/.mchat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `MchatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<MchatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(MchatConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(MchatConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<MchatConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: MchatConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r##"# mchat Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# nickname = "ana"                   # Or set MCHAT_NICKNAME, or pass --nick
# escape = "\\"                      # Character that starts a command line
# prompt = "> "
# timestamp_format = "%H:%M:%S %Y-%m-%d"

# [network]
# group = "239.255.42.99"            # IPv4 multicast group (MCHAT_GROUP, --group)
# port = 4299                        # MCHAT_PORT, --port
# default_channel = "#mchat"         # Joined by \CONNECT without an argument
"##;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &MchatConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &MchatConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let fallback_nickname = env("USER")
        .filter(|user| validate_nickname(user).is_ok())
        .unwrap_or_else(|| DEFAULT_NICKNAME.to_string());

    // Nickname: CLI → env → config → login name → default
    let nickname = pick(
        "nickname",
        [
            ("cli", cli.nickname.clone()),
            ("env", env("MCHAT_NICKNAME")),
            ("config", config.general.nickname.clone()),
        ],
        |s| validate_nickname(s).ok().map(|_| s.to_string()),
        fallback_nickname,
    );

    // Escape: CLI → config → default
    let escape = pick(
        "escape",
        [
            ("cli", cli.escape.clone()),
            ("config", config.general.escape.clone()),
        ],
        parse_escape,
        DEFAULT_ESCAPE,
    );

    let prompt = pick(
        "prompt",
        [("config", config.general.prompt.clone())],
        |s| {
            let valid =
                !s.is_empty() && s.len() <= MAX_PROMPT_LEN && s.chars().all(is_printable);
            valid.then(|| s.to_string())
        },
        DEFAULT_PROMPT.to_string(),
    );

    let timestamp_format = pick(
        "timestamp_format",
        [("config", config.general.timestamp_format.clone())],
        |s| {
            let valid = !StrftimeItems::new(s).any(|item| matches!(item, Item::Error));
            valid.then(|| s.to_string())
        },
        DEFAULT_TIMESTAMP_FORMAT.to_string(),
    );

    // Group: CLI → env → config → default
    let group = pick(
        "group",
        [
            ("cli", cli.group.clone()),
            ("env", env("MCHAT_GROUP")),
            ("config", config.network.group.clone()),
        ],
        |s| s.parse::<Ipv4Addr>().ok().filter(Ipv4Addr::is_multicast),
        DEFAULT_GROUP,
    );

    // Port: CLI → env → config → default
    let port = pick(
        "port",
        [
            ("cli", cli.port.map(|p| p.to_string())),
            ("env", env("MCHAT_PORT")),
            ("config", config.network.port.map(|p| p.to_string())),
        ],
        |s| s.parse::<u16>().ok().filter(|p| *p != 0),
        DEFAULT_PORT,
    );

    let default_channel = pick(
        "default_channel",
        [("config", config.network.default_channel.clone())],
        |s| validate_channel(s).ok().map(|_| s.to_string()),
        DEFAULT_CHANNEL.to_string(),
    );

    ResolvedConfig {
        nickname,
        escape,
        prompt,
        timestamp_format,
        group,
        port,
        default_channel,
    }
}

/// First candidate (in priority order) that parses; invalid ones are logged.
fn pick<T, const N: usize>(
    setting: &str,
    candidates: [(&str, Option<String>); N],
    parse: impl Fn(&str) -> Option<T>,
    default: T,
) -> T {
    for (source, value) in candidates {
        let Some(value) = value else { continue };
        match parse(&value) {
            Some(parsed) => return parsed,
            None => warn!("Ignoring invalid {} {:?} from {}", setting, value, source),
        }
    }
    default
}

fn parse_escape(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii_graphic() => Some(ch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = MchatConfig::default();
        assert!(config.general.nickname.is_none());
        assert!(config.network.port.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&MchatConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved, ResolvedConfig::default());
    }

    #[test]
    fn test_login_name_is_nickname_fallback() {
        let resolved = resolve_with_env(&MchatConfig::default(), &CliOverrides::default(), |key| {
            (key == "USER").then(|| "ana".to_string())
        });
        assert_eq!(resolved.nickname, "ana");
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = MchatConfig {
            general: GeneralConfig {
                nickname: Some("bo".to_string()),
                escape: Some("/".to_string()),
                prompt: Some("$ ".to_string()),
                timestamp_format: Some("%H:%M".to_string()),
            },
            network: NetworkSection {
                group: Some("239.1.2.3".to_string()),
                port: Some(5000),
                default_channel: Some("#lan".to_string()),
            },
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.nickname, "bo");
        assert_eq!(resolved.escape, '/');
        assert_eq!(resolved.prompt, "$ ");
        assert_eq!(resolved.timestamp_format, "%H:%M");
        assert_eq!(resolved.group, Ipv4Addr::new(239, 1, 2, 3));
        assert_eq!(resolved.port, 5000);
        assert_eq!(resolved.default_channel, "#lan");
    }

    #[test]
    fn test_env_beats_config_and_cli_beats_env() {
        let config = MchatConfig {
            general: GeneralConfig {
                nickname: Some("from-config".to_string()),
                ..Default::default()
            },
            network: NetworkSection {
                port: Some(5000),
                ..Default::default()
            },
        };
        let env: HashMap<&str, &str> =
            HashMap::from([("MCHAT_NICKNAME", "from-env"), ("MCHAT_PORT", "6000")]);
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let resolved = resolve_with_env(&config, &CliOverrides::default(), lookup);
        assert_eq!(resolved.nickname, "from-env");
        assert_eq!(resolved.port, 6000);

        let cli = CliOverrides {
            nickname: Some("from-cli".to_string()),
            port: Some(7000),
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &cli, lookup);
        assert_eq!(resolved.nickname, "from-cli");
        assert_eq!(resolved.port, 7000);
    }

    #[test]
    fn test_invalid_values_fall_through() {
        let config = MchatConfig {
            general: GeneralConfig {
                nickname: Some("x".repeat(40)),
                escape: Some("ab".to_string()),
                prompt: Some(String::new()),
                timestamp_format: Some("%Q".to_string()),
            },
            network: NetworkSection {
                group: Some("10.0.0.1".to_string()),
                port: Some(0),
                default_channel: Some("mchat".to_string()),
            },
        };
        let cli = CliOverrides {
            escape: Some("\t".to_string()),
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &cli, no_env);
        assert_eq!(resolved, ResolvedConfig::default());
    }

    #[test]
    fn test_overlong_prompt_falls_back() {
        let config = MchatConfig {
            general: GeneralConfig {
                prompt: Some(">".repeat(70_000)),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.prompt, DEFAULT_PROMPT);

        let config = MchatConfig {
            general: GeneralConfig {
                prompt: Some(">".repeat(MAX_PROMPT_LEN)),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.prompt.len(), MAX_PROMPT_LEN);
    }

    #[test]
    fn test_network_config_carries_nickname() {
        let resolved = ResolvedConfig::default();
        let network = resolved.network();
        assert_eq!(network.nickname, DEFAULT_NICKNAME);
        assert_eq!(network.group, DEFAULT_GROUP);
        assert_eq!(network.default_channel, DEFAULT_CHANNEL);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r##"
[general]
nickname = "ana"
escape = "/"
timestamp_format = "%H:%M"

[network]
group = "239.255.0.1"
port = 4300
default_channel = "#ops"
"##;
        let config: MchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.nickname.as_deref(), Some("ana"));
        assert_eq!(config.general.escape.as_deref(), Some("/"));
        assert_eq!(config.network.port, Some(4300));
        assert_eq!(config.network.default_channel.as_deref(), Some("#ops"));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let toml_str = r#"
[network]
port = 5001
"#;
        let config: MchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.network.port, Some(5001));
        assert!(config.general.nickname.is_none());
        assert!(config.network.group.is_none());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = toml::from_str::<MchatConfig>("[network]\nport = \"lots\"").unwrap_err();
        let err = ConfigError::from(err);
        assert!(err.to_string().starts_with("config parse error"));
    }
}
