use std::path::{Path, PathBuf};

use {
    anyhow::Context,
    envinterp_interpolate::{EnvResolver, UndefinedPolicy, interpolate_str},
    tracing::{debug, warn},
};

use crate::schema::EnvinterpConfig;

/// Standard config file names, checked in order.
pub const CONFIG_FILENAMES: &[&str] = &[
    "envinterp.toml",
    "envinterp.yaml",
    "envinterp.yml",
    "envinterp.json",
];

/// Load config from the given path (any supported format).
///
/// `${VAR}` references in the file are expanded from the process
/// environment before parsing; unbound ones are left as-is.
pub fn load_config(path: &Path) -> anyhow::Result<EnvinterpConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw = interpolate_str(&raw, &EnvResolver, UndefinedPolicy::Preserve);
    parse_config(&raw, path).with_context(|| format!("failed to parse {}", path.display()))
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./envinterp.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/envinterp/envinterp.{toml,yaml,yml,json}` (user-global)
///
/// Returns `EnvinterpConfig::default()` if no file is found or the file
/// cannot be loaded.
pub fn discover_and_load() -> EnvinterpConfig {
    let Some(path) = find_config_file() else {
        debug!("no config file found, using defaults");
        return EnvinterpConfig::default();
    };

    debug!(path = %path.display(), "loading config");
    match load_config(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(path = %path.display(), error = %format!("{e:#}"), "failed to load config, using defaults");
            EnvinterpConfig::default()
        },
    }
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    find_config_in(Path::new(".")).or_else(|| user_config_dir().and_then(|d| find_config_in(&d)))
}

/// First standard config file name that exists in `dir`.
pub fn find_config_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// User-global config directory: `~/.config/envinterp/`.
fn user_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().join(".config").join("envinterp"))
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<EnvinterpConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
