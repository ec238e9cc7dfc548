/// Configuration system.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::MartlensConfig::default()`]
/// 2. **User global config** — `~/.martlens/config.toml`
/// 3. **Project local config** — `.martlens.toml` in the current working directory
/// 4. **Environment variables** — `MARTLENS_*` overrides (highest precedence)
///
/// Later layers override earlier ones. Missing sections in a TOML file fall
/// back to the previous layer's values.
///
/// # Usage
///
/// ```rust,ignore
/// use martlens::config;
///
/// let cfg = config::load();
/// println!("reading {}", cfg.data.path);
/// ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::MartlensConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. This is the primary entry point for all modules that need
/// configuration.
pub fn load() -> MartlensConfig {
    let mut config = MartlensConfig::default();

    // Layer 2: user global config (~/.martlens/config.toml)
    if let Some(global) = load_toml_file(global_config_path()) {
        merge_config(&mut config, &global);
    }

    // Layer 3: project local config (.martlens.toml)
    if let Some(project) = load_toml_file(project_config_path()) {
        merge_config(&mut config, &project);
    }

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed. A broken config file never blocks a report run.
fn load_toml_file(path: Option<PathBuf>) -> Option<MartlensConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge a loaded config layer into the base config.
///
/// Each TOML file deserializes with `serde(default)`, so fields the user
/// left out carry the built-in defaults, which match the base. Replacing
/// the base wholesale therefore applies exactly the explicitly-set values.
fn merge_config(base: &mut MartlensConfig, overlay: &MartlensConfig) {
    *base = overlay.clone();
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.martlens/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".martlens").join("config.toml"))
}

/// Path to the project local config: `.martlens.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".martlens.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `MARTLENS_DATA` — transaction CSV path
/// - `MARTLENS_TOP_N` — default ranking size
/// - `MARTLENS_SAMPLE_ROWS` — default sample size
/// - `MARTLENS_NO_COLOR` — disable ANSI color (`1`/`true`/`yes`/`on`)
/// - `MARTLENS_HOST` — dashboard bind host
/// - `MARTLENS_PORT` — dashboard bind port
fn apply_env_overrides(config: &mut MartlensConfig) {
    if let Ok(val) = std::env::var("MARTLENS_DATA")
        && !val.is_empty()
    {
        config.data.path = val;
    }
    if let Ok(val) = std::env::var("MARTLENS_TOP_N")
        && let Ok(n) = val.parse::<usize>()
    {
        config.report.top_n = n;
    }
    if let Ok(val) = std::env::var("MARTLENS_SAMPLE_ROWS")
        && let Ok(n) = val.parse::<usize>()
    {
        config.report.sample_rows = n;
    }
    if let Ok(val) = std::env::var("MARTLENS_NO_COLOR")
        && is_truthy(&val)
    {
        config.display.color = false;
    }
    if let Ok(val) = std::env::var("MARTLENS_HOST")
        && !val.is_empty()
    {
        config.server.host = val;
    }
    if let Ok(val) = std::env::var("MARTLENS_PORT")
        && let Ok(port) = val.parse::<u16>()
    {
        config.server.port = port;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.martlens/config.toml`.
///
/// Creates the `~/.martlens/` directory if it doesn't exist. Returns an
/// error if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.martlens/ directory")?;
    }

    fs::write(&path, MartlensConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or defaults), updates the specified
/// key, and writes the result back. Supports dotted keys like
/// `report.top_n`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&MartlensConfig::default())
            .context("failed to serialize default config")?
    };

    // Parse as toml::Value for a surgical update
    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.is_empty() {
        anyhow::bail!("empty config key");
    }

    // Navigate to the parent table
    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    // Determine the type of the existing value to parse correctly
    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let existing = table.get(leaf);
    let new_value = match existing {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
