/// Configuration schema and defaults.
///
/// Defines the TOML-serializable configuration with sections `[data]`,
/// `[report]`, `[display]`, and `[server]`. Every field has a built-in
/// default; users only set the values they want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration.
///
/// Maps directly to the `~/.martlens/config.toml` and `.martlens.toml`
/// file schemas. All sections and fields are optional — missing values
/// fall back to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MartlensConfig {
    pub data: DataConfig,
    pub report: ReportConfig,
    pub display: DisplayConfig,
    pub server: ServerConfig,
}

// ---------------------------------------------------------------------------
// [data]
// ---------------------------------------------------------------------------

/// Where the transaction file lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the transaction CSV. Overridden by `--data` or
    /// `MARTLENS_DATA`.
    pub path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: "sales.csv".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [report]
// ---------------------------------------------------------------------------

/// Report sizing and formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Default entry count for top-N rankings.
    pub top_n: usize,
    /// Default row count for the sample table.
    pub sample_rows: usize,
    /// Currency symbol used in table output.
    pub currency: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            sample_rows: 20,
            currency: "$".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [display]
// ---------------------------------------------------------------------------

/// Terminal output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// ANSI color in table output. `MARTLENS_NO_COLOR=1` forces this off.
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// Dashboard server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` as one bindable address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl MartlensConfig {
    /// Annotated default TOML, written by `martlens config init`.
    pub fn default_toml() -> String {
        r#"# martlens Configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (MARTLENS_*)
#   2. Project config (.martlens.toml in current directory)
#   3. User global config (~/.martlens/config.toml)
#   4. Built-in defaults

[data]
path = "sales.csv"    # Transaction CSV (or use --data / MARTLENS_DATA)

[report]
top_n = 5             # Rows in top-N rankings
sample_rows = 20      # Rows in the sample table
currency = "$"        # Symbol for currency columns

[display]
color = true          # Set false or MARTLENS_NO_COLOR=1 for plain output

[server]
host = "127.0.0.1"
port = 7878
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = MartlensConfig::default();
        assert_eq!(config.data.path, "sales.csv");
        assert_eq!(config.report.top_n, 5);
        assert_eq!(config.report.sample_rows, 20);
        assert_eq!(config.report.currency, "$");
        assert!(config.display.color);
        assert_eq!(config.server.addr(), "127.0.0.1:7878");
    }

    #[test]
    fn deserialize_minimal_toml() {
        let toml_str = r#"
[data]
path = "archive/q3.csv"
"#;
        let config: MartlensConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data.path, "archive/q3.csv");
        // All other sections fall back to defaults
        assert_eq!(config.report.top_n, 5);
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn deserialize_full_toml() {
        let toml_str = r#"
[data]
path = "/srv/sales/all.csv"

[report]
top_n = 10
sample_rows = 50
currency = "€"

[display]
color = false

[server]
host = "0.0.0.0"
port = 9000
"#;
        let config: MartlensConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data.path, "/srv/sales/all.csv");
        assert_eq!(config.report.top_n, 10);
        assert_eq!(config.report.sample_rows, 50);
        assert_eq!(config.report.currency, "€");
        assert!(!config.display.color);
        assert_eq!(config.server.addr(), "0.0.0.0:9000");
    }

    #[test]
    fn empty_toml_produces_defaults() {
        let config: MartlensConfig = toml::from_str("").unwrap();
        assert_eq!(config.data.path, "sales.csv");
        assert!(config.display.color);
    }

    #[test]
    fn default_toml_parses_back() {
        let toml_str = MartlensConfig::default_toml();
        let config: MartlensConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.report.top_n, 5);
        assert_eq!(config.server.port, 7878);
    }
}
