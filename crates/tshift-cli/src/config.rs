//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Deserializer, Serialize};
use tshift_core::{DEFAULT_FUDGE_MS, ScanConfig};

/// Time-shift tolerance in milliseconds.
///
/// Parsing never fails: anything that is not a non-negative integer falls
/// back to the default of 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Fudge(i64);

impl Default for Fudge {
    fn default() -> Self {
        Self(DEFAULT_FUDGE_MS)
    }
}

impl Fudge {
    pub fn new(millis: i64) -> Self {
        if millis < 0 {
            tracing::debug!(millis, "negative fudge factor, using default");
            return Self::default();
        }
        Self(millis)
    }

    /// Parses user input, substituting the default for invalid values.
    pub fn parse_lenient(value: &str) -> Self {
        value.trim().parse::<i64>().map_or_else(
            |_| {
                tracing::debug!(value, "invalid fudge factor, using default");
                Self::default()
            },
            Self::new,
        )
    }

    pub const fn millis(self) -> i64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Fudge {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawFudge {
            Int(i64),
            Text(String),
            Other(serde::de::IgnoredAny),
        }

        Ok(match RawFudge::deserialize(deserializer)? {
            RawFudge::Int(millis) => Self::new(millis),
            RawFudge::Text(text) => Self::parse_lenient(&text),
            RawFudge::Other(_) => Self::default(),
        })
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Time-shift tolerance in milliseconds.
    #[serde(default)]
    pub fudge: Fudge,

    /// Run the time-shift section.
    #[serde(default)]
    pub timeshifts: bool,
}

impl Config {
    /// Loads configuration from default locations, then `config_path` if
    /// given, then `TSHIFT_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TSHIFT_*)
        figment = figment.merge(Env::prefixed("TSHIFT_"));

        figment.extract()
    }

    /// Settings for the time-shift scanner.
    pub const fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            fudge_ms: self.fudge.millis(),
        }
    }
}

/// Returns the platform-specific config directory for tshift.
///
/// On Linux: `~/.config/tshift`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tshift"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Config {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(toml))
            .extract()
            .unwrap()
    }

    #[test]
    fn test_default_fudge_is_500() {
        let config = Config::default();
        assert_eq!(config.fudge.millis(), 500);
        assert!(!config.timeshifts);
        assert_eq!(config.scan_config(), ScanConfig::default());
    }

    #[test]
    fn test_parse_lenient_accepts_integers() {
        assert_eq!(Fudge::parse_lenient("250").millis(), 250);
        assert_eq!(Fudge::parse_lenient(" 0 ").millis(), 0);
    }

    #[test]
    fn test_parse_lenient_falls_back_to_default() {
        assert_eq!(Fudge::parse_lenient("abc").millis(), 500);
        assert_eq!(Fudge::parse_lenient("1.5").millis(), 500);
        assert_eq!(Fudge::parse_lenient("").millis(), 500);
        assert_eq!(Fudge::parse_lenient("-20").millis(), 500);
    }

    #[test]
    fn test_toml_integer_fudge() {
        let config = from_toml("fudge = 1000\ntimeshifts = true");
        assert_eq!(config.fudge.millis(), 1000);
        assert!(config.timeshifts);
    }

    #[test]
    fn test_toml_string_fudge() {
        assert_eq!(from_toml(r#"fudge = "750""#).fudge.millis(), 750);
        assert_eq!(from_toml(r#"fudge = "lots""#).fudge.millis(), 500);
    }

    #[test]
    fn test_toml_unexpected_fudge_type() {
        assert_eq!(from_toml("fudge = 2.5").fudge.millis(), 500);
        assert_eq!(from_toml("fudge = [1, 2]").fudge.millis(), 500);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = from_toml("");
        assert_eq!(config.fudge, Fudge::default());
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tshift.toml");
        std::fs::write(&path, "fudge = 42\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.fudge.millis(), 42);
    }

    #[test]
    fn test_dirs_config_path_ends_with_tshift() {
        if let Some(path) = dirs_config_path() {
            assert_eq!(path.file_name().unwrap(), "tshift");
        }
    }
}
