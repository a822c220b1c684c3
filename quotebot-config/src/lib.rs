//! Loader for quotebot configuration with YAML + environment overlays.
//!
//! Sources are merged in order: YAML file(s), inline YAML, then `QUOTEBOT__`
//! environment variables (`__` separates nesting levels, e.g.
//! `QUOTEBOT__SHEETS__SPREADSHEET_ID`). After merging, `${VAR}` placeholders in
//! any string are expanded from the process environment.
//!
//! ```yaml
//! sheets:
//!   spreadsheet_id: "${GOOGLE_SHEETS_ID}"
//!   worksheet: "Sheet1"
//!   access_token: "${GOOGLE_ACCESS_TOKEN}"
//! twitter:
//!   access_token: "${TWITTER_ACCESS_TOKEN}"
//! tweet:
//!   max_chars: 280
//! ```
use config::{Config, ConfigError, Environment, File};
use quotebot_common::observability::LogFormat;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_CONFIG_FILE: &str = "quotebot.yaml";

#[derive(Debug, Deserialize)]
pub struct QuotebotConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub sheets: Option<SheetsConfig>,
    #[serde(default)]
    pub twitter: Option<TwitterConfig>,
    #[serde(default)]
    pub tweet: TweetConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    #[serde(default = "default_worksheet")]
    pub worksheet: String,
    /// OAuth access token with the spreadsheets scope (needed for write-back).
    #[serde(default)]
    pub access_token: Option<String>,
    /// API key; only good for reading public sheets.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_sheets_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Deserialize)]
pub struct TwitterConfig {
    /// OAuth 2.0 user-context token with `tweet.write`.
    pub access_token: String,
    #[serde(default = "default_twitter_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Deserialize)]
pub struct TweetConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default)]
    pub wrap_in_quotes: bool,
}

impl Default for TweetConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            wrap_in_quotes: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_true")]
    pub emit_stderr: bool,
    #[serde(default)]
    pub write_file: bool,
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            emit_stderr: true,
            write_file: false,
            dir: None,
            filter: default_filter(),
        }
    }
}

fn default_worksheet() -> String {
    "Sheet1".into()
}
fn default_sheets_endpoint() -> String {
    "https://sheets.googleapis.com/".into()
}
fn default_twitter_endpoint() -> String {
    "https://api.twitter.com/".into()
}
fn default_max_chars() -> usize {
    280
}
fn default_true() -> bool {
    true
}
fn default_filter() -> String {
    "info".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

fn unresolved(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.contains("${") {
        return Err(ConfigError::Message(format!(
            "{field} references an unset environment variable: {value}"
        )));
    }
    if value.trim().is_empty() {
        return Err(ConfigError::Message(format!("{field} is empty")));
    }
    Ok(())
}

impl QuotebotConfig {
    /// The twitter section, with its token resolved. Needed only for posting.
    pub fn posting_twitter(&self) -> Result<&TwitterConfig, ConfigError> {
        let twitter = self
            .twitter
            .as_ref()
            .ok_or_else(|| ConfigError::Message("no twitter section configured".into()))?;
        unresolved("twitter.access_token", &twitter.access_token)?;
        Ok(twitter)
    }

    /// Reject credentials whose `${VAR}` never resolved and blank identifiers.
    ///
    /// The twitter section is only checked by [`Self::posting_twitter`], so a
    /// dry run works with its token unset.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(sheets) = &self.sheets {
            unresolved("sheets.spreadsheet_id", &sheets.spreadsheet_id)?;
            unresolved("sheets.worksheet", &sheets.worksheet)?;
            if let Some(tok) = &sheets.access_token {
                unresolved("sheets.access_token", tok)?;
            }
            if let Some(key) = &sheets.api_key {
                unresolved("sheets.api_key", key)?;
            }
        }
        if self.tweet.max_chars == 0 {
            return Err(ConfigError::Message("tweet.max_chars must be positive".into()));
        }
        Ok(())
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct QuotebotConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: String,
}

impl Default for QuotebotConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl QuotebotConfigLoader {
    /// Start from nothing; `QUOTEBOT__` env overrides are layered on at `load`.
    ///
    /// ```
    /// use quotebot_config::QuotebotConfigLoader;
    ///
    /// let config = QuotebotConfigLoader::new()
    ///     .with_yaml_str("version: '1'\nsheets:\n  spreadsheet_id: abc")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.sheets.unwrap().worksheet, "Sheet1");
    /// assert_eq!(config.tweet.max_chars, 280);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: "QUOTEBOT".into(),
        }
    }

    /// Use a different env prefix (tests use this to stay isolated).
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = prefix.to_string();
        self
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be missing, for deployments configured purely via env.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders and deserialize.
    ///
    /// ```
    /// use quotebot_config::QuotebotConfigLoader;
    ///
    /// unsafe { std::env::set_var("DOC_TW_TOKEN", "injected-from-env"); }
    ///
    /// let config = QuotebotConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// twitter:
    ///   access_token: "${DOC_TW_TOKEN}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// let twitter = config.twitter.expect("twitter section");
    /// assert_eq!(twitter.access_token, "injected-from-env");
    /// assert_eq!(twitter.endpoint, "https://api.twitter.com/");
    ///
    /// unsafe { std::env::remove_var("DOC_TW_TOKEN"); }
    /// ```
    pub fn load(self) -> Result<QuotebotConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: QuotebotConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;
        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("QB_FOO", Some("bar"), || {
            let mut v = json!("prefix-${QB_FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_nested_values() {
        temp_env::with_vars([("QB_SHEET", Some("abc")), ("QB_TAB", Some("Quotes"))], || {
            let mut v = json!({
                "sheets": { "spreadsheet_id": "${QB_SHEET}", "worksheet": "$QB_TAB" },
                "list": ["${QB_SHEET}", 1, null]
            });
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!({
                    "sheets": { "spreadsheet_id": "abc", "worksheet": "Quotes" },
                    "list": ["abc", 1, null]
                })
            );
        });
    }

    #[test]
    fn expands_recursively_and_stops_on_cycles() {
        temp_env::with_vars(
            [
                ("QB_BAZ", Some("qux")),
                ("QB_BAR", Some("mid-${QB_BAZ}")),
                ("QB_A", Some("${QB_B}")),
                ("QB_B", Some("${QB_A}")),
            ],
            || {
                let mut v = json!("X=${QB_BAR}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("X=mid-qux"));

                let mut cyc = json!("x=${QB_A}");
                expand_env_in_value(&mut cyc);
                assert!(cyc.as_str().unwrap().contains("${"));
            },
        );
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${QB_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${QB_DOES_NOT_EXIST}"));
    }

    #[test]
    fn validate_rejects_unresolved_sheet_tokens() {
        let err = QuotebotConfigLoader::new()
            .with_env_prefix("QBTEST_VALIDATE")
            .with_yaml_str("sheets:\n  spreadsheet_id: abc\n  access_token: \"${QB_NEVER_SET_TOKEN}\"")
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("sheets.access_token"));
    }

    #[test]
    fn unresolved_twitter_token_only_fails_when_posting() {
        let cfg = QuotebotConfigLoader::new()
            .with_env_prefix("QBTEST_DRYRUN")
            .with_yaml_str("twitter:\n  access_token: \"${QB_NEVER_SET_TOKEN}\"")
            .load()
            .unwrap();
        let err = cfg.posting_twitter().unwrap_err();
        assert!(err.to_string().contains("twitter.access_token"));
    }

    #[test]
    fn posting_twitter_requires_the_section() {
        let cfg = QuotebotConfigLoader::new()
            .with_env_prefix("QBTEST_NOTW")
            .with_yaml_str("version: '1'")
            .load()
            .unwrap();
        assert!(cfg.posting_twitter().is_err());

        let cfg = QuotebotConfigLoader::new()
            .with_env_prefix("QBTEST_TW")
            .with_yaml_str("twitter:\n  access_token: tok")
            .load()
            .unwrap();
        assert_eq!(cfg.posting_twitter().unwrap().access_token, "tok");
    }

    #[test]
    fn validate_rejects_zero_limit() {
        let err = QuotebotConfigLoader::new()
            .with_env_prefix("QBTEST_ZERO")
            .with_yaml_str("tweet:\n  max_chars: 0")
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("max_chars"));
    }

    #[test]
    fn logging_defaults() {
        let cfg = QuotebotConfigLoader::new()
            .with_env_prefix("QBTEST_LOGDEF")
            .with_yaml_str("logging:\n  format: json")
            .load()
            .unwrap();
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert!(cfg.logging.emit_stderr);
        assert!(!cfg.logging.write_file);
        assert_eq!(cfg.logging.filter, "info");
    }
}
