//! Turn a loaded [`QuotebotConfig`] into the collaborators a run needs.
use anyhow::{Context, Result};
use quotebot_common::QuotebotError;
use quotebot_common::observability::LogConfig;
use quotebot_config::{LoggingConfig, QuotebotConfig, SheetsConfig, TweetConfig};
use quotebot_core::{FormatOptions, MemoryTable, Row, TabularSource};
use quotebot_sheets::{SheetsAuth, SheetsClient};
use quotebot_social::TwitterApi;
use std::path::Path;
use std::sync::Arc;

pub fn log_config(logging: &LoggingConfig) -> LogConfig {
    LogConfig {
        app_name: "quotebot",
        log_dir: logging.dir.clone(),
        emit_stderr: logging.emit_stderr,
        write_file: logging.write_file,
        format: logging.format,
        default_filter: logging.filter.clone(),
    }
}

pub fn format_options(tweet: &TweetConfig) -> FormatOptions {
    FormatOptions {
        max_chars: tweet.max_chars,
        wrap_in_quotes: tweet.wrap_in_quotes,
    }
}

/// The access token wins when both credentials are configured.
pub fn sheets_auth(sheets: &SheetsConfig) -> Result<SheetsAuth, QuotebotError> {
    match (&sheets.access_token, &sheets.api_key) {
        (Some(token), _) => Ok(SheetsAuth::AccessToken(token.clone())),
        (None, Some(key)) => {
            tracing::warn!("Using a Sheets API key; quotes cannot be marked as posted");
            Ok(SheetsAuth::ApiKey(key.clone()))
        }
        (None, None) => Err(QuotebotError::Config(
            "sheets needs either access_token or api_key".into(),
        )),
    }
}

/// Rows from a JSON array of objects, one object per data row.
pub fn load_rows_file(path: &Path) -> Result<MemoryTable> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading rows file {}", path.display()))?;
    let rows: Vec<Row> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of objects", path.display()))?;
    Ok(MemoryTable::from_rows(&rows))
}

/// A rows file takes precedence over the configured sheet.
pub fn build_source(cfg: &QuotebotConfig, rows_file: Option<&Path>) -> Result<Arc<dyn TabularSource>> {
    if let Some(path) = rows_file {
        let table = load_rows_file(path)?;
        tracing::info!(path = %path.display(), "Reading quotes from rows file");
        return Ok(Arc::new(table));
    }

    let sheets = cfg
        .sheets
        .as_ref()
        .ok_or_else(|| QuotebotError::Config("no sheets section configured".into()))?;
    let client = SheetsClient::new(
        &sheets.endpoint,
        sheets.spreadsheet_id.clone(),
        sheets.worksheet.clone(),
        sheets_auth(sheets)?,
    )
    .context("building sheets client")?;
    tracing::info!(worksheet = %sheets.worksheet, "Reading quotes from Google Sheets");
    Ok(Arc::new(client))
}

pub fn build_poster(cfg: &QuotebotConfig) -> Result<TwitterApi> {
    let twitter = cfg
        .posting_twitter()
        .map_err(|e| QuotebotError::Config(e.to_string()))?;
    TwitterApi::new(&twitter.endpoint, twitter.access_token.clone()).context("building twitter client")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotebot_config::QuotebotConfigLoader;
    use rand::SeedableRng;
    use std::io::Write;

    fn config(yaml: &str) -> QuotebotConfig {
        QuotebotConfigLoader::new()
            .with_env_prefix("QBWIRING")
            .with_yaml_str(yaml)
            .load()
            .unwrap()
    }

    #[test]
    fn access_token_preferred_over_api_key() {
        let cfg = config("sheets:\n  spreadsheet_id: abc\n  access_token: tok\n  api_key: key\n");
        let auth = sheets_auth(cfg.sheets.as_ref().unwrap()).unwrap();
        assert!(matches!(auth, SheetsAuth::AccessToken(t) if t == "tok"));
    }

    #[test]
    fn sheets_without_credentials_is_a_config_error() {
        let cfg = config("sheets:\n  spreadsheet_id: abc\n");
        let err = sheets_auth(cfg.sheets.as_ref().unwrap()).unwrap_err();
        assert!(matches!(err, QuotebotError::Config(_)));
    }

    #[test]
    fn missing_sections_fail() {
        let cfg = config("tweet:\n  max_chars: 200\n");
        assert!(build_source(&cfg, None).is_err());
        assert!(build_poster(&cfg).is_err());
        assert_eq!(format_options(&cfg.tweet).max_chars, 200);
    }

    #[tokio::test]
    async fn rows_file_becomes_a_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"Quote": "Hello", "Author": "Ann", "Posted": "Yes"}}, {{"Quote": "Bye", "Author": "Bob"}}]"#
        )
        .unwrap();

        let cfg = config("version: '1'\n");
        let source = build_source(&cfg, Some(file.path())).unwrap();
        let records = quotebot_core::load_records(source.as_ref()).await;
        assert_eq!(records.len(), 2);
        assert!(records[0].posted);
        assert_eq!(records[1].author.as_deref(), Some("Bob"));
    }

    #[tokio::test]
    async fn dry_run_needs_no_twitter_token() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"Quote": "Hello"}}]"#).unwrap();

        let cfg = config("twitter:\n  access_token: \"${QB_WIRING_UNSET_TOKEN}\"\n");
        let source = build_source(&cfg, Some(file.path())).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let prepared = quotebot_core::prepare(source.as_ref(), &format_options(&cfg.tweet), &mut rng)
            .await
            .unwrap();
        assert_eq!(prepared.text, "Hello");

        let err = build_poster(&cfg).unwrap_err();
        assert!(err.to_string().contains("twitter.access_token"));
    }

    #[test]
    fn rows_file_must_be_an_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Quote": "Hello"}}"#).unwrap();
        assert!(load_rows_file(file.path()).is_err());
    }
}
