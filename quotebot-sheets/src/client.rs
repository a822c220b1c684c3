//! Sheets v4 `values` client implementing [`TabularSource`].
use crate::a1::{cell_range, quote_sheet, row_range};
use crate::types::{UpdateValuesResponse, ValueRange};
use async_trait::async_trait;
use quotebot_common::{QuotebotError, Result};
use quotebot_core::source::rows_from_grid;
use quotebot_core::{Row, TabularSource};
use quotebot_http::{Auth, HttpClient, HttpError, RequestOpts};
use serde_json::Value;
use std::borrow::Cow;
use url::Url;

/// How requests are authorised. Obtaining the token is left to the deployment.
#[derive(Clone)]
pub enum SheetsAuth {
    /// OAuth access token with the spreadsheets scope; reads and writes.
    AccessToken(String),
    /// API key; reads of link-shared sheets only.
    ApiKey(String),
}

impl std::fmt::Debug for SheetsAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetsAuth::AccessToken(_) => f.write_str("AccessToken(<redacted>)"),
            SheetsAuth::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SheetsClient {
    http: HttpClient,
    spreadsheet_id: String,
    worksheet: String,
    auth: SheetsAuth,
}

impl SheetsClient {
    pub const DEFAULT_ENDPOINT: &'static str = "https://sheets.googleapis.com/";

    pub fn new(
        endpoint: &str,
        spreadsheet_id: impl Into<String>,
        worksheet: impl Into<String>,
        auth: SheetsAuth,
    ) -> std::result::Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(endpoint)?,
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: worksheet.into(),
            auth,
        })
    }

    /// Absolute URL for `spreadsheets/{id}/values/{range}`; segments are
    /// percent-encoded so sheet titles may hold spaces or `#`.
    fn values_url(&self, range: &str) -> std::result::Result<String, HttpError> {
        let mut url: Url = self.http.base().clone();
        url.path_segments_mut()
            .map_err(|_| HttpError::Url(format!("{} cannot be a base", self.http.base())))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url.into())
    }

    fn opts<'a>(&'a self, query: Vec<(&'a str, Cow<'a, str>)>) -> RequestOpts<'a> {
        let auth = match &self.auth {
            SheetsAuth::AccessToken(tok) => Auth::Bearer(tok.as_str()),
            SheetsAuth::ApiKey(key) => Auth::Query {
                name: "key",
                value: Cow::Borrowed(key.as_str()),
            },
        };
        RequestOpts {
            auth: Some(auth),
            query: Some(query),
            allow_absolute: true,
            ..Default::default()
        }
    }

    /// Fetch a range as unformatted values, row-major.
    pub async fn get_values(&self, range: &str) -> std::result::Result<ValueRange, HttpError> {
        let url = self.values_url(range)?;
        let resp: ValueRange = self
            .http
            .get_json(
                &url,
                self.opts(vec![
                    ("majorDimension", "ROWS".into()),
                    ("valueRenderOption", "UNFORMATTED_VALUE".into()),
                ]),
            )
            .await?;
        tracing::debug!(range, rows = resp.values.len(), "sheets.values.get");
        Ok(resp)
    }

    /// Overwrite one range with a single raw value.
    pub async fn update_value(
        &self,
        range: &str,
        value: &str,
    ) -> std::result::Result<UpdateValuesResponse, HttpError> {
        let url = self.values_url(range)?;
        let body = ValueRange {
            range: Some(range.to_string()),
            major_dimension: Some("ROWS".into()),
            values: vec![vec![Value::String(value.to_string())]],
        };
        let resp: UpdateValuesResponse = self
            .http
            .put_json(&url, &body, self.opts(vec![("valueInputOption", "RAW".into())]))
            .await?;
        tracing::debug!(
            range,
            updated_range = ?resp.updated_range,
            updated_cells = ?resp.updated_cells,
            "sheets.values.update"
        );
        Ok(resp)
    }
}

fn header_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl TabularSource for SheetsClient {
    async fn read_all_rows(&self) -> Result<Vec<Row>> {
        let grid = self
            .get_values(&quote_sheet(&self.worksheet))
            .await
            .map_err(|e| QuotebotError::SourceRead(e.to_string()))?;
        Ok(rows_from_grid(&grid.values))
    }

    async fn read_header_row(&self) -> Result<Vec<String>> {
        let grid = self
            .get_values(&row_range(&self.worksheet, 1))
            .await
            .map_err(|e| QuotebotError::SourceRead(e.to_string()))?;
        Ok(grid
            .values
            .first()
            .map(|cells| cells.iter().map(header_text).collect())
            .unwrap_or_default())
    }

    async fn write_cell(&self, row: usize, column: usize, value: &str) -> Result<()> {
        if row == 0 || column == 0 {
            return Err(QuotebotError::WriteBack(format!(
                "cell ({row}, {column}) is out of range; rows and columns start at 1"
            )));
        }
        if matches!(self.auth, SheetsAuth::ApiKey(_)) {
            return Err(QuotebotError::WriteBack(
                "an API key cannot write to a sheet; configure sheets.access_token".into(),
            ));
        }
        self.update_value(&cell_range(&self.worksheet, row, column), value)
            .await
            .map_err(|e| QuotebotError::WriteBack(e.to_string()))?;
        Ok(())
    }
}
