use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{LoadError, SheetRequest, SheetSource, SheetTable};

const SHEETS_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";

/// Reads a worksheet through the Google Sheets CSV export endpoint.
pub struct GoogleSheetSource {
    client: Client,
    token: Option<String>,
}

impl GoogleSheetSource {
    pub fn new(timeout: Duration, token: Option<String>) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                LoadError::SourceUnavailable(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, token })
    }

    /// A locator that already is an http(s) URL is used verbatim; anything
    /// else is treated as a spreadsheet id.
    fn build_request(&self, request: &SheetRequest) -> RequestBuilder {
        let locator = request.source.trim();
        let builder = if locator.starts_with("http://") || locator.starts_with("https://") {
            self.client.get(locator)
        } else {
            self.client
                .get(format!("{SHEETS_BASE_URL}/{locator}/gviz/tq"))
                .query(&[("tqx", "out:csv"), ("sheet", request.worksheet.as_str())])
        };

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl SheetSource for GoogleSheetSource {
    #[instrument(skip(self))]
    async fn fetch(&self, request: &SheetRequest) -> Result<SheetTable, LoadError> {
        debug!("Requesting sheet export");

        let response = self
            .build_request(request)
            .send()
            .await
            .map_err(|e| LoadError::SourceUnavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Sheet export returned an error status");
            return Err(LoadError::SourceUnavailable(format!(
                "sheet export returned status {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LoadError::SourceUnavailable(format!("failed to read response: {e}")))?;

        let table = SheetTable::from_csv(&body).map_err(|e| {
            LoadError::SourceUnavailable(format!("sheet export is not valid CSV: {e}"))
        })?;

        info!(rows = table.rows().len(), "Fetched sheet export");
        Ok(table)
    }
}
