use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::LoadError;

/// Which sheet to read. Also the cache key for a load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetRequest {
    /// Spreadsheet id or a full CSV export URL.
    pub source: String,
    pub worksheet: String,
}

impl SheetRequest {
    pub fn new(source: impl Into<String>, worksheet: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            worksheet: worksheet.into(),
        }
    }
}

/// Untyped tabular data as returned by a sheet: a header row and string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Decodes CSV text whose first record is the header row. Short records
    /// are allowed; their missing cells read as empty.
    pub fn from_csv(text: &str) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, _>>()?;

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// The external collaborator that returns raw sheet contents.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch(&self, request: &SheetRequest) -> Result<SheetTable, LoadError>;
}

/// In-memory sheet source for development and testing
///
/// Tables are keyed by worksheet name. The source can be switched into an
/// unavailable state to simulate transport failures.
#[derive(Debug, Default)]
pub struct InMemorySheetSource {
    worksheets: RwLock<HashMap<String, SheetTable>>,
    unavailable: AtomicBool,
    fetches: AtomicUsize,
}

impl InMemorySheetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_worksheet(mut self, worksheet: impl Into<String>, table: SheetTable) -> Self {
        self.worksheets.get_mut().insert(worksheet.into(), table);
        self
    }

    pub async fn set_worksheet(&self, worksheet: impl Into<String>, table: SheetTable) {
        self.worksheets.write().await.insert(worksheet.into(), table);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of fetches attempted so far, including failed ones.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SheetSource for InMemorySheetSource {
    #[instrument(skip(self))]
    async fn fetch(&self, request: &SheetRequest) -> Result<SheetTable, LoadError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            warn!("In-memory sheet source marked unavailable");
            return Err(LoadError::SourceUnavailable(
                "sheet source is offline".to_string(),
            ));
        }

        let worksheets = self.worksheets.read().await;
        match worksheets.get(&request.worksheet) {
            Some(table) => {
                debug!(rows = table.rows().len(), "Worksheet found in memory");
                Ok(table.clone())
            }
            None => Err(LoadError::SourceUnavailable(format!(
                "worksheet {:?} not found",
                request.worksheet
            ))),
        }
    }
}
