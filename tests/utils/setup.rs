use axum::{body::Body, http::Request, Router};
use chrono::{TimeDelta, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // for `oneshot`

use geoscore::{
    records::DatePolicy, router, AppState, DashboardService, InMemorySheetSource, LoadCache,
    Loader, ManualClock, SheetRequest, SheetTable, Validator,
};

use super::assertions::TestResponse;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const WORKSHEET: &str = "Scores";

pub struct TestSetup {
    pub source: Arc<InMemorySheetSource>,
    pub clock: Arc<ManualClock>,
    pub app: Router,
}

pub struct TestSetupBuilder {
    header: String,
    rows: Vec<String>,
    ttl: Duration,
    date_policy: DatePolicy,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            header: "player,date,score".to_string(),
            rows: vec![],
            ttl: Duration::from_secs(300),
            date_policy: DatePolicy::default(),
        }
    }

    pub fn with_header(mut self, header: &str) -> Self {
        self.header = header.to_string();
        self
    }

    pub fn with_row(mut self, player: &str, date: &str, score: &str) -> Self {
        self.rows.push(format!("{player},{date},{score}"));
        self
    }

    /// Appends a raw CSV line, for rows that do not fit the three columns.
    pub fn with_line(mut self, line: &str) -> Self {
        self.rows.push(line.to_string());
        self
    }

    /// One game per day starting 2024-01-01.
    pub fn with_daily_scores(mut self, player: &str, scores: &[u32]) -> Self {
        for (day, score) in scores.iter().enumerate() {
            let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                + TimeDelta::days(day as i64);
            self.rows.push(format!("{player},{date},{score}"));
        }
        self
    }

    pub fn with_ttl_secs(mut self, secs: u64) -> Self {
        self.ttl = Duration::from_secs(secs);
        self
    }

    pub fn with_date_policy(mut self, policy: DatePolicy) -> Self {
        self.date_policy = policy;
        self
    }

    pub fn build(self) -> TestSetup {
        let csv = csv_text(&self.header, &self.rows);
        let source = Arc::new(
            InMemorySheetSource::new()
                .with_worksheet(WORKSHEET, SheetTable::from_csv(&csv).unwrap()),
        );
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        ));

        let cache = Arc::new(LoadCache::new(self.ttl, clock.clone()));
        let dashboard = DashboardService::new(
            Loader::new(source.clone(), Validator::new(self.date_policy)),
            cache,
            SheetRequest::new("test-spreadsheet", WORKSHEET),
        );
        let app = router(AppState::new(Arc::new(dashboard)));

        TestSetup { source, clock, app }
    }
}

impl Default for TestSetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSetup {
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send("GET", uri).await
    }

    pub async fn post(&self, uri: &str) -> TestResponse {
        self.send("POST", uri).await
    }

    async fn send(&self, method: &str, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        TestResponse::read(response).await
    }

    /// Replaces the sheet contents behind the dashboard.
    pub async fn edit_sheet(&self, rows: &[(&str, &str, &str)]) {
        let lines: Vec<String> = rows
            .iter()
            .map(|(player, date, score)| format!("{player},{date},{score}"))
            .collect();
        let csv = csv_text("player,date,score", &lines);
        self.source
            .set_worksheet(WORKSHEET, SheetTable::from_csv(&csv).unwrap())
            .await;
    }

    pub fn advance_secs(&self, secs: i64) {
        self.clock.advance(TimeDelta::seconds(secs));
    }

    pub fn go_offline(&self) {
        self.source.set_unavailable(true);
    }

    pub fn come_back_online(&self) {
        self.source.set_unavailable(false);
    }

    pub fn fetch_count(&self) -> usize {
        self.source.fetch_count()
    }
}

fn csv_text(header: &str, rows: &[String]) -> String {
    let mut csv = String::from(header);
    for row in rows {
        csv.push('\n');
        csv.push_str(row);
    }
    csv.push('\n');
    csv
}
