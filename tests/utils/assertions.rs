use axum::{http::StatusCode, response::Response};
use serde_json::Value;

// ============================================================================
// Response Assertions
// ============================================================================

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub async fn read(response: Response) -> Self {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Self { status, body }
    }

    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "unexpected status, body was {}",
            self.body
        );
        self
    }

    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// `player` field of each element of `data`, in order.
    pub fn players(&self) -> Vec<String> {
        self.data()
            .as_array()
            .expect("data should be an array")
            .iter()
            .map(|item| item["player"].as_str().unwrap().to_string())
            .collect()
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    pub fn is_stale(&self) -> bool {
        !self.body["stale"].is_null()
    }
}
