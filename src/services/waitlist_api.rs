use serde_json::json;

use crate::errors::AppError;
use crate::models::{RecordId, WaitlistEntry};
use crate::services::api::wire;

/// Client for the standalone waitlist backend (plain REST, JSON bodies).
pub struct WaitlistClient {
    base_url: String,
    client: reqwest::Client,
}

impl WaitlistClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub async fn fetch_entries(&self) -> Result<Vec<WaitlistEntry>, AppError> {
        let resp = self
            .client
            .get(format!("{}/Booking", self.base_url))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(AppError::Status {
                status: status.as_u16(),
                body,
            });
        }
        wire::decode_list::<WaitlistEntry, _>(&body, None)
    }

    pub async fn update_time(
        &self,
        id: &RecordId,
        start_time: &str,
        end_time: &str,
    ) -> Result<(), AppError> {
        let resp = self
            .client
            .put(format!("{}/Booking/{}", self.base_url, id))
            .json(&json!({
                "startTime": start_time,
                "endTime": end_time,
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
