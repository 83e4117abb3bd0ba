use serde::{Deserialize, Serialize};

use super::id::{lenient_number, null_as_default};
use super::RecordId;

/// Pending appointment request kept by the separate waitlist backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub store: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: f64,
}
