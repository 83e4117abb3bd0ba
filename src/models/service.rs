use serde::{Deserialize, Serialize};

use super::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: RecordId,
    pub name: String,
    pub price: f64,
    /// First linked category, used as the table label.
    pub category: Option<RecordId>,
    pub category_ids: Vec<RecordId>,
    /// Average duration in minutes.
    pub duration: i64,
    pub description: String,
    pub image_url: String,
    pub is_additional: bool,
    pub created_at: Option<String>,
    pub last_modified_at: Option<String>,
}
