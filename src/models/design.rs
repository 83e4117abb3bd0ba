use serde::{Deserialize, Serialize};

use super::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NailDesign {
    pub id: RecordId,
    pub name: String,
    pub price: Option<f64>,
    pub trend_score: f64,
    pub description: String,
    pub average_rating: Option<f64>,
    pub created_at: Option<String>,
    pub last_modified_at: Option<String>,
    /// Primary linked service (the first entry of `services`).
    pub service_id: Option<RecordId>,
    pub extra_price: f64,
    pub services: Vec<DesignServiceLink>,
    pub color_ids: Vec<RecordId>,
    pub occasion_ids: Vec<RecordId>,
    pub skintone_ids: Vec<RecordId>,
    pub paint_type_ids: Vec<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignServiceLink {
    pub service_id: RecordId,
    #[serde(default)]
    pub extra_price: f64,
}
