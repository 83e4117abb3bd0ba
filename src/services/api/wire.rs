use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, DesignServiceLink, NailDesign, RecordId, Service};

// ── Response records (PascalCase OData payloads) ──

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookingRecord {
    #[serde(rename = "ID", alias = "Id", alias = "id")]
    pub id: RecordId,
    #[serde(default)]
    pub service_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub predict_end_time: Option<String>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default)]
    pub last_modified_at: Option<String>,
    #[serde(default)]
    pub customer_selected_id: Option<RecordId>,
    #[serde(default)]
    pub artist_store_id: Option<RecordId>,
    #[serde(default)]
    pub artist_store: Option<ArtistStoreRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ArtistStoreRecord {
    #[serde(default)]
    pub store: Option<StoreRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoreRecord {
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRecord {
    #[serde(rename = "ID", alias = "Id", alias = "id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub average_duration: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_additional: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_modified_at: Option<String>,
    #[serde(default)]
    pub category_services: Option<Vec<CategoryServiceRecord>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryServiceRecord {
    #[serde(alias = "categoryId", alias = "CategoryID", default)]
    pub category_id: Option<RecordId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DesignRecord {
    #[serde(rename = "ID", alias = "Id", alias = "id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub trend_score: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_modified_at: Option<String>,
    #[serde(default)]
    pub services: Option<Vec<DesignServiceRecord>>,
    #[serde(default)]
    pub color_ids: Option<Vec<RecordId>>,
    #[serde(default)]
    pub occasion_ids: Option<Vec<RecordId>>,
    #[serde(default)]
    pub skintone_ids: Option<Vec<RecordId>>,
    #[serde(default)]
    pub paint_type_ids: Option<Vec<RecordId>>,
}

/// Design-to-service link. The backend has shipped all three id spellings.
#[derive(Debug, Deserialize)]
pub struct DesignServiceRecord {
    #[serde(rename = "ServiceID", alias = "serviceId", alias = "ServiceId", default)]
    pub service_id: Option<RecordId>,
    #[serde(rename = "ExtraPrice", alias = "extraPrice", default)]
    pub extra_price: Option<f64>,
}

impl From<BookingRecord> for Booking {
    fn from(r: BookingRecord) -> Self {
        Booking {
            id: r.id,
            service_date: r.service_date,
            start_time: r.start_time,
            predict_end_time: r.predict_end_time,
            total_amount: r.total_amount.unwrap_or(0.0),
            status: BookingStatus::from(r.status.unwrap_or(0)),
            last_modified_at: r.last_modified_at,
            customer_selected_id: r.customer_selected_id,
            artist_store_id: r.artist_store_id,
            store_address: r
                .artist_store
                .and_then(|a| a.store)
                .and_then(|s| s.address),
        }
    }
}

impl From<ServiceRecord> for Service {
    fn from(r: ServiceRecord) -> Self {
        let category_ids: Vec<RecordId> = r
            .category_services
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.category_id)
            .collect();

        Service {
            id: r.id,
            name: r.name.unwrap_or_default(),
            price: r.price.unwrap_or(0.0),
            category: category_ids.first().cloned(),
            category_ids,
            duration: r.average_duration.unwrap_or(0.0) as i64,
            description: r.description.unwrap_or_default(),
            image_url: r.image_url.unwrap_or_default(),
            is_additional: r.is_additional.unwrap_or(false),
            created_at: r.created_at,
            last_modified_at: r.last_modified_at,
        }
    }
}

impl From<DesignRecord> for NailDesign {
    fn from(r: DesignRecord) -> Self {
        let services: Vec<DesignServiceLink> = r
            .services
            .unwrap_or_default()
            .into_iter()
            .filter_map(|s| {
                s.service_id.map(|service_id| DesignServiceLink {
                    service_id,
                    extra_price: s.extra_price.unwrap_or(0.0),
                })
            })
            .collect();
        let primary = services.first();

        NailDesign {
            id: r.id,
            name: r.name.unwrap_or_default(),
            price: r.price,
            trend_score: r.trend_score.unwrap_or(0.0),
            description: r.description.unwrap_or_default(),
            average_rating: r.average_rating,
            created_at: r.created_at,
            last_modified_at: r.last_modified_at,
            service_id: primary.map(|s| s.service_id.clone()),
            extra_price: primary.map(|s| s.extra_price).unwrap_or(0.0),
            color_ids: r.color_ids.unwrap_or_default(),
            occasion_ids: r.occasion_ids.unwrap_or_default(),
            skintone_ids: r.skintone_ids.unwrap_or_default(),
            paint_type_ids: r.paint_type_ids.unwrap_or_default(),
            services,
        }
    }
}

// ── List shape normalization ──

/// Pull the record list out of a response: either a bare array, or an object
/// carrying the array under `field` (OData puts it under `value`).
pub fn extract_list(payload: Value, field: Option<&str>) -> Result<Vec<Value>, AppError> {
    match (payload, field) {
        (Value::Array(items), _) => Ok(items),
        (Value::Object(mut map), Some(field)) => match map.remove(field) {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(AppError::Shape(format!("`{field}` is not an array"))),
            None => Err(AppError::Shape(format!("missing `{field}` list"))),
        },
        (other, _) => Err(AppError::Shape(format!(
            "expected a list, got {}",
            kind_of(&other)
        ))),
    }
}

/// Parse a response body and convert every record. Any record that fails to
/// decode fails the whole list.
pub fn decode_list<W, T>(body: &str, field: Option<&str>) -> Result<Vec<T>, AppError>
where
    W: DeserializeOwned,
    T: From<W>,
{
    let payload: Value = serde_json::from_str(body)?;
    extract_list(payload, field)?
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<W>(item)
                .map(T::from)
                .map_err(|e| AppError::Shape(format!("record {i}: {e}")))
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
