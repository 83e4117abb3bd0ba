use serde::{Deserialize, Serialize};

use super::{NailDesign, RecordId, Service};

/// Editable fields of a service, as held by the catalog form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDraft {
    pub name: String,
    pub price: f64,
    /// Single category picked in the form; used when `category_ids` is empty.
    pub category: Option<RecordId>,
    pub category_ids: Vec<RecordId>,
    pub duration: i64,
    pub description: String,
    pub image_url: String,
    pub is_additional: bool,
    pub designs: Vec<DesignLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignLink {
    pub design_id: Option<RecordId>,
    pub extra_price: Option<f64>,
}

/// Editable fields of a nail design, as held by the catalog form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignDraft {
    pub name: String,
    pub description: String,
    pub trend_score: f64,
    pub color_ids: Vec<RecordId>,
    pub occasion_ids: Vec<RecordId>,
    pub skintone_ids: Vec<RecordId>,
    pub paint_type_ids: Vec<RecordId>,
    pub media_files: Vec<MediaFile>,
    pub nail_design_ids: Vec<RecordId>,
    pub services: Vec<DesignServiceDraft>,
    /// Single service picked in the form; used when `services` is empty.
    pub service_id: Option<RecordId>,
    pub extra_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignServiceDraft {
    pub service_id: Option<RecordId>,
    pub extra_price: f64,
}

/// Uploaded media attached to a new design. Content travels base64-encoded
/// through the console API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: Option<String>,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.trim())
            .map_err(serde::de::Error::custom)
    }
}

impl From<&Service> for ServiceDraft {
    fn from(service: &Service) -> Self {
        Self {
            name: service.name.clone(),
            price: service.price,
            category: service.category.clone(),
            category_ids: service.category_ids.clone(),
            duration: service.duration,
            description: service.description.clone(),
            image_url: service.image_url.clone(),
            is_additional: service.is_additional,
            designs: Vec::new(),
        }
    }
}

impl From<&NailDesign> for DesignDraft {
    fn from(design: &NailDesign) -> Self {
        Self {
            name: design.name.clone(),
            description: design.description.clone(),
            trend_score: design.trend_score,
            color_ids: design.color_ids.clone(),
            occasion_ids: design.occasion_ids.clone(),
            skintone_ids: design.skintone_ids.clone(),
            paint_type_ids: design.paint_type_ids.clone(),
            // File inputs cannot be repopulated from a fetched record.
            media_files: Vec::new(),
            nail_design_ids: Vec::new(),
            services: Vec::new(),
            service_id: design.service_id.clone(),
            extra_price: design.extra_price,
        }
    }
}
