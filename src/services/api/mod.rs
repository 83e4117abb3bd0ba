pub mod form;
pub mod odata;
pub mod wire;

use reqwest::Method;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::{
    Booking, BookingStatus, Category, DesignDraft, NailDesign, RecordId, Service, ServiceDraft,
};

use form::FormPayload;
use odata::ODataQuery;
use wire::{BookingRecord, DesignRecord, ServiceRecord};

const BOOKING_FIELDS: &[&str] = &[
    "id",
    "serviceDate",
    "startTime",
    "predictEndTime",
    "totalAmount",
    "status",
    "lastModifiedAt",
    "customerSelectedId",
    "artistStoreId",
];

const SERVICE_FIELDS: &[&str] = &["Id", "Name", "AverageDuration", "Price", "Description", "ImageUrl"];

const DESIGN_FIELDS: &[&str] = &["id", "name", "description", "trendscore"];

const DESIGN_EXPAND: &str = "medias($select=numerialOrder,imageUrl,mediatype),preferences,nailDesigns($select=id,imageUrl,nailposition,isleft;$expand=nailDesignServices($select=id,serviceId;$expand=service($select=id,name,imageUrl,price,isAdditional,averageDuration)))";

/// Client for the booking platform's OData read endpoints and multipart write
/// endpoints.
pub struct ApiClient {
    base_url: String,
    placeholder_image_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: String, placeholder_image_url: String) -> Self {
        Self {
            base_url,
            placeholder_image_url,
            client: reqwest::Client::new(),
        }
    }

    // ── Reads ──

    pub async fn fetch_bookings(&self, status: BookingStatus) -> Result<Vec<Booking>, AppError> {
        let query = ODataQuery::new()
            .filter(format!("status eq {}", status.code()))
            .select(BOOKING_FIELDS);
        let body = self.get("/odata/booking", &query).await?;
        wire::decode_list::<BookingRecord, _>(&body, Some("value"))
    }

    pub async fn fetch_services(&self) -> Result<Vec<Service>, AppError> {
        let query = ODataQuery::new()
            .select(SERVICE_FIELDS)
            .expand("CategoryServices");
        let body = self.get("/odata/Service", &query).await?;
        wire::decode_list::<ServiceRecord, _>(&body, Some("value"))
    }

    pub async fn fetch_designs(&self) -> Result<Vec<NailDesign>, AppError> {
        let query = ODataQuery::new().select(DESIGN_FIELDS).expand(DESIGN_EXPAND);
        let body = self.get("/odata/design", &query).await?;
        wire::decode_list::<DesignRecord, _>(&body, Some("value"))
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, AppError> {
        let body = self
            .get("/api/Adjective/Categories", &ODataQuery::new())
            .await?;
        wire::decode_list::<Category, _>(&body, None)
    }

    // ── Writes ──

    pub async fn create_service(&self, draft: &ServiceDraft) -> Result<Option<Value>, AppError> {
        let form = form::service_create(draft, &self.placeholder_image_url);
        self.send_form(Method::POST, "/api/Service", None, form).await
    }

    pub async fn update_service(
        &self,
        id: &RecordId,
        draft: &ServiceDraft,
    ) -> Result<Option<Value>, AppError> {
        let form = form::service_update(draft, &self.placeholder_image_url);
        self.send_form(Method::PUT, "/api/Service", Some(id), form)
            .await
    }

    pub async fn delete_service(&self, id: &RecordId) -> Result<(), AppError> {
        self.delete("/api/Service", id).await
    }

    pub async fn create_design(&self, draft: &DesignDraft) -> Result<Option<Value>, AppError> {
        let form = form::design_create(draft);
        self.send_form(Method::POST, "/api/Design", None, form).await
    }

    pub async fn update_design(
        &self,
        id: &RecordId,
        draft: &DesignDraft,
    ) -> Result<Option<Value>, AppError> {
        let form = form::design_update(id, draft);
        self.send_form(Method::PUT, "/api/Design", Some(id), form)
            .await
    }

    pub async fn delete_design(&self, id: &RecordId) -> Result<(), AppError> {
        self.delete("/api/Design", id).await
    }

    // ── Transport ──

    async fn get(&self, path: &str, query: &ODataQuery) -> Result<String, AppError> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(&query.pairs())
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            tracing::warn!(endpoint = path, status = status.as_u16(), "read request failed");
            return Err(AppError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn send_form(
        &self,
        method: Method,
        path: &str,
        id: Option<&RecordId>,
        form: FormPayload,
    ) -> Result<Option<Value>, AppError> {
        tracing::debug!(endpoint = path, fields = ?form.keys(), "sending multipart form");

        let mut req = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(id) = id {
            req = req.query(&[("id", id.as_str())]);
        }

        let resp = req.multipart(form.into_multipart()?).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(AppError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Success bodies may be empty or plain text.
        if body.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&body) {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                tracing::debug!(endpoint = path, "write response is not JSON");
                Ok(None)
            }
        }
    }

    async fn delete(&self, path: &str, id: &RecordId) -> Result<(), AppError> {
        let resp = self
            .client
            .delete(format!("{}{}", self.base_url, path))
            .query(&[("id", id.as_str())])
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
