use std::fmt::Display;

use reqwest::multipart::{Form, Part};

use crate::errors::AppError;
use crate::models::{DesignDraft, RecordId, ServiceDraft};

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        file_name: String,
        content_type: Option<String>,
        data: Vec<u8>,
    },
}

/// Ordered multipart payload. Repeated or nested fields use the indexed-key
/// convention the backend's form binder expects: `Field[0]`, `Field[0].Sub`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    parts: Vec<(String, FormValue)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, key: impl Into<String>, value: impl Display) {
        self.parts
            .push((key.into(), FormValue::Text(value.to_string())));
    }

    pub fn indexed<T: Display>(&mut self, field: &str, values: &[T]) {
        for (i, value) in values.iter().enumerate() {
            self.text(format!("{field}[{i}]"), value);
        }
    }

    pub fn file(
        &mut self,
        key: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<String>,
        data: Vec<u8>,
    ) {
        self.parts.push((
            key.into(),
            FormValue::File {
                file_name: file_name.into(),
                content_type,
                data,
            },
        ));
    }

    pub fn parts(&self) -> &[(String, FormValue)] {
        &self.parts
    }

    pub fn keys(&self) -> Vec<&str> {
        self.parts.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// First text value under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.parts.iter().find_map(|(k, v)| match v {
            FormValue::Text(text) if k == key => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn into_multipart(self) -> Result<Form, AppError> {
        let mut form = Form::new();
        for (key, value) in self.parts {
            form = match value {
                FormValue::Text(text) => form.text(key, text),
                FormValue::File {
                    file_name,
                    content_type,
                    data,
                } => {
                    let mut part = Part::bytes(data).file_name(file_name);
                    if let Some(mime) = content_type {
                        part = part.mime_str(&mime)?;
                    }
                    form.part(key, part)
                }
            };
        }
        Ok(form)
    }
}

fn service_fields(form: &mut FormPayload, draft: &ServiceDraft, placeholder_image_url: &str) {
    form.text("Name", &draft.name);
    form.text("Description", &draft.description);
    form.text("Price", draft.price);

    let image_url = if draft.image_url.trim().is_empty() {
        placeholder_image_url
    } else {
        draft.image_url.as_str()
    };
    form.text("ImageUrl", image_url);
    form.text("IsAdditional", draft.is_additional);
    form.text("AverageDuration", draft.duration);

    if !draft.category_ids.is_empty() {
        form.indexed("CategoryIds", &draft.category_ids);
    } else if let Some(category) = draft.category.as_ref().filter(|c| !c.as_str().is_empty()) {
        form.text("CategoryIds[0]", category);
    }
}

pub fn service_create(draft: &ServiceDraft, placeholder_image_url: &str) -> FormPayload {
    let mut form = FormPayload::new();
    service_fields(&mut form, draft, placeholder_image_url);

    for (i, design) in draft.designs.iter().enumerate() {
        if let Some(id) = &design.design_id {
            form.text(format!("Designs[{i}].designId"), id);
        }
        if let Some(extra) = design.extra_price.filter(|p| *p != 0.0) {
            form.text(format!("Designs[{i}].extraPrice"), extra);
        }
    }
    form
}

pub fn service_update(draft: &ServiceDraft, placeholder_image_url: &str) -> FormPayload {
    let mut form = FormPayload::new();
    service_fields(&mut form, draft, placeholder_image_url);

    // Sending an empty design collection trips a failing transaction on the server.
    for (i, design) in draft.designs.iter().enumerate() {
        if let Some(id) = &design.design_id {
            form.text(format!("Designs[{i}].designId"), id);
            form.text(
                format!("Designs[{i}].extraPrice"),
                design.extra_price.unwrap_or(0.0),
            );
        }
    }
    form
}

pub fn design_create(draft: &DesignDraft) -> FormPayload {
    let mut form = FormPayload::new();
    form.text("Name", &draft.name);
    form.text("Description", &draft.description);
    form.text("TrendScore", draft.trend_score);

    form.indexed("ColorIds", &draft.color_ids);
    form.indexed("OccasionIds", &draft.occasion_ids);
    form.indexed("SkintoneIds", &draft.skintone_ids);
    form.indexed("PaintTypeIds", &draft.paint_type_ids);

    for (i, media) in draft.media_files.iter().enumerate() {
        form.file(
            format!("MediaFiles[{i}]"),
            media.file_name.clone(),
            media.content_type.clone(),
            media.data.clone(),
        );
    }

    form.indexed("NailDesignIds", &draft.nail_design_ids);

    let linked: Vec<(&RecordId, f64)> = draft
        .services
        .iter()
        .filter_map(|s| s.service_id.as_ref().map(|id| (id, s.extra_price)))
        .collect();
    if !linked.is_empty() {
        for (i, (id, extra)) in linked.into_iter().enumerate() {
            form.text(format!("Services[{i}].ServiceID"), id);
            form.text(format!("Services[{i}].ExtraPrice"), extra);
        }
    } else if let Some(id) = selected_service(draft) {
        form.text("Services[0].ServiceID", id);
        form.text("Services[0].ExtraPrice", draft.extra_price);
    }
    form
}

pub fn design_update(id: &RecordId, draft: &DesignDraft) -> FormPayload {
    let mut form = FormPayload::new();
    form.text("ID", id);
    form.text("Name", &draft.name);
    form.text("Description", &draft.description);
    form.text("TrendScore", draft.trend_score.trunc() as i64);

    if let Some(service_id) = selected_service(draft) {
        form.text("Services[0].ServiceID", service_id);
        form.text("Services[0].ExtraPrice", draft.extra_price);
    }
    form
}

fn selected_service(draft: &DesignDraft) -> Option<&RecordId> {
    draft
        .service_id
        .as_ref()
        .filter(|id| !id.as_str().is_empty())
}
