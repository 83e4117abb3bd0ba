use serde::{Deserialize, Serialize};

use super::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: RecordId,
    pub service_date: Option<String>,
    pub start_time: Option<String>,
    pub predict_end_time: Option<String>,
    pub total_amount: f64,
    pub status: BookingStatus,
    pub last_modified_at: Option<String>,
    pub customer_selected_id: Option<RecordId>,
    pub artist_store_id: Option<RecordId>,
    pub store_address: Option<String>,
}

/// Booking lifecycle code as sent by the API. Display-only in the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum BookingStatus {
    Canceled,
    Waiting,
    Confirmed,
    Serving,
    Completed,
    Unknown(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeColors {
    pub background: &'static str,
    pub text: &'static str,
}

impl BookingStatus {
    pub fn code(&self) -> i32 {
        match self {
            BookingStatus::Canceled => -1,
            BookingStatus::Waiting => 0,
            BookingStatus::Confirmed => 1,
            BookingStatus::Serving => 2,
            BookingStatus::Completed => 3,
            BookingStatus::Unknown(code) => *code,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Canceled => "Canceled",
            BookingStatus::Waiting => "Waiting",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Serving => "Serving",
            BookingStatus::Completed => "Completed",
            BookingStatus::Unknown(_) => "Unknown",
        }
    }

    pub fn colors(&self) -> BadgeColors {
        let (background, text) = match self {
            BookingStatus::Canceled => ("rgba(255, 99, 132, 0.2)", "#e63946"),
            BookingStatus::Waiting => ("rgba(255, 205, 86, 0.2)", "#ff9500"),
            BookingStatus::Confirmed => ("rgba(54, 162, 235, 0.2)", "#0077b6"),
            BookingStatus::Serving => ("rgba(153, 102, 255, 0.2)", "#7209b7"),
            BookingStatus::Completed => ("rgba(75, 192, 192, 0.2)", "#2a9d8f"),
            BookingStatus::Unknown(_) => ("rgba(201, 203, 207, 0.2)", "#666666"),
        };
        BadgeColors { background, text }
    }
}

impl From<i32> for BookingStatus {
    fn from(code: i32) -> Self {
        match code {
            -1 => BookingStatus::Canceled,
            0 => BookingStatus::Waiting,
            1 => BookingStatus::Confirmed,
            2 => BookingStatus::Serving,
            3 => BookingStatus::Completed,
            other => BookingStatus::Unknown(other),
        }
    }
}

impl From<BookingStatus> for i32 {
    fn from(status: BookingStatus) -> Self {
        status.code()
    }
}
