use std::sync::{Arc, Mutex};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::console::list::HeldList;
use crate::console::lock;
use crate::models::{BadgeColors, Booking, BookingStatus, RecordId};
use crate::services::api::ApiClient;
use crate::services::projection::{
    format_amount, format_clock, format_date, shift_month, BookingSortKey, MonthGrid, SortState,
};

/// One rendered row of the appointment table.
#[derive(Debug, Clone, Serialize)]
pub struct BookingRow {
    pub id: RecordId,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub amount: String,
    pub status_code: i32,
    pub status_label: &'static str,
    pub badge: BadgeColors,
    pub store_address: String,
}

impl From<&Booking> for BookingRow {
    fn from(b: &Booking) -> Self {
        BookingRow {
            id: b.id.clone(),
            date: format_date(b.service_date.as_deref()),
            start_time: format_clock(b.start_time.as_deref()),
            end_time: format_clock(b.predict_end_time.as_deref()),
            amount: format_amount(b.total_amount),
            status_code: b.status.code(),
            status_label: b.status.label(),
            badge: b.status.colors(),
            store_address: b
                .store_address
                .clone()
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingsView {
    pub loading: bool,
    pub error: Option<String>,
    pub sort: SortState<BookingSortKey>,
    pub count: usize,
    pub rows: Vec<BookingRow>,
}

struct BookingsState {
    bookings: HeldList<Booking>,
    sort: SortState<BookingSortKey>,
    cursor: (i32, u32),
}

/// Appointment table plus the artist's month calendar.
pub struct BookingsScreen {
    api: Arc<ApiClient>,
    status_filter: BookingStatus,
    state: Mutex<BookingsState>,
}

impl BookingsScreen {
    pub fn new(api: Arc<ApiClient>, status_filter: BookingStatus, today: NaiveDate) -> Self {
        Self {
            api,
            status_filter,
            state: Mutex::new(BookingsState {
                bookings: HeldList::new(),
                sort: SortState::default(),
                cursor: (today.year(), today.month()),
            }),
        }
    }

    pub async fn refresh(&self) {
        let ticket = lock(&self.state).bookings.begin_fetch();
        let result = self.api.fetch_bookings(self.status_filter).await;

        match &result {
            Ok(bookings) => tracing::info!(count = bookings.len(), "fetched bookings"),
            Err(e) => tracing::error!(error = %e, "error fetching bookings"),
        }

        if !lock(&self.state).bookings.finish_fetch(ticket, result) {
            tracing::debug!("discarded stale bookings response");
        }
    }

    pub fn request_sort(&self, key: BookingSortKey) {
        lock(&self.state).sort.request(key);
    }

    pub fn rows(&self) -> Vec<BookingRow> {
        let state = lock(&self.state);
        let mut bookings = state.bookings.items().to_vec();
        state.sort.apply(&mut bookings);
        bookings.iter().map(BookingRow::from).collect()
    }

    pub fn view(&self) -> BookingsView {
        let rows = self.rows();
        let state = lock(&self.state);
        BookingsView {
            loading: state.bookings.is_loading(),
            error: state.bookings.error().map(str::to_string),
            sort: state.sort,
            count: rows.len(),
            rows,
        }
    }

    pub fn shift_month(&self, delta: i32) {
        let mut state = lock(&self.state);
        let (year, month) = state.cursor;
        state.cursor = shift_month(year, month, delta);
    }

    pub fn month_grid(&self, today: NaiveDate) -> Option<MonthGrid> {
        let (year, month) = lock(&self.state).cursor;
        MonthGrid::new(year, month).map(|grid| grid.select(today))
    }
}
