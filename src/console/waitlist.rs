use std::sync::{Arc, Mutex};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::console::bookings::{BookingsScreen, BookingsView};
use crate::console::list::HeldList;
use crate::console::lock;
use crate::errors::AppError;
use crate::models::{RecordId, WaitlistEntry};
use crate::services::notify::{NoticeLevel, Notifier};
use crate::services::projection::{
    appointment_days, filter_waitlist, format_waitlist_price, unique_stores, MonthGrid, SortState,
    StoreFilter, WaitlistSortKey,
};
use crate::services::waitlist_api::WaitlistClient;

/// Start/end time being edited for one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEdit {
    pub id: RecordId,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaitlistCard {
    pub id: RecordId,
    pub name: String,
    pub time: String,
    pub service: String,
    pub service_image: String,
    pub store: String,
    pub price: String,
    pub editing: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaitlistView {
    pub selected_date: NaiveDate,
    pub selected_store: StoreFilter,
    pub stores: Vec<String>,
    pub count: usize,
    pub cards: Vec<WaitlistCard>,
    pub calendar: Option<MonthGrid>,
    pub time_edit: Option<TimeEdit>,
    pub sort: SortState<WaitlistSortKey>,
    pub loading: bool,
    pub error: Option<String>,
    pub bookings: BookingsView,
}

struct WaitlistState {
    entries: HeldList<WaitlistEntry>,
    selected_date: NaiveDate,
    store: StoreFilter,
    time_edit: Option<TimeEdit>,
    sort: SortState<WaitlistSortKey>,
}

/// Waitlist calendar: entries from the waitlist backend filtered to one day
/// and store, with the confirmed-bookings table as a sub-view.
pub struct WaitlistScreen {
    client: Arc<WaitlistClient>,
    bookings: BookingsScreen,
    notifier: Arc<dyn Notifier>,
    state: Mutex<WaitlistState>,
}

impl WaitlistScreen {
    pub fn new(
        client: Arc<WaitlistClient>,
        bookings: BookingsScreen,
        notifier: Arc<dyn Notifier>,
        today: NaiveDate,
    ) -> Self {
        Self {
            client,
            bookings,
            notifier,
            state: Mutex::new(WaitlistState {
                entries: HeldList::new(),
                selected_date: today,
                store: StoreFilter::All,
                time_edit: None,
                sort: SortState::default(),
            }),
        }
    }

    /// Fetch waitlist entries and bookings concurrently.
    pub async fn refresh(&self) {
        tokio::join!(self.refresh_entries(), self.bookings.refresh());
    }

    pub async fn refresh_entries(&self) {
        let ticket = lock(&self.state).entries.begin_fetch();
        let result = self.client.fetch_entries().await;

        match &result {
            Ok(entries) => tracing::info!(count = entries.len(), "fetched waitlist"),
            Err(e) => tracing::error!(error = %e, "error fetching waitlist"),
        }

        lock(&self.state).entries.finish_fetch(ticket, result);
    }

    pub fn select_date(&self, date: NaiveDate) {
        lock(&self.state).selected_date = date;
    }

    pub fn select_store(&self, store: StoreFilter) {
        lock(&self.state).store = store;
    }

    pub fn request_sort(&self, key: WaitlistSortKey) {
        lock(&self.state).sort.request(key);
    }

    /// Open the time editor pre-filled with the entry's current times.
    pub fn begin_time_edit(&self, id: &RecordId) -> Result<TimeEdit, AppError> {
        let mut state = lock(&self.state);
        let entry = state
            .entries
            .find(id)
            .ok_or_else(|| AppError::NotFound(format!("waitlist entry {id}")))?;
        let edit = TimeEdit {
            id: entry.id.clone(),
            start_time: entry.start_time.clone(),
            end_time: entry.end_time.clone(),
        };
        state.time_edit = Some(edit.clone());
        Ok(edit)
    }

    pub fn cancel_time_edit(&self) {
        lock(&self.state).time_edit = None;
    }

    /// Write the new times, then re-fetch the waitlist.
    pub async fn save_time(&self, id: &RecordId, start_time: &str, end_time: &str) {
        lock(&self.state).entries.begin_write();
        let result = self.client.update_time(id, start_time, end_time).await;

        match result {
            Ok(()) => {
                {
                    let mut state = lock(&self.state);
                    state.entries.finish_write(None);
                    if state.time_edit.as_ref().is_some_and(|e| &e.id == id) {
                        state.time_edit = None;
                    }
                }
                tracing::info!(id = %id, start_time, end_time, "updated waitlist time");
                self.refresh_entries().await;
            }
            Err(e) => {
                tracing::error!(error = %e, id = %id, "error updating time");
                lock(&self.state).entries.finish_write(Some(e.to_string()));
                self.notifier.alert(
                    NoticeLevel::Error,
                    &format!("Error updating time: {}", e.operator_message()),
                );
            }
        }
    }

    pub fn view(&self) -> WaitlistView {
        let bookings = self.bookings.view();
        let state = lock(&self.state);
        let entries = state.entries.items();

        let mut visible = filter_waitlist(entries, state.selected_date, &state.store);
        state.sort.apply(&mut visible);

        let editing_id = state.time_edit.as_ref().map(|e| &e.id);
        let cards: Vec<WaitlistCard> = visible
            .into_iter()
            .map(|e| WaitlistCard {
                editing: editing_id == Some(&e.id),
                time: format!("{} - {}", e.start_time, e.end_time),
                price: format_waitlist_price(e.price),
                id: e.id,
                name: e.name,
                service: e.service,
                service_image: e.service_image,
                store: e.store,
            })
            .collect();

        let date = state.selected_date;
        let calendar = MonthGrid::new(date.year(), date.month()).map(|grid| {
            grid.mark(&appointment_days(entries, date.year(), date.month()))
                .select(date)
        });

        WaitlistView {
            selected_date: date,
            selected_store: state.store.clone(),
            stores: unique_stores(entries),
            count: cards.len(),
            cards,
            calendar,
            time_edit: state.time_edit.clone(),
            sort: state.sort,
            loading: state.entries.is_loading(),
            error: state.entries.error().map(str::to_string),
            bookings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use crate::services::api::ApiClient;
    use crate::services::notify::BroadcastNotifier;

    fn entry(id: &str, date: &str, store: &str, start: &str) -> WaitlistEntry {
        WaitlistEntry {
            id: RecordId::from(id),
            name: format!("Customer {id}"),
            date: date.to_string(),
            start_time: start.to_string(),
            end_time: "18:00".to_string(),
            service: "Gel".to_string(),
            service_image: String::new(),
            store: store.to_string(),
            price: 120000.0,
        }
    }

    fn screen(today: NaiveDate) -> WaitlistScreen {
        let unreachable = "http://127.0.0.1:9".to_string();
        let api = Arc::new(ApiClient::new(unreachable.clone(), String::new()));
        let bookings = BookingsScreen::new(api, BookingStatus::Confirmed, today);
        WaitlistScreen::new(
            Arc::new(WaitlistClient::new(unreachable)),
            bookings,
            Arc::new(BroadcastNotifier::new(8)),
            today,
        )
    }

    fn seed(screen: &WaitlistScreen, entries: Vec<WaitlistEntry>) {
        let mut state = lock(&screen.state);
        let ticket = state.entries.begin_fetch();
        state.entries.finish_fetch(ticket, Ok(entries));
    }

    #[test]
    fn test_view_filters_by_day_and_store() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let screen = screen(day);
        seed(
            &screen,
            vec![
                entry("1", "2025-01-02T08:00:00.000Z", "S1", "10:00"),
                entry("2", "2025-01-02T09:00:00.000Z", "S2", "09:00"),
                entry("3", "2025-01-20T09:00:00.000Z", "S1", "09:00"),
            ],
        );

        let view = screen.view();
        assert_eq!(view.count, 2);
        assert_eq!(view.stores, vec!["all", "S1", "S2"]);
        let marked: Vec<u32> = view
            .calendar
            .as_ref()
            .unwrap()
            .cells
            .iter()
            .filter(|c| c.marked)
            .map(|c| c.day)
            .collect();
        assert_eq!(marked, vec![2, 20]);

        screen.select_store(StoreFilter::from("S1"));
        let view = screen.view();
        assert_eq!(view.count, 1);
        assert_eq!(view.cards[0].id.as_str(), "1");
        assert_eq!(view.cards[0].time, "10:00 - 18:00");
        assert_eq!(view.cards[0].price, "120000đ");
    }

    #[test]
    fn test_sort_by_start_time() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let screen = screen(day);
        seed(
            &screen,
            vec![
                entry("late", "2025-01-02", "S1", "15:00"),
                entry("early", "2025-01-02", "S1", "08:30"),
            ],
        );
        screen.request_sort(WaitlistSortKey::StartTime);
        let ids: Vec<String> = screen
            .view()
            .cards
            .iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn test_time_edit_lifecycle() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let screen = screen(day);
        seed(&screen, vec![entry("1", "2025-01-02", "S1", "09:00")]);

        let edit = screen.begin_time_edit(&RecordId::from("1")).unwrap();
        assert_eq!(edit.start_time, "09:00");
        assert!(screen.view().cards[0].editing);

        screen.cancel_time_edit();
        assert!(screen.view().time_edit.is_none());

        let missing = screen.begin_time_edit(&RecordId::from("nope"));
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
