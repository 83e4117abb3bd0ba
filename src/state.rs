use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::AppConfig;
use crate::console::{BookingsScreen, CatalogScreen, WaitlistScreen};
use crate::models::BookingStatus;
use crate::services::api::ApiClient;
use crate::services::notify::BroadcastNotifier;
use crate::services::waitlist_api::WaitlistClient;

const NOTICE_CAPACITY: usize = 64;

pub struct AppState {
    pub config: AppConfig,
    /// Artist calendar screen.
    pub bookings: BookingsScreen,
    pub waitlist: WaitlistScreen,
    pub catalog: CatalogScreen,
    pub notices: Arc<BroadcastNotifier>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self::with_today(config, chrono::Local::now().date_naive())
    }

    pub fn with_today(config: AppConfig, today: NaiveDate) -> Self {
        let api = Arc::new(ApiClient::new(
            config.api_base_url.clone(),
            config.placeholder_image_url.clone(),
        ));
        let waitlist_client = Arc::new(WaitlistClient::new(config.waitlist_base_url.clone()));
        let notices = Arc::new(BroadcastNotifier::new(NOTICE_CAPACITY));
        let status = BookingStatus::from(config.booking_status_filter);

        Self {
            bookings: BookingsScreen::new(api.clone(), status, today),
            waitlist: WaitlistScreen::new(
                waitlist_client,
                BookingsScreen::new(api.clone(), status, today),
                notices.clone(),
                today,
            ),
            catalog: CatalogScreen::new(api, notices.clone(), config.resync_delay),
            notices,
            config,
        }
    }

    /// Initial load of every screen.
    pub async fn refresh_all(&self) {
        tokio::join!(
            self.bookings.refresh(),
            self.waitlist.refresh(),
            self.catalog.refresh()
        );
    }
}
