use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str =
    "https://inbsapi-d9hhfmhsapgabrcz.southeastasia-01.azurewebsites.net";
pub const DEFAULT_WAITLIST_BASE_URL: &str = "https://6772b9a7ee76b92dd49333cb.mockapi.io";
pub const DEFAULT_PLACEHOLDER_IMAGE_URL: &str = "https://firebasestorage.googleapis.com/v0/b/fir-realtime-database-49344.appspot.com/o/images%2Fnoimage.jpg?alt=media&token=8ffe560a-6aeb-4a34-8ebc-16693bb10a56";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub api_base_url: String,
    pub waitlist_base_url: String,
    pub placeholder_image_url: String,
    /// Bearer token for the console API. Empty disables the check.
    pub console_token: String,
    pub resync_delay: Duration,
    pub booking_status_filter: i32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            waitlist_base_url: env::var("WAITLIST_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_WAITLIST_BASE_URL.to_string()),
            placeholder_image_url: env::var("PLACEHOLDER_IMAGE_URL")
                .unwrap_or_else(|_| DEFAULT_PLACEHOLDER_IMAGE_URL.to_string()),
            console_token: env::var("CONSOLE_TOKEN").unwrap_or_default(),
            resync_delay: Duration::from_millis(
                env::var("RESYNC_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(500),
            ),
            booking_status_filter: env::var("BOOKING_STATUS_FILTER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
        }
    }
}
