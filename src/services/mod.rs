pub mod api;
pub mod notify;
pub mod projection;
pub mod waitlist_api;
