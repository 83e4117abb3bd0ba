pub mod booking;
pub mod category;
pub mod design;
pub mod draft;
pub mod id;
pub mod service;
pub mod waitlist;

pub use booking::{BadgeColors, Booking, BookingStatus};
pub use category::Category;
pub use design::{DesignServiceLink, NailDesign};
pub use draft::{DesignDraft, DesignLink, DesignServiceDraft, MediaFile, ServiceDraft};
pub use id::RecordId;
pub use service::Service;
pub use waitlist::WaitlistEntry;
