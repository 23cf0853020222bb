pub mod admin;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod inquiry;

pub use admin::{admin_page, create_listing, delete_listing, list_inquiries};
pub use auth::{login, login_page, logout};
pub use catalog::{detail, index};
pub use health::health_check;
pub use inquiry::submit_inquiry;
