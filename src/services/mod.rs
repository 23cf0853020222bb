pub mod auth;
pub mod exchange;
pub mod inquiry;
pub mod inventory;
pub mod upload;

pub use auth::AuthService;
pub use exchange::ExchangeRateService;
pub use inquiry::InquiryService;
pub use inventory::InventoryService;
pub use upload::UploadService;
