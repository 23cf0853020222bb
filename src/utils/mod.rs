pub mod error;
pub mod filename;
pub mod password;
pub mod session;
