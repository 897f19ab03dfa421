pub mod inventory;
pub mod repository;
pub mod ticket_code;
pub mod types;
