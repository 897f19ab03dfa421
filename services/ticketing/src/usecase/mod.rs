pub mod auth;
pub mod cart;
pub mod checkout;
pub mod event;
mod issuance;
pub mod retry;
pub mod ticket;
pub mod transaction;
pub mod user;
