pub mod auth;
pub mod cart;
pub mod event;
pub mod ticket;
pub mod transaction;
pub mod user;
