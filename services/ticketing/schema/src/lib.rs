//! sea-orm entities for the ticketing database.

pub mod cart_lines;
pub mod events;
pub mod ticket_categories;
pub mod tickets;
pub mod transaction_records;
pub mod users;
