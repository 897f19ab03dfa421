mod auth_test;
mod cart_test;
mod checkout_test;
mod event_test;
