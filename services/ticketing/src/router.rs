use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use tower::ServiceBuilder;

use loket_core::health::{healthz, readyz};
use loket_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    auth::{login, register},
    cart::{add_to_cart, checkout, list_cart, remove_from_cart, update_cart_line},
    event::{
        add_ticket_category, create_event, delete_event, get_event, list_events, update_event,
        verify_event,
    },
    ticket::{check_in, get_ticket, issue_tickets, list_tickets},
    transaction::list_transactions,
    user::{get_profile, list_users, update_profile, verify_user},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        // Users
        .route("/api/users/profile", get(get_profile))
        .route("/api/users/profile", put(update_profile))
        .route("/api/users", get(list_users))
        .route("/api/users/{id}/verify", post(verify_user))
        // Events
        .route("/api/events", get(list_events))
        .route("/api/events", post(create_event))
        .route("/api/events/{id}", get(get_event))
        .route("/api/events/{id}", put(update_event))
        .route("/api/events/{id}", delete(delete_event))
        .route("/api/events/{id}/verify", patch(verify_event))
        .route("/api/events/{id}/categories", post(add_ticket_category))
        // Cart
        .route("/api/cart", get(list_cart))
        .route("/api/cart", post(add_to_cart))
        .route("/api/cart", patch(update_cart_line))
        .route("/api/cart", delete(remove_from_cart))
        .route("/api/cart/checkout", post(checkout))
        // Tickets
        .route("/api/tickets", get(list_tickets))
        .route("/api/tickets", post(issue_tickets))
        .route("/api/tickets/{id}", get(get_ticket))
        .route("/api/tickets/{id}/checkin", patch(check_in))
        // Transactions
        .route("/api/transactions", get(list_transactions))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(trace_layer())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
