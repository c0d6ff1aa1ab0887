// libs/scheduling-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

pub fn scheduling_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Availability
        .route("/slots", get(handlers::get_available_slots))
        // Appointments
        .route("/appointments", post(handlers::book_appointment))
        .route("/appointments/{appointment_id}", get(handlers::get_appointment))
        .route(
            "/appointments/{appointment_id}/cancel",
            post(handlers::cancel_appointment),
        )
        // Waitlist
        .route("/waitlist", post(handlers::join_waitlist))
        .route("/waitlist/doctors/{doctor_id}", get(handlers::get_doctor_waitlist))
        .with_state(state)
}
