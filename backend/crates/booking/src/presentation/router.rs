//! Booking Router

use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;

use platform::mailer::Mailer;

use crate::application::config::BookingConfig;
use crate::domain::gateway::PaymentGateway;
use crate::domain::repository::BookingStore;
use crate::presentation::handlers::{self, BookingAppState};

/// Create the booking router for any store, gateway and mailer
pub fn booking_router<R, G, M>(repo: R, gateway: G, mailer: M, config: BookingConfig) -> Router
where
    R: BookingStore + Clone + Sync + 'static,
    G: PaymentGateway + Clone + Sync + 'static,
    M: Mailer + Clone + Sync + 'static,
{
    let state = BookingAppState {
        repo: Arc::new(repo),
        gateway: Arc::new(gateway),
        mailer: Arc::new(mailer),
        config: Arc::new(config),
    };

    Router::new()
        .route("/pay", post(handlers::initiate_payment::<R, G, M>))
        .route("/payment-success", get(handlers::payment_success::<R, G, M>))
        .route("/appointment", post(handlers::create_appointment::<R, G, M>))
        .route(
            "/appointment/doctor/{id}",
            get(handlers::doctor_appointments::<R, G, M>),
        )
        .route(
            "/appointment/patient/{id}",
            get(handlers::patient_appointments::<R, G, M>),
        )
        .route(
            "/appointment/{id}",
            patch(handlers::update_appointment::<R, G, M>),
        )
        .with_state(state)
}
