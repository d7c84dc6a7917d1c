//! HTTP Handlers

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use platform::mailer::Mailer;

use crate::application::config::BookingConfig;
use crate::application::{
    CreateAppointmentUseCase, InitiatePaymentUseCase, ListAppointmentsUseCase, PaymentCallback,
    ReconcilePaymentUseCase, UpdateAppointmentUseCase,
};
use crate::domain::gateway::PaymentGateway;
use crate::domain::repository::BookingStore;
use crate::error::BookingResult;
use crate::presentation::dto::{
    AppointmentResponse, AppointmentUpdatedResponse, CreateAppointmentRequest, PayRequest,
    PayResponse, PaymentCallbackQuery, UpdateAppointmentRequest,
};

/// Shared state for booking handlers
#[derive(Clone)]
pub struct BookingAppState<R, G, M>
where
    R: BookingStore + Clone + Sync + 'static,
    G: PaymentGateway + Clone + Sync + 'static,
    M: Mailer + Clone + Sync + 'static,
{
    pub repo: Arc<R>,
    pub gateway: Arc<G>,
    pub mailer: Arc<M>,
    pub config: Arc<BookingConfig>,
}

// ============================================================================
// Payments
// ============================================================================

/// POST /pay
pub async fn initiate_payment<R, G, M>(
    State(state): State<BookingAppState<R, G, M>>,
    Json(req): Json<PayRequest>,
) -> BookingResult<Json<PayResponse>>
where
    R: BookingStore + Clone + Sync + 'static,
    G: PaymentGateway + Clone + Sync + 'static,
    M: Mailer + Clone + Sync + 'static,
{
    let use_case = InitiatePaymentUseCase::new(
        state.repo.clone(),
        state.gateway.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(req.into()).await?;

    Ok(Json(PayResponse {
        message: "Payment initiated",
        link: output.payment_link,
        tx_ref: output.tx_ref,
    }))
}

/// GET /payment-success
///
/// Always answers with a 302 to the frontend; the outcome travels in the
/// query string of the target page. An unreadable query counts as missing
/// parameters.
pub async fn payment_success<R, G, M>(
    State(state): State<BookingAppState<R, G, M>>,
    query: Result<Query<PaymentCallbackQuery>, QueryRejection>,
) -> Response
where
    R: BookingStore + Clone + Sync + 'static,
    G: PaymentGateway + Clone + Sync + 'static,
    M: Mailer + Clone + Sync + 'static,
{
    let use_case = ReconcilePaymentUseCase::new(
        state.repo.clone(),
        state.gateway.clone(),
        state.mailer.clone(),
    );

    let callback = match query {
        Ok(Query(query)) => query.into(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable payment callback query");
            PaymentCallback::default()
        }
    };

    let outcome = use_case.execute(callback).await;
    let location = outcome.redirect_url(&state.config);

    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

// ============================================================================
// Appointments
// ============================================================================

/// POST /appointment
pub async fn create_appointment<R, G, M>(
    State(state): State<BookingAppState<R, G, M>>,
    Json(req): Json<CreateAppointmentRequest>,
) -> BookingResult<impl IntoResponse>
where
    R: BookingStore + Clone + Sync + 'static,
    G: PaymentGateway + Clone + Sync + 'static,
    M: Mailer + Clone + Sync + 'static,
{
    let view = CreateAppointmentUseCase::new(state.repo.clone())
        .execute(req.into())
        .await?;

    Ok((StatusCode::CREATED, Json(AppointmentResponse::from(view))))
}

/// GET /appointment/doctor/{id}
pub async fn doctor_appointments<R, G, M>(
    State(state): State<BookingAppState<R, G, M>>,
    Path(doctor_id): Path<String>,
) -> BookingResult<Json<Vec<AppointmentResponse>>>
where
    R: BookingStore + Clone + Sync + 'static,
    G: PaymentGateway + Clone + Sync + 'static,
    M: Mailer + Clone + Sync + 'static,
{
    let views = ListAppointmentsUseCase::new(state.repo.clone())
        .for_doctor(&doctor_id)
        .await?;

    Ok(Json(views.into_iter().map(AppointmentResponse::from).collect()))
}

/// GET /appointment/patient/{id}
pub async fn patient_appointments<R, G, M>(
    State(state): State<BookingAppState<R, G, M>>,
    Path(patient_id): Path<String>,
) -> BookingResult<Json<Vec<AppointmentResponse>>>
where
    R: BookingStore + Clone + Sync + 'static,
    G: PaymentGateway + Clone + Sync + 'static,
    M: Mailer + Clone + Sync + 'static,
{
    let views = ListAppointmentsUseCase::new(state.repo.clone())
        .for_patient(&patient_id)
        .await?;

    Ok(Json(views.into_iter().map(AppointmentResponse::from).collect()))
}

/// PATCH /appointment/{id}
pub async fn update_appointment<R, G, M>(
    State(state): State<BookingAppState<R, G, M>>,
    Path(appointment_id): Path<String>,
    Json(req): Json<UpdateAppointmentRequest>,
) -> BookingResult<Json<AppointmentUpdatedResponse>>
where
    R: BookingStore + Clone + Sync + 'static,
    G: PaymentGateway + Clone + Sync + 'static,
    M: Mailer + Clone + Sync + 'static,
{
    let appointment = UpdateAppointmentUseCase::new(state.repo.clone())
        .execute(&appointment_id, req.into())
        .await?;

    Ok(Json(AppointmentUpdatedResponse {
        message: "Appointment updated",
        appointment: AppointmentResponse::from(appointment),
    }))
}
