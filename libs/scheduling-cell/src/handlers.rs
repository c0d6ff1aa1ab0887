// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    BookAppointmentRequest, CancelAppointmentRequest, JoinWaitlistRequest, SchedulingError,
    SlotsQuery,
};
use crate::services::availability::AvailabilityService;
use crate::services::booking::BookingService;
use crate::services::waitlist::WaitlistService;
use crate::state::AppState;

// ==============================================================================
// AVAILABILITY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let step = query.step_minutes.unwrap_or(state.config.slot_step_minutes);
    let availability_service = AvailabilityService::new(&state);

    let day = availability_service
        .available_slots(query.doctor_id, query.date, step, query.duration_minutes)
        .await
        .map_err(|e| match e {
            SchedulingError::InvalidWindow(msg) => AppError::Internal(msg),
            SchedulingError::Validation(msg) => AppError::BadRequest(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    let slots: Vec<Value> = day
        .slots
        .iter()
        .map(|slot| {
            json!({
                "start": slot.start_label(),
                "start_minute": slot.start_minute,
                "duration_minutes": slot.duration_minutes,
            })
        })
        .collect();

    Ok(Json(json!({
        "doctor_id": day.doctor_id,
        "date": day.date,
        "slots": slots,
        "total": slots.len(),
        "reason": day.reason,
    })))
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service.book(request).await.map_err(|e| match e {
        SchedulingError::SlotConflict => {
            AppError::Conflict("Appointment slot conflicts with existing booking".to_string())
        }
        SchedulingError::OutsideAvailability(msg) => AppError::Unprocessable(msg),
        SchedulingError::Validation(msg) => AppError::BadRequest(msg),
        _ => AppError::Internal(e.to_string()),
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "appointment": appointment,
            "message": "Appointment booked successfully"
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .get_appointment(appointment_id)
        .await
        .map_err(|e| match e {
            SchedulingError::NotFound => AppError::NotFound("Appointment not found".to_string()),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let outcome = booking_service
        .cancel(appointment_id, request.reason)
        .await
        .map_err(|e| match e {
            SchedulingError::NotFound => AppError::NotFound("Appointment not found".to_string()),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "appointment": outcome.appointment,
        "offered_entry": outcome.offered_entry,
        "message": "Appointment cancelled successfully"
    })))
}

// ==============================================================================
// WAITLIST HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn join_waitlist(
    State(state): State<Arc<AppState>>,
    Json(request): Json<JoinWaitlistRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let waitlist_service = WaitlistService::new(&state);

    let entry = waitlist_service.join(request).await.map_err(|e| match e {
        SchedulingError::AlreadyWaiting => {
            AppError::Conflict("Patient is already waiting for this doctor".to_string())
        }
        SchedulingError::Validation(msg) => AppError::BadRequest(msg),
        _ => AppError::Internal(e.to_string()),
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "entry": entry,
            "message": "Added to waitlist"
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_doctor_waitlist(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let waitlist_service = WaitlistService::new(&state);

    let entries = waitlist_service
        .open_entries(doctor_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "entries": entries,
        "total": entries.len(),
    })))
}
