// libs/scheduling-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::scheduling::{
    BookedInterval, CandidateSlot, WaitlistEntry, WaitlistPriority,
};

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SlotsQuery {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    /// Requested appointment duration; defaults to the slot step.
    pub duration_minutes: Option<u16>,
    /// Slot granularity; defaults to the configured step.
    pub step_minutes: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub date: NaiveDate,
    pub start_minute: u16,
    pub duration_minutes: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinWaitlistRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_minute: Option<u16>,
    pub priority: Option<WaitlistPriority>,
}

/// Answer to "what slots are free for doctor D on date X". An unavailable
/// day is an empty slot list with a reason, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct DayAvailability {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<CandidateSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Result of a cancellation: the freed interval plus the waitlist entry
/// the slot was offered to, if any matched.
#[derive(Debug, Clone, Serialize)]
pub struct CancelOutcome {
    pub appointment: BookedInterval,
    pub offered_entry: Option<WaitlistEntry>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulingError {
    #[error("Invalid availability window: {0}")]
    InvalidWindow(String),

    #[error("Requested slot conflicts with an existing booking")]
    SlotConflict,

    #[error("Requested time is outside the doctor's availability: {0}")]
    OutsideAvailability(String),

    #[error("Appointment not found")]
    NotFound,

    #[error("Patient already has a waiting entry for this doctor")]
    AlreadyWaiting,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Ledger error: {0}")]
    Ledger(String),
}
