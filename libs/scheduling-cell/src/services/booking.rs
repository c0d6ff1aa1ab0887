use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_store::{BookingLedger, ScheduleStore, StoreError};

use shared_models::scheduling::{
    BookedInterval, Interval, IntervalStatus, Weekday, MINUTES_PER_DAY,
};

use crate::models::{BookAppointmentRequest, CancelOutcome, SchedulingError};
use crate::services::waitlist::WaitlistService;
use crate::state::AppState;

pub struct BookingService {
    schedule: Arc<dyn ScheduleStore>,
    ledger: Arc<dyn BookingLedger>,
    waitlist: WaitlistService,
}

impl BookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            schedule: state.schedule.clone(),
            ledger: state.ledger.clone(),
            waitlist: WaitlistService::new(state),
        }
    }

    /// Validate and commit a booking. The conflict re-check runs inside the
    /// ledger's critical section at commit time, never against a stale
    /// availability snapshot.
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<BookedInterval, SchedulingError> {
        if request.duration_minutes == 0 {
            return Err(SchedulingError::Validation(
                "duration_minutes must be positive".to_string(),
            ));
        }
        let end_minute = request.start_minute as u32 + request.duration_minutes as u32;
        if end_minute > MINUTES_PER_DAY as u32 {
            return Err(SchedulingError::Validation(
                "appointment must end within the day".to_string(),
            ));
        }

        self.check_within_availability(&request).await?;

        debug!(
            "Committing booking for doctor {} on {} at {}",
            request.doctor_id,
            request.date,
            Interval::from_start_duration(request.start_minute, request.duration_minutes)
        );

        let created = match self.create_on_ledger(&request).await {
            Ok(interval) => interval,
            Err(StoreError::Conflict(msg)) => {
                debug!("Booking lost the slot race: {}", msg);
                return Err(SchedulingError::SlotConflict);
            }
            Err(StoreError::Serialization(msg)) => {
                // One internal retry with re-validation; a second failure
                // is indistinguishable from losing the race.
                warn!("Ledger serialization failure, retrying once: {}", msg);
                self.check_within_availability(&request).await?;
                match self.create_on_ledger(&request).await {
                    Ok(interval) => interval,
                    Err(StoreError::Conflict(_)) | Err(StoreError::Serialization(_)) => {
                        return Err(SchedulingError::SlotConflict)
                    }
                    Err(other) => return Err(SchedulingError::Ledger(other.to_string())),
                }
            }
            Err(other) => return Err(SchedulingError::Ledger(other.to_string())),
        };

        info!(
            "Booked appointment {} for patient {} with doctor {} on {}",
            created.id, created.patient_id, created.doctor_id, created.date
        );
        Ok(created)
    }

    /// Cancel an appointment. Cancelling an already-cancelled interval is a
    /// no-op returning the stored state. A successful cancellation frees
    /// the interval and offers it to the best-matching waitlist entry.
    pub async fn cancel(
        &self,
        appointment_id: Uuid,
        reason: String,
    ) -> Result<CancelOutcome, SchedulingError> {
        let existing = self
            .ledger
            .get_interval(appointment_id)
            .await
            .map_err(|e| SchedulingError::Ledger(e.to_string()))?
            .ok_or(SchedulingError::NotFound)?;

        if existing.status == IntervalStatus::Cancelled {
            debug!("Appointment {} is already cancelled", appointment_id);
            return Ok(CancelOutcome {
                appointment: existing,
                offered_entry: None,
            });
        }

        let cancelled = self
            .ledger
            .update_interval_status(appointment_id, IntervalStatus::Cancelled, Some(reason))
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => SchedulingError::NotFound,
                other => SchedulingError::Ledger(other.to_string()),
            })?;

        info!(
            "Cancelled appointment {} for doctor {} on {}, interval {} freed",
            cancelled.id,
            cancelled.doctor_id,
            cancelled.date,
            cancelled.interval()
        );

        // The cancellation is committed at this point; a failed offer pass
        // leaves the waitlist untouched and the slot simply stays open.
        let offered_entry = match self
            .waitlist
            .next_candidate(cancelled.doctor_id, cancelled.date, cancelled.interval())
            .await
        {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Waitlist offer pass failed after cancellation: {}", e);
                None
            }
        };

        Ok(CancelOutcome {
            appointment: cancelled,
            offered_entry,
        })
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<BookedInterval, SchedulingError> {
        self.ledger
            .get_interval(appointment_id)
            .await
            .map_err(|e| SchedulingError::Ledger(e.to_string()))?
            .ok_or(SchedulingError::NotFound)
    }

    async fn check_within_availability(
        &self,
        request: &BookAppointmentRequest,
    ) -> Result<(), SchedulingError> {
        let weekday = Weekday::from_date(request.date);
        let row = self
            .schedule
            .weekly_availability(request.doctor_id, weekday)
            .await
            .map_err(|e| SchedulingError::Ledger(e.to_string()))?;

        let window = match row {
            Some(ref row) if row.is_available => Interval::new(row.start_minute, row.end_minute),
            _ => {
                return Err(SchedulingError::OutsideAvailability(format!(
                    "doctor is not available on {}",
                    weekday
                )))
            }
        };

        let requested =
            Interval::from_start_duration(request.start_minute, request.duration_minutes);
        if requested.start < window.start || requested.end > window.end {
            return Err(SchedulingError::OutsideAvailability(format!(
                "requested {} falls outside the {} window {}",
                requested, weekday, window
            )));
        }

        Ok(())
    }

    async fn create_on_ledger(
        &self,
        request: &BookAppointmentRequest,
    ) -> Result<BookedInterval, StoreError> {
        self.ledger
            .create_interval(
                request.doctor_id,
                request.patient_id,
                request.date,
                request.start_minute,
                request.duration_minutes,
            )
            .await
    }
}
