use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use shared_store::{BookingLedger, ScheduleStore};

use shared_models::scheduling::{Interval, Weekday, MINUTES_PER_DAY};

use crate::models::{DayAvailability, SchedulingError};
use crate::services::{conflict, slots};
use crate::state::AppState;

pub struct AvailabilityService {
    schedule: Arc<dyn ScheduleStore>,
    ledger: Arc<dyn BookingLedger>,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            schedule: state.schedule.clone(),
            ledger: state.ledger.clone(),
        }
    }

    /// Compute the free slots for a doctor on a date: discretize the
    /// weekly window, then drop every candidate overlapping a committed
    /// interval that still occupies its time.
    pub async fn available_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        step_minutes: u16,
        requested_duration: Option<u16>,
    ) -> Result<DayAvailability, SchedulingError> {
        if step_minutes > MINUTES_PER_DAY {
            return Err(SchedulingError::Validation(
                "step_minutes must not exceed a day".to_string(),
            ));
        }
        if let Some(duration) = requested_duration {
            if duration == 0 || duration > MINUTES_PER_DAY {
                return Err(SchedulingError::Validation(
                    "duration_minutes must be between 1 and 1440".to_string(),
                ));
            }
        }

        let weekday = Weekday::from_date(date);
        debug!(
            "Computing availability for doctor {} on {} ({})",
            doctor_id, date, weekday
        );

        let row = self
            .schedule
            .weekly_availability(doctor_id, weekday)
            .await
            .map_err(|e| SchedulingError::Ledger(e.to_string()))?;

        let window = match row {
            Some(ref row) if row.is_available => Interval::new(row.start_minute, row.end_minute),
            _ => {
                // A closed day is an empty answer, not an error. Unknown
                // doctors are a boundary validation concern, not ours.
                debug!("Doctor {} has no availability on {}", doctor_id, weekday);
                return Ok(DayAvailability {
                    doctor_id,
                    date,
                    slots: vec![],
                    reason: Some("doctor not available this day".to_string()),
                });
            }
        };

        let candidates = slots::generate_slots(window, step_minutes)?;
        let duration = requested_duration.unwrap_or(step_minutes);

        let booked = self
            .ledger
            .booked_intervals(doctor_id, date, true)
            .await
            .map_err(|e| SchedulingError::Ledger(e.to_string()))?;

        let free: Vec<_> = candidates
            .into_iter()
            .map(|mut slot| {
                slot.duration_minutes = duration;
                slot
            })
            .filter(|slot| slot.interval().end <= window.end)
            .filter(|slot| !conflict::is_blocked(slot.interval(), &booked))
            .collect();

        debug!(
            "Doctor {} on {}: {} free slots against {} booked intervals",
            doctor_id,
            date,
            free.len(),
            booked.len()
        );

        Ok(DayAvailability {
            doctor_id,
            date,
            slots: free,
            reason: None,
        })
    }
}
