use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use shared_store::{StoreError, WaitlistStore};

use shared_models::scheduling::{Interval, WaitlistEntry, WaitlistPriority, WaitlistStatus};

use crate::models::{JoinWaitlistRequest, SchedulingError};
use crate::state::AppState;

pub struct WaitlistService {
    store: Arc<dyn WaitlistStore>,
    offer_expiry: Duration,
}

impl WaitlistService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.waitlist.clone(),
            offer_expiry: Duration::hours(state.config.offer_expiry_hours),
        }
    }

    pub async fn join(&self, request: JoinWaitlistRequest) -> Result<WaitlistEntry, SchedulingError> {
        if let Some(minute) = request.preferred_minute {
            if minute >= shared_models::scheduling::MINUTES_PER_DAY {
                return Err(SchedulingError::Validation(
                    "preferred_minute must be below 1440".to_string(),
                ));
            }
        }

        let entry = self
            .store
            .create_entry(
                request.patient_id,
                request.doctor_id,
                request.preferred_date,
                request.preferred_minute,
                request.priority.unwrap_or(WaitlistPriority::Normal),
            )
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => SchedulingError::AlreadyWaiting,
                other => SchedulingError::Ledger(other.to_string()),
            })?;

        info!(
            "Patient {} joined waitlist for doctor {} with priority {}",
            entry.patient_id, entry.doctor_id, entry.priority
        );
        Ok(entry)
    }

    pub async fn open_entries(&self, doctor_id: Uuid) -> Result<Vec<WaitlistEntry>, SchedulingError> {
        self.store
            .open_entries(doctor_id)
            .await
            .map_err(|e| SchedulingError::Ledger(e.to_string()))
    }

    /// Select the next waiting patient for a freed interval and mark the
    /// entry Offered. Ordering is priority descending, then creation time
    /// ascending; entries with equal keys keep their insertion order.
    /// Lapsed offers are expired lazily before selection; no sweep task.
    pub async fn next_candidate(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        freed: Interval,
    ) -> Result<Option<WaitlistEntry>, SchedulingError> {
        let now = Utc::now();
        let entries = self
            .store
            .open_entries(doctor_id)
            .await
            .map_err(|e| SchedulingError::Ledger(e.to_string()))?;

        for entry in entries.iter().filter(|e| e.status == WaitlistStatus::Offered) {
            if let Some(offered_at) = entry.offered_at {
                if offered_at + self.offer_expiry <= now {
                    debug!("Expiring lapsed waitlist offer {}", entry.id);
                    self.store
                        .update_entry(entry.id, WaitlistStatus::Expired, None)
                        .await
                        .map_err(|e| SchedulingError::Ledger(e.to_string()))?;
                }
            }
        }

        let mut candidates: Vec<&WaitlistEntry> = entries
            .iter()
            .filter(|e| e.status == WaitlistStatus::Waiting)
            .filter(|e| e.matches(date, freed))
            .collect();
        candidates.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(a.created_at.cmp(&b.created_at))
        });

        let Some(chosen) = candidates.first() else {
            debug!(
                "No waitlist candidate for doctor {} and freed interval {}",
                doctor_id, freed
            );
            return Ok(None);
        };

        let offered = self
            .store
            .update_entry(chosen.id, WaitlistStatus::Offered, Some(now))
            .await
            .map_err(|e| SchedulingError::Ledger(e.to_string()))?;

        info!(
            "Offered freed interval {} on {} to patient {} (priority {})",
            freed, date, offered.patient_id, offered.priority
        );
        Ok(Some(offered))
    }
}
