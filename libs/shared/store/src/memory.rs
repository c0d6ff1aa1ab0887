//! In-process reference implementations of the store traits. These stand in
//! for the clinic's relational store; the ledger keeps the conflict check
//! and the insert inside one mutex guard so the at-most-one-occupant
//! invariant holds under concurrent bookings.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use shared_models::scheduling::{
    BookedInterval, Interval, IntervalStatus, WaitlistEntry, WaitlistPriority, WaitlistStatus,
    Weekday, WeeklyAvailability,
};

use crate::error::StoreError;
use crate::traits::{BookingLedger, ScheduleStore, WaitlistStore};

// ==============================================================================
// SCHEDULE STORE
// ==============================================================================

#[derive(Default)]
pub struct MemorySchedule {
    rows: RwLock<HashMap<(Uuid, Weekday), WeeklyAvailability>>,
}

impl MemorySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace a weekly row. Schedule administration is an external
    /// concern; this is the provisioning hook the wiring and tests use.
    pub async fn upsert(&self, row: WeeklyAvailability) {
        self.rows
            .write()
            .await
            .insert((row.doctor_id, row.weekday), row);
    }
}

#[async_trait]
impl ScheduleStore for MemorySchedule {
    async fn weekly_availability(
        &self,
        doctor_id: Uuid,
        weekday: Weekday,
    ) -> Result<Option<WeeklyAvailability>, StoreError> {
        Ok(self.rows.read().await.get(&(doctor_id, weekday)).cloned())
    }
}

// ==============================================================================
// BOOKING LEDGER
// ==============================================================================

#[derive(Default)]
pub struct MemoryLedger {
    // Single lock over the whole ledger: create_interval's check-then-insert
    // must be one critical section.
    intervals: Mutex<HashMap<Uuid, BookedInterval>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingLedger for MemoryLedger {
    async fn booked_intervals(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        only_blocking: bool,
    ) -> Result<Vec<BookedInterval>, StoreError> {
        let intervals = self.intervals.lock().await;
        let mut rows: Vec<BookedInterval> = intervals
            .values()
            .filter(|i| i.doctor_id == doctor_id && i.date == date)
            .filter(|i| !only_blocking || i.status.blocks_slot())
            .cloned()
            .collect();
        rows.sort_by_key(|i| i.start_minute);
        Ok(rows)
    }

    async fn get_interval(&self, id: Uuid) -> Result<Option<BookedInterval>, StoreError> {
        Ok(self.intervals.lock().await.get(&id).cloned())
    }

    async fn create_interval(
        &self,
        doctor_id: Uuid,
        patient_id: Uuid,
        date: NaiveDate,
        start_minute: u16,
        duration_minutes: u16,
    ) -> Result<BookedInterval, StoreError> {
        let mut intervals = self.intervals.lock().await;

        let requested = Interval::from_start_duration(start_minute, duration_minutes);
        let conflict = intervals.values().any(|existing| {
            existing.doctor_id == doctor_id
                && existing.date == date
                && existing.status.blocks_slot()
                && existing.interval().overlaps(requested)
        });
        if conflict {
            return Err(StoreError::Conflict(format!(
                "doctor {} already booked within {} on {}",
                doctor_id, requested, date
            )));
        }

        let now = Utc::now();
        let interval = BookedInterval {
            id: Uuid::new_v4(),
            doctor_id,
            patient_id,
            date,
            start_minute,
            duration_minutes,
            status: IntervalStatus::Booked,
            cancel_reason: None,
            created_at: now,
            updated_at: now,
        };
        intervals.insert(interval.id, interval.clone());
        debug!("Ledger committed interval {} at {}", interval.id, requested);

        Ok(interval)
    }

    async fn update_interval_status(
        &self,
        id: Uuid,
        status: IntervalStatus,
        cancel_reason: Option<String>,
    ) -> Result<BookedInterval, StoreError> {
        let mut intervals = self.intervals.lock().await;
        let interval = intervals
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("interval {}", id)))?;

        interval.status = status;
        if cancel_reason.is_some() {
            interval.cancel_reason = cancel_reason;
        }
        interval.updated_at = Utc::now();

        Ok(interval.clone())
    }
}

// ==============================================================================
// WAITLIST STORE
// ==============================================================================

#[derive(Default)]
pub struct MemoryWaitlist {
    // Vec keeps creation order, which the ranker relies on for FIFO ties.
    entries: Mutex<Vec<WaitlistEntry>>,
}

impl MemoryWaitlist {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WaitlistStore for MemoryWaitlist {
    async fn open_entries(&self, doctor_id: Uuid) -> Result<Vec<WaitlistEntry>, StoreError> {
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .filter(|e| {
                e.doctor_id == doctor_id
                    && matches!(e.status, WaitlistStatus::Waiting | WaitlistStatus::Offered)
            })
            .cloned()
            .collect())
    }

    async fn create_entry(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        preferred_date: Option<NaiveDate>,
        preferred_minute: Option<u16>,
        priority: WaitlistPriority,
    ) -> Result<WaitlistEntry, StoreError> {
        let mut entries = self.entries.lock().await;

        let already_waiting = entries.iter().any(|e| {
            e.patient_id == patient_id
                && e.doctor_id == doctor_id
                && e.status == WaitlistStatus::Waiting
        });
        if already_waiting {
            return Err(StoreError::Conflict(format!(
                "patient {} is already waiting for doctor {}",
                patient_id, doctor_id
            )));
        }

        let entry = WaitlistEntry {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            preferred_date,
            preferred_minute,
            priority,
            status: WaitlistStatus::Waiting,
            created_at: Utc::now(),
            offered_at: None,
        };
        entries.push(entry.clone());

        Ok(entry)
    }

    async fn update_entry(
        &self,
        id: Uuid,
        status: WaitlistStatus,
        offered_at: Option<DateTime<Utc>>,
    ) -> Result<WaitlistEntry, StoreError> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("waitlist entry {}", id)))?;

        entry.status = status;
        if offered_at.is_some() {
            entry.offered_at = offered_at;
        }

        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[tokio::test]
    async fn ledger_rejects_overlapping_insert() {
        let ledger = MemoryLedger::new();
        let doctor = Uuid::new_v4();

        ledger
            .create_interval(doctor, Uuid::new_v4(), monday(), 600, 30)
            .await
            .unwrap();

        let second = ledger
            .create_interval(doctor, Uuid::new_v4(), monday(), 615, 30)
            .await;
        assert_matches!(second, Err(StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn ledger_allows_adjacent_intervals() {
        let ledger = MemoryLedger::new();
        let doctor = Uuid::new_v4();

        ledger
            .create_interval(doctor, Uuid::new_v4(), monday(), 600, 30)
            .await
            .unwrap();
        let adjacent = ledger
            .create_interval(doctor, Uuid::new_v4(), monday(), 630, 30)
            .await;
        assert!(adjacent.is_ok());
    }

    #[tokio::test]
    async fn cancelled_interval_no_longer_blocks() {
        let ledger = MemoryLedger::new();
        let doctor = Uuid::new_v4();

        let first = ledger
            .create_interval(doctor, Uuid::new_v4(), monday(), 600, 30)
            .await
            .unwrap();
        ledger
            .update_interval_status(first.id, IntervalStatus::Cancelled, Some("sick".into()))
            .await
            .unwrap();

        let rebooked = ledger
            .create_interval(doctor, Uuid::new_v4(), monday(), 600, 30)
            .await;
        assert!(rebooked.is_ok());

        let blocking = ledger
            .booked_intervals(doctor, monday(), true)
            .await
            .unwrap();
        assert_eq!(blocking.len(), 1);
    }

    #[tokio::test]
    async fn waitlist_enforces_single_waiting_entry_per_pair() {
        let waitlist = MemoryWaitlist::new();
        let patient = Uuid::new_v4();
        let doctor = Uuid::new_v4();

        waitlist
            .create_entry(patient, doctor, None, None, WaitlistPriority::Normal)
            .await
            .unwrap();
        let duplicate = waitlist
            .create_entry(patient, doctor, None, None, WaitlistPriority::High)
            .await;
        assert_matches!(duplicate, Err(StoreError::Conflict(_)));

        // Same patient may wait for a different doctor.
        let other = waitlist
            .create_entry(patient, Uuid::new_v4(), None, None, WaitlistPriority::Normal)
            .await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn waitlist_entry_can_wait_again_after_expiry() {
        let waitlist = MemoryWaitlist::new();
        let patient = Uuid::new_v4();
        let doctor = Uuid::new_v4();

        let entry = waitlist
            .create_entry(patient, doctor, None, None, WaitlistPriority::Normal)
            .await
            .unwrap();
        waitlist
            .update_entry(entry.id, WaitlistStatus::Expired, None)
            .await
            .unwrap();

        let again = waitlist
            .create_entry(patient, doctor, None, None, WaitlistPriority::Normal)
            .await;
        assert!(again.is_ok());
    }
}
