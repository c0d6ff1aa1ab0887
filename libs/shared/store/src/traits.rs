use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use shared_models::scheduling::{
    BookedInterval, IntervalStatus, WaitlistEntry, WaitlistPriority, WaitlistStatus, Weekday,
    WeeklyAvailability,
};

use crate::error::StoreError;

/// Read interface for doctor weekly schedules. Schedule rows are managed by
/// an external schedule-administration collaborator; the scheduling core
/// never writes them.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn weekly_availability(
        &self,
        doctor_id: Uuid,
        weekday: Weekday,
    ) -> Result<Option<WeeklyAvailability>, StoreError>;
}

/// The authoritative store of committed appointment intervals.
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// All intervals for a doctor on a date, in ascending start order.
    /// With `only_blocking` set, cancelled and no-show intervals are
    /// excluded.
    async fn booked_intervals(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        only_blocking: bool,
    ) -> Result<Vec<BookedInterval>, StoreError>;

    async fn get_interval(&self, id: Uuid) -> Result<Option<BookedInterval>, StoreError>;

    /// Atomically re-checks for conflicts against the current ledger state
    /// and inserts the interval. The check and the insert MUST execute as a
    /// single critical section (serializable transaction or row lock keyed
    /// on doctor_id + date in a database-backed implementation), otherwise
    /// two concurrent bookings for the same freed slot can both succeed.
    ///
    /// Returns `StoreError::Conflict` when the requested range overlaps an
    /// interval whose status still blocks the slot, and may return
    /// `StoreError::Serialization` when the backing transaction must be
    /// retried.
    async fn create_interval(
        &self,
        doctor_id: Uuid,
        patient_id: Uuid,
        date: NaiveDate,
        start_minute: u16,
        duration_minutes: u16,
    ) -> Result<BookedInterval, StoreError>;

    async fn update_interval_status(
        &self,
        id: Uuid,
        status: IntervalStatus,
        cancel_reason: Option<String>,
    ) -> Result<BookedInterval, StoreError>;
}

/// Store of pending waitlist requests.
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Open entries (waiting or offered) for a doctor, in creation order.
    async fn open_entries(&self, doctor_id: Uuid) -> Result<Vec<WaitlistEntry>, StoreError>;

    /// Creates a Waiting entry. Uniqueness of one Waiting entry per
    /// (patient_id, doctor_id) pair is enforced inside the same critical
    /// section as the insert; violations return `StoreError::Conflict`.
    async fn create_entry(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        preferred_date: Option<NaiveDate>,
        preferred_minute: Option<u16>,
        priority: WaitlistPriority,
    ) -> Result<WaitlistEntry, StoreError>;

    async fn update_entry(
        &self,
        id: Uuid,
        status: WaitlistStatus,
        offered_at: Option<DateTime<Utc>>,
    ) -> Result<WaitlistEntry, StoreError>;
}
