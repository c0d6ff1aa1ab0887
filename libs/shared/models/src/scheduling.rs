// libs/shared/models/src/scheduling.rs
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Minutes in a day; all times are minute-of-day integers in [0, 1440).
pub const MINUTES_PER_DAY: u16 = 1440;

/// Format a minute-of-day as "HH:MM" for API responses and logs.
pub fn format_minute(minute: u16) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

// ==============================================================================
// SCHEDULE MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
            chrono::Weekday::Sun => Weekday::Sun,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weekday::Mon => write!(f, "monday"),
            Weekday::Tue => write!(f, "tuesday"),
            Weekday::Wed => write!(f, "wednesday"),
            Weekday::Thu => write!(f, "thursday"),
            Weekday::Fri => write!(f, "friday"),
            Weekday::Sat => write!(f, "saturday"),
            Weekday::Sun => write!(f, "sunday"),
        }
    }
}

/// A doctor's recurring availability window for one weekday.
/// Invariant: start_minute < end_minute whenever is_available is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyAvailability {
    pub doctor_id: Uuid,
    pub weekday: Weekday,
    pub start_minute: u16,
    pub end_minute: u16,
    pub is_available: bool,
}

/// Half-open minute range [start, end) used for all overlap math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: u16,
    pub end: u16,
}

impl Interval {
    pub fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    pub fn from_start_duration(start: u16, duration_minutes: u16) -> Self {
        Self {
            start,
            end: start + duration_minutes,
        }
    }

    /// Half-open overlap test. Adjacent intervals do not overlap: a slot
    /// ending exactly when another begins is free.
    pub fn overlaps(&self, other: Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", format_minute(self.start), format_minute(self.end))
    }
}

// ==============================================================================
// BOOKING MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalStatus {
    Booked,
    CheckedIn,
    Completed,
    Cancelled,
    NoShow,
}

impl IntervalStatus {
    /// Whether an interval in this status still occupies its time range.
    /// Only cancellations and no-shows free the slot.
    pub fn blocks_slot(&self) -> bool {
        !matches!(self, IntervalStatus::Cancelled | IntervalStatus::NoShow)
    }
}

impl fmt::Display for IntervalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalStatus::Booked => write!(f, "booked"),
            IntervalStatus::CheckedIn => write!(f, "checked_in"),
            IntervalStatus::Completed => write!(f, "completed"),
            IntervalStatus::Cancelled => write!(f, "cancelled"),
            IntervalStatus::NoShow => write!(f, "no_show"),
        }
    }
}

/// A committed appointment in the booking ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedInterval {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub date: NaiveDate,
    pub start_minute: u16,
    pub duration_minutes: u16,
    pub status: IntervalStatus,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookedInterval {
    pub fn end_minute(&self) -> u16 {
        self.start_minute + self.duration_minutes
    }

    pub fn interval(&self) -> Interval {
        Interval::from_start_duration(self.start_minute, self.duration_minutes)
    }
}

/// A candidate bookable start time. Ephemeral, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub start_minute: u16,
    pub duration_minutes: u16,
}

impl CandidateSlot {
    pub fn interval(&self) -> Interval {
        Interval::from_start_duration(self.start_minute, self.duration_minutes)
    }

    pub fn start_label(&self) -> String {
        format_minute(self.start_minute)
    }
}

// ==============================================================================
// WAITLIST MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl fmt::Display for WaitlistPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitlistPriority::Low => write!(f, "low"),
            WaitlistPriority::Normal => write!(f, "normal"),
            WaitlistPriority::High => write!(f, "high"),
            WaitlistPriority::Urgent => write!(f, "urgent"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistStatus {
    Waiting,
    Offered,
    Booked,
    Expired,
    Cancelled,
}

impl fmt::Display for WaitlistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitlistStatus::Waiting => write!(f, "waiting"),
            WaitlistStatus::Offered => write!(f, "offered"),
            WaitlistStatus::Booked => write!(f, "booked"),
            WaitlistStatus::Expired => write!(f, "expired"),
            WaitlistStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A pending request for a freed slot. At most one Waiting entry may exist
/// per (patient_id, doctor_id) pair at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_minute: Option<u16>,
    pub priority: WaitlistPriority,
    pub status: WaitlistStatus,
    pub created_at: DateTime<Utc>,
    pub offered_at: Option<DateTime<Utc>>,
}

impl WaitlistEntry {
    /// Whether this entry's stated preferences accept the given freed
    /// interval on the given date. Unset preferences match anything.
    pub fn matches(&self, date: NaiveDate, freed: Interval) -> bool {
        if let Some(preferred) = self.preferred_date {
            if preferred != date {
                return false;
            }
        }
        if let Some(minute) = self.preferred_minute {
            if minute < freed.start || minute >= freed.end {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minute_formatting_is_zero_padded() {
        assert_eq!(format_minute(0), "00:00");
        assert_eq!(format_minute(570), "09:30");
        assert_eq!(format_minute(1439), "23:59");
    }

    #[test]
    fn weekday_from_date() {
        // 2025-06-02 is a Monday
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(Weekday::from_date(date), Weekday::Mon);
        assert_eq!(Weekday::from_date(date.succ_opt().unwrap()), Weekday::Tue);
    }

    #[test]
    fn cancelled_and_no_show_do_not_block() {
        assert!(IntervalStatus::Booked.blocks_slot());
        assert!(IntervalStatus::CheckedIn.blocks_slot());
        assert!(IntervalStatus::Completed.blocks_slot());
        assert!(!IntervalStatus::Cancelled.blocks_slot());
        assert!(!IntervalStatus::NoShow.blocks_slot());
    }

    #[test]
    fn priority_ordering() {
        assert!(WaitlistPriority::Urgent > WaitlistPriority::High);
        assert!(WaitlistPriority::High > WaitlistPriority::Normal);
        assert!(WaitlistPriority::Normal > WaitlistPriority::Low);
    }

    #[test]
    fn unset_preferences_match_any_interval() {
        let entry = WaitlistEntry {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            preferred_date: None,
            preferred_minute: None,
            priority: WaitlistPriority::Normal,
            status: WaitlistStatus::Waiting,
            created_at: Utc::now(),
            offered_at: None,
        };
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert!(entry.matches(date, Interval::new(540, 570)));
    }

    #[test]
    fn preferred_minute_must_fall_inside_freed_interval() {
        let entry = WaitlistEntry {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            preferred_date: None,
            preferred_minute: Some(570),
            priority: WaitlistPriority::Normal,
            status: WaitlistStatus::Waiting,
            created_at: Utc::now(),
            offered_at: None,
        };
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert!(entry.matches(date, Interval::new(540, 600)));
        // Interval end is exclusive
        assert!(!entry.matches(date, Interval::new(540, 570)));
        assert!(!entry.matches(date, Interval::new(600, 630)));
    }
}
