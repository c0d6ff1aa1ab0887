pub mod error;
pub mod memory;
pub mod traits;

pub use error::StoreError;
pub use memory::{MemoryLedger, MemorySchedule, MemoryWaitlist};
pub use traits::{BookingLedger, ScheduleStore, WaitlistStore};
