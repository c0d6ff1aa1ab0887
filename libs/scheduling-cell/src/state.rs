use std::sync::Arc;

use shared_config::AppConfig;
use shared_store::{BookingLedger, MemoryLedger, MemorySchedule, MemoryWaitlist, ScheduleStore, WaitlistStore};

/// Shared request state: configuration plus handles to the collaborating
/// stores behind their trait seams.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub schedule: Arc<dyn ScheduleStore>,
    pub ledger: Arc<dyn BookingLedger>,
    pub waitlist: Arc<dyn WaitlistStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        schedule: Arc<dyn ScheduleStore>,
        ledger: Arc<dyn BookingLedger>,
        waitlist: Arc<dyn WaitlistStore>,
    ) -> Self {
        Self {
            config,
            schedule,
            ledger,
            waitlist,
        }
    }

    /// State wired to the in-process reference stores.
    pub fn with_memory_stores(config: AppConfig) -> Self {
        Self::new(
            config,
            Arc::new(MemorySchedule::new()),
            Arc::new(MemoryLedger::new()),
            Arc::new(MemoryWaitlist::new()),
        )
    }
}
