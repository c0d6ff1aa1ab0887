use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub slot_step_minutes: u16,
    pub offer_expiry_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            slot_step_minutes: env::var("SLOT_STEP_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| {
                    warn!("SLOT_STEP_MINUTES not set or invalid, using 30");
                    30
                }),
            offer_expiry_hours: env::var("OFFER_EXPIRY_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| {
                    warn!("OFFER_EXPIRY_HOURS not set or invalid, using 24");
                    24
                }),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            slot_step_minutes: 30,
            offer_expiry_hours: 24,
        }
    }
}
