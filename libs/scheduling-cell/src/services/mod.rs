pub mod availability;
pub mod booking;
pub mod conflict;
pub mod slots;
pub mod waitlist;
