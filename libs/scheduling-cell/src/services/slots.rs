//! Discretizes a doctor's availability window into candidate start times.

use shared_models::scheduling::{CandidateSlot, Interval};

use crate::models::SchedulingError;

/// Generate candidate slots at `window.start, window.start + step, ...`,
/// strictly below `window.end`. Each candidate carries the step as its
/// duration; fitting a different requested duration against the window end
/// is the caller's concern.
pub fn generate_slots(
    window: Interval,
    step_minutes: u16,
) -> Result<Vec<CandidateSlot>, SchedulingError> {
    if window.start >= window.end {
        return Err(SchedulingError::InvalidWindow(format!(
            "window start {} is not before end {}",
            window.start, window.end
        )));
    }
    if step_minutes == 0 {
        return Err(SchedulingError::InvalidWindow(
            "step must be at least one minute".to_string(),
        ));
    }

    Ok((window.start..window.end)
        .step_by(step_minutes as usize)
        .map(|start_minute| CandidateSlot {
            start_minute,
            duration_minutes: step_minutes,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn nine_to_five_at_thirty_minutes_yields_sixteen_slots() {
        let slots = generate_slots(Interval::new(540, 1020), 30).unwrap();
        assert_eq!(slots.len(), 16);
        assert_eq!(slots.first().unwrap().start_minute, 540);
        assert_eq!(slots.last().unwrap().start_minute, 990);
    }

    #[test]
    fn every_start_lies_within_the_window() {
        let window = Interval::new(500, 731);
        let slots = generate_slots(window, 45).unwrap();
        assert!(!slots.is_empty());
        for slot in &slots {
            assert!(slot.start_minute >= window.start);
            assert!(slot.start_minute < window.end);
        }
    }

    #[test]
    fn sequence_is_ascending_and_evenly_stepped() {
        let slots = generate_slots(Interval::new(0, 120), 20).unwrap();
        for pair in slots.windows(2) {
            assert_eq!(pair[1].start_minute - pair[0].start_minute, 20);
        }
    }

    #[test]
    fn step_larger_than_window_yields_single_slot() {
        let slots = generate_slots(Interval::new(540, 600), 90).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start_minute, 540);
    }

    #[test]
    fn inverted_window_is_rejected() {
        assert_matches!(
            generate_slots(Interval::new(600, 540), 30),
            Err(SchedulingError::InvalidWindow(_))
        );
        assert_matches!(
            generate_slots(Interval::new(600, 600), 30),
            Err(SchedulingError::InvalidWindow(_))
        );
    }

    #[test]
    fn zero_step_is_rejected() {
        assert_matches!(
            generate_slots(Interval::new(540, 1020), 0),
            Err(SchedulingError::InvalidWindow(_))
        );
    }
}
