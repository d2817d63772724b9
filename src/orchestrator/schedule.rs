//! Schedule validation - orchestration layer
//!
//! Checked once, before the browser is touched.

use chrono::{Duration, NaiveDateTime};

use crate::error::PublishError;
use crate::models::PublishItem;

/// Minutes between the default start and now, and between two items.
pub const DEFAULT_INTERVAL_MINS: i64 = 5;

/// Every item must be scheduled strictly after `now`.
///
/// Fails fast with every offending item listed; nothing is skipped.
///
/// # Parameters
/// - `items`: the whole queue
/// - `now`: reference time; an item exactly at `now` is rejected
pub fn validate_schedule(items: &[PublishItem], now: NaiveDateTime) -> Result<(), PublishError> {
    let offending: Vec<String> = items
        .iter()
        .filter(|item| item.scheduled_at <= now)
        .map(|item| format!("{} ({})", item.label, item.scheduled_at.format("%Y-%m-%d %H:%M")))
        .collect();

    if offending.is_empty() {
        Ok(())
    } else {
        Err(PublishError::ScheduleInPast { offending })
    }
}

/// First slot of a schedule built without explicit times.
pub fn default_start(now: NaiveDateTime) -> NaiveDateTime {
    now + Duration::minutes(DEFAULT_INTERVAL_MINS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 20)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn future_items_pass() {
        let items = vec![PublishItem::new("a.txt", at(10, 0)), PublishItem::new("b.txt", at(10, 5))];
        assert!(validate_schedule(&items, at(9, 59)).is_ok());
    }

    #[test]
    fn equal_time_is_rejected() {
        let items = vec![PublishItem::new("a.txt", at(10, 0))];
        assert!(validate_schedule(&items, at(10, 0)).is_err());
    }

    #[test]
    fn every_past_item_is_listed() {
        let items = vec![
            PublishItem::new("a.txt", at(8, 0)),
            PublishItem::new("b.txt", at(12, 0)),
            PublishItem::new("c.txt", at(9, 0)),
        ];
        let PublishError::ScheduleInPast { offending } =
            validate_schedule(&items, at(9, 30)).unwrap_err()
        else {
            panic!("expected ScheduleInPast");
        };
        assert_eq!(
            offending,
            vec!["a.txt (2026-10-20 08:00)", "c.txt (2026-10-20 09:00)"]
        );
    }

    #[test]
    fn empty_queue_is_valid() {
        assert!(validate_schedule(&[], at(9, 0)).is_ok());
    }

    #[test]
    fn default_start_is_five_minutes_out() {
        assert_eq!(default_start(at(9, 0)), at(9, 5));
    }
}
