//! Subscription windows.

use chrono::{DateTime, Days, SubsecRound, Utc};

use crate::Result;
use crate::error::{Error, InvalidInputError};
use crate::resource::UserPatch;
use crate::types::ResourceId;

/// A subscription validity window, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SubscriptionWindow {
    /// Window of `duration_days` calendar days beginning at `start`.
    ///
    /// `start` is truncated to millisecond precision so the stored values
    /// read back unchanged.
    pub fn starting_at(start: DateTime<Utc>, duration_days: u32) -> Result<Self> {
        let start = start.trunc_subsecs(3);
        let end = start
            .checked_add_days(Days::new(u64::from(duration_days)))
            .ok_or_else(|| {
                Error::from(InvalidInputError::Other {
                    message: format!(
                        "subscription of {} days from {} is out of range",
                        duration_days, start
                    ),
                })
            })?;
        Ok(Self { start, end })
    }

    /// Window beginning now.
    pub fn starting_now(duration_days: u32) -> Result<Self> {
        Self::starting_at(Utc::now(), duration_days)
    }

    /// The user update assigning `subscription_id` over this window.
    pub fn assignment(&self, subscription_id: ResourceId) -> UserPatch {
        UserPatch {
            subscription_id: Some(subscription_id),
            subscription_start: Some(self.start),
            subscription_end: Some(self.end),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::timestamp;
    use chrono::{Duration, TimeZone};

    #[test]
    fn thirty_calendar_days() {
        let start = Utc.with_ymd_and_hms(2026, 10, 18, 23, 59, 59).unwrap();
        let window = SubscriptionWindow::starting_at(start, 30).unwrap();
        assert_eq!(window.end - window.start, Duration::days(30));
        assert_eq!(timestamp::format(&window.end), "2026-11-17T23:59:59.000Z");
    }

    #[test]
    fn truncates_to_millis() {
        let start = timestamp::parse("2026-10-18T09:30:00.123456789Z").unwrap();
        let window = SubscriptionWindow::starting_at(start, 1).unwrap();
        assert_eq!(timestamp::format(&window.start), "2026-10-18T09:30:00.123Z");
        assert_eq!(window.start.timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn zero_days_is_empty_window() {
        let window = SubscriptionWindow::starting_now(0).unwrap();
        assert_eq!(window.start, window.end);
    }

    #[test]
    fn assignment_writes_three_fields() {
        let window = SubscriptionWindow::starting_now(30).unwrap();
        let patch = window.assignment(ResourceId::new("p1").unwrap());
        let row = serde_json::to_value(&patch).unwrap();
        let mut keys: Vec<_> = row.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            ["subscription_end", "subscription_id", "subscription_start"]
        );
    }
}
