use busway_core::{BookingRules, CoreError, CoreResult};
use chrono::{DateTime, Duration, Utc};

use crate::models::BookingStatus;

/// How close to departure a booking may still be cancelled.
///
/// Evaluated against an explicit `now` on every call; results are never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationPolicy {
    cutoff: Duration,
}

impl CancellationPolicy {
    pub const DEFAULT_CUTOFF_MINUTES: i64 = 120;

    pub fn new(cutoff: Duration) -> Self {
        Self { cutoff }
    }

    /// Rules are re-validated here since their fields are public.
    pub fn from_rules(rules: &BookingRules) -> CoreResult<Self> {
        rules.validate()?;
        let cutoff = Duration::try_minutes(rules.cancellation_cutoff_minutes).ok_or_else(|| {
            CoreError::InvalidRules(format!(
                "cancellation_cutoff_minutes out of range: {}",
                rules.cancellation_cutoff_minutes
            ))
        })?;
        Ok(Self::new(cutoff))
    }

    pub fn cutoff(&self) -> Duration {
        self.cutoff
    }

    /// Not already cancelled, departure still ahead, and strictly more than the cutoff left.
    pub fn allows(&self, status: BookingStatus, departure: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        status != BookingStatus::Cancelled && departure > now && departure - now > self.cutoff
    }
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self::new(Duration::minutes(Self::DEFAULT_CUTOFF_MINUTES))
    }
}

pub fn can_cancel(status: BookingStatus, departure: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    CancellationPolicy::default().allows(status, departure, now)
}

pub fn is_past_journey(departure: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    departure < now
}
