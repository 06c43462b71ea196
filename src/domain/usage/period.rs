//! Billing-period boundaries in the provider's reference timezone

use chrono::{DateTime, Datelike, TimeZone, Utc};
use chrono_tz::Tz;

use crate::domain::DomainError;

/// The provider bills in US Pacific time. Period boundaries and daily
/// free-quota resets follow this timezone, never the host's local zone.
pub const BILLING_TIMEZONE: Tz = chrono_tz::America::Los_Angeles;

/// First instant of the current calendar month in the billing timezone,
/// expressed back in UTC for querying.
pub fn current_period_start(now: DateTime<Utc>) -> Result<DateTime<Utc>, DomainError> {
    let local = now.with_timezone(&BILLING_TIMEZONE);
    let month_start = local
        .date_naive()
        .with_day(1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| DomainError::internal("failed to construct billing month start"))?;

    let start = BILLING_TIMEZONE
        .from_local_datetime(&month_start)
        .earliest()
        .ok_or_else(|| {
            DomainError::internal("billing month start is not representable in the billing timezone")
        })?;

    Ok(start.with_timezone(&Utc))
}

/// Calendar day of month a sample falls on, in the billing timezone.
/// Daily free quotas reset on these boundaries.
pub fn billing_day_of_month(epoch_seconds: i64) -> Result<u32, DomainError> {
    let instant = DateTime::<Utc>::from_timestamp(epoch_seconds, 0).ok_or_else(|| {
        DomainError::internal(format!("sample timestamp {} is out of range", epoch_seconds))
    })?;

    Ok(instant.with_timezone(&BILLING_TIMEZONE).day())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_start_summer() {
        // June 1st midnight PDT is 07:00 UTC.
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let start = current_period_start(now).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 1, 7, 0, 0).unwrap());
    }

    #[test]
    fn test_period_start_winter() {
        // January 1st midnight PST is 08:00 UTC.
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let start = current_period_start(now).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_period_start_uses_billing_timezone_month() {
        // Early on July 1st UTC it is still June 30th in Los Angeles, so the
        // period still starts on June 1st.
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 3, 0, 0).unwrap();
        let start = current_period_start(now).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 1, 7, 0, 0).unwrap());
    }

    #[test]
    fn test_billing_day_matches_local_calendar() {
        let noon_utc = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        assert_eq!(billing_day_of_month(noon_utc.timestamp()).unwrap(), 10);
    }

    #[test]
    fn test_billing_day_crosses_utc_midnight() {
        // 05:00 UTC on June 11th is 22:00 PDT on June 10th.
        let late_evening = Utc.with_ymd_and_hms(2025, 6, 11, 5, 0, 0).unwrap();
        assert_eq!(billing_day_of_month(late_evening.timestamp()).unwrap(), 10);
    }

    #[test]
    fn test_billing_day_out_of_range_timestamp() {
        assert!(billing_day_of_month(i64::MAX).is_err());
    }
}
