use chrono::{FixedOffset, NaiveDate, Utc};

/// Source of "today" for the HTTP layer. Derivation functions never read the
/// clock themselves; handlers ask this once per request and pass the date in.
#[derive(Clone, Copy, Debug)]
pub enum Clock {
    /// Wall clock shifted into the clinic's timezone.
    System { utc_offset: FixedOffset },
    Fixed(NaiveDate),
}

impl Clock {
    pub fn system(utc_offset_minutes: i32) -> anyhow::Result<Self> {
        let utc_offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| anyhow::anyhow!("UTC_OFFSET_MINUTES out of range: {utc_offset_minutes}"))?;
        Ok(Clock::System { utc_offset })
    }

    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System { utc_offset } => Utc::now().with_timezone(utc_offset).date_naive(),
            Clock::Fixed(d) => *d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_returns_its_date() {
        let d = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(Clock::Fixed(d).today(), d);
    }

    #[test]
    fn offset_out_of_range_is_rejected() {
        assert!(Clock::system(480).is_ok());
        assert!(Clock::system(24 * 60).is_err());
        assert!(Clock::system(-600).is_ok());
    }

    #[test]
    fn huge_offset_is_an_error_not_an_overflow() {
        assert!(Clock::system(i32::MAX).is_err());
        assert!(Clock::system(i32::MIN).is_err());
    }
}
