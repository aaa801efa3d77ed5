use chrono::{DateTime, Duration, NaiveDate, Utc};

wire_enum! {
    pub enum ExportFormat {
        Csv => "csv",
        Xlsx => "xlsx",
    }
}

impl ExportFormat {
    #[inline]
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self::Csv
    }
}

wire_enum! {
    /// Preset date windows offered by the export dialog.
    pub enum DateRangeShortcut {
        Today => "today",
        ThreeDays => "3days",
        SevenDays => "7days",
        ThirtyDays => "30days",
        All => "all",
    }
}

impl Default for DateRangeShortcut {
    fn default() -> Self {
        Self::All
    }
}

impl DateRangeShortcut {
    pub fn days(&self) -> Option<i64> {
        match self {
            Self::Today => Some(0),
            Self::ThreeDays => Some(3),
            Self::SevenDays => Some(7),
            Self::ThirtyDays => Some(30),
            Self::All => None,
        }
    }

    /// `(start, end)` relative to `now`; `All` is unbounded.
    pub fn resolve(&self, now: DateTime<Utc>) -> Option<(NaiveDate, NaiveDate)> {
        let days = self.days()?;
        let end = now.date_naive();
        let start = (now - Duration::days(days)).date_naive();
        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn seven_days_ends_today() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 0, 0).unwrap();
        let (start, end) = DateRangeShortcut::SevenDays.resolve(now).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn today_is_a_single_day_and_all_is_open() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
        let (start, end) = DateRangeShortcut::Today.resolve(now).unwrap();
        assert_eq!(start, end);
        assert_eq!(DateRangeShortcut::All.resolve(now), None);
        assert_eq!("3DAYS".parse::<DateRangeShortcut>(), Ok(DateRangeShortcut::ThreeDays));
    }
}
