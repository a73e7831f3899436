use crate::model::{Error, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

/// Inclusive UTC period a report covers.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

// Create
impl DateRange {
    fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }
}

// Format
impl DateRange {
    /// Calendar-day form used by both search query languages.
    pub fn start_day(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_day(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }

    /// `start..end` as accepted by GitHub's date qualifiers.
    pub fn search_span(&self) -> String {
        format!("{}..{}", self.start_day(), self.end_day())
    }
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    fn months(self) -> (u32, u32) {
        match self {
            Quarter::Q1 => (1, 3),
            Quarter::Q2 => (4, 6),
            Quarter::Q3 => (7, 9),
            Quarter::Q4 => (10, 12),
        }
    }

    pub fn date_range(self, year: i32) -> Result<DateRange> {
        let (first_month, last_month) = self.months();
        let out_of_range = || Error::InvalidQuarter(format!("{self} {year}"));

        let first_day = NaiveDate::from_ymd_opt(year, first_month, 1).ok_or_else(out_of_range)?;
        let last_day = last_day_of_month(year, last_month).ok_or_else(out_of_range)?;

        let start = first_day.and_hms_opt(0, 0, 0).ok_or_else(out_of_range)?;
        let end = last_day.and_hms_opt(23, 59, 59).ok_or_else(out_of_range)?;
        Ok(DateRange::new(
            Utc.from_utc_datetime(&start),
            Utc.from_utc_datetime(&end),
        ))
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

impl FromStr for Quarter {
    type Err = Error;

    fn from_str(label: &str) -> Result<Self> {
        Quarter::ALL
            .into_iter()
            .find(|quarter| quarter.to_string().eq_ignore_ascii_case(label.trim()))
            .ok_or_else(|| Error::InvalidQuarter(label.to_string()))
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        };
        f.write_str(label)
    }
}

/// Resolves a quarter label and year into its report period.
pub fn quarter_dates(label: &str, year: i32) -> Result<DateRange> {
    label.parse::<Quarter>()?.date_range(year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn q2_2024_covers_april_through_june() {
        let range = quarter_dates("Q2", 2024).unwrap();
        assert_eq!(range.start.to_rfc3339(), "2024-04-01T00:00:00+00:00");
        assert_eq!(range.end.to_rfc3339(), "2024-06-30T23:59:59+00:00");
    }

    #[test]
    fn every_quarter_spans_whole_calendar_days() {
        for year in [1999, 2023, 2024, 2100] {
            for quarter in Quarter::ALL {
                let range = quarter.date_range(year).unwrap();
                assert!(range.start <= range.end);
                assert_eq!(range.start.day(), 1);
                assert_eq!(
                    (range.start.hour(), range.start.minute(), range.start.second()),
                    (0, 0, 0)
                );
                assert_eq!(
                    (range.end.hour(), range.end.minute(), range.end.second()),
                    (23, 59, 59)
                );
                // the day after `end` is the first day of the next quarter
                let next = range.end + chrono::Duration::seconds(1);
                assert_eq!(next.day(), 1);
                assert_eq!(next.month0() % 3, 0);
            }
        }
    }

    #[test]
    fn quarter_ends_match_the_calendar() {
        let ends = Quarter::ALL.map(|q| q.date_range(2023).unwrap().end_day());
        assert_eq!(ends, ["2023-03-31", "2023-06-30", "2023-09-30", "2023-12-31"]);
    }

    #[test]
    fn unknown_labels_are_rejected() {
        for label in ["Q5", "", "Q0", "first"] {
            match quarter_dates(label, 2024) {
                Err(Error::InvalidQuarter(got)) => assert_eq!(got, label),
                other => panic!("expected InvalidQuarter for {label:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(" q3 ".parse::<Quarter>().unwrap(), Quarter::Q3);
        assert_eq!(Quarter::Q3.to_string(), "Q3");
    }

    #[test]
    fn search_span_uses_calendar_days() {
        let range = quarter_dates("Q1", 2025).unwrap();
        assert_eq!(range.search_span(), "2025-01-01..2025-03-31");
    }
}
