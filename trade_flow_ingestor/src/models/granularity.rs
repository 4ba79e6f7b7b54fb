//! Calendar bucket boundaries for resampling daily rows.
//!
//! - Week: Monday..Sunday, labelled by its Sunday.
//! - Month: labelled by the last calendar day of the month.
//! - Quarter: calendar quarters ending Mar 31, Jun 30, Sep 30, Dec 31.
//!
//! Labels are the *inclusive* end of the bucket, matching conventional
//! calendar resampling where a period is stamped with its closing day.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};

/// Resampling frequency a horizon maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// Monday-based weeks
    Weekly,
    /// calendar months
    Monthly,
    /// calendar quarters
    Quarterly,
}

impl Granularity {
    /// Last day of the bucket containing `date`.
    ///
    /// Returns `None` only when the boundary falls outside chrono's date range.
    pub fn bucket_end(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Weekly => {
                let to_sunday = 6 - date.weekday().num_days_from_monday();
                date.checked_add_days(Days::new(to_sunday as u64))
            }
            Granularity::Monthly => end_of_month(date.year(), date.month()),
            Granularity::Quarterly => {
                let quarter_end_month = date.month0() / 3 * 3 + 3;
                end_of_month(date.year(), quarter_end_month)
            }
        }
    }

    /// End of the bucket that follows the one ending on `end`.
    pub fn next_bucket_end(&self, end: NaiveDate) -> Option<NaiveDate> {
        end.succ_opt().and_then(|first| self.bucket_end(first))
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
            Granularity::Quarterly => "quarterly",
        };
        f.write_str(s)
    }
}

fn end_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    // month width varies: step back one day from the first of the next month
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_ends_on_sunday() {
        // 2025-12-01 is a Monday
        assert_eq!(Granularity::Weekly.bucket_end(ymd(2025, 12, 1)), Some(ymd(2025, 12, 7)));
        assert_eq!(Granularity::Weekly.bucket_end(ymd(2025, 12, 5)), Some(ymd(2025, 12, 7)));
        assert_eq!(Granularity::Weekly.bucket_end(ymd(2025, 12, 7)), Some(ymd(2025, 12, 7)));
        assert_eq!(Granularity::Weekly.bucket_end(ymd(2025, 12, 29)), Some(ymd(2026, 1, 4)));
    }

    #[test]
    fn month_end_handles_leap_years_and_december() {
        assert_eq!(Granularity::Monthly.bucket_end(ymd(2024, 2, 10)), Some(ymd(2024, 2, 29)));
        assert_eq!(Granularity::Monthly.bucket_end(ymd(2025, 2, 10)), Some(ymd(2025, 2, 28)));
        assert_eq!(Granularity::Monthly.bucket_end(ymd(2025, 12, 1)), Some(ymd(2025, 12, 31)));
    }

    #[test]
    fn next_bucket_steps_one_period() {
        assert_eq!(Granularity::Weekly.next_bucket_end(ymd(2025, 12, 28)), Some(ymd(2026, 1, 4)));
        assert_eq!(Granularity::Monthly.next_bucket_end(ymd(2024, 1, 31)), Some(ymd(2024, 2, 29)));
        assert_eq!(Granularity::Quarterly.next_bucket_end(ymd(2025, 12, 31)), Some(ymd(2026, 3, 31)));
    }

    #[test]
    fn quarter_boundaries() {
        assert_eq!(Granularity::Quarterly.bucket_end(ymd(2025, 1, 1)), Some(ymd(2025, 3, 31)));
        assert_eq!(Granularity::Quarterly.bucket_end(ymd(2025, 3, 31)), Some(ymd(2025, 3, 31)));
        assert_eq!(Granularity::Quarterly.bucket_end(ymd(2025, 4, 1)), Some(ymd(2025, 6, 30)));
        assert_eq!(Granularity::Quarterly.bucket_end(ymd(2025, 8, 15)), Some(ymd(2025, 9, 30)));
        assert_eq!(Granularity::Quarterly.bucket_end(ymd(2025, 11, 30)), Some(ymd(2025, 12, 31)));
    }
}
