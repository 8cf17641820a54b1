//! Sampling frequency of a series

use chrono::{Datelike, Duration, Months, NaiveDateTime};
use std::fmt;

/// Step between consecutive periods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    /// Constant duration, e.g. one day or one hour
    Fixed(Duration),
    /// Calendar months per step (12 for yearly)
    Monthly(u32),
    /// Calendar months per step, always landing on the last day of a month
    MonthEnd(u32),
}

impl Frequency {
    pub fn daily() -> Self {
        Frequency::Fixed(Duration::days(1))
    }

    /// Timestamp `steps` periods after `from`, or `None` on overflow.
    ///
    /// Calendar steps are taken from `from` directly so month-end dates do
    /// not drift.
    pub fn advance(&self, from: NaiveDateTime, steps: u32) -> Option<NaiveDateTime> {
        match self {
            Frequency::Fixed(step) => {
                let total = step.checked_mul(i32::try_from(steps).ok()?)?;
                from.checked_add_signed(total)
            }
            Frequency::Monthly(months) => {
                from.checked_add_months(Months::new(months.checked_mul(steps)?))
            }
            Frequency::MonthEnd(months) => {
                end_of_month(from.checked_add_months(Months::new(months.checked_mul(steps)?))?)
            }
        }
    }
}

/// Whether `t` falls on the last day of its month
pub fn is_month_end(t: NaiveDateTime) -> bool {
    t.date().succ_opt().is_some_and(|next| next.day() == 1)
}

/// The last day of the month containing `t`, at the same time of day
pub fn end_of_month(t: NaiveDateTime) -> Option<NaiveDateTime> {
    let next_month = t.date().with_day(1)?.checked_add_months(Months::new(1))?;
    Some(next_month.pred_opt()?.and_time(t.time()))
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Monthly(n) | Frequency::MonthEnd(n) => match n {
                1 => write!(f, "monthly"),
                3 => write!(f, "quarterly"),
                12 => write!(f, "yearly"),
                n => write!(f, "every {} months", n),
            },
            Frequency::Fixed(d) => {
                let secs = d.num_seconds();
                match secs {
                    86_400 => write!(f, "daily"),
                    604_800 => write!(f, "weekly"),
                    3_600 => write!(f, "hourly"),
                    60 => write!(f, "every minute"),
                    s if s % 86_400 == 0 => write!(f, "every {} days", s / 86_400),
                    s if s % 3_600 == 0 => write!(f, "every {} hours", s / 3_600),
                    s if s % 60 == 0 => write!(f, "every {} minutes", s / 60),
                    s => write!(f, "every {} seconds", s),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_advance_fixed() {
        let freq = Frequency::daily();
        assert_eq!(freq.advance(ymd(2021, 4, 10), 1), Some(ymd(2021, 4, 11)));
        assert_eq!(freq.advance(ymd(2021, 4, 10), 30), Some(ymd(2021, 5, 10)));
    }

    #[test]
    fn test_advance_monthly_does_not_drift() {
        let freq = Frequency::Monthly(1);
        assert_eq!(freq.advance(ymd(2021, 1, 31), 1), Some(ymd(2021, 2, 28)));
        assert_eq!(freq.advance(ymd(2021, 1, 31), 2), Some(ymd(2021, 3, 31)));
    }

    #[test]
    fn test_advance_month_end_stays_at_month_end() {
        let freq = Frequency::MonthEnd(1);
        assert_eq!(freq.advance(ymd(2021, 11, 30), 1), Some(ymd(2021, 12, 31)));
        assert_eq!(freq.advance(ymd(2021, 2, 28), 1), Some(ymd(2021, 3, 31)));
        assert_eq!(freq.advance(ymd(2021, 4, 30), 10), Some(ymd(2022, 2, 28)));
        assert_eq!(
            Frequency::MonthEnd(12).advance(ymd(2019, 2, 28), 1),
            Some(ymd(2020, 2, 29))
        );
    }

    #[test]
    fn test_month_end_helpers() {
        assert!(is_month_end(ymd(2021, 4, 30)));
        assert!(is_month_end(ymd(2020, 2, 29)));
        assert!(!is_month_end(ymd(2021, 2, 27)));
        assert_eq!(end_of_month(ymd(2021, 6, 15)), Some(ymd(2021, 6, 30)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Frequency::daily().to_string(), "daily");
        assert_eq!(Frequency::Fixed(Duration::hours(6)).to_string(), "every 6 hours");
        assert_eq!(Frequency::Monthly(12).to_string(), "yearly");
        assert_eq!(Frequency::Monthly(1).to_string(), "monthly");
        assert_eq!(Frequency::MonthEnd(3).to_string(), "quarterly");
    }
}
