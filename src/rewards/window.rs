use crate::error::RewardError;
use chrono::{Months, NaiveDate};
use std::fmt::{Display, Formatter};

/// An inclusive date range `[start, end]`. A window can only be constructed with
/// `start <= end`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RewardError> {
        if start > end {
            return Err(RewardError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// January 1st through December 31st of `year`.
    pub fn calendar_year(year: i32) -> Result<Self, RewardError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| RewardError::InvalidDate(format!("{year}-01-01")))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| RewardError::InvalidDate(format!("{year}-12-31")))?;
        Self::new(start, end)
    }

    /// The `months` calendar months leading up to and including `end`. When the day does not
    /// exist in the earlier month, the start is clamped to that month's last day.
    pub fn trailing_months(end: NaiveDate, months: u32) -> Result<Self, RewardError> {
        let start = end
            .checked_sub_months(Months::new(months))
            .ok_or_else(|| RewardError::InvalidDate(end.to_string()))?;
        Self::new(start, end)
    }

    /// Fills in missing bounds: `end` defaults to `today` and `start` to `months` before `end`.
    pub fn with_defaults(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
        months: u32,
    ) -> Result<Self, RewardError> {
        let end = end.unwrap_or(today);
        match start {
            Some(start) => Self::new(start, end),
            None => Self::trailing_months(end, months),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for DateWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
