//! Date bucketing into quarter and month labels.
//!
//! A [`QuarterPolicy`] decides which quarter each calendar month belongs to.
//! Labels look like `"Q3-2025"` and `"July-2025"`.

use chrono::{Datelike, Month, NaiveDate, Weekday};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("invalid quarter label {0:?}, expected Q1-Q4 followed by -YEAR")]
    Quarter(String),
    #[error("invalid month label {0:?}, expected MonthName-YEAR")]
    Month(String),
    #[error("unknown quarter policy {0:?}, expected calendar or fiscal")]
    Policy(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuarterLabel {
    pub year: i32,
    pub index: u8,
}

impl QuarterLabel {
    /// `None` unless `index` is 1..=4 and `year` is a year chrono can represent.
    pub fn new(index: u8, year: i32) -> Option<Self> {
        let years = NaiveDate::MIN.year()..=NaiveDate::MAX.year();
        ((1..=4).contains(&index) && years.contains(&year)).then_some(Self { year, index })
    }
}

impl fmt::Display for QuarterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}-{}", self.index, self.year)
    }
}

impl FromStr for QuarterLabel {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LabelError::Quarter(s.to_string());
        let (quarter, year) = s.trim().split_once('-').ok_or_else(invalid)?;
        let index = quarter
            .strip_prefix('Q')
            .and_then(|digit| digit.parse::<u8>().ok())
            .ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        Self::new(index, year).ok_or_else(invalid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthLabel {
    pub month: Month,
    pub year: i32,
}

impl MonthLabel {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: MONTHS[date.month0() as usize],
            year: date.year(),
        }
    }
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.month.name(), self.year)
    }
}

impl FromStr for MonthLabel {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LabelError::Month(s.to_string());
        let (name, year) = s.trim().split_once('-').ok_or_else(invalid)?;
        let month = MONTHS
            .iter()
            .copied()
            .find(|month| month.name().eq_ignore_ascii_case(name))
            .ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        Ok(Self { month, year })
    }
}

/// Quarter and month labels of a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub quarter: QuarterLabel,
    pub month: MonthLabel,
}

/// Maps calendar months to quarter indexes.
///
/// `january_prior_year` marks policies whose last quarter wraps into the next
/// January: such a January is labelled with the previous year's quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuarterPolicy {
    name: &'static str,
    quarter_of_month: [u8; 12],
    january_prior_year: bool,
}

impl QuarterPolicy {
    /// Q1 = January to March.
    pub const CALENDAR: Self = Self {
        name: "calendar",
        quarter_of_month: [1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4],
        january_prior_year: false,
    };

    /// Q1 = February to April, Q4 = November to the following January.
    pub const FISCAL: Self = Self {
        name: "fiscal",
        quarter_of_month: [4, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4],
        january_prior_year: true,
    };

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn classify(&self, date: NaiveDate) -> Period {
        Period {
            quarter: self.quarter_of(date),
            month: MonthLabel::of(date),
        }
    }

    pub fn quarter_of(&self, date: NaiveDate) -> QuarterLabel {
        let month0 = date.month0() as usize;
        let year = if month0 == 0 && self.january_prior_year {
            date.year() - 1
        } else {
            date.year()
        };
        QuarterLabel {
            year,
            index: self.quarter_of_month[month0],
        }
    }

    /// The months making up `quarter`, in chronological order.
    pub fn months_of(&self, quarter: QuarterLabel) -> Vec<MonthLabel> {
        let mut months: Vec<MonthLabel> = self
            .quarter_of_month
            .iter()
            .enumerate()
            .filter(|(_, index)| **index == quarter.index)
            .filter_map(|(month0, _)| {
                let year = if month0 == 0 && self.january_prior_year {
                    quarter.year.checked_add(1)?
                } else {
                    quarter.year
                };
                Some(MonthLabel {
                    month: MONTHS[month0],
                    year,
                })
            })
            .collect();
        months.sort_by_key(|label| (label.year, label.month.number_from_month()));
        months
    }

    /// String form of [`months_of`](Self::months_of). An unparseable label
    /// yields an empty list rather than an error.
    pub fn quarter_months(&self, quarter: &str) -> Vec<String> {
        match quarter.parse::<QuarterLabel>() {
            Ok(label) => self
                .months_of(label)
                .iter()
                .map(ToString::to_string)
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Position (0..3) of `month` inside `quarter`, if it belongs to it.
    pub fn month_slot(&self, quarter: QuarterLabel, month: MonthLabel) -> Option<usize> {
        self.months_of(quarter)
            .iter()
            .position(|candidate| *candidate == month)
    }
}

impl Default for QuarterPolicy {
    fn default() -> Self {
        Self::CALENDAR
    }
}

impl FromStr for QuarterPolicy {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "calendar" => Ok(Self::CALENDAR),
            "fiscal" => Ok(Self::FISCAL),
            _ => Err(LabelError::Policy(s.to_string())),
        }
    }
}

/// Monday to Friday count of a month. Returns 0 for an invalid month.
pub fn weekdays_in_month(year: i32, month: u32) -> u32 {
    let Some(mut day) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let mut count = 0;
    while day.month() == month {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            count += 1;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn calendar_policy_labels_mid_july() {
        let period = QuarterPolicy::CALENDAR.classify(date(2025, 7, 15));
        assert_eq!(period.quarter.to_string(), "Q3-2025");
        assert_eq!(period.month.to_string(), "July-2025");
        assert_eq!(
            QuarterPolicy::CALENDAR.quarter_months("Q3-2025"),
            vec!["July-2025", "August-2025", "September-2025"]
        );
    }

    #[test]
    fn fiscal_policy_wraps_january_into_previous_year() {
        let policy = QuarterPolicy::FISCAL;
        let period = policy.classify(date(2026, 1, 10));
        assert_eq!(period.quarter.to_string(), "Q4-2025");
        assert_eq!(period.month.to_string(), "January-2026");
        assert_eq!(
            policy.quarter_months("Q4-2025"),
            vec!["November-2025", "December-2025", "January-2026"]
        );
        assert_eq!(policy.classify(date(2026, 2, 1)).quarter.to_string(), "Q1-2026");
    }

    #[test]
    fn every_day_lands_in_its_own_quarter_months() {
        for policy in [QuarterPolicy::CALENDAR, QuarterPolicy::FISCAL] {
            let mut day = date(2024, 1, 1);
            while day < date(2026, 1, 1) {
                let first = policy.classify(day);
                assert_eq!(first, policy.classify(day));
                let months = policy.quarter_months(&first.quarter.to_string());
                assert_eq!(months.len(), 3);
                assert!(months.contains(&first.month.to_string()), "{day} {policy:?}");
                day = day.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn invalid_quarter_yields_no_months() {
        let policy = QuarterPolicy::CALENDAR;
        assert!(policy.quarter_months("Q5-2025").is_empty());
        assert!(policy.quarter_months("2025-Q1").is_empty());
        assert!(policy.quarter_months("").is_empty());
    }

    #[test]
    fn out_of_range_years_are_not_quarters() {
        assert!(QuarterPolicy::FISCAL.quarter_months("Q4-2147483647").is_empty());
        assert!(QuarterPolicy::CALENDAR.quarter_months("Q1--2147483648").is_empty());
        assert!("Q4-2147483647".parse::<QuarterLabel>().is_err());

        let max_year = NaiveDate::MAX.year();
        let last: QuarterLabel = format!("Q4-{max_year}").parse().unwrap();
        assert_eq!(QuarterPolicy::CALENDAR.months_of(last).len(), 3);

        let unchecked = QuarterLabel { year: i32::MAX, index: 4 };
        assert_eq!(QuarterPolicy::FISCAL.months_of(unchecked).len(), 2);
    }

    #[test]
    fn labels_parse_back() {
        let quarter: QuarterLabel = "Q2-2026".parse().unwrap();
        assert_eq!(quarter, QuarterLabel { index: 2, year: 2026 });
        let month: MonthLabel = "September-2025".parse().unwrap();
        assert_eq!(month.month, Month::September);
        assert!("Sept-2025".parse::<MonthLabel>().is_err());
        assert!("Q0-2025".parse::<QuarterLabel>().is_err());
    }

    #[test]
    fn month_slot_follows_policy_order() {
        let quarter: QuarterLabel = "Q4-2025".parse().unwrap();
        let january: MonthLabel = "January-2026".parse().unwrap();
        assert_eq!(QuarterPolicy::FISCAL.month_slot(quarter, january), Some(2));
        assert_eq!(QuarterPolicy::CALENDAR.month_slot(quarter, january), None);
    }

    #[test]
    fn counts_weekdays() {
        assert_eq!(weekdays_in_month(2025, 7), 23);
        assert_eq!(weekdays_in_month(2025, 8), 21);
        assert_eq!(weekdays_in_month(2025, 13), 0);
    }

    #[test]
    fn policy_from_config_value() {
        assert_eq!("Fiscal".parse::<QuarterPolicy>().unwrap(), QuarterPolicy::FISCAL);
        assert!("weekly".parse::<QuarterPolicy>().is_err());
    }
}
