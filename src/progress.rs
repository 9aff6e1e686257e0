//! Occupancy arithmetic over attendance records.

use crate::models::{AttendanceRecord, Location, QuarterSettings};
use crate::quarter::{QuarterLabel, QuarterPolicy};
use serde::Serialize;

/// Share of work days expected in the office.
pub const TARGET_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Green,
    Orange,
    Red,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub office_days: u32,
    pub total_work_days: u32,
    pub target_days: u32,
    pub percentage: f64,
    pub remaining: u32,
}

impl Progress {
    pub fn compute<'a, I>(records: I, work_days: u32) -> Self
    where
        I: IntoIterator<Item = &'a AttendanceRecord>,
    {
        Self::from_office_days(office_days(records), work_days)
    }

    pub fn from_office_days(office_days: u32, work_days: u32) -> Self {
        let target_days = target_days(work_days);
        let percentage = if work_days == 0 {
            0.0
        } else {
            f64::from(office_days) / f64::from(work_days) * 100.0
        };
        Self {
            office_days,
            total_work_days: work_days,
            target_days,
            percentage,
            remaining: target_days.saturating_sub(office_days),
        }
    }

    /// Office days over (positive) or under (negative) the target.
    pub fn above_target(&self) -> i64 {
        i64::from(self.office_days) - i64::from(self.target_days)
    }
}

pub fn target_days(work_days: u32) -> u32 {
    (f64::from(work_days) * TARGET_RATIO).ceil() as u32
}

fn office_days<'a, I>(records: I) -> u32
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    records
        .into_iter()
        .filter(|record| record.location == Location::Office)
        .count() as u32
}

/// Colour of a progress bar or ring. Independent of [`status_line`].
pub fn bar_tone(percentage: f64) -> Tone {
    if percentage >= 50.0 {
        Tone::Green
    } else if percentage >= 40.0 {
        Tone::Orange
    } else {
        Tone::Red
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub text: String,
    pub tone: Tone,
}

/// Distance from the 50% target, e.g. "12% ahead of target".
///
/// Exactly on target reports "0% behind target" in orange.
pub fn status_line(percentage: f64) -> StatusLine {
    let diff = percentage - TARGET_RATIO * 100.0;
    if diff > 0.0 {
        StatusLine {
            text: format!("{}% ahead of target", diff.round()),
            tone: Tone::Green,
        }
    } else if diff > -10.0 {
        StatusLine {
            text: format!("{}% behind target", diff.abs().round()),
            tone: Tone::Orange,
        }
    } else {
        StatusLine {
            text: format!("{}% behind target", diff.abs().round()),
            tone: Tone::Red,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthProgress {
    pub month: String,
    #[serde(flatten)]
    pub progress: Progress,
    pub days_ahead: i64,
    pub tone: Tone,
    pub summary: String,
}

impl MonthProgress {
    pub fn compute(month: String, records: &[AttendanceRecord], work_days: u32) -> Self {
        let progress = Progress::compute(
            records.iter().filter(|record| record.month == month),
            work_days,
        );
        let days_ahead = progress.above_target();
        let (tone, summary) = if days_ahead >= 0 {
            (Tone::Green, format!("{days_ahead} days ahead this month"))
        } else {
            (Tone::Orange, format!("{} days behind this month", -days_ahead))
        };
        Self {
            month,
            progress,
            days_ahead,
            tone,
            summary,
        }
    }
}

/// Everything the dashboard and history views show for one quarter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterReport {
    pub quarter: String,
    pub policy: &'static str,
    pub configured: bool,
    #[serde(flatten)]
    pub progress: Progress,
    pub above_target: i64,
    pub days_unlogged: u32,
    pub bar_tone: Tone,
    pub status: StatusLine,
    pub months: Vec<MonthProgress>,
}

impl QuarterReport {
    /// `records` are the records labelled with `quarter`. Without settings
    /// every month counts zero work days.
    pub fn build(
        policy: &QuarterPolicy,
        quarter: QuarterLabel,
        settings: Option<&QuarterSettings>,
        records: &[AttendanceRecord],
    ) -> Self {
        let total_work_days = settings.map_or(0, QuarterSettings::total_work_days);
        let progress = Progress::compute(records, total_work_days);
        let logged = u32::try_from(records.len()).unwrap_or(u32::MAX);

        let months = policy
            .months_of(quarter)
            .into_iter()
            .enumerate()
            .map(|(slot, month)| {
                let work_days = settings.map_or(0, |settings| settings.work_days_for_slot(slot));
                MonthProgress::compute(month.to_string(), records, work_days)
            })
            .collect();

        Self {
            quarter: quarter.to_string(),
            policy: policy.name(),
            configured: settings.is_some(),
            above_target: progress.above_target(),
            days_unlogged: total_work_days.saturating_sub(logged),
            bar_tone: bar_tone(progress.percentage),
            status: status_line(progress.percentage),
            progress,
            months,
        }
    }
}
