//! In-memory attendance store.
//!
//! Records are keyed by date, quarter settings by quarter label. Writes to an
//! existing key overwrite it in place; nothing is persisted.

use crate::models::{
    AppSettings, AppSettingsPatch, AttendancePatch, AttendanceRecord, NewAppSettings,
    NewAttendanceRecord, NewQuarterSettings, QuarterSettings, QuarterSettingsPatch,
};
use crate::progress::QuarterReport;
use crate::quarter::{weekdays_in_month, LabelError, QuarterLabel, QuarterPolicy};
use chrono::NaiveDate;
use indexmap::map::Entry;
use indexmap::IndexMap;
use thiserror::Error;
use uuid::Uuid;

/// Upper bound for a single month's configured work days.
pub const MAX_WORK_DAYS_PER_MONTH: u32 = 31;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no attendance record for {0}")]
    AttendanceNotFound(NaiveDate),
    #[error("no quarter settings for {0}")]
    QuarterSettingsNotFound(String),
    #[error("app settings have not been created")]
    AppSettingsNotFound,
    #[error(transparent)]
    Label(#[from] LabelError),
    #[error("{field} is {given:?} but must be {expected:?}")]
    Mismatch {
        field: &'static str,
        given: String,
        expected: String,
    },
    #[error("{field} must be at most {max}, got {value}", max = MAX_WORK_DAYS_PER_MONTH)]
    TooManyWorkDays { field: &'static str, value: u32 },
}

#[derive(Debug, Clone)]
pub struct Store {
    policy: QuarterPolicy,
    attendance: IndexMap<NaiveDate, AttendanceRecord>,
    quarters: IndexMap<String, QuarterSettings>,
    app_settings: Option<AppSettings>,
}

impl Store {
    pub fn new(policy: QuarterPolicy) -> Self {
        Self {
            policy,
            attendance: IndexMap::new(),
            quarters: IndexMap::new(),
            app_settings: None,
        }
    }

    /// A store holding settings for the quarter containing `today`, with each
    /// month's work days defaulted to its weekday count.
    pub fn seeded(policy: QuarterPolicy, today: NaiveDate) -> Self {
        let mut store = Self::new(policy);
        let quarter = policy.quarter_of(today);
        let work_days: Vec<u32> = policy
            .months_of(quarter)
            .iter()
            .map(|month| weekdays_in_month(month.year, month.month.number_from_month()))
            .collect();
        let settings = QuarterSettings {
            id: Uuid::new_v4(),
            quarter: quarter.to_string(),
            year: quarter.year,
            month1_work_days: work_days.first().copied().unwrap_or(0),
            month2_work_days: work_days.get(1).copied().unwrap_or(0),
            month3_work_days: work_days.get(2).copied().unwrap_or(0),
        };
        store.quarters.insert(settings.quarter.clone(), settings);
        store.app_settings = Some(AppSettings {
            id: Uuid::new_v4(),
            current_quarter: quarter.to_string(),
            dark_mode: false,
            notifications: true,
        });
        store
    }

    pub fn attendance(&self) -> Vec<AttendanceRecord> {
        self.attendance.values().cloned().collect()
    }

    pub fn attendance_by_quarter(&self, quarter: &str) -> Vec<AttendanceRecord> {
        self.attendance
            .values()
            .filter(|record| record.quarter == quarter)
            .cloned()
            .collect()
    }

    pub fn attendance_by_month(&self, month: &str) -> Vec<AttendanceRecord> {
        self.attendance
            .values()
            .filter(|record| record.month == month)
            .cloned()
            .collect()
    }

    pub fn attendance_on(&self, date: NaiveDate) -> Option<&AttendanceRecord> {
        self.attendance.get(&date)
    }

    /// Creates the record for `new.date`, or overwrites the existing one while
    /// keeping its id and list position.
    pub fn upsert_attendance(
        &mut self,
        new: NewAttendanceRecord,
    ) -> Result<AttendanceRecord, StoreError> {
        let period = self.policy.classify(new.date);
        let quarter = period.quarter.to_string();
        let month = period.month.to_string();
        check_matches("quarter", new.quarter.as_deref(), &quarter)?;
        check_matches("month", new.month.as_deref(), &month)?;

        let record = match self.attendance.entry(new.date) {
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                existing.location = new.location;
                existing.quarter = quarter;
                existing.month = month;
                existing.clone()
            }
            Entry::Vacant(slot) => slot
                .insert(AttendanceRecord {
                    id: Uuid::new_v4(),
                    date: new.date,
                    location: new.location,
                    quarter,
                    month,
                })
                .clone(),
        };
        Ok(record)
    }

    pub fn update_attendance(
        &mut self,
        date: NaiveDate,
        patch: AttendancePatch,
    ) -> Result<AttendanceRecord, StoreError> {
        let record = self
            .attendance
            .get_mut(&date)
            .ok_or(StoreError::AttendanceNotFound(date))?;
        if let Some(location) = patch.location {
            record.location = location;
        }
        Ok(record.clone())
    }

    pub fn delete_attendance(&mut self, date: NaiveDate) -> Result<AttendanceRecord, StoreError> {
        self.attendance
            .shift_remove(&date)
            .ok_or(StoreError::AttendanceNotFound(date))
    }

    pub fn quarter_settings(&self) -> Vec<QuarterSettings> {
        self.quarters.values().cloned().collect()
    }

    pub fn quarter_settings_for(&self, quarter: QuarterLabel) -> Option<&QuarterSettings> {
        self.quarters.get(&quarter.to_string())
    }

    pub fn upsert_quarter_settings(
        &mut self,
        new: NewQuarterSettings,
    ) -> Result<QuarterSettings, StoreError> {
        let quarter: QuarterLabel = new.quarter.parse()?;
        check_matches("year", Some(&new.year.to_string()), &quarter.year.to_string())?;
        check_work_days("month1WorkDays", new.month1_work_days)?;
        check_work_days("month2WorkDays", new.month2_work_days)?;
        check_work_days("month3WorkDays", new.month3_work_days)?;

        let key = quarter.to_string();
        let id = self
            .quarters
            .get(&key)
            .map_or_else(Uuid::new_v4, |existing| existing.id);
        let settings = QuarterSettings {
            id,
            quarter: key.clone(),
            year: quarter.year,
            month1_work_days: new.month1_work_days,
            month2_work_days: new.month2_work_days,
            month3_work_days: new.month3_work_days,
        };
        self.quarters.insert(key, settings.clone());
        Ok(settings)
    }

    pub fn update_quarter_settings(
        &mut self,
        quarter: QuarterLabel,
        patch: QuarterSettingsPatch,
    ) -> Result<QuarterSettings, StoreError> {
        let key = quarter.to_string();
        check_matches("quarter", patch.quarter.as_deref(), &key)?;
        check_matches(
            "year",
            patch.year.map(|year| year.to_string()).as_deref(),
            &quarter.year.to_string(),
        )?;
        for (field, value) in [
            ("month1WorkDays", patch.month1_work_days),
            ("month2WorkDays", patch.month2_work_days),
            ("month3WorkDays", patch.month3_work_days),
        ] {
            if let Some(value) = value {
                check_work_days(field, value)?;
            }
        }

        let settings = self
            .quarters
            .get_mut(&key)
            .ok_or(StoreError::QuarterSettingsNotFound(key))?;
        if let Some(days) = patch.month1_work_days {
            settings.month1_work_days = days;
        }
        if let Some(days) = patch.month2_work_days {
            settings.month2_work_days = days;
        }
        if let Some(days) = patch.month3_work_days {
            settings.month3_work_days = days;
        }
        Ok(settings.clone())
    }

    pub fn app_settings(&self) -> Option<&AppSettings> {
        self.app_settings.as_ref()
    }

    /// Replaces the singleton. The id survives replacement.
    pub fn put_app_settings(&mut self, new: NewAppSettings) -> Result<AppSettings, StoreError> {
        let quarter: QuarterLabel = new.current_quarter.parse()?;
        let id = self
            .app_settings
            .as_ref()
            .map_or_else(Uuid::new_v4, |existing| existing.id);
        let settings = AppSettings {
            id,
            current_quarter: quarter.to_string(),
            dark_mode: new.dark_mode,
            notifications: new.notifications,
        };
        self.app_settings = Some(settings.clone());
        Ok(settings)
    }

    pub fn update_app_settings(
        &mut self,
        patch: AppSettingsPatch,
    ) -> Result<AppSettings, StoreError> {
        let current_quarter = patch
            .current_quarter
            .map(|label| label.parse::<QuarterLabel>())
            .transpose()?;
        let settings = self
            .app_settings
            .as_mut()
            .ok_or(StoreError::AppSettingsNotFound)?;
        if let Some(quarter) = current_quarter {
            settings.current_quarter = quarter.to_string();
        }
        if let Some(dark_mode) = patch.dark_mode {
            settings.dark_mode = dark_mode;
        }
        if let Some(notifications) = patch.notifications {
            settings.notifications = notifications;
        }
        Ok(settings.clone())
    }

    /// Quarter shown by default: the configured one, else the one holding `today`.
    pub fn current_quarter(&self, today: NaiveDate) -> QuarterLabel {
        self.app_settings
            .as_ref()
            .and_then(|settings| settings.current_quarter.parse().ok())
            .unwrap_or_else(|| self.policy.quarter_of(today))
    }

    pub fn report(&self, quarter: QuarterLabel) -> QuarterReport {
        let records = self.attendance_by_quarter(&quarter.to_string());
        QuarterReport::build(
            &self.policy,
            quarter,
            self.quarter_settings_for(quarter),
            &records,
        )
    }
}

fn check_matches(
    field: &'static str,
    given: Option<&str>,
    expected: &str,
) -> Result<(), StoreError> {
    match given {
        Some(given) if given != expected => Err(StoreError::Mismatch {
            field,
            given: given.to_string(),
            expected: expected.to_string(),
        }),
        _ => Ok(()),
    }
}

fn check_work_days(field: &'static str, value: u32) -> Result<(), StoreError> {
    if value > MAX_WORK_DAYS_PER_MONTH {
        return Err(StoreError::TooManyWorkDays { field, value });
    }
    Ok(())
}
