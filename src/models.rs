use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Office,
    Home,
    DayOff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub location: Location,
    pub quarter: String,
    pub month: String,
}

/// Body of `POST /api/attendance`. Missing labels are derived from `date`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttendanceRecord {
    pub date: NaiveDate,
    pub location: Location,
    #[serde(default)]
    pub quarter: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
}

/// Mutable fields of an attendance record. The labels follow the date key
/// and are never patched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AttendancePatch {
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterSettings {
    pub id: Uuid,
    pub quarter: String,
    pub year: i32,
    pub month1_work_days: u32,
    pub month2_work_days: u32,
    pub month3_work_days: u32,
}

impl QuarterSettings {
    pub fn total_work_days(&self) -> u32 {
        self.month1_work_days + self.month2_work_days + self.month3_work_days
    }

    /// Work days configured for the `slot`-th month of the quarter.
    pub fn work_days_for_slot(&self, slot: usize) -> u32 {
        match slot {
            0 => self.month1_work_days,
            1 => self.month2_work_days,
            2 => self.month3_work_days,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuarterSettings {
    pub quarter: String,
    pub year: i32,
    pub month1_work_days: u32,
    pub month2_work_days: u32,
    pub month3_work_days: u32,
}

/// `quarter` and `year` are accepted so full settings bodies can be sent
/// back unchanged, but they must agree with the settings being updated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuarterSettingsPatch {
    #[serde(default)]
    pub quarter: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month1_work_days: Option<u32>,
    #[serde(default)]
    pub month2_work_days: Option<u32>,
    #[serde(default)]
    pub month3_work_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub id: Uuid,
    pub current_quarter: String,
    pub dark_mode: bool,
    pub notifications: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppSettings {
    pub current_quarter: String,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default = "default_notifications")]
    pub notifications: bool,
}

fn default_notifications() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AppSettingsPatch {
    #[serde(default)]
    pub current_quarter: Option<String>,
    #[serde(default)]
    pub dark_mode: Option<bool>,
    #[serde(default)]
    pub notifications: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_uses_lowercase_wire_names() {
        let parsed: Location = serde_json::from_str("\"dayoff\"").unwrap();
        assert_eq!(parsed, Location::DayOff);
        assert_eq!(serde_json::to_string(&Location::Office).unwrap(), "\"office\"");
        assert!(serde_json::from_str::<Location>("\"remote\"").is_err());
    }

    #[test]
    fn quarter_settings_use_camel_case() {
        let body = serde_json::json!({
            "quarter": "Q3-2025",
            "year": 2025,
            "month1WorkDays": 23,
            "month2WorkDays": 21,
            "month3WorkDays": 22
        });
        let parsed: NewQuarterSettings = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.month3_work_days, 22);
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let body = serde_json::json!({ "location": "home", "date": "2025-07-01" });
        assert!(serde_json::from_value::<AttendancePatch>(body).is_err());
    }

    #[test]
    fn new_app_settings_defaults_toggles() {
        let parsed: NewAppSettings =
            serde_json::from_value(serde_json::json!({ "currentQuarter": "Q1-2026" })).unwrap();
        assert!(!parsed.dark_mode);
        assert!(parsed.notifications);
    }
}
