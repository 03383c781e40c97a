use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time left until the countdown target, split into display units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub days: u64,
    /// Hours within the current day (0-23)
    pub hours: u64,
    /// Minutes within the current hour (0-59)
    pub minutes: u64,
    /// Seconds within the current minute (0-59)
    pub seconds: u64,
}

impl TimeRemaining {
    /// Total whole seconds represented by this value
    pub fn total_seconds(&self) -> u64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

/// Where "today" falls relative to the observance window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarWindowStatus {
    pub in_window: bool,
    /// 1-based day of the window; 0 when outside
    pub day_index: u32,
    pub total_days: u32,
    /// True during the last ten days of the window
    pub is_final_phase: bool,
}

/// Lifecycle of the observance period relative to now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerStatus {
    Upcoming,
    Active,
    Ended,
}

/// Content for the progress banner shown across the top of the app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressBanner {
    pub status: BannerStatus,
    pub title: String,
    pub subtitle: String,
    /// Whole percent of the window already elapsed (0-100)
    pub percent_complete: u32,
    pub window: CalendarWindowStatus,
    /// Countdown to the window start; only present while upcoming
    pub countdown: Option<TimeRemaining>,
}

/// Category of a giving record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GivingType {
    Zakat,
    Khums,
    Sadaqah,
    Fitr,
    Tatheer,
}

impl GivingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GivingType::Zakat => "zakat",
            GivingType::Khums => "khums",
            GivingType::Sadaqah => "sadaqah",
            GivingType::Fitr => "fitr",
            GivingType::Tatheer => "tatheer",
        }
    }
}

impl fmt::Display for GivingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GivingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zakat" => Ok(GivingType::Zakat),
            "khums" => Ok(GivingType::Khums),
            "sadaqah" => Ok(GivingType::Sadaqah),
            "fitr" => Ok(GivingType::Fitr),
            "tatheer" => Ok(GivingType::Tatheer),
            other => Err(format!("Unknown giving type: {}", other)),
        }
    }
}

/// A giving record as returned to the frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GivingRecord {
    pub id: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub giving_type: GivingType,
    pub recipient: String,
    /// Date of the gift (YYYY-MM-DD)
    pub date: String,
    pub notes: String,
    /// Server-assigned creation time (RFC 3339)
    pub created_at: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGivingRecordRequest {
    pub amount: f64,
    #[serde(rename = "type")]
    pub giving_type: GivingType,
    pub recipient: String,
    /// Date of the gift (YYYY-MM-DD)
    pub date: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GivingRecordListRequest {
    /// Maximum number of records to return
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GivingRecordListResponse {
    pub records: Vec<GivingRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistRequest {
    pub email: String,
    /// Where the signup came from; defaults to "landing"
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskRafiqRequest {
    pub email: String,
    pub question: String,
}

/// Identifier of a newly written document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordHandleResponse {
    pub id: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_remaining_total_seconds() {
        let remaining = TimeRemaining { days: 1, hours: 2, minutes: 3, seconds: 4 };
        assert_eq!(remaining.total_seconds(), 86_400 + 7_200 + 180 + 4);
        assert!(!remaining.is_zero());
        assert!(TimeRemaining::default().is_zero());
    }

    #[test]
    fn test_giving_type_wire_names() {
        let json = serde_json::to_string(&GivingType::Sadaqah).unwrap();
        assert_eq!(json, "\"sadaqah\"");
        assert_eq!("tatheer".parse::<GivingType>().unwrap(), GivingType::Tatheer);
        assert!("charity".parse::<GivingType>().is_err());
    }

    #[test]
    fn test_create_request_uses_type_field() {
        let request: CreateGivingRecordRequest = serde_json::from_str(
            r#"{"amount": 25.5, "type": "zakat", "recipient": "Local masjid", "date": "2026-03-01"}"#,
        )
        .unwrap();
        assert_eq!(request.giving_type, GivingType::Zakat);
        assert_eq!(request.notes, "");
    }

    #[test]
    fn test_window_status_serializes_camel_case() {
        let status = CalendarWindowStatus {
            in_window: true,
            day_index: 3,
            total_days: 30,
            is_final_phase: false,
        };
        let value = serde_json::to_value(status).unwrap();
        assert_eq!(value["inWindow"], true);
        assert_eq!(value["dayIndex"], 3);
        assert_eq!(value["isFinalPhase"], false);
    }
}
