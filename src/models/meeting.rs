use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meeting {
    pub id: i64,
    #[serde(rename = "leadId")]
    pub lead_id: i64,
    #[serde(rename = "brokerId", default)]
    pub broker_id: Option<i64>,
    pub title: String,
    #[serde(rename = "scheduledAt")]
    pub scheduled_at: DateTime<Utc>,
    #[serde(rename = "durationMinutes")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub location: Option<String>,
    pub status: MeetingStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl MeetingStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            MeetingStatus::Scheduled => "Scheduled",
            MeetingStatus::Completed => "Completed",
            MeetingStatus::Cancelled => "Cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_meeting() {
        let meeting: Meeting = serde_json::from_str(
            r#"{"id": 2, "leadId": 5, "title": "Site visit", "scheduledAt": "2026-05-02T11:00:00Z",
                "durationMinutes": 45, "status": "cancelled"}"#,
        )
        .unwrap();
        assert_eq!(meeting.broker_id, None);
        assert_eq!(meeting.status, MeetingStatus::Cancelled);
        assert_eq!(meeting.status.display_name(), "Cancelled");
    }
}
