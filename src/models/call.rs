use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallLog {
    pub id: i64,
    #[serde(rename = "leadId")]
    pub lead_id: i64,
    #[serde(rename = "callerId", default)]
    pub caller_id: Option<i64>,
    /// Duration in seconds
    pub duration: u32,
    #[serde(default)]
    pub outcome: Option<CallOutcome>,
    #[serde(rename = "calledAt")]
    pub called_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    Connected,
    NoAnswer,
    Busy,
    Voicemail,
    WrongNumber,
}

/// Aggregate call statistics used by the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CallSummary {
    pub count: usize,
    pub avg_duration: f64,
}

impl CallSummary {
    pub fn from_logs(calls: &[CallLog]) -> Self {
        if calls.is_empty() {
            return Self::default();
        }

        let total: u64 = calls.iter().map(|c| u64::from(c.duration)).sum();
        Self {
            count: calls.len(),
            avg_duration: total as f64 / calls.len() as f64,
        }
    }
}
