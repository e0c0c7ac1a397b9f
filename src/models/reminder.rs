use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ContactMethod;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    pub id: Uuid,
    #[serde(rename = "leadId")]
    pub lead_id: i64,
    pub kind: ReminderKind,
    pub message: String,
    #[serde(rename = "dueAt")]
    pub due_at: DateTime<Utc>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReminderKind {
    FollowUp {
        method: ContactMethod,
    },
    Meeting {
        #[serde(rename = "meetingId")]
        meeting_id: i64,
        #[serde(rename = "startsAt")]
        starts_at: DateTime<Utc>,
    },
}
