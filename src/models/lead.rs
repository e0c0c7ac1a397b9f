use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ConfigurationError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub stage: LeadStage,
    pub priority: LeadPriority,
    /// Deal value in rupees
    pub value: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Also read as the last contact date when scoring, since the backend
    /// does not track a separate last-contacted timestamp.
    #[serde(rename = "nextFollowUp", default)]
    pub next_follow_up: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(rename = "brokerId", default)]
    pub broker_id: Option<i64>,
    #[serde(rename = "assignedCallerId", default)]
    pub assigned_caller_id: Option<i64>,
}

impl Lead {
    pub fn has_notes(&self) -> bool {
        self.notes.as_deref().is_some_and(|n| !n.is_empty())
    }

    pub fn last_contact_at(&self) -> DateTime<Utc> {
        self.next_follow_up.unwrap_or(self.created_at)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LeadStage {
    New,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

impl LeadStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStage::New => "new",
            LeadStage::Qualified => "qualified",
            LeadStage::Proposal => "proposal",
            LeadStage::Negotiation => "negotiation",
            LeadStage::Won => "won",
            LeadStage::Lost => "lost",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LeadStage::New => "New",
            LeadStage::Qualified => "Qualified",
            LeadStage::Proposal => "Proposal Sent",
            LeadStage::Negotiation => "Negotiation",
            LeadStage::Won => "Won",
            LeadStage::Lost => "Lost",
        }
    }

    /// Won and lost leads are out of the active pipeline.
    pub fn is_closed(&self) -> bool {
        matches!(self, LeadStage::Won | LeadStage::Lost)
    }

    /// Late pipeline stages where a stalled lead is most costly.
    pub fn is_closing(&self) -> bool {
        matches!(self, LeadStage::Proposal | LeadStage::Negotiation)
    }
}

impl FromStr for LeadStage {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(LeadStage::New),
            "qualified" => Ok(LeadStage::Qualified),
            "proposal" => Ok(LeadStage::Proposal),
            "negotiation" => Ok(LeadStage::Negotiation),
            "won" => Ok(LeadStage::Won),
            "lost" => Ok(LeadStage::Lost),
            _ => Err(ConfigurationError::UnknownStage(s.to_string())),
        }
    }
}

impl TryFrom<String> for LeadStage {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for LeadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LeadPriority {
    Hot,
    Warm,
    Cold,
}

impl LeadPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadPriority::Hot => "hot",
            LeadPriority::Warm => "warm",
            LeadPriority::Cold => "cold",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LeadPriority::Hot => "Hot",
            LeadPriority::Warm => "Warm",
            LeadPriority::Cold => "Cold",
        }
    }
}

impl FromStr for LeadPriority {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hot" => Ok(LeadPriority::Hot),
            "warm" => Ok(LeadPriority::Warm),
            "cold" => Ok(LeadPriority::Cold),
            _ => Err(ConfigurationError::UnknownPriority(s.to_string())),
        }
    }
}

impl TryFrom<String> for LeadPriority {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for LeadPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
