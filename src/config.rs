//! Configuration
//!
//! Scoring tables for the analytics engine and runtime settings for the
//! CLI and reminder service.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{LeadPriority, LeadStage};

/// Longest follow-up delay a scoring table may suggest
pub const MAX_FOLLOW_UP_DAYS: u32 = 365;

/// Longest meeting reminder lead time (one week)
pub const MAX_MEETING_REMINDER_MINUTES: i64 = 7 * 24 * 60;

/// Errors raised while reading configuration or typed enum values
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Unknown lead stage: {0}")]
    UnknownStage(String),

    #[error("Unknown lead priority: {0}")]
    UnknownPriority(String),

    #[error("Invalid scoring configuration: {0}")]
    InvalidScoring(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Base conversion rate per pipeline stage (0.0 - 1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageWeights {
    pub new: f64,
    pub qualified: f64,
    pub proposal: f64,
    pub negotiation: f64,
    pub won: f64,
    pub lost: f64,
}

impl Default for StageWeights {
    fn default() -> Self {
        Self {
            new: 0.15,
            qualified: 0.35,
            proposal: 0.65,
            negotiation: 0.80,
            won: 1.00,
            lost: 0.00,
        }
    }
}

impl StageWeights {
    pub fn weight(&self, stage: LeadStage) -> f64 {
        match stage {
            LeadStage::New => self.new,
            LeadStage::Qualified => self.qualified,
            LeadStage::Proposal => self.proposal,
            LeadStage::Negotiation => self.negotiation,
            LeadStage::Won => self.won,
            LeadStage::Lost => self.lost,
        }
    }

    fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("new", self.new),
            ("qualified", self.qualified),
            ("proposal", self.proposal),
            ("negotiation", self.negotiation),
            ("won", self.won),
            ("lost", self.lost),
        ]
    }
}

/// Multiplier applied to the stage weight per priority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityMultipliers {
    pub hot: f64,
    pub warm: f64,
    pub cold: f64,
}

impl Default for PriorityMultipliers {
    fn default() -> Self {
        Self {
            hot: 1.3,
            warm: 1.0,
            cold: 0.7,
        }
    }
}

impl PriorityMultipliers {
    pub fn multiplier(&self, priority: LeadPriority) -> f64 {
        match priority {
            LeadPriority::Hot => self.hot,
            LeadPriority::Warm => self.warm,
            LeadPriority::Cold => self.cold,
        }
    }
}

/// Days until the next follow-up per priority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowUpDays {
    pub hot: u32,
    pub warm: u32,
    pub cold: u32,
}

impl Default for FollowUpDays {
    fn default() -> Self {
        Self {
            hot: 0,
            warm: 2,
            cold: 3,
        }
    }
}

impl FollowUpDays {
    pub fn days(&self, priority: LeadPriority) -> u32 {
        match priority {
            LeadPriority::Hot => self.hot,
            LeadPriority::Warm => self.warm,
            LeadPriority::Cold => self.cold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementWeights {
    pub base: u8,
    /// Bonus applies when the call count exceeds this
    pub many_calls: usize,
    pub many_calls_bonus: u8,
    /// Bonus applies when the average call exceeds this many seconds
    pub long_call_secs: f64,
    pub long_call_bonus: u8,
    pub notes_bonus: u8,
    /// Bonus applies when the last contact is fewer than this many days ago
    pub recent_contact_days: i64,
    pub recent_contact_bonus: u8,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self {
            base: 50,
            many_calls: 3,
            many_calls_bonus: 15,
            long_call_secs: 300.0,
            long_call_bonus: 20,
            notes_bonus: 10,
            recent_contact_days: 2,
            recent_contact_bonus: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyThresholds {
    /// Closing-stage leads idle longer than this are critical
    pub critical_days: i64,
    pub negotiation_days: i64,
    /// Deal value in rupees above which a lead counts as high value
    pub high_value: f64,
    pub high_value_days: i64,
    pub medium_days: i64,
}

impl Default for UrgencyThresholds {
    fn default() -> Self {
        Self {
            critical_days: 5,
            negotiation_days: 2,
            high_value: 10_000_000.0,
            high_value_days: 3,
            medium_days: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodThresholds {
    /// Warm leads switch to SMS once called more than this many times
    pub warm_sms_after_calls: usize,
    /// Cold leads switch to email once idle more than this many days
    pub cold_email_after_days: i64,
}

impl Default for MethodThresholds {
    fn default() -> Self {
        Self {
            warm_sms_after_calls: 2,
            cold_email_after_days: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightThresholds {
    pub closing_probability: u8,
    pub reconnect_days: i64,
    pub strong_engagement_secs: f64,
    pub low_engagement_score: u8,
}

impl InsightThresholds {
    pub const DEFAULT: Self = Self {
        closing_probability: 70,
        reconnect_days: 5,
        strong_engagement_secs: 300.0,
        low_engagement_score: 30,
    };
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Lookup tables and thresholds for lead scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub stage_weights: StageWeights,
    pub priority_multipliers: PriorityMultipliers,
    /// Fraction of conversion probability lost per day without contact
    pub decay_per_day: f64,
    pub follow_up_days: FollowUpDays,
    pub engagement: EngagementWeights,
    pub urgency: UrgencyThresholds,
    pub method: MethodThresholds,
    pub insights: InsightThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            stage_weights: StageWeights::default(),
            priority_multipliers: PriorityMultipliers::default(),
            decay_per_day: 0.05,
            follow_up_days: FollowUpDays::default(),
            engagement: EngagementWeights::default(),
            urgency: UrgencyThresholds::default(),
            method: MethodThresholds::default(),
            insights: InsightThresholds::default(),
        }
    }
}

impl ScoringConfig {
    /// Load overrides from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!("Loaded scoring config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (stage, weight) in self.stage_weights.entries() {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(ConfigurationError::InvalidScoring(format!(
                    "stage weight for '{}' must be between 0 and 1, got {}",
                    stage, weight
                )));
            }
        }

        let multipliers = &self.priority_multipliers;
        for (priority, value) in [("hot", multipliers.hot), ("warm", multipliers.warm), ("cold", multipliers.cold)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidScoring(format!(
                    "priority multiplier for '{}' must be non-negative, got {}",
                    priority, value
                )));
            }
        }

        if !self.decay_per_day.is_finite() || self.decay_per_day < 0.0 {
            return Err(ConfigurationError::InvalidScoring(format!(
                "decay per day must be non-negative, got {}",
                self.decay_per_day
            )));
        }

        let days = &self.follow_up_days;
        for (priority, value) in [("hot", days.hot), ("warm", days.warm), ("cold", days.cold)] {
            if value > MAX_FOLLOW_UP_DAYS {
                return Err(ConfigurationError::InvalidScoring(format!(
                    "follow-up days for '{}' must be at most {}, got {}",
                    priority, MAX_FOLLOW_UP_DAYS, value
                )));
            }
        }

        let thresholds = [
            ("engagement.long_call_secs", self.engagement.long_call_secs),
            ("urgency.high_value", self.urgency.high_value),
            ("insights.strong_engagement_secs", self.insights.strong_engagement_secs),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() {
                return Err(ConfigurationError::InvalidScoring(format!(
                    "{} must be a finite number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// Where reminder notifications are delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifierKind {
    #[default]
    Log,
    Api,
}

/// Runtime settings for the CLI
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the CRM backend
    pub api_url: String,
    pub api_token: Option<String>,
    pub scoring: ScoringConfig,
    pub reminder_poll_secs: u64,
    pub meeting_reminder_minutes: i64,
    pub notifier: NotifierKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            api_token: None,
            scoring: ScoringConfig::default(),
            reminder_poll_secs: 60,
            meeting_reminder_minutes: 30,
            notifier: NotifierKind::Log,
        }
    }
}

impl AppConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let defaults = Self::default();

        let scoring = match std::env::var("SCORING_CONFIG_PATH") {
            Ok(path) => ScoringConfig::from_json_file(path)?,
            Err(_) => ScoringConfig::default(),
        };

        let notifier = match std::env::var("NOTIFIER")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "" | "log" => NotifierKind::Log,
            "api" => NotifierKind::Api,
            other => {
                return Err(ConfigurationError::InvalidVar {
                    name: "NOTIFIER",
                    value: other.to_string(),
                })
            }
        };

        let config = Self {
            api_url: std::env::var("API_URL").unwrap_or(defaults.api_url),
            api_token: std::env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),
            scoring,
            reminder_poll_secs: parse_var("REMINDER_POLL_SECS", defaults.reminder_poll_secs)?,
            meeting_reminder_minutes: parse_var("MEETING_REMINDER_MINUTES", defaults.meeting_reminder_minutes)?,
            notifier,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate runtime settings
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(0..=MAX_MEETING_REMINDER_MINUTES).contains(&self.meeting_reminder_minutes) {
            return Err(ConfigurationError::InvalidVar {
                name: "MEETING_REMINDER_MINUTES",
                value: self.meeting_reminder_minutes.to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigurationError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigurationError::InvalidVar { name, value }),
        Err(_) => Ok(default),
    }
}
