use serde::{Deserialize, Serialize};

/// Derived scoring report for a single lead. Recomputed on demand, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadAnalytics {
    #[serde(rename = "daysSinceCreated")]
    pub days_since_created: i64,
    /// Negative when the follow-up date lies in the future.
    #[serde(rename = "daysSinceLastContact")]
    pub days_since_last_contact: i64,
    #[serde(rename = "callCount")]
    pub call_count: usize,
    /// Mean call duration in seconds, 0 when there are no calls
    #[serde(rename = "avgCallDuration")]
    pub avg_call_duration: f64,
    /// Percentage, 0-100
    #[serde(rename = "conversionProbability")]
    pub conversion_probability: u8,
    #[serde(rename = "suggestedFollowUpDays")]
    pub suggested_follow_up_days: u32,
    /// 0-100
    #[serde(rename = "engagementScore")]
    pub engagement_score: u8,
    #[serde(rename = "recommendedMethod")]
    pub recommended_method: ContactMethod,
    #[serde(rename = "urgencyLevel")]
    pub urgency_level: UrgencyLevel,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    Call,
    Email,
    Sms,
    Whatsapp,
}

impl ContactMethod {
    pub fn display_name(&self) -> &str {
        match self {
            ContactMethod::Call => "Phone Call",
            ContactMethod::Email => "Email",
            ContactMethod::Sms => "SMS",
            ContactMethod::Whatsapp => "WhatsApp",
        }
    }
}

/// Ordered so that `Critical` compares greatest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl UrgencyLevel {
    pub fn display_name(&self) -> &str {
        match self {
            UrgencyLevel::Low => "Low",
            UrgencyLevel::Medium => "Medium",
            UrgencyLevel::High => "High",
            UrgencyLevel::Critical => "Critical",
        }
    }
}
