//! Advisory notes derived from a lead's analytics

use serde::{Deserialize, Serialize};

use crate::config::InsightThresholds;
use crate::models::{LeadAnalytics, UrgencyLevel};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FollowUpInsight {
    ImmediateAttention,
    PrioritizeForClosing,
    ReconnectUrgently { days: i64 },
    StrongEngagement,
    TryDifferentApproach,
}

impl std::fmt::Display for FollowUpInsight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FollowUpInsight::ImmediateAttention => {
                write!(f, "Critical: this lead requires immediate attention")
            }
            FollowUpInsight::PrioritizeForClosing => {
                write!(f, "High conversion probability: prioritize for closing")
            }
            FollowUpInsight::ReconnectUrgently { days } => {
                write!(f, "No contact for {} days: reconnect urgently", days)
            }
            FollowUpInsight::StrongEngagement => {
                write!(f, "Long average call duration shows strong engagement")
            }
            FollowUpInsight::TryDifferentApproach => {
                write!(f, "Low engagement: try a different approach")
            }
        }
    }
}

type InsightCheck = fn(&LeadAnalytics, &InsightThresholds) -> Option<FollowUpInsight>;

/// Evaluated independently, in this order.
static CHECKS: [InsightCheck; 5] = [
    immediate_attention,
    prioritize_for_closing,
    reconnect_urgently,
    strong_engagement,
    try_different_approach,
];

fn immediate_attention(a: &LeadAnalytics, _: &InsightThresholds) -> Option<FollowUpInsight> {
    (a.urgency_level == UrgencyLevel::Critical).then_some(FollowUpInsight::ImmediateAttention)
}

fn prioritize_for_closing(a: &LeadAnalytics, t: &InsightThresholds) -> Option<FollowUpInsight> {
    (a.conversion_probability > t.closing_probability).then_some(FollowUpInsight::PrioritizeForClosing)
}

fn reconnect_urgently(a: &LeadAnalytics, t: &InsightThresholds) -> Option<FollowUpInsight> {
    (a.days_since_last_contact > t.reconnect_days).then_some(FollowUpInsight::ReconnectUrgently {
        days: a.days_since_last_contact,
    })
}

fn strong_engagement(a: &LeadAnalytics, t: &InsightThresholds) -> Option<FollowUpInsight> {
    (a.avg_call_duration > t.strong_engagement_secs).then_some(FollowUpInsight::StrongEngagement)
}

fn try_different_approach(a: &LeadAnalytics, t: &InsightThresholds) -> Option<FollowUpInsight> {
    (a.engagement_score < t.low_engagement_score).then_some(FollowUpInsight::TryDifferentApproach)
}

/// Lazily yields the insights that apply to `analytics`.
pub fn follow_up_insights_with<'a>(
    analytics: &'a LeadAnalytics,
    thresholds: &'a InsightThresholds,
) -> impl Iterator<Item = FollowUpInsight> + 'a {
    CHECKS.iter().filter_map(move |check| check(analytics, thresholds))
}

pub fn follow_up_insights(analytics: &LeadAnalytics) -> impl Iterator<Item = FollowUpInsight> + '_ {
    static DEFAULT_THRESHOLDS: InsightThresholds = InsightThresholds::DEFAULT;
    follow_up_insights_with(analytics, &DEFAULT_THRESHOLDS)
}

/// Insight messages for display, in evaluation order.
pub fn get_follow_up_insights(analytics: &LeadAnalytics) -> Vec<String> {
    follow_up_insights(analytics).map(|insight| insight.to_string()).collect()
}
