//! Follow-up recommendations and the caller work queue

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::engine::LeadAnalyticsEngine;
use super::insights::{follow_up_insights_with, FollowUpInsight};
use crate::models::{CallLog, Lead, LeadAnalytics};

/// What to do next about a lead, and when.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowUpRecommendation {
    #[serde(rename = "leadId")]
    pub lead_id: i64,
    #[serde(rename = "leadName")]
    pub lead_name: String,
    #[serde(rename = "leadValue")]
    pub lead_value: f64,
    pub analytics: LeadAnalytics,
    pub insights: Vec<FollowUpInsight>,
    #[serde(rename = "followUpAt")]
    pub follow_up_at: DateTime<Utc>,
}

impl FollowUpRecommendation {
    pub fn insight_messages(&self) -> Vec<String> {
        self.insights.iter().map(ToString::to_string).collect()
    }

    /// Work-queue order: most urgent first, then likeliest to convert,
    /// then largest deal, then lowest lead id.
    pub fn queue_order(&self, other: &Self) -> Ordering {
        other
            .analytics
            .urgency_level
            .cmp(&self.analytics.urgency_level)
            .then_with(|| {
                other
                    .analytics
                    .conversion_probability
                    .cmp(&self.analytics.conversion_probability)
            })
            .then_with(|| other.lead_value.total_cmp(&self.lead_value))
            .then_with(|| self.lead_id.cmp(&other.lead_id))
    }
}

impl LeadAnalyticsEngine {
    /// Insights for `analytics` using this engine's thresholds.
    pub fn insights<'a>(&'a self, analytics: &'a LeadAnalytics) -> impl Iterator<Item = FollowUpInsight> + 'a {
        follow_up_insights_with(analytics, &self.config().insights)
    }

    pub fn recommend(&self, lead: &Lead, calls: &[CallLog], now: DateTime<Utc>) -> FollowUpRecommendation {
        let analytics = self.analyze(lead, calls, now);
        let insights = self.insights(&analytics).collect();
        let follow_up_at = now + Duration::days(i64::from(analytics.suggested_follow_up_days));

        FollowUpRecommendation {
            lead_id: lead.id,
            lead_name: lead.name.clone(),
            lead_value: lead.value,
            analytics,
            insights,
            follow_up_at,
        }
    }

    /// Score every lead and order them for the callers' work queue.
    pub fn rank(&self, leads: &[(Lead, Vec<CallLog>)], now: DateTime<Utc>) -> Vec<FollowUpRecommendation> {
        let mut ranked: Vec<_> = leads
            .iter()
            .map(|(lead, calls)| self.recommend(lead, calls, now))
            .collect();
        ranked.sort_by(FollowUpRecommendation::queue_order);

        tracing::debug!("Ranked {} leads for follow-up", ranked.len());
        ranked
    }
}

/// Rank leads with the default scoring tables.
pub fn rank_leads(leads: &[(Lead, Vec<CallLog>)], now: DateTime<Utc>) -> Vec<FollowUpRecommendation> {
    LeadAnalyticsEngine::default().rank(leads, now)
}
