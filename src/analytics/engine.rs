//! Lead scoring
//!
//! Maps a lead and its call history to conversion probability, engagement,
//! the contact channel to use next and how urgently to use it.

use chrono::{DateTime, Utc};

use crate::config::{ConfigurationError, ScoringConfig};
use crate::models::{
    CallLog, CallSummary, ContactMethod, Lead, LeadAnalytics, LeadPriority, LeadStage, UrgencyLevel,
};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Whole days from `since` to `now`, rounded down. Negative when `since` is in the future.
pub fn whole_days_between(now: DateTime<Utc>, since: DateTime<Utc>) -> i64 {
    (now - since).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// Score a lead with the default scoring tables.
pub fn analyze_lead_behavior(lead: &Lead, calls: &[CallLog], now: DateTime<Utc>) -> LeadAnalytics {
    LeadAnalyticsEngine::default().analyze(lead, calls, now)
}

/// Stateless scoring engine over a fixed set of tables
#[derive(Debug, Clone, Default)]
pub struct LeadAnalyticsEngine {
    config: ScoringConfig,
}

impl LeadAnalyticsEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn analyze(&self, lead: &Lead, calls: &[CallLog], now: DateTime<Utc>) -> LeadAnalytics {
        let days_since_created = whole_days_between(now, lead.created_at);
        let days_since_last_contact = whole_days_between(now, lead.last_contact_at());
        let summary = CallSummary::from_logs(calls);

        LeadAnalytics {
            days_since_created,
            days_since_last_contact,
            call_count: summary.count,
            avg_call_duration: summary.avg_duration,
            conversion_probability: self.conversion_probability(lead.stage, lead.priority, days_since_last_contact),
            suggested_follow_up_days: self.config.follow_up_days.days(lead.priority),
            engagement_score: self.engagement_score(lead, &summary, days_since_last_contact),
            recommended_method: self.recommended_method(lead.priority, summary.count, days_since_last_contact),
            urgency_level: self.urgency_level(lead, days_since_last_contact),
        }
    }

    fn conversion_probability(&self, stage: LeadStage, priority: LeadPriority, idle_days: i64) -> u8 {
        let base = self.config.stage_weights.weight(stage)
            * self.config.priority_multipliers.multiplier(priority);
        let decay = (1.0 - idle_days as f64 * self.config.decay_per_day).max(0.0);

        // Future follow-ups push the decay factor above 1, so clamp both ends.
        let probability = (base * decay).clamp(0.0, 1.0);
        (probability * 100.0).round() as u8
    }

    fn engagement_score(&self, lead: &Lead, summary: &CallSummary, idle_days: i64) -> u8 {
        let weights = &self.config.engagement;
        let mut score = u32::from(weights.base);

        if summary.count > weights.many_calls {
            score += u32::from(weights.many_calls_bonus);
        }
        if summary.avg_duration > weights.long_call_secs {
            score += u32::from(weights.long_call_bonus);
        }
        if lead.has_notes() {
            score += u32::from(weights.notes_bonus);
        }
        if idle_days < weights.recent_contact_days {
            score += u32::from(weights.recent_contact_bonus);
        }

        score.min(100) as u8
    }

    fn recommended_method(&self, priority: LeadPriority, call_count: usize, idle_days: i64) -> ContactMethod {
        let thresholds = &self.config.method;
        match priority {
            LeadPriority::Hot => ContactMethod::Call,
            LeadPriority::Warm if call_count > thresholds.warm_sms_after_calls => ContactMethod::Sms,
            LeadPriority::Warm => ContactMethod::Call,
            LeadPriority::Cold if idle_days > thresholds.cold_email_after_days => ContactMethod::Email,
            LeadPriority::Cold => ContactMethod::Whatsapp,
        }
    }

    /// First matching rule wins.
    fn urgency_level(&self, lead: &Lead, idle_days: i64) -> UrgencyLevel {
        let t = &self.config.urgency;

        if idle_days > t.critical_days && lead.stage.is_closing() {
            UrgencyLevel::Critical
        } else if lead.stage == LeadStage::Negotiation && idle_days > t.negotiation_days {
            UrgencyLevel::High
        } else if lead.value > t.high_value && idle_days > t.high_value_days {
            UrgencyLevel::High
        } else if idle_days > t.medium_days {
            UrgencyLevel::Medium
        } else {
            UrgencyLevel::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
    }

    fn lead(stage: LeadStage, priority: LeadPriority, idle_days: i64) -> Lead {
        Lead {
            id: 1,
            name: "Test Lead".to_string(),
            phone: "+911234567890".to_string(),
            email: None,
            stage,
            priority,
            value: 500_000.0,
            created_at: now() - Duration::days(30),
            next_follow_up: Some(now() - Duration::days(idle_days)),
            notes: None,
            broker_id: None,
            assigned_caller_id: None,
        }
    }

    fn calls(durations: &[u32]) -> Vec<CallLog> {
        durations
            .iter()
            .enumerate()
            .map(|(i, &duration)| CallLog {
                id: i as i64,
                lead_id: 1,
                caller_id: Some(4),
                duration,
                outcome: None,
                called_at: now() - Duration::days(1),
            })
            .collect()
    }

    #[test]
    fn test_whole_days_rounds_down() {
        let n = now();
        assert_eq!(whole_days_between(n, n), 0);
        assert_eq!(whole_days_between(n, n - Duration::hours(47)), 1);
        assert_eq!(whole_days_between(n, n - Duration::days(6)), 6);
        assert_eq!(whole_days_between(n, n + Duration::hours(36)), -2);
    }

    #[test]
    fn test_conversion_base_rates() {
        let engine = LeadAnalyticsEngine::default();
        let cases = [
            (LeadStage::New, 15),
            (LeadStage::Qualified, 35),
            (LeadStage::Proposal, 65),
            (LeadStage::Negotiation, 80),
            (LeadStage::Won, 100),
            (LeadStage::Lost, 0),
        ];
        for (stage, expected) in cases {
            let analytics = engine.analyze(&lead(stage, LeadPriority::Warm, 0), &[], now());
            assert_eq!(analytics.conversion_probability, expected, "stage {}", stage);
        }
    }

    #[test]
    fn test_conversion_decays_with_idle_days() {
        let engine = LeadAnalyticsEngine::default();
        // 0.80 * 1.0 * (1 - 4 * 0.05) = 0.64
        let analytics = engine.analyze(&lead(LeadStage::Negotiation, LeadPriority::Warm, 4), &[], now());
        assert_eq!(analytics.conversion_probability, 64);

        // decay floor reached after 20 days
        let analytics = engine.analyze(&lead(LeadStage::Negotiation, LeadPriority::Hot, 25), &[], now());
        assert_eq!(analytics.conversion_probability, 0);
    }

    #[test]
    fn test_conversion_priority_multiplier() {
        let engine = LeadAnalyticsEngine::default();
        let cold = engine.analyze(&lead(LeadStage::Negotiation, LeadPriority::Cold, 0), &[], now());
        // 0.80 * 1.3 * 0.8 = 0.832
        let hot = engine.analyze(&lead(LeadStage::Negotiation, LeadPriority::Hot, 4), &[], now());
        assert_eq!(cold.conversion_probability, 56);
        assert_eq!(hot.conversion_probability, 83);
    }

    #[test]
    fn test_conversion_clamped_to_hundred() {
        let engine = LeadAnalyticsEngine::default();
        // follow-up two days in the future: 1.0 * 1.3 * 1.1 before clamping
        let analytics = engine.analyze(&lead(LeadStage::Won, LeadPriority::Hot, -2), &[], now());
        assert_eq!(analytics.days_since_last_contact, -2);
        assert_eq!(analytics.conversion_probability, 100);
    }

    #[test]
    fn test_suggested_follow_up_days() {
        let engine = LeadAnalyticsEngine::default();
        let days = |p| engine.analyze(&lead(LeadStage::New, p, 0), &[], now()).suggested_follow_up_days;
        assert_eq!(days(LeadPriority::Hot), 0);
        assert_eq!(days(LeadPriority::Warm), 2);
        assert_eq!(days(LeadPriority::Cold), 3);
    }

    #[test]
    fn test_engagement_base_only() {
        let engine = LeadAnalyticsEngine::default();
        let analytics = engine.analyze(&lead(LeadStage::New, LeadPriority::Warm, 2), &[], now());
        assert_eq!(analytics.engagement_score, 50);
    }

    #[test]
    fn test_engagement_all_bonuses_capped() {
        let engine = LeadAnalyticsEngine::default();
        let mut l = lead(LeadStage::Proposal, LeadPriority::Warm, 0);
        l.notes = Some("Interested in 3BHK".to_string());
        let analytics = engine.analyze(&l, &calls(&[400, 400, 400, 400]), now());
        // 50 + 15 + 20 + 10 + 15 = 110
        assert_eq!(analytics.engagement_score, 100);
        assert_eq!(analytics.avg_call_duration, 400.0);
    }

    #[test]
    fn test_engagement_whitespace_notes_earn_bonus() {
        let engine = LeadAnalyticsEngine::default();
        let mut l = lead(LeadStage::New, LeadPriority::Warm, 3);
        assert_eq!(engine.analyze(&l, &[], now()).engagement_score, 50);

        l.notes = Some("  ".to_string());
        assert_eq!(engine.analyze(&l, &[], now()).engagement_score, 60);

        l.notes = Some(String::new());
        assert_eq!(engine.analyze(&l, &[], now()).engagement_score, 50);
    }

    #[test]
    fn test_engagement_thresholds_are_strict() {
        let engine = LeadAnalyticsEngine::default();
        let analytics = engine.analyze(&lead(LeadStage::New, LeadPriority::Warm, 2), &calls(&[300, 300, 300]), now());
        assert_eq!(analytics.engagement_score, 50);
    }

    #[test]
    fn test_recommended_method() {
        let engine = LeadAnalyticsEngine::default();
        let method = |p, idle, n: usize| {
            engine
                .analyze(&lead(LeadStage::Qualified, p, idle), &calls(&vec![60; n]), now())
                .recommended_method
        };
        assert_eq!(method(LeadPriority::Hot, 10, 5), ContactMethod::Call);
        assert_eq!(method(LeadPriority::Warm, 0, 2), ContactMethod::Call);
        assert_eq!(method(LeadPriority::Warm, 0, 3), ContactMethod::Sms);
        assert_eq!(method(LeadPriority::Cold, 7, 0), ContactMethod::Whatsapp);
        assert_eq!(method(LeadPriority::Cold, 8, 0), ContactMethod::Email);
    }

    #[test]
    fn test_urgency_precedence() {
        let engine = LeadAnalyticsEngine::default();
        let urgency = |l: &Lead| engine.analyze(l, &[], now()).urgency_level;

        assert_eq!(urgency(&lead(LeadStage::Proposal, LeadPriority::Cold, 6)), UrgencyLevel::Critical);
        assert_eq!(urgency(&lead(LeadStage::Proposal, LeadPriority::Cold, 5)), UrgencyLevel::Medium);
        assert_eq!(urgency(&lead(LeadStage::Negotiation, LeadPriority::Warm, 3)), UrgencyLevel::High);
        assert_eq!(urgency(&lead(LeadStage::Negotiation, LeadPriority::Warm, 2)), UrgencyLevel::Low);

        let mut big = lead(LeadStage::Qualified, LeadPriority::Warm, 4);
        big.value = 10_000_001.0;
        assert_eq!(urgency(&big), UrgencyLevel::High);
        big.value = 10_000_000.0;
        assert_eq!(urgency(&big), UrgencyLevel::Medium);

        assert_eq!(urgency(&lead(LeadStage::New, LeadPriority::Hot, 3)), UrgencyLevel::Low);
        // won and lost leads never become critical
        assert_eq!(urgency(&lead(LeadStage::Won, LeadPriority::Hot, 30)), UrgencyLevel::Medium);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = ScoringConfig::default();
        config.decay_per_day = -1.0;
        assert!(LeadAnalyticsEngine::new(config).is_err());
    }

    #[test]
    fn test_new_rejects_unbounded_follow_up_days() {
        let mut config = ScoringConfig::default();
        config.follow_up_days.cold = u32::MAX;
        assert!(LeadAnalyticsEngine::new(config).is_err());
    }

    #[test]
    fn test_custom_decay() {
        let mut config = ScoringConfig::default();
        config.decay_per_day = 0.1;
        let engine = LeadAnalyticsEngine::new(config).unwrap();
        // 0.80 * 1.0 * (1 - 3 * 0.1) = 0.56
        let analytics = engine.analyze(&lead(LeadStage::Negotiation, LeadPriority::Warm, 3), &[], now());
        assert_eq!(analytics.conversion_probability, 56);
    }
}
