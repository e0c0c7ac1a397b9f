//! Lead analytics
//!
//! Pure scoring of leads from their pipeline stage, priority, call history
//! and time since last contact. Nothing here performs I/O or reads the
//! system clock; callers pass `now` explicitly.

pub mod engine;
pub mod insights;
pub mod recommendation;

pub use engine::{analyze_lead_behavior, whole_days_between, LeadAnalyticsEngine};
pub use insights::{follow_up_insights, follow_up_insights_with, get_follow_up_insights, FollowUpInsight};
pub use recommendation::{rank_leads, FollowUpRecommendation};
