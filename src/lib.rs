//! Lead Insights
//!
//! Lead scoring and follow-up recommendations for the sales CRM: conversion
//! probability, engagement, preferred contact channel and urgency for each
//! lead, plus reminders for follow-ups and broker meetings.
//!
//! The models and analytics build for wasm as well; the reminder service
//! needs the tokio runtime and is native only.

pub mod analytics;
pub mod api;
pub mod config;
pub mod models;

#[cfg(not(target_arch = "wasm32"))]
pub mod reminders;

pub use analytics::{analyze_lead_behavior, get_follow_up_insights, LeadAnalyticsEngine};
pub use config::{ConfigurationError, ScoringConfig};
