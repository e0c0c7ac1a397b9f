//! Follow-up and meeting reminders
//!
//! This module schedules reminders from lead analytics and upcoming meetings
//! and delivers them once due:
//! - Follow-up reminders timed by the lead's suggested follow-up delay
//! - Meeting reminders a configurable lead time before the start
//! - Periodic dispatch through a pluggable notifier
//!
//! The service is an ordinary value built with its clock and notifier, so
//! several can coexist and tests can drive time by hand.

pub mod clock;
pub mod notifier;

pub use clock::{Clock, ManualClock, SystemClock};
pub use notifier::{ApiNotifier, LogNotifier, Notifier, NotifyError};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use tokio::sync::RwLock;
use tokio::time::interval;
use uuid::Uuid;

use crate::config::{AppConfig, MAX_MEETING_REMINDER_MINUTES};
use crate::models::{Lead, LeadAnalytics, Meeting, MeetingStatus, Reminder, ReminderKind};

/// Reminder service settings
#[derive(Debug, Clone)]
pub struct ReminderConfig {
    /// How often due reminders are dispatched
    pub poll_interval: std::time::Duration,
    /// How long before a meeting its reminder fires
    pub meeting_lead_time: Duration,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            poll_interval: std::time::Duration::from_secs(60),
            meeting_lead_time: Duration::minutes(30),
        }
    }
}

impl From<&AppConfig> for ReminderConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            poll_interval: std::time::Duration::from_secs(config.reminder_poll_secs.max(1)),
            meeting_lead_time: Duration::minutes(
                config.meeting_reminder_minutes.clamp(0, MAX_MEETING_REMINDER_MINUTES),
            ),
        }
    }
}

/// Reminder errors
#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error("Reminder not found: {0}")]
    NotFound(Uuid),
}

pub struct ReminderService<C: Clock, N: Notifier> {
    config: ReminderConfig,
    clock: C,
    notifier: N,
    reminders: Arc<RwLock<HashMap<Uuid, Reminder>>>,
    shutdown: Arc<RwLock<bool>>,
}

impl<C: Clock, N: Notifier> ReminderService<C, N> {
    pub fn new(config: ReminderConfig, clock: C, notifier: N) -> Self {
        Self {
            config,
            clock,
            notifier,
            reminders: Arc::new(RwLock::new(HashMap::new())),
            shutdown: Arc::new(RwLock::new(false)),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Schedule the next follow-up for a lead, replacing any pending one.
    pub async fn schedule_follow_up(&self, lead: &Lead, analytics: &LeadAnalytics) -> Reminder {
        let now = self.clock.now();
        let reminder = Reminder {
            id: Uuid::new_v4(),
            lead_id: lead.id,
            kind: ReminderKind::FollowUp {
                method: analytics.recommended_method,
            },
            message: format!(
                "Follow up with {} ({}, {}) by {} ({} urgency)",
                lead.name,
                lead.stage.display_name(),
                lead.priority.display_name(),
                analytics.recommended_method.display_name(),
                analytics.urgency_level.display_name()
            ),
            due_at: now + Duration::days(i64::from(analytics.suggested_follow_up_days)),
            created_at: now,
        };

        let mut reminders = self.reminders.write().await;
        reminders.retain(|_, r| !(r.lead_id == lead.id && matches!(r.kind, ReminderKind::FollowUp { .. })));
        reminders.insert(reminder.id, reminder.clone());

        tracing::info!("Scheduled follow-up for lead {} at {}", lead.id, reminder.due_at);
        reminder
    }

    /// Schedule a reminder ahead of a meeting. Returns `None` for meetings
    /// that are not scheduled or have already started.
    pub async fn schedule_meeting(&self, meeting: &Meeting) -> Option<Reminder> {
        let now = self.clock.now();
        if meeting.status != MeetingStatus::Scheduled {
            tracing::debug!("Skipping reminder for {} meeting {}", meeting.status.display_name(), meeting.id);
            return None;
        }
        if meeting.scheduled_at <= now {
            tracing::debug!("Skipping reminder for meeting {}: already started", meeting.id);
            return None;
        }

        let reminder = Reminder {
            id: Uuid::new_v4(),
            lead_id: meeting.lead_id,
            kind: ReminderKind::Meeting {
                meeting_id: meeting.id,
                starts_at: meeting.scheduled_at,
            },
            message: format!(
                "Meeting '{}' starts at {}",
                meeting.title,
                meeting.scheduled_at.format("%Y-%m-%d %H:%M UTC")
            ),
            due_at: (meeting.scheduled_at - self.config.meeting_lead_time).max(now),
            created_at: now,
        };

        let mut reminders = self.reminders.write().await;
        reminders.retain(|_, r| !matches!(r.kind, ReminderKind::Meeting { meeting_id, .. } if meeting_id == meeting.id));
        reminders.insert(reminder.id, reminder.clone());

        tracing::info!("Scheduled reminder for meeting {} at {}", meeting.id, reminder.due_at);
        Some(reminder)
    }

    pub async fn cancel(&self, id: Uuid) -> Result<Reminder, ReminderError> {
        let removed = self.reminders.write().await.remove(&id);
        match removed {
            Some(reminder) => {
                tracing::info!("Cancelled reminder {}", id);
                Ok(reminder)
            }
            None => Err(ReminderError::NotFound(id)),
        }
    }

    /// All pending reminders, earliest first
    pub async fn pending(&self) -> Vec<Reminder> {
        let mut pending: Vec<Reminder> = self.reminders.read().await.values().cloned().collect();
        pending.sort_by(|a, b| a.due_at.cmp(&b.due_at).then_with(|| a.lead_id.cmp(&b.lead_id)));
        pending
    }

    /// Pending reminders whose due time has passed
    pub async fn due(&self) -> Vec<Reminder> {
        let now = self.clock.now();
        self.pending()
            .await
            .into_iter()
            .filter(|r| r.is_due(now))
            .collect()
    }

    /// Deliver every due reminder. Returns the number delivered.
    /// Reminders that fail to deliver stay pending for the next pass.
    pub async fn dispatch_due(&self) -> usize {
        let mut delivered = 0;

        for reminder in self.due().await {
            match self.notifier.notify(&reminder).await {
                Ok(()) => {
                    self.reminders.write().await.remove(&reminder.id);
                    delivered += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to deliver reminder {} for lead {}: {}", reminder.id, reminder.lead_id, e);
                }
            }
        }

        if delivered > 0 {
            tracing::info!("Delivered {} reminders", delivered);
        }
        delivered
    }

    /// Dispatch loop. Runs until `shutdown` is called.
    pub async fn run(&self) {
        let mut ticker = interval(self.config.poll_interval);
        tracing::info!("Reminder dispatcher started (every {:?})", self.config.poll_interval);

        loop {
            ticker.tick().await;

            if *self.shutdown.read().await {
                break;
            }

            self.dispatch_due().await;
        }

        tracing::info!("Reminder dispatcher stopped");
    }

    pub async fn shutdown(&self) {
        *self.shutdown.write().await = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::LeadAnalyticsEngine;
    use crate::models::{LeadPriority, LeadStage};
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Reminder>>,
    }

    impl RecordingNotifier {
        fn sent(&self) -> Vec<Reminder> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, reminder: &Reminder) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(reminder.clone());
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _reminder: &Reminder) -> Result<(), NotifyError> {
            Err(NotifyError::Delivery("backend unavailable".to_string()))
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 20, 9, 0, 0).unwrap()
    }

    fn service<N: Notifier>(notifier: N) -> ReminderService<ManualClock, N> {
        ReminderService::new(ReminderConfig::default(), ManualClock::new(start()), notifier)
    }

    fn lead(id: i64, priority: LeadPriority) -> Lead {
        Lead {
            id,
            name: format!("Lead {}", id),
            phone: "+919700000000".to_string(),
            email: None,
            stage: LeadStage::Qualified,
            priority,
            value: 750_000.0,
            created_at: start() - Duration::days(2),
            next_follow_up: None,
            notes: None,
            broker_id: None,
            assigned_caller_id: None,
        }
    }

    fn meeting(id: i64, starts_in: Duration, status: MeetingStatus) -> Meeting {
        Meeting {
            id,
            lead_id: 1,
            broker_id: Some(3),
            title: "Site visit".to_string(),
            scheduled_at: start() + starts_in,
            duration_minutes: 60,
            location: Some("Whitefield".to_string()),
            status,
        }
    }

    fn analytics_for(lead: &Lead, now: DateTime<Utc>) -> LeadAnalytics {
        LeadAnalyticsEngine::default().analyze(lead, &[], now)
    }

    #[tokio::test]
    async fn test_follow_up_due_after_suggested_days() {
        let svc = service(RecordingNotifier::default());
        let l = lead(1, LeadPriority::Warm);

        let reminder = svc.schedule_follow_up(&l, &analytics_for(&l, start())).await;
        assert_eq!(reminder.due_at, start() + Duration::days(2));
        assert_eq!(reminder.message, "Follow up with Lead 1 (Qualified, Warm) by Phone Call (Low urgency)");
        assert!(svc.due().await.is_empty());

        svc.clock().advance(Duration::days(2));
        assert_eq!(svc.due().await.len(), 1);
    }

    #[tokio::test]
    async fn test_hot_lead_follow_up_is_immediate() {
        let svc = service(RecordingNotifier::default());
        let l = lead(2, LeadPriority::Hot);

        svc.schedule_follow_up(&l, &analytics_for(&l, start())).await;
        assert_eq!(svc.dispatch_due().await, 1);
        assert_eq!(svc.notifier().sent().len(), 1);
        assert!(svc.pending().await.is_empty());
    }

    #[tokio::test]
    async fn test_rescheduling_replaces_pending_follow_up() {
        let svc = service(RecordingNotifier::default());
        let l = lead(3, LeadPriority::Cold);
        let analytics = analytics_for(&l, start());

        let first = svc.schedule_follow_up(&l, &analytics).await;
        let second = svc.schedule_follow_up(&l, &analytics).await;

        let pending = svc.pending().await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, second.id);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_meeting_reminder_lead_time() {
        let svc = service(RecordingNotifier::default());

        let reminder = svc
            .schedule_meeting(&meeting(10, Duration::hours(2), MeetingStatus::Scheduled))
            .await
            .unwrap();
        assert_eq!(reminder.due_at, start() + Duration::minutes(90));
        assert!(matches!(reminder.kind, ReminderKind::Meeting { meeting_id: 10, .. }));
    }

    #[tokio::test]
    async fn test_meeting_inside_lead_time_is_due_now() {
        let svc = service(RecordingNotifier::default());

        let reminder = svc
            .schedule_meeting(&meeting(11, Duration::minutes(10), MeetingStatus::Scheduled))
            .await
            .unwrap();
        assert_eq!(reminder.due_at, start());
    }

    #[tokio::test]
    async fn test_meeting_skipped_when_started_or_cancelled() {
        let svc = service(RecordingNotifier::default());

        assert!(svc
            .schedule_meeting(&meeting(12, Duration::minutes(-5), MeetingStatus::Scheduled))
            .await
            .is_none());
        assert!(svc
            .schedule_meeting(&meeting(13, Duration::hours(3), MeetingStatus::Cancelled))
            .await
            .is_none());
        assert!(svc.pending().await.is_empty());
    }

    #[tokio::test]
    async fn test_cancel() {
        let svc = service(RecordingNotifier::default());
        let l = lead(4, LeadPriority::Warm);
        let reminder = svc.schedule_follow_up(&l, &analytics_for(&l, start())).await;

        assert_eq!(svc.cancel(reminder.id).await.unwrap().lead_id, 4);
        assert!(matches!(svc.cancel(reminder.id).await, Err(ReminderError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_delivery_stays_pending() {
        let svc = service(FailingNotifier);
        let l = lead(5, LeadPriority::Hot);
        svc.schedule_follow_up(&l, &analytics_for(&l, start())).await;

        assert_eq!(svc.dispatch_due().await, 0);
        assert_eq!(svc.pending().await.len(), 1);
    }

    #[tokio::test]
    async fn test_pending_sorted_by_due_time() {
        let svc = service(RecordingNotifier::default());
        let cold = lead(6, LeadPriority::Cold);
        let hot = lead(7, LeadPriority::Hot);
        svc.schedule_follow_up(&cold, &analytics_for(&cold, start())).await;
        svc.schedule_follow_up(&hot, &analytics_for(&hot, start())).await;

        let ids: Vec<i64> = svc.pending().await.iter().map(|r| r.lead_id).collect();
        assert_eq!(ids, vec![7, 6]);
    }

    #[tokio::test]
    async fn test_run_dispatches_until_shutdown() {
        let config = ReminderConfig {
            poll_interval: std::time::Duration::from_millis(10),
            ..ReminderConfig::default()
        };
        let svc = Arc::new(ReminderService::new(
            config,
            ManualClock::new(start()),
            RecordingNotifier::default(),
        ));
        let l = lead(8, LeadPriority::Hot);
        svc.schedule_follow_up(&l, &analytics_for(&l, start())).await;

        let runner = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.run().await })
        };

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        svc.shutdown().await;
        tokio::time::timeout(std::time::Duration::from_secs(1), runner)
            .await
            .expect("dispatcher did not stop")
            .unwrap();

        assert_eq!(svc.notifier().sent().len(), 1);
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig {
            reminder_poll_secs: 0,
            meeting_reminder_minutes: 15,
            ..AppConfig::default()
        };
        let config = ReminderConfig::from(&app);
        assert_eq!(config.poll_interval, std::time::Duration::from_secs(1));
        assert_eq!(config.meeting_lead_time, Duration::minutes(15));
    }

    #[test]
    fn test_config_lead_time_stays_in_range() {
        let huge = AppConfig {
            meeting_reminder_minutes: i64::MAX / 10,
            ..AppConfig::default()
        };
        assert_eq!(
            ReminderConfig::from(&huge).meeting_lead_time,
            Duration::minutes(MAX_MEETING_REMINDER_MINUTES)
        );

        let negative = AppConfig {
            meeting_reminder_minutes: -30,
            ..AppConfig::default()
        };
        assert_eq!(ReminderConfig::from(&negative).meeting_lead_time, Duration::zero());
    }
}
