use async_trait::async_trait;

use crate::api::{reminders, ApiClient, ApiError};
use crate::models::Reminder;

/// Delivers a due reminder to whoever needs to act on it
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, reminder: &Reminder) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Writes reminders to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, reminder: &Reminder) -> Result<(), NotifyError> {
        tracing::info!(
            lead_id = reminder.lead_id,
            due_at = %reminder.due_at,
            "Reminder: {}",
            reminder.message
        );
        Ok(())
    }
}

/// Hands reminders to the CRM backend
#[derive(Clone)]
pub struct ApiNotifier {
    client: ApiClient,
}

impl ApiNotifier {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for ApiNotifier {
    async fn notify(&self, reminder: &Reminder) -> Result<(), NotifyError> {
        reminders::create_reminder(&self.client, reminder).await?;
        tracing::debug!("Posted reminder {} for lead {}", reminder.id, reminder.lead_id);
        Ok(())
    }
}
