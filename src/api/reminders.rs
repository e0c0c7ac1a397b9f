use crate::api::{ApiClient, ApiError};
use crate::models::Reminder;

pub async fn create_reminder(client: &ApiClient, reminder: &Reminder) -> Result<Reminder, ApiError> {
    client.post("/api/reminders", reminder).await
}
