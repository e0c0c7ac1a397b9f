use crate::api::{ApiClient, ApiError};
use crate::models::Meeting;

pub async fn get_upcoming_meetings(client: &ApiClient) -> Result<Vec<Meeting>, ApiError> {
    client.get("/api/meetings/upcoming").await
}
