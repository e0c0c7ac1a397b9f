use crate::api::{ApiClient, ApiError};
use crate::models::{CallLog, Lead};

pub async fn get_leads(client: &ApiClient) -> Result<Vec<Lead>, ApiError> {
    client.get("/api/leads").await
}

pub async fn get_lead(client: &ApiClient, id: i64) -> Result<Lead, ApiError> {
    client.get(&format!("/api/leads/{}", id)).await
}

pub async fn get_call_logs(client: &ApiClient, lead_id: i64) -> Result<Vec<CallLog>, ApiError> {
    client.get(&format!("/api/leads/{}/calls", lead_id)).await
}

/// Every lead together with its call history.
pub async fn get_leads_with_calls(client: &ApiClient) -> Result<Vec<(Lead, Vec<CallLog>)>, ApiError> {
    let leads = get_leads(client).await?;
    let mut result = Vec::with_capacity(leads.len());

    for lead in leads {
        let calls = get_call_logs(client, lead.id).await?;
        result.push((lead, calls));
    }

    Ok(result)
}
