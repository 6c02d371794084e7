//! Data models for the EcoPickup API

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{ChatMessage, SubmissionStatus, WasteCategory};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;

/// One e-waste line within a submission request.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemInput {
    pub category: WasteCategory,
    pub quantity: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request to create a new pickup submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubmissionRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(rename = "pickupDate")]
    pub pickup_date: NaiveDate,
    pub items: Vec<ItemInput>,
}

/// Item as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ItemResponse {
    pub id: i64,
    pub category: WasteCategory,
    pub quantity: i64,
    pub description: Option<String>,
}

/// Submission as returned by the API, items nested in insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(rename = "pickupDate")]
    pub pickup_date: NaiveDate,
    pub status: SubmissionStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub items: Vec<ItemResponse>,
}

/// Response from submission creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSubmissionResponse {
    pub success: bool,
    pub submission: SubmissionResponse,
}

/// Response from submission listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListSubmissionsResponse {
    pub submissions: Vec<SubmissionResponse>,
}

/// Request to update a submission's status.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub id: String,
    pub status: SubmissionStatus,
}

/// Response from a status update.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateStatusResponse {
    pub submission: SubmissionResponse,
}

/// Request to the classification chat.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(rename = "conversationId")]
    pub conversation_id: Option<Uuid>,
    pub message: String,
}

/// Response from the classification chat.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    #[serde(rename = "conversationId")]
    pub conversation_id: Uuid,
    pub response: ChatMessage,
}

/// Submission row as stored in the database.
#[derive(Debug, Clone, FromRow)]
pub struct DbSubmission {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub pickup_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Item row as stored in the database.
#[derive(Debug, Clone, FromRow)]
pub struct DbItem {
    pub id: i64,
    pub submission_id: String,
    pub category: String,
    pub quantity: i64,
    pub description: Option<String>,
}

impl SubmissionResponse {
    /// Assemble the API shape from store rows, re-checking the enum fields.
    /// A row that fails to parse indicates a write that bypassed validation.
    pub fn from_rows(submission: DbSubmission, items: Vec<DbItem>) -> Result<Self, ApiError> {
        let status: SubmissionStatus = submission
            .status
            .parse()
            .map_err(|e| ApiError::Internal(anyhow::Error::new(e)))?;

        let items = items
            .into_iter()
            .map(|item| {
                let category: WasteCategory = item
                    .category
                    .parse()
                    .map_err(|e| ApiError::Internal(anyhow::Error::new(e)))?;
                Ok(ItemResponse {
                    id: item.id,
                    category,
                    quantity: item.quantity,
                    description: item.description,
                })
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        Ok(Self {
            id: submission.id,
            name: submission.name,
            email: submission.email,
            phone: submission.phone,
            address: submission.address,
            pickup_date: submission.pickup_date,
            status,
            created_at: submission.created_at,
            items,
        })
    }
}
