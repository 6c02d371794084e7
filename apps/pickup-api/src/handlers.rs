//! HTTP handlers for the EcoPickup API

use std::collections::HashMap;
use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use shared_types::{ChatMessage, SubmissionStatus};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "pickup-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: POST /api/submissions
///
/// Persists the submission and its items in one transaction; readers never
/// observe the parent row without its items.
pub async fn create_submission(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSubmissionRequest>,
) -> Result<Json<CreateSubmissionResponse>, ApiError> {
    validate_submission(&req)?;

    let submission_id = Uuid::new_v4().to_string();
    let now = Utc::now();

    let mut tx = state.db.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO submissions (id, name, email, phone, address, pickup_date, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, 'pending', ?)
        "#,
    )
    .bind(&submission_id)
    .bind(&req.name)
    .bind(&req.email)
    .bind(&req.phone)
    .bind(&req.address)
    .bind(req.pickup_date.to_string())
    .bind(now.to_rfc3339())
    .execute(&mut *tx)
    .await?;

    let mut items = Vec::with_capacity(req.items.len());
    for item in &req.items {
        let result = sqlx::query(
            r#"
            INSERT INTO items (submission_id, category, quantity, description)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&submission_id)
        .bind(item.category.label())
        .bind(item.quantity)
        .bind(item.description.as_deref())
        .execute(&mut *tx)
        .await?;

        items.push(ItemResponse {
            id: result.last_insert_rowid(),
            category: item.category,
            quantity: item.quantity,
            description: item.description.clone(),
        });
    }

    tx.commit().await?;

    tracing::info!(
        "Created submission {} with {} items",
        submission_id,
        items.len()
    );

    Ok(Json(CreateSubmissionResponse {
        success: true,
        submission: SubmissionResponse {
            id: submission_id,
            name: req.name,
            email: req.email,
            phone: req.phone,
            address: req.address,
            pickup_date: req.pickup_date,
            status: SubmissionStatus::Pending,
            created_at: now,
            items,
        },
    }))
}

/// Handler: GET /api/submissions
///
/// All submissions with nested items, ordered by ascending pickup date.
pub async fn list_submissions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListSubmissionsResponse>, ApiError> {
    let rows: Vec<DbSubmission> = sqlx::query_as(
        r#"
        SELECT id, name, email, phone, address, pickup_date, status, created_at
        FROM submissions
        ORDER BY pickup_date ASC, created_at ASC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    let item_rows: Vec<DbItem> = sqlx::query_as(
        r#"
        SELECT id, submission_id, category, quantity, description
        FROM items
        ORDER BY id ASC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    let mut items_by_submission: HashMap<String, Vec<DbItem>> = HashMap::new();
    for item in item_rows {
        items_by_submission
            .entry(item.submission_id.clone())
            .or_default()
            .push(item);
    }

    let submissions = rows
        .into_iter()
        .map(|submission| {
            let items = items_by_submission
                .remove(&submission.id)
                .unwrap_or_default();
            SubmissionResponse::from_rows(submission, items)
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(Json(ListSubmissionsResponse { submissions }))
}

/// Handler: POST /api/submissions/status
///
/// Idempotent one-way transition; an unknown id performs no write.
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
    if req.id.trim().is_empty() {
        return Err(ApiError::Validation("Missing required field: id".to_string()));
    }

    let result = sqlx::query("UPDATE submissions SET status = ? WHERE id = ?")
        .bind(req.status.to_string())
        .bind(&req.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(req.id));
    }

    tracing::info!("Updated submission {} to {}", req.id, req.status);

    let submission = fetch_submission(&state.db, &req.id).await?;

    Ok(Json(UpdateStatusResponse { submission }))
}

/// Handler: POST /api/route
///
/// Relays the selected pickup addresses to the mapping service and returns
/// its payload verbatim.
pub async fn plan_route(
    State(state): State<Arc<AppState>>,
    Json(addresses): Json<Vec<String>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    tracing::info!("Planning route for {} addresses", addresses.len());

    let payload = state.route_planner.plan_route(&addresses).await?;

    Ok(Json(payload))
}

/// Handler: POST /api/chat
///
/// Appends the user's turn to their conversation, forwards the rendered
/// transcript to the hosted model, and returns the assistant's reply.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if req.message.trim().is_empty() {
        return Err(ApiError::Validation(
            "Missing required field: message".to_string(),
        ));
    }

    let conversation_id = req.conversation_id.unwrap_or_else(Uuid::new_v4);

    let prompt = state
        .conversations
        .append_user(conversation_id, &req.message)
        .await;

    let reply = state.chat_model.complete(&prompt).await?;

    state
        .conversations
        .append_assistant(conversation_id, &reply)
        .await;

    Ok(Json(ChatResponse {
        conversation_id,
        response: ChatMessage::assistant(reply),
    }))
}

fn validate_submission(req: &CreateSubmissionRequest) -> Result<(), ApiError> {
    let required = [
        ("name", &req.name),
        ("email", &req.email),
        ("phone", &req.phone),
        ("address", &req.address),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ApiError::Validation(format!(
                "Missing required field: {}",
                field
            )));
        }
    }

    if req.items.is_empty() {
        return Err(ApiError::Validation(
            "At least one item is required".to_string(),
        ));
    }

    for item in &req.items {
        if item.quantity < 1 {
            return Err(ApiError::Validation(format!(
                "Item quantity must be at least 1, got {}",
                item.quantity
            )));
        }
    }

    Ok(())
}

async fn fetch_submission(db: &SqlitePool, id: &str) -> Result<SubmissionResponse, ApiError> {
    let submission: Option<DbSubmission> = sqlx::query_as(
        r#"
        SELECT id, name, email, phone, address, pickup_date, status, created_at
        FROM submissions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    let submission = submission.ok_or_else(|| ApiError::NotFound(id.to_string()))?;

    let items: Vec<DbItem> = sqlx::query_as(
        r#"
        SELECT id, submission_id, category, quantity, description
        FROM items
        WHERE submission_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(id)
    .fetch_all(db)
    .await?;

    SubmissionResponse::from_rows(submission, items)
}
