//! Application state for the EcoPickup API

use std::sync::Arc;

use anyhow::Result;
use chat_proxy::{ChatModel, ChatProxyConfig, ConversationStore, ReplicateChatModel};
use route_proxy::{HttpRoutePlanner, RoutePlanner, RouteProxyConfig};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub struct AppState {
    pub db: SqlitePool,
    pub route_planner: Arc<dyn RoutePlanner>,
    pub chat_model: Arc<dyn ChatModel>,
    pub conversations: ConversationStore,
}

impl AppState {
    pub async fn new() -> Result<Self> {
        let db_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:ecopickup.db?mode=rwc".to_string());

        tracing::info!("Connecting to database: {}", db_url);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        Self::run_migrations(&pool).await?;

        let route_planner = HttpRoutePlanner::new(RouteProxyConfig::from_env());
        let chat_model = ReplicateChatModel::new(ChatProxyConfig::from_env());

        Ok(Self {
            db: pool,
            route_planner: Arc::new(route_planner),
            chat_model: Arc::new(chat_model),
            conversations: ConversationStore::new(),
        })
    }

    pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS submissions (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL,
                address TEXT NOT NULL,
                pickup_date TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                submission_id TEXT NOT NULL REFERENCES submissions(id) ON DELETE CASCADE,
                category TEXT NOT NULL,
                quantity INTEGER NOT NULL CHECK (quantity >= 1),
                description TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Index for the dashboard's pickup-date ordering
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_submissions_pickup_date ON submissions(pickup_date)
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_items_submission_id ON items(submission_id)
            "#,
        )
        .execute(pool)
        .await?;

        tracing::info!("Migrations complete");
        Ok(())
    }
}
