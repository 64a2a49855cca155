//! Server registry repository.
//!
//! Database operations for the conferencing server pool: registration,
//! operator enable/disable, poll result bookkeeping, and the least-loaded
//! lookup used by the selection service.
//!
//! # Security
//!
//! - All queries use parameterized statements (SQL injection safe)
//! - API secrets are only read into [`PollTarget`], never into listing rows

use crate::errors::PoolError;
use crate::models::{PollTarget, SelectedServer, ServerHealth, ServerRow};
use chrono::{DateTime, Utc};
use common::secret::{ExposeSecret, SecretString};
use common::types::ServerId;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

/// Server row as fetched from the database (secret excluded).
#[derive(Debug, sqlx::FromRow)]
struct ServerDbRow {
    server_id: Uuid,
    base_url: String,
    enabled: bool,
    health: String,
    load: Option<i64>,
    last_polled_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl ServerDbRow {
    fn into_row(self) -> Result<ServerRow, PoolError> {
        let health = ServerHealth::parse(&self.health).ok_or_else(|| {
            PoolError::Database(format!(
                "unexpected health value '{}' for server {}",
                self.health, self.server_id
            ))
        })?;

        Ok(ServerRow {
            server_id: ServerId(self.server_id),
            base_url: self.base_url,
            enabled: self.enabled,
            health,
            load: self.load,
            last_polled_at: self.last_polled_at,
            created_at: self.created_at,
        })
    }
}

/// Poll target row (includes the API secret).
#[derive(sqlx::FromRow)]
struct PollTargetDbRow {
    server_id: Uuid,
    base_url: String,
    api_secret: String,
}

/// Candidate row for the least-loaded lookup.
#[derive(Debug, sqlx::FromRow)]
struct SelectionDbRow {
    server_id: Uuid,
    base_url: String,
    load: i64,
}

/// Repository for server pool operations.
pub struct ServersRepository;

impl ServersRepository {
    /// List all registered servers for the admin endpoints.
    #[instrument(skip(pool))]
    pub async fn list_all(pool: &PgPool) -> Result<Vec<ServerRow>, PoolError> {
        let rows: Vec<ServerDbRow> = sqlx::query_as(
            r#"
            SELECT server_id, base_url, enabled, health, load, last_polled_at, created_at
            FROM servers
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(ServerDbRow::into_row).collect()
    }

    /// List the poll targets: enabled servers with their API secrets.
    #[instrument(skip(pool))]
    pub async fn list_enabled(pool: &PgPool) -> Result<Vec<PollTarget>, PoolError> {
        let rows: Vec<PollTargetDbRow> = sqlx::query_as(
            r#"
            SELECT server_id, base_url, api_secret
            FROM servers
            WHERE enabled
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| PollTarget {
                server_id: ServerId(r.server_id),
                base_url: r.base_url,
                api_secret: SecretString::from(r.api_secret),
            })
            .collect())
    }

    /// Register a new server.
    ///
    /// # Errors
    ///
    /// - `PoolError::Conflict` - A server with the same base URL exists
    /// - `PoolError::Database` - Database operation failed
    #[instrument(skip(pool, api_secret), fields(base_url = %base_url))]
    pub async fn insert(
        pool: &PgPool,
        base_url: &str,
        api_secret: &SecretString,
    ) -> Result<ServerRow, PoolError> {
        let server_id = ServerId::new();

        let row: ServerDbRow = sqlx::query_as(
            r#"
            INSERT INTO servers (server_id, base_url, api_secret)
            VALUES ($1, $2, $3)
            RETURNING server_id, base_url, enabled, health, load, last_polled_at, created_at
            "#,
        )
        .bind(server_id.0)
        .bind(base_url)
        .bind(api_secret.expose_secret())
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PoolError::Conflict("A server with this base URL is already registered".to_string())
            }
            other => PoolError::from(other),
        })?;

        row.into_row()
    }

    /// Set the operator flag for a server.
    ///
    /// Returns `None` if the server does not exist.
    #[instrument(skip(pool), fields(server_id = %server_id, enabled))]
    pub async fn set_enabled(
        pool: &PgPool,
        server_id: ServerId,
        enabled: bool,
    ) -> Result<Option<ServerRow>, PoolError> {
        let row: Option<ServerDbRow> = sqlx::query_as(
            r#"
            UPDATE servers
            SET enabled = $2, updated_at = NOW()
            WHERE server_id = $1
            RETURNING server_id, base_url, enabled, health, load, last_polled_at, created_at
            "#,
        )
        .bind(server_id.0)
        .bind(enabled)
        .fetch_optional(pool)
        .await?;

        row.map(ServerDbRow::into_row).transpose()
    }

    /// Record a successful poll: mark the server online and store its load.
    #[instrument(skip(pool), fields(server_id = %server_id, load))]
    pub async fn record_poll_success(
        pool: &PgPool,
        server_id: ServerId,
        load: i64,
    ) -> Result<(), PoolError> {
        sqlx::query(
            r#"
            UPDATE servers
            SET health = 'online', load = $2, last_polled_at = NOW(), updated_at = NOW()
            WHERE server_id = $1
            "#,
        )
        .bind(server_id.0)
        .bind(load)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Record a failed poll: mark the server offline and clear its load.
    ///
    /// A server without a current load score never wins selection, so a
    /// failing server drops out of the pool until it answers again.
    #[instrument(skip(pool), fields(server_id = %server_id))]
    pub async fn record_poll_failure(
        pool: &PgPool,
        server_id: ServerId,
    ) -> Result<(), PoolError> {
        sqlx::query(
            r#"
            UPDATE servers
            SET health = 'offline', load = NULL, last_polled_at = NOW(), updated_at = NOW()
            WHERE server_id = $1
            "#,
        )
        .bind(server_id.0)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// List the servers eligible for selection: enabled, online, and with a
    /// current load score.
    #[instrument(skip(pool))]
    pub async fn list_selectable(pool: &PgPool) -> Result<Vec<SelectedServer>, PoolError> {
        let rows: Vec<SelectionDbRow> = sqlx::query_as(
            r#"
            SELECT server_id, base_url, load
            FROM servers
            WHERE enabled AND health = 'online' AND load IS NOT NULL
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SelectedServer {
                server_id: ServerId(r.server_id),
                base_url: r.base_url,
                load: r.load,
            })
            .collect())
    }
}
