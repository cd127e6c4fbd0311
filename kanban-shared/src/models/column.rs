/// Column model and database operations
///
/// Columns are the user-defined lanes of the board. Display order is given by
/// `order_index`; the value is not unique, ties fall back to creation order.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE columns (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     order_index INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Functions here take already-validated input. Use
/// [`ColumnService`](crate::services::ColumnService) for id checks and
/// sanitization.
///
/// # Example
///
/// ```no_run
/// use kanban_shared::models::column::{Column, CreateColumn};
/// use kanban_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let column = Column::create(&pool, CreateColumn {
///     name: "Backlog".to_string(),
///     order_index: 0,
/// }).await?;
///
/// Column::reorder(&pool, &[column.id]).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

/// Maximum length of a column name (matches the VARCHAR bound)
pub const MAX_NAME_LENGTH: usize = 255;

/// A board column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Unique column ID
    pub id: Uuid,

    /// Display label
    pub name: String,

    /// Position among columns
    pub order_index: i32,

    /// When the column was created
    pub created_at: DateTime<Utc>,

    /// When the column was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a column
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColumn {
    /// Display label
    pub name: String,

    /// Position among columns
    #[serde(default)]
    pub order_index: i32,
}

/// Input for updating a column
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateColumn {
    /// New display label
    pub name: Option<String>,

    /// New position
    pub order_index: Option<i32>,
}

impl Column {
    /// Inserts a column and returns it with its generated id and timestamps
    pub async fn create(pool: &PgPool, data: CreateColumn) -> Result<Self, sqlx::Error> {
        let column = sqlx::query_as::<_, Column>(
            r#"
            INSERT INTO columns (name, order_index)
            VALUES ($1, $2)
            RETURNING id, name, order_index, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.order_index)
        .fetch_one(pool)
        .await?;

        Ok(column)
    }

    /// Lists all columns in display order
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let columns = sqlx::query_as::<_, Column>(
            r#"
            SELECT id, name, order_index, created_at, updated_at
            FROM columns
            ORDER BY order_index ASC, created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(columns)
    }

    /// Finds a column by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let column = sqlx::query_as::<_, Column>(
            r#"
            SELECT id, name, order_index, created_at, updated_at
            FROM columns
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(column)
    }

    /// Updates the provided fields and stamps `updated_at`
    ///
    /// Returns `None` if no column has this ID.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateColumn,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE columns SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.order_index.is_some() {
            bind_count += 1;
            query.push_str(&format!(", order_index = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, order_index, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Column>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(order_index) = data.order_index {
            q = q.bind(order_index);
        }

        let column = q.fetch_optional(pool).await?;

        Ok(column)
    }

    /// Deletes a column
    ///
    /// ⚠️  This also deletes every task in the column due to CASCADE.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM columns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Rewrites `order_index` to each column's position in `ids`
    ///
    /// All updates run in one transaction. If any ID matches no row the
    /// transaction is rolled back, nothing is renumbered, and `false` is
    /// returned.
    pub async fn reorder(pool: &PgPool, ids: &[Uuid]) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for (position, id) in ids.iter().enumerate() {
            let result = sqlx::query(
                "UPDATE columns SET order_index = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                warn!(column_id = %id, "Column not found, rolling back reorder");
                tx.rollback().await?;
                return Ok(false);
            }
        }

        tx.commit().await?;
        debug!(columns = ids.len(), "Columns reordered");

        Ok(true)
    }

    /// Deletes every column (and, by cascade, every task in a column)
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM columns").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
