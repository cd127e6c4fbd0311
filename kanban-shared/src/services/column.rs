/// Column service
///
/// Validated wrappers around [`Column`] queries.

use crate::error::ServiceResult;
use crate::models::column::{Column, CreateColumn, UpdateColumn, MAX_NAME_LENGTH};
use crate::validation::{parse_id, parse_id_list, validate_max_length, validate_required_string};
use sqlx::PgPool;
use tracing::{debug, info};

const ENTITY: &str = "column";
const NAME_FIELD: &str = "Column name";

/// Column operations over a shared pool
#[derive(Debug, Clone)]
pub struct ColumnService {
    pool: PgPool,
}

impl ColumnService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Lists all columns by `order_index`, then creation time
    pub async fn get_all(&self) -> ServiceResult<Vec<Column>> {
        let columns = Column::find_all(&self.pool).await?;
        debug!(count = columns.len(), "Fetched columns");
        Ok(columns)
    }

    /// Fetches one column
    pub async fn get_by_id(&self, id: &str) -> ServiceResult<Option<Column>> {
        let id = parse_id(id, ENTITY)?;
        Ok(Column::find_by_id(&self.pool, id).await?)
    }

    /// Creates a column with a sanitized name
    pub async fn create(&self, data: CreateColumn) -> ServiceResult<Column> {
        let name = sanitize_name(&data.name)?;

        let column = Column::create(
            &self.pool,
            CreateColumn {
                name,
                order_index: data.order_index,
            },
        )
        .await?;

        info!(column_id = %column.id, name = %column.name, "Column created");
        Ok(column)
    }

    /// Updates the provided fields
    ///
    /// Returns `None` when no column has this id.
    pub async fn update(&self, id: &str, data: UpdateColumn) -> ServiceResult<Option<Column>> {
        let id = parse_id(id, ENTITY)?;

        let name = match data.name.as_deref() {
            Some(name) => Some(sanitize_name(name)?),
            None => None,
        };

        let column = Column::update(
            &self.pool,
            id,
            UpdateColumn {
                name,
                order_index: data.order_index,
            },
        )
        .await?;

        Ok(column)
    }

    /// Deletes a column and, by cascade, all of its tasks
    pub async fn delete(&self, id: &str) -> ServiceResult<bool> {
        let id = parse_id(id, ENTITY)?;
        let deleted = Column::delete(&self.pool, id).await?;

        if deleted {
            info!(column_id = %id, "Column deleted");
        }
        Ok(deleted)
    }

    /// Renumbers columns to their positions in `ids`
    ///
    /// Every id is validated before the transaction starts. Returns `false`
    /// and changes nothing if any id matches no column.
    pub async fn reorder(&self, ids: &[String]) -> ServiceResult<bool> {
        let ids = parse_id_list(ids, ENTITY)?;
        let reordered = Column::reorder(&self.pool, &ids).await?;

        if reordered {
            info!(columns = ids.len(), "Columns reordered");
        }
        Ok(reordered)
    }
}

fn sanitize_name(raw: &str) -> ServiceResult<String> {
    let name = validate_required_string(raw, NAME_FIELD)?;
    validate_max_length(&name, NAME_FIELD, MAX_NAME_LENGTH)?;
    Ok(name)
}
