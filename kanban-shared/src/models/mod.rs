/// Database models for the board
///
/// This module contains the persisted records and their SQL operations.
/// Inputs are assumed to be validated already; the
/// [`services`](crate::services) layer is the entry point for untrusted data.
///
/// # Models
///
/// - `column`: Board columns, ordered by `order_index`
/// - `task`: Tasks, owned by a column and placed in a status lane
///
/// # Example
///
/// ```no_run
/// use kanban_shared::models::column::{Column, CreateColumn};
/// use kanban_shared::models::task::{Task, CreateTask};
/// use kanban_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let column = Column::create(&pool, CreateColumn {
///     name: "To Do".to_string(),
///     order_index: 0,
/// }).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Learn Rust".to_string(),
///     column_id: Some(column.id),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod column;
pub mod task;
