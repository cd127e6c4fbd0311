/// Data access services
///
/// The services are the entry point for untrusted input. Every identifier is
/// checked for UUID shape before a query is issued and every free-text field
/// is sanitized to plain text. A malformed id is an error; a well-formed id
/// that matches nothing is `None` or `false`.
///
/// # Example
///
/// ```no_run
/// use kanban_shared::db::pool::{create_pool, DatabaseConfig};
/// use kanban_shared::models::column::CreateColumn;
/// use kanban_shared::services::{ColumnService, TaskService};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::from_env()?).await?;
/// let columns = ColumnService::new(pool.clone());
/// let tasks = TaskService::new(pool);
///
/// let todo = columns.create(CreateColumn { name: "To Do".into(), order_index: 0 }).await?;
/// let in_column = tasks.get_by_column_id(&todo.id.to_string()).await?;
/// assert!(in_column.is_empty());
/// # Ok(())
/// # }
/// ```

pub mod column;
pub mod task;

pub use column::ColumnService;
pub use task::{prepare_create_task, prepare_update_task, TaskService};
