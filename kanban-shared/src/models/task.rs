/// Task model and database operations
///
/// A task carries two independent placements: its `status` (one of three
/// fixed lanes) and its `column_id`/`order_index` pair (a user-defined column
/// and a position inside it). Both are persisted; neither is derived from the
/// other.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'inprogress', 'done');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     priority task_priority NOT NULL DEFAULT 'medium',
///     status task_status NOT NULL DEFAULT 'todo',
///     column_id UUID REFERENCES columns(id) ON DELETE CASCADE,
///     order_index INTEGER NOT NULL DEFAULT 0,
///     assignees TEXT[] NOT NULL DEFAULT '{}',
///     due_date DATE,
///     start_date DATE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use kanban_shared::models::task::{Task, CreateTask, TaskPriority};
/// use kanban_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(column_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Write release notes".to_string(),
///     priority: TaskPriority::High,
///     column_id: Some(column_id),
///     ..Default::default()
/// }).await?;
///
/// Task::move_to_column(&pool, task.id, column_id, 3).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};
use uuid::Uuid;

/// Maximum length of a task title (matches the VARCHAR bound)
pub const MAX_TITLE_LENGTH: usize = 255;

/// Board lane a task sits in
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// All statuses in lane order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Converts status to its wire/database identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "inprogress",
            TaskStatus::Done => "done",
        }
    }

    /// Human-readable lane title
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "inprogress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Task priority
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    /// Converts priority to its wire/database identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Returned when parsing an unknown status or priority identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant: {0}")]
pub struct UnknownVariant(pub String);

/// A task on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Priority
    pub priority: TaskPriority,

    /// Lane the task sits in
    pub status: TaskStatus,

    /// Owning column (tasks are deleted with their column)
    pub column_id: Option<Uuid>,

    /// Position within its column or status group
    pub order_index: i32,

    /// Assignee names (empty = unassigned)
    pub assignees: Vec<String>,

    /// Due date
    pub due_date: Option<NaiveDate>,

    /// Start date
    pub start_date: Option<NaiveDate>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Priority (default medium)
    #[serde(default)]
    pub priority: TaskPriority,

    /// Status (default todo)
    #[serde(default)]
    pub status: TaskStatus,

    /// Owning column
    #[serde(default)]
    pub column_id: Option<Uuid>,

    /// Position within the column
    #[serde(default)]
    pub order_index: i32,

    /// Assignee names
    #[serde(default)]
    pub assignees: Vec<String>,

    /// Due date
    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Start date
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

/// Input for updating a task
///
/// Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub column_id: Option<Uuid>,
    pub order_index: Option<i32>,
    pub assignees: Option<Vec<String>>,
    pub due_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
}

/// An empty description is stored as NULL
fn stored_description(description: &str) -> Option<String> {
    Some(description.to_string()).filter(|d| !d.is_empty())
}

impl Task {
    /// Merges the `Some` fields of `patch` into this task
    ///
    /// Does not touch `updated_at`; the store owns that stamp.
    pub fn apply(&mut self, patch: &UpdateTask) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = stored_description(description);
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(column_id) = patch.column_id {
            self.column_id = Some(column_id);
        }
        if let Some(order_index) = patch.order_index {
            self.order_index = order_index;
        }
        if let Some(assignees) = &patch.assignees {
            self.assignees = assignees.clone();
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = Some(start_date);
        }
    }

    /// Inserts a task and returns it with its generated id and timestamps
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including a foreign
    /// key violation when `column_id` names a column that does not exist.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, priority, status, column_id,
                               order_index, assignees, due_date, start_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, description, priority, status, column_id, order_index,
                      assignees, due_date, start_date, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.status)
        .bind(data.column_id)
        .bind(data.order_index)
        .bind(data.assignees)
        .bind(data.due_date)
        .bind(data.start_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks ordered by `order_index`
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, priority, status, column_id, order_index,
                   assignees, due_date, start_date, created_at, updated_at
            FROM tasks
            ORDER BY order_index ASC, created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, priority, status, column_id, order_index,
                   assignees, due_date, start_date, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists the tasks of one column in position order
    pub async fn find_by_column(pool: &PgPool, column_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, priority, status, column_id, order_index,
                   assignees, due_date, start_date, created_at, updated_at
            FROM tasks
            WHERE column_id = $1
            ORDER BY order_index ASC, created_at ASC
            "#,
        )
        .bind(column_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks with the given status in position order
    pub async fn find_by_status(pool: &PgPool, status: TaskStatus) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, priority, status, column_id, order_index,
                   assignees, due_date, start_date, created_at, updated_at
            FROM tasks
            WHERE status = $1
            ORDER BY order_index ASC, created_at ASC
            "#,
        )
        .bind(status)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks with the given priority in position order
    pub async fn find_by_priority(
        pool: &PgPool,
        priority: TaskPriority,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, priority, status, column_id, order_index,
                   assignees, due_date, start_date, created_at, updated_at
            FROM tasks
            WHERE priority = $1
            ORDER BY order_index ASC, created_at ASC
            "#,
        )
        .bind(priority)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates the provided fields and stamps `updated_at`
    ///
    /// Returns `None` if no task has this ID.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        let mut push = |column: &str| {
            bind_count += 1;
            query.push_str(&format!(", {} = ${}", column, bind_count));
        };

        if data.title.is_some() {
            push("title");
        }
        if data.description.is_some() {
            push("description");
        }
        if data.priority.is_some() {
            push("priority");
        }
        if data.status.is_some() {
            push("status");
        }
        if data.column_id.is_some() {
            push("column_id");
        }
        if data.order_index.is_some() {
            push("order_index");
        }
        if data.assignees.is_some() {
            push("assignees");
        }
        if data.due_date.is_some() {
            push("due_date");
        }
        if data.start_date.is_some() {
            push("start_date");
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, priority, status, column_id, \
             order_index, assignees, due_date, start_date, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(stored_description(&description));
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(column_id) = data.column_id {
            q = q.bind(column_id);
        }
        if let Some(order_index) = data.order_index {
            q = q.bind(order_index);
        }
        if let Some(assignees) = data.assignees {
            q = q.bind(assignees);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(start_date) = data.start_date {
            q = q.bind(start_date);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Moves a task into a column at the given position in one statement
    pub async fn move_to_column(
        pool: &PgPool,
        id: Uuid,
        column_id: Uuid,
        order_index: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET column_id = $2,
                order_index = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, priority, status, column_id, order_index,
                      assignees, due_date, start_date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(column_id)
        .bind(order_index)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Rewrites `order_index` to each task's position in `ids`
    ///
    /// Same all-or-nothing contract as
    /// [`Column::reorder`](crate::models::column::Column::reorder): an ID that
    /// matches no row rolls the whole batch back and `false` is returned.
    pub async fn reorder(pool: &PgPool, ids: &[Uuid]) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for (position, id) in ids.iter().enumerate() {
            let result = sqlx::query(
                "UPDATE tasks SET order_index = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                warn!(task_id = %id, "Task not found, rolling back reorder");
                tx.rollback().await?;
                return Ok(false);
            }
        }

        tx.commit().await?;
        debug!(tasks = ids.len(), "Tasks reordered");

        Ok(true)
    }

    /// Deletes a task
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts the tasks in a column
    pub async fn count_by_column(pool: &PgPool, column_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE column_id = $1")
            .bind(column_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Deletes every task
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
