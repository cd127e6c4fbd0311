/// Task service
///
/// Validated wrappers around [`Task`] queries. The `prepare_*` functions hold
/// the sanitization rules so other stores apply exactly the same ones.

use crate::error::ServiceResult;
use crate::models::task::{
    CreateTask, Task, TaskPriority, TaskStatus, UpdateTask, MAX_TITLE_LENGTH,
};
use crate::validation::{
    parse_id, parse_id_list, sanitize_string, validate_assignee_names, validate_max_length,
    validate_optional_string, validate_required_string, ValidationError,
};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

const ENTITY: &str = "task";
const COLUMN_ENTITY: &str = "column";
const TITLE_FIELD: &str = "Title";

/// Task operations over a shared pool
#[derive(Debug, Clone)]
pub struct TaskService {
    pool: PgPool,
}

impl TaskService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Lists every task by `order_index`
    pub async fn get_all(&self) -> ServiceResult<Vec<Task>> {
        let tasks = Task::find_all(&self.pool).await?;
        debug!(count = tasks.len(), "Fetched tasks");
        Ok(tasks)
    }

    /// Lists the tasks of one column in position order
    pub async fn get_by_column_id(&self, column_id: &str) -> ServiceResult<Vec<Task>> {
        let column_id = parse_id(column_id, COLUMN_ENTITY)?;
        Ok(Task::find_by_column(&self.pool, column_id).await?)
    }

    /// Fetches one task
    pub async fn get_by_id(&self, id: &str) -> ServiceResult<Option<Task>> {
        let id = parse_id(id, ENTITY)?;
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    /// Creates a task after sanitizing its text fields
    pub async fn create(&self, data: CreateTask) -> ServiceResult<Task> {
        let data = prepare_create_task(data)?;
        let task = Task::create(&self.pool, data).await?;

        info!(task_id = %task.id, status = %task.status, "Task created");
        Ok(task)
    }

    /// Merges the provided fields into a task
    ///
    /// Returns `None` when no task has this id.
    pub async fn update(&self, id: &str, data: UpdateTask) -> ServiceResult<Option<Task>> {
        let id = parse_id(id, ENTITY)?;
        self.update_by_id(id, data).await
    }

    /// Same as [`update`](Self::update) for an id that is already parsed
    pub async fn update_by_id(&self, id: Uuid, data: UpdateTask) -> ServiceResult<Option<Task>> {
        let data = prepare_update_task(data)?;

        let task = Task::update(&self.pool, id, data).await?;
        if let Some(task) = &task {
            debug!(task_id = %task.id, "Task updated");
        }
        Ok(task)
    }

    /// Deletes a task
    pub async fn delete(&self, id: &str) -> ServiceResult<bool> {
        let id = parse_id(id, ENTITY)?;
        let deleted = Task::delete(&self.pool, id).await?;

        if deleted {
            info!(task_id = %id, "Task deleted");
        }
        Ok(deleted)
    }

    /// Places a task in a column at `order_index`
    ///
    /// Both fields and `updated_at` change in one statement. Returns `None`
    /// when no task has this id.
    pub async fn move_task(
        &self,
        task_id: &str,
        column_id: &str,
        order_index: i32,
    ) -> ServiceResult<Option<Task>> {
        let task_id = parse_id(task_id, ENTITY)?;
        let column_id = parse_id(column_id, COLUMN_ENTITY)?;

        let task = Task::move_to_column(&self.pool, task_id, column_id, order_index).await?;
        if task.is_some() {
            info!(task_id = %task_id, column_id = %column_id, order_index, "Task moved");
        }
        Ok(task)
    }

    /// Renumbers tasks to their positions in `task_ids`
    ///
    /// `column_id` is checked for shape only; membership of the tasks in that
    /// column is not enforced. Returns `false` and changes nothing if any id
    /// matches no task.
    pub async fn reorder_tasks(&self, column_id: &str, task_ids: &[String]) -> ServiceResult<bool> {
        let column_id = parse_id(column_id, COLUMN_ENTITY)?;
        let task_ids = parse_id_list(task_ids, ENTITY)?;

        let reordered = Task::reorder(&self.pool, &task_ids).await?;
        if reordered {
            info!(column_id = %column_id, tasks = task_ids.len(), "Tasks reordered");
        }
        Ok(reordered)
    }

    /// Lists tasks in one status lane
    pub async fn get_by_status(&self, status: TaskStatus) -> ServiceResult<Vec<Task>> {
        Ok(Task::find_by_status(&self.pool, status).await?)
    }

    /// Lists tasks with one priority
    pub async fn get_by_priority(&self, priority: TaskPriority) -> ServiceResult<Vec<Task>> {
        Ok(Task::find_by_priority(&self.pool, priority).await?)
    }
}

/// Sanitizes and validates a new task
///
/// The title is required and bounded, the description collapses to `None`
/// when nothing survives sanitization, and every assignee name must pass
/// [`validate_assignee_names`].
pub fn prepare_create_task(data: CreateTask) -> Result<CreateTask, ValidationError> {
    let title = sanitize_title(&data.title)?;
    let description = validate_optional_string(data.description.as_deref());
    let assignees = sanitize_assignees(&data.assignees)?;

    Ok(CreateTask {
        title,
        description,
        assignees,
        ..data
    })
}

/// Sanitizes and validates the provided fields of a task patch
///
/// A description that sanitizes to nothing stays in the patch as an empty
/// string, which clears the stored description.
pub fn prepare_update_task(data: UpdateTask) -> Result<UpdateTask, ValidationError> {
    let title = match data.title.as_deref() {
        Some(title) => Some(sanitize_title(title)?),
        None => None,
    };
    let description = data.description.as_deref().map(sanitize_string);
    let assignees = match &data.assignees {
        Some(names) => Some(sanitize_assignees(names)?),
        None => None,
    };

    Ok(UpdateTask {
        title,
        description,
        assignees,
        ..data
    })
}

fn sanitize_title(raw: &str) -> Result<String, ValidationError> {
    let title = validate_required_string(raw, TITLE_FIELD)?;
    validate_max_length(&title, TITLE_FIELD, MAX_TITLE_LENGTH)?;
    Ok(title)
}

fn sanitize_assignees(names: &[String]) -> Result<Vec<String>, ValidationError> {
    let names: Vec<String> = names
        .iter()
        .map(|name| sanitize_string(name))
        .filter(|name| !name.is_empty())
        .collect();

    validate_assignee_names(&names)?;
    Ok(names)
}
