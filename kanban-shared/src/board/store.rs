/// Task persistence seam for the board controller
///
/// [`TaskService`] is the PostgreSQL-backed store. [`MemoryTaskStore`] keeps
/// tasks in process and applies the same sanitization rules, for tests and
/// offline use.

use crate::error::ServiceResult;
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::services::{prepare_create_task, prepare_update_task, TaskService};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Storage operations the board needs
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks in position order
    async fn list(&self) -> ServiceResult<Vec<Task>>;

    /// Persists a new task and returns the stored record
    async fn create(&self, data: CreateTask) -> ServiceResult<Task>;

    /// Merges `patch` into a task and returns the stored record
    ///
    /// `None` when no task has this id.
    async fn update(&self, id: Uuid, patch: UpdateTask) -> ServiceResult<Option<Task>>;
}

#[async_trait]
impl TaskStore for TaskService {
    async fn list(&self) -> ServiceResult<Vec<Task>> {
        self.get_all().await
    }

    async fn create(&self, data: CreateTask) -> ServiceResult<Task> {
        TaskService::create(self, data).await
    }

    async fn update(&self, id: Uuid, patch: UpdateTask) -> ServiceResult<Option<Task>> {
        self.update_by_id(id, patch).await
    }
}

/// In-process task store
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the given tasks, kept as-is
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
        }
    }

    /// Copy of the stored tasks
    pub async fn snapshot(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list(&self) -> ServiceResult<Vec<Task>> {
        let mut tasks = self.snapshot().await;
        tasks.sort_by_key(|task| (task.order_index, task.created_at));
        Ok(tasks)
    }

    async fn create(&self, data: CreateTask) -> ServiceResult<Task> {
        let data = prepare_create_task(data)?;
        let now = Utc::now();

        let task = Task {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            priority: data.priority,
            status: data.status,
            column_id: data.column_id,
            order_index: data.order_index,
            assignees: data.assignees,
            due_date: data.due_date,
            start_date: data.start_date,
            created_at: now,
            updated_at: now,
        };

        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn update(&self, id: Uuid, patch: UpdateTask) -> ServiceResult<Option<Task>> {
        let patch = prepare_update_task(patch)?;
        let mut tasks = self.tasks.write().await;

        let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(None);
        };

        task.apply(&patch);
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }
}
