/// Board controller
///
/// Holds the task list shown on the board and the task currently being
/// dragged. Lanes are never stored: each one is the backing list filtered by
/// status, so moving a task between lanes only rewrites its `status` and the
/// list order never changes.
///
/// Every mutation is written through a [`TaskStore`] first; the cached entry
/// is then replaced by the record the store returned.
///
/// # Example
///
/// ```
/// use kanban_shared::board::{Board, MemoryTaskStore, TaskForm};
/// use kanban_shared::models::task::TaskStatus;
///
/// # async fn example() -> Result<(), kanban_shared::board::BoardError> {
/// let mut board = Board::load(MemoryTaskStore::new()).await?;
///
/// let task = board
///     .add_task(TaskForm {
///         title: "Plan sprint".into(),
///         assignees: "Jane Smith".into(),
///         ..Default::default()
///     })
///     .await?;
///
/// board.drag_start(task.id);
/// board.drag_end(task.id, Some("done")).await?;
/// assert_eq!(board.lane(TaskStatus::Done).len(), 1);
/// # Ok(())
/// # }
/// ```

pub mod form;
pub mod store;

pub use form::TaskForm;
pub use store::{MemoryTaskStore, TaskStore};

use crate::error::ServiceError;
use crate::models::task::{Task, TaskStatus, UpdateTask};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Board operation errors
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// The new-task form failed validation
    #[error("Invalid task form: {0}")]
    Form(#[from] validator::ValidationErrors),

    /// The store rejected the write or failed
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// One status lane of the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lane {
    /// Drop-target identifier
    pub id: TaskStatus,

    /// Lane heading
    pub title: &'static str,

    /// Tasks with this status, in backing-list order
    pub tasks: Vec<Task>,
}

/// Board state over a task store
#[derive(Debug)]
pub struct Board<S> {
    store: S,
    tasks: Vec<Task>,
    active: Option<Task>,
}

impl<S: TaskStore> Board<S> {
    /// Creates an empty board over `store` without reading it
    pub fn new(store: S) -> Self {
        Self {
            store,
            tasks: Vec::new(),
            active: None,
        }
    }

    /// Creates a board populated from `store`
    pub async fn load(store: S) -> Result<Self, BoardError> {
        let mut board = Self::new(store);
        board.refresh().await?;
        Ok(board)
    }

    /// Re-reads every task from the store
    pub async fn refresh(&mut self) -> Result<(), BoardError> {
        self.tasks = self.store.list().await?;
        debug!(tasks = self.tasks.len(), "Board loaded");
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The backing task list
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The task being dragged, if any
    pub fn active_task(&self) -> Option<&Task> {
        self.active.as_ref()
    }

    /// Tasks with `status`, in backing-list order
    pub fn lane(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    /// All three lanes in board order
    pub fn lanes(&self) -> Vec<Lane> {
        TaskStatus::ALL
            .iter()
            .map(|status| Lane {
                id: *status,
                title: status.label(),
                tasks: self.lane(*status).into_iter().cloned().collect(),
            })
            .collect()
    }

    /// Marks a task as being dragged; unknown ids clear the marker
    pub fn drag_start(&mut self, task_id: Uuid) {
        self.active = self.tasks.iter().find(|t| t.id == task_id).cloned();
    }

    /// Ends a drag over `drop_target`
    ///
    /// The active task is always cleared. Only `todo`, `inprogress` and
    /// `done` are drop targets; anything else, or no target, leaves the list
    /// untouched. Returns whether a status was written.
    pub async fn drag_end(
        &mut self,
        task_id: Uuid,
        drop_target: Option<&str>,
    ) -> Result<bool, BoardError> {
        self.active = None;

        let Some(status) = drop_target.and_then(|target| target.parse::<TaskStatus>().ok()) else {
            debug!(task_id = %task_id, target = ?drop_target, "Drop outside a lane ignored");
            return Ok(false);
        };

        let patch = UpdateTask {
            status: Some(status),
            ..Default::default()
        };
        let updated = self.write_through(task_id, patch).await?;

        if updated {
            debug!(task_id = %task_id, status = %status, "Task dropped");
        }
        Ok(updated)
    }

    /// Validates a new-task form and appends the created task
    ///
    /// The task starts in `todo` with today's date as its start date.
    pub async fn add_task(&mut self, form: TaskForm) -> Result<Task, BoardError> {
        self.add_task_on(form, Utc::now().date_naive()).await
    }

    /// Same as [`add_task`](Self::add_task) with an explicit `today`
    pub async fn add_task_on(&mut self, form: TaskForm, today: NaiveDate) -> Result<Task, BoardError> {
        let form = form.normalized();
        form.validate_on(today)?;

        let task = self.store.create(form.into_create_task(today)).await?;
        self.tasks.push(task.clone());

        Ok(task)
    }

    /// Merges `patch` into a task already on the board
    ///
    /// Ids not on the board are ignored and return `None`.
    pub async fn update_task(
        &mut self,
        task_id: Uuid,
        patch: UpdateTask,
    ) -> Result<Option<Task>, BoardError> {
        if !self.write_through(task_id, patch).await? {
            return Ok(None);
        }
        Ok(self.tasks.iter().find(|t| t.id == task_id).cloned())
    }

    /// Writes `patch` to the store and swaps the stored record into place
    ///
    /// A task the store no longer has is dropped from the list.
    async fn write_through(&mut self, task_id: Uuid, patch: UpdateTask) -> Result<bool, BoardError> {
        let Some(position) = self.tasks.iter().position(|t| t.id == task_id) else {
            return Ok(false);
        };

        match self.store.update(task_id, patch).await? {
            Some(stored) => {
                self.tasks[position] = stored;
                Ok(true)
            }
            None => {
                self.tasks.remove(position);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{CreateTask, TaskPriority};

    async fn board_with(titles: &[(&str, TaskStatus)]) -> Board<MemoryTaskStore> {
        let store = MemoryTaskStore::new();
        for (position, (title, status)) in titles.iter().enumerate() {
            store
                .create(CreateTask {
                    title: title.to_string(),
                    status: *status,
                    order_index: position as i32,
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        Board::load(store).await.unwrap()
    }

    fn stored_task(title: &str, status: TaskStatus, order_index: i32) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            priority: TaskPriority::Medium,
            status,
            column_id: None,
            order_index,
            assignees: vec!["Jane Smith".to_string()],
            due_date: None,
            start_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<Uuid> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[tokio::test]
    async fn test_lanes_partition_by_status() {
        let board = board_with(&[
            ("A", TaskStatus::Todo),
            ("B", TaskStatus::InProgress),
            ("C", TaskStatus::Todo),
            ("D", TaskStatus::Done),
        ])
        .await;

        let lanes = board.lanes();
        let titles: Vec<Vec<&str>> = lanes
            .iter()
            .map(|lane| lane.tasks.iter().map(|t| t.title.as_str()).collect())
            .collect();

        assert_eq!(titles, vec![vec!["A", "C"], vec!["B"], vec!["D"]]);
        assert_eq!(lanes[1].title, "In Progress");
        assert_eq!(lanes[1].id, TaskStatus::InProgress);
    }

    #[tokio::test]
    async fn test_load_orders_existing_tasks() {
        let late = stored_task("Late", TaskStatus::Todo, 2);
        let early = stored_task("Early", TaskStatus::Done, 0);
        let store = MemoryTaskStore::with_tasks(vec![late.clone(), early.clone()]);

        let mut board = Board::load(store).await.unwrap();
        assert_eq!(ids(board.tasks()), vec![early.id, late.id]);

        board.drag_start(late.id);
        assert!(board.drag_end(late.id, Some("inprogress")).await.unwrap());
        assert_eq!(board.lane(TaskStatus::InProgress)[0].title, "Late");
    }

    #[tokio::test]
    async fn test_drag_start_tracks_active_task() {
        let mut board = board_with(&[("A", TaskStatus::Todo)]).await;
        let id = board.tasks()[0].id;

        board.drag_start(id);
        assert_eq!(board.active_task().map(|t| t.id), Some(id));

        board.drag_start(Uuid::new_v4());
        assert!(board.active_task().is_none());
    }

    #[tokio::test]
    async fn test_drag_end_moves_task_without_reordering() {
        let mut board = board_with(&[
            ("A", TaskStatus::Todo),
            ("B", TaskStatus::Todo),
            ("C", TaskStatus::InProgress),
        ])
        .await;
        let before = ids(board.tasks());
        let moved = before[0];

        board.drag_start(moved);
        assert!(board.drag_end(moved, Some("done")).await.unwrap());

        assert!(board.active_task().is_none());
        assert_eq!(ids(board.tasks()), before);
        assert_eq!(board.tasks()[0].status, TaskStatus::Done);
        assert_eq!(board.lane(TaskStatus::Done)[0].id, moved);

        let stored = board.store().snapshot().await;
        let stored_status = stored.iter().find(|t| t.id == moved).map(|t| t.status);
        assert_eq!(stored_status, Some(TaskStatus::Done));
    }

    #[tokio::test]
    async fn test_drag_end_to_unknown_target_is_ignored() {
        let mut board = board_with(&[("A", TaskStatus::Todo), ("B", TaskStatus::Done)]).await;
        let before = board.tasks().to_vec();
        let id = before[0].id;

        board.drag_start(id);
        assert!(!board.drag_end(id, Some("archive")).await.unwrap());
        assert!(board.active_task().is_none());
        assert_eq!(board.tasks(), before.as_slice());

        board.drag_start(id);
        assert!(!board.drag_end(id, None).await.unwrap());
        assert!(board.active_task().is_none());
        assert_eq!(board.tasks(), before.as_slice());
    }

    #[tokio::test]
    async fn test_add_task_appends_todo_starting_today() {
        let mut board = board_with(&[("A", TaskStatus::Done)]).await;
        let today = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();

        let task = board
            .add_task_on(
                TaskForm {
                    title: "  Write docs ".to_string(),
                    description: None,
                    priority: TaskPriority::Low,
                    assignees: "Jane Smith, Bob Johnson".to_string(),
                    due_date: NaiveDate::from_ymd_opt(2025, 8, 20),
                },
                today,
            )
            .await
            .unwrap();

        assert_eq!(task.title, "Write docs");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.start_date, Some(today));
        assert_eq!(task.assignees, vec!["Jane Smith", "Bob Johnson"]);
        assert_eq!(board.tasks().len(), 2);
        assert_eq!(board.tasks()[1].id, task.id);
    }

    #[tokio::test]
    async fn test_add_task_rejects_invalid_form() {
        let mut board = board_with(&[]).await;
        let today = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();

        let err = board
            .add_task_on(
                TaskForm {
                    title: "Late".to_string(),
                    assignees: "Jane Smith".to_string(),
                    due_date: NaiveDate::from_ymd_opt(2025, 7, 1),
                    ..Default::default()
                },
                today,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BoardError::Form(_)));
        assert!(board.tasks().is_empty());
        assert!(board.store().snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_task_changes_only_patched_field() {
        let mut board = board_with(&[("A", TaskStatus::Todo), ("B", TaskStatus::Todo)]).await;
        let original = board.tasks()[1].clone();

        let updated = board
            .update_task(
                original.id,
                UpdateTask {
                    priority: Some(TaskPriority::High),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.priority, TaskPriority::High);
        assert_eq!(updated.title, original.title);
        assert_eq!(updated.status, original.status);
        assert_eq!(updated.assignees, original.assignees);
        assert_eq!(board.tasks()[1], updated);
        assert_eq!(board.tasks()[0].priority, TaskPriority::Medium);
    }

    #[tokio::test]
    async fn test_update_task_unknown_id_is_noop() {
        let mut board = board_with(&[("A", TaskStatus::Todo)]).await;
        let before = board.tasks().to_vec();

        let result = board
            .update_task(
                Uuid::new_v4(),
                UpdateTask {
                    title: Some("Ghost".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(board.tasks(), before.as_slice());
    }

    #[tokio::test]
    async fn test_update_task_propagates_validation_errors() {
        let mut board = board_with(&[("A", TaskStatus::Todo)]).await;
        let id = board.tasks()[0].id;

        let err = board
            .update_task(
                id,
                UpdateTask {
                    title: Some("<script></script>".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BoardError::Service(ServiceError::Validation(_))));
        assert_eq!(board.tasks()[0].title, "A");
    }
}
