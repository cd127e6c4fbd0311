/// Board seeding
///
/// Resets the board to its default layout: three columns ("To Do",
/// "In Progress", "Done") and a handful of sample tasks. Everything goes
/// through the services so seeded rows are sanitized like user input.
///
/// ⚠️  Deletes every existing task and column first.

use crate::error::ServiceResult;
use crate::models::column::{Column, CreateColumn};
use crate::models::task::{CreateTask, Task, TaskPriority, TaskStatus};
use crate::services::{ColumnService, TaskService};
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::info;

/// Default column names, in board order
pub const DEFAULT_COLUMNS: [&str; 3] = ["To Do", "In Progress", "Done"];

/// Rows written by [`seed`]
#[derive(Debug, Clone)]
pub struct SeedReport {
    pub columns: Vec<Column>,
    pub tasks: Vec<Task>,
}

struct SampleTask {
    title: &'static str,
    description: &'static str,
    priority: TaskPriority,
    status: TaskStatus,
    order_index: i32,
    assignees: &'static [&'static str],
    due: (i32, u32, u32),
    start: (i32, u32, u32),
}

const SAMPLE_TASKS: [SampleTask; 6] = [
    SampleTask {
        title: "Learn React",
        description: "Study React fundamentals and hooks",
        priority: TaskPriority::High,
        status: TaskStatus::Todo,
        order_index: 0,
        assignees: &["John Doe"],
        due: (2025, 8, 15),
        start: (2025, 7, 25),
    },
    SampleTask {
        title: "Build Kanban Board",
        description: "Create a drag and drop kanban board",
        priority: TaskPriority::Medium,
        status: TaskStatus::InProgress,
        order_index: 0,
        assignees: &["Jane Smith", "Bob Johnson"],
        due: (2025, 9, 20),
        start: (2025, 8, 5),
    },
    SampleTask {
        title: "Write Tests",
        description: "Add unit tests for components",
        priority: TaskPriority::Low,
        status: TaskStatus::Done,
        order_index: 0,
        assignees: &["Bob Johnson"],
        due: (2025, 7, 10),
        start: (2025, 6, 25),
    },
    SampleTask {
        title: "Design System Implementation",
        description: "Implement consistent design tokens and components",
        priority: TaskPriority::High,
        status: TaskStatus::InProgress,
        order_index: 1,
        assignees: &["Alice Brown", "Charlie Wilson"],
        due: (2025, 8, 18),
        start: (2025, 7, 28),
    },
    SampleTask {
        title: "Documentation Update",
        description: "Update API documentation and user guides",
        priority: TaskPriority::Low,
        status: TaskStatus::InProgress,
        order_index: 2,
        assignees: &["Charlie Wilson", "John Doe", "Jane Smith"],
        due: (2025, 9, 25),
        start: (2025, 8, 12),
    },
    SampleTask {
        title: "Review Code Quality",
        description: "Perform code review and refactoring",
        priority: TaskPriority::Medium,
        status: TaskStatus::Todo,
        order_index: 1,
        assignees: &[],
        due: (2025, 8, 30),
        start: (2025, 8, 15),
    },
];

fn date((year, month, day): (i32, u32, u32)) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Wipes the board and writes the default columns and sample tasks
///
/// Each sample task is placed in the column matching its status.
pub async fn seed(pool: &PgPool) -> ServiceResult<SeedReport> {
    info!("Seeding board");

    let removed_tasks = Task::delete_all(pool).await?;
    let removed_columns = Column::delete_all(pool).await?;
    info!(removed_tasks, removed_columns, "Cleared existing board");

    let column_service = ColumnService::new(pool.clone());
    let task_service = TaskService::new(pool.clone());

    let mut columns = Vec::with_capacity(DEFAULT_COLUMNS.len());
    for (position, name) in DEFAULT_COLUMNS.iter().enumerate() {
        let column = column_service
            .create(CreateColumn {
                name: (*name).to_string(),
                order_index: position as i32,
            })
            .await?;
        columns.push(column);
    }
    info!(columns = columns.len(), "Created default columns");

    let column_for = |status: TaskStatus| {
        let position = TaskStatus::ALL
            .iter()
            .position(|s| *s == status)
            .unwrap_or(0);
        columns.get(position).map(|column| column.id)
    };

    let mut tasks = Vec::with_capacity(SAMPLE_TASKS.len());
    for sample in &SAMPLE_TASKS {
        let task = task_service
            .create(CreateTask {
                title: sample.title.to_string(),
                description: Some(sample.description.to_string()),
                priority: sample.priority,
                status: sample.status,
                column_id: column_for(sample.status),
                order_index: sample.order_index,
                assignees: sample.assignees.iter().map(|s| s.to_string()).collect(),
                due_date: date(sample.due),
                start_date: date(sample.start),
            })
            .await?;
        tasks.push(task);
    }
    info!(tasks = tasks.len(), "Created sample tasks");

    Ok(SeedReport { columns, tasks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::prepare_create_task;

    #[test]
    fn test_sample_dates_are_valid() {
        for sample in &SAMPLE_TASKS {
            assert!(date(sample.due).is_some(), "{}", sample.title);
            assert!(date(sample.start).is_some(), "{}", sample.title);
            assert!(date(sample.start) <= date(sample.due), "{}", sample.title);
        }
    }

    #[test]
    fn test_sample_tasks_pass_service_validation() {
        for sample in &SAMPLE_TASKS {
            let data = prepare_create_task(CreateTask {
                title: sample.title.to_string(),
                description: Some(sample.description.to_string()),
                assignees: sample.assignees.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            })
            .unwrap();
            assert_eq!(data.title, sample.title);
        }
    }

    #[test]
    fn test_every_lane_has_samples() {
        for status in TaskStatus::ALL {
            assert!(SAMPLE_TASKS.iter().any(|s| s.status == status));
        }
    }
}
